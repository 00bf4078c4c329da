use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Raw current values at or above this are instrument "no reading" sentinels
pub const CURRENT_SENTINEL: f64 = 1e30;

/// Scale from the instrument's raw current unit (amps) to nanoamps
pub const NANOAMPS_PER_RAW: f64 = 1e9;

/// Time-of-day format of the first log field
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

/// One parsed log line: `HH:MM:SS <voltage> <raw current> ...`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLine {
    /// Full timestamp (file date + time-of-day field)
    pub time: NaiveDateTime,
    /// Voltage in volts
    pub voltage: f64,
    /// Current in instrument units (amps)
    pub raw_current: f64,
}

impl LogLine {
    /// Parse a line using `date` as the calendar day of its time-of-day field.
    ///
    /// Returns `None` for malformed lines: fewer than three whitespace-separated
    /// fields, a non-numeric voltage or current, or an unparseable time.
    pub fn parse(line: &str, date: NaiveDate) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let time = fields.next()?;
        let voltage = fields.next()?.parse::<f64>().ok()?;
        let raw_current = fields.next()?.parse::<f64>().ok()?;
        let time = NaiveTime::parse_from_str(time, TIME_OF_DAY_FORMAT).ok()?;

        Some(Self {
            time: date.and_time(time),
            voltage,
            raw_current,
        })
    }

    /// Current converted to nanoamps
    pub fn current_nanoamps(&self) -> f64 {
        self.raw_current * NANOAMPS_PER_RAW
    }

    /// Whether the current is a real reading (finite and below the sentinel)
    pub fn has_valid_current(&self) -> bool {
        self.raw_current.is_finite() && self.raw_current < CURRENT_SENTINEL
    }
}
