use serde::{Deserialize, Serialize};

use crate::catalog::TimeWindow;
use crate::extract::{epoch_seconds, Sample};

/// Fraction of the time span added on each side
pub const TIME_PAD_FRACTION: f64 = 0.05;

/// Fraction of the current span added on each side (5% in total)
pub const CURRENT_PAD_FRACTION: f64 = 0.025;

/// The current axis always covers at least `[-MIN_CURRENT_SPAN, MIN_CURRENT_SPAN]` nA
pub const MIN_CURRENT_SPAN: f64 = 1.0;

/// Voltages below this magnitude get the narrow envelope
pub const LOW_VOLTAGE_LIMIT: f64 = 200.0;

/// Default voltage envelope half-width
pub const FULL_VOLTAGE_LIMIT: f64 = 1100.0;

/// Closed interval on one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Lower end
    pub min: f64,
    /// Upper end
    pub max: f64,
}

impl AxisRange {
    /// Create a range
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `max - min`
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Observed minima and maxima of a series.
///
/// Time is in signed seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesExtent {
    /// Time range
    pub time: AxisRange,
    /// Current range (nA)
    pub current: AxisRange,
    /// Voltage range (V)
    pub voltage: AxisRange,
}

impl SeriesExtent {
    /// Extent of `samples`, boundaries included; `None` when empty
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let (first, rest) = samples.split_first()?;
        let t = first.epoch_seconds();
        let mut extent = Self {
            time: AxisRange::new(t, t),
            current: AxisRange::new(first.current, first.current),
            voltage: AxisRange::new(first.voltage, first.voltage),
        };
        for sample in rest {
            extent.time.include(sample.epoch_seconds());
            extent.current.include(sample.current);
            extent.voltage.include(sample.voltage);
        }
        Some(extent)
    }

    /// Extent of a window without data: zero current and voltage
    pub fn empty(window: &TimeWindow) -> Self {
        Self {
            time: AxisRange::new(epoch_seconds(window.start), epoch_seconds(window.end)),
            current: AxisRange::new(0.0, 0.0),
            voltage: AxisRange::new(0.0, 0.0),
        }
    }
}

/// Plot ranges for the three axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMargins {
    /// Padded time range (epoch seconds)
    pub time: AxisRange,
    /// Padded and clamped current range (nA)
    pub current: AxisRange,
    /// Voltage envelope (V)
    pub voltage: AxisRange,
}

/// Compute plot ranges from an extent.
///
/// - time: padded by 5% of the span on each side
/// - current: each side sits at `-1`/`1` nA while the data stays within that
///   bound, at `0` when all the data lies on the other side of zero, and is
///   padded by 2.5% of the span otherwise
/// - voltage: `[0, 200]` or `[-200, 0]` when every value is below 200 V in
///   magnitude and of one sign, `[-1100, 1100]` otherwise
pub fn compute_margins(extent: &SeriesExtent) -> AxisMargins {
    let time_pad = extent.time.span() * TIME_PAD_FRACTION;
    let time = AxisRange::new(extent.time.min - time_pad, extent.time.max + time_pad);

    let current_pad = extent.current.span() * CURRENT_PAD_FRACTION;
    let AxisRange { min: imin, max: imax } = extent.current;
    let lower = if imin > 0.0 {
        0.0
    } else if imin < -MIN_CURRENT_SPAN {
        imin - current_pad
    } else {
        -MIN_CURRENT_SPAN
    };
    let upper = if imax < 0.0 {
        0.0
    } else if imax > MIN_CURRENT_SPAN {
        imax + current_pad
    } else {
        MIN_CURRENT_SPAN
    };
    let current = AxisRange::new(lower, upper);

    let AxisRange { min: vmin, max: vmax } = extent.voltage;
    let low = vmin > -LOW_VOLTAGE_LIMIT && vmax < LOW_VOLTAGE_LIMIT;
    let voltage = if low && vmin >= 0.0 {
        AxisRange::new(0.0, LOW_VOLTAGE_LIMIT)
    } else if low && vmax <= 0.0 {
        AxisRange::new(-LOW_VOLTAGE_LIMIT, 0.0)
    } else {
        AxisRange::new(-FULL_VOLTAGE_LIMIT, FULL_VOLTAGE_LIMIT)
    };

    AxisMargins {
        time,
        current,
        voltage,
    }
}
