use chrono::NaiveDateTime;

use super::Sample;

/// Per-device series under construction.
///
/// Owned by the caller and handed to the extractor by reference. Once an
/// extraction has populated it, further extractions leave it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesAccumulator {
    samples: Vec<Sample>,
    accepted: usize,
    last: Option<Sample>,
}

impl SeriesAccumulator {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds a finished series
    pub fn is_populated(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Number of measured samples accepted so far
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Current of the last accepted sample
    pub fn last_current(&self) -> Option<f64> {
        self.last.map(|s| s.current)
    }

    /// Push the start boundary, repeating the last known value (zero when none)
    pub fn open(&mut self, start: NaiveDateTime) {
        let (voltage, current) = self.last_values();
        self.samples.push(Sample::boundary(start, voltage, current));
    }

    /// Append a measured sample
    pub fn accept(&mut self, sample: Sample) {
        self.samples.push(sample);
        self.accepted += 1;
        self.last = Some(sample);
    }

    /// Push the end boundary, repeating the last accepted value (zero when none)
    pub fn close(&mut self, end: NaiveDateTime) {
        let (voltage, current) = self.last_values();
        self.samples.push(Sample::boundary(end, voltage, current));
    }

    /// Series so far
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Take the series
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    /// Drop everything
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn last_values(&self) -> (f64, f64) {
        self.last.map_or((0.0, 0.0), |s| (s.voltage, s.current))
    }
}
