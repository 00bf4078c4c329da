/// Default jump ratio that marks a spike
pub const DEFAULT_JUMP_FACTOR: f64 = 100.0;

/// Accepted samples required before jump rejection kicks in
pub const DEFAULT_MIN_HISTORY: usize = 100;

/// Previous currents at or below this (nA) never trigger jump rejection
pub const DEFAULT_MIN_PREVIOUS_CURRENT: f64 = 0.01;

/// Known instrument artifact band in nA, inclusive on both ends
pub const DEFAULT_ARTIFACT_BAND: (f64, f64) = (230.0, 250.0);

/// Why a sample was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Implausible jump relative to the previous accepted current
    Jump,
    /// Current falls into the instrument artifact band
    ArtifactBand,
}

/// De-spiking heuristic for the current signal.
///
/// This is a lossy filter: it can hide genuine large transients, so it can be
/// switched off with [`SpikeFilter::disabled`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeFilter {
    /// Master switch
    pub enabled: bool,
    /// A candidate more than this many times the previous current is a spike
    pub jump_factor: f64,
    /// Jump rejection needs strictly more accepted samples than this
    pub min_history: usize,
    /// Jump rejection needs the previous current (nA) to exceed this in magnitude
    pub min_previous: f64,
    /// Currents (nA, absolute) inside this inclusive band are always dropped
    pub artifact_band: (f64, f64),
}

impl Default for SpikeFilter {
    fn default() -> Self {
        Self {
            enabled: true,
            jump_factor: DEFAULT_JUMP_FACTOR,
            min_history: DEFAULT_MIN_HISTORY,
            min_previous: DEFAULT_MIN_PREVIOUS_CURRENT,
            artifact_band: DEFAULT_ARTIFACT_BAND,
        }
    }
}

impl SpikeFilter {
    /// A filter that accepts everything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Judge a candidate current (nA).
    ///
    /// `accepted` is the number of samples already accepted for the device and
    /// `previous` the current of the last one.
    pub fn check(&self, accepted: usize, previous: Option<f64>, candidate: f64) -> Option<Rejection> {
        if !self.enabled {
            return None;
        }

        if let Some(previous) = previous {
            if accepted > self.min_history
                && previous.abs() * self.jump_factor < candidate.abs()
                && previous.abs() > self.min_previous
            {
                return Some(Rejection::Jump);
            }
        }

        let (low, high) = self.artifact_band;
        if (low..=high).contains(&candidate.abs()) {
            return Some(Rejection::ArtifactBand);
        }

        None
    }
}
