#[cfg(target_os = "macos")]
pub mod coreaudio;
pub mod error_fmt;
pub mod select;
pub mod traits;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::select::{DeviceSelector, select_device};
pub use self::traits::Endpoint;

/// Host handle of an audio device. Not owned; the OS may invalidate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Inclusive range of nominal sample rates a device advertises.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRateRange {
    pub min: f64,
    pub max: f64,
}

impl SampleRateRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn fixed(rate: f64) -> Self {
        Self::new(rate, rate)
    }

    pub fn contains(&self, rate: f64) -> bool {
        rate >= self.min && rate <= self.max
    }
}

impl fmt::Display for SampleRateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{} Hz", self.min)
        } else {
            write!(f, "{}-{} Hz", self.min, self.max)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub id: DeviceId,

    pub name: String,

    pub input_channels: u32,

    pub output_channels: u32,

    pub sample_rate_ranges: Vec<SampleRateRange>,
}

impl DeviceInfo {
    pub fn is_output(&self) -> bool {
        self.output_channels > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds_are_inclusive() {
        let range = SampleRateRange::new(44_100.0, 96_000.0);
        assert!(range.contains(44_100.0));
        assert!(range.contains(96_000.0));
        assert!(!range.contains(192_000.0));
        assert!(SampleRateRange::fixed(48_000.0).contains(48_000.0));
    }

    #[test]
    fn ranges_render_compactly() {
        assert_eq!(SampleRateRange::fixed(48_000.0).to_string(), "48000 Hz");
        assert_eq!(
            SampleRateRange::new(8_000.0, 192_000.0).to_string(),
            "8000-192000 Hz"
        );
    }
}
