//! Turns raw log lines into [`AudioFormat`] candidates.
//!
//! A line qualifies when it mentions both markers. Each value is then
//! captured with its own pattern, equivalent to
//! `<rate marker> = ([0-9.]+) kHz` and `<depth marker> = ([0-9]+) bit`.
//! Lines where either capture fails are skipped without error.

use crate::config::LogConfig;
use crate::format::AudioFormat;

pub const DEFAULT_SAMPLE_RATE_MARKER: &str = "asbdSampleRate";
pub const DEFAULT_BIT_DEPTH_MARKER: &str = "sdBitDepth";

const KHZ_UNIT: &str = " kHz";
const BIT_UNIT: &str = " bit";

#[derive(Debug, Clone)]
pub struct FormatExtractor {
    sample_rate_marker: String,
    bit_depth_marker: String,
    sample_rate_prefix: String,
    bit_depth_prefix: String,
}

impl Default for FormatExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE_MARKER, DEFAULT_BIT_DEPTH_MARKER)
    }
}

impl FormatExtractor {
    pub fn new(sample_rate_marker: &str, bit_depth_marker: &str) -> Self {
        Self {
            sample_rate_marker: sample_rate_marker.to_string(),
            bit_depth_marker: bit_depth_marker.to_string(),
            sample_rate_prefix: format!("{sample_rate_marker} = "),
            bit_depth_prefix: format!("{bit_depth_marker} = "),
        }
    }

    pub fn from_config(config: &LogConfig) -> Self {
        Self::new(&config.sample_rate_marker, &config.bit_depth_marker)
    }

    pub fn qualifies(&self, line: &str) -> bool {
        line.contains(&self.sample_rate_marker) && line.contains(&self.bit_depth_marker)
    }

    /// Parse one line. `None` for lines that do not qualify or do not match.
    pub fn extract(&self, line: &str) -> Option<AudioFormat> {
        if !self.qualifies(line) {
            return None;
        }

        let khz: f64 = capture(line, &self.sample_rate_prefix, is_decimal, KHZ_UNIT)?
            .parse()
            .ok()?;
        let bits: u32 = capture(line, &self.bit_depth_prefix, is_digit, BIT_UNIT)?
            .parse()
            .ok()?;

        Some(AudioFormat::new(khz * 1000.0, bits))
    }

    /// All candidates in `text`, in line order.
    pub fn extract_all(&self, text: &str) -> Vec<AudioFormat> {
        text.lines().filter_map(|line| self.extract(line)).collect()
    }
}

fn is_decimal(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// First `prefix` occurrence followed by a non-empty run of `accept` chars and
/// then `suffix`; returns the run.
fn capture<'a>(
    line: &'a str,
    prefix: &str,
    accept: fn(char) -> bool,
    suffix: &str,
) -> Option<&'a str> {
    line.match_indices(prefix).find_map(|(idx, _)| {
        let rest = &line[idx + prefix.len()..];
        let len = rest.find(|c: char| !accept(c)).unwrap_or(rest.len());
        (len > 0 && rest[len..].starts_with(suffix)).then(|| &rest[..len])
    })
}
