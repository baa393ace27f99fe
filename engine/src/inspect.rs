//! Read-only queries against an output endpoint.
//!
//! Reads never fail from the caller's point of view: an unreadable rate or
//! depth is reported as `0` ("unknown") and logged.

use tracing::{debug, warn};

use crate::error::Result;
use crate::hw::{Endpoint, SampleRateRange};

pub fn current_sample_rate<E: Endpoint + ?Sized>(endpoint: &E) -> f64 {
    endpoint.nominal_sample_rate().unwrap_or_else(|e| {
        warn!("reading nominal sample rate: {e}");
        0.0
    })
}

pub fn current_bit_depth<E: Endpoint + ?Sized>(endpoint: &E) -> u32 {
    match endpoint.stream_format() {
        Ok(descriptor) => descriptor.bits_per_channel,
        Err(e) => {
            warn!("reading stream format: {e}");
            0
        }
    }
}

pub fn supported_sample_rate_ranges<E: Endpoint + ?Sized>(
    endpoint: &E,
) -> Result<Vec<SampleRateRange>> {
    endpoint.available_sample_rates()
}

pub fn is_sample_rate_supported(ranges: &[SampleRateRange], rate: f64) -> bool {
    ranges.iter().any(|r| r.contains(rate))
}

/// Outcome of the optional pre-check before writing a sample rate.
#[derive(Debug, Clone, PartialEq)]
pub enum RateSupport {
    Supported,
    Unsupported(Vec<SampleRateRange>),
    /// Ranges could not be read, or the device advertised none.
    Unknown,
}

pub fn sample_rate_support<E: Endpoint + ?Sized>(endpoint: &E, rate: f64) -> RateSupport {
    match supported_sample_rate_ranges(endpoint) {
        Ok(ranges) if ranges.is_empty() => {
            debug!("device advertises no sample rate ranges");
            RateSupport::Unknown
        }
        Ok(ranges) if is_sample_rate_supported(&ranges, rate) => RateSupport::Supported,
        Ok(ranges) => RateSupport::Unsupported(ranges),
        Err(e) => {
            warn!("querying available sample rates: {e}");
            RateSupport::Unknown
        }
    }
}
