use crate::error::Result;
use crate::format::StreamDescriptor;
use crate::hw::SampleRateRange;

/// A hardware output endpoint whose format can be read and programmed.
///
/// Implementations hold a non-owning handle; every call goes through the
/// host API keyed by that handle.
pub trait Endpoint {
    fn nominal_sample_rate(&self) -> Result<f64>;
    fn set_nominal_sample_rate(&mut self, rate: f64) -> Result<()>;
    fn stream_format(&self) -> Result<StreamDescriptor>;
    fn set_stream_format(&mut self, descriptor: &StreamDescriptor) -> Result<()>;
    fn available_sample_rates(&self) -> Result<Vec<SampleRateRange>>;
}

impl<E: Endpoint + ?Sized> Endpoint for &mut E {
    fn nominal_sample_rate(&self) -> Result<f64> {
        (**self).nominal_sample_rate()
    }

    fn set_nominal_sample_rate(&mut self, rate: f64) -> Result<()> {
        (**self).set_nominal_sample_rate(rate)
    }

    fn stream_format(&self) -> Result<StreamDescriptor> {
        (**self).stream_format()
    }

    fn set_stream_format(&mut self, descriptor: &StreamDescriptor) -> Result<()> {
        (**self).set_stream_format(descriptor)
    }

    fn available_sample_rates(&self) -> Result<Vec<SampleRateRange>> {
        (**self).available_sample_rates()
    }
}
