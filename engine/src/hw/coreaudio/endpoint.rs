#![cfg(target_os = "macos")]

use coreaudio_sys::{
    AudioDeviceID, AudioStreamBasicDescription, kAudioDevicePropertyNominalSampleRate,
    kAudioDevicePropertyStreamFormat, kAudioObjectPropertyScopeGlobal,
    kAudioObjectPropertyScopeOutput,
};
use tracing::debug;

use super::convert::{asbd_from_descriptor, descriptor_from_asbd};
use super::device::available_nominal_sample_rates;
use super::property;
use crate::error::Result;
use crate::format::StreamDescriptor;
use crate::hw::{DeviceInfo, Endpoint, SampleRateRange};

/// Output endpoint addressed by its HAL device id.
pub struct CoreAudioEndpoint {
    device_id: AudioDeviceID,
    name: String,
}

impl CoreAudioEndpoint {
    pub fn new(device: &DeviceInfo) -> Self {
        debug!(device = %device.name, id = device.id.0, "opened endpoint");
        Self {
            device_id: device.id.0,
            name: device.name.clone(),
        }
    }
}

impl Drop for CoreAudioEndpoint {
    fn drop(&mut self) {
        debug!(device = %self.name, "released endpoint");
    }
}

impl Endpoint for CoreAudioEndpoint {
    fn nominal_sample_rate(&self) -> Result<f64> {
        property::get::<f64>(
            self.device_id,
            kAudioDevicePropertyNominalSampleRate,
            kAudioObjectPropertyScopeGlobal,
            "get nominal sample rate",
        )
    }

    fn set_nominal_sample_rate(&mut self, rate: f64) -> Result<()> {
        property::set(
            self.device_id,
            kAudioDevicePropertyNominalSampleRate,
            kAudioObjectPropertyScopeGlobal,
            &rate,
            "set nominal sample rate",
        )
    }

    fn stream_format(&self) -> Result<StreamDescriptor> {
        let asbd = property::get::<AudioStreamBasicDescription>(
            self.device_id,
            kAudioDevicePropertyStreamFormat,
            kAudioObjectPropertyScopeOutput,
            "get stream format",
        )?;
        Ok(descriptor_from_asbd(&asbd))
    }

    fn set_stream_format(&mut self, descriptor: &StreamDescriptor) -> Result<()> {
        property::set(
            self.device_id,
            kAudioDevicePropertyStreamFormat,
            kAudioObjectPropertyScopeOutput,
            &asbd_from_descriptor(descriptor),
            "set stream format",
        )
    }

    fn available_sample_rates(&self) -> Result<Vec<SampleRateRange>> {
        available_nominal_sample_rates(self.device_id)
    }
}
