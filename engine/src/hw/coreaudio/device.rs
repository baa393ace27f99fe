#![cfg(target_os = "macos")]

use coreaudio_sys::{
    AudioBufferList, AudioDeviceID, AudioObjectGetPropertyData, AudioObjectGetPropertyDataSize,
    AudioObjectPropertyAddress, AudioValueRange, CFRelease, CFStringGetCString, CFStringRef,
    OSStatus, UInt32, kAudioDevicePropertyAvailableNominalSampleRates,
    kAudioDevicePropertyDeviceNameCFString, kAudioDevicePropertyStreamConfiguration,
    kAudioHardwareNoError, kAudioHardwarePropertyDefaultOutputDevice,
    kAudioHardwarePropertyDevices, kAudioObjectPropertyElementMain,
    kAudioObjectPropertyScopeGlobal, kAudioObjectPropertyScopeInput,
    kAudioObjectPropertyScopeOutput, kAudioObjectSystemObject,
};
use std::mem;
use std::os::raw::c_void;
use std::ptr;
use tracing::warn;

use super::convert::range_from_value_range;
use super::property;
use crate::error::Result;
use crate::hw::{DeviceId, DeviceInfo, SampleRateRange};

/// Every HAL device, with channel counts and advertised nominal rates.
pub fn list_devices() -> Vec<DeviceInfo> {
    let device_ids = match get_device_ids() {
        Ok(ids) => ids,
        Err(e) => {
            warn!("enumerating audio devices: {e}");
            return Vec::new();
        }
    };

    let mut devices = Vec::with_capacity(device_ids.len());
    for id in device_ids {
        let name = get_device_name(id).unwrap_or_else(|| format!("Unknown ({})", id));
        let input_channels = get_channel_count(id, true);
        let output_channels = get_channel_count(id, false);
        let sample_rate_ranges = available_nominal_sample_rates(id).unwrap_or_else(|e| {
            warn!(device = %name, "reading available sample rates: {e}");
            Vec::new()
        });
        devices.push(DeviceInfo {
            id: DeviceId(id),
            name,
            input_channels,
            output_channels,
            sample_rate_ranges,
        });
    }
    devices
}

pub fn default_output_device() -> Option<DeviceId> {
    property::get::<AudioDeviceID>(
        kAudioObjectSystemObject,
        kAudioHardwarePropertyDefaultOutputDevice,
        kAudioObjectPropertyScopeGlobal,
        "get default output device",
    )
    .ok()
    .filter(|id| *id != 0)
    .map(DeviceId)
}

pub fn available_nominal_sample_rates(device_id: AudioDeviceID) -> Result<Vec<SampleRateRange>> {
    let ranges = property::get_array::<AudioValueRange>(
        device_id,
        kAudioDevicePropertyAvailableNominalSampleRates,
        kAudioObjectPropertyScopeGlobal,
        "get available nominal sample rates",
    )?;
    Ok(ranges.iter().map(range_from_value_range).collect())
}

fn get_device_ids() -> Result<Vec<AudioDeviceID>> {
    property::get_array::<AudioDeviceID>(
        kAudioObjectSystemObject,
        kAudioHardwarePropertyDevices,
        kAudioObjectPropertyScopeGlobal,
        "list devices",
    )
}

fn get_device_name(device_id: AudioDeviceID) -> Option<String> {
    let address = AudioObjectPropertyAddress {
        mSelector: kAudioDevicePropertyDeviceNameCFString,
        mScope: kAudioObjectPropertyScopeGlobal,
        mElement: kAudioObjectPropertyElementMain,
    };

    let mut cf_name: CFStringRef = ptr::null();
    let mut size: UInt32 = mem::size_of::<CFStringRef>() as UInt32;
    let status: OSStatus = unsafe {
        AudioObjectGetPropertyData(
            device_id,
            &address,
            0,
            ptr::null(),
            &mut size,
            &mut cf_name as *mut CFStringRef as *mut c_void,
        )
    };
    if status != kAudioHardwareNoError as OSStatus || cf_name.is_null() {
        return None;
    }

    let mut buf = [0i8; 256];
    let ok = unsafe { CFStringGetCString(cf_name, buf.as_mut_ptr(), buf.len() as _, 0x0800_0100) };
    unsafe { CFRelease(cf_name as *const c_void) };
    if ok == 0 {
        return None;
    }

    let c_str = unsafe { std::ffi::CStr::from_ptr(buf.as_ptr()) };
    c_str.to_str().ok().map(|s| s.to_owned())
}

/// Total channels over all buffers of the stream configuration.
fn get_channel_count(device_id: AudioDeviceID, input: bool) -> u32 {
    let scope = if input {
        kAudioObjectPropertyScopeInput
    } else {
        kAudioObjectPropertyScopeOutput
    };

    let address = AudioObjectPropertyAddress {
        mSelector: kAudioDevicePropertyStreamConfiguration,
        mScope: scope,
        mElement: kAudioObjectPropertyElementMain,
    };

    let mut size: UInt32 = 0;
    let status: OSStatus =
        unsafe { AudioObjectGetPropertyDataSize(device_id, &address, 0, ptr::null(), &mut size) };
    if status != kAudioHardwareNoError as OSStatus || size == 0 {
        return 0;
    }

    // AudioBufferList is variable length; read into raw bytes first.
    let mut buf: Vec<u8> = vec![0u8; size as usize];
    let status: OSStatus = unsafe {
        AudioObjectGetPropertyData(
            device_id,
            &address,
            0,
            ptr::null(),
            &mut size,
            buf.as_mut_ptr() as *mut c_void,
        )
    };
    if status != kAudioHardwareNoError as OSStatus {
        return 0;
    }

    let buffer_list = buf.as_ptr() as *const AudioBufferList;
    let n_buffers = unsafe { (*buffer_list).mNumberBuffers };
    let buffers_ptr = unsafe { (*buffer_list).mBuffers.as_ptr() };

    (0..n_buffers as usize)
        .map(|i| unsafe { (*buffers_ptr.add(i)).mNumberChannels })
        .sum()
}
