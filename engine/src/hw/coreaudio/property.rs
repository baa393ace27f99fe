#![cfg(target_os = "macos")]

//! Typed wrappers around `AudioObjectGet/SetPropertyData`.

use coreaudio_sys::{
    AudioObjectGetPropertyData, AudioObjectGetPropertyDataSize, AudioObjectID,
    AudioObjectPropertyAddress, AudioObjectPropertyScope, AudioObjectPropertySelector,
    AudioObjectSetPropertyData,
    AudioStreamBasicDescription, AudioValueRange, OSStatus, UInt32, kAudioHardwareNoError,
    kAudioObjectPropertyElementMain,
};

use std::mem;
use std::os::raw::c_void;
use std::ptr;

use crate::error::{Error, Result};

/// Types that may be read from the HAL as raw bytes.
///
/// # Safety
/// Implementors must be plain C data for which all-zero bytes are valid.
pub(super) unsafe trait PlainData: Copy {}

unsafe impl PlainData for f64 {}
unsafe impl PlainData for u32 {}
unsafe impl PlainData for AudioStreamBasicDescription {}
unsafe impl PlainData for AudioValueRange {}

fn address(
    selector: AudioObjectPropertySelector,
    scope: AudioObjectPropertyScope,
) -> AudioObjectPropertyAddress {
    AudioObjectPropertyAddress {
        mSelector: selector,
        mScope: scope,
        mElement: kAudioObjectPropertyElementMain,
    }
}

fn check(status: OSStatus, operation: &'static str) -> Result<()> {
    if status == kAudioHardwareNoError as OSStatus {
        Ok(())
    } else {
        Err(Error::core_audio(operation, status))
    }
}

pub(super) fn get<T: PlainData>(
    object: AudioObjectID,
    selector: AudioObjectPropertySelector,
    scope: AudioObjectPropertyScope,
    operation: &'static str,
) -> Result<T> {
    let address = address(selector, scope);
    let mut value: T = unsafe { mem::zeroed() };
    let mut size: UInt32 = mem::size_of::<T>() as UInt32;
    let status: OSStatus = unsafe {
        AudioObjectGetPropertyData(
            object,
            &address,
            0,
            ptr::null(),
            &mut size,
            &mut value as *mut T as *mut c_void,
        )
    };
    check(status, operation)?;
    Ok(value)
}

pub(super) fn set<T: PlainData>(
    object: AudioObjectID,
    selector: AudioObjectPropertySelector,
    scope: AudioObjectPropertyScope,
    value: &T,
    operation: &'static str,
) -> Result<()> {
    let address = address(selector, scope);
    let status: OSStatus = unsafe {
        AudioObjectSetPropertyData(
            object,
            &address,
            0,
            ptr::null(),
            mem::size_of::<T>() as UInt32,
            value as *const T as *const c_void,
        )
    };
    check(status, operation)
}

pub(super) fn get_array<T: PlainData>(
    object: AudioObjectID,
    selector: AudioObjectPropertySelector,
    scope: AudioObjectPropertyScope,
    operation: &'static str,
) -> Result<Vec<T>> {
    let address = address(selector, scope);
    let mut size: UInt32 = 0;
    let status: OSStatus =
        unsafe { AudioObjectGetPropertyDataSize(object, &address, 0, ptr::null(), &mut size) };
    check(status, operation)?;

    let count = size as usize / mem::size_of::<T>();
    if count == 0 {
        return Ok(Vec::new());
    }
    let mut items: Vec<T> = vec![unsafe { mem::zeroed() }; count];
    let status: OSStatus = unsafe {
        AudioObjectGetPropertyData(
            object,
            &address,
            0,
            ptr::null(),
            &mut size,
            items.as_mut_ptr() as *mut c_void,
        )
    };
    check(status, operation)?;

    items.truncate(size as usize / mem::size_of::<T>());
    Ok(items)
}
