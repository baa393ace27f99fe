#![cfg(target_os = "macos")]

use coreaudio_sys::{AudioStreamBasicDescription, AudioValueRange};

use crate::format::StreamDescriptor;
use crate::hw::SampleRateRange;

pub fn descriptor_from_asbd(asbd: &AudioStreamBasicDescription) -> StreamDescriptor {
    StreamDescriptor {
        sample_rate: asbd.mSampleRate,
        format_id: asbd.mFormatID,
        format_flags: asbd.mFormatFlags,
        bytes_per_packet: asbd.mBytesPerPacket,
        frames_per_packet: asbd.mFramesPerPacket,
        bytes_per_frame: asbd.mBytesPerFrame,
        channels_per_frame: asbd.mChannelsPerFrame,
        bits_per_channel: asbd.mBitsPerChannel,
    }
}

pub fn asbd_from_descriptor(descriptor: &StreamDescriptor) -> AudioStreamBasicDescription {
    AudioStreamBasicDescription {
        mSampleRate: descriptor.sample_rate,
        mFormatID: descriptor.format_id,
        mFormatFlags: descriptor.format_flags,
        mBytesPerPacket: descriptor.bytes_per_packet,
        mFramesPerPacket: descriptor.frames_per_packet,
        mBytesPerFrame: descriptor.bytes_per_frame,
        mChannelsPerFrame: descriptor.channels_per_frame,
        mBitsPerChannel: descriptor.bits_per_channel,
        mReserved: 0,
    }
}

pub fn range_from_value_range(range: &AudioValueRange) -> SampleRateRange {
    SampleRateRange::new(range.mMinimum, range.mMaximum)
}
