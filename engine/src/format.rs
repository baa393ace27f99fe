//! Value types describing an audio stream format.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sample rate and bit depth as reported by the player.
///
/// `AudioFormat::UNKNOWN` (0 Hz, 0 bit) is the state before the first
/// observation. Equality is exact; tolerance only applies when comparing
/// against hardware, see [`crate::reconfigure`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioFormat {
    pub sample_rate_hz: f64,
    pub bit_depth: u32,
}

impl AudioFormat {
    pub const UNKNOWN: Self = Self {
        sample_rate_hz: 0.0,
        bit_depth: 0,
    };

    pub fn new(sample_rate_hz: f64, bit_depth: u32) -> Self {
        Self {
            sample_rate_hz,
            bit_depth,
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz / {} bit", self.sample_rate_hz, self.bit_depth)
    }
}

/// The closed set of bit depths the engine can program into a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitDepth {
    Sixteen,
    TwentyFour,
    ThirtyTwo,
}

impl BitDepth {
    pub const ALL: [BitDepth; 3] = [BitDepth::Sixteen, BitDepth::TwentyFour, BitDepth::ThirtyTwo];

    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            16 => Some(Self::Sixteen),
            24 => Some(Self::TwentyFour),
            32 => Some(Self::ThirtyTwo),
            _ => None,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Self::Sixteen => 16,
            Self::TwentyFour => 24,
            Self::ThirtyTwo => 32,
        }
    }

    pub fn bytes(self) -> u32 {
        self.bits() / 8
    }
}

impl TryFrom<u32> for BitDepth {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        Self::from_bits(bits).ok_or(Error::UnsupportedBitDepth(bits))
    }
}

/// Full PCM stream format of a device stream.
///
/// Field-for-field copy of the HAL stream description so that a snapshot can
/// be written back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub sample_rate: f64,
    pub format_id: u32,
    pub format_flags: u32,
    pub bytes_per_packet: u32,
    pub frames_per_packet: u32,
    pub bytes_per_frame: u32,
    pub channels_per_frame: u32,
    pub bits_per_channel: u32,
}

impl StreamDescriptor {
    /// Copy of `self` re-laid out for `depth`: one interleaved frame per
    /// packet, `channels * bytes` per frame. Everything else is kept.
    pub fn with_bit_depth(&self, depth: BitDepth) -> Self {
        let bytes_per_frame = self.channels_per_frame * depth.bytes();
        Self {
            bits_per_channel: depth.bits(),
            bytes_per_frame,
            bytes_per_packet: bytes_per_frame,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo_float() -> StreamDescriptor {
        StreamDescriptor {
            sample_rate: 44_100.0,
            format_id: u32::from_be_bytes(*b"lpcm"),
            format_flags: 0x9,
            bytes_per_packet: 8,
            frames_per_packet: 1,
            bytes_per_frame: 8,
            channels_per_frame: 2,
            bits_per_channel: 32,
        }
    }

    #[test]
    fn bit_depth_accepts_only_closed_set() {
        assert_eq!(BitDepth::from_bits(16), Some(BitDepth::Sixteen));
        assert_eq!(BitDepth::from_bits(24), Some(BitDepth::TwentyFour));
        assert_eq!(BitDepth::from_bits(32), Some(BitDepth::ThirtyTwo));
        assert_eq!(BitDepth::from_bits(20), None);
        assert!(matches!(
            BitDepth::try_from(8),
            Err(Error::UnsupportedBitDepth(8))
        ));
    }

    #[test]
    fn derived_sizes_follow_channel_count() {
        let stereo = stereo_float().with_bit_depth(BitDepth::TwentyFour);
        assert_eq!(stereo.bits_per_channel, 24);
        assert_eq!(stereo.bytes_per_frame, 6);
        assert_eq!(stereo.bytes_per_packet, 6);

        let surround = StreamDescriptor {
            channels_per_frame: 6,
            ..stereo_float()
        }
        .with_bit_depth(BitDepth::Sixteen);
        assert_eq!(surround.bytes_per_frame, 12);
        assert_eq!(surround.bytes_per_packet, 12);
    }

    #[test]
    fn unrelated_fields_are_preserved() {
        let original = stereo_float();
        let changed = original.with_bit_depth(BitDepth::Sixteen);
        assert_eq!(changed.sample_rate, original.sample_rate);
        assert_eq!(changed.format_id, original.format_id);
        assert_eq!(changed.format_flags, original.format_flags);
        assert_eq!(changed.frames_per_packet, original.frames_per_packet);
        assert_eq!(changed.channels_per_frame, original.channels_per_frame);
    }

    #[test]
    fn unknown_format_is_the_zero_value() {
        assert!(AudioFormat::default().is_unknown());
        assert!(!AudioFormat::new(44_100.0, 16).is_unknown());
        assert_eq!(AudioFormat::new(96_000.0, 24).to_string(), "96000 Hz / 24 bit");
    }
}
