pub mod convert;
pub mod device;
pub mod endpoint;
pub mod midi;
mod property;

pub use self::device::{default_output_device, list_devices};
pub use self::endpoint::CoreAudioEndpoint;
pub use self::midi::MidiClockChannel;
