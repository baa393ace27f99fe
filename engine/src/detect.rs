//! Change detection against the last observed format.

use serde::Serialize;

use crate::format::AudioFormat;
use crate::hw::DeviceInfo;

/// The monitor's only persistent state.
///
/// `current_format` tracks what the log last reported, not what the hardware
/// accepted. The selected device is fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct MonitorState {
    current_format: AudioFormat,
    selected_device: Option<DeviceInfo>,
}

impl MonitorState {
    pub fn new(selected_device: Option<DeviceInfo>) -> Self {
        Self {
            current_format: AudioFormat::UNKNOWN,
            selected_device,
        }
    }

    pub fn current_format(&self) -> AudioFormat {
        self.current_format
    }

    pub fn selected_device(&self) -> Option<&DeviceInfo> {
        self.selected_device.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormatChange {
    pub previous: AudioFormat,
    pub current: AudioFormat,
}

/// Exact comparison of `candidate` against the state. On a difference the
/// state is updated and the change returned.
pub fn detect(candidate: AudioFormat, state: &mut MonitorState) -> Option<FormatChange> {
    if candidate == state.current_format {
        return None;
    }
    let previous = std::mem::replace(&mut state.current_format, candidate);
    Some(FormatChange {
        previous,
        current: candidate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_is_a_change() {
        let mut state = MonitorState::default();
        let change = detect(AudioFormat::new(44_100.0, 16), &mut state).unwrap();
        assert!(change.previous.is_unknown());
        assert_eq!(state.current_format(), AudioFormat::new(44_100.0, 16));
    }

    #[test]
    fn repeated_candidate_is_not_a_change() {
        let mut state = MonitorState::default();
        let candidate = AudioFormat::new(96_000.0, 24);
        assert!(detect(candidate, &mut state).is_some());
        assert!(detect(candidate, &mut state).is_none());
        assert_eq!(state.current_format(), candidate);
    }

    #[test]
    fn comparison_is_exact() {
        let mut state = MonitorState::default();
        detect(AudioFormat::new(48_000.0, 24), &mut state);
        let change = detect(AudioFormat::new(48_000.5, 24), &mut state).unwrap();
        assert_eq!(change.previous, AudioFormat::new(48_000.0, 24));
        assert!(detect(AudioFormat::new(48_000.5, 32), &mut state).is_some());
    }

    #[test]
    fn selected_device_is_kept() {
        let state = MonitorState::new(None);
        assert!(state.selected_device().is_none());
        assert!(state.current_format().is_unknown());
    }
}
