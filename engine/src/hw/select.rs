use crate::config::DeviceConfig;
use crate::error::{Error, Result};
use crate::hw::{DeviceId, DeviceInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSelector {
    /// System default output, else the first eligible device.
    Default,
    /// Position among devices with output channels.
    Index(usize),
    /// Exact name, else case-insensitive substring.
    Name(String),
}

impl DeviceSelector {
    pub fn from_config(config: &DeviceConfig) -> Self {
        match (&config.name, config.index) {
            (Some(name), _) => Self::Name(name.clone()),
            (None, Some(index)) => Self::Index(index),
            (None, None) => Self::Default,
        }
    }
}

/// Devices that can be selected: those with at least one output channel.
pub fn eligible(devices: &[DeviceInfo]) -> impl Iterator<Item = &DeviceInfo> {
    devices.iter().filter(|d| d.is_output())
}

pub fn select_device(
    devices: &[DeviceInfo],
    selector: &DeviceSelector,
    default_output: Option<DeviceId>,
) -> Result<DeviceInfo> {
    if eligible(devices).next().is_none() {
        return Err(Error::NoOutputDevices);
    }

    let found = match selector {
        DeviceSelector::Default => default_output
            .and_then(|id| eligible(devices).find(|d| d.id == id))
            .or_else(|| eligible(devices).next()),
        DeviceSelector::Index(index) => eligible(devices).nth(*index),
        DeviceSelector::Name(name) => {
            let needle = name.to_lowercase();
            eligible(devices)
                .find(|d| d.name == *name)
                .or_else(|| eligible(devices).find(|d| d.name.to_lowercase().contains(&needle)))
        }
    };

    found.cloned().ok_or_else(|| {
        Error::DeviceNotFound(match selector {
            DeviceSelector::Default => "default output".to_string(),
            DeviceSelector::Index(index) => format!("output device index {index}"),
            DeviceSelector::Name(name) => name.clone(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: u32, name: &str, inputs: u32, outputs: u32) -> DeviceInfo {
        DeviceInfo {
            id: DeviceId(id),
            name: name.to_string(),
            input_channels: inputs,
            output_channels: outputs,
            sample_rate_ranges: Vec::new(),
        }
    }

    fn devices() -> Vec<DeviceInfo> {
        vec![
            device(40, "MacBook Pro Microphone", 1, 0),
            device(47, "MacBook Pro Speakers", 0, 2),
            device(63, "USB DAC", 0, 2),
            device(71, "USB DAC Pro", 2, 8),
        ]
    }

    #[test]
    fn default_prefers_system_output() {
        let picked =
            select_device(&devices(), &DeviceSelector::Default, Some(DeviceId(63))).unwrap();
        assert_eq!(picked.id, DeviceId(63));
    }

    #[test]
    fn default_falls_back_to_first_output() {
        let picked =
            select_device(&devices(), &DeviceSelector::Default, Some(DeviceId(40))).unwrap();
        assert_eq!(picked.id, DeviceId(47));
        let picked = select_device(&devices(), &DeviceSelector::Default, None).unwrap();
        assert_eq!(picked.id, DeviceId(47));
    }

    #[test]
    fn index_skips_input_only_devices() {
        let picked = select_device(&devices(), &DeviceSelector::Index(0), None).unwrap();
        assert_eq!(picked.name, "MacBook Pro Speakers");
        assert!(matches!(
            select_device(&devices(), &DeviceSelector::Index(3), None),
            Err(Error::DeviceNotFound(_))
        ));
    }

    #[test]
    fn exact_name_beats_substring() {
        let picked =
            select_device(&devices(), &DeviceSelector::Name("USB DAC".into()), None).unwrap();
        assert_eq!(picked.id, DeviceId(63));
        let picked =
            select_device(&devices(), &DeviceSelector::Name("dac pro".into()), None).unwrap();
        assert_eq!(picked.id, DeviceId(71));
    }

    #[test]
    fn input_only_name_is_not_eligible() {
        assert!(matches!(
            select_device(&devices(), &DeviceSelector::Name("Microphone".into()), None),
            Err(Error::DeviceNotFound(name)) if name == "Microphone"
        ));
    }

    #[test]
    fn no_outputs_at_all() {
        let inputs = vec![device(1, "Mic", 1, 0)];
        assert!(matches!(
            select_device(&inputs, &DeviceSelector::Default, None),
            Err(Error::NoOutputDevices)
        ));
    }

    #[test]
    fn config_name_wins_over_index() {
        let config = DeviceConfig {
            name: Some("DAC".into()),
            index: Some(2),
        };
        assert_eq!(
            DeviceSelector::from_config(&config),
            DeviceSelector::Name("DAC".into())
        );
        assert_eq!(
            DeviceSelector::from_config(&DeviceConfig::default()),
            DeviceSelector::Default
        );
    }
}
