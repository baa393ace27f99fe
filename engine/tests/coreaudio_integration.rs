#![cfg(target_os = "macos")]

//! Smoke tests against real CoreAudio / CoreMIDI. Marked `#[ignore]` because
//! they need audio hardware and cannot run in headless CI.

#[cfg(test)]
mod tests {
    use ratesync_engine::broadcast::ControlChannel;
    use ratesync_engine::config::ControlConfig;
    use ratesync_engine::hw::coreaudio::{self, CoreAudioEndpoint, MidiClockChannel};
    use ratesync_engine::hw::{DeviceSelector, select_device};
    use ratesync_engine::{Endpoint, inspect};

    #[test]
    #[ignore = "requires CoreAudio hardware"]
    fn default_output_reports_its_format() {
        let devices = coreaudio::list_devices();
        assert!(!devices.is_empty(), "no CoreAudio devices found");

        let device = select_device(
            &devices,
            &DeviceSelector::Default,
            coreaudio::default_output_device(),
        )
        .expect("no output device found");
        assert!(device.output_channels > 0);

        let endpoint = CoreAudioEndpoint::new(&device);
        let rate = endpoint.nominal_sample_rate().expect("nominal sample rate");
        assert!(rate > 0.0);
        assert!(inspect::current_bit_depth(&endpoint) > 0);

        let ranges = endpoint.available_sample_rates().expect("available rates");
        assert!(inspect::is_sample_rate_supported(&ranges, rate));
    }

    #[test]
    #[ignore = "requires CoreMIDI"]
    fn midi_channel_opens_and_enumerates() {
        let channel = MidiClockChannel::open(&ControlConfig::default()).expect("CoreMIDI client");
        let names: Vec<String> = channel
            .destinations()
            .iter()
            .map(|d| channel.destination_name(d))
            .collect();
        assert_eq!(names.len(), MidiClockChannel::list_destinations().len());
    }
}
