#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use ratesync_engine::broadcast::ControlChannel;
use ratesync_engine::{
    DeviceId, DeviceInfo, Endpoint, Error, Result, SampleRateRange, StreamDescriptor,
};

pub fn bad_device() -> Error {
    Error::CoreAudio {
        operation: "fake write",
        status: i32::from_be_bytes(*b"!dev"),
    }
}

pub fn stereo(rate: f64, bits: u32) -> StreamDescriptor {
    StreamDescriptor {
        sample_rate: rate,
        format_id: u32::from_be_bytes(*b"lpcm"),
        format_flags: 0xC,
        bytes_per_packet: 2 * bits / 8,
        frames_per_packet: 1,
        bytes_per_frame: 2 * bits / 8,
        channels_per_frame: 2,
        bits_per_channel: bits,
    }
}

/// In-memory output device.
///
/// `ignore_format_writes` accepts but drops that many stream format writes.
/// With `accepted_bits` set, writes of any other depth are applied but read
/// back as 20 bit.
pub struct FakeEndpoint {
    pub rate: f64,
    pub descriptor: StreamDescriptor,
    pub ranges: Vec<SampleRateRange>,
    pub rate_writes: Vec<f64>,
    pub format_writes: Vec<StreamDescriptor>,
    pub ignore_format_writes: u32,
    pub accepted_bits: Option<Vec<u32>>,
}

impl FakeEndpoint {
    pub fn new(rate: f64, bits: u32) -> Self {
        Self {
            rate,
            descriptor: stereo(rate, bits),
            ranges: vec![
                SampleRateRange::fixed(44_100.0),
                SampleRateRange::fixed(48_000.0),
                SampleRateRange::fixed(88_200.0),
                SampleRateRange::fixed(96_000.0),
            ],
            rate_writes: Vec::new(),
            format_writes: Vec::new(),
            ignore_format_writes: 0,
            accepted_bits: None,
        }
    }

    pub fn writes(&self) -> usize {
        self.rate_writes.len() + self.format_writes.len()
    }
}

impl Endpoint for FakeEndpoint {
    fn nominal_sample_rate(&self) -> Result<f64> {
        Ok(self.rate)
    }

    fn set_nominal_sample_rate(&mut self, rate: f64) -> Result<()> {
        self.rate_writes.push(rate);
        self.rate = rate;
        self.descriptor.sample_rate = rate;
        Ok(())
    }

    fn stream_format(&self) -> Result<StreamDescriptor> {
        Ok(self.descriptor)
    }

    fn set_stream_format(&mut self, descriptor: &StreamDescriptor) -> Result<()> {
        self.format_writes.push(*descriptor);
        if self.ignore_format_writes > 0 {
            self.ignore_format_writes -= 1;
            return Ok(());
        }
        self.descriptor = *descriptor;
        if let Some(accepted) = &self.accepted_bits {
            if !accepted.contains(&descriptor.bits_per_channel) {
                self.descriptor.bits_per_channel = 20;
            }
        }
        Ok(())
    }

    fn available_sample_rates(&self) -> Result<Vec<SampleRateRange>> {
        Ok(self.ranges.clone())
    }
}

/// Control channel that records every message it is asked to send.
#[derive(Default)]
pub struct RecordingChannel {
    pub destinations: Vec<String>,
    pub failing: Vec<String>,
    pub sent: RefCell<Vec<(String, Vec<u8>)>>,
    pub enumerations: Cell<usize>,
}

impl RecordingChannel {
    pub fn with_destinations(names: &[&str]) -> Self {
        Self {
            destinations: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Number of broadcasts, counted by destination enumerations.
    pub fn pulses(&self) -> usize {
        self.enumerations.get()
    }
}

impl ControlChannel for RecordingChannel {
    type Destination = String;

    fn destinations(&self) -> Vec<String> {
        self.enumerations.set(self.enumerations.get() + 1);
        self.destinations.clone()
    }

    fn destination_name(&self, destination: &String) -> String {
        destination.clone()
    }

    fn send(&self, destination: &String, message: &[u8]) -> Result<()> {
        if self.failing.contains(destination) {
            return Err(Error::CoreMidi {
                operation: "send",
                status: -10830,
            });
        }
        self.sent
            .borrow_mut()
            .push((destination.clone(), message.to_vec()));
        Ok(())
    }
}

/// Log source that returns one scripted window per fetch, then nothing.
/// The closure owns its windows, so it outlives the borrowed input.
pub fn scripted(
    windows: &[&str],
) -> (impl FnMut(Duration) -> String + use<>, Rc<Cell<usize>>) {
    let mut queue: VecDeque<String> = windows.iter().map(|w| w.to_string()).collect();
    let fetches = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fetches);
    let source = move |_window: Duration| {
        counter.set(counter.get() + 1);
        queue.pop_front().unwrap_or_default()
    };
    (source, fetches)
}

pub fn device(name: &str) -> DeviceInfo {
    DeviceInfo {
        id: DeviceId(73),
        name: name.to_string(),
        input_channels: 0,
        output_channels: 2,
        sample_rate_ranges: vec![SampleRateRange::new(44_100.0, 96_000.0)],
    }
}
