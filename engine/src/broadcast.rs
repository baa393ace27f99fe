//! Timing pulse sent to every control-channel destination after a format
//! change. Fire-and-forget: send errors are logged and counted, nothing is
//! retried and nothing is acknowledged.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;

/// MIDI real-time timing clock.
pub const TIMING_CLOCK: u8 = 0xF8;

pub trait ControlChannel {
    type Destination;

    /// Destinations currently known to the host. Re-enumerated per pulse so
    /// that newly attached listeners are included.
    fn destinations(&self) -> Vec<Self::Destination>;

    fn destination_name(&self, destination: &Self::Destination) -> String;

    fn send(&self, destination: &Self::Destination, message: &[u8]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PulseReport {
    pub destinations: usize,
    pub delivered: usize,
}

pub struct SyncBroadcaster<C> {
    channel: C,
}

impl<C: ControlChannel> SyncBroadcaster<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// One pulse per destination. `sample_rate` is only used for logging.
    pub fn broadcast_clock_pulse(&self, sample_rate: f64) -> PulseReport {
        let message = [TIMING_CLOCK];
        let destinations = self.channel.destinations();
        let mut report = PulseReport {
            destinations: destinations.len(),
            delivered: 0,
        };

        for destination in &destinations {
            let name = self.channel.destination_name(destination);
            match self.channel.send(destination, &message) {
                Ok(()) => {
                    debug!(destination = %name, "clock pulse sent");
                    report.delivered += 1;
                }
                Err(e) => warn!(destination = %name, "clock pulse failed: {e}"),
            }
        }

        info!(
            sample_rate,
            destinations = report.destinations,
            delivered = report.delivered,
            "clock pulse broadcast"
        );
        report
    }
}
