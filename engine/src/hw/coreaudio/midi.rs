#![cfg(target_os = "macos")]

use coremidi::{Client, Destination, Destinations, OutputPort, PacketBuffer};
use tracing::info;

use crate::broadcast::ControlChannel;
use crate::config::ControlConfig;
use crate::error::{Error, Result};

/// CoreMIDI client plus one output port, used to pulse every destination.
pub struct MidiClockChannel {
    // Dropped before the client.
    output_port: OutputPort,
    _client: Client,
}

impl MidiClockChannel {
    pub fn open(config: &ControlConfig) -> Result<Self> {
        let client = Client::new(&config.client_name).map_err(|status| Error::CoreMidi {
            operation: "create client",
            status,
        })?;
        let output_port = client
            .output_port(&config.port_name)
            .map_err(|status| Error::CoreMidi {
                operation: "create output port",
                status,
            })?;
        info!(
            client = %config.client_name,
            port = %config.port_name,
            "CoreMIDI output ready"
        );
        Ok(Self {
            output_port,
            _client: client,
        })
    }

    pub fn list_destinations() -> Vec<String> {
        Destinations
            .into_iter()
            .map(|dest| dest.display_name().unwrap_or_default())
            .collect()
    }
}

impl ControlChannel for MidiClockChannel {
    type Destination = Destination;

    fn destinations(&self) -> Vec<Destination> {
        Destinations.into_iter().collect()
    }

    fn destination_name(&self, destination: &Destination) -> String {
        destination
            .display_name()
            .unwrap_or_else(|| "unnamed destination".to_string())
    }

    fn send(&self, destination: &Destination, message: &[u8]) -> Result<()> {
        let packet_buf = PacketBuffer::new(0, message);
        self.output_port
            .send(destination, &packet_buf)
            .map_err(|status| Error::CoreMidi {
                operation: "send",
                status,
            })
    }
}
