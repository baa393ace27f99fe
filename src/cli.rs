use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
use ratesync_engine::config::{CONFIG_ENV, DeviceConfig, JSON_ENV};

#[derive(Debug, Parser)]
#[command(name = "ratesync", version)]
#[command(about = "Follow a player's stream format on a CoreAudio output device")]
pub struct Args {
    /// Configuration file.
    #[arg(short, long, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Output device name or substring. Also RATESYNC_DEVICE.
    #[arg(short, long)]
    pub device: Option<String>,

    /// Output device by position in --list.
    #[arg(short, long, conflicts_with = "device")]
    pub index: Option<usize>,

    /// List output devices and MIDI destinations, then exit.
    #[arg(short, long)]
    pub list: bool,

    /// Print change events as JSON lines.
    #[arg(long, env = JSON_ENV, value_parser = FalseyValueParser::new())]
    pub json: bool,

    /// More logging, repeatable.
    #[arg(short, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// A device chosen on the command line replaces whatever the file and
    /// environment selected, name and index together.
    pub fn apply_device(&self, device: &mut DeviceConfig) {
        if self.device.is_some() || self.index.is_some() {
            device.name = self.device.clone();
            device.index = self.index;
        }
    }
}
