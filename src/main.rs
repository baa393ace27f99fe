mod cli;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use ratesync_engine::config::Config;
use ratesync_engine::monitor::ChangeEvent;
use ratesync_engine::{FieldOutcome, Result};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = cli::Args::parse();
    logging::init(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// File (`--config` or RATESYNC_CONFIG), then env overrides, then
/// command-line device choice.
fn load_config(args: &cli::Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            Config::load(path)?
        }
        None => Config::default(),
    };
    config.apply_env();
    args.apply_device(&mut config.device);
    Ok(config)
}

#[cfg(target_os = "macos")]
fn run(args: &cli::Args) -> Result<()> {
    use ratesync_engine::hw::coreaudio::{self, CoreAudioEndpoint, MidiClockChannel};
    use ratesync_engine::hw::{DeviceSelector, select_device};
    use ratesync_engine::{Monitor, MonitorState, UnifiedLog};

    let config = load_config(args)?;
    let devices = coreaudio::list_devices();
    if args.list {
        print_devices(&devices, &MidiClockChannel::list_destinations());
        return Ok(());
    }

    let device = select_device(
        &devices,
        &DeviceSelector::from_config(&config.device),
        coreaudio::default_output_device(),
    )?;
    info!(
        device = %device.name,
        id = %device.id,
        outputs = device.output_channels,
        "selected output device"
    );

    let endpoint = CoreAudioEndpoint::new(&device);
    let channel = MidiClockChannel::open(&config.control)?;
    let source = UnifiedLog::new(&config.log);
    let mut monitor = Monitor::from_config(
        &config,
        source,
        endpoint,
        channel,
        MonitorState::new(Some(device)),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(monitor.run(shutdown_signal(), |event| report(event, args.json)));

    // endpoint handle and MIDI port are released here
    drop(monitor);
    info!("shut down");
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn run(args: &cli::Args) -> Result<()> {
    load_config(args)?;
    Err(ratesync_engine::Error::PlatformUnsupported("the CoreAudio backend"))
}

#[cfg(target_os = "macos")]
fn print_devices(devices: &[ratesync_engine::DeviceInfo], destinations: &[String]) {
    println!("Output devices:");
    for (index, device) in ratesync_engine::hw::select::eligible(devices).enumerate() {
        let ranges: Vec<String> = device
            .sample_rate_ranges
            .iter()
            .map(|r| r.to_string())
            .collect();
        println!(
            "  [{index}] {} ({} out) {}",
            device.name,
            device.output_channels,
            ranges.join(", ")
        );
    }
    println!("MIDI destinations:");
    if destinations.is_empty() {
        println!("  (none)");
    }
    for name in destinations {
        println!("  {name}");
    }
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn report(event: &ChangeEvent, json: bool) {
    let reconfiguration = &event.reconfiguration;
    for (field, outcome) in reconfiguration.outcomes() {
        if let FieldOutcome::Failed { reason, .. } = outcome {
            warn!(?field, ?reason, "device not updated");
        }
    }
    info!(
        previous = %event.previous,
        current = %event.current,
        succeeded = reconfiguration.succeeded(),
        attempted = reconfiguration.attempted(),
        attempts = reconfiguration.attempts_made(),
        pulses = event.pulse.delivered,
        "format change handled"
    );
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!("serializing change event: {e}"),
        }
    }
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                warn!("installing SIGTERM handler: {e}");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("shutdown requested");
}
