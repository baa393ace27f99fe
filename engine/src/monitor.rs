//! The polling loop: fetch → extract → detect → reconfigure → pulse.
//!
//! Ticks run on the caller's thread and never overlap. A tick that takes
//! longer than the poll interval delays the next one instead of bursting.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, debug_span, info, warn};

use crate::broadcast::{ControlChannel, PulseReport, SyncBroadcaster};
use crate::config::{Config, MonitorConfig};
use crate::detect::{MonitorState, detect};
use crate::extract::FormatExtractor;
use crate::format::AudioFormat;
use crate::hw::Endpoint;
use crate::log_source::LogSource;
use crate::reconfigure::{ReconfigurationReport, Reconfigurator, RetryPolicy};

/// Floor for the poll period; a zero interval would spin.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    pub log_window: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self::from(&MonitorConfig::default())
    }
}

impl From<&MonitorConfig> for MonitorSettings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            log_window: config.log_window(),
        }
    }
}

/// Everything that happened for one detected change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub previous: AudioFormat,
    pub current: AudioFormat,
    pub device: Option<String>,
    pub reconfiguration: ReconfigurationReport,
    pub pulse: PulseReport,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    /// Lines that produced a format, changed or not.
    pub candidates: usize,
    pub changes: Vec<ChangeEvent>,
}

pub struct Monitor<L, E, C> {
    source: L,
    extractor: FormatExtractor,
    state: MonitorState,
    endpoint: E,
    reconfigurator: Reconfigurator,
    broadcaster: SyncBroadcaster<C>,
    settings: MonitorSettings,
}

impl<L, E, C> Monitor<L, E, C>
where
    L: LogSource,
    E: Endpoint,
    C: ControlChannel,
{
    pub fn new(source: L, endpoint: E, channel: C, state: MonitorState) -> Self {
        Self {
            source,
            extractor: FormatExtractor::default(),
            state,
            endpoint,
            reconfigurator: Reconfigurator::default(),
            broadcaster: SyncBroadcaster::new(channel),
            settings: MonitorSettings::default(),
        }
    }

    pub fn from_config(
        config: &Config,
        source: L,
        endpoint: E,
        channel: C,
        state: MonitorState,
    ) -> Self {
        Self::new(source, endpoint, channel, state)
            .with_extractor(FormatExtractor::from_config(&config.log))
            .with_reconfigurator(Reconfigurator::new(RetryPolicy::from(&config.retry)))
            .with_settings(MonitorSettings::from(&config.monitor))
    }

    pub fn with_extractor(mut self, extractor: FormatExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_reconfigurator(mut self, reconfigurator: Reconfigurator) -> Self {
        self.reconfigurator = reconfigurator;
        self
    }

    pub fn with_settings(mut self, settings: MonitorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn broadcaster(&self) -> &SyncBroadcaster<C> {
        &self.broadcaster
    }

    /// One pass over the current log window.
    pub fn tick(&mut self) -> TickSummary {
        let span = debug_span!("tick");
        let _enter = span.enter();

        let text = self.source.fetch_recent_events(self.settings.log_window);
        self.process_text(&text)
    }

    /// Every qualifying line is handled in order; each one that differs from
    /// the last observed format triggers its own reconfiguration and pulse.
    pub fn process_text(&mut self, text: &str) -> TickSummary {
        let mut summary = TickSummary::default();
        for candidate in self.extractor.extract_all(text) {
            summary.candidates += 1;
            let Some(change) = detect(candidate, &mut self.state) else {
                continue;
            };
            info!(
                previous = %change.previous,
                current = %change.current,
                "audio format changed"
            );

            let reconfiguration = self.reconfigurator.apply(&mut self.endpoint, change.current);
            info!(
                succeeded = reconfiguration.succeeded(),
                attempted = reconfiguration.attempted(),
                "reconfiguration finished"
            );
            let pulse = self
                .broadcaster
                .broadcast_clock_pulse(change.current.sample_rate_hz);

            summary.changes.push(ChangeEvent {
                previous: change.previous,
                current: change.current,
                device: self.state.selected_device().map(|d| d.name.clone()),
                reconfiguration,
                pulse,
            });
        }
        debug!(
            candidates = summary.candidates,
            changes = summary.changes.len(),
            "tick done"
        );
        summary
    }

    /// Tick immediately, then every poll interval, until `shutdown` resolves.
    /// A tick in progress is never interrupted.
    pub async fn run<F, H>(&mut self, shutdown: F, mut on_change: H)
    where
        F: Future<Output = ()>,
        H: FnMut(&ChangeEvent),
    {
        let period = self.settings.poll_interval.max(MIN_POLL_INTERVAL);
        if period != self.settings.poll_interval {
            warn!(
                requested_ms = self.settings.poll_interval.as_millis() as u64,
                "poll interval too small, using {} ms",
                period.as_millis()
            );
        }
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            interval_ms = period.as_millis() as u64,
            "monitoring started"
        );
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    let summary = self.tick();
                    for change in &summary.changes {
                        on_change(change);
                    }
                }
            }
        }
        info!("monitoring stopped");
    }
}
