//! Attempt / verify / retry / rollback of a device's format.
//!
//! Each field runs its own small state machine:
//!
//! ```text
//! Skip                                   (already matches, no writes)
//! Attempting(n) --write ok--> Verifying(n) --readback ok--> Succeeded(n)
//!      |                           |
//!      +--write err---+------------+--mismatch
//!                     v
//!        n < max: backoff, Attempting(n + 1)
//!        n = max: rollback (bit depth only), Failed(n)
//! ```
//!
//! Pre-checks that can rule a field out (unsupported rate, unsupported bit
//! depth, unreadable descriptor) fail it before any attempt is spent.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RetryConfig;
use crate::error::Result;
use crate::format::{AudioFormat, BitDepth, StreamDescriptor};
use crate::hw::{Endpoint, SampleRateRange};
use crate::inspect::{self, RateSupport};

/// Hardware rates closer than this to the target are left alone.
pub const SAMPLE_RATE_TOLERANCE_HZ: f64 = 1.0;

pub fn sample_rate_matches(current: f64, target: f64) -> bool {
    (current - target).abs() <= SAMPLE_RATE_TOLERANCE_HZ
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Wait between a write and its readback.
    pub settle: Duration,
    /// Wait between a failed attempt and the next one.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            settle: Duration::from_millis(config.settle_ms),
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    SampleRate,
    BitDepth,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldState {
    Skip,
    Attempting { attempt: u32 },
    Verifying { attempt: u32 },
    Succeeded { attempts: u32 },
    Failed { attempts: u32, reason: FailureReason },
}

impl FieldState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Skip | Self::Succeeded { .. } | Self::Failed { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    UnsupportedSampleRate { supported: Vec<SampleRateRange> },
    UnsupportedBitDepth { supported: Vec<u32> },
    SnapshotUnavailable { error: String },
    Exhausted { last_error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldOutcome {
    Skipped,
    Succeeded {
        attempts: u32,
    },
    Failed {
        attempts: u32,
        reason: FailureReason,
        rolled_back: bool,
    },
}

impl FieldOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Skipped => 0,
            Self::Succeeded { attempts } | Self::Failed { attempts, .. } => *attempts,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    fn failed(attempts: u32, reason: FailureReason) -> Self {
        Self::Failed {
            attempts,
            reason,
            rolled_back: false,
        }
    }
}

/// Result of one reconfiguration, created per detected change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconfigurationReport {
    pub target: AudioFormat,
    pub sample_rate: FieldOutcome,
    pub bit_depth: FieldOutcome,
}

impl ReconfigurationReport {
    pub fn outcomes(&self) -> [(Field, &FieldOutcome); 2] {
        [
            (Field::SampleRate, &self.sample_rate),
            (Field::BitDepth, &self.bit_depth),
        ]
    }

    /// Fields that differed from the hardware. Skipped fields are excluded.
    pub fn fields_to_change(&self) -> Vec<Field> {
        self.outcomes()
            .into_iter()
            .filter(|(_, o)| !o.is_skipped())
            .map(|(f, _)| f)
            .collect()
    }

    pub fn succeeded_fields(&self) -> Vec<Field> {
        self.outcomes()
            .into_iter()
            .filter(|(_, o)| o.is_success())
            .map(|(f, _)| f)
            .collect()
    }

    pub fn attempted(&self) -> usize {
        self.fields_to_change().len()
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded_fields().len()
    }

    pub fn attempts_made(&self) -> u32 {
        self.sample_rate.attempts() + self.bit_depth.attempts()
    }
}

enum Check {
    Matched,
    Mismatch(String),
}

/// The per-field half of the machine: how to write, verify and undo.
trait FieldOps<E: Endpoint + ?Sized> {
    fn field(&self) -> Field;
    fn write(&mut self, endpoint: &mut E) -> Result<()>;
    fn check(&self, endpoint: &E) -> Check;
    /// Undo after exhausting retries. Returns whether anything was restored.
    fn rollback(&mut self, endpoint: &mut E) -> bool;
}

struct SampleRateOps {
    target: f64,
}

impl<E: Endpoint + ?Sized> FieldOps<E> for SampleRateOps {
    fn field(&self) -> Field {
        Field::SampleRate
    }

    fn write(&mut self, endpoint: &mut E) -> Result<()> {
        endpoint.set_nominal_sample_rate(self.target)
    }

    fn check(&self, endpoint: &E) -> Check {
        let actual = inspect::current_sample_rate(endpoint);
        if sample_rate_matches(actual, self.target) {
            Check::Matched
        } else {
            Check::Mismatch(format!(
                "device reports {actual} Hz, expected {} Hz",
                self.target
            ))
        }
    }

    fn rollback(&mut self, _endpoint: &mut E) -> bool {
        false
    }
}

struct BitDepthOps {
    snapshot: StreamDescriptor,
    depth: BitDepth,
}

impl<E: Endpoint + ?Sized> FieldOps<E> for BitDepthOps {
    fn field(&self) -> Field {
        Field::BitDepth
    }

    fn write(&mut self, endpoint: &mut E) -> Result<()> {
        endpoint.set_stream_format(&self.snapshot.with_bit_depth(self.depth))
    }

    fn check(&self, endpoint: &E) -> Check {
        let actual = inspect::current_bit_depth(endpoint);
        if actual == self.depth.bits() {
            Check::Matched
        } else {
            Check::Mismatch(format!(
                "device reports {actual} bit, expected {} bit",
                self.depth.bits()
            ))
        }
    }

    fn rollback(&mut self, endpoint: &mut E) -> bool {
        match endpoint.set_stream_format(&self.snapshot) {
            Ok(()) => {
                warn!(
                    bits = self.snapshot.bits_per_channel,
                    "restored previous stream format"
                );
                true
            }
            Err(e) => {
                warn!("restoring previous stream format: {e}");
                false
            }
        }
    }
}

struct FieldMachine<O> {
    ops: O,
    policy: RetryPolicy,
    state: FieldState,
    rolled_back: bool,
}

impl<O> FieldMachine<O> {
    fn new(ops: O, policy: RetryPolicy) -> Self {
        Self {
            ops,
            policy,
            state: FieldState::Attempting { attempt: 1 },
            rolled_back: false,
        }
    }

    fn step<E>(&mut self, endpoint: &mut E)
    where
        E: Endpoint + ?Sized,
        O: FieldOps<E>,
    {
        match self.state {
            FieldState::Attempting { attempt } => {
                debug!(field = ?self.ops.field(), attempt, "writing");
                match self.ops.write(endpoint) {
                    Ok(()) => self.state = FieldState::Verifying { attempt },
                    Err(e) => self.attempt_failed(endpoint, attempt, e.to_string()),
                }
            }
            FieldState::Verifying { attempt } => {
                pause(self.policy.settle);
                match self.ops.check(endpoint) {
                    Check::Matched => self.state = FieldState::Succeeded { attempts: attempt },
                    Check::Mismatch(msg) => self.attempt_failed(endpoint, attempt, msg),
                }
            }
            _ => {}
        }
    }

    fn attempt_failed<E>(&mut self, endpoint: &mut E, attempt: u32, error: String)
    where
        E: Endpoint + ?Sized,
        O: FieldOps<E>,
    {
        warn!(
            field = ?self.ops.field(),
            attempt,
            max_attempts = self.policy.max_attempts,
            "attempt failed: {error}"
        );
        if attempt < self.policy.max_attempts {
            pause(self.policy.backoff);
            self.state = FieldState::Attempting {
                attempt: attempt + 1,
            };
        } else {
            self.rolled_back = self.ops.rollback(endpoint);
            self.state = FieldState::Failed {
                attempts: attempt,
                reason: FailureReason::Exhausted { last_error: error },
            };
        }
    }

    fn run<E>(mut self, endpoint: &mut E) -> FieldOutcome
    where
        E: Endpoint + ?Sized,
        O: FieldOps<E>,
    {
        while !self.state.is_terminal() {
            self.step(endpoint);
        }
        match self.state {
            FieldState::Succeeded { attempts } => FieldOutcome::Succeeded { attempts },
            FieldState::Failed { attempts, reason } => FieldOutcome::Failed {
                attempts,
                reason,
                rolled_back: self.rolled_back,
            },
            _ => FieldOutcome::Skipped,
        }
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}

/// Drives both fields of a target format onto an endpoint.
#[derive(Debug, Clone, Default)]
pub struct Reconfigurator {
    policy: RetryPolicy,
}

impl Reconfigurator {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Sample rate first, then bit depth. The two are independent: a failed
    /// rate does not stop the depth attempt.
    pub fn apply<E: Endpoint + ?Sized>(
        &self,
        endpoint: &mut E,
        target: AudioFormat,
    ) -> ReconfigurationReport {
        let report = ReconfigurationReport {
            target,
            sample_rate: self.reconfigure_sample_rate(endpoint, target.sample_rate_hz),
            bit_depth: self.reconfigure_bit_depth(endpoint, target.bit_depth),
        };
        for (field, outcome) in report.outcomes() {
            match outcome {
                FieldOutcome::Skipped => debug!(?field, "already matches"),
                FieldOutcome::Succeeded { attempts } => info!(?field, attempts, "updated"),
                FieldOutcome::Failed {
                    attempts,
                    reason,
                    rolled_back,
                } => warn!(?field, attempts, rolled_back, ?reason, "update failed"),
            }
        }
        report
    }

    pub fn reconfigure_sample_rate<E: Endpoint + ?Sized>(
        &self,
        endpoint: &mut E,
        target: f64,
    ) -> FieldOutcome {
        let current = inspect::current_sample_rate(endpoint);
        if sample_rate_matches(current, target) {
            return FieldOutcome::Skipped;
        }

        match inspect::sample_rate_support(endpoint, target) {
            RateSupport::Supported => {}
            RateSupport::Unknown => debug!(rate = target, "rate support unknown, trying anyway"),
            RateSupport::Unsupported(supported) => {
                let listed: Vec<String> = supported.iter().map(|r| r.to_string()).collect();
                warn!(
                    rate = target,
                    supported = %listed.join(", "),
                    "sample rate not supported by device"
                );
                return FieldOutcome::failed(0, FailureReason::UnsupportedSampleRate { supported });
            }
        }

        FieldMachine::new(SampleRateOps { target }, self.policy).run(endpoint)
    }

    pub fn reconfigure_bit_depth<E: Endpoint + ?Sized>(
        &self,
        endpoint: &mut E,
        target: u32,
    ) -> FieldOutcome {
        let snapshot = endpoint.stream_format();
        let current = snapshot.as_ref().map(|d| d.bits_per_channel).unwrap_or(0);
        if current == target {
            return FieldOutcome::Skipped;
        }

        let depth = match BitDepth::try_from(target) {
            Ok(depth) => depth,
            Err(e) => {
                warn!("{e}");
                return FieldOutcome::failed(
                    0,
                    FailureReason::UnsupportedBitDepth {
                        supported: BitDepth::ALL.iter().map(|d| d.bits()).collect(),
                    },
                );
            }
        };

        let snapshot = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("cannot snapshot stream format: {e}");
                return FieldOutcome::failed(
                    0,
                    FailureReason::SnapshotUnavailable {
                        error: e.to_string(),
                    },
                );
            }
        };

        FieldMachine::new(BitDepthOps { snapshot, depth }, self.policy).run(endpoint)
    }
}
