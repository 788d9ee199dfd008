//! Step vocabulary and transition log for the join/leave workflows.
//!
//! Runs are strictly sequential and fail fast: the first failing step ends
//! the run, nothing is retried and nothing already applied on the device is
//! rolled back.

use std::fmt;

/// Steps of `join`, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStep {
    CheckLogin,
    DiscoverDevice,
    CheckCompatible,
    ProbeType,
    ResolveFleet,
    ProbeOsVersion,
    BuildConfig,
    Transmit,
    Done,
}

impl JoinStep {
    pub const SEQUENCE: [Self; 9] = [
        Self::CheckLogin,
        Self::DiscoverDevice,
        Self::CheckCompatible,
        Self::ProbeType,
        Self::ResolveFleet,
        Self::ProbeOsVersion,
        Self::BuildConfig,
        Self::Transmit,
        Self::Done,
    ];
}

/// Steps of `leave`, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveStep {
    DiscoverDevice,
    CheckCompatible,
    Transmit,
    Done,
}

impl LeaveStep {
    pub const SEQUENCE: [Self; 4] = [
        Self::DiscoverDevice,
        Self::CheckCompatible,
        Self::Transmit,
        Self::Done,
    ];
}

impl fmt::Display for JoinStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CheckLogin => "check login",
            Self::DiscoverDevice => "discover device",
            Self::CheckCompatible => "check compatibility",
            Self::ProbeType => "probe device type",
            Self::ResolveFleet => "resolve fleet",
            Self::ProbeOsVersion => "probe OS version",
            Self::BuildConfig => "build config",
            Self::Transmit => "configure device",
            Self::Done => "done",
        };
        f.write_str(label)
    }
}

impl fmt::Display for LeaveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::DiscoverDevice => "discover device",
            Self::CheckCompatible => "check compatibility",
            Self::Transmit => "deconfigure device",
            Self::Done => "done",
        };
        f.write_str(label)
    }
}

/// How a step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Failed(String),
}

/// One entry of the transition log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord<S> {
    pub step: S,
    pub outcome: StepOutcome,
}

/// Ordered log of every step a run attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunHistory<S> {
    records: Vec<StepRecord<S>>,
}

impl<S> Default for RunHistory<S> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<S: Copy + PartialEq> RunHistory<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(&mut self, step: S) {
        self.records.push(StepRecord {
            step,
            outcome: StepOutcome::Completed,
        });
    }

    pub fn failed(&mut self, step: S, error: &anyhow::Error) {
        self.records.push(StepRecord {
            step,
            outcome: StepOutcome::Failed(error.to_string()),
        });
    }

    #[must_use]
    pub fn records(&self) -> &[StepRecord<S>] {
        &self.records
    }

    /// Steps in the order they were attempted.
    #[must_use]
    pub fn steps(&self) -> Vec<S> {
        self.records.iter().map(|r| r.step).collect()
    }

    /// The step that ended the run, if it failed.
    #[must_use]
    pub fn failed_step(&self) -> Option<S> {
        self.records
            .iter()
            .find(|r| matches!(r.outcome, StepOutcome::Failed(_)))
            .map(|r| r.step)
    }
}
