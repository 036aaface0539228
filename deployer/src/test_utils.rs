//! Shared test utilities for the deployer crate.
//!
//! The recording doubles write to a shared [`Journal`], so a test can
//! assert on the interleaving of hook calls, capture calls and publishes.

use crate::capture::LoggingCapture;
use crate::grouping::DeploymentUnit;
use crate::hooks::{DeploymentHook, HookError};
use crate::strategy::{PublishRequest, PublishStrategy, StrategyError};
use log::LevelFilter;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Ordered log of events shared between recording doubles.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    /// Create an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `event`.
    pub fn record(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }

    /// Every event recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Events starting with `prefix`.
    #[must_use]
    pub fn events_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter(|event| event.starts_with(prefix))
            .cloned()
            .collect()
    }
}

/// A `PublishStrategy` that records requests and fails for chosen units.
#[derive(Debug, Default)]
pub struct RecordingStrategy {
    journal: Journal,
    requests: Vec<PublishRequest>,
    failing_units: BTreeSet<String>,
}

impl RecordingStrategy {
    /// Create a strategy writing `publish:<unit>` events to `journal`.
    #[must_use]
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    /// Make publishing `unit` fail.
    pub fn fail_for(&mut self, unit: impl Into<String>) {
        self.failing_units.insert(unit.into());
    }

    /// Every request received, in order.
    #[must_use]
    pub fn requests(&self) -> &[PublishRequest] {
        &self.requests
    }

    /// Names of the units whose publish succeeded.
    #[must_use]
    pub fn published_units(&self) -> Vec<&str> {
        self.requests
            .iter()
            .map(|request| request.unit.as_str())
            .filter(|unit| !self.failing_units.contains(*unit))
            .collect()
    }
}

impl PublishStrategy for RecordingStrategy {
    fn publish(&mut self, request: &PublishRequest) -> Result<(), StrategyError> {
        self.journal.record(format!("publish:{}", request.unit));
        self.requests.push(request.clone());
        if self.failing_units.contains(&request.unit) {
            return Err(StrategyError::new(format!(
                "publishing {} was rejected",
                request.unit
            )));
        }
        Ok(())
    }
}

/// A `LoggingCapture` that records `start:<level>` and `stop` events.
#[derive(Debug, Default)]
pub struct RecordingCapture {
    journal: Journal,
    starts: usize,
    stops: usize,
}

impl RecordingCapture {
    /// Create a capture writing to `journal`.
    #[must_use]
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    /// Number of `start` calls.
    #[must_use]
    pub const fn starts(&self) -> usize {
        self.starts
    }

    /// Number of `stop` calls.
    #[must_use]
    pub const fn stops(&self) -> usize {
        self.stops
    }
}

impl LoggingCapture for RecordingCapture {
    fn start(&mut self, level: LevelFilter) {
        self.starts += 1;
        self.journal.record(format!("start:{level}"));
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.journal.record("stop");
    }
}

/// A `DeploymentHook` that records `hook:<label>:<unit>` events.
#[derive(Debug, Clone)]
pub struct RecordingHook {
    label: String,
    journal: Journal,
    failing_units: BTreeSet<String>,
}

impl RecordingHook {
    /// Create a hook named `label` writing to `journal`.
    #[must_use]
    pub fn new(label: impl Into<String>, journal: Journal) -> Self {
        Self {
            label: label.into(),
            journal,
            failing_units: BTreeSet::new(),
        }
    }

    /// Make the hook fail for `unit`.
    #[must_use]
    pub fn failing_for(mut self, unit: impl Into<String>) -> Self {
        self.failing_units.insert(unit.into());
        self
    }
}

impl DeploymentHook for RecordingHook {
    fn before_deployment(&mut self, unit: &mut DeploymentUnit) -> Result<(), HookError> {
        self.journal
            .record(format!("hook:{}:{}", self.label, unit.name()));
        if self.failing_units.contains(unit.name()) {
            return Err(HookError::new(format!(
                "hook {} rejected {}",
                self.label,
                unit.name()
            )));
        }
        Ok(())
    }
}
