//! Publication of deployment units.
//!
//! Each unit runs through the same steps, one unit at a time:
//!
//! 1. before-deployment hooks;
//! 2. the descriptor is written from the unit's (possibly hook-modified)
//!    template;
//! 3. the logging capture is started;
//! 4. the publish strategy is called;
//! 5. the capture is stopped, whatever step 4 returned.
//!
//! A failure in any step abandons that unit only. The executor records it
//! in the [`PublicationReport`] and moves on.

use crate::artefact::descriptor::RawArtefact;
use crate::capture::{CaptureScope, LoggingCapture};
use crate::error::{DeployerError, Result};
use crate::grouping::DeploymentUnit;
use crate::hooks::HookBroadcaster;
use crate::strategy::{PublishRequest, PublishStrategy};
use log::{LevelFilter, info, warn};
use std::fs;

/// Verbosity the capture is started at unless configured otherwise.
pub const DEFAULT_CAPTURE_LEVEL: LevelFilter = LevelFilter::Info;

/// A unit that could not be published.
#[derive(Debug)]
pub struct UnitFailure {
    /// Name of the unit.
    pub unit: String,
    /// What went wrong.
    pub error: DeployerError,
}

/// Outcome of one publish cycle.
#[derive(Debug, Default)]
pub struct PublicationReport {
    /// Units published, in order.
    pub published: Vec<String>,
    /// Units abandoned, in order.
    pub failures: Vec<UnitFailure>,
    /// Artefacts no filter claimed.
    pub unclaimed: Vec<RawArtefact>,
}

impl PublicationReport {
    /// Whether every unit was published.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// The failure recorded for `unit`, if any.
    #[must_use]
    pub fn failure(&self, unit: &str) -> Option<&DeployerError> {
        self.failures
            .iter()
            .find(|failure| failure.unit == unit)
            .map(|failure| &failure.error)
    }
}

/// Collaborators used while publishing.
pub struct PublicationContext<'a> {
    /// Where units are published to.
    pub strategy: &'a mut dyn PublishStrategy,
    /// Capture wrapped around every strategy call.
    pub capture: &'a mut dyn LoggingCapture,
    /// Level the capture is started at.
    pub capture_level: LevelFilter,
}

impl<'a> PublicationContext<'a> {
    /// A context capturing at [`DEFAULT_CAPTURE_LEVEL`].
    pub fn new(
        strategy: &'a mut dyn PublishStrategy,
        capture: &'a mut dyn LoggingCapture,
    ) -> Self {
        Self {
            strategy,
            capture,
            capture_level: DEFAULT_CAPTURE_LEVEL,
        }
    }

    /// Override the capture level.
    #[must_use]
    pub fn with_capture_level(mut self, level: LevelFilter) -> Self {
        self.capture_level = level;
        self
    }
}

/// Runs hooks and the publish strategy for each unit.
pub struct PublicationExecutor<'a, 'c> {
    hooks: &'a mut HookBroadcaster,
    context: PublicationContext<'c>,
}

impl<'a, 'c> PublicationExecutor<'a, 'c> {
    /// Create an executor broadcasting to `hooks` and publishing through
    /// `context`.
    pub fn new(hooks: &'a mut HookBroadcaster, context: PublicationContext<'c>) -> Self {
        Self { hooks, context }
    }

    /// Publish `units` in order and report the outcome of each.
    pub fn execute(&mut self, units: Vec<DeploymentUnit>) -> PublicationReport {
        let mut report = PublicationReport::default();
        for mut unit in units {
            let name = unit.name().to_owned();
            match self.publish_unit(&mut unit) {
                Ok(()) => {
                    info!("published {name}");
                    report.published.push(name);
                }
                Err(error) => {
                    warn!("skipping {name}: {error}");
                    report.failures.push(UnitFailure { unit: name, error });
                }
            }
        }
        report
    }

    /// Run the full sequence for one unit.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::HookFailed`], [`DeployerError::DescriptorWrite`]
    /// or [`DeployerError::PublishFailed`] depending on the step that failed.
    pub fn publish_unit(&mut self, unit: &mut DeploymentUnit) -> Result<()> {
        self.hooks
            .invoke(unit)
            .map_err(|source| DeployerError::HookFailed {
                unit: unit.name().to_owned(),
                source,
            })?;
        write_descriptor(unit)?;

        let request = PublishRequest::for_unit(unit);
        let _scope = CaptureScope::begin(&mut *self.context.capture, self.context.capture_level);
        self.context
            .strategy
            .publish(&request)
            .map_err(|source| DeployerError::PublishFailed {
                unit: request.unit.clone(),
                source,
            })
    }
}

fn write_descriptor(unit: &DeploymentUnit) -> Result<()> {
    let path = unit.descriptor_artefact().file();
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, unit.pom().render())
    };
    write().map_err(|source| DeployerError::DescriptorWrite {
        path: path.to_owned(),
        source,
    })
}
