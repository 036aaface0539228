//! Before-deployment hooks.
//!
//! Hooks run once per deployment unit, in registration order, immediately
//! before the unit is published. They receive the unit mutably and may
//! adjust its template or artefact lists. The first failing hook stops the
//! remaining hooks for that unit.

use crate::grouping::DeploymentUnit;
use log::trace;
use thiserror::Error;

/// Error returned by a hook that refuses a deployment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    /// Create a hook error carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Callback observing each deployment unit before it is published.
///
/// Implemented for every `FnMut(&mut DeploymentUnit) -> Result<(), HookError>`.
#[cfg_attr(test, mockall::automock)]
pub trait DeploymentHook {
    /// Inspect or adjust `unit` ahead of publication.
    ///
    /// # Errors
    ///
    /// Returns a [`HookError`] to abort publication of this unit.
    fn before_deployment(&mut self, unit: &mut DeploymentUnit) -> Result<(), HookError>;
}

impl<F> DeploymentHook for F
where
    F: FnMut(&mut DeploymentUnit) -> Result<(), HookError>,
{
    fn before_deployment(&mut self, unit: &mut DeploymentUnit) -> Result<(), HookError> {
        self(unit)
    }
}

/// Ordered list of hooks broadcast to every deployment unit.
#[derive(Default)]
pub struct HookBroadcaster {
    hooks: Vec<Box<dyn DeploymentHook>>,
}

impl std::fmt::Debug for HookBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookBroadcaster")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl HookBroadcaster {
    /// Create an empty broadcaster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook. The same hook may be registered more than once.
    pub fn register(&mut self, hook: impl DeploymentHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook against `unit`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`HookError`] raised; later hooks do not run.
    pub fn invoke(&mut self, unit: &mut DeploymentUnit) -> Result<(), HookError> {
        for (position, hook) in self.hooks.iter_mut().enumerate() {
            trace!("running before-deployment hook #{} for {}", position + 1, unit.name());
            hook.before_deployment(unit)?;
        }
        Ok(())
    }
}
