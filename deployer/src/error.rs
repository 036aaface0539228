//! Error types for the deployer.
//!
//! Registration errors (`DuplicateName`, `UnknownFilter`) are returned to the
//! caller of the registry operation. Hook, descriptor and publish failures
//! are confined to a single deployment unit and recorded in the publication
//! report; the cycle carries on with the next unit.

use crate::hooks::HookError;
use crate::settings::SettingsError;
use crate::strategy::StrategyError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while collecting, grouping or publishing artefacts.
#[derive(Debug, Error)]
pub enum DeployerError {
    /// A filter with the same name is already registered.
    #[error("a filter named {name} is already registered")]
    DuplicateName {
        /// The clashing filter name.
        name: String,
    },

    /// The filter name cannot be used as part of a descriptor file name.
    #[error("filter name `{name}` must be a single non-empty path component")]
    InvalidFilterName {
        /// The rejected name.
        name: String,
    },

    /// No filter with the given name is registered.
    #[error("no filter named {name} is registered")]
    UnknownFilter {
        /// The name that was looked up.
        name: String,
    },

    /// The default filter always takes part in grouping.
    #[error("the default filter cannot be deactivated")]
    DefaultFilterPinned,

    /// Two artefacts in one deployment share a type and classifier.
    #[error(
        "deployment {unit} cannot have multiple artefacts with the same type and classifier; already have {existing}, trying to add {duplicate}"
    )]
    DuplicateArtefact {
        /// Name of the filter forming the deployment.
        unit: String,
        /// The artefact already claimed.
        existing: String,
        /// The artefact that clashed with it.
        duplicate: String,
    },

    /// Two packaging artefacts without a classifier matched one deployment.
    #[error(
        "deployment {unit} cannot have multiple main artefacts; already have {existing}, trying to add {duplicate}"
    )]
    MultipleMainArtefacts {
        /// Name of the filter forming the deployment.
        unit: String,
        /// The chosen main artefact.
        existing: String,
        /// The second candidate.
        duplicate: String,
    },

    /// A before-deployment hook rejected the unit.
    #[error("before-deployment hook failed for {unit}")]
    HookFailed {
        /// Name of the affected deployment unit.
        unit: String,
        /// The hook's error.
        #[source]
        source: HookError,
    },

    /// The descriptor file could not be written.
    #[error("failed to write descriptor {path}")]
    DescriptorWrite {
        /// Where the descriptor was being written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The publish strategy failed for a unit.
    #[error("publishing {unit} failed")]
    PublishFailed {
        /// Name of the affected deployment unit.
        unit: String,
        /// The strategy's error.
        #[source]
        source: StrategyError,
    },

    /// Publish settings could not be loaded.
    #[error("could not load publish settings")]
    SettingsLoad {
        /// The loader's error.
        #[source]
        source: SettingsError,
    },

    /// A publisher was asked to resolve dependencies.
    #[error("a publisher cannot be used to resolve dependencies; it can only publish artefacts")]
    ResolutionUnsupported,

    /// The local repository location could not be determined.
    #[error("could not determine the local repository: {reason}")]
    LocalRepositoryUnavailable {
        /// Why the location is unknown.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeployerError {
    /// Name of the deployment unit the error is confined to, if any.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        match self {
            Self::HookFailed { unit, .. }
            | Self::PublishFailed { unit, .. }
            | Self::DuplicateArtefact { unit, .. }
            | Self::MultipleMainArtefacts { unit, .. } => Some(unit),
            _ => None,
        }
    }
}

/// Result type alias using [`DeployerError`].
pub type Result<T> = std::result::Result<T, DeployerError>;
