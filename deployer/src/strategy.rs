//! The publish strategy seam.
//!
//! The executor hands each deployment unit to a [`PublishStrategy`] as a
//! [`PublishRequest`]: the descriptor file, the optional main artefact file
//! and every attached artefact with its type and classifier. Where the files
//! end up (a local repository, a remote one) is the strategy's business.

use crate::grouping::DeploymentUnit;
use crate::pom::Coordinates;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Error returned by a strategy that could not publish a unit.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StrategyError {
    message: String,
    #[source]
    source: Option<std::io::Error>,
}

impl StrategyError {
    /// Create an error carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error caused by an I/O failure.
    #[must_use]
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self {
            message: message.into(),
            source: Some(source),
        }
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// An attached artefact as seen by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    /// The file to publish.
    pub file: Utf8PathBuf,
    /// The artefact type.
    pub artefact_type: String,
    /// The file extension.
    pub extension: String,
    /// The classifier, if any.
    pub classifier: Option<String>,
}

/// Everything a strategy needs to publish one deployment unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Name of the unit being published.
    pub unit: String,
    /// Coordinates taken from the unit's template.
    pub coordinates: Coordinates,
    /// The written descriptor file.
    pub descriptor_file: Utf8PathBuf,
    /// The main artefact file and its extension, when the unit has one.
    pub main_artefact: Option<(Utf8PathBuf, String)>,
    /// Attached artefacts in unit order.
    pub attached: Vec<AttachedFile>,
}

impl PublishRequest {
    /// Build the request for `unit`.
    #[must_use]
    pub fn for_unit(unit: &DeploymentUnit) -> Self {
        Self {
            unit: unit.name().to_owned(),
            coordinates: unit.pom().coordinates().clone(),
            descriptor_file: unit.descriptor_artefact().file().to_owned(),
            main_artefact: unit.main_artefact().map(|main| {
                (
                    main.file().to_owned(),
                    main.descriptor().extension().to_owned(),
                )
            }),
            attached: unit
                .attached_artefacts()
                .iter()
                .map(|artefact| AttachedFile {
                    file: artefact.file().to_owned(),
                    artefact_type: artefact.descriptor().artefact_type().to_owned(),
                    extension: artefact.descriptor().extension().to_owned(),
                    classifier: artefact.descriptor().classifier().map(str::to_owned),
                })
                .collect(),
        }
    }
}

/// Publishes deployment units somewhere.
#[cfg_attr(test, mockall::automock)]
pub trait PublishStrategy {
    /// Publish the files described by `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`StrategyError`] when the unit could not be published.
    fn publish(&mut self, request: &PublishRequest) -> Result<(), StrategyError>;
}
