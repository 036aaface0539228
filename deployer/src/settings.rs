//! Publish settings and local repository resolution.
//!
//! Settings are read through a [`SettingsProvider`] every time they are
//! requested, so edits to the settings file between publish cycles are
//! picked up without restarting.

use crate::dirs::BaseDirs;
use crate::error::{DeployerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

/// Default repository location below the home directory.
pub const DEFAULT_REPOSITORY_DIR: &str = ".m2/repository";

/// Errors raised while reading publish settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}")]
    Read {
        /// The settings file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`PublishSettings`].
    #[error("failed to parse settings file {path}")]
    Parse {
        /// The settings file.
        path: Utf8PathBuf,
        /// The parser's error.
        #[source]
        source: toml::de::Error,
    },
}

/// Settings consulted when publishing.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PublishSettings {
    /// Overrides the local repository directory.
    pub local_repository: Option<Utf8PathBuf>,
    /// Whether remote strategies should avoid the network.
    pub offline: bool,
}

/// Loads [`PublishSettings`] on demand.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsProvider {
    /// Build a fresh settings object.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] when the settings cannot be read or parsed.
    fn build_settings(&self) -> std::result::Result<PublishSettings, SettingsError>;
}

/// Reads settings from a TOML file on every call.
///
/// A missing file yields the default settings.
#[derive(Debug, Clone)]
pub struct TomlSettingsProvider {
    path: Utf8PathBuf,
}

impl TomlSettingsProvider {
    /// Create a provider reading `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The settings file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl SettingsProvider for TomlSettingsProvider {
    fn build_settings(&self) -> std::result::Result<PublishSettings, SettingsError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no settings file at {}; using defaults", self.path);
                return Ok(PublishSettings::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Settings that always succeed with a fixed value.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings(pub PublishSettings);

impl SettingsProvider for StaticSettings {
    fn build_settings(&self) -> std::result::Result<PublishSettings, SettingsError> {
        Ok(self.0.clone())
    }
}

/// Resolves the local repository directory.
pub struct LocalRepositoryLocator<'a> {
    dirs: &'a dyn BaseDirs,
}

impl<'a> LocalRepositoryLocator<'a> {
    /// Create a locator falling back to the home directory from `dirs`.
    #[must_use]
    pub fn new(dirs: &'a dyn BaseDirs) -> Self {
        Self { dirs }
    }

    /// The configured repository, or `<home>/.m2/repository`.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::LocalRepositoryUnavailable`] when the
    /// settings name no repository and the home directory is unknown.
    pub fn locate(&self, settings: &PublishSettings) -> Result<Utf8PathBuf> {
        if let Some(path) = &settings.local_repository {
            return Ok(path.clone());
        }
        self.dirs
            .home_dir()
            .map(|home| home.join(DEFAULT_REPOSITORY_DIR))
            .ok_or_else(|| DeployerError::LocalRepositoryUnavailable {
                reason: "no local repository is configured and the home directory is unknown"
                    .to_owned(),
            })
    }
}
