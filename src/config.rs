//! Workspace configuration loaded from `publican.toml`.
//!
//! The file names the default descriptor template, where generated
//! descriptors are written, the verbosity used while a unit is being
//! published and, optionally, the publish settings file. Every key is
//! optional; a missing file yields [`PublicanConfig::default`]. The capture
//! level accepts any `log` level name, case-insensitively.
//!
//! ```toml
//! capture_level = "debug"
//! pom_dir = "target/poms"
//! settings_file = "publish-settings.toml"
//!
//! [project]
//! group_id = "org.example"
//! artifact_id = "app"
//! version = "1.0"
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use log::LevelFilter;
use publican_deployer::dirs::{BaseDirs, SystemBaseDirs};
use publican_deployer::error::DeployerError;
use publican_deployer::install::LocalInstallStrategy;
use publican_deployer::pom::PomTemplate;
use publican_deployer::publisher::Publisher;
use publican_deployer::settings::TomlSettingsProvider;
use serde::Deserialize;
use thiserror::Error;

/// Name of the workspace configuration file.
pub const CONFIG_FILE_NAME: &str = "publican.toml";

/// Errors raised while loading the workspace configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// The configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for [`PublicanConfig`].
    #[error("failed to parse workspace configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configured publisher could not provide what was asked of it.
    #[error(transparent)]
    Deployer(#[from] DeployerError),
}

/// Workspace-level settings for publishing.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PublicanConfig {
    /// Verbosity while a unit is published.
    pub capture_level: LevelFilter,
    /// Directory receiving generated descriptors.
    pub pom_dir: Utf8PathBuf,
    /// Optional publish settings file, re-read on every settings query.
    pub settings_file: Option<Utf8PathBuf>,
    /// Template used by the default filter.
    pub project: PomTemplate,
}

impl Default for PublicanConfig {
    fn default() -> Self {
        Self {
            capture_level: Self::default_capture_level(),
            pom_dir: Self::default_pom_dir(),
            settings_file: None,
            project: PomTemplate::default(),
        }
    }
}

impl PublicanConfig {
    const fn default_capture_level() -> LevelFilter {
        LevelFilter::Info
    }

    fn default_pom_dir() -> Utf8PathBuf {
        Utf8PathBuf::from("build/publications")
    }

    /// Loads `publican.toml` from `workspace_root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file exists but cannot be read
    /// and [`ConfigError::Parse`] when its contents are invalid.
    pub fn load(workspace_root: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with(workspace_root, |path| match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_owned(),
                source,
            }),
        })
    }

    /// Loads configuration using the supplied loader.
    ///
    /// The loader receives the path of the configuration file inside
    /// `workspace_root`. Tests use this to supply contents without touching
    /// the file system.
    ///
    /// # Errors
    ///
    /// Returns whatever error the loader returns.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use publican::PublicanConfig;
    ///
    /// let config = PublicanConfig::load_with(Utf8Path::new("."), |path| {
    ///     assert!(path.ends_with("publican.toml"));
    ///     Ok(PublicanConfig::default())
    /// })
    /// .expect("stub loader succeeds");
    /// assert_eq!(config.capture_level, log::LevelFilter::Info);
    /// ```
    pub fn load_with<F>(workspace_root: &Utf8Path, loader: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> Result<Self, ConfigError>,
    {
        loader(&workspace_root.join(CONFIG_FILE_NAME))
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML, unknown keys or
    /// unknown capture levels.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Builds a [`Publisher`] configured from this file.
    ///
    /// Relative paths are resolved against `workspace_root`.
    #[must_use]
    pub fn publisher(&self, workspace_root: &Utf8Path) -> Publisher {
        let publisher = Publisher::new(self.project.clone(), workspace_root.join(&self.pom_dir))
            .with_capture_level(self.capture_level);
        match &self.settings_file {
            Some(settings) => {
                publisher.with_settings_provider(TomlSettingsProvider::new(workspace_root.join(settings)))
            }
            None => publisher,
        }
    }

    /// Builds the local install strategy for this workspace, using the
    /// platform home directory when the settings name no repository.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Deployer`] when the settings cannot be loaded
    /// or no repository location is known.
    pub fn local_install_strategy(
        &self,
        workspace_root: &Utf8Path,
    ) -> Result<LocalInstallStrategy, ConfigError> {
        self.local_install_strategy_with(workspace_root, &SystemBaseDirs::new())
    }

    /// Like [`Self::local_install_strategy`] with an explicit home-directory
    /// source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Deployer`] when the settings cannot be loaded
    /// or no repository location is known.
    pub fn local_install_strategy_with(
        &self,
        workspace_root: &Utf8Path,
        dirs: &dyn BaseDirs,
    ) -> Result<LocalInstallStrategy, ConfigError> {
        Ok(self.publisher(workspace_root).local_install_strategy(dirs)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_capture_at_info() {
        let config = PublicanConfig::default();

        assert_eq!(config.capture_level, LevelFilter::Info);
        assert_eq!(config.pom_dir, Utf8PathBuf::from("build/publications"));
        assert!(config.settings_file.is_none());
    }

    #[rstest]
    fn deserialises_project_template() {
        let source = concat!(
            "capture_level = \"debug\"\n",
            "[project]\n",
            "group_id = \"org.example\"\n",
            "artifact_id = \"app\"\n",
            "version = \"1.0\"\n",
            "packaging = \"war\"\n",
        );

        let config = PublicanConfig::from_toml(source).expect("configuration parses");

        assert_eq!(config.project.coordinates().artifact_id, "app");
        assert_eq!(config.project.packaging.as_deref(), Some("war"));
        assert_eq!(config.capture_level, LevelFilter::Debug);
    }

    #[rstest]
    #[case::unknown_key("unexpected = true\n")]
    #[case::wrong_type("pom_dir = 3\n")]
    fn rejects_invalid_configuration(#[case] source: &str) {
        assert!(matches!(
            PublicanConfig::from_toml(source),
            Err(ConfigError::Parse(_))
        ));
    }

    #[rstest]
    #[case::lowercase("warn", LevelFilter::Warn)]
    #[case::uppercase("TRACE", LevelFilter::Trace)]
    #[case::off("off", LevelFilter::Off)]
    fn parses_capture_levels(#[case] name: &str, #[case] expected: LevelFilter) {
        let config = PublicanConfig::from_toml(&format!("capture_level = \"{name}\"\n"))
            .expect("level parses");

        assert_eq!(config.capture_level, expected);
    }

    #[rstest]
    fn rejects_unknown_capture_level_while_parsing() {
        let err = PublicanConfig::from_toml("capture_level = \"loud\"\n")
            .expect_err("unknown level");

        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("loud"), "{err}");
    }

    #[rstest]
    fn publisher_resolves_paths_against_the_workspace() {
        let config = PublicanConfig::from_toml("pom_dir = \"out/poms\"\n").expect("parses");

        let publisher = config.publisher(Utf8Path::new("/work"));

        assert_eq!(publisher.pom_dir(), Utf8Path::new("/work/out/poms"));
    }

    #[rstest]
    fn load_with_passes_the_config_path() {
        let config = PublicanConfig::load_with(Utf8Path::new("/work"), |path| {
            assert_eq!(path, Utf8Path::new("/work/publican.toml"));
            PublicanConfig::from_toml("capture_level = \"trace\"\n")
        })
        .expect("stub loader succeeds");

        assert_eq!(config.capture_level, LevelFilter::Trace);
    }

    struct FixedHome(Option<Utf8PathBuf>);

    impl BaseDirs for FixedHome {
        fn home_dir(&self) -> Option<Utf8PathBuf> {
            self.0.clone()
        }
    }

    #[rstest]
    fn local_install_strategy_falls_back_to_home() {
        let config = PublicanConfig::default();

        let strategy = config
            .local_install_strategy_with(
                Utf8Path::new("/work"),
                &FixedHome(Some(Utf8PathBuf::from("/home/builder"))),
            )
            .expect("home repository");

        assert_eq!(
            strategy.repository(),
            Utf8Path::new("/home/builder/.m2/repository")
        );
    }

    #[rstest]
    fn local_install_strategy_without_home_fails() {
        let err = PublicanConfig::default()
            .local_install_strategy_with(Utf8Path::new("/work"), &FixedHome(None))
            .expect_err("no repository location");

        assert!(matches!(
            err,
            ConfigError::Deployer(DeployerError::LocalRepositoryUnavailable { .. })
        ));
    }
}
