//! The publisher facade.
//!
//! A [`Publisher`] owns everything one repository definition needs: the
//! artefact registry, the filters and their templates, the hooks and the
//! settings provider. A publish cycle groups the registered artefacts,
//! runs every unit through the [`PublicationExecutor`] and clears the
//! registry for the next cycle.

use crate::artefact::descriptor::ArtefactDescriptor;
use crate::artefact::registry::ArtefactRegistry;
use crate::capture::LoggingCapture;
use crate::dirs::BaseDirs;
use crate::error::{DeployerError, Result};
use crate::executor::{
    DEFAULT_CAPTURE_LEVEL, PublicationContext, PublicationExecutor, PublicationReport,
};
use crate::filter::{FilterRegistry, PomFilter, PublishFilter};
use crate::grouping::DeploymentGrouper;
use crate::hooks::{DeploymentHook, HookBroadcaster};
use crate::install::LocalInstallStrategy;
use crate::pom::PomTemplate;
use crate::settings::{PublishSettings, SettingsProvider, StaticSettings};
use crate::strategy::PublishStrategy;
use camino::{Utf8Path, Utf8PathBuf};
use log::{LevelFilter, debug};
use std::convert::Infallible;

/// Groups and publishes the artefacts of one module.
///
/// # Examples
///
/// ```
/// use publican_deployer::artefact::descriptor::ArtefactDescriptor;
/// use publican_deployer::pom::{Coordinates, PomTemplate};
/// use publican_deployer::publisher::Publisher;
///
/// let mut publisher = Publisher::new(
///     PomTemplate::new(Coordinates::new("org.example", "app", "1.0")),
///     "build/poms",
/// );
/// publisher.register(ArtefactDescriptor::new("jar", "jar"), "build/libs/app.jar");
/// assert_eq!(publisher.artefacts().len(), 1);
/// assert!(publisher.create_resolver().is_err());
/// ```
pub struct Publisher {
    artefacts: ArtefactRegistry,
    filters: FilterRegistry,
    hooks: HookBroadcaster,
    grouper: DeploymentGrouper,
    settings: Box<dyn SettingsProvider>,
    capture_level: LevelFilter,
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("artefacts", &self.artefacts)
            .field("filters", &self.filters)
            .field("hooks", &self.hooks)
            .field("grouper", &self.grouper)
            .field("capture_level", &self.capture_level)
            .finish_non_exhaustive()
    }
}

impl Publisher {
    /// Create a publisher whose default filter uses `default_template` and
    /// whose descriptors are written to `pom_dir`.
    #[must_use]
    pub fn new(default_template: PomTemplate, pom_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            artefacts: ArtefactRegistry::new(),
            filters: FilterRegistry::new(default_template),
            hooks: HookBroadcaster::new(),
            grouper: DeploymentGrouper::new(pom_dir),
            settings: Box::new(StaticSettings::default()),
            capture_level: DEFAULT_CAPTURE_LEVEL,
        }
    }

    /// Use `provider` for [`Self::settings`].
    #[must_use]
    pub fn with_settings_provider(mut self, provider: impl SettingsProvider + 'static) -> Self {
        self.settings = Box::new(provider);
        self
    }

    /// Start the logging capture at `level` during each publish.
    #[must_use]
    pub fn with_capture_level(mut self, level: LevelFilter) -> Self {
        self.capture_level = level;
        self
    }

    /// Directory receiving generated descriptors.
    #[must_use]
    pub fn pom_dir(&self) -> &Utf8Path {
        self.grouper.pom_dir()
    }

    /// Register one artefact for the next cycle.
    pub fn register(&mut self, descriptor: ArtefactDescriptor, file: impl Into<Utf8PathBuf>) {
        self.artefacts.register(descriptor, file);
    }

    /// Artefacts registered for the next cycle.
    #[must_use]
    pub fn artefacts(&self) -> &ArtefactRegistry {
        &self.artefacts
    }

    /// The filter registry.
    #[must_use]
    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Mutable access to the filter registry.
    pub fn filters_mut(&mut self) -> &mut FilterRegistry {
        &mut self.filters
    }

    /// Add and activate a named filter.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::InvalidFilterName`] when `name` is not a
    /// single path component and [`DeployerError::DuplicateName`] when it is
    /// taken.
    pub fn add_filter(
        &mut self,
        name: &str,
        filter: impl PublishFilter + 'static,
        template: PomTemplate,
    ) -> Result<&mut PomTemplate> {
        self.filters.add_filter(name, filter, template)
    }

    /// Look up a named filter.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::UnknownFilter`] when no such filter exists.
    pub fn filter(&self, name: &str) -> Result<&PomFilter> {
        self.filters.filter(name)
    }

    /// The default filter's template.
    #[must_use]
    pub fn pom(&self) -> &PomTemplate {
        self.filters.default_template()
    }

    /// Mutable access to the default filter's template.
    pub fn pom_mut(&mut self) -> &mut PomTemplate {
        self.filters.default_template_mut()
    }

    /// Replace the default filter's predicate.
    pub fn set_filter(&mut self, filter: impl PublishFilter + 'static) {
        self.filters.set_default_filter(filter);
    }

    /// Replace the default filter's template.
    pub fn set_pom(&mut self, template: PomTemplate) {
        self.filters.set_default_template(template);
    }

    /// Register a hook run before each unit is published.
    pub fn before_deployment(&mut self, hook: impl DeploymentHook + 'static) {
        self.hooks.register(hook);
    }

    /// Register every artefact of a module and publish them.
    ///
    /// # Errors
    ///
    /// See [`Self::publish`].
    pub fn publish_module<I, P>(
        &mut self,
        artefacts: I,
        strategy: &mut dyn PublishStrategy,
        capture: &mut dyn LoggingCapture,
    ) -> Result<PublicationReport>
    where
        I: IntoIterator<Item = (ArtefactDescriptor, P)>,
        P: Into<Utf8PathBuf>,
    {
        for (descriptor, file) in artefacts {
            self.register(descriptor, file);
        }
        self.publish(strategy, capture)
    }

    /// Group the registered artefacts and publish every unit.
    ///
    /// Unit failures are recorded in the returned report. The registry is
    /// cleared once the cycle has run.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::DuplicateArtefact`] or
    /// [`DeployerError::MultipleMainArtefacts`] when the artefacts cannot be
    /// grouped; nothing is published and the registry is kept.
    pub fn publish(
        &mut self,
        strategy: &mut dyn PublishStrategy,
        capture: &mut dyn LoggingCapture,
    ) -> Result<PublicationReport> {
        let grouping = self
            .grouper
            .group(self.artefacts.snapshot(), &self.filters)?;
        debug!(
            "publishing {} unit(s) from {} artefact(s)",
            grouping.units.len(),
            self.artefacts.len()
        );

        let context =
            PublicationContext::new(strategy, capture).with_capture_level(self.capture_level);
        let mut report = PublicationExecutor::new(&mut self.hooks, context).execute(grouping.units);
        report.unclaimed = grouping.unclaimed;
        self.artefacts.clear();
        Ok(report)
    }

    /// Load the publish settings afresh.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::SettingsLoad`] wrapping the provider's error.
    pub fn settings(&self) -> Result<PublishSettings> {
        self.settings
            .build_settings()
            .map_err(|source| DeployerError::SettingsLoad { source })
    }

    /// Build a [`LocalInstallStrategy`] for the repository named by freshly
    /// loaded settings, or `<home>/.m2/repository` from `dirs`.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::SettingsLoad`] when the settings cannot be
    /// loaded and [`DeployerError::LocalRepositoryUnavailable`] when no
    /// repository location is known.
    pub fn local_install_strategy(&self, dirs: &dyn BaseDirs) -> Result<LocalInstallStrategy> {
        LocalInstallStrategy::from_settings(&self.settings()?, dirs)
    }

    /// A publisher never resolves dependencies.
    ///
    /// # Errors
    ///
    /// Always returns [`DeployerError::ResolutionUnsupported`].
    pub fn create_resolver(&self) -> Result<Infallible> {
        Err(DeployerError::ResolutionUnsupported)
    }
}

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;
