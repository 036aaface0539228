//! Named publish filters and their descriptor templates.
//!
//! A filter decides which artefacts belong to one deployment. Every filter
//! owns a [`PomTemplate`]. The [`DEFAULT_FILTER_NAME`] filter always exists,
//! always takes part in grouping and runs after every named active filter,
//! so it only sees what the more specific filters left unclaimed.

use crate::artefact::descriptor::ArtefactDescriptor;
use crate::error::{DeployerError, Result};
use crate::pom::PomTemplate;
use log::debug;
use std::fmt;

/// Name of the filter that is always present.
pub const DEFAULT_FILTER_NAME: &str = "default";

/// Predicate selecting the artefacts that belong to one deployment.
///
/// Implemented for every `Fn(&ArtefactDescriptor) -> bool`, so closures can
/// be registered directly.
pub trait PublishFilter {
    /// Whether `artefact` belongs to this filter's deployment.
    fn accept(&self, artefact: &ArtefactDescriptor) -> bool;
}

impl<F> PublishFilter for F
where
    F: Fn(&ArtefactDescriptor) -> bool,
{
    fn accept(&self, artefact: &ArtefactDescriptor) -> bool {
        self(artefact)
    }
}

/// Filter accepting every artefact.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl PublishFilter for AcceptAll {
    fn accept(&self, _artefact: &ArtefactDescriptor) -> bool {
        true
    }
}

/// Filter accepting artefacts that carry a given classifier.
///
/// # Examples
///
/// ```
/// use publican_deployer::artefact::descriptor::ArtefactDescriptor;
/// use publican_deployer::filter::{ClassifierFilter, PublishFilter};
///
/// let filter = ClassifierFilter::new("sources");
/// let sources = ArtefactDescriptor::new("jar", "jar").with_classifier("sources");
/// assert!(filter.accept(&sources));
/// assert!(!filter.accept(&ArtefactDescriptor::new("jar", "jar")));
/// ```
#[derive(Debug, Clone)]
pub struct ClassifierFilter {
    classifier: String,
}

impl ClassifierFilter {
    /// Accept artefacts classified as `classifier`.
    #[must_use]
    pub fn new(classifier: impl Into<String>) -> Self {
        Self {
            classifier: classifier.into(),
        }
    }
}

impl PublishFilter for ClassifierFilter {
    fn accept(&self, artefact: &ArtefactDescriptor) -> bool {
        artefact.classifier() == Some(self.classifier.as_str())
    }
}

/// A named filter together with the template it owns.
pub struct PomFilter {
    name: String,
    filter: Box<dyn PublishFilter>,
    template: PomTemplate,
}

impl PomFilter {
    fn new(name: String, filter: Box<dyn PublishFilter>, template: PomTemplate) -> Self {
        Self {
            name,
            filter,
            template,
        }
    }

    /// The filter's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The filter's predicate.
    #[must_use]
    pub fn filter(&self) -> &dyn PublishFilter {
        self.filter.as_ref()
    }

    /// The template owned by this filter.
    #[must_use]
    pub fn template(&self) -> &PomTemplate {
        &self.template
    }

    /// Whether the predicate accepts `artefact`.
    #[must_use]
    pub fn accepts(&self, artefact: &ArtefactDescriptor) -> bool {
        self.filter.accept(artefact)
    }
}

impl fmt::Debug for PomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PomFilter")
            .field("name", &self.name)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

/// Registry of named filters and the active subset used for grouping.
///
/// Named filters are stored in registration order. The active set is kept
/// separately in activation order; re-activating a filter moves it to the
/// end.
#[derive(Debug)]
pub struct FilterRegistry {
    default: PomFilter,
    named: Vec<PomFilter>,
    active: Vec<String>,
}

/// A filter name must be one non-empty path component.
fn validate_filter_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);
    if invalid {
        return Err(DeployerError::InvalidFilterName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new(PomTemplate::default())
    }
}

impl FilterRegistry {
    /// Create a registry whose default filter owns `default_template`.
    #[must_use]
    pub fn new(default_template: PomTemplate) -> Self {
        Self {
            default: PomFilter::new(
                DEFAULT_FILTER_NAME.to_owned(),
                Box::new(AcceptAll),
                default_template,
            ),
            named: Vec::new(),
            active: Vec::new(),
        }
    }

    /// Register and activate a named filter.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::InvalidFilterName`] if `name` cannot be used
    /// in a descriptor file name, and [`DeployerError::DuplicateName`] if
    /// `name` is already taken, including by the default filter.
    pub fn add_filter(
        &mut self,
        name: &str,
        filter: impl PublishFilter + 'static,
        template: PomTemplate,
    ) -> Result<&mut PomTemplate> {
        validate_filter_name(name)?;
        if name == DEFAULT_FILTER_NAME || self.position(name).is_some() {
            return Err(DeployerError::DuplicateName {
                name: name.to_owned(),
            });
        }
        debug!("registering publish filter {name}");
        self.named
            .push(PomFilter::new(name.to_owned(), Box::new(filter), template));
        self.active.push(name.to_owned());
        let added = self.named.len() - 1;
        Ok(&mut self.named[added].template)
    }

    /// Add `name` to the active set if it is not already active.
    ///
    /// Activating the default filter is accepted and has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::UnknownFilter`] if no such filter exists.
    pub fn activate(&mut self, name: &str) -> Result<()> {
        if name == DEFAULT_FILTER_NAME {
            return Ok(());
        }
        self.require(name)?;
        if !self.is_active(name) {
            self.active.push(name.to_owned());
        }
        Ok(())
    }

    /// Remove `name` from the active set.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::UnknownFilter`] if no such filter exists and
    /// [`DeployerError::DefaultFilterPinned`] for the default filter.
    pub fn deactivate(&mut self, name: &str) -> Result<()> {
        if name == DEFAULT_FILTER_NAME {
            return Err(DeployerError::DefaultFilterPinned);
        }
        self.require(name)?;
        self.active.retain(|active| active != name);
        Ok(())
    }

    /// Whether `name` currently takes part in grouping.
    #[must_use]
    pub fn is_active(&self, name: &str) -> bool {
        name == DEFAULT_FILTER_NAME || self.active.iter().any(|active| active == name)
    }

    /// Look up a filter by name.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::UnknownFilter`] if no such filter exists.
    pub fn filter(&self, name: &str) -> Result<&PomFilter> {
        if name == DEFAULT_FILTER_NAME {
            return Ok(&self.default);
        }
        self.require(name).map(|index| &self.named[index])
    }

    /// The template registered for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::UnknownFilter`] if no such filter exists.
    pub fn template_for(&self, name: &str) -> Result<&PomTemplate> {
        self.filter(name).map(PomFilter::template)
    }

    /// Mutable access to the template registered for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::UnknownFilter`] if no such filter exists.
    pub fn template_for_mut(&mut self, name: &str) -> Result<&mut PomTemplate> {
        if name == DEFAULT_FILTER_NAME {
            return Ok(&mut self.default.template);
        }
        let index = self.require(name)?;
        Ok(&mut self.named[index].template)
    }

    /// Replace the default filter's predicate.
    pub fn set_default_filter(&mut self, filter: impl PublishFilter + 'static) {
        self.default.filter = Box::new(filter);
    }

    /// The default filter's predicate.
    #[must_use]
    pub fn default_filter(&self) -> &dyn PublishFilter {
        self.default.filter()
    }

    /// Replace the default filter's template.
    pub fn set_default_template(&mut self, template: PomTemplate) {
        self.default.template = template;
    }

    /// The default filter's template.
    #[must_use]
    pub fn default_template(&self) -> &PomTemplate {
        &self.default.template
    }

    /// Mutable access to the default filter's template.
    pub fn default_template_mut(&mut self) -> &mut PomTemplate {
        &mut self.default.template
    }

    /// Active filters in matching order: named filters by activation, then default.
    #[must_use]
    pub fn active_filters(&self) -> Vec<&PomFilter> {
        self.active
            .iter()
            .filter_map(|name| self.position(name).map(|index| &self.named[index]))
            .chain(std::iter::once(&self.default))
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.named.iter().position(|filter| filter.name == name)
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| DeployerError::UnknownFilter {
                name: name.to_owned(),
            })
    }
}
