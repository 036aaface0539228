//! Collection of raw artefacts for one publish cycle.

use super::descriptor::{ArtefactDescriptor, RawArtefact};
use camino::Utf8PathBuf;
use log::trace;

/// Accumulates raw artefacts in registration order.
///
/// Internal-only descriptor types (see
/// [`INTERNAL_ONLY_TYPES`](super::descriptor::INTERNAL_ONLY_TYPES)) are
/// dropped here, so nothing downstream ever sees them.
#[derive(Debug, Default, Clone)]
pub struct ArtefactRegistry {
    entries: Vec<RawArtefact>,
}

impl ArtefactRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an artefact, silently skipping internal-only types.
    ///
    /// # Examples
    ///
    /// ```
    /// use publican_deployer::artefact::descriptor::ArtefactDescriptor;
    /// use publican_deployer::artefact::registry::ArtefactRegistry;
    ///
    /// let mut registry = ArtefactRegistry::new();
    /// registry.register(ArtefactDescriptor::new("jar", "jar"), "build/app.jar");
    /// registry.register(ArtefactDescriptor::new("ivy", "xml"), "build/ivy.xml");
    /// assert_eq!(registry.len(), 1);
    /// ```
    pub fn register(&mut self, descriptor: ArtefactDescriptor, file: impl Into<Utf8PathBuf>) {
        let file = file.into();
        if descriptor.is_internal_only() {
            trace!("ignoring internal-only artefact {descriptor} at {file}");
            return;
        }
        self.entries.push(RawArtefact::new(descriptor, file));
    }

    /// The registered artefacts in registration order.
    #[must_use]
    pub fn snapshot(&self) -> &[RawArtefact] {
        &self.entries
    }

    /// Number of registered artefacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every registered artefact.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
