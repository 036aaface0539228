//! Artefact descriptors and raw registry entries.
//!
//! A descriptor names what kind of build output a file is: its type (for
//! example `jar` or `pom`), its file extension and an optional classifier
//! distinguishing variants such as `sources` or `javadoc`.

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// Descriptor types eligible to become the main artefact of a deployment.
pub const PACKAGING_TYPES: &[&str] = &["jar", "war", "ear"];

/// The descriptor type used for generated project descriptors.
pub const DESCRIPTOR_TYPE: &str = "pom";

/// Descriptor types that never leave the build and are dropped on collection.
pub const INTERNAL_ONLY_TYPES: &[&str] = &["ivy"];

/// Immutable description of a single build output.
///
/// # Examples
///
/// ```
/// use publican_deployer::artefact::descriptor::ArtefactDescriptor;
///
/// let sources = ArtefactDescriptor::new("jar", "jar").with_classifier("sources");
/// assert_eq!(sources.to_string(), "jar:sources");
/// assert!(!sources.is_main_candidate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtefactDescriptor {
    artefact_type: String,
    extension: String,
    classifier: Option<String>,
}

impl ArtefactDescriptor {
    /// Create a descriptor without a classifier.
    #[must_use]
    pub fn new(artefact_type: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            artefact_type: artefact_type.into(),
            extension: extension.into(),
            classifier: None,
        }
    }

    /// Return a copy of this descriptor carrying `classifier`.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// The descriptor type, such as `jar`.
    #[must_use]
    pub fn artefact_type(&self) -> &str {
        &self.artefact_type
    }

    /// The file extension, without a leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The classifier, if any.
    #[must_use]
    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    /// The identity used to detect duplicates inside one deployment.
    #[must_use]
    pub fn key(&self) -> ArtefactKey {
        ArtefactKey {
            artefact_type: self.artefact_type.clone(),
            classifier: self.classifier.clone(),
        }
    }

    /// Whether the descriptor marks an artefact that must never be published.
    #[must_use]
    pub fn is_internal_only(&self) -> bool {
        INTERNAL_ONLY_TYPES.contains(&self.artefact_type.as_str())
    }

    /// Whether the descriptor is a project descriptor (`pom`).
    #[must_use]
    pub fn is_descriptor(&self) -> bool {
        self.artefact_type == DESCRIPTOR_TYPE
    }

    /// Whether this is a classifier-less packaging artefact (`jar`, `war`, `ear`).
    #[must_use]
    pub fn is_main_candidate(&self) -> bool {
        self.classifier.is_none() && PACKAGING_TYPES.contains(&self.artefact_type.as_str())
    }
}

impl fmt::Display for ArtefactDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.classifier {
            Some(classifier) => write!(f, "{}:{classifier}", self.artefact_type),
            None => write!(f, "{}", self.artefact_type),
        }
    }
}

/// The (type, classifier) pair that must be unique within a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtefactKey {
    artefact_type: String,
    classifier: Option<String>,
}

/// A build output waiting to be grouped: a descriptor and the file it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArtefact {
    descriptor: ArtefactDescriptor,
    file: Utf8PathBuf,
}

impl RawArtefact {
    /// Pair a descriptor with its file.
    #[must_use]
    pub fn new(descriptor: ArtefactDescriptor, file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            descriptor,
            file: file.into(),
        }
    }

    /// The artefact's descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &ArtefactDescriptor {
        &self.descriptor
    }

    /// The file on disk.
    #[must_use]
    pub fn file(&self) -> &Utf8Path {
        &self.file
    }
}

impl fmt::Display for RawArtefact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.descriptor, self.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::jar("jar", None, true)]
    #[case::war("war", None, true)]
    #[case::ear("ear", None, true)]
    #[case::zip("zip", None, false)]
    #[case::classified_jar("jar", Some("sources"), false)]
    fn main_candidates_are_classifier_less_packaging_types(
        #[case] artefact_type: &str,
        #[case] classifier: Option<&str>,
        #[case] expected: bool,
    ) {
        let mut descriptor = ArtefactDescriptor::new(artefact_type, artefact_type);
        if let Some(classifier) = classifier {
            descriptor = descriptor.with_classifier(classifier);
        }
        assert_eq!(descriptor.is_main_candidate(), expected);
    }

    #[test]
    fn ivy_is_internal_only() {
        assert!(ArtefactDescriptor::new("ivy", "xml").is_internal_only());
        assert!(!ArtefactDescriptor::new("pom", "pom").is_internal_only());
    }

    #[test]
    fn key_ignores_extension() {
        let jar = ArtefactDescriptor::new("jar", "jar");
        let renamed = ArtefactDescriptor::new("jar", "zip");
        assert_eq!(jar.key(), renamed.key());
        assert_ne!(jar.key(), jar.clone().with_classifier("tests").key());
    }

    #[test]
    fn raw_artefact_display_names_descriptor_and_file() {
        let artefact = RawArtefact::new(
            ArtefactDescriptor::new("jar", "jar").with_classifier("javadoc"),
            "build/libs/app-javadoc.jar",
        );
        assert_eq!(
            artefact.to_string(),
            "jar:javadoc (build/libs/app-javadoc.jar)"
        );
    }
}
