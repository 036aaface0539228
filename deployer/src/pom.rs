//! Project descriptor ("POM") templates.
//!
//! Each filter owns a template. When a deployment unit is formed, the
//! template is copied into the unit and its packaging is filled in from the
//! main artefact. The copy is rendered to XML immediately before publication,
//! so before-deployment hooks can still adjust it.

use serde::Deserialize;
use std::fmt::Write as _;

/// Maven coordinates identifying a published module.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Coordinates {
    /// Group identifier, such as `org.example`.
    pub group_id: String,
    /// Artifact identifier, such as `widget`.
    pub artifact_id: String,
    /// Version string.
    pub version: String,
}

impl Coordinates {
    /// Build coordinates from their three parts.
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }
}

/// A descriptor template owned by a filter.
///
/// # Examples
///
/// ```
/// use publican_deployer::pom::{Coordinates, PomTemplate};
///
/// let pom = PomTemplate::new(Coordinates::new("org.example", "widget", "1.0"))
///     .with_packaging("war");
/// let xml = pom.render();
/// assert!(xml.contains("<artifactId>widget</artifactId>"));
/// assert!(xml.contains("<packaging>war</packaging>"));
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PomTemplate {
    /// The module coordinates.
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Packaging; inferred from the main artefact when absent.
    pub packaging: Option<String>,
    /// Human-readable project name.
    pub name: Option<String>,
    /// Project description.
    pub description: Option<String>,
}

impl PomTemplate {
    /// Create a template for `coordinates` with nothing else set.
    #[must_use]
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            ..Self::default()
        }
    }

    /// Return the template with an explicit packaging.
    #[must_use]
    pub fn with_packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = Some(packaging.into());
        self
    }

    /// The coordinates.
    #[must_use]
    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// Copy the template for one deployment, defaulting the packaging.
    ///
    /// An explicit packaging wins; otherwise the main artefact's extension
    /// is used, and a descriptor-only deployment is packaged as `pom`.
    #[must_use]
    pub fn materialise(&self, main_extension: Option<&str>) -> Self {
        let mut copy = self.clone();
        if copy.packaging.is_none() {
            copy.packaging = Some(main_extension.unwrap_or("pom").to_owned());
        }
        copy
    }

    /// Render the template as a POM 4.0.0 document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut xml = String::from(concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<project xmlns=\"http://maven.apache.org/POM/4.0.0\" ",
            "xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" ",
            "xsi:schemaLocation=\"http://maven.apache.org/POM/4.0.0 ",
            "http://maven.apache.org/xsd/maven-4.0.0.xsd\">\n",
            "  <modelVersion>4.0.0</modelVersion>\n",
        ));
        push_element(&mut xml, "groupId", &self.coordinates.group_id);
        push_element(&mut xml, "artifactId", &self.coordinates.artifact_id);
        push_element(&mut xml, "version", &self.coordinates.version);
        for (tag, value) in [
            ("packaging", &self.packaging),
            ("name", &self.name),
            ("description", &self.description),
        ] {
            if let Some(value) = value {
                push_element(&mut xml, tag, value);
            }
        }
        xml.push_str("</project>\n");
        xml
    }
}

fn push_element(xml: &mut String, tag: &str, value: &str) {
    // Writing to a String cannot fail.
    let _ = writeln!(xml, "  <{tag}>{}</{tag}>", escape_xml(value));
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
