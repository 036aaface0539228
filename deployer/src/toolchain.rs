//! Toolchain lookup for build-readiness checks.
//!
//! A [`ToolchainLookup`] answers one question: can the tool this output
//! needs be found for a given target platform? Failures carry a
//! human-readable message that ends up verbatim as a readiness reason.

use camino::{Utf8Path, Utf8PathBuf};
use log::trace;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A named target platform such as `java8` or `linux-x86_64`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetPlatform(String);

impl TargetPlatform {
    /// Create a platform from its name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The platform name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetPlatform {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A resolved tool, ready to be invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolHandle {
    platform: TargetPlatform,
    executable: Utf8PathBuf,
}

impl ToolHandle {
    /// Create a handle for `executable` on `platform`.
    #[must_use]
    pub fn new(platform: TargetPlatform, executable: impl Into<Utf8PathBuf>) -> Self {
        Self {
            platform,
            executable: executable.into(),
        }
    }

    /// Platform the tool was resolved for.
    #[must_use]
    pub fn platform(&self) -> &TargetPlatform {
        &self.platform
    }

    /// Path of the tool executable.
    #[must_use]
    pub fn executable(&self) -> &Utf8Path {
        &self.executable
    }
}

/// Why a tool could not be resolved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ToolResolutionFailure {
    message: String,
}

impl ToolResolutionFailure {
    /// Create a failure carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message, used as a readiness reason.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Resolves the tool an output needs for a target platform.
#[cfg_attr(test, mockall::automock)]
pub trait ToolchainLookup {
    /// Resolve the tool for `platform`.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolResolutionFailure`] describing why no tool is
    /// available.
    fn resolve(&self, platform: &TargetPlatform) -> Result<ToolHandle, ToolResolutionFailure>;
}

/// Toolchains installed on the local machine, keyed by platform.
///
/// Each platform maps to an installation home; the tool is expected at
/// `<home>/bin/<tool>` (with `.exe` appended on Windows).
///
/// # Examples
///
/// ```
/// use publican_deployer::toolchain::{InstalledToolchains, TargetPlatform, ToolchainLookup};
///
/// let toolchains = InstalledToolchains::new("javac");
/// let err = toolchains
///     .resolve(&TargetPlatform::new("java8"))
///     .expect_err("nothing installed");
/// assert_eq!(err.message(), "javac not found for java8");
/// ```
#[derive(Debug, Clone)]
pub struct InstalledToolchains {
    tool: String,
    homes: BTreeMap<TargetPlatform, Utf8PathBuf>,
}

impl InstalledToolchains {
    /// Create an empty lookup for the tool named `tool`.
    #[must_use]
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            homes: BTreeMap::new(),
        }
    }

    /// Register the installation `home` for `platform`, replacing any
    /// earlier entry.
    #[must_use]
    pub fn with_installation(
        mut self,
        platform: impl Into<TargetPlatform>,
        home: impl Into<Utf8PathBuf>,
    ) -> Self {
        self.homes.insert(platform.into(), home.into());
        self
    }

    /// Name of the tool being looked up.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    fn executable_name(&self) -> String {
        if cfg!(windows) {
            format!("{}.exe", self.tool)
        } else {
            self.tool.clone()
        }
    }

    fn not_found(&self, platform: &TargetPlatform) -> ToolResolutionFailure {
        ToolResolutionFailure::new(format!("{} not found for {platform}", self.tool))
    }
}

impl ToolchainLookup for InstalledToolchains {
    fn resolve(&self, platform: &TargetPlatform) -> Result<ToolHandle, ToolResolutionFailure> {
        let home = self
            .homes
            .get(platform)
            .ok_or_else(|| self.not_found(platform))?;
        let executable = home.join("bin").join(self.executable_name());
        trace!("looking for {} at {executable}", self.tool);
        if executable.is_file() {
            Ok(ToolHandle::new(platform.clone(), executable))
        } else {
            Err(self.not_found(platform))
        }
    }
}
