//! Buildable binary outputs.

use crate::readiness::{ReadinessEvaluator, ReadinessVerdict};
use crate::toolchain::{TargetPlatform, ToolchainLookup};

/// A binary output whose readiness depends on its flag and toolchain.
///
/// The check list is rebuilt on every query, so changes to the flag or the
/// target platform are reflected immediately.
pub struct BinarySpec<L> {
    name: String,
    buildable: bool,
    platform: TargetPlatform,
    toolchain: L,
}

impl<L: ToolchainLookup> BinarySpec<L> {
    /// Create a buildable binary named `name` for `platform`.
    #[must_use]
    pub fn new(name: impl Into<String>, platform: TargetPlatform, toolchain: L) -> Self {
        Self {
            name: name.into(),
            buildable: true,
            platform,
            toolchain,
        }
    }

    /// The output's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The explicit buildable flag.
    #[must_use]
    pub const fn buildable_flag(&self) -> bool {
        self.buildable
    }

    /// Set the explicit buildable flag.
    pub fn set_buildable(&mut self, buildable: bool) {
        self.buildable = buildable;
    }

    /// The platform the output targets.
    #[must_use]
    pub fn target_platform(&self) -> &TargetPlatform {
        &self.platform
    }

    /// Retarget the output.
    pub fn set_target_platform(&mut self, platform: TargetPlatform) {
        self.platform = platform;
    }

    /// Evaluate readiness from the current state.
    #[must_use]
    pub fn readiness(&self) -> ReadinessVerdict {
        ReadinessEvaluator::standard(self.buildable, &self.toolchain, &self.platform).evaluate()
    }

    /// Shorthand for `self.readiness().buildable`.
    #[must_use]
    pub fn is_buildable(&self) -> bool {
        self.readiness().buildable
    }
}
