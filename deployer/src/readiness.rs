//! Build-readiness evaluation.
//!
//! Readiness is the conjunction of independent checks. Every check is
//! evaluated, even after one has failed, so that the verdict lists every
//! reason the output cannot be built. Verdicts are never cached.

use crate::toolchain::{TargetPlatform, ToolchainLookup};

/// Reason reported when the explicit buildable flag is off.
pub const EXPLICITLY_DISABLED: &str = "explicitly disabled";

/// Outcome of a readiness evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessVerdict {
    /// Whether the output can be built.
    pub buildable: bool,
    /// Why it cannot, in check order. Empty when buildable.
    pub reasons: Vec<String>,
}

impl ReadinessVerdict {
    /// A verdict built from `reasons`; buildable iff there are none.
    #[must_use]
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            buildable: reasons.is_empty(),
            reasons,
        }
    }
}

/// One condition an output must meet to be buildable.
pub trait ReadinessCheck {
    /// The reason the condition fails, or `None` when it holds.
    fn unmet_reason(&self) -> Option<String>;
}

/// Honours an explicit buildable flag.
#[derive(Debug, Clone, Copy)]
pub struct ExplicitFlagCheck {
    buildable: bool,
}

impl ExplicitFlagCheck {
    /// Check the flag `buildable`.
    #[must_use]
    pub const fn new(buildable: bool) -> Self {
        Self { buildable }
    }
}

impl ReadinessCheck for ExplicitFlagCheck {
    fn unmet_reason(&self) -> Option<String> {
        (!self.buildable).then(|| EXPLICITLY_DISABLED.to_owned())
    }
}

/// Requires the toolchain to provide a tool for the target platform.
pub struct ToolAvailabilityCheck<'a> {
    lookup: &'a dyn ToolchainLookup,
    platform: &'a TargetPlatform,
}

impl<'a> ToolAvailabilityCheck<'a> {
    /// Check that `lookup` resolves a tool for `platform`.
    #[must_use]
    pub fn new(lookup: &'a dyn ToolchainLookup, platform: &'a TargetPlatform) -> Self {
        Self { lookup, platform }
    }
}

impl ReadinessCheck for ToolAvailabilityCheck<'_> {
    fn unmet_reason(&self) -> Option<String> {
        self.lookup
            .resolve(self.platform)
            .err()
            .map(|failure| failure.message().to_owned())
    }
}

/// AND-composition of readiness checks.
#[derive(Default)]
pub struct ReadinessEvaluator<'a> {
    checks: Vec<Box<dyn ReadinessCheck + 'a>>,
}

impl<'a> ReadinessEvaluator<'a> {
    /// An evaluator with no checks; it always reports buildable.
    #[must_use]
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// The standard composition: explicit flag, then tool availability.
    #[must_use]
    pub fn standard(
        buildable: bool,
        lookup: &'a dyn ToolchainLookup,
        platform: &'a TargetPlatform,
    ) -> Self {
        Self::new()
            .with_check(ExplicitFlagCheck::new(buildable))
            .with_check(ToolAvailabilityCheck::new(lookup, platform))
    }

    /// Append `check`; it is evaluated after the existing ones.
    #[must_use]
    pub fn with_check(mut self, check: impl ReadinessCheck + 'a) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Number of checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether there are no checks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check and collect the reasons of those that fail.
    #[must_use]
    pub fn evaluate(&self) -> ReadinessVerdict {
        ReadinessVerdict::from_reasons(
            self.checks
                .iter()
                .filter_map(|check| check.unmet_reason())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::{MockToolchainLookup, ToolHandle, ToolResolutionFailure};
    use rstest::rstest;

    fn lookup(result: Result<(), &'static str>) -> MockToolchainLookup {
        let mut lookup = MockToolchainLookup::new();
        lookup.expect_resolve().times(1).returning(move |platform| {
            result
                .map(|()| ToolHandle::new(platform.clone(), "/opt/jdk/bin/javac"))
                .map_err(ToolResolutionFailure::new)
        });
        lookup
    }

    #[rstest]
    #[case::ready(true, Ok(()), true, &[])]
    #[case::tool_missing(true, Err("javac-not-found"), false, &["javac-not-found"])]
    #[case::disabled(false, Ok(()), false, &[EXPLICITLY_DISABLED])]
    #[case::both(false, Err("javac-not-found"), false, &[EXPLICITLY_DISABLED, "javac-not-found"])]
    fn standard_composition(
        #[case] flag: bool,
        #[case] tool: Result<(), &'static str>,
        #[case] buildable: bool,
        #[case] reasons: &[&str],
    ) {
        let lookup = lookup(tool);
        let platform = TargetPlatform::new("java8");

        let verdict = ReadinessEvaluator::standard(flag, &lookup, &platform).evaluate();

        assert_eq!(verdict.buildable, buildable);
        assert_eq!(verdict.reasons, reasons);
    }

    #[test]
    fn empty_evaluator_is_buildable() {
        let verdict = ReadinessEvaluator::new().evaluate();
        assert!(verdict.buildable);
        assert!(verdict.reasons.is_empty());
    }

    #[test]
    fn extra_checks_run_after_the_standard_ones() {
        struct Always(&'static str);
        impl ReadinessCheck for Always {
            fn unmet_reason(&self) -> Option<String> {
                Some(self.0.to_owned())
            }
        }

        let lookup = lookup(Err("javac-not-found"));
        let platform = TargetPlatform::new("java8");
        let evaluator =
            ReadinessEvaluator::standard(true, &lookup, &platform).with_check(Always("no sources"));

        assert_eq!(evaluator.len(), 3);
        assert_eq!(
            evaluator.evaluate().reasons,
            ["javac-not-found", "no sources"]
        );
    }
}
