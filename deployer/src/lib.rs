//! Publican deployer library.
//!
//! This crate turns loose, individually-typed build outputs into deployment
//! units and publishes each one through a pluggable strategy, with
//! before-deployment hooks and a scoped logging capture around every
//! publish. It also provides the build-readiness checks used to decide
//! whether an output can be built at all.
//!
//! # Modules
//!
//! - [`artefact`] - Artefact descriptors and the raw artefact registry
//! - [`binary`] - Buildable binary outputs and their readiness
//! - [`capture`] - Scoped logging capture around a publish
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Error types for grouping and publication
//! - [`executor`] - Per-unit publication with failure containment
//! - [`filter`] - Named filters and their descriptor templates
//! - [`grouping`] - Partitioning of artefacts into deployment units
//! - [`hooks`] - Before-deployment hooks
//! - [`install`] - Publishing into a local repository directory
//! - [`pom`] - Descriptor templates and their rendering
//! - [`publisher`] - The publisher facade
//! - [`readiness`] - Build-readiness evaluation
//! - [`settings`] - Publish settings and local repository resolution
//! - [`strategy`] - The publish strategy seam
//! - [`toolchain`] - Toolchain lookup for readiness checks

pub mod artefact;
pub mod binary;
pub mod capture;
pub mod dirs;
pub mod error;
pub mod executor;
pub mod filter;
pub mod grouping;
pub mod hooks;
pub mod install;
pub mod pom;
pub mod publisher;
pub mod readiness;
pub mod settings;
pub mod strategy;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod toolchain;
