//! Artefact descriptors and the per-cycle artefact registry.
//!
//! # Sub-modules
//!
//! - [`descriptor`] - Descriptor, key and raw artefact types.
//! - [`registry`] - Ordered collection of raw artefacts for one publish cycle.

pub mod descriptor;
pub mod registry;
