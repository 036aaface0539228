//! Publican groups build artefacts into deployment units and publishes them.
//!
//! The heavy lifting lives in [`deployer`]; this crate adds the workspace
//! configuration that wires a [`deployer::publisher::Publisher`] together.

pub mod config;

pub use config::{CONFIG_FILE_NAME, ConfigError, PublicanConfig};
pub use publican_deployer as deployer;
