//! Configuration management for the listing wizard
//!
//! Hosts usually run with the defaults; a YAML or TOML file can override
//! routes, recovery slide positions, tracking names and logging.

pub mod wizard_config;

pub use wizard_config::*;
