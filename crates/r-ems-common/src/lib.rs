//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the outage toolkit."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Shared primitives for the R-EMS outage synthesis workspace.
//! This crate exposes configuration loading and logging utilities
//! consumed by the generator crates.

pub mod config;
pub mod logging;

pub use config::{load_with_source, parse_str, LoadedConfig, LoggingConfig, ValidateConfig};
pub use logging::{init_tracing, LogFormat};
