//! This crate is intended to contain code that is required to provide or
//! improve the observability of a system. For now that is the initialization
//! logic for logging which is shared between the binaries.
pub mod config;
pub mod tracing;

pub use config::Config;
