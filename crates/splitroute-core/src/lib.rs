//! Splitroute-core: Shared types, errors, and configuration
//!
//! This crate provides the identifiers, pool metadata, route graph, and
//! error taxonomy used across the Splitroute workspace.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
