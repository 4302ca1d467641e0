//! Lockboard-core: Shared types, errors, configuration and refresh coordination
//!
//! This crate provides the foundational types used across the Lockboard workspace.

pub mod config;
pub mod errors;
pub mod refresh;
pub mod types;

pub use config::*;
pub use errors::*;
pub use refresh::*;
pub use types::*;
