//! Shared types, error model, and configuration for minutegen.
//!
//! This crate is the foundation depended on by all other minutegen crates.
//! It provides:
//! - [`MinutegenError`] — the unified error type
//! - Domain types ([`MinutesRecord`], [`ExtractedMinutes`], [`GroupedByYear`])
//! - Configuration ([`Params`], [`TaskForce`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{Params, TargetParams, TaskForce, load_params_from, task_force_display};
pub use error::{MinutegenError, Result};
pub use types::{ExtractedMinutes, GroupedByYear, MinutesRecord, TaskForceGroups, YearGroup};
