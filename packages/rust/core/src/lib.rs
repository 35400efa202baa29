//! Aggregation and render orchestration for minutegen.
//!
//! This crate ties harvesting, extraction, and template filling together
//! into the end-to-end run: group minutes by task force and year, then
//! drive the two independent render targets (meeting index, resolutions
//! digest).

pub mod group;
pub mod pipeline;
pub mod sections;

pub use group::{group_by_year, partition_by_task_force};
pub use pipeline::{RunReport, TargetKind, TargetOutcome, run};
