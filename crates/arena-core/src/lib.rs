//! Core building blocks for the AlgoArena compiler feature.
//!
//! This crate owns everything about remote code execution that does not need a
//! network stack: the request and response shapes exchanged with the execution
//! service, the error taxonomy surfaced to users, the bounded execution history,
//! the runtime catalog with its static fallback, per-language starter templates
//! and the state container that ties them together.
//!
//! # Architecture Overview
//!
//! - **Execution types**: request builder, response streams and outcome classification
//! - **Error taxonomy**: classified dispatch failures with user-facing messages
//! - **History**: most-recent-first ring of completed executions
//! - **Catalog**: live or fallback runtime lists
//! - **State**: the single owned container mutated by the compiler front end
//! - **Configuration**: YAML configuration with environment resolution

pub mod catalog;
pub mod config;
pub mod errors;
pub mod execution;
pub mod history;
pub mod state;
pub mod templates;

pub use catalog::{Runtime, RuntimeCatalog};
pub use config::*;
pub use errors::{ArenaError, ExecutionError};
pub use execution::{ExecutionOutcome, ExecutionRequest, ExecutionResponse, StageOutput};
pub use history::{ExecutionHistory, HistoryEntry, DEFAULT_HISTORY_LIMIT};
pub use state::{Completion, CompilerState, ExecutionTicket};
