// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ExecutorBackend` trait and the concrete
//!   `LocalExecutorBackend` used in production, which tests can replace with
//!   a fake implementation.
//! - [`task_runner`] runs, simulates or no-ops a single work unit and creates
//!   its declared outputs.

pub mod backend;
pub mod task_runner;

pub use backend::{ExecutionFuture, ExecutorBackend, LocalExecutorBackend};
pub use task_runner::materialize_outputs;
