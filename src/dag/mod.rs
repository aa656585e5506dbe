// src/dag/mod.rs

//! Dependency resolution and leveling.
//!
//! - [`references`] holds the symbol table that maps task names and output
//!   files to task identifiers.
//! - [`builder`] collects task records, resolves their references and mirrors
//!   edges into one DAG.
//! - [`leveling`] assigns each task to a level.
//! - [`plan`] is the immutable result handed to executors.
//! - [`error`] lists the ways a build can fail.

pub mod builder;
pub mod error;
mod leveling;
pub mod node;
pub mod plan;
pub mod references;

pub use builder::{build, build_named, DagBuilder};
pub use error::GraphError;
pub use node::TaskId;
pub use plan::{LeveledPlan, PlannedTask};
pub use references::{ReferenceTable, Symbol};
