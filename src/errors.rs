// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

use crate::dag::GraphError;

#[derive(Error, Debug)]
pub enum WfdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid workflow: {0}")]
    Graph(#[from] GraphError),

    #[error("Task '{task}' failed with exit code {code}")]
    TaskFailed { task: String, code: i32 },

    #[error("Output directory {0:?} already exists (use --force-overwrite)")]
    OutputDirectoryExists(PathBuf),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WfdagError>;
