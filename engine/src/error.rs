//! Error types for the engine.
//!
//! Only conditions the caller must act on are errors. Problems in stored
//! data are diagnostics (see [`crate::diagnostics`]) and never surface here.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{ElementId, OfferGroupId, PlanId, TaskId};

/// Errors returned by the analysis pipeline.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The plan has no cash info; the caller must supply defaults.
    #[error("Plan has no cash info; reserve-fund parameters are required for a projection")]
    MissingCashInfo,

    /// Invalid configuration value.
    #[error("Invalid configuration for '{key}': {value}")]
    InvalidConfiguration {
        /// The configuration key.
        key: String,
        /// The invalid value.
        value: String,
    },
}

/// Errors returned when an action cannot be applied to a plan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// No element with this id.
    #[error("Element '{0}' not found")]
    ElementNotFound(ElementId),

    /// No task with this id.
    #[error("Task '{0}' not found")]
    TaskNotFound(TaskId),

    /// No offer group with this id.
    #[error("Offer group '{0}' not found")]
    OfferGroupNotFound(OfferGroupId),

    /// A task with this id already exists.
    #[error("Task '{0}' already exists")]
    DuplicateTask(TaskId),

    /// An offer group with this id already exists.
    #[error("Offer group '{0}' already exists")]
    DuplicateOfferGroup(OfferGroupId),

    /// Records must carry a non-empty id.
    #[error("{record} id cannot be empty")]
    EmptyId {
        /// Kind of record missing its id.
        record: &'static str,
    },
}

/// Errors returned by a plan repository.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No plan stored under this id.
    #[error("Plan '{0}' not found")]
    NotFound(PlanId),

    /// Reading or writing plan storage failed.
    #[error("Plan storage I/O failed at {path}: {source}")]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Stored plan could not be encoded or decoded.
    #[error("Plan serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
