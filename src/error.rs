//! Orchestration errors.
//!
//! Problems in the uploaded data are never errors: they are reported as
//! [`ValidationError`](crate::validation::ValidationError) values. The
//! variants here cover requests the core refuses to carry out.

use thiserror::Error;

use crate::models::{Cycle, Entity};

/// Errors raised by rule handling and workbook edits.
#[derive(Debug, Error)]
pub enum AlchemistError {
    /// A co-run rule lists too few tasks.
    #[error("co-run rule needs at least {min} tasks, got {got}")]
    TooFewTasks { min: usize, got: usize },

    /// Accepting the rule would introduce a circular co-run dependency.
    #[error("rule would create {count} circular co-run {noun}", count = .cycles.len(), noun = dependency_noun(.cycles.len()))]
    CyclicRule { cycles: Vec<Cycle> },

    /// Natural-language text did not describe a co-run rule.
    #[error("could not understand rule: {0:?}")]
    UnparseableRule(String),

    /// Rule suggestions were not a JSON array of rule objects.
    #[error("invalid rule suggestions: {0}")]
    InvalidSuggestions(#[from] serde_json::Error),

    /// Row index outside the batch.
    #[error("row {row} out of range for {entity} ({len} rows)")]
    RowOutOfRange {
        entity: Entity,
        row: usize,
        len: usize,
    },

    /// Column not present in any row of the batch.
    #[error("no column {column:?} in {entity}")]
    UnknownColumn { entity: Entity, column: String },

    /// Column name empty or already used in the batch.
    #[error("column name {column:?} is empty or already used in {entity}")]
    ColumnNameTaken { entity: Entity, column: String },

    /// Entity name other than clients, workers or tasks.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

fn dependency_noun(count: usize) -> &'static str {
    if count == 1 {
        "dependency"
    } else {
        "dependencies"
    }
}

/// Result alias for fallible core operations.
pub type Result<T> = std::result::Result<T, AlchemistError>;
