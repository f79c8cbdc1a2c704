//! Input validation for uploaded spreadsheets.
//!
//! Checks each entity batch on its own, then checks the three batches
//! against each other. Detects:
//! - Missing required values
//! - Out-of-range priorities, malformed JSON attributes, non-numeric durations
//! - Duplicate worker and task IDs
//! - Client requests for unknown tasks
//! - Worker skills no task requires
//!
//! Every finding is returned as data. Validation never fails and never
//! stops at the first problem; the caller decides how to present the list.

mod cross;
mod entity;

pub use cross::{cross_validate, cross_validation_issues, required_skill_set, task_id_set};
pub use entity::{validate_clients, validate_tasks, validate_workers};

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::models::{Entity, Record};

/// A single validation finding.
///
/// Points at one cell: `row` indexes the batch named by `entity` and `field`
/// is the column name. Several findings may point at the same cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Batch owning the offending row.
    pub entity: Entity,
    /// Zero-based row index within that batch.
    pub row: usize,
    /// Offending column.
    pub field: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A required client column is empty.
    MissingColumn,
    /// `PriorityLevel` is not an integer in 1..=5.
    InvalidPriority,
    /// `AttributesJSON` does not parse.
    #[serde(rename = "InvalidJSON")]
    InvalidJson,
    /// `WorkerID` is empty.
    #[serde(rename = "MissingWorkerID")]
    MissingWorkerId,
    /// `WorkerID` repeats an earlier row.
    #[serde(rename = "DuplicateWorkerID")]
    DuplicateWorkerId,
    /// `WorkerName` is empty.
    MissingWorkerName,
    /// `TaskID` is empty.
    #[serde(rename = "MissingTaskID")]
    MissingTaskId,
    /// `TaskID` repeats an earlier row.
    #[serde(rename = "DuplicateTaskID")]
    DuplicateTaskId,
    /// `Duration` is empty or not a number.
    InvalidDuration,
    /// A client requests a task that does not exist.
    InvalidTaskReference,
    /// A worker lists a skill no task requires.
    UnusedSkill,
}

impl ErrorKind {
    /// Canonical name, as exported.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingColumn => "MissingColumn",
            ErrorKind::InvalidPriority => "InvalidPriority",
            ErrorKind::InvalidJson => "InvalidJSON",
            ErrorKind::MissingWorkerId => "MissingWorkerID",
            ErrorKind::DuplicateWorkerId => "DuplicateWorkerID",
            ErrorKind::MissingWorkerName => "MissingWorkerName",
            ErrorKind::MissingTaskId => "MissingTaskID",
            ErrorKind::DuplicateTaskId => "DuplicateTaskID",
            ErrorKind::InvalidDuration => "InvalidDuration",
            ErrorKind::InvalidTaskReference => "InvalidTaskReference",
            ErrorKind::UnusedSkill => "UnusedSkill",
        }
    }

    /// Whether this kind needs more than one batch to detect.
    pub fn is_cross_entity(&self) -> bool {
        matches!(self, ErrorKind::InvalidTaskReference | ErrorKind::UnusedSkill)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValidationError {
    fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        entity: Entity,
        row: usize,
        field: &str,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            entity,
            row,
            field: field.to_string(),
        }
    }
}

/// Result of validating all three batches together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Clients, workers, tasks and cross-entity errors, in that order.
    pub errors: Vec<ValidationError>,
    /// Grouped cross-entity messages with counts.
    pub cross_issues: Vec<String>,
}

impl ValidationReport {
    /// Whether no errors were found.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of errors attributed to an entity.
    pub fn count_for(&self, entity: Entity) -> usize {
        self.errors.iter().filter(|e| e.entity == entity).count()
    }

    /// Errors pointing at one row.
    pub fn errors_for_row(&self, entity: Entity, row: usize) -> impl Iterator<Item = &ValidationError> {
        self.errors
            .iter()
            .filter(move |e| e.entity == entity && e.row == row)
    }

    /// Number of errors of one kind.
    pub fn count_kind(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }
}

/// Validates all three batches.
///
/// Runs the per-entity validators, then the cross-entity validator, and
/// concatenates their output. An empty batch is valid input; cross checks
/// treat it as "no rows".
pub fn validate_all(clients: &[Record], workers: &[Record], tasks: &[Record]) -> ValidationReport {
    let mut errors = validate_clients(clients);
    errors.extend(validate_workers(workers));
    errors.extend(validate_tasks(tasks));

    let cross = cross_validate(clients, workers, tasks);
    let cross_issues = cross_validation_issues(&cross);
    errors.extend(cross);

    debug!(
        clients = clients.len(),
        workers = workers.len(),
        tasks = tasks.len(),
        errors = errors.len(),
        "validated batches"
    );

    ValidationReport {
        errors,
        cross_issues,
    }
}
