//! Per-entity checks.
//!
//! Each validator looks at one batch in isolation. Duplicate detection keeps
//! a seen-set that is updated on every row, including rows whose ID is
//! missing; only the second and later occurrences of an ID are flagged.

use std::collections::HashSet;

use super::{ErrorKind, ValidationError};
use crate::models::cell::{parse_leading_int, parse_number};
use crate::models::{columns, Entity, Record};

const REQUIRED_CLIENT_COLUMNS: [&str; 4] = [
    columns::CLIENT_ID,
    columns::CLIENT_NAME,
    columns::PRIORITY_LEVEL,
    columns::REQUESTED_TASK_IDS,
];

const PRIORITY_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// Validates the clients batch.
///
/// Checks:
/// 1. `ClientID`, `ClientName`, `PriorityLevel`, `RequestedTaskIDs` present
/// 2. `PriorityLevel` is an integer in 1..=5
/// 3. `AttributesJSON`, when filled in, is valid JSON
pub fn validate_clients(clients: &[Record]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (row, client) in clients.iter().enumerate() {
        for col in REQUIRED_CLIENT_COLUMNS {
            if client.is_missing(col) {
                errors.push(ValidationError::new(
                    ErrorKind::MissingColumn,
                    format!("Missing value for {col}"),
                    Entity::Clients,
                    row,
                    col,
                ));
            }
        }

        let priority = client
            .get(columns::PRIORITY_LEVEL)
            .and_then(parse_leading_int);
        if !priority.is_some_and(|p| PRIORITY_RANGE.contains(&p)) {
            errors.push(ValidationError::new(
                ErrorKind::InvalidPriority,
                "PriorityLevel should be between 1 and 5",
                Entity::Clients,
                row,
                columns::PRIORITY_LEVEL,
            ));
        }

        if let Some(attrs) = client.get(columns::ATTRIBUTES_JSON).filter(|s| !s.is_empty()) {
            if serde_json::from_str::<serde_json::Value>(attrs).is_err() {
                errors.push(ValidationError::new(
                    ErrorKind::InvalidJson,
                    "AttributesJSON is not valid JSON",
                    Entity::Clients,
                    row,
                    columns::ATTRIBUTES_JSON,
                ));
            }
        }
    }

    errors
}

/// Validates the workers batch.
///
/// Checks:
/// 1. `WorkerID` present and not repeated
/// 2. `WorkerName` present
pub fn validate_workers(workers: &[Record]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<Option<&str>> = HashSet::new();

    for (row, worker) in workers.iter().enumerate() {
        let id = worker.get(columns::WORKER_ID);
        if worker.is_missing(columns::WORKER_ID) {
            errors.push(ValidationError::new(
                ErrorKind::MissingWorkerId,
                "WorkerID is required",
                Entity::Workers,
                row,
                columns::WORKER_ID,
            ));
        } else if seen.contains(&id) {
            errors.push(ValidationError::new(
                ErrorKind::DuplicateWorkerId,
                format!("Duplicate WorkerID {}", id.unwrap_or_default()),
                Entity::Workers,
                row,
                columns::WORKER_ID,
            ));
        }
        seen.insert(id);

        if worker.is_missing(columns::WORKER_NAME) {
            errors.push(ValidationError::new(
                ErrorKind::MissingWorkerName,
                "WorkerName is required",
                Entity::Workers,
                row,
                columns::WORKER_NAME,
            ));
        }
    }

    errors
}

/// Validates the tasks batch.
///
/// Checks:
/// 1. `TaskID` present and not repeated
/// 2. `Duration` present and numeric
pub fn validate_tasks(tasks: &[Record]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<Option<&str>> = HashSet::new();

    for (row, task) in tasks.iter().enumerate() {
        let id = task.get(columns::TASK_ID);
        if task.is_missing(columns::TASK_ID) {
            errors.push(ValidationError::new(
                ErrorKind::MissingTaskId,
                "TaskID is required",
                Entity::Tasks,
                row,
                columns::TASK_ID,
            ));
        } else if seen.contains(&id) {
            errors.push(ValidationError::new(
                ErrorKind::DuplicateTaskId,
                format!("Duplicate TaskID {}", id.unwrap_or_default()),
                Entity::Tasks,
                row,
                columns::TASK_ID,
            ));
        }
        seen.insert(id);

        let duration_ok = !task.is_missing(columns::DURATION)
            && parse_number(task.get_or_empty(columns::DURATION)).is_some();
        if !duration_ok {
            errors.push(ValidationError::new(
                ErrorKind::InvalidDuration,
                "Duration must be a number",
                Entity::Tasks,
                row,
                columns::DURATION,
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(errors: &[ValidationError]) -> Vec<ErrorKind> {
        errors.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_client_missing_columns() {
        let clients = vec![Record::new()
            .with("ClientID", "C1")
            .with("ClientName", "")
            .with("PriorityLevel", "2")];

        let errors = validate_clients(&clients);
        assert_eq!(kinds(&errors), vec![ErrorKind::MissingColumn, ErrorKind::MissingColumn]);
        assert_eq!(errors[0].field, "ClientName");
        assert_eq!(errors[0].message, "Missing value for ClientName");
        assert_eq!(errors[1].field, "RequestedTaskIDs");
    }

    #[test]
    fn test_client_priority_bounds() {
        let make = |p: &str| {
            Record::new()
                .with("ClientID", "C1")
                .with("ClientName", "n")
                .with("PriorityLevel", p)
                .with("RequestedTaskIDs", "T1")
        };
        for ok in ["1", "5", "3.7", " 4"] {
            assert!(validate_clients(&[make(ok)]).is_empty(), "{ok} should pass");
        }
        for bad in ["0", "6", "-1", "high"] {
            let errors = validate_clients(&[make(bad)]);
            assert_eq!(kinds(&errors), vec![ErrorKind::InvalidPriority], "{bad} should fail");
        }
    }

    #[test]
    fn test_client_missing_priority_reports_both() {
        let client = Record::new()
            .with("ClientID", "C1")
            .with("ClientName", "n")
            .with("RequestedTaskIDs", "T1");
        let errors = validate_clients(&[client]);
        assert_eq!(kinds(&errors), vec![ErrorKind::MissingColumn, ErrorKind::InvalidPriority]);
    }

    #[test]
    fn test_client_attributes_json() {
        let make = |attrs: &str| {
            Record::new()
                .with("ClientID", "C1")
                .with("ClientName", "n")
                .with("PriorityLevel", "1")
                .with("RequestedTaskIDs", "T1")
                .with("AttributesJSON", attrs)
        };
        assert!(validate_clients(&[make(r#"{"vip": true}"#)]).is_empty());
        assert!(validate_clients(&[make("")]).is_empty());
        assert!(validate_clients(&[make("42")]).is_empty());

        let errors = validate_clients(&[make("{vip: true")]);
        assert_eq!(kinds(&errors), vec![ErrorKind::InvalidJson]);
        assert_eq!(errors[0].field, "AttributesJSON");
    }

    #[test]
    fn test_worker_duplicates_first_unflagged() {
        let workers = vec![
            Record::new().with("WorkerID", "W1").with("WorkerName", "a"),
            Record::new().with("WorkerID", "W2").with("WorkerName", "b"),
            Record::new().with("WorkerID", "W1").with("WorkerName", "c"),
            Record::new().with("WorkerID", "W1").with("WorkerName", "d"),
        ];
        let errors = validate_workers(&workers);
        assert_eq!(kinds(&errors), vec![ErrorKind::DuplicateWorkerId; 2]);
        assert_eq!(errors[0].row, 2);
        assert_eq!(errors[1].row, 3);
        assert_eq!(errors[0].message, "Duplicate WorkerID W1");
    }

    #[test]
    fn test_worker_missing_id_never_duplicate() {
        let workers = vec![
            Record::new().with("WorkerID", "").with("WorkerName", "a"),
            Record::new().with("WorkerID", "").with("WorkerName", "b"),
            Record::new().with("WorkerName", "c"),
        ];
        let errors = validate_workers(&workers);
        assert_eq!(kinds(&errors), vec![ErrorKind::MissingWorkerId; 3]);
        assert_eq!(errors.iter().map(|e| e.row).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_worker_zero_id_is_present() {
        let workers = vec![
            Record::new().with("WorkerID", "0").with("WorkerName", "a"),
            Record::new().with("WorkerID", "0"),
        ];
        let errors = validate_workers(&workers);
        assert_eq!(
            kinds(&errors),
            vec![ErrorKind::DuplicateWorkerId, ErrorKind::MissingWorkerName]
        );
        assert!(errors.iter().all(|e| e.row == 1));
    }

    #[test]
    fn test_task_checks() {
        let tasks = vec![
            Record::new().with("TaskID", "T1").with("Duration", "3"),
            Record::new().with("TaskID", "T1").with("Duration", "abc"),
            Record::new().with("Duration", ""),
            Record::new().with("TaskID", "T2").with("Duration", "0"),
        ];
        let errors = validate_tasks(&tasks);
        assert_eq!(
            kinds(&errors),
            vec![
                ErrorKind::DuplicateTaskId,
                ErrorKind::InvalidDuration,
                ErrorKind::MissingTaskId,
                ErrorKind::InvalidDuration,
            ]
        );
        assert_eq!(errors.iter().map(|e| e.row).collect::<Vec<_>>(), vec![1, 1, 2, 2]);
    }

    #[test]
    fn test_validators_do_not_flag_clean_rows() {
        let tasks = vec![Record::new().with("TaskID", "T1").with("Duration", "1.5")];
        assert!(validate_tasks(&tasks).is_empty());
        assert!(validate_workers(&[]).is_empty());
        assert!(validate_clients(&[]).is_empty());
    }
}
