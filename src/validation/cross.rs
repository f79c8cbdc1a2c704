//! Cross-entity checks.
//!
//! Reconciles the three batches: every task a client requests must exist,
//! and every skill a worker offers must be required by some task. Findings
//! are attributed to the concrete row that holds the bad reference.

use indexmap::IndexMap;
use std::collections::HashSet;

use super::{ErrorKind, ValidationError};
use crate::models::cell::split_bracketed_list;
use crate::models::{columns, Entity, Record};

/// Trimmed IDs of every task that has a `TaskID` column.
pub fn task_id_set(tasks: &[Record]) -> HashSet<&str> {
    tasks
        .iter()
        .filter_map(|t| t.get(columns::TASK_ID))
        .map(str::trim)
        .collect()
}

/// Union of all tasks' `RequiredSkills`, brackets stripped.
pub fn required_skill_set(tasks: &[Record]) -> HashSet<String> {
    tasks
        .iter()
        .flat_map(|t| split_bracketed_list(t.get_or_empty(columns::REQUIRED_SKILLS)))
        .collect()
}

/// Checks references between clients, workers and tasks.
///
/// 1. Each token of a client's `RequestedTaskIDs` must be a known `TaskID`.
/// 2. Each token of a worker's `Skills` must appear in some task's
///    `RequiredSkills`.
///
/// Errors come out in client row order, then worker row order, and within a
/// row in token order.
pub fn cross_validate(
    clients: &[Record],
    workers: &[Record],
    tasks: &[Record],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let task_ids = task_id_set(tasks);
    let required_skills = required_skill_set(tasks);

    for (row, client) in clients.iter().enumerate() {
        for task_id in client.list(columns::REQUESTED_TASK_IDS) {
            if !task_ids.contains(task_id) {
                errors.push(ValidationError::new(
                    ErrorKind::InvalidTaskReference,
                    format!("TaskID {task_id} does not exist in tasks"),
                    Entity::Clients,
                    row,
                    columns::REQUESTED_TASK_IDS,
                ));
            }
        }
    }

    for (row, worker) in workers.iter().enumerate() {
        for skill in worker.list(columns::SKILLS) {
            if !required_skills.contains(skill) {
                errors.push(ValidationError::new(
                    ErrorKind::UnusedSkill,
                    format!("Skill {skill} is not required by any task"),
                    Entity::Workers,
                    row,
                    columns::SKILLS,
                ));
            }
        }
    }

    errors
}

/// Summarizes cross-entity errors as `"<message> (<n> issue[s])"` lines.
///
/// Only `InvalidTaskReference` and `UnusedSkill` errors are counted.
/// Identical messages are grouped; lines follow first appearance.
pub fn cross_validation_issues(errors: &[ValidationError]) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for error in errors.iter().filter(|e| e.kind.is_cross_entity()) {
        *counts.entry(error.message.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(message, n)| {
            let noun = if n > 1 { "issues" } else { "issue" };
            format!("{message} ({n} {noun})")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(requested: &str) -> Record {
        Record::new()
            .with("ClientID", "C1")
            .with("PriorityLevel", "1")
            .with("RequestedTaskIDs", requested)
    }

    fn worker(id: &str, skills: &str) -> Record {
        Record::new().with("WorkerID", id).with("Skills", skills)
    }

    fn task(id: &str, skills: &str) -> Record {
        Record::new().with("TaskID", id).with("RequiredSkills", skills)
    }

    #[test]
    fn test_unknown_task_reference() {
        let errors = cross_validate(&[client("T9")], &[], &[]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::InvalidTaskReference);
        assert_eq!(errors[0].entity, Entity::Clients);
        assert_eq!(errors[0].row, 0);
        assert_eq!(errors[0].field, "RequestedTaskIDs");
        assert_eq!(errors[0].message, "TaskID T9 does not exist in tasks");
    }

    #[test]
    fn test_task_ids_trimmed() {
        let tasks = vec![task(" T1 ", ""), task("T2", "")];
        let errors = cross_validate(&[client("T1, T2 ,, T3")], &[], &tasks);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("T3"));
    }

    #[test]
    fn test_bracketed_required_skills() {
        let tasks = vec![task("T1", "[cook, clean]")];
        let workers = vec![worker("W1", "cook"), worker("W2", "clean, drive, ")];
        let errors = cross_validate(&[], &workers, &tasks);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::UnusedSkill);
        assert_eq!(errors[0].entity, Entity::Workers);
        assert_eq!(errors[0].row, 1);
        assert_eq!(errors[0].message, "Skill drive is not required by any task");
    }

    #[test]
    fn test_emission_order() {
        let tasks = vec![task("T1", "a")];
        let clients = vec![client("X, Y"), client("Z")];
        let workers = vec![worker("W1", "b, c")];
        let errors = cross_validate(&clients, &workers, &tasks);
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "TaskID X does not exist in tasks",
                "TaskID Y does not exist in tasks",
                "TaskID Z does not exist in tasks",
                "Skill b is not required by any task",
                "Skill c is not required by any task",
            ]
        );
        assert_eq!(errors.iter().map(|e| e.row).collect::<Vec<_>>(), vec![0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_task_id_set() {
        let tasks = vec![task(" A", ""), Record::new(), task("B ", "")];
        let ids = task_id_set(&tasks);
        assert_eq!(ids, HashSet::from(["A", "B"]));
    }

    #[test]
    fn test_issue_summary() {
        let tasks = vec![task("T1", "a")];
        let clients = vec![client("T9"), client("T9"), client("T8")];
        let workers = vec![worker("W1", "z")];
        let errors = cross_validate(&clients, &workers, &tasks);

        let issues = cross_validation_issues(&errors);
        assert_eq!(
            issues,
            vec![
                "TaskID T9 does not exist in tasks (2 issues)",
                "TaskID T8 does not exist in tasks (1 issue)",
                "Skill z is not required by any task (1 issue)",
            ]
        );
    }

    #[test]
    fn test_issue_summary_ignores_entity_errors() {
        let errors = crate::validation::validate_tasks(&[Record::new()]);
        assert!(!errors.is_empty());
        assert!(cross_validation_issues(&errors).is_empty());
    }
}
