//! Greedy skill-match assignment suggester.
//!
//! # Algorithm
//!
//! 1. Sort clients by `PriorityLevel` ascending (1 first), keeping sheet
//!    order among equal priorities.
//! 2. For each client, walk its requested task ids in listed order.
//! 3. For each known task, collect every worker whose skills cover the
//!    task's required skills.
//!
//! Nothing is reserved: a worker suggested for one task stays available for
//! every other task. The output is advice for a human planner.
//!
//! # Complexity
//! O(c * r * w * s) where c=clients, r=requests/client, w=workers,
//! s=required skills/task.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::models::cell::{parse_leading_int, split_bracketed_list};
use crate::models::{columns, Assignment, Record};

/// Input container for assignment suggestion.
#[derive(Debug, Clone, Default)]
pub struct AssignmentRequest {
    /// Clients requesting tasks.
    pub clients: Vec<Record>,
    /// Known tasks.
    pub tasks: Vec<Record>,
    /// Available workers.
    pub workers: Vec<Record>,
}

impl AssignmentRequest {
    /// Creates a request from the three batches.
    pub fn new(clients: Vec<Record>, tasks: Vec<Record>, workers: Vec<Record>) -> Self {
        Self {
            clients,
            tasks,
            workers,
        }
    }
}

/// Priority-ordered greedy suggester.
///
/// # Example
///
/// ```
/// use data_alchemist::models::Record;
/// use data_alchemist::scheduler::GreedySuggester;
///
/// let clients = vec![Record::new()
///     .with("ClientID", "C1")
///     .with("PriorityLevel", "1")
///     .with("RequestedTaskIDs", "T1")];
/// let tasks = vec![Record::new().with("TaskID", "T1").with("RequiredSkills", "[cook]")];
/// let workers = vec![Record::new().with("WorkerID", "W1").with("Skills", "cook, clean")];
///
/// let assignments = GreedySuggester::new().suggest(&clients, &tasks, &workers);
/// assert_eq!(assignments.len(), 1);
/// assert_eq!(assignments[0].suggested_worker_ids, vec!["W1"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedySuggester;

impl GreedySuggester {
    /// Creates a suggester.
    pub fn new() -> Self {
        Self
    }

    /// Suggests workers for every (client, requested task) pair.
    ///
    /// Requests for unknown task ids are skipped. A known task no worker can
    /// cover still yields an assignment, with no suggested workers.
    pub fn suggest(&self, clients: &[Record], tasks: &[Record], workers: &[Record]) -> Vec<Assignment> {
        // Later rows win when a TaskID repeats.
        let task_by_id: HashMap<&str, &Record> = tasks
            .iter()
            .map(|t| (t.get_or_empty(columns::TASK_ID), t))
            .collect();

        let worker_skills: Vec<(&str, HashSet<&str>)> = workers
            .iter()
            .map(|w| {
                (
                    w.get_or_empty(columns::WORKER_ID),
                    w.list(columns::SKILLS).collect(),
                )
            })
            .collect();

        let mut assignments = Vec::new();
        for &client_idx in &self.sort_clients(clients) {
            let client = &clients[client_idx];
            let client_id = client.get_or_empty(columns::CLIENT_ID);

            for task_id in client.list(columns::REQUESTED_TASK_IDS) {
                let Some(task) = task_by_id.get(task_id) else {
                    continue;
                };
                let required = split_bracketed_list(task.get_or_empty(columns::REQUIRED_SKILLS));

                let suitable: Vec<String> = worker_skills
                    .iter()
                    .filter(|(_, skills)| required.iter().all(|r| skills.contains(r.as_str())))
                    .map(|(id, _)| id.to_string())
                    .collect();

                assignments.push(
                    Assignment::new(client_id, task.get_or_empty(columns::TASK_ID))
                        .with_workers(suitable),
                );
            }
        }

        debug!(
            clients = clients.len(),
            assignments = assignments.len(),
            "suggested assignments"
        );
        assignments
    }

    /// Suggests from a request.
    pub fn suggest_request(&self, request: &AssignmentRequest) -> Vec<Assignment> {
        self.suggest(&request.clients, &request.tasks, &request.workers)
    }

    /// Returns client indices in processing order.
    ///
    /// Ascending priority; clients whose priority does not parse go last.
    /// The sort is stable.
    pub fn sort_clients(&self, clients: &[Record]) -> Vec<usize> {
        let priorities: Vec<Option<i64>> = clients
            .iter()
            .map(|c| c.get(columns::PRIORITY_LEVEL).and_then(parse_leading_int))
            .collect();

        let mut indices: Vec<usize> = (0..clients.len()).collect();
        indices.sort_by_key(|&i| (priorities[i].is_none(), priorities[i]));
        indices
    }
}

/// Suggests workers for every client request.
///
/// Shorthand for [`GreedySuggester::suggest`].
pub fn suggest_assignments(clients: &[Record], tasks: &[Record], workers: &[Record]) -> Vec<Assignment> {
    GreedySuggester::new().suggest(clients, tasks, workers)
}
