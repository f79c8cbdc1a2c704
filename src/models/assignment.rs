//! Assignment suggestion model.

use serde::{Deserialize, Serialize};

/// Candidate workers for one task requested by one client.
///
/// Purely advisory: the same worker may appear in many assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Requesting client.
    pub client_id: String,
    /// Requested task.
    pub task_id: String,
    /// Workers whose skills cover the task, in worker-batch order.
    pub suggested_worker_ids: Vec<String>,
}

impl Assignment {
    /// Creates an assignment with no candidates yet.
    pub fn new(client_id: impl Into<String>, task_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            task_id: task_id.into(),
            suggested_worker_ids: Vec::new(),
        }
    }

    /// Sets the candidate workers.
    pub fn with_workers(mut self, worker_ids: Vec<String>) -> Self {
        self.suggested_worker_ids = worker_ids;
        self
    }

    /// Whether at least one worker qualifies.
    #[inline]
    pub fn is_covered(&self) -> bool {
        !self.suggested_worker_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_json_shape() {
        let a = Assignment::new("C1", "T1").with_workers(vec!["W1".into()]);
        assert!(a.is_covered());
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"clientId": "C1", "taskId": "T1", "suggestedWorkerIds": ["W1"]})
        );
    }

    #[test]
    fn test_uncovered() {
        assert!(!Assignment::new("C1", "T1").is_covered());
    }
}
