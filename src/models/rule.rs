//! Scheduling rule models.
//!
//! Rules constrain how tasks may be scheduled. A co-run rule declares a group
//! of tasks that must run together; a load-limit rule caps the slots a worker
//! group may take per phase. Each rule type writes its own tag, so a rule
//! serializes to the same JSON shape on its own or inside a [`Rule`]:
//!
//! ```json
//! { "type": "coRun", "tasks": ["T1", "T3"] }
//! { "type": "loadLimit", "workerGroup": "G1", "maxSlotsPerPhase": 2 }
//! ```

use serde::{Deserialize, Serialize, Serializer};

/// A group of tasks that must be scheduled together.
///
/// The task list has no structural minimum; the "at least two tasks" policy
/// is enforced when a rule is accepted into a [`RuleSet`](crate::rules::RuleSet).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "coRun")]
pub struct CoRunRule {
    /// Task identifiers, in the order given.
    pub tasks: Vec<String>,
}

impl CoRunRule {
    /// Creates a co-run rule over the given tasks.
    pub fn new<I, S>(tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tasks: tasks.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether every task of `cycle` is covered by this rule.
    pub fn contains_all(&self, cycle: &[String]) -> bool {
        cycle.iter().all(|t| self.tasks.contains(t))
    }

    /// Number of listed tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

/// A per-phase slot cap for a worker group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "loadLimit", rename_all = "camelCase")]
pub struct LoadLimitRule {
    /// Worker group name.
    pub worker_group: String,
    /// Maximum slots the group may take per phase.
    pub max_slots_per_phase: u32,
}

/// Any rule the rule list may hold.
///
/// Deserialization dispatches on `type`; serialization defers to the inner
/// rule, which writes the tag itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Rule {
    /// Tasks that must run together.
    CoRun(CoRunRule),
    /// Worker-group load cap.
    LoadLimit(LoadLimitRule),
}

impl Rule {
    /// The co-run payload, if this is a co-run rule.
    pub fn as_co_run(&self) -> Option<&CoRunRule> {
        match self {
            Rule::CoRun(rule) => Some(rule),
            Rule::LoadLimit(_) => None,
        }
    }

    /// Tag name as serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::CoRun(_) => "coRun",
            Rule::LoadLimit(_) => "loadLimit",
        }
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rule::CoRun(rule) => rule.serialize(serializer),
            Rule::LoadLimit(rule) => rule.serialize(serializer),
        }
    }
}

impl From<CoRunRule> for Rule {
    fn from(rule: CoRunRule) -> Self {
        Rule::CoRun(rule)
    }
}

impl From<LoadLimitRule> for Rule {
    fn from(rule: LoadLimitRule) -> Self {
        Rule::LoadLimit(rule)
    }
}

/// A closed walk through the co-run graph.
///
/// The edge from the last task back to the first is implied.
pub type Cycle = Vec<String>;
