//! The rule list and its acceptance gate.
//!
//! Co-run rules are checked before they are committed: the policy's cycle
//! filter runs over the rule list plus the candidate, and the candidate is
//! refused if anything is reported. Rules from
//! the AI suggestion service pass through the same gate as manual ones.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::RulePolicy;
use crate::error::{AlchemistError, Result};
use crate::models::{CoRunRule, Cycle, Rule};

/// Ordered list of accepted rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

/// What happened to each suggested rule in a merge.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Rules appended to the set, in suggestion order.
    pub accepted: Vec<Rule>,
    /// Co-run rules refused by the gate, with the reason.
    pub rejected: Vec<(CoRunRule, AlchemistError)>,
    /// Entries that were not a recognized rule object.
    pub ignored: usize,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// All rules in insertion order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The co-run rules, in insertion order.
    pub fn co_run_rules(&self) -> Vec<CoRunRule> {
        self.rules.iter().filter_map(Rule::as_co_run).cloned().collect()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Appends a rule without any check.
    pub fn push(&mut self, rule: impl Into<Rule>) {
        self.rules.push(rule.into());
    }

    /// Removes and returns the rule at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<Rule> {
        (index < self.rules.len()).then(|| self.rules.remove(index))
    }

    /// Removes every rule.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Cycles in the current co-run rules that the policy reports.
    pub fn cycles(&self, policy: &RulePolicy) -> Vec<Cycle> {
        policy.cycle_filter.find(&self.co_run_rules())
    }

    /// Cycles the set would report if `rule` were added.
    pub fn cycles_with(&self, rule: &CoRunRule, policy: &RulePolicy) -> Vec<Cycle> {
        let mut simulated = self.co_run_rules();
        simulated.push(rule.clone());
        policy.cycle_filter.find(&simulated)
    }

    /// Adds a co-run rule if the policy allows it.
    ///
    /// # Errors
    /// - [`AlchemistError::TooFewTasks`] if the rule lists fewer tasks than
    ///   the policy minimum
    /// - [`AlchemistError::CyclicRule`] if adding it would introduce a
    ///   reported cycle and the policy rejects cyclic rules
    pub fn try_add_co_run(&mut self, rule: CoRunRule, policy: &RulePolicy) -> Result<()> {
        if rule.task_count() < policy.min_tasks_per_rule {
            return Err(AlchemistError::TooFewTasks {
                min: policy.min_tasks_per_rule,
                got: rule.task_count(),
            });
        }

        if policy.reject_cyclic_rules {
            let cycles = self.cycles_with(&rule, policy);
            if !cycles.is_empty() {
                warn!(tasks = ?rule.tasks, cycles = cycles.len(), "rejected cyclic co-run rule");
                return Err(AlchemistError::CyclicRule { cycles });
            }
        }

        info!(tasks = ?rule.tasks, "accepted co-run rule");
        self.rules.push(Rule::CoRun(rule));
        Ok(())
    }

    /// Merges rules returned by the suggestion service.
    ///
    /// `json` must be a JSON array. Co-run entries are gated one by one in
    /// array order, so a later suggestion sees earlier accepted ones.
    /// Load-limit entries are appended as-is; other entries are ignored.
    ///
    /// # Errors
    /// [`AlchemistError::InvalidSuggestions`] if `json` is not an array.
    pub fn merge_suggestions(&mut self, json: &str, policy: &RulePolicy) -> Result<MergeOutcome> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut outcome = MergeOutcome::default();

        for entry in entries {
            match serde_json::from_value::<Rule>(entry) {
                Ok(Rule::CoRun(rule)) => match self.try_add_co_run(rule.clone(), policy) {
                    Ok(()) => outcome.accepted.push(Rule::CoRun(rule)),
                    Err(e) => outcome.rejected.push((rule, e)),
                },
                Ok(rule) => {
                    self.rules.push(rule.clone());
                    outcome.accepted.push(rule);
                }
                Err(e) => {
                    warn!(error = %e, "ignored unrecognized rule suggestion");
                    outcome.ignored += 1;
                }
            }
        }

        info!(
            accepted = outcome.accepted.len(),
            rejected = outcome.rejected.len(),
            ignored = outcome.ignored,
            "merged rule suggestions"
        );
        Ok(outcome)
    }
}
