//! Core configuration.
//!
//! Every field has a default, so an empty JSON object is a complete
//! configuration. Settings can also be built in code with the `with_*`
//! setters.
//!
//! ```
//! use data_alchemist::config::{AlchemistConfig, CycleFilter};
//!
//! let config = AlchemistConfig::from_json_str(
//!     r#"{ "rules": { "cycleFilter": { "minLength": 3 } } }"#,
//! ).unwrap();
//! assert_eq!(config.rules.cycle_filter, CycleFilter::MinLength(3));
//! assert_eq!(config.rules.min_tasks_per_rule, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{AlchemistError, Result};
use crate::models::{CoRunRule, Cycle};
use crate::rules::{detect_circular_co_run, RuleGraph};

/// Which cycles count as circular dependencies.
///
/// The raw detector reports every back edge it meets, including the two-task
/// mutual edge every co-run rule creates. Consumers pick a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CycleFilter {
    /// Report every cycle the detector finds.
    All,
    /// Report detected cycles with at least this many tasks.
    MinLength(usize),
    /// Report cycles that no single rule fully contains.
    #[default]
    SpanningRules,
}

impl CycleFilter {
    /// Cycles this filter reports for a rule list.
    ///
    /// `All` and `MinLength` work on the depth-first detector output.
    /// `SpanningRules` is decided from the rules themselves, so adding the
    /// same rules in a different order gives the same verdict.
    pub fn find(&self, rules: &[CoRunRule]) -> Vec<Cycle> {
        match *self {
            CycleFilter::All => detect_circular_co_run(rules),
            CycleFilter::MinLength(min) => detect_circular_co_run(rules)
                .into_iter()
                .filter(|c| c.len() >= min)
                .collect(),
            CycleFilter::SpanningRules => RuleGraph::from_rules(rules).spanning_cycles(rules),
        }
    }
}

/// Acceptance policy for co-run rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RulePolicy {
    /// Minimum number of tasks a co-run rule must list.
    pub min_tasks_per_rule: usize,
    /// Which cycles block acceptance and appear in reports.
    pub cycle_filter: CycleFilter,
    /// Reject rules that introduce a reported cycle.
    pub reject_cyclic_rules: bool,
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self {
            min_tasks_per_rule: 2,
            cycle_filter: CycleFilter::default(),
            reject_cyclic_rules: true,
        }
    }
}

impl RulePolicy {
    /// Sets the minimum task count.
    pub fn with_min_tasks(mut self, min: usize) -> Self {
        self.min_tasks_per_rule = min;
        self
    }

    /// Sets the cycle filter.
    pub fn with_cycle_filter(mut self, filter: CycleFilter) -> Self {
        self.cycle_filter = filter;
        self
    }

    /// Sets whether cyclic rules are rejected.
    pub fn with_reject_cyclic(mut self, reject: bool) -> Self {
        self.reject_cyclic_rules = reject;
        self
    }
}

/// Settings for the duration-bucket co-run suggester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuggestionConfig {
    /// Bucket width; durations round to the nearest multiple.
    pub duration_bucket: f64,
    /// Minimum bucket size that yields a rule.
    pub min_group_size: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            duration_bucket: 10.0,
            min_group_size: 2,
        }
    }
}

impl SuggestionConfig {
    /// Sets the bucket width.
    pub fn with_bucket(mut self, width: f64) -> Self {
        self.duration_bucket = width;
        self
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlchemistConfig {
    /// Co-run rule acceptance.
    pub rules: RulePolicy,
    /// Heuristic rule suggestions.
    pub suggestions: SuggestionConfig,
}

impl AlchemistConfig {
    /// Parses a JSON configuration; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AlchemistError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Sets the rule policy.
    pub fn with_rules(mut self, rules: RulePolicy) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the suggestion settings.
    pub fn with_suggestions(mut self, suggestions: SuggestionConfig) -> Self {
        self.suggestions = suggestions;
        self
    }

    fn check(&self) -> Result<()> {
        if !(self.suggestions.duration_bucket.is_finite() && self.suggestions.duration_bucket > 0.0)
        {
            return Err(AlchemistError::Config(format!(
                "durationBucket must be a positive number, got {}",
                self.suggestions.duration_bucket
            )));
        }
        Ok(())
    }
}
