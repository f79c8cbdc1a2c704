//! Co-run rules: graph, cycle detection, acceptance and sources.
//!
//! Rules reach the rule list from several places: picked by hand, parsed
//! from a sentence, proposed by the duration heuristic or returned by the
//! AI suggestion service. All of them end up as [`CoRunRule`]s checked by the
//! same cycle detector.
//!
//! # Usage
//!
//! ```
//! use data_alchemist::config::RulePolicy;
//! use data_alchemist::models::CoRunRule;
//! use data_alchemist::rules::{parse_natural_rule, RuleSet};
//!
//! let policy = RulePolicy::default();
//! let mut rules = RuleSet::new();
//! rules.try_add_co_run(CoRunRule::new(["A", "B"]), &policy).unwrap();
//! rules.try_add_co_run(parse_natural_rule("make b and c co-run").unwrap(), &policy).unwrap();
//!
//! // C with A would close the loop A-B-C.
//! assert!(rules.try_add_co_run(CoRunRule::new(["C", "A"]), &policy).is_err());
//! ```
//!
//! [`CoRunRule`]: crate::models::CoRunRule

mod graph;
mod natural;
mod set;
mod suggest;

pub use graph::{detect_circular_co_run, RuleGraph};
pub use natural::parse_natural_rule;
pub use set::{MergeOutcome, RuleSet};
pub use suggest::suggest_co_run_rules;
