//! Heuristic co-run suggestions.
//!
//! Tasks of similar length are natural candidates to run together. Tasks
//! are bucketed by duration rounded to the nearest bucket multiple; every
//! bucket with enough tasks becomes one suggested rule.

use indexmap::IndexMap;

use crate::config::SuggestionConfig;
use crate::models::cell::parse_number;
use crate::models::{columns, CoRunRule, Record};

/// Duration bucket key. `None` collects tasks without a `Duration` column or
/// with a non-numeric one; blank text counts as zero.
type Bucket = Option<i64>;

fn bucket_of(task: &Record, width: f64) -> Bucket {
    let duration = parse_number(task.get(columns::DURATION)?)?;
    // Round half up, like a spreadsheet ROUND on positive values.
    let rounded = ((duration / width) + 0.5).floor() * width;
    rounded.is_finite().then_some(rounded as i64)
}

/// Suggests co-run rules by grouping tasks of similar duration.
///
/// Buckets appear in order of their first task; task ids keep batch order.
/// A task without a `TaskID` contributes an empty id.
pub fn suggest_co_run_rules(tasks: &[Record], config: &SuggestionConfig) -> Vec<CoRunRule> {
    let mut buckets: IndexMap<Bucket, Vec<String>> = IndexMap::new();
    for task in tasks {
        buckets
            .entry(bucket_of(task, config.duration_bucket))
            .or_default()
            .push(task.get_or_empty(columns::TASK_ID).to_string());
    }

    buckets
        .into_values()
        .filter(|group| group.len() >= config.min_group_size)
        .map(|tasks| CoRunRule { tasks })
        .collect()
}
