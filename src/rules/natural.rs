//! Plain-text co-run rules.
//!
//! Understands phrases such as "Make T1, T2 and T3 co-run" or
//! "add a,b corun". Task ids come back uppercased.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::CoRunRule;

static CO_RUN_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:make|add)?\s*([\w,\s]+?)\s*(?:\band\b)?\s*\b(\w+)?\s*co-?run")
        .expect("co-run phrase pattern is valid")
});

/// Parses a sentence into a co-run rule.
///
/// The text before the optional final "and" is split on commas; the word
/// after it is appended. Task ids are whole words, so "t1 co-run" names one
/// task, not "T" and "1". Returns `None` when the phrase is not recognized or
/// names fewer than two tasks.
pub fn parse_natural_rule(input: &str) -> Option<CoRunRule> {
    let lower = input.trim().to_lowercase();
    let caps = CO_RUN_PHRASE.captures(&lower)?;

    let mut tasks: Vec<String> = caps
        .get(1)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(last) = caps.get(2) {
        tasks.push(last.as_str().trim().to_uppercase());
    }

    if tasks.len() < 2 {
        return None;
    }
    Some(CoRunRule { tasks })
}
