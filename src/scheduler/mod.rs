//! Assignment suggestion.
//!
//! Provides a greedy, priority-ordered skill matcher that proposes worker
//! candidates for each client request.
//!
//! # Algorithm
//!
//! `GreedySuggester` serves high-priority clients first and lists every
//! worker whose skills cover a task. It applies no capacity limits and does
//! not resolve conflicts between suggestions.

mod greedy;

pub use greedy::{suggest_assignments, AssignmentRequest, GreedySuggester};
