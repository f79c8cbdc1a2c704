//! Spreadsheet domain models.
//!
//! Provides the data types shared by validation, rule handling and
//! assignment suggestion. All rows are schema-on-read: a [`Record`] holds
//! whatever columns the uploaded sheet had, and each component reads only the
//! columns it needs.
//!
//! # Entity Columns
//!
//! | Entity | Identity | Checked columns |
//! |--------|----------|-----------------|
//! | clients | ClientID | ClientName, PriorityLevel, RequestedTaskIDs, AttributesJSON |
//! | workers | WorkerID | WorkerName, Skills |
//! | tasks | TaskID | Duration, RequiredSkills |

mod assignment;
pub mod cell;
mod record;
mod rule;

pub use assignment::Assignment;
pub use record::{columns, Entity, Record};
pub use rule::{CoRunRule, Cycle, LoadLimitRule, Rule};
