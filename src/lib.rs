//! Spreadsheet ingestion core for client, worker and task sheets.
//!
//! Validates uploaded tables, manages co-run scheduling rules and proposes
//! worker assignments. File decoding, rendering and export formatting are
//! left to the caller; this crate works on parsed rows and returns plain
//! data.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Record`, `Entity`, `CoRunRule`, `Rule`,
//!   `Cycle`, `Assignment`
//! - **`validation`**: Per-entity checks (required values, formats, duplicate
//!   IDs) and cross-entity checks (task references, unused skills)
//! - **`rules`**: Co-run rule graph, cycle detection, acceptance gate,
//!   natural-language and heuristic rule sources
//! - **`scheduler`**: Greedy priority-ordered skill matching
//! - **`workbook`**: Owned state for the three batches and the rule list
//! - **`config`**: Rule policy and suggestion settings
//!
//! # Example
//!
//! ```
//! use data_alchemist::models::{Entity, Record};
//! use data_alchemist::workbook::Workbook;
//!
//! let mut wb = Workbook::new();
//! wb.replace_batch(Entity::Clients, vec![Record::new()
//!     .with("ClientID", "C1")
//!     .with("ClientName", "Acme")
//!     .with("PriorityLevel", "1")
//!     .with("RequestedTaskIDs", "T9")]);
//!
//! let report = wb.validate();
//! assert_eq!(report.errors.len(), 1);
//! assert_eq!(report.errors[0].field, "RequestedTaskIDs");
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod rules;
pub mod scheduler;
pub mod validation;
pub mod workbook;

pub use error::{AlchemistError, Result};
