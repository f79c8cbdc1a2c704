//! Record (row) model.
//!
//! A record is one spreadsheet row: an ordered mapping from column name to
//! cell text. Rows carry no identity of their own; within a batch a row is
//! identified by its zero-based position.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::cell;

/// Column names the core reads.
pub mod columns {
    /// clients: unique client identifier.
    pub const CLIENT_ID: &str = "ClientID";
    /// clients: display name.
    pub const CLIENT_NAME: &str = "ClientName";
    /// clients: integer priority, 1 (highest) to 5.
    pub const PRIORITY_LEVEL: &str = "PriorityLevel";
    /// clients: comma-separated task ids.
    pub const REQUESTED_TASK_IDS: &str = "RequestedTaskIDs";
    /// clients: free-form JSON attributes.
    pub const ATTRIBUTES_JSON: &str = "AttributesJSON";

    /// workers: unique worker identifier.
    pub const WORKER_ID: &str = "WorkerID";
    /// workers: display name.
    pub const WORKER_NAME: &str = "WorkerName";
    /// workers: comma-separated skills.
    pub const SKILLS: &str = "Skills";

    /// tasks: unique task identifier.
    pub const TASK_ID: &str = "TaskID";
    /// tasks: numeric duration.
    pub const DURATION: &str = "Duration";
    /// tasks: comma-separated skills, optionally bracketed.
    pub const REQUIRED_SKILLS: &str = "RequiredSkills";
}

/// The entity type a batch describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    /// Clients requesting tasks.
    Clients,
    /// Workers offering skills.
    Workers,
    /// Tasks requiring skills.
    Tasks,
}

impl Entity {
    /// All entities in reporting order.
    pub const ALL: [Entity; 3] = [Entity::Clients, Entity::Workers, Entity::Tasks];

    /// Lowercase name, as used in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Clients => "clients",
            Entity::Workers => "workers",
            Entity::Tasks => "tasks",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = crate::AlchemistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clients" => Ok(Entity::Clients),
            "workers" => Ok(Entity::Workers),
            "tasks" => Ok(Entity::Tasks),
            _ => Err(crate::AlchemistError::UnknownEntity(s.to_string())),
        }
    }
}

/// One spreadsheet row.
///
/// Keys keep their first-insertion order so a row can be written back out
/// with its original column layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    cells: IndexMap<String, String>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a cell.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Adds or replaces a cell in place.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(field.into(), value.into());
    }

    /// Cell text, if the column is present.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.cells.get(field).map(String::as_str)
    }

    /// Cell text, or `""` if the column is absent.
    pub fn get_or_empty(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    /// Whether a cell is absent or empty.
    ///
    /// Only emptiness counts: `"0"` and whitespace are present values.
    pub fn is_missing(&self, field: &str) -> bool {
        self.get(field).map_or(true, str::is_empty)
    }

    /// Comma-separated tokens of a cell, trimmed, empties dropped.
    pub fn list(&self, field: &str) -> impl Iterator<Item = &str> {
        cell::split_list(self.get_or_empty(field))
    }

    /// Renames a column in place, keeping its position.
    ///
    /// Returns `false` if the column is absent.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> bool {
        match self.cells.shift_remove_full(from) {
            Some((index, _, value)) => {
                self.cells.shift_insert(index, to.into(), value);
                true
            }
            None => false,
        }
    }

    /// Inserts a cell right after `after`.
    ///
    /// Returns `false`, leaving the record untouched, if `after` is absent.
    pub fn insert_after(
        &mut self,
        after: &str,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        match self.cells.get_index_of(after) {
            Some(index) => {
                self.cells.shift_insert(index + 1, field.into(), value.into());
                true
            }
            None => false,
        }
    }

    /// Removes a cell, keeping the order of the others.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.cells.shift_remove(field)
    }

    /// Column names in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the record has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
