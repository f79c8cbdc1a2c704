//! Workbook state and recomputation.
//!
//! A [`Workbook`] holds the three uploaded batches and the rule list. It is
//! plain owned state: every mutation goes through a method, and every derived
//! view (errors, cycles, assignments) is recomputed from scratch when asked
//! for. Nothing is cached, so a view can never be stale.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AlchemistConfig;
use crate::error::{AlchemistError, Result};
use crate::models::{Assignment, CoRunRule, Cycle, Entity, Record};
use crate::rules::{parse_natural_rule, suggest_co_run_rules, MergeOutcome, RuleSet};
use crate::scheduler::GreedySuggester;
use crate::validation::{validate_all, ValidationReport};

/// Row and error counts for a workbook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSummary {
    /// Client rows.
    pub clients: usize,
    /// Worker rows.
    pub workers: usize,
    /// Task rows.
    pub tasks: usize,
    /// Accepted rules.
    pub rules: usize,
    /// Validation errors.
    pub errors: usize,
}

/// Uploaded data plus rules.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    clients: Vec<Record>,
    workers: Vec<Record>,
    tasks: Vec<Record>,
    rules: RuleSet,
    config: AlchemistConfig,
}

impl Workbook {
    /// Creates an empty workbook with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty workbook with the given configuration.
    pub fn with_config(config: AlchemistConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &AlchemistConfig {
        &self.config
    }

    /// Rows of one batch.
    pub fn batch(&self, entity: Entity) -> &[Record] {
        match entity {
            Entity::Clients => &self.clients,
            Entity::Workers => &self.workers,
            Entity::Tasks => &self.tasks,
        }
    }

    fn batch_mut(&mut self, entity: Entity) -> &mut Vec<Record> {
        match entity {
            Entity::Clients => &mut self.clients,
            Entity::Workers => &mut self.workers,
            Entity::Tasks => &mut self.tasks,
        }
    }

    /// Accepted rules.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Replaces a whole batch, as after a file upload.
    pub fn replace_batch(&mut self, entity: Entity, rows: Vec<Record>) {
        info!(%entity, rows = rows.len(), "replaced batch");
        *self.batch_mut(entity) = rows;
    }

    /// Sets one cell.
    ///
    /// # Errors
    /// [`AlchemistError::RowOutOfRange`] if `row` is past the end of the batch.
    pub fn set_cell(
        &mut self,
        entity: Entity,
        row: usize,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let record = self.row_mut(entity, row)?;
        record.set(field, value);
        debug!(%entity, row, "edited cell");
        Ok(())
    }

    /// Replaces one row.
    ///
    /// # Errors
    /// [`AlchemistError::RowOutOfRange`] if `row` is past the end of the batch.
    pub fn replace_row(&mut self, entity: Entity, row: usize, record: Record) -> Result<()> {
        *self.row_mut(entity, row)? = record;
        Ok(())
    }

    /// Deletes one row; later rows shift up.
    ///
    /// # Errors
    /// [`AlchemistError::RowOutOfRange`] if `row` is past the end of the batch.
    pub fn delete_row(&mut self, entity: Entity, row: usize) -> Result<Record> {
        let batch = self.batch_mut(entity);
        if row >= batch.len() {
            return Err(AlchemistError::RowOutOfRange {
                entity,
                row,
                len: batch.len(),
            });
        }
        Ok(batch.remove(row))
    }

    /// Column names of a batch: every key of every row, in first-seen order.
    pub fn headers(&self, entity: Entity) -> Vec<String> {
        let mut headers: IndexSet<&str> = IndexSet::new();
        for record in self.batch(entity) {
            headers.extend(record.fields());
        }
        headers.into_iter().map(str::to_string).collect()
    }

    /// Appends a row with an empty cell under every header.
    ///
    /// Returns the new row index.
    pub fn add_row(&mut self, entity: Entity) -> usize {
        let record: Record = self
            .headers(entity)
            .into_iter()
            .map(|h| (h, String::new()))
            .collect();
        let batch = self.batch_mut(entity);
        batch.push(record);
        debug!(%entity, row = batch.len() - 1, "added row");
        batch.len() - 1
    }

    /// Renames a column in every row that has it.
    ///
    /// # Errors
    /// - [`AlchemistError::UnknownColumn`] if no row has `from`
    /// - [`AlchemistError::ColumnNameTaken`] if `to` is empty or already a header
    pub fn rename_column(&mut self, entity: Entity, from: &str, to: &str) -> Result<()> {
        self.check_column_edit(entity, from, to)?;
        for record in self.batch_mut(entity) {
            record.rename(from, to);
        }
        info!(%entity, from, to, "renamed column");
        Ok(())
    }

    /// Adds an empty column right after `after` in every row that has it.
    ///
    /// # Errors
    /// - [`AlchemistError::UnknownColumn`] if no row has `after`
    /// - [`AlchemistError::ColumnNameTaken`] if `name` is empty or already a header
    pub fn insert_column_after(&mut self, entity: Entity, after: &str, name: &str) -> Result<()> {
        self.check_column_edit(entity, after, name)?;
        for record in self.batch_mut(entity) {
            record.insert_after(after, name, "");
        }
        info!(%entity, after, column = name, "inserted column");
        Ok(())
    }

    /// Removes a column from every row.
    ///
    /// # Errors
    /// [`AlchemistError::UnknownColumn`] if no row has the column.
    pub fn delete_column(&mut self, entity: Entity, name: &str) -> Result<()> {
        let mut found = false;
        for record in self.batch_mut(entity) {
            found |= record.remove(name).is_some();
        }
        if !found {
            return Err(AlchemistError::UnknownColumn {
                entity,
                column: name.to_string(),
            });
        }
        info!(%entity, column = name, "deleted column");
        Ok(())
    }

    fn check_column_edit(&self, entity: Entity, existing: &str, new: &str) -> Result<()> {
        let headers = self.headers(entity);
        if !headers.iter().any(|h| h == existing) {
            return Err(AlchemistError::UnknownColumn {
                entity,
                column: existing.to_string(),
            });
        }
        if new.is_empty() || headers.iter().any(|h| h == new) {
            return Err(AlchemistError::ColumnNameTaken {
                entity,
                column: new.to_string(),
            });
        }
        Ok(())
    }

    fn row_mut(&mut self, entity: Entity, row: usize) -> Result<&mut Record> {
        let batch = self.batch_mut(entity);
        let len = batch.len();
        batch
            .get_mut(row)
            .ok_or(AlchemistError::RowOutOfRange { entity, row, len })
    }

    /// Discards all batches and rules. Configuration is kept.
    pub fn reset(&mut self) {
        self.clients.clear();
        self.workers.clear();
        self.tasks.clear();
        self.rules.clear();
        info!("reset workbook");
    }

    /// Validates the current batches.
    pub fn validate(&self) -> ValidationReport {
        validate_all(&self.clients, &self.workers, &self.tasks)
    }

    /// Worker suggestions for every client request.
    ///
    /// Empty until all three batches have rows.
    pub fn assignments(&self) -> Vec<Assignment> {
        if self.clients.is_empty() || self.workers.is_empty() || self.tasks.is_empty() {
            return Vec::new();
        }
        GreedySuggester::new().suggest(&self.clients, &self.tasks, &self.workers)
    }

    /// Adds a co-run rule through the acceptance gate.
    ///
    /// # Errors
    /// See [`RuleSet::try_add_co_run`].
    pub fn add_co_run_rule(&mut self, rule: CoRunRule) -> Result<()> {
        self.rules.try_add_co_run(rule, &self.config.rules)
    }

    /// Parses a sentence and adds the resulting rule.
    ///
    /// # Errors
    /// [`AlchemistError::UnparseableRule`] if the text is not understood,
    /// otherwise see [`RuleSet::try_add_co_run`].
    pub fn add_natural_rule(&mut self, text: &str) -> Result<CoRunRule> {
        let rule = parse_natural_rule(text)
            .ok_or_else(|| AlchemistError::UnparseableRule(text.to_string()))?;
        self.add_co_run_rule(rule.clone())?;
        Ok(rule)
    }

    /// Merges rules returned by the AI suggestion service.
    ///
    /// # Errors
    /// See [`RuleSet::merge_suggestions`].
    pub fn merge_ai_suggestions(&mut self, json: &str) -> Result<MergeOutcome> {
        self.rules.merge_suggestions(json, &self.config.rules)
    }

    /// Duration-based co-run suggestions for the current tasks.
    ///
    /// Suggestions are not added; pass the ones to keep to
    /// [`add_co_run_rule`](Self::add_co_run_rule).
    pub fn suggest_rules(&self) -> Vec<CoRunRule> {
        suggest_co_run_rules(&self.tasks, &self.config.suggestions)
    }

    /// Circular co-run dependencies the configured policy reports.
    pub fn cycles(&self) -> Vec<Cycle> {
        self.rules.cycles(&self.config.rules)
    }

    /// Row, rule and error counts.
    pub fn summary(&self) -> DataSummary {
        DataSummary {
            clients: self.clients.len(),
            workers: self.workers.len(),
            tasks: self.tasks.len(),
            rules: self.rules.len(),
            errors: self.validate().errors.len(),
        }
    }
}
