//! # Expense Repository
//!
//! Persists the whole expense collection as one JSON array under a single
//! well-known key of a [`KeyValueStorage`]:
//!
//! ```json
//! [
//!   {"id":"4f0c…","description":"Lunch","amount":500,"category":"Food",
//!    "date":"2024-05-14","createdAt":1715680000123}
//! ]
//! ```

use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::Value;
use std::sync::Arc;

use super::traits::{ExpenseStorage, KeyValueStorage};
use crate::domain::models::expense::Expense;

/// Key the collection is stored under unless configured otherwise
pub const EXPENSES_STORAGE_KEY: &str = "gemini-expenses";

#[derive(Clone)]
pub struct ExpenseRepository {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl ExpenseRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_key(storage, EXPENSES_STORAGE_KEY)
    }

    pub fn with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key an unreadable payload is preserved under
    pub fn backup_key(&self) -> String {
        format!("{}.corrupt", self.key)
    }

    fn back_up(&self, payload: &str) {
        let backup_key = self.backup_key();
        match self.storage.set(&backup_key, payload) {
            Ok(()) => warn!("Unreadable expenses under '{}' copied to '{}'", self.key, backup_key),
            Err(e) => warn!("Could not back up unreadable expenses: {:#}", e),
        }
    }
}

impl ExpenseStorage for ExpenseRepository {
    /// Records that cannot be parsed are skipped with a warning. Whenever
    /// anything is skipped, or the payload is not a JSON array at all, the
    /// raw payload is first copied to the backup key.
    fn load_expenses(&self) -> Result<Vec<Expense>> {
        let Some(payload) = self.storage.get(&self.key)? else {
            debug!("No stored expenses under key '{}'", self.key);
            return Ok(Vec::new());
        };

        let records: Vec<Value> = match serde_json::from_str(&payload) {
            Ok(records) => records,
            Err(e) => {
                self.back_up(&payload);
                return Err(e).with_context(|| format!("parsing expenses stored under '{}'", self.key));
            }
        };

        let total = records.len();
        let expenses: Vec<Expense> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(expense) => Some(expense),
                Err(e) => {
                    warn!("Skipping stored expense #{} under '{}': {}", index, self.key, e);
                    None
                }
            })
            .collect();
        if expenses.len() != total {
            self.back_up(&payload);
        }
        debug!("Loaded {} of {} expenses from key '{}'", expenses.len(), total, self.key);
        Ok(expenses)
    }

    fn save_expenses(&self, expenses: &[Expense]) -> Result<()> {
        let payload = serde_json::to_string(expenses)?;
        self.storage.set(&self.key, &payload)?;
        debug!("Saved {} expenses under key '{}'", expenses.len(), self.key);
        Ok(())
    }
}
