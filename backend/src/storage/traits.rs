//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use crate::domain::models::expense::Expense;

/// Local key-value storage holding serialized string payloads.
///
/// Writes replace the whole value stored under a key; there is no partial
/// update and no transaction beyond "last write wins".
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value stored under `key` (no-op if absent)
    fn remove(&self, key: &str) -> Result<()>;
}

/// Trait defining the interface for expense collection persistence
///
/// The whole collection is read and written at once, in the order the
/// domain layer keeps it (most recent first).
pub trait ExpenseStorage: Send + Sync {
    /// Load the persisted collection.
    /// Returns an empty collection when nothing has been stored yet and an
    /// error when the stored payload exists but cannot be parsed.
    fn load_expenses(&self) -> Result<Vec<Expense>>;

    /// Replace the persisted collection with `expenses`
    fn save_expenses(&self, expenses: &[Expense]) -> Result<()>;
}
