//! # Storage Module
//!
//! Persistence for the expense collection. The domain layer only sees the
//! [`ExpenseStorage`] and [`KeyValueStorage`] traits; the concrete backends
//! are a directory of JSON files and an in-memory map.

pub mod expense_repository;
pub mod file_storage;
pub mod memory_storage;
pub mod traits;

pub use expense_repository::{ExpenseRepository, EXPENSES_STORAGE_KEY};
pub use file_storage::FileKeyValueStorage;
pub use memory_storage::MemoryKeyValueStorage;
pub use traits::{ExpenseStorage, KeyValueStorage};
