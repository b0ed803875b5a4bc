//! # Domain Module
//!
//! Contains all business logic for the expense tracker.
//!
//! It operates independently of any UI framework, storage backend or AI
//! provider: persistence is reached through the traits in `storage` and
//! extraction through [`crate::io::extractor::ExpenseExtractor`].
//!
//! ## Module Organization
//!
//! - **expense_service**: The expense record store (load, append, remove, persist)
//! - **analytics_service**: Dashboard figures derived from the current expenses
//! - **extraction_service**: Guarding and normalizing AI extraction results
//! - **expense_form**: Manual entry validation and form reset rules
//! - **submission**: State of the in-flight extraction request
//! - **currency**: Display formatting for amounts
//!
//! ## Business Rules
//!
//! - Expenses have a non-empty description and a positive amount
//! - The collection is ordered most recent first
//! - Categories come from a fixed set; anything else is recorded as Other
//! - Every change to the collection is persisted in full

pub mod analytics_service;
pub mod commands;
pub mod currency;
pub mod errors;
pub mod expense_form;
pub mod expense_service;
pub mod extraction_service;
pub mod models;
pub mod submission;

pub use analytics_service::AnalyticsService;
pub use errors::{ExtractionError, SubmissionError, TrackerError};
pub use expense_form::ExpenseFormService;
pub use expense_service::ExpenseService;
pub use extraction_service::ExtractionService;
pub use submission::SubmissionTask;
