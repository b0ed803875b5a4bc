//! # IO Module
//!
//! Everything that crosses the process boundary apart from storage: the
//! extraction backend (the Gemini REST API) and the mapping of domain models
//! onto the DTOs handed to the UI.

pub mod extractor;
pub mod gemini;
pub mod mappers;

pub use extractor::{ExpenseExtractor, RawExtraction};
pub use gemini::GeminiClient;
