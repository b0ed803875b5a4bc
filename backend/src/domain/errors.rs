//! Error types surfaced by the domain layer.
//!
//! None of these are fatal: every failure leaves the stored expenses as they
//! were and is turned into a message for the user.

use shared::ExpenseValidationError;
use thiserror::Error;

/// Failure to turn free text or an image into an expense
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("nothing to extract: input is empty")]
    EmptyInput,

    #[error("request to extraction service failed: {0}")]
    Request(String),

    #[error("extraction service returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("extraction service returned no content")]
    EmptyResponse,

    #[error("could not parse extraction response: {0}")]
    MalformedResponse(String),

    #[error("extraction result is missing a usable {0}")]
    Incomplete(&'static str),
}

/// Invalid transition of the submission task
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("an extraction request is already in progress")]
    AlreadyPending,

    #[error("no extraction request is in progress")]
    NotPending,
}

/// Errors returned by the expense tracker controller
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid expense entry: {0:?}")]
    Validation(Vec<ExpenseValidationError>),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("could not record expenses: {0:#}")]
    Storage(anyhow::Error),
}
