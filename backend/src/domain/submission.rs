//! Lifecycle of a single in-flight extraction request.
//!
//! At most one request may be pending; a second `start` while pending is
//! rejected so the submit control stays disabled until the first settles.
//! [`SubmissionTask::begin`] hands out a guard that puts the task back to
//! Idle if it is dropped before being settled, e.g. when the future running
//! the request is cancelled.

use log::{debug, warn};
use shared::SubmissionStatus;

use crate::domain::errors::SubmissionError;

#[derive(Debug, Clone, Default)]
pub struct SubmissionTask {
    status: SubmissionStatus,
}

impl SubmissionTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    /// Idle or Failed -> Pending
    pub fn start(&mut self) -> Result<(), SubmissionError> {
        if self.status.is_busy() {
            return Err(SubmissionError::AlreadyPending);
        }
        debug!("Submission started");
        self.status = SubmissionStatus::Pending;
        Ok(())
    }

    /// Pending -> Idle
    pub fn succeed(&mut self) -> Result<(), SubmissionError> {
        if !self.status.is_busy() {
            return Err(SubmissionError::NotPending);
        }
        debug!("Submission succeeded");
        self.status = SubmissionStatus::Idle;
        Ok(())
    }

    /// Pending -> Failed
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), SubmissionError> {
        if !self.status.is_busy() {
            return Err(SubmissionError::NotPending);
        }
        let message = message.into();
        debug!("Submission failed: {}", message);
        self.status = SubmissionStatus::Failed(message);
        Ok(())
    }

    /// Start a submission and return a guard that settles it
    pub fn begin(&mut self) -> Result<PendingSubmission<'_>, SubmissionError> {
        self.start()?;
        Ok(PendingSubmission {
            task: self,
            settled: false,
        })
    }

    /// Forget a previous failure. A pending request is left untouched.
    pub fn dismiss(&mut self) {
        if let SubmissionStatus::Failed(_) = self.status {
            self.status = SubmissionStatus::Idle;
        }
    }
}

/// A started submission. Settle it with [`succeed`](Self::succeed) or
/// [`fail`](Self::fail); dropping it unsettled returns the task to Idle.
#[must_use = "dropping the guard abandons the submission"]
pub struct PendingSubmission<'a> {
    task: &'a mut SubmissionTask,
    settled: bool,
}

impl PendingSubmission<'_> {
    pub fn succeed(mut self) -> Result<(), SubmissionError> {
        self.settled = true;
        self.task.succeed()
    }

    pub fn fail(mut self, message: impl Into<String>) -> Result<(), SubmissionError> {
        self.settled = true;
        self.task.fail(message)
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if !self.settled && self.task.status.is_busy() {
            warn!("Submission abandoned before it settled");
            self.task.status = SubmissionStatus::Idle;
        }
    }
}
