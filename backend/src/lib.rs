//! # Smart Spend Backend
//!
//! Personal expense tracking with AI-assisted entry. Expenses are recorded
//! manually, from a free-text description or from a receipt photo, kept in
//! a key-value store and summarized for a dashboard.
//!
//! [`ExpenseTracker`] is the entry point a UI drives. It owns the services
//! of the [`domain`] layer, the current form state and the status of the
//! in-flight extraction request.
//!
//! ```no_run
//! use smart_spend_backend::{config::TrackerConfig, logging, ExpenseTracker};
//!
//! # async fn run() -> anyhow::Result<()> {
//! logging::init_logging();
//! let config = TrackerConfig::load(None)?;
//! let mut tracker = ExpenseTracker::from_config(&config)?;
//!
//! tracker.form_mut().text_input = "Spent 450 on dinner at Olive".to_string();
//! tracker.submit_text().await?;
//! println!("{}", tracker.dashboard().formatted_total);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::{error, info, warn};
use std::sync::Arc;

use shared::{
    DashboardSummary, Expense as ExpenseDto, ExpenseFormConfig, ExpenseFormState, InputMode,
    SubmissionStatus,
};

use crate::config::TrackerConfig;
use crate::domain::commands::expenses::CreateExpenseCommand;
use crate::domain::commands::extraction::ExtractionRequest;
use crate::domain::errors::{ExtractionError, TrackerError};
use crate::domain::{
    AnalyticsService, ExpenseFormService, ExpenseService, ExtractionService, SubmissionTask,
};
use crate::io::mappers::ExpenseMapper;
use crate::io::{ExpenseExtractor, GeminiClient};
use crate::storage::{ExpenseRepository, FileKeyValueStorage, KeyValueStorage};

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Application state behind the expense tracker UI
pub struct ExpenseTracker {
    expense_service: ExpenseService<ExpenseRepository>,
    analytics_service: AnalyticsService,
    extraction_service: ExtractionService,
    form_service: ExpenseFormService,
    submission: SubmissionTask,
    form: ExpenseFormState,
    today: fn() -> NaiveDate,
}

impl ExpenseTracker {
    /// Open the tracker on `storage` under the default key
    pub fn open(storage: Arc<dyn KeyValueStorage>, extractor: Arc<dyn ExpenseExtractor>) -> Self {
        Self::with_parts(
            ExpenseRepository::new(storage),
            extractor,
            ExpenseFormConfig::default(),
        )
    }

    /// File-backed storage in the configured data directory and the Gemini extractor
    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        let storage = Arc::new(FileKeyValueStorage::new(&config.data_directory)?);
        let extractor = Arc::new(GeminiClient::new(config.gemini.clone())?);
        let repository = ExpenseRepository::with_key(storage, config.storage_key.clone());

        Ok(Self::with_parts(repository, extractor, config.entry.clone()))
    }

    pub fn with_parts(
        repository: ExpenseRepository,
        extractor: Arc<dyn ExpenseExtractor>,
        entry_config: ExpenseFormConfig,
    ) -> Self {
        let today = local_today;
        let analytics_service =
            AnalyticsService::with_currency_symbol(entry_config.currency_symbol.clone());

        Self {
            expense_service: ExpenseService::load(repository),
            analytics_service,
            extraction_service: ExtractionService::new(extractor),
            form_service: ExpenseFormService::with_config(entry_config),
            submission: SubmissionTask::new(),
            form: ExpenseFormService::create_form_state(today()),
            today,
        }
    }

    /// Replace the source of "today". The form date is reset to the new today.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self.form.date_input = today().format(domain::expense_form::DATE_FORMAT).to_string();
        self
    }

    /// Current expenses, most recent first
    pub fn expenses(&self) -> Vec<ExpenseDto> {
        ExpenseMapper::to_dto_list(self.expense_service.expenses(), self.currency_symbol())
    }

    pub fn dashboard(&self) -> DashboardSummary {
        self.analytics_service
            .dashboard(self.expense_service.expenses(), (self.today)())
    }

    pub fn status(&self) -> &SubmissionStatus {
        self.submission.status()
    }

    pub fn form(&self) -> &ExpenseFormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ExpenseFormState {
        &mut self.form
    }

    /// Switch the entry tab. A stale failure message from another mode is
    /// cleared; the entered fields are kept.
    pub fn select_mode(&mut self, mode: InputMode) {
        if self.form.mode != mode {
            self.form.mode = mode;
            self.dismiss_error();
        }
    }

    /// Clear a previous failure message
    pub fn dismiss_error(&mut self) {
        self.submission.dismiss();
        self.form.error_message = None;
    }

    /// Record the manual entry fields of the form
    pub fn submit_manual(&mut self) -> Result<ExpenseDto, TrackerError> {
        let command = match self.form_service.build_manual_command(&self.form) {
            Ok(command) => command,
            Err(errors) => {
                warn!("Manual entry rejected: {:?}", errors);
                self.form.error_message = self.form_service.get_first_error_message(&errors);
                return Err(TrackerError::Validation(errors));
            }
        };

        let expense = match Self::record(&mut self.expense_service, &self.form_service, command) {
            Ok(expense) => expense,
            Err(e) => {
                self.form.error_message =
                    Some(self.form_service.failure_message(InputMode::Manual).to_string());
                return Err(e);
            }
        };

        let today = (self.today)();
        self.form_service
            .reset_after_success(&mut self.form, InputMode::Manual, today);
        Ok(expense)
    }

    /// Extract an expense from the form's free text and record it
    pub async fn submit_text(&mut self) -> Result<ExpenseDto, TrackerError> {
        let text = self.form.text_input.trim().to_string();
        if text.is_empty() {
            return Err(ExtractionError::EmptyInput.into());
        }
        self.run_extraction(InputMode::Text, ExtractionRequest::Text(text))
            .await
    }

    /// Extract an expense from a receipt image and record it
    pub async fn submit_image(
        &mut self,
        data: Vec<u8>,
        mime_type: &str,
    ) -> Result<ExpenseDto, TrackerError> {
        if data.is_empty() {
            return Err(ExtractionError::EmptyInput.into());
        }
        let request = ExtractionRequest::Image {
            data,
            mime_type: mime_type.to_string(),
        };
        self.run_extraction(InputMode::Image, request).await
    }

    /// Delete an expense. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> Result<bool, TrackerError> {
        self.expense_service.remove(id).map_err(TrackerError::Storage)
    }

    async fn run_extraction(
        &mut self,
        mode: InputMode,
        request: ExtractionRequest,
    ) -> Result<ExpenseDto, TrackerError> {
        // Resets to Idle if this future is dropped before the request settles
        let pending = self.submission.begin()?;
        self.form.error_message = None;
        let today = (self.today)();

        let outcome = match self.extraction_service.extract(request, today).await {
            Ok(command) => Self::record(&mut self.expense_service, &self.form_service, command),
            Err(e) => {
                error!("{:?} extraction failed: {}", mode, e);
                Err(e.into())
            }
        };

        match outcome {
            Ok(expense) => {
                pending.succeed()?;
                self.form_service
                    .reset_after_success(&mut self.form, mode, today);
                Ok(expense)
            }
            Err(e) => {
                let message = self.form_service.failure_message(mode);
                pending.fail(message)?;
                self.form.error_message = Some(message.to_string());
                Err(e)
            }
        }
    }

    fn record(
        expense_service: &mut ExpenseService<ExpenseRepository>,
        form_service: &ExpenseFormService,
        command: CreateExpenseCommand,
    ) -> Result<ExpenseDto, TrackerError> {
        let expense = expense_service.append(command).map_err(|e| {
            error!("Could not record expense: {:#}", e);
            TrackerError::Storage(e)
        })?;
        info!("{} expenses on record", expense_service.expenses().len());
        Ok(ExpenseMapper::to_dto(
            &expense,
            &form_service.get_config().currency_symbol,
        ))
    }

    fn currency_symbol(&self) -> &str {
        &self.form_service.get_config().currency_symbol
    }
}
