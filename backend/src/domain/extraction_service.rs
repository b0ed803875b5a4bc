//! Turns free text or a receipt image into a [`CreateExpenseCommand`].
//!
//! The backend does the interpretation; this service guards the input and
//! normalizes whatever comes back: unknown categories become `Other` and a
//! missing or unreadable date becomes today.

use chrono::NaiveDate;
use log::{debug, info, warn};
use shared::ExpenseCategory;
use std::sync::Arc;

use crate::domain::commands::expenses::CreateExpenseCommand;
use crate::domain::commands::extraction::ExtractionRequest;
use crate::domain::errors::ExtractionError;
use crate::domain::expense_form::DATE_FORMAT;
use crate::io::extractor::{ExpenseExtractor, RawExtraction};

#[derive(Clone)]
pub struct ExtractionService {
    extractor: Arc<dyn ExpenseExtractor>,
}

impl ExtractionService {
    pub fn new(extractor: Arc<dyn ExpenseExtractor>) -> Self {
        Self { extractor }
    }

    pub async fn extract(
        &self,
        request: ExtractionRequest,
        today: NaiveDate,
    ) -> Result<CreateExpenseCommand, ExtractionError> {
        match request {
            ExtractionRequest::Text(text) => self.extract_from_text(&text, today).await,
            ExtractionRequest::Image { data, mime_type } => {
                self.extract_from_image(&data, &mime_type, today).await
            }
        }
    }

    pub async fn extract_from_text(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<CreateExpenseCommand, ExtractionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        info!("Extracting expense from {} characters of text", text.chars().count());
        let raw = self.extractor.extract_from_text(text, today).await?;
        Self::normalize(raw, today)
    }

    pub async fn extract_from_image(
        &self,
        data: &[u8],
        mime_type: &str,
        today: NaiveDate,
    ) -> Result<CreateExpenseCommand, ExtractionError> {
        if data.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        info!("Extracting expense from {} byte {} image", data.len(), mime_type);
        let raw = self.extractor.extract_from_image(data, mime_type, today).await?;
        Self::normalize(raw, today)
    }

    /// Validate and fill in the fields returned by the backend
    pub fn normalize(
        raw: RawExtraction,
        today: NaiveDate,
    ) -> Result<CreateExpenseCommand, ExtractionError> {
        debug!("Raw extraction: {:?}", raw);

        let amount = raw
            .amount
            .filter(|amount| amount.is_finite() && *amount > 0.0)
            .ok_or(ExtractionError::Incomplete("amount"))?;

        let description = raw
            .description
            .map(|description| description.trim().to_string())
            .filter(|description| !description.is_empty())
            .ok_or(ExtractionError::Incomplete("description"))?;

        let category = match raw.category.as_deref() {
            Some(name) => ExpenseCategory::from_name(name).unwrap_or_else(|| {
                warn!("Unknown category '{}', using Other", name);
                ExpenseCategory::Other
            }),
            None => ExpenseCategory::Other,
        };

        let date = match raw.date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT).unwrap_or_else(|_| {
                warn!("Extracted date '{}' is not YYYY-MM-DD, using {}", text, today);
                today
            }),
        };

        Ok(CreateExpenseCommand {
            description,
            amount,
            category,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeExtractor {
        response: Result<RawExtraction, ExtractionError>,
        calls: AtomicUsize,
    }

    impl FakeExtractor {
        fn returning(response: Result<RawExtraction, ExtractionError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ExpenseExtractor for FakeExtractor {
        async fn extract_from_text(
            &self,
            _text: &str,
            _today: NaiveDate,
        ) -> Result<RawExtraction, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }

        async fn extract_from_image(
            &self,
            _data: &[u8],
            _mime_type: &str,
            _today: NaiveDate,
        ) -> Result<RawExtraction, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
    }

    fn raw(amount: f64, category: &str, date: Option<&str>, description: &str) -> RawExtraction {
        RawExtraction {
            amount: Some(amount),
            category: Some(category.to_string()),
            date: date.map(str::to_string),
            description: Some(description.to_string()),
        }
    }

    #[tokio::test]
    async fn test_text_without_date_uses_today() {
        let extractor = FakeExtractor::returning(Ok(raw(450.0, "Food", None, "Dinner")));
        let service = ExtractionService::new(extractor.clone());

        let command = service
            .extract_from_text("Spent 450 on dinner", today())
            .await
            .unwrap();

        assert_eq!(command.amount, 450.0);
        assert_eq!(command.category, ExpenseCategory::Food);
        assert_eq!(command.date, today());
        assert_eq!(command.description, "Dinner");
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_image_keeps_extracted_date() {
        let extractor = FakeExtractor::returning(Ok(raw(
            1_299.0,
            "Shopping",
            Some("2024-05-01"),
            "City Mall",
        )));
        let service = ExtractionService::new(extractor);

        let command = service
            .extract(
                ExtractionRequest::Image {
                    data: vec![0xff, 0xd8, 0xff],
                    mime_type: "image/jpeg".to_string(),
                },
                today(),
            )
            .await
            .unwrap();

        assert_eq!(command.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(command.category, ExpenseCategory::Shopping);
    }

    #[tokio::test]
    async fn test_empty_input_skips_backend() {
        let extractor = FakeExtractor::returning(Ok(RawExtraction::default()));
        let service = ExtractionService::new(extractor.clone());

        let text = service.extract_from_text("  \n ", today()).await;
        assert_eq!(text, Err(ExtractionError::EmptyInput));

        let image = service.extract_from_image(&[], "image/png", today()).await;
        assert_eq!(image, Err(ExtractionError::EmptyInput));

        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_error_is_propagated() {
        let extractor = FakeExtractor::returning(Err(ExtractionError::UpstreamStatus {
            status: 503,
            body: "overloaded".to_string(),
        }));
        let service = ExtractionService::new(extractor);

        let result = service.extract_from_text("Taxi 300", today()).await;
        assert!(matches!(
            result,
            Err(ExtractionError::UpstreamStatus { status: 503, .. })
        ));
    }

    #[test]
    fn test_unknown_category_becomes_other() {
        let command =
            ExtractionService::normalize(raw(80.0, "Groceries", None, "Veg market"), today())
                .unwrap();
        assert_eq!(command.category, ExpenseCategory::Other);

        let missing = RawExtraction {
            category: None,
            ..raw(80.0, "", None, "Veg market")
        };
        assert_eq!(
            ExtractionService::normalize(missing, today()).unwrap().category,
            ExpenseCategory::Other
        );
    }

    #[test]
    fn test_category_match_ignores_case() {
        let command =
            ExtractionService::normalize(raw(80.0, "utilities", None, "Power bill"), today())
                .unwrap();
        assert_eq!(command.category, ExpenseCategory::Utilities);
    }

    #[test]
    fn test_unreadable_date_uses_today() {
        let command =
            ExtractionService::normalize(raw(80.0, "Food", Some("yesterday"), "Snacks"), today())
                .unwrap();
        assert_eq!(command.date, today());
    }

    #[test]
    fn test_incomplete_results_are_rejected() {
        let no_amount = RawExtraction {
            amount: None,
            ..raw(0.0, "Food", None, "Snacks")
        };
        assert_eq!(
            ExtractionService::normalize(no_amount, today()),
            Err(ExtractionError::Incomplete("amount"))
        );

        assert_eq!(
            ExtractionService::normalize(raw(-20.0, "Food", None, "Refund"), today()),
            Err(ExtractionError::Incomplete("amount"))
        );

        assert_eq!(
            ExtractionService::normalize(raw(20.0, "Food", None, "  "), today()),
            Err(ExtractionError::Incomplete("description"))
        );
    }
}
