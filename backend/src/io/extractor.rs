//! Seam between the domain and the AI extraction backend.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::domain::errors::ExtractionError;

/// Structured fields as returned by the extraction backend, before
/// normalization. Every field may be missing or unusable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawExtraction {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Accepts `42.5`, `"42.5"`, `"₹1,200"` or `"Rs. 450/-"`; anything
/// unparseable becomes `None`
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(amount)) => Some(amount),
        Some(NumberOrText::Text(text)) => first_number(&text),
        None => None,
    })
}

/// First number in `text`: a digit run with optional `,` grouping and one
/// fractional part. A `-` directly in front of it is kept.
fn first_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let negative = text[..start].ends_with('-');

    let mut number = String::new();
    let mut seen_point = false;
    let mut chars = text[start..].chars().peekable();
    while let Some(c) = chars.next() {
        let next_is_digit = chars.peek().map_or(false, |n| n.is_ascii_digit());
        match c {
            '0'..='9' => number.push(c),
            ',' if !seen_point && next_is_digit => {}
            '.' if !seen_point && next_is_digit => {
                seen_point = true;
                number.push('.');
            }
            _ => break,
        }
    }

    let amount: f64 = number.parse().ok()?;
    Some(if negative { -amount } else { amount })
}

/// Turns unstructured input into [`RawExtraction`] fields
#[async_trait]
pub trait ExpenseExtractor: Send + Sync {
    async fn extract_from_text(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<RawExtraction, ExtractionError>;

    async fn extract_from_image(
        &self,
        data: &[u8],
        mime_type: &str,
        today: NaiveDate,
    ) -> Result<RawExtraction, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_extraction() {
        let raw: RawExtraction = serde_json::from_str(
            r#"{"amount": 450, "category": "Food", "date": "2024-05-14", "description": "Dinner"}"#,
        )
        .unwrap();
        assert_eq!(raw.amount, Some(450.0));
        assert_eq!(raw.category.as_deref(), Some("Food"));
        assert_eq!(raw.date.as_deref(), Some("2024-05-14"));
        assert_eq!(raw.description.as_deref(), Some("Dinner"));
    }

    #[test]
    fn test_missing_fields_are_none() {
        let raw: RawExtraction = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert_eq!(raw, RawExtraction::default());
    }

    #[test]
    fn test_amount_given_as_text() {
        let raw: RawExtraction = serde_json::from_str(r#"{"amount": "₹1,200.50"}"#).unwrap();
        assert_eq!(raw.amount, Some(1200.5));

        let raw: RawExtraction = serde_json::from_str(r#"{"amount": "about forty"}"#).unwrap();
        assert_eq!(raw.amount, None);
    }

    #[test]
    fn test_amount_text_with_receipt_notation() {
        let amount = |text: &str| {
            let json = serde_json::json!({ "amount": text }).to_string();
            serde_json::from_str::<RawExtraction>(&json).unwrap().amount
        };

        assert_eq!(amount("Rs. 450"), Some(450.0));
        assert_eq!(amount("450/-"), Some(450.0));
        assert_eq!(amount("INR 1,200.00"), Some(1200.0));
        assert_eq!(amount("₹ 1,23,456.75 only"), Some(123_456.75));
        assert_eq!(amount("12.5.3"), Some(12.5));
        assert_eq!(amount("-30"), Some(-30.0));
    }
}
