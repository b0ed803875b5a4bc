//! Domain model for an expense.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::ExpenseCategory;
use uuid::Uuid;

/// A recorded expense. This is also the persisted shape: a JSON object with
/// camelCase keys, `date` as `YYYY-MM-DD` and `createdAt` as epoch millis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Generate an opaque unique expense ID
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}
