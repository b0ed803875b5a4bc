use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed set of spending classifications.
///
/// Deserialization never fails: any name outside the set (or differing only
/// in case from a known name) is resolved through [`ExpenseCategory::from`],
/// so unknown values land in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Shopping,
    Utilities,
    Entertainment,
    Health,
    Housing,
    Other,
}

impl ExpenseCategory {
    /// All categories in display order
    pub const ALL: [ExpenseCategory; 8] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Shopping,
        ExpenseCategory::Utilities,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Health,
        ExpenseCategory::Housing,
        ExpenseCategory::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Health => "Health",
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::Other => "Other",
        }
    }

    /// Chart color for the category (hex RGB)
    pub fn color(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "#10b981",
            ExpenseCategory::Transport => "#3b82f6",
            ExpenseCategory::Shopping => "#f59e0b",
            ExpenseCategory::Utilities => "#6366f1",
            ExpenseCategory::Entertainment => "#ec4899",
            ExpenseCategory::Health => "#ef4444",
            ExpenseCategory::Housing => "#8b5cf6",
            ExpenseCategory::Other => "#64748b",
        }
    }

    /// Look up a category by name, ignoring case and surrounding whitespace.
    /// Returns `None` for names outside the fixed set.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.name().eq_ignore_ascii_case(name))
    }
}

impl From<String> for ExpenseCategory {
    fn from(value: String) -> Self {
        Self::from_name(&value).unwrap_or(ExpenseCategory::Other)
    }
}

impl From<&str> for ExpenseCategory {
    fn from(value: &str) -> Self {
        Self::from_name(value).unwrap_or(ExpenseCategory::Other)
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A recorded expense as presented to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    /// Transaction date (YYYY-MM-DD)
    pub date: String,
    /// Insertion time in epoch milliseconds
    pub created_at: i64,
    /// Amount rendered in the display currency
    pub formatted_amount: String,
}

/// Spending total for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: ExpenseCategory,
    pub value: f64,
    pub color: String,
}

/// Spending total for one calendar day of the weekly trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    /// Short weekday name used as the chart axis label, e.g. "Mon"
    pub label: String,
    pub total: f64,
}

/// Everything the dashboard renders, derived from the current expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_spent: f64,
    pub transaction_count: usize,
    pub average_transaction: f64,
    pub formatted_total: String,
    pub formatted_average: String,
    pub category_breakdown: Vec<CategorySummary>,
    pub weekly_trend: Vec<DailySummary>,
}

/// How the user is entering the next expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputMode {
    #[default]
    Manual,
    /// Free text interpreted by the AI service
    Text,
    /// Receipt image interpreted by the AI service
    Image,
}

/// State of the add-expense panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFormState {
    /// Tab the UI shows. Changed through the controller's `select_mode`;
    /// each submit call names its own mode, so this never routes a submission.
    pub mode: InputMode,
    pub description: String,
    pub amount_input: String,
    /// Date input (YYYY-MM-DD)
    pub date_input: String,
    pub category: ExpenseCategory,
    pub text_input: String,
    pub error_message: Option<String>,
}

impl ExpenseFormState {
    /// Empty form whose date defaults to `today` (YYYY-MM-DD)
    pub fn for_date(today: impl Into<String>) -> Self {
        Self {
            mode: InputMode::Manual,
            description: String::new(),
            amount_input: String::new(),
            date_input: today.into(),
            category: ExpenseCategory::Food,
            text_input: String::new(),
            error_message: None,
        }
    }
}

impl Default for ExpenseFormState {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive();
        Self::for_date(today.format("%Y-%m-%d").to_string())
    }
}

/// Validation result for the manual entry form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFormValidation {
    pub is_valid: bool,
    pub errors: Vec<ExpenseValidationError>,
    pub cleaned_amount: Option<f64>,
    pub suggestions: Vec<String>,
}

/// Specific validation errors for the manual entry form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpenseValidationError {
    EmptyDescription,
    DescriptionTooLong(usize),
    EmptyAmount,
    InvalidAmountFormat(String),
    AmountNotPositive,
    AmountTooLarge(f64),
    InvalidDate(String),
}

/// Limits and display settings for expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseFormConfig {
    pub max_description_length: usize,
    pub max_amount: f64,
    pub currency_symbol: String,
}

impl Default for ExpenseFormConfig {
    fn default() -> Self {
        Self {
            max_description_length: 256,
            max_amount: 10_000_000.0,
            currency_symbol: "₹".to_string(),
        }
    }
}

/// Progress of an asynchronous extraction request.
///
/// `Idle -> Pending -> Idle` on success, `Idle -> Pending -> Failed` on error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Failed(String),
}

impl SubmissionStatus {
    /// True while a request is in flight and the submit control is disabled
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmissionStatus::Pending)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}
