//! Domain-level command types.
//! These structs are used by services inside the domain layer and are **not**
//! handed to the presentation layer. The controller maps form state from the
//! `shared` crate onto them.

pub mod expenses {
    use chrono::NaiveDate;
    use shared::ExpenseCategory;

    /// Caller-supplied fields of a new expense. The store assigns `id` and
    /// `created_at` when it is appended.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CreateExpenseCommand {
        pub description: String,
        pub amount: f64,
        pub category: ExpenseCategory,
        pub date: NaiveDate,
    }
}

pub mod extraction {
    /// Unstructured input handed to the extraction service.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ExtractionRequest {
        Text(String),
        Image { data: Vec<u8>, mime_type: String },
    }
}
