//! Expense entry form logic.
//!
//! Validation of the manual entry fields, amount parsing, user-facing error
//! messages and the rules for clearing the form after a successful
//! submission. The UI only renders [`ExpenseFormState`]; every decision about
//! its contents is made here.

use chrono::NaiveDate;
use shared::{
    ExpenseCategory, ExpenseFormConfig, ExpenseFormState, ExpenseFormValidation,
    ExpenseValidationError, InputMode,
};

use crate::domain::commands::expenses::CreateExpenseCommand;
use crate::domain::currency::format_currency;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const TEXT_FAILURE_MESSAGE: &str = "Failed to parse text. Please try again or use manual entry.";
const IMAGE_FAILURE_MESSAGE: &str = "Failed to analyze receipt. Please try again.";
const MANUAL_FAILURE_MESSAGE: &str = "Failed to save expense. Please try again.";

/// Handles all expense-entry business rules
#[derive(Clone)]
pub struct ExpenseFormService {
    config: ExpenseFormConfig,
}

impl ExpenseFormService {
    pub fn new() -> Self {
        Self {
            config: ExpenseFormConfig::default(),
        }
    }

    pub fn with_config(config: ExpenseFormConfig) -> Self {
        Self { config }
    }

    /// Fresh form for `today`
    pub fn create_form_state(today: NaiveDate) -> ExpenseFormState {
        ExpenseFormState::for_date(today.format(DATE_FORMAT).to_string())
    }

    /// Validate the manual entry fields
    pub fn validate_manual_entry(
        &self,
        description: &str,
        amount_input: &str,
        date_input: &str,
    ) -> ExpenseFormValidation {
        let mut errors = Vec::new();
        let mut suggestions = Vec::new();

        let description_trimmed = description.trim();
        let description_length = description_trimmed.chars().count();
        if description_trimmed.is_empty() {
            errors.push(ExpenseValidationError::EmptyDescription);
            suggestions.push("Try: Lunch, Taxi to office, Electricity bill".to_string());
        } else if description_length > self.config.max_description_length {
            errors.push(ExpenseValidationError::DescriptionTooLong(description_length));
        }

        let cleaned_amount = if amount_input.trim().is_empty() {
            errors.push(ExpenseValidationError::EmptyAmount);
            suggestions.push("Enter a positive amount like 250 or 99.50".to_string());
            None
        } else {
            match self.clean_and_parse_amount(amount_input) {
                Ok(amount) if amount <= 0.0 => {
                    errors.push(ExpenseValidationError::AmountNotPositive);
                    suggestions.push("Amount must be greater than 0".to_string());
                    None
                }
                Ok(amount) if amount > self.config.max_amount => {
                    errors.push(ExpenseValidationError::AmountTooLarge(self.config.max_amount));
                    suggestions.push(format!(
                        "Maximum amount is {}",
                        self.format_amount(self.config.max_amount)
                    ));
                    None
                }
                Ok(amount) => Some(amount),
                Err(parse_error) => {
                    errors.push(ExpenseValidationError::InvalidAmountFormat(parse_error));
                    suggestions.push("Enter a valid number like 250 or 99.50".to_string());
                    None
                }
            }
        };

        if Self::parse_date(date_input).is_none() {
            errors.push(ExpenseValidationError::InvalidDate(date_input.trim().to_string()));
            suggestions.push("Pick a date in YYYY-MM-DD format".to_string());
        }

        ExpenseFormValidation {
            is_valid: errors.is_empty(),
            errors,
            cleaned_amount,
            suggestions,
        }
    }

    /// Strip the currency symbol, thousands separators and spaces, then parse
    pub fn clean_and_parse_amount(&self, amount_input: &str) -> Result<f64, String> {
        let cleaned = amount_input
            .trim()
            .replace(&self.config.currency_symbol, "")
            .replace(',', "")
            .replace(' ', "");

        if cleaned.is_empty() {
            return Err("Empty amount after cleaning".to_string());
        }

        let amount = cleaned
            .parse::<f64>()
            .map_err(|e| format!("Invalid number format: {}", e))?;
        if !amount.is_finite() {
            return Err(format!("Invalid number format: {}", cleaned));
        }
        Ok(amount)
    }

    pub fn parse_date(date_input: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(date_input.trim(), DATE_FORMAT).ok()
    }

    pub fn format_amount(&self, amount: f64) -> String {
        format_currency(amount, &self.config.currency_symbol)
    }

    /// Validate the manual fields of `form` and turn them into a command
    pub fn build_manual_command(
        &self,
        form: &ExpenseFormState,
    ) -> Result<CreateExpenseCommand, Vec<ExpenseValidationError>> {
        let validation =
            self.validate_manual_entry(&form.description, &form.amount_input, &form.date_input);

        match (validation.cleaned_amount, Self::parse_date(&form.date_input)) {
            (Some(amount), Some(date)) if validation.is_valid => Ok(CreateExpenseCommand {
                description: form.description.trim().to_string(),
                amount,
                category: form.category,
                date,
            }),
            _ => Err(validation.errors),
        }
    }

    /// Clear the form after an expense was recorded through `mode`.
    ///
    /// Manual entry resets every manual field (date back to `today`,
    /// category back to Food). Text entry only clears the text. Image entry
    /// leaves the form alone.
    pub fn reset_after_success(&self, form: &mut ExpenseFormState, mode: InputMode, today: NaiveDate) {
        form.error_message = None;
        match mode {
            InputMode::Manual => {
                form.description.clear();
                form.amount_input.clear();
                form.date_input = today.format(DATE_FORMAT).to_string();
                form.category = ExpenseCategory::Food;
            }
            InputMode::Text => form.text_input.clear(),
            InputMode::Image => {}
        }
    }

    /// Message shown when a submission through `mode` fails
    pub fn failure_message(&self, mode: InputMode) -> &'static str {
        match mode {
            InputMode::Manual => MANUAL_FAILURE_MESSAGE,
            InputMode::Text => TEXT_FAILURE_MESSAGE,
            InputMode::Image => IMAGE_FAILURE_MESSAGE,
        }
    }

    /// User-friendly text for a validation error
    pub fn get_error_message(&self, error: &ExpenseValidationError) -> String {
        match error {
            ExpenseValidationError::EmptyDescription => "Please enter a description".to_string(),
            ExpenseValidationError::DescriptionTooLong(len) => format!(
                "Description is too long ({} characters). Maximum is {}.",
                len, self.config.max_description_length
            ),
            ExpenseValidationError::EmptyAmount => "Please enter an amount".to_string(),
            ExpenseValidationError::InvalidAmountFormat(msg) => {
                format!("Please enter a valid amount (like 250 or 99.50): {}", msg)
            }
            ExpenseValidationError::AmountNotPositive => "Amount must be greater than 0".to_string(),
            ExpenseValidationError::AmountTooLarge(max) => {
                format!("Amount is too large. Maximum is {}", self.format_amount(*max))
            }
            ExpenseValidationError::InvalidDate(input) if input.is_empty() => {
                "Please pick a date".to_string()
            }
            ExpenseValidationError::InvalidDate(input) => {
                format!("'{}' is not a valid date (expected YYYY-MM-DD)", input)
            }
        }
    }

    pub fn get_error_messages(&self, errors: &[ExpenseValidationError]) -> Vec<String> {
        errors.iter().map(|e| self.get_error_message(e)).collect()
    }

    /// First error message, for forms that show a single error line
    pub fn get_first_error_message(&self, errors: &[ExpenseValidationError]) -> Option<String> {
        errors.first().map(|e| self.get_error_message(e))
    }

    pub fn get_config(&self) -> &ExpenseFormConfig {
        &self.config
    }
}

impl Default for ExpenseFormService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> ExpenseFormService {
        ExpenseFormService::new()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()
    }

    #[test]
    fn test_validate_manual_entry_success() {
        let service = create_test_service();

        let validation = service.validate_manual_entry("Lunch", "500", "2024-05-14");

        assert!(validation.is_valid);
        assert!(validation.errors.is_empty());
        assert_eq!(validation.cleaned_amount, Some(500.0));
        assert!(validation.suggestions.is_empty());
    }

    #[test]
    fn test_validate_manual_entry_empty_description() {
        let service = create_test_service();

        let validation = service.validate_manual_entry("   ", "10", "2024-05-14");

        assert!(!validation.is_valid);
        assert!(matches!(validation.errors[0], ExpenseValidationError::EmptyDescription));
        assert!(!validation.suggestions.is_empty());
    }

    #[test]
    fn test_validate_manual_entry_amount_errors() {
        let service = create_test_service();

        let empty = service.validate_manual_entry("Lunch", "", "2024-05-14");
        assert!(matches!(empty.errors[0], ExpenseValidationError::EmptyAmount));

        let zero = service.validate_manual_entry("Lunch", "0", "2024-05-14");
        assert!(matches!(zero.errors[0], ExpenseValidationError::AmountNotPositive));

        let negative = service.validate_manual_entry("Lunch", "-5", "2024-05-14");
        assert!(matches!(negative.errors[0], ExpenseValidationError::AmountNotPositive));

        let garbage = service.validate_manual_entry("Lunch", "abc", "2024-05-14");
        assert!(matches!(garbage.errors[0], ExpenseValidationError::InvalidAmountFormat(_)));

        let huge = service.validate_manual_entry("Lunch", "99999999", "2024-05-14");
        assert!(matches!(huge.errors[0], ExpenseValidationError::AmountTooLarge(_)));
    }

    #[test]
    fn test_validate_manual_entry_bad_date() {
        let service = create_test_service();

        let validation = service.validate_manual_entry("Lunch", "10", "14/05/2024");

        assert!(!validation.is_valid);
        assert_eq!(
            validation.errors,
            vec![ExpenseValidationError::InvalidDate("14/05/2024".to_string())]
        );
        assert_eq!(validation.cleaned_amount, Some(10.0));
    }

    #[test]
    fn test_description_length_counts_characters() {
        let service = ExpenseFormService::with_config(ExpenseFormConfig {
            max_description_length: 4,
            ..ExpenseFormConfig::default()
        });

        assert!(service.validate_manual_entry("चाय!", "10", "2024-05-14").is_valid);
        let validation = service.validate_manual_entry("Dinner", "10", "2024-05-14");
        assert_eq!(validation.errors, vec![ExpenseValidationError::DescriptionTooLong(6)]);
    }

    #[test]
    fn test_clean_and_parse_amount() {
        let service = create_test_service();

        assert_eq!(service.clean_and_parse_amount("10.50").unwrap(), 10.50);
        assert_eq!(service.clean_and_parse_amount("₹10.50").unwrap(), 10.50);
        assert_eq!(service.clean_and_parse_amount(" ₹1,23,456.50 ").unwrap(), 123_456.5);
        assert_eq!(service.clean_and_parse_amount("5").unwrap(), 5.0);

        assert!(service.clean_and_parse_amount("abc").is_err());
        assert!(service.clean_and_parse_amount("₹").is_err());
        assert!(service.clean_and_parse_amount("inf").is_err());
        assert!(service.clean_and_parse_amount("NaN").is_err());
    }

    #[test]
    fn test_build_manual_command() {
        let service = create_test_service();
        let mut form = ExpenseFormService::create_form_state(today());
        form.description = "  Taxi  ".to_string();
        form.amount_input = "250".to_string();
        form.category = ExpenseCategory::Transport;

        let command = service.build_manual_command(&form).unwrap();
        assert_eq!(command.description, "Taxi");
        assert_eq!(command.amount, 250.0);
        assert_eq!(command.category, ExpenseCategory::Transport);
        assert_eq!(command.date, today());

        form.amount_input.clear();
        let errors = service.build_manual_command(&form).unwrap_err();
        assert_eq!(errors, vec![ExpenseValidationError::EmptyAmount]);
    }

    #[test]
    fn test_reset_after_manual_success() {
        let service = create_test_service();
        let mut form = ExpenseFormService::create_form_state(today());
        form.description = "Movie".to_string();
        form.amount_input = "300".to_string();
        form.date_input = "2024-05-01".to_string();
        form.category = ExpenseCategory::Entertainment;
        form.text_input = "kept".to_string();
        form.error_message = Some("old".to_string());

        service.reset_after_success(&mut form, InputMode::Manual, today());

        assert_eq!(form.description, "");
        assert_eq!(form.amount_input, "");
        assert_eq!(form.date_input, "2024-05-14");
        assert_eq!(form.category, ExpenseCategory::Food);
        assert_eq!(form.text_input, "kept");
        assert!(form.error_message.is_none());
    }

    #[test]
    fn test_reset_after_text_and_image_success() {
        let service = create_test_service();
        let mut form = ExpenseFormService::create_form_state(today());
        form.description = "Draft".to_string();
        form.text_input = "Spent 200 on pizza".to_string();

        service.reset_after_success(&mut form, InputMode::Text, today());
        assert_eq!(form.text_input, "");
        assert_eq!(form.description, "Draft");

        form.text_input = "leftover".to_string();
        service.reset_after_success(&mut form, InputMode::Image, today());
        assert_eq!(form.text_input, "leftover");
        assert_eq!(form.description, "Draft");
    }

    #[test]
    fn test_failure_messages() {
        let service = create_test_service();
        assert_eq!(
            service.failure_message(InputMode::Text),
            "Failed to parse text. Please try again or use manual entry."
        );
        assert_eq!(
            service.failure_message(InputMode::Image),
            "Failed to analyze receipt. Please try again."
        );
    }

    #[test]
    fn test_error_messages() {
        let service = create_test_service();

        assert_eq!(
            service.get_error_message(&ExpenseValidationError::EmptyDescription),
            "Please enter a description"
        );
        assert_eq!(
            service.get_error_message(&ExpenseValidationError::AmountTooLarge(10_000_000.0)),
            "Amount is too large. Maximum is ₹1,00,00,000.00"
        );
        assert_eq!(
            service.get_error_message(&ExpenseValidationError::InvalidDate(String::new())),
            "Please pick a date"
        );

        let errors = vec![
            ExpenseValidationError::EmptyAmount,
            ExpenseValidationError::EmptyDescription,
        ];
        assert_eq!(
            service.get_first_error_message(&errors),
            Some("Please enter an amount".to_string())
        );
        assert_eq!(service.get_error_messages(&errors).len(), 2);
        assert_eq!(service.get_first_error_message(&[]), None);
    }
}
