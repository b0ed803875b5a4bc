//! Mappers for converting expense domain models into shared DTOs.

use crate::domain::currency::format_currency;
use crate::domain::expense_form::DATE_FORMAT;
use crate::domain::models::expense::Expense as DomainExpense;
use shared::Expense as SharedExpense;

pub struct ExpenseMapper;

impl ExpenseMapper {
    pub fn to_dto(domain: &DomainExpense, currency_symbol: &str) -> SharedExpense {
        SharedExpense {
            id: domain.id.clone(),
            description: domain.description.clone(),
            amount: domain.amount,
            category: domain.category,
            date: domain.date.format(DATE_FORMAT).to_string(),
            created_at: domain.created_at.timestamp_millis(),
            formatted_amount: format_currency(domain.amount, currency_symbol),
        }
    }

    pub fn to_dto_list(domain: &[DomainExpense], currency_symbol: &str) -> Vec<SharedExpense> {
        domain
            .iter()
            .map(|expense| Self::to_dto(expense, currency_symbol))
            .collect()
    }
}
