//! Dashboard aggregations.
//!
//! All figures are recomputed from scratch from the expense slice passed in.
//! Nothing here is cached or persisted.

use chrono::{Duration, NaiveDate};
use std::cmp::Ordering;

use shared::{CategorySummary, DailySummary, DashboardSummary, ExpenseCategory, ExpenseFormConfig};

use crate::domain::currency::format_currency;
use crate::domain::models::expense::Expense;

/// Number of calendar days covered by the trend, ending with today
pub const TREND_DAYS: usize = 7;

#[derive(Debug, Clone)]
pub struct AnalyticsService {
    currency_symbol: String,
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::with_currency_symbol(ExpenseFormConfig::default().currency_symbol)
    }
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currency_symbol(symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: symbol.into(),
        }
    }

    pub fn total_spent(&self, expenses: &[Expense]) -> f64 {
        expenses.iter().map(|expense| expense.amount).sum()
    }

    /// Totals for every category that has at least one expense, largest
    /// first. Equal totals keep the order the categories first appear in.
    pub fn category_breakdown(&self, expenses: &[Expense]) -> Vec<CategorySummary> {
        let mut totals: Vec<(ExpenseCategory, f64)> = Vec::new();
        for expense in expenses {
            match totals.iter_mut().find(|(category, _)| *category == expense.category) {
                Some((_, total)) => *total += expense.amount,
                None => totals.push((expense.category, expense.amount)),
            }
        }

        let mut breakdown: Vec<CategorySummary> = totals
            .into_iter()
            .map(|(category, value)| CategorySummary {
                name: category,
                value,
                color: category.color().to_string(),
            })
            .collect();
        breakdown.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        breakdown
    }

    /// Per-day totals for the seven days ending with `today`, oldest first.
    /// Days without expenses are reported with a zero total.
    pub fn weekly_trend(&self, expenses: &[Expense], today: NaiveDate) -> Vec<DailySummary> {
        let start = today - Duration::days(TREND_DAYS as i64 - 1);
        let mut totals = [0.0_f64; TREND_DAYS];

        for expense in expenses {
            let offset = (expense.date - start).num_days();
            if (0..TREND_DAYS as i64).contains(&offset) {
                totals[offset as usize] += expense.amount;
            }
        }

        totals
            .iter()
            .enumerate()
            .map(|(i, total)| {
                let date = start + Duration::days(i as i64);
                DailySummary {
                    date: date.format("%Y-%m-%d").to_string(),
                    label: date.format("%a").to_string(),
                    total: *total,
                }
            })
            .collect()
    }

    /// Mean amount per expense, 0 when there are none
    pub fn average_transaction(&self, expenses: &[Expense]) -> f64 {
        if expenses.is_empty() {
            return 0.0;
        }
        self.total_spent(expenses) / expenses.len() as f64
    }

    pub fn dashboard(&self, expenses: &[Expense], today: NaiveDate) -> DashboardSummary {
        let total_spent = self.total_spent(expenses);
        let average_transaction = self.average_transaction(expenses);

        DashboardSummary {
            total_spent,
            transaction_count: expenses.len(),
            average_transaction,
            formatted_total: format_currency(total_spent, &self.currency_symbol),
            formatted_average: format_currency(average_transaction, &self.currency_symbol),
            category_breakdown: self.category_breakdown(expenses),
            weekly_trend: self.weekly_trend(expenses, today),
        }
    }
}
