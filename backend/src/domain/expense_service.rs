//! Expense record store.
//!
//! Owns the in-memory expense collection (most recent first) and keeps the
//! persisted copy in sync: every append or removal re-serializes the whole
//! collection. When a write fails the in-memory collection is left as it was.

use anyhow::{ensure, Result};
use chrono::{SubsecRound, Utc};
use log::{info, warn};
use std::collections::HashSet;

use crate::domain::commands::expenses::CreateExpenseCommand;
use crate::domain::models::expense::Expense;
use crate::storage::ExpenseStorage;

pub struct ExpenseService<S: ExpenseStorage> {
    repository: S,
    expenses: Vec<Expense>,
}

impl<S: ExpenseStorage> ExpenseService<S> {
    /// Load the persisted collection. Missing or unreadable data starts an
    /// empty collection; it is never fatal.
    pub fn load(repository: S) -> Self {
        let expenses = match repository.load_expenses() {
            Ok(expenses) => {
                let expenses = Self::retain_valid(expenses);
                info!("Loaded {} stored expenses", expenses.len());
                expenses
            }
            Err(e) => {
                warn!("Stored expenses could not be read, starting empty: {:#}", e);
                Vec::new()
            }
        };

        Self { repository, expenses }
    }

    /// Current collection, most recent first
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn get(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    /// Record a new expense at the head of the collection and persist it
    pub fn append(&mut self, command: CreateExpenseCommand) -> Result<Expense> {
        ensure!(
            command.amount.is_finite() && command.amount > 0.0,
            "expense amount must be positive, got {}",
            command.amount
        );
        ensure!(
            !command.description.trim().is_empty(),
            "expense description must not be empty"
        );

        let expense = Expense {
            id: self.fresh_id(),
            description: command.description,
            amount: command.amount,
            category: command.category,
            date: command.date,
            // Stored with millisecond precision
            created_at: Utc::now().trunc_subsecs(3),
        };

        let mut updated = Vec::with_capacity(self.expenses.len() + 1);
        updated.push(expense.clone());
        updated.extend(self.expenses.iter().cloned());

        self.repository.save_expenses(&updated)?;
        self.expenses = updated;

        info!(
            "Recorded expense {}: {} {:.2} on {} ({})",
            expense.id, expense.category, expense.amount, expense.date, expense.description
        );
        Ok(expense)
    }

    /// Delete the expense with `id`. Returns whether anything was removed;
    /// an unknown id is not an error. The collection is persisted either way.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let remaining: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|expense| expense.id != id)
            .cloned()
            .collect();
        let removed = remaining.len() != self.expenses.len();

        self.repository.save_expenses(&remaining)?;
        self.expenses = remaining;

        if removed {
            info!("Removed expense {}", id);
        } else {
            info!("No expense with id {}, nothing removed", id);
        }
        Ok(removed)
    }

    /// Drop stored records with a repeated id, a non-positive amount or a
    /// blank description. The first record with a given id wins.
    fn retain_valid(expenses: Vec<Expense>) -> Vec<Expense> {
        let mut seen = HashSet::new();
        expenses
            .into_iter()
            .filter(|expense| {
                if !(expense.amount.is_finite() && expense.amount > 0.0) {
                    warn!("Dropping stored expense {} with amount {}", expense.id, expense.amount);
                    false
                } else if expense.description.trim().is_empty() {
                    warn!("Dropping stored expense {} without a description", expense.id);
                    false
                } else if !seen.insert(expense.id.clone()) {
                    warn!("Dropping stored expense with duplicate id {}", expense.id);
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Expense::generate_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
