//! Expense entry and listing.
use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::sync::Arc;
use tracing::info;

use crate::domain::clock::Clock;
use crate::domain::commands::expenses::{CreateExpenseCommand, ExpenseAmount};
use crate::domain::models::expense::{Expense, ExpenseValidationError};
use crate::domain::period::start_of_day;
use crate::storage::{Connection, ExpenseStorage};

#[derive(Clone)]
pub struct ExpenseService<C: Connection> {
    expense_repository: C::ExpenseRepository,
    clock: Arc<dyn Clock>,
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD`
fn parse_occurred_time(input: &str) -> Result<NaiveDateTime, ExpenseValidationError> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(start_of_day)
        .map_err(|_| ExpenseValidationError::InvalidDate(input.to_string()))
}

impl<C: Connection> ExpenseService<C> {
    pub fn new(connection: &C, clock: Arc<dyn Clock>) -> Self {
        Self {
            expense_repository: connection.create_expense_repository(),
            clock,
        }
    }

    pub async fn create_expense(&self, command: CreateExpenseCommand) -> Result<Expense> {
        info!("Creating expense: {:?}", command);

        let amount = match &command.amount {
            ExpenseAmount::Exact(amount) => Expense::validate_amount(*amount)?,
            ExpenseAmount::Text(text) => Expense::parse_amount(text)?,
        };
        let occurred_time = match command.occurred_time.as_deref().map(str::trim) {
            None | Some("") => self.clock.now(),
            Some(raw) => parse_occurred_time(raw)?,
        };

        let mut expense = Expense::new(amount, occurred_time, command.category);
        expense.id = self.expense_repository.store_expense(&expense).await?;
        Ok(expense)
    }

    /// All expenses, most recent first
    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.expense_repository.list_expenses().await
    }
}
