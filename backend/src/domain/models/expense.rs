//! Domain model for an expense entry.
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Store-assigned id, `0` until the expense has been inserted
    pub id: i64,
    pub amount: Decimal,
    pub occurred_time: NaiveDateTime,
    pub category: Option<String>,
}

impl Expense {
    pub fn new(amount: Decimal, occurred_time: NaiveDateTime, category: Option<String>) -> Self {
        let category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self {
            id: 0,
            amount,
            occurred_time,
            category,
        }
    }

    /// Category used for chart bucketing
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// Parse a user-typed amount, accepting `,` as the decimal separator
    pub fn parse_amount(input: &str) -> Result<Decimal, ExpenseValidationError> {
        let normalized = input.trim().replace(',', ".");
        let amount = Decimal::from_str(&normalized)
            .map_err(|_| ExpenseValidationError::InvalidAmount(input.to_string()))?;
        Self::validate_amount(amount)
    }

    pub fn validate_amount(amount: Decimal) -> Result<Decimal, ExpenseValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ExpenseValidationError::NegativeAmount);
        }
        Ok(amount)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ExpenseValidationError {
    #[error("Amount '{0}' is not a valid number")]
    InvalidAmount(String),
    #[error("Amount cannot be negative")]
    NegativeAmount,
    #[error("Date '{0}' is not a valid timestamp")]
    InvalidDate(String),
}
