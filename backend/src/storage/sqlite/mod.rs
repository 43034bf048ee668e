//! SQLite storage backend built on sqlx.

pub mod connection;
pub mod expense_repository;
pub mod order_repository;

pub use connection::DbConnection;
pub use expense_repository::SqliteExpenseRepository;
pub use order_repository::SqliteOrderRepository;

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::storage::Connection;

impl Connection for DbConnection {
    type OrderRepository = SqliteOrderRepository;
    type ExpenseRepository = SqliteExpenseRepository;

    fn create_order_repository(&self) -> Self::OrderRepository {
        SqliteOrderRepository::new(self.clone())
    }

    fn create_expense_repository(&self) -> Self::ExpenseRepository {
        SqliteExpenseRepository::new(self.clone())
    }
}

/// Amounts are stored as TEXT so no precision is lost on the way through sqlite
pub(crate) fn decode_amount(column: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| anyhow!("Invalid amount '{}' in column {}: {}", raw, column, e))
}
