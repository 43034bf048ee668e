use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{decode_amount, DbConnection};
use crate::domain::models::expense::Expense;
use crate::storage::ExpenseStorage;

#[derive(Clone)]
pub struct SqliteExpenseRepository {
    connection: DbConnection,
}

impl SqliteExpenseRepository {
    pub fn new(connection: DbConnection) -> Self {
        Self { connection }
    }

    fn expense_from_row(row: &SqliteRow) -> Result<Expense> {
        let amount: String = row.try_get("amount")?;
        Ok(Expense {
            id: row.try_get("id")?,
            amount: decode_amount("expenses.amount", &amount)?,
            occurred_time: row.try_get("occurred_time")?,
            category: row.try_get("category")?,
        })
    }
}

#[async_trait]
impl ExpenseStorage for SqliteExpenseRepository {
    async fn store_expense(&self, expense: &Expense) -> Result<i64> {
        let result = sqlx::query("INSERT INTO expenses (amount, occurred_time, category) VALUES (?, ?, ?)")
            .bind(expense.amount.to_string())
            .bind(expense.occurred_time)
            .bind(&expense.category)
            .execute(self.connection.pool())
            .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            "SELECT id, amount, occurred_time, category FROM expenses ORDER BY occurred_time DESC, id DESC",
        )
        .fetch_all(self.connection.pool())
        .await?;

        rows.iter().map(Self::expense_from_row).collect()
    }
}
