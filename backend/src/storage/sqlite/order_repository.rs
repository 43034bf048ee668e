use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::{decode_amount, DbConnection};
use crate::domain::models::order::{Order, OrderNotFound};
use crate::storage::OrderStorage;

const ORDER_COLUMNS: &str = "id, external_id, sale_time, customer_name, customer_phone, amount, \
                             raw_status, due_time, paid_time, payment_method, note";

#[derive(Clone)]
pub struct SqliteOrderRepository {
    connection: DbConnection,
}

impl SqliteOrderRepository {
    pub fn new(connection: DbConnection) -> Self {
        Self { connection }
    }

    fn order_from_row(row: &SqliteRow) -> Result<Order> {
        let amount: String = row.try_get("amount")?;
        Ok(Order {
            id: row.try_get("id")?,
            external_id: row.try_get("external_id")?,
            sale_time: row.try_get("sale_time")?,
            customer_name: row.try_get("customer_name")?,
            customer_phone: row.try_get("customer_phone")?,
            amount: decode_amount("orders.amount", &amount)?,
            raw_status: row.try_get("raw_status")?,
            due_time: row.try_get("due_time")?,
            paid_time: row.try_get("paid_time")?,
            payment_method: row.try_get("payment_method")?,
            note: row.try_get("note")?,
        })
    }
}

#[async_trait]
impl OrderStorage for SqliteOrderRepository {
    async fn insert_order(&self, order: &Order) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO orders (external_id, sale_time, customer_name, customer_phone, amount,
                                raw_status, due_time, paid_time, payment_method, note)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&order.external_id)
        .bind(order.sale_time)
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(order.amount.to_string())
        .bind(&order.raw_status)
        .bind(order.due_time)
        .bind(order.paid_time)
        .bind(&order.payment_method)
        .bind(&order.note)
        .execute(self.connection.pool())
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted order {} as id {}", order.external_id, id);
        Ok(id)
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>> {
        let row = sqlx::query(&format!("SELECT {} FROM orders WHERE id = ?", ORDER_COLUMNS))
            .bind(id)
            .fetch_optional(self.connection.pool())
            .await?;

        row.as_ref().map(Self::order_from_row).transpose()
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Order>> {
        let row = sqlx::query(&format!("SELECT {} FROM orders WHERE external_id = ?", ORDER_COLUMNS))
            .bind(external_id)
            .fetch_optional(self.connection.pool())
            .await?;

        row.as_ref().map(Self::order_from_row).transpose()
    }

    async fn update_order(&self, order: &Order) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET customer_name = ?, customer_phone = ?, amount = ?, raw_status = ?,
                due_time = ?, paid_time = ?, payment_method = ?, note = ?
            WHERE id = ?
            "#,
        )
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(order.amount.to_string())
        .bind(&order.raw_status)
        .bind(order.due_time)
        .bind(order.paid_time)
        .bind(&order.payment_method)
        .bind(&order.note)
        .bind(order.id)
        .execute(self.connection.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(OrderNotFound(order.id).into());
        }
        Ok(())
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM orders ORDER BY sale_time DESC, id DESC",
            ORDER_COLUMNS
        ))
        .fetch_all(self.connection.pool())
        .await?;

        rows.iter().map(Self::order_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn order(external_id: &str, sale_time: NaiveDateTime) -> Order {
        Order::new(
            external_id.to_string(),
            sale_time,
            "Ana".to_string(),
            "5511999990000".to_string(),
            dec!(199.90),
            "approved".to_string(),
            Some("pix".to_string()),
        )
    }

    async fn setup_test_repo() -> SqliteOrderRepository {
        let db = DbConnection::init_test().await.expect("Failed to init test db");
        SqliteOrderRepository::new(db)
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let repo = setup_test_repo().await;
        let id = repo.insert_order(&order("T-1", at(1, 9))).await.unwrap();

        let by_id = repo.get_order(id).await.unwrap().expect("order by id");
        assert_eq!(by_id.id, id);
        assert_eq!(by_id.amount, dec!(199.90));
        assert_eq!(by_id.sale_time, at(1, 9));
        assert_eq!(by_id.payment_method.as_deref(), Some("pix"));

        let by_external = repo.find_by_external_id("T-1").await.unwrap().expect("order by external id");
        assert_eq!(by_external, by_id);

        assert!(repo.get_order(id + 100).await.unwrap().is_none());
        assert!(repo.find_by_external_id("T-404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_external_id_is_rejected() {
        let repo = setup_test_repo().await;
        repo.insert_order(&order("T-1", at(1, 9))).await.unwrap();
        assert!(repo.insert_order(&order("T-1", at(2, 9))).await.is_err());
    }

    #[tokio::test]
    async fn test_update_overwrites_mutable_fields() {
        let repo = setup_test_repo().await;
        let id = repo.insert_order(&order("T-1", at(1, 9))).await.unwrap();

        let mut stored = repo.get_order(id).await.unwrap().unwrap();
        stored.raw_status = "Payment Confirmed".to_string();
        stored.paid_time = Some(at(3, 12));
        stored.note = Some("called customer".to_string());
        repo.update_order(&stored).await.unwrap();

        let reloaded = repo.get_order(id).await.unwrap().unwrap();
        assert_eq!(reloaded, stored);
    }

    #[tokio::test]
    async fn test_update_missing_order_fails() {
        let repo = setup_test_repo().await;
        let mut ghost = order("T-9", at(1, 9));
        ghost.id = 42;
        let err = repo.update_order(&ghost).await.unwrap_err();
        assert_eq!(err.downcast_ref::<OrderNotFound>(), Some(&OrderNotFound(42)));
    }

    #[tokio::test]
    async fn test_list_orders_most_recent_sale_first() {
        let repo = setup_test_repo().await;
        repo.insert_order(&order("T-1", at(1, 9))).await.unwrap();
        repo.insert_order(&order("T-3", at(3, 9))).await.unwrap();
        repo.insert_order(&order("T-2", at(2, 9))).await.unwrap();

        let ids: Vec<String> = repo
            .list_orders()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.external_id)
            .collect();
        assert_eq!(ids, vec!["T-3", "T-2", "T-1"]);
    }
}
