use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// DbConnection manages the sqlite pool and schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and bring its schema
    /// up to date.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Self::setup_schema(&pool).await?;
        info!("Database ready at {}", url);

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Private in-memory database. A single never-recycled connection keeps
    /// the data alive for the lifetime of the pool.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a test database
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        Self::in_memory().await
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                external_id TEXT NOT NULL UNIQUE,
                sale_time TEXT NOT NULL,
                customer_name TEXT NOT NULL DEFAULT '',
                customer_phone TEXT NOT NULL DEFAULT '',
                amount TEXT NOT NULL,
                raw_status TEXT NOT NULL,
                due_time TEXT,
                paid_time TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Columns added after the first release
        Self::ensure_column(pool, "orders", "payment_method", "TEXT").await?;
        Self::ensure_column(pool, "orders", "note", "TEXT").await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount TEXT NOT NULL,
                occurred_time TEXT NOT NULL,
                category TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_sale_time ON orders (sale_time)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Add `column` to `table` unless it is already there
    async fn ensure_column(pool: &SqlitePool, table: &str, column: &str, definition: &str) -> Result<()> {
        let columns = sqlx::query(&format!("PRAGMA table_info({})", table))
            .fetch_all(pool)
            .await?;

        let exists = columns
            .iter()
            .any(|row| row.try_get::<String, _>("name").map_or(false, |name| name == column));

        if !exists {
            info!("Adding missing column {}.{}", table, column);
            sqlx::query(&format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition))
                .execute(pool)
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn column_names(pool: &SqlitePool, table: &str) -> Vec<String> {
        sqlx::query(&format!("PRAGMA table_info({})", table))
            .fetch_all(pool)
            .await
            .unwrap()
            .iter()
            .map(|row| row.get::<String, _>("name"))
            .collect()
    }

    #[tokio::test]
    async fn test_fresh_database_has_full_schema() {
        let db = DbConnection::init_test().await.unwrap();
        let columns = column_names(db.pool(), "orders").await;
        assert!(columns.contains(&"payment_method".to_string()));
        assert!(columns.contains(&"note".to_string()));
        assert!(column_names(db.pool(), "expenses").await.contains(&"category".to_string()));
    }

    #[tokio::test]
    async fn test_legacy_orders_table_gains_new_columns() {
        let dir = tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("orders.db").display());

        {
            let options = SqliteConnectOptions::from_str(&url).unwrap().create_if_missing(true);
            let pool = SqlitePool::connect_with(options).await.unwrap();
            sqlx::query(
                r#"
                CREATE TABLE orders (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    external_id TEXT NOT NULL UNIQUE,
                    sale_time TEXT NOT NULL,
                    customer_name TEXT NOT NULL DEFAULT '',
                    customer_phone TEXT NOT NULL DEFAULT '',
                    amount TEXT NOT NULL,
                    raw_status TEXT NOT NULL,
                    due_time TEXT,
                    paid_time TEXT
                )
                "#,
            )
            .execute(&pool)
            .await
            .unwrap();
            sqlx::query(
                "INSERT INTO orders (external_id, sale_time, amount, raw_status) VALUES ('OLD-1', '2024-01-05 10:00:00', '42.50', 'Paid')",
            )
            .execute(&pool)
            .await
            .unwrap();
            pool.close().await;
        }

        let db = DbConnection::new(&url).await.unwrap();
        let columns = column_names(db.pool(), "orders").await;
        assert!(columns.contains(&"payment_method".to_string()));
        assert!(columns.contains(&"note".to_string()));

        let row = sqlx::query("SELECT external_id, note FROM orders")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row.get::<String, _>("external_id"), "OLD-1");
        assert_eq!(row.get::<Option<String>, _>("note"), None);

        // Re-opening is a no-op
        drop(db);
        DbConnection::new(&url).await.unwrap();
    }
}
