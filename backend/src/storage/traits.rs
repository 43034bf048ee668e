//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::expense::Expense as DomainExpense;
use crate::domain::models::order::Order as DomainOrder;

/// Trait defining the interface for order storage operations
///
/// Every order is keyed twice: by the store-assigned `id` and by the
/// provider's `external_id`, which is unique.
#[async_trait]
pub trait OrderStorage: Send + Sync {
    /// Insert a new order and return its assigned id
    async fn insert_order(&self, order: &DomainOrder) -> Result<i64>;

    async fn get_order(&self, id: i64) -> Result<Option<DomainOrder>>;

    /// Look up an order by the provider's transaction id
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<DomainOrder>>;

    /// Overwrite every mutable field of an existing order in one statement
    async fn update_order(&self, order: &DomainOrder) -> Result<()>;

    /// All orders, most recent sale first
    async fn list_orders(&self) -> Result<Vec<DomainOrder>>;
}

/// Trait defining the interface for expense storage operations
#[async_trait]
pub trait ExpenseStorage: Send + Sync {
    /// Store a new expense and return its assigned id
    async fn store_expense(&self, expense: &DomainExpense) -> Result<i64>;

    /// All expenses, most recent first
    async fn list_expenses(&self) -> Result<Vec<DomainExpense>>;
}

/// Trait for a connection that can create repositories
pub trait Connection: Send + Sync + Clone + 'static {
    /// The type of OrderStorage this connection creates
    type OrderRepository: OrderStorage + Clone + 'static;

    /// The type of ExpenseStorage this connection creates
    type ExpenseRepository: ExpenseStorage + Clone + 'static;

    fn create_order_repository(&self) -> Self::OrderRepository;

    fn create_expense_repository(&self) -> Self::ExpenseRepository;
}
