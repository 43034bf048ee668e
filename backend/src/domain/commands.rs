//! Domain-level command and query types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs defined in the
//! `shared` crate onto these types.

pub mod orders {
    use rust_decimal::Decimal;

    use crate::domain::models::{category::Category, order::Order};

    /// Webhook event, already decoded
    #[derive(Debug, Clone, Default)]
    pub struct IngestOrderCommand {
        pub transaction_id: Option<String>,
        pub raw_status: String,
        pub amount: Option<Decimal>,
        pub customer_name: Option<String>,
        pub customer_phone: Option<String>,
        pub payment_method: Option<String>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum IngestOutcome {
        Created,
        Updated,
        Ignored,
    }

    #[derive(Debug, Clone)]
    pub struct IngestOrderResult {
        pub outcome: IngestOutcome,
        /// Stored order after the event, `None` when the event was ignored
        pub order: Option<Order>,
        pub category: Option<Category>,
    }

    #[derive(Debug, Clone)]
    pub struct ChangeStatusCommand {
        pub order_id: i64,
        pub status: String,
    }

    #[derive(Debug, Clone)]
    pub struct UpdateNoteCommand {
        pub order_id: i64,
        pub note: Option<String>,
    }

    /// Query parameters for listing orders.
    #[derive(Debug, Clone, Default)]
    pub struct OrderListQuery {
        pub status: Option<String>,
        pub search: Option<String>,
        pub page: Option<u32>,
        pub per_page: Option<u32>,
    }

    /// Order with its category evaluated at query time
    #[derive(Debug, Clone, PartialEq)]
    pub struct ListedOrder {
        pub order: Order,
        pub category: Option<Category>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct PageInfo {
        pub page: u32,
        pub per_page: u32,
        pub total_items: u64,
        pub total_pages: u32,
        pub has_more: bool,
    }

    #[derive(Debug, Clone)]
    pub struct OrderListResult {
        pub orders: Vec<ListedOrder>,
        pub pagination: PageInfo,
    }
}

pub mod expenses {
    use rust_decimal::Decimal;

    #[derive(Debug, Clone)]
    pub enum ExpenseAmount {
        Exact(Decimal),
        /// As typed by the user, possibly with a `,` decimal separator
        Text(String),
    }

    /// Input for recording a new expense.
    #[derive(Debug, Clone)]
    pub struct CreateExpenseCommand {
        pub amount: ExpenseAmount,
        pub category: Option<String>,
        pub occurred_time: Option<String>,
    }
}

pub mod dashboard {
    use super::orders::{OrderListQuery, OrderListResult};
    use crate::domain::{aggregator::KpiSet, period::ResolvedPeriod};

    #[derive(Debug, Clone, Default)]
    pub struct DashboardQuery {
        pub period: Option<String>,
        pub custom_start: Option<String>,
        pub custom_end: Option<String>,
        pub table_filters: OrderListQuery,
    }

    #[derive(Debug, Clone)]
    pub struct DashboardResult {
        pub period: ResolvedPeriod,
        pub kpis: KpiSet,
        pub orders: OrderListResult,
    }
}
