use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical business state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderCategory {
    /// Approved upstream, payment not yet due
    Scheduled,
    /// Payment confirmed
    Paid,
    /// Delivered, payment expected by the due date
    Receivable,
    /// Receivable whose due date has passed
    Overdue,
    /// Cancelled, refused, charged back or expired
    Failed,
}

/// An order as shown to API consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// Transaction id assigned by the upstream provider
    pub external_id: String,
    pub sale_time: NaiveDateTime,
    pub customer_name: String,
    pub customer_phone: String,
    pub amount: Decimal,
    /// Status label exactly as last received
    pub raw_status: String,
    /// Effective category at the time of the request; `None` when the raw
    /// status is not recognised
    pub category: Option<OrderCategory>,
    pub due_time: Option<NaiveDateTime>,
    pub paid_time: Option<NaiveDateTime>,
    pub payment_method: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderListRequest {
    /// Category name to filter by (`overdue` included)
    pub status: Option<String>,
    /// Case-insensitive match against customer name or phone
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub pagination: PaginationInfo,
}

/// Event delivered by the payment provider webhook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionEvent {
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub raw_status: String,
    pub amount: Option<Decimal>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionOutcome {
    Created,
    Updated,
    /// Unknown transaction whose status is not a creation signal
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionResponse {
    pub outcome: IngestionOutcome,
    pub order_id: Option<i64>,
    pub category: Option<OrderCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// Requested status label, classified with the same rules as webhook events
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatusResponse {
    pub order: Order,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    pub note: Option<String>,
}

/// Monetary amount as typed by a user: either a JSON number or a string that
/// may use `,` as decimal separator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(Decimal),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: AmountInput,
    pub category: Option<String>,
    /// Optional timestamp override (RFC 3339 or `YYYY-MM-DD HH:MM:SS`);
    /// defaults to the current time
    pub occurred_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub amount: Decimal,
    pub occurred_time: NaiveDateTime,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    /// Period name (`today`, `last_7_days`, `custom`, ...); defaults to `today`
    pub period: Option<String>,
    /// `YYYY-MM-DD`, only used with `custom`
    pub custom_start: Option<String>,
    pub custom_end: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodInfo {
    /// Effective period name after fallbacks
    pub name: String,
    pub label: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub scheduled: Decimal,
    pub scheduled_all_time: Decimal,
    pub paid_revenue: Decimal,
    pub failed: Decimal,
    pub expenses: Decimal,
    pub sales_count: u64,
    pub receivable: Decimal,
    pub receivable_all_time: Decimal,
    pub overdue: Decimal,
    pub overdue_all_time: Decimal,
    pub profit: Decimal,
    pub roi: Decimal,
    pub margin_pct: Decimal,
    pub projection: Decimal,
    /// Orders left out of every KPI because their status was not recognised
    pub unclassified_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries<T> {
    pub labels: Vec<String>,
    pub data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardCharts {
    pub paid_revenue_by_day: ChartSeries<Decimal>,
    pub expenses_by_day: ChartSeries<Decimal>,
    pub expenses_by_category: ChartSeries<Decimal>,
    pub sales_by_payment_method: ChartSeries<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub period: PeriodInfo,
    pub kpis: KpiSummary,
    pub charts: DashboardCharts,
    pub orders: OrderListResponse,
}

/// Error body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_input_accepts_number_and_text() {
        let number: AmountInput = serde_json::from_str("12.5").unwrap();
        assert!(matches!(number, AmountInput::Number(_)));

        let text: AmountInput = serde_json::from_str("\"12,50\"").unwrap();
        assert_eq!(text, AmountInput::Text("12,50".to_string()));
    }

    #[test]
    fn test_ingestion_event_defaults_missing_fields() {
        let event: IngestionEvent = serde_json::from_str(r#"{"transaction_id": "T1"}"#).unwrap();
        assert_eq!(event.transaction_id.as_deref(), Some("T1"));
        assert_eq!(event.raw_status, "");
        assert!(event.amount.is_none());
        assert!(event.payment_method.is_none());
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&OrderCategory::Receivable).unwrap();
        assert_eq!(json, "\"receivable\"");
    }
}
