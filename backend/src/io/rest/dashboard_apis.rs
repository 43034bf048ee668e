//! # REST API for the Dashboard
//!
//! One read that returns the resolved period, the KPI set, chart series and
//! the filtered order page.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use tracing::info;

use crate::domain::commands::dashboard::DashboardQuery;
use crate::domain::commands::orders::OrderListQuery;
use crate::io::rest::errors::ApiError;
use crate::io::rest::mappers::KpiMapper;
use crate::AppState;
use shared::{DashboardRequest, DashboardResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(request): Query<DashboardRequest>,
) -> Result<Json<DashboardResponse>, ApiError> {
    info!("GET /api/dashboard - query: {:?}", request);

    let query = DashboardQuery {
        period: request.period,
        custom_start: request.custom_start,
        custom_end: request.custom_end,
        table_filters: OrderListQuery {
            status: request.status,
            search: request.search,
            page: request.page,
            per_page: None,
        },
    };

    let result = state.dashboard_service.get_dashboard(query).await?;
    Ok(Json(KpiMapper::to_dashboard_response(result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::expenses::{CreateExpenseCommand, ExpenseAmount};
    use crate::domain::commands::orders::IngestOrderCommand;
    use crate::test_support::{at, test_state};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tower::util::ServiceExt; // for `oneshot`

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn event(id: &str, status: &str, amount: Decimal) -> IngestOrderCommand {
        IngestOrderCommand {
            transaction_id: Some(id.to_string()),
            raw_status: status.to_string(),
            amount: Some(amount),
            payment_method: Some("card".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_current_month_dashboard() {
        let (state, clock) = test_state().await;

        clock.set(at(2024, 3, 1, 10));
        state.order_service.ingest(event("T-1", "approved", dec!(100))).await.unwrap();
        clock.set(at(2024, 3, 2, 10));
        state.order_service.ingest(event("T-1", "Payment Confirmed", dec!(100))).await.unwrap();
        state
            .expense_service
            .create_expense(CreateExpenseCommand {
                amount: ExpenseAmount::Exact(dec!(40)),
                category: None,
                occurred_time: None,
            })
            .await
            .unwrap();
        clock.set(at(2024, 3, 15, 12));

        let app = router().with_state(state);
        let (status, body) = get(app, "/?period=current_month").await;
        assert_eq!(status, StatusCode::OK);

        let response: DashboardResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.period.name, "current_month");
        assert_eq!(response.period.label, "Current Month");
        assert_eq!(response.kpis.paid_revenue, dec!(100));
        assert_eq!(response.kpis.expenses, dec!(40));
        assert_eq!(response.kpis.profit, dec!(60));
        assert_eq!(response.kpis.roi, dec!(1.5));
        assert_eq!(response.kpis.margin_pct, dec!(60));
        assert_eq!(response.charts.paid_revenue_by_day.labels, vec!["02/03"]);
        assert_eq!(response.charts.sales_by_payment_method.labels, vec!["card"]);
        assert_eq!(response.charts.expenses_by_category.labels, vec!["uncategorized"]);
        assert_eq!(response.orders.orders.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_custom_period_echoes_today() {
        let (state, _clock) = test_state().await;
        let app = router().with_state(state);

        let (status, body) = get(app, "/?period=custom&custom_start=2024-02-10").await;
        assert_eq!(status, StatusCode::OK);

        let response: DashboardResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.period.name, "today");
        assert_eq!(response.period.label, "Today");
    }

    #[tokio::test]
    async fn test_overflow_is_reported_as_server_error() {
        let (state, _clock) = test_state().await;
        state.order_service.ingest(event("T-1", "approved", Decimal::MAX)).await.unwrap();
        state.order_service.ingest(event("T-2", "approved", Decimal::MAX)).await.unwrap();
        let app = router().with_state(state);

        let (status, body) = get(app, "/?period=all_time").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let error: shared::ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "AGGREGATION_FAILED");
        assert!(error.error.contains("scheduled"));
    }
}
