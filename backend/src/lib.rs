//! # Order Dashboard Backend
//!
//! Ingests order events from the payment provider, classifies every order
//! into a business category and aggregates KPIs for the dashboard.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (classifier, aggregator, services)
//!     ↓
//! Storage Layer (sqlite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use chrono::Duration;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    Clock, DashboardService, ExpenseService, OrderService, PeriodAggregator, StatusClassifier,
    SystemClock,
};
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub order_service: OrderService<DbConnection>,
    pub expense_service: ExpenseService<DbConnection>,
    pub dashboard_service: DashboardService<DbConnection>,
}

impl AppState {
    /// Wire every service on top of one connection and one clock
    pub fn new(db: DbConnection, clock: Arc<dyn Clock>, config: &AppConfig) -> Self {
        let classifier = StatusClassifier::default();
        let order_service = OrderService::new(
            &db,
            classifier.clone(),
            clock.clone(),
            Duration::days(config.receivable_term_days),
            config.orders_per_page,
        );
        let expense_service = ExpenseService::new(&db, clock.clone());
        let dashboard_service = DashboardService::new(
            order_service.clone(),
            expense_service.clone(),
            PeriodAggregator::new(classifier),
            clock,
        );

        Self {
            order_service,
            expense_service,
            dashboard_service,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain model");
    Ok(AppState::new(db, Arc::new(SystemClock), config))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    // CORS setup to allow the dashboard frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api", io::rest::api_router())
        .layer(cors)
        .with_state(app_state))
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::util::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_full_router_flow() {
        let (state, _clock) = test_support::test_state().await;
        let app = create_router(state, &AppConfig::default()).unwrap();

        let webhook = Request::builder()
            .method("POST")
            .uri("/api/webhooks/orders")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "transaction_id": "TX-9", "raw_status": "approved", "amount": "59.90" }).to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(webhook).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let request = Request::builder()
            .uri("/api/dashboard?period=today")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let dashboard: shared::DashboardResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(dashboard.kpis.scheduled, rust_decimal_macros::dec!(59.9));
        assert_eq!(dashboard.orders.orders.len(), 1);

        let request = Request::builder().uri("/api/orders").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_cors_origin_is_an_error() {
        let config = AppConfig {
            cors_origin: "bad\norigin".to_string(),
            ..AppConfig::default()
        };
        let (state, _clock) = test_support::test_state().await;
        assert!(create_router(state, &config).is_err());
    }
}
