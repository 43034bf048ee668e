//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for the order dashboard.
//! This layer handles:
//! - HTTP request/response serialization and deserialization
//! - Error translation from domain to HTTP status codes
//! - Request logging
//!
//! Handlers are thin: they map `shared` DTOs onto domain commands, call one
//! service and map the result back.

pub mod dashboard_apis;
pub mod errors;
pub mod expense_apis;
pub mod mappers;
pub mod order_apis;
pub mod webhook_apis;

use axum::Router;

use crate::AppState;

/// All API routes, to be nested under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/webhooks", webhook_apis::router())
        .nest("/orders", order_apis::router())
        .nest("/expenses", expense_apis::router())
        .nest("/dashboard", dashboard_apis::router())
}
