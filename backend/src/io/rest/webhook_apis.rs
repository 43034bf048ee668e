//! # REST API for Provider Webhooks
//!
//! Receives order lifecycle events from the payment provider. Events for
//! unknown transactions that are not creation signals are acknowledged with
//! `200` and an `ignored` outcome, so the provider does not retry them.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use tracing::info;

use crate::io::rest::errors::ApiError;
use crate::io::rest::mappers::OrderMapper;
use crate::AppState;
use shared::{IngestionEvent, IngestionOutcome, IngestionResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/orders", post(receive_order_event))
}

/// Apply one order event
pub async fn receive_order_event(
    State(state): State<AppState>,
    Json(event): Json<IngestionEvent>,
) -> Result<(StatusCode, Json<IngestionResponse>), ApiError> {
    info!("POST /api/webhooks/orders - event: {:?}", event);

    let result = state
        .order_service
        .ingest(OrderMapper::to_ingest_command(event))
        .await?;
    let response = OrderMapper::to_ingestion_response(result);

    let status = if response.outcome == IngestionOutcome::Created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt; // for `oneshot`

    async fn post_event(app: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/orders")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_approved_event_creates_order() {
        let (state, _clock) = test_state().await;
        let app = router().with_state(state);

        let (status, body) = post_event(
            app,
            json!({
                "transaction_id": "TX-1",
                "raw_status": "Approved",
                "amount": "150.00",
                "customer_name": "Bruna",
                "customer_phone": "5511912345678"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["outcome"], "created");
        assert_eq!(body["category"], "scheduled");
        assert!(body["order_id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_unknown_non_creation_event_is_acknowledged() {
        let (state, _clock) = test_state().await;
        let app = router().with_state(state);

        let (status, body) = post_event(
            app,
            json!({ "transaction_id": "TX-404", "raw_status": "Payment Confirmed" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "ignored");
        assert_eq!(body["order_id"], Value::Null);
    }

    #[tokio::test]
    async fn test_missing_transaction_id_is_bad_request() {
        let (state, _clock) = test_state().await;
        let app = router().with_state(state);

        let (status, body) = post_event(app, json!({ "raw_status": "Approved", "amount": 10 })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
    }
}
