//! # REST API for Orders
//!
//! Listing with status/search filters, plus the two administrator actions:
//! manual status change and note edit.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::domain::commands::orders::{ChangeStatusCommand, UpdateNoteCommand};
use crate::io::rest::errors::ApiError;
use crate::io::rest::mappers::OrderMapper;
use crate::AppState;
use shared::{
    Order, OrderListRequest, OrderListResponse, UpdateNoteRequest, UpdateStatusRequest,
    UpdateStatusResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/:id/status", post(update_status))
        .route("/:id/note", post(update_note))
}

/// GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(request): Query<OrderListRequest>,
) -> Result<Json<OrderListResponse>, ApiError> {
    info!("GET /api/orders - query: {:?}", request);

    let result = state
        .order_service
        .list_orders(OrderMapper::to_list_query(request))
        .await?;
    Ok(Json(OrderMapper::to_list_response(result)))
}

/// POST /api/orders/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    info!("POST /api/orders/{}/status - request: {:?}", order_id, request);

    let listed = state
        .order_service
        .change_status(ChangeStatusCommand {
            order_id,
            status: request.status,
        })
        .await?;

    let order = OrderMapper::to_dto(listed);
    let success_message = format!("Order {} updated to '{}'", order.id, order.raw_status);
    Ok(Json(UpdateStatusResponse { order, success_message }))
}

/// POST /api/orders/:id/note
pub async fn update_note(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
    Json(request): Json<UpdateNoteRequest>,
) -> Result<Json<Order>, ApiError> {
    info!("POST /api/orders/{}/note", order_id);

    let listed = state
        .order_service
        .update_note(UpdateNoteCommand {
            order_id,
            note: request.note,
        })
        .await?;
    Ok(Json(OrderMapper::to_dto(listed)))
}
