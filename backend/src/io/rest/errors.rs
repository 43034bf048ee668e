//! Translation of domain errors into HTTP responses.
//!
//! Services return `anyhow::Result`; handlers convert the error into an
//! [`ApiError`], which downcasts to the typed domain errors to pick a status
//! code. Every error body is a JSON [`ErrorResponse`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::aggregator::AggregationError;
use crate::domain::models::expense::ExpenseValidationError;
use crate::domain::models::order::{OrderNotFound, OrderValidationError};

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(e) = err.downcast_ref::<OrderValidationError>() {
            warn!("Rejected order request: {}", e);
            return Self {
                status: StatusCode::BAD_REQUEST,
                code: "INVALID_INPUT",
                message: e.to_string(),
            };
        }
        if let Some(e) = err.downcast_ref::<ExpenseValidationError>() {
            warn!("Rejected expense request: {}", e);
            return Self {
                status: StatusCode::BAD_REQUEST,
                code: "INVALID_INPUT",
                message: e.to_string(),
            };
        }
        if let Some(e) = err.downcast_ref::<OrderNotFound>() {
            return Self {
                status: StatusCode::NOT_FOUND,
                code: "NOT_FOUND",
                message: e.to_string(),
            };
        }
        if let Some(e) = err.downcast_ref::<AggregationError>() {
            error!("Aggregation failed: {}", e);
            return Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "AGGREGATION_FAILED",
                message: e.to_string(),
            };
        }

        error!("Unhandled error: {:?}", err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            code: self.code.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_per_error_kind() {
        let cases: Vec<(anyhow::Error, StatusCode)> = vec![
            (OrderValidationError::MissingTransactionId.into(), StatusCode::BAD_REQUEST),
            (ExpenseValidationError::NegativeAmount.into(), StatusCode::BAD_REQUEST),
            (OrderNotFound(7).into(), StatusCode::NOT_FOUND),
            (
                AggregationError::Overflow {
                    metric: "paid_revenue",
                    window: "unbounded".to_string(),
                }
                .into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (anyhow::anyhow!("disk on fire"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_storage_details_are_not_leaked() {
        let api_error = ApiError::from(anyhow::anyhow!("UNIQUE constraint failed: orders.external_id"));
        assert_eq!(api_error.message, "Internal server error");
        assert_eq!(api_error.code, "INTERNAL_ERROR");
    }

    #[test]
    fn test_aggregation_error_keeps_context() {
        let api_error = ApiError::from(anyhow::Error::from(AggregationError::Overflow {
            metric: "expenses",
            window: "2024-03-01 00:00:00 .. 2024-03-15 23:59:59.999".to_string(),
        }));
        assert!(api_error.message.contains("expenses"));
        assert!(api_error.message.contains("2024-03-01"));
    }
}
