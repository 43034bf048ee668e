//! # REST API for Expenses

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::errors::ApiError;
use crate::io::rest::mappers::ExpenseMapper;
use crate::AppState;
use shared::{CreateExpenseRequest, Expense, ExpenseListResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_expenses).post(create_expense))
}

/// GET /api/expenses, newest first
pub async fn list_expenses(State(state): State<AppState>) -> Result<Json<ExpenseListResponse>, ApiError> {
    info!("GET /api/expenses");

    let expenses = state.expense_service.list_expenses().await?;
    Ok(Json(ExpenseListResponse {
        expenses: expenses.into_iter().map(ExpenseMapper::to_dto).collect(),
    }))
}

/// POST /api/expenses
pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    info!("POST /api/expenses - request: {:?}", request);

    let expense = state
        .expense_service
        .create_expense(ExpenseMapper::to_create_command(request))
        .await?;
    Ok((StatusCode::CREATED, Json(ExpenseMapper::to_dto(expense))))
}
