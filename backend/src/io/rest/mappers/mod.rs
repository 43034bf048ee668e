//! Conversions between `shared` DTOs and domain types.

pub mod expense_mapper;
pub mod kpi_mapper;
pub mod order_mapper;

pub use expense_mapper::ExpenseMapper;
pub use kpi_mapper::KpiMapper;
pub use order_mapper::OrderMapper;
