//! # Domain Module
//!
//! Contains all business logic for the order dashboard.
//!
//! This module encapsulates the rules that turn raw provider status labels
//! into business categories and those categories into KPIs. It operates
//! independently of the HTTP layer and of the storage backend.
//!
//! ## Module Organization
//!
//! - **classifier**: Declarative rule table and the pure status classifier
//! - **period**: Named reporting periods resolved into inclusive windows
//! - **aggregator**: KPI set and chart series over a window
//! - **clock**: Injected time source
//! - **order_service**: Webhook ingestion, manual status changes, notes, listing
//! - **expense_service**: Expense entry and listing
//! - **dashboard_service**: Period + KPIs + order page in one read
//!
//! ## Business Rules
//!
//! - Classification is case- and whitespace-insensitive; exact labels win
//!   over prefixes
//! - A receivable order past its due date is reported as overdue, computed on
//!   read and never stored
//! - Orders whose status matches no rule are listed but excluded from every KPI
//! - Every KPI filters on its own timestamp field

pub mod aggregator;
pub mod classifier;
pub mod clock;
pub mod commands;
pub mod dashboard_service;
pub mod expense_service;
pub mod models;
pub mod order_service;
pub mod period;

pub use aggregator::{AggregationError, KpiSet, PeriodAggregator};
pub use classifier::{RuleTable, StatusClassifier};
pub use clock::{Clock, SystemClock};
pub use dashboard_service::DashboardService;
pub use expense_service::ExpenseService;
pub use order_service::OrderService;
pub use period::{resolve_period, PeriodName, ResolvedPeriod, Window};
