//! Dashboard read model: resolves the reporting period, aggregates the KPI
//! set over a snapshot of orders and expenses, and attaches the filtered
//! order page.
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use crate::domain::aggregator::PeriodAggregator;
use crate::domain::clock::Clock;
use crate::domain::commands::dashboard::{DashboardQuery, DashboardResult};
use crate::domain::expense_service::ExpenseService;
use crate::domain::order_service::OrderService;
use crate::domain::period::resolve_period;
use crate::storage::Connection;

#[derive(Clone)]
pub struct DashboardService<C: Connection> {
    order_service: OrderService<C>,
    expense_service: ExpenseService<C>,
    aggregator: PeriodAggregator,
    clock: Arc<dyn Clock>,
}

impl<C: Connection> DashboardService<C> {
    pub fn new(
        order_service: OrderService<C>,
        expense_service: ExpenseService<C>,
        aggregator: PeriodAggregator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            order_service,
            expense_service,
            aggregator,
            clock,
        }
    }

    pub async fn get_dashboard(&self, query: DashboardQuery) -> Result<DashboardResult> {
        let now = self.clock.now();
        let period = resolve_period(
            query.period.as_deref().unwrap_or("today"),
            query.custom_start.as_deref(),
            query.custom_end.as_deref(),
            now.date(),
        );
        info!("Building dashboard for {} ({})", period.label, period.window);

        let orders = self.order_service.all_orders().await?;
        let expenses = self.expense_service.list_expenses().await?;

        let kpis = self
            .aggregator
            .aggregate(&orders, &expenses, period.window, now)
            .map_err(|e| {
                error!("Dashboard aggregation failed for period '{}': {}", period.label, e);
                e
            })?;

        let orders = self.order_service.list_orders(query.table_filters).await?;

        Ok(DashboardResult { period, kpis, orders })
    }
}
