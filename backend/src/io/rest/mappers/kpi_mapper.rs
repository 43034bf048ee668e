use chrono::NaiveDate;

use super::order_mapper::OrderMapper;
use crate::domain::aggregator::{ChartSet, KpiSet};
use crate::domain::commands::dashboard::DashboardResult;
use crate::domain::period::ResolvedPeriod;
use shared::{ChartSeries, DashboardCharts, DashboardResponse, KpiSummary, PeriodInfo};

pub struct KpiMapper;

impl KpiMapper {
    pub fn to_period_info(period: &ResolvedPeriod) -> PeriodInfo {
        PeriodInfo {
            name: period.name.as_str().to_string(),
            label: period.label.clone(),
            start: period.window.start(),
            end: period.window.end(),
        }
    }

    pub fn to_summary(kpis: &KpiSet) -> KpiSummary {
        KpiSummary {
            scheduled: kpis.scheduled,
            scheduled_all_time: kpis.scheduled_all_time,
            paid_revenue: kpis.paid_revenue,
            failed: kpis.failed,
            expenses: kpis.expenses,
            sales_count: kpis.sales_count,
            receivable: kpis.receivable,
            receivable_all_time: kpis.receivable_all_time,
            overdue: kpis.overdue,
            overdue_all_time: kpis.overdue_all_time,
            profit: kpis.profit,
            roi: kpis.roi,
            margin_pct: kpis.margin_pct,
            projection: kpis.projection,
            unclassified_count: kpis.unclassified_count,
        }
    }

    /// Day buckets are labelled `dd/mm`
    fn daily<T>(points: Vec<(NaiveDate, T)>) -> ChartSeries<T> {
        let (labels, data) = points
            .into_iter()
            .map(|(day, value)| (day.format("%d/%m").to_string(), value))
            .unzip();
        ChartSeries { labels, data }
    }

    fn keyed<T>(points: Vec<(String, T)>) -> ChartSeries<T> {
        let (labels, data) = points.into_iter().unzip();
        ChartSeries { labels, data }
    }

    pub fn to_charts(charts: ChartSet) -> DashboardCharts {
        DashboardCharts {
            paid_revenue_by_day: Self::daily(charts.paid_revenue_by_day),
            expenses_by_day: Self::daily(charts.expenses_by_day),
            expenses_by_category: Self::keyed(charts.expenses_by_category),
            sales_by_payment_method: Self::keyed(charts.sales_by_payment_method),
        }
    }

    pub fn to_dashboard_response(result: DashboardResult) -> DashboardResponse {
        DashboardResponse {
            period: Self::to_period_info(&result.period),
            kpis: Self::to_summary(&result.kpis),
            charts: Self::to_charts(result.kpis.charts),
            orders: OrderMapper::to_list_response(result.orders),
        }
    }
}
