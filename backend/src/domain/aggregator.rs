//! KPI aggregation over a reporting window.
//!
//! Every metric filters on its own timestamp field: revenue and sales count
//! follow `paid_time`, scheduled/failed/receivable/overdue follow
//! `sale_time`, expenses follow `occurred_time`. Categories are the effective
//! ones at `now`, so a receivable past its due date counts as overdue.
//!
//! Orders whose status matches no rule are excluded from every metric and
//! reported through `unclassified_count`.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::domain::{
    classifier::StatusClassifier,
    models::{category::Category, expense::Expense, order::Order},
    period::Window,
};

pub const PAYMENT_METHOD_NOT_INFORMED: &str = "not informed";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSet {
    pub paid_revenue_by_day: Vec<(NaiveDate, Decimal)>,
    pub expenses_by_day: Vec<(NaiveDate, Decimal)>,
    pub expenses_by_category: Vec<(String, Decimal)>,
    pub sales_by_payment_method: Vec<(String, u64)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiSet {
    pub scheduled: Decimal,
    pub scheduled_all_time: Decimal,
    pub paid_revenue: Decimal,
    pub failed: Decimal,
    pub expenses: Decimal,
    pub sales_count: u64,
    pub receivable: Decimal,
    pub receivable_all_time: Decimal,
    pub overdue: Decimal,
    pub overdue_all_time: Decimal,
    pub profit: Decimal,
    pub roi: Decimal,
    pub margin_pct: Decimal,
    pub projection: Decimal,
    pub unclassified_count: u64,
    pub charts: ChartSet,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AggregationError {
    #[error("Arithmetic overflow computing '{metric}' for window {window}")]
    Overflow { metric: &'static str, window: String },
}

/// An order paired with its effective category
struct Classified<'a> {
    order: &'a Order,
    category: Category,
}

#[derive(Debug, Clone, Default)]
pub struct PeriodAggregator {
    classifier: StatusClassifier,
}

impl PeriodAggregator {
    pub fn new(classifier: StatusClassifier) -> Self {
        Self { classifier }
    }

    pub fn aggregate(
        &self,
        orders: &[Order],
        expenses: &[Expense],
        window: Window,
        now: NaiveDateTime,
    ) -> Result<KpiSet, AggregationError> {
        let mut unclassified_count = 0u64;
        let classified: Vec<Classified> = orders
            .iter()
            .filter_map(|order| {
                match self.classifier.classify(&order.raw_status, order.due_time, now) {
                    Some(category) => Some(Classified { order, category }),
                    None => {
                        debug!(
                            "Order {} has unrecognised status '{}'",
                            order.external_id, order.raw_status
                        );
                        unclassified_count += 1;
                        None
                    }
                }
            })
            .collect();

        if unclassified_count > 0 {
            warn!(
                "{} order(s) excluded from KPIs because their status matched no rule",
                unclassified_count
            );
        }

        let calc = Calc { window };

        let paid_in_window: Vec<&Order> = orders_in(&classified, Category::Paid)
            .filter(|o| window.contains_opt(o.paid_time))
            .collect();

        let scheduled = calc.sum(
            "scheduled",
            orders_in(&classified, Category::Scheduled)
                .filter(|o| window.contains(o.sale_time))
                .map(|o| o.amount),
        )?;
        let scheduled_all_time = calc.sum(
            "scheduled_all_time",
            orders_in(&classified, Category::Scheduled).map(|o| o.amount),
        )?;
        let paid_revenue = calc.sum("paid_revenue", paid_in_window.iter().map(|o| o.amount))?;
        let sales_count = paid_in_window.len() as u64;
        let failed = calc.sum(
            "failed",
            orders_in(&classified, Category::Failed)
                .filter(|o| window.contains(o.sale_time))
                .map(|o| o.amount),
        )?;
        let expenses_total = calc.sum(
            "expenses",
            expenses
                .iter()
                .filter(|e| window.contains(e.occurred_time))
                .map(|e| e.amount),
        )?;
        let receivable = calc.sum(
            "receivable",
            orders_in(&classified, Category::Receivable)
                .filter(|o| window.contains(o.sale_time))
                .map(|o| o.amount),
        )?;
        let receivable_all_time = calc.sum(
            "receivable_all_time",
            orders_in(&classified, Category::Receivable).map(|o| o.amount),
        )?;
        let overdue = calc.sum(
            "overdue",
            orders_in(&classified, Category::Overdue)
                .filter(|o| window.contains(o.sale_time))
                .map(|o| o.amount),
        )?;
        let overdue_all_time = calc.sum(
            "overdue_all_time",
            orders_in(&classified, Category::Overdue).map(|o| o.amount),
        )?;

        let profit = calc.check("profit", paid_revenue.checked_sub(expenses_total))?;
        let roi = if expenses_total > Decimal::ZERO {
            calc.check("roi", profit.checked_div(expenses_total))?
        } else {
            Decimal::ZERO
        };
        let margin_pct = if paid_revenue > Decimal::ZERO {
            calc.check(
                "margin_pct",
                profit
                    .checked_div(paid_revenue)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED)),
            )?
        } else {
            Decimal::ZERO
        };
        let projection = calc.sum("projection", [paid_revenue, receivable, scheduled_all_time].into_iter())?;

        let mut revenue_by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        let mut by_method: BTreeMap<String, u64> = BTreeMap::new();
        for order in &paid_in_window {
            if let Some(paid_time) = order.paid_time {
                calc.add_to(&mut revenue_by_day, "paid_revenue_by_day", paid_time.date(), order.amount)?;
            }
            let method = order
                .payment_method
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(PAYMENT_METHOD_NOT_INFORMED);
            *by_method.entry(method.to_string()).or_insert(0) += 1;
        }

        let mut expenses_by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        let mut expenses_by_category: BTreeMap<String, Decimal> = BTreeMap::new();
        for expense in expenses.iter().filter(|e| window.contains(e.occurred_time)) {
            calc.add_to(&mut expenses_by_day, "expenses_by_day", expense.occurred_time.date(), expense.amount)?;
            calc.add_to(
                &mut expenses_by_category,
                "expenses_by_category",
                expense.category_label().to_string(),
                expense.amount,
            )?;
        }

        Ok(KpiSet {
            scheduled,
            scheduled_all_time,
            paid_revenue,
            failed,
            expenses: expenses_total,
            sales_count,
            receivable,
            receivable_all_time,
            overdue,
            overdue_all_time,
            profit,
            roi,
            margin_pct,
            projection,
            unclassified_count,
            charts: ChartSet {
                paid_revenue_by_day: revenue_by_day.into_iter().collect(),
                expenses_by_day: expenses_by_day.into_iter().collect(),
                expenses_by_category: expenses_by_category.into_iter().collect(),
                sales_by_payment_method: by_method.into_iter().collect(),
            },
        })
    }
}

fn orders_in<'a>(
    classified: &'a [Classified<'a>],
    category: Category,
) -> impl Iterator<Item = &'a Order> + 'a {
    classified
        .iter()
        .filter(move |c| c.category == category)
        .map(|c| c.order)
}

/// Checked arithmetic that reports the failing metric and window
struct Calc {
    window: Window,
}

impl Calc {
    fn check(&self, metric: &'static str, value: Option<Decimal>) -> Result<Decimal, AggregationError> {
        value.ok_or_else(|| AggregationError::Overflow {
            metric,
            window: self.window.to_string(),
        })
    }

    fn sum<I>(&self, metric: &'static str, mut values: I) -> Result<Decimal, AggregationError>
    where
        I: Iterator<Item = Decimal>,
    {
        values.try_fold(Decimal::ZERO, |acc, v| self.check(metric, acc.checked_add(v)))
    }

    fn add_to<K: Ord>(
        &self,
        buckets: &mut BTreeMap<K, Decimal>,
        metric: &'static str,
        key: K,
        amount: Decimal,
    ) -> Result<(), AggregationError> {
        let bucket = buckets.entry(key).or_insert(Decimal::ZERO);
        *bucket = self.check(metric, bucket.checked_add(amount))?;
        Ok(())
    }
}
