//! Order lifecycle service.
//!
//! Owns every write to an order: webhook ingestion, manual status changes
//! and note edits. Each of these is a read → compute → persist sequence run
//! under a single async write lock, so two events for the same order can
//! never interleave.
//!
//! ## Ingestion rules
//!
//! - An event for an unknown transaction only creates an order when its
//!   status classifies as Scheduled (the provider's "approved" signal).
//!   Anything else is acknowledged and dropped.
//! - An event for a known transaction overwrites the raw status and keeps
//!   `paid_time`/`due_time` consistent with the new category. The payment
//!   method is only overwritten when the event carries one.

use anyhow::Result;
use chrono::Duration;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::classifier::StatusClassifier;
use crate::domain::clock::Clock;
use crate::domain::commands::orders::{
    ChangeStatusCommand, IngestOrderCommand, IngestOrderResult, IngestOutcome, ListedOrder,
    OrderListQuery, OrderListResult, PageInfo, UpdateNoteCommand,
};
use crate::domain::models::category::Category;
use crate::domain::models::order::{Order, OrderNotFound, OrderValidationError};
use crate::storage::{Connection, OrderStorage};

/// Upper bound for a caller-supplied page size
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Clone)]
pub struct OrderService<C: Connection> {
    order_repository: C::OrderRepository,
    classifier: StatusClassifier,
    clock: Arc<dyn Clock>,
    receivable_term: Duration,
    default_per_page: u32,
    write_lock: Arc<Mutex<()>>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl<C: Connection> OrderService<C> {
    pub fn new(
        connection: &C,
        classifier: StatusClassifier,
        clock: Arc<dyn Clock>,
        receivable_term: Duration,
        default_per_page: u32,
    ) -> Self {
        Self {
            order_repository: connection.create_order_repository(),
            classifier,
            clock,
            receivable_term,
            default_per_page: default_per_page.clamp(1, MAX_PER_PAGE),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Apply one webhook event
    pub async fn ingest(&self, command: IngestOrderCommand) -> Result<IngestOrderResult> {
        info!("Ingesting order event: {:?}", command);

        let external_id = command
            .transaction_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(OrderValidationError::MissingTransactionId)?
            .to_string();
        let raw_status = command.raw_status.trim().to_string();
        let category = self.classifier.classify_label(&raw_status);
        let payment_method = non_blank(command.payment_method);

        let _guard = self.write_lock.lock().await;
        let now = self.clock.now();

        if let Some(mut order) = self.order_repository.find_by_external_id(&external_id).await? {
            if category.is_none() {
                warn!(
                    "Order {} received unrecognised status '{}'; it will be left out of every KPI",
                    external_id, raw_status
                );
            }

            order.apply_status(&raw_status, category, now, self.receivable_term);
            if payment_method.is_some() {
                order.payment_method = payment_method;
            }
            self.order_repository.update_order(&order).await?;

            let effective = self.classifier.classify(&order.raw_status, order.due_time, now);
            info!("Order {} ({}) moved to '{}'", order.id, external_id, order.raw_status);
            return Ok(IngestOrderResult {
                outcome: IngestOutcome::Updated,
                order: Some(order),
                category: effective,
            });
        }

        if category != Some(Category::Scheduled) {
            info!(
                "Ignoring '{}' event for unknown transaction {}",
                raw_status, external_id
            );
            return Ok(IngestOrderResult {
                outcome: IngestOutcome::Ignored,
                order: None,
                category,
            });
        }

        let amount = command.amount.ok_or(OrderValidationError::MissingAmount)?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(OrderValidationError::NegativeAmount.into());
        }

        let mut order = Order::new(
            external_id,
            now,
            non_blank(command.customer_name).unwrap_or_default(),
            non_blank(command.customer_phone).unwrap_or_default(),
            amount,
            raw_status,
            payment_method,
        );
        order.id = self.order_repository.insert_order(&order).await?;
        info!("Created order {} for transaction {}", order.id, order.external_id);

        Ok(IngestOrderResult {
            outcome: IngestOutcome::Created,
            order: Some(order),
            category,
        })
    }

    /// Administrator override of an order's status label
    pub async fn change_status(&self, command: ChangeStatusCommand) -> Result<ListedOrder> {
        info!("Changing status of order {} to '{}'", command.order_id, command.status);

        let label = command.status.trim();
        let category = self
            .classifier
            .classify_label(label)
            .ok_or_else(|| OrderValidationError::UnrecognizedStatus(label.to_string()))?;

        let _guard = self.write_lock.lock().await;
        let now = self.clock.now();

        let mut order = self
            .order_repository
            .get_order(command.order_id)
            .await?
            .ok_or(OrderNotFound(command.order_id))?;

        order.apply_status(label, Some(category), now, self.receivable_term);
        self.order_repository.update_order(&order).await?;

        let category = self.classifier.classify(&order.raw_status, order.due_time, now);
        Ok(ListedOrder { order, category })
    }

    pub async fn update_note(&self, command: UpdateNoteCommand) -> Result<ListedOrder> {
        let _guard = self.write_lock.lock().await;

        let mut order = self
            .order_repository
            .get_order(command.order_id)
            .await?
            .ok_or(OrderNotFound(command.order_id))?;

        order.note = command.note.filter(|n| !n.trim().is_empty());
        self.order_repository.update_order(&order).await?;
        info!("Updated note on order {}", order.id);

        let category = self
            .classifier
            .classify(&order.raw_status, order.due_time, self.clock.now());
        Ok(ListedOrder { order, category })
    }

    /// Snapshot of every stored order, most recent sale first
    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        self.order_repository.list_orders().await
    }

    /// Filtered, paginated listing with effective categories at read time
    pub async fn list_orders(&self, query: OrderListQuery) -> Result<OrderListResult> {
        let status_filter = match query.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(
                Category::from_name(name)
                    .ok_or_else(|| OrderValidationError::UnknownCategoryFilter(name.to_string()))?,
            ),
        };
        let search = query.search.unwrap_or_default();
        let now = self.clock.now();

        let matching: Vec<ListedOrder> = self
            .order_repository
            .list_orders()
            .await?
            .into_iter()
            .filter(|order| order.matches_search(&search))
            .map(|order| {
                let category = self.classifier.classify(&order.raw_status, order.due_time, now);
                ListedOrder { order, category }
            })
            .filter(|listed| status_filter.map_or(true, |wanted| listed.category == Some(wanted)))
            .collect();

        let per_page = query
            .per_page
            .unwrap_or(self.default_per_page)
            .clamp(1, MAX_PER_PAGE);
        let (orders, pagination) = paginate(matching, query.page.unwrap_or(1), per_page);

        Ok(OrderListResult { orders, pagination })
    }
}

/// Cut one 1-based page out of `items`
fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> (Vec<T>, PageInfo) {
    let page = page.max(1);
    let total_items = items.len() as u64;
    let total_pages = total_items.div_ceil(per_page as u64) as u32;
    let skip = (page as usize - 1).saturating_mul(per_page as usize);

    let page_items = items.into_iter().skip(skip).take(per_page as usize).collect();
    (
        page_items,
        PageInfo {
            page,
            per_page,
            total_items,
            total_pages,
            has_more: page < total_pages,
        },
    )
}
