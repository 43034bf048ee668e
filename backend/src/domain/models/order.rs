//! Domain model for an order received from the payment provider.
use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;

use super::category::Category;

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Store-assigned id, `0` until the order has been inserted
    pub id: i64,
    pub external_id: String,
    pub sale_time: NaiveDateTime,
    pub customer_name: String,
    pub customer_phone: String,
    pub amount: Decimal,
    pub raw_status: String,
    pub due_time: Option<NaiveDateTime>,
    pub paid_time: Option<NaiveDateTime>,
    pub payment_method: Option<String>,
    pub note: Option<String>,
}

impl Order {
    /// Build a not-yet-persisted order from its first (creation) event
    pub fn new(
        external_id: String,
        sale_time: NaiveDateTime,
        customer_name: String,
        customer_phone: String,
        amount: Decimal,
        raw_status: String,
        payment_method: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            external_id,
            sale_time,
            customer_name,
            customer_phone,
            amount,
            raw_status,
            due_time: None,
            paid_time: None,
            payment_method,
            note: None,
        }
    }

    /// Overwrite the raw status and keep the category-bound timestamps
    /// consistent with the newly classified category.
    ///
    /// `category` is the rule-table classification of `raw_status`, before the
    /// overdue override. `paid_time` is stamped only when entering Paid and is
    /// cleared on leaving it; `due_time` is stamped the first time the order
    /// becomes receivable.
    pub fn apply_status(
        &mut self,
        raw_status: &str,
        category: Option<Category>,
        now: NaiveDateTime,
        receivable_term: Duration,
    ) {
        self.raw_status = raw_status.trim().to_string();

        if category == Some(Category::Paid) {
            if self.paid_time.is_none() {
                self.paid_time = Some(now);
            }
        } else {
            self.paid_time = None;
        }

        if category == Some(Category::Receivable) && self.due_time.is_none() {
            self.due_time = Some(now + receivable_term);
        }
    }

    /// Case-insensitive substring match on customer name or phone
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.customer_name.to_lowercase().contains(&term)
            || self.customer_phone.to_lowercase().contains(&term)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OrderValidationError {
    #[error("Transaction id is required")]
    MissingTransactionId,
    #[error("Amount is required to create an order")]
    MissingAmount,
    #[error("Amount cannot be negative")]
    NegativeAmount,
    #[error("Status '{0}' is not recognised")]
    UnrecognizedStatus(String),
    #[error("Unknown status filter '{0}'")]
    UnknownCategoryFilter(String),
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Order {0} not found")]
pub struct OrderNotFound(pub i64);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample_order() -> Order {
        Order::new(
            "T-1".to_string(),
            at(1, 9),
            "Maria Silva".to_string(),
            "(11) 98888-7777".to_string(),
            dec!(100),
            "approved".to_string(),
            None,
        )
    }

    #[test]
    fn test_entering_paid_stamps_paid_time_once() {
        let mut order = sample_order();
        order.apply_status("Payment Confirmed", Some(Category::Paid), at(2, 10), Duration::days(30));
        assert_eq!(order.paid_time, Some(at(2, 10)));

        order.apply_status("Payment Confirmed", Some(Category::Paid), at(3, 10), Duration::days(30));
        assert_eq!(order.paid_time, Some(at(2, 10)));
    }

    #[test]
    fn test_leaving_paid_clears_paid_time() {
        let mut order = sample_order();
        order.apply_status("paid", Some(Category::Paid), at(2, 10), Duration::days(30));
        order.apply_status("chargeback", Some(Category::Failed), at(4, 10), Duration::days(30));
        assert_eq!(order.paid_time, None);
        assert_eq!(order.raw_status, "chargeback");
    }

    #[test]
    fn test_entering_receivable_sets_due_time_once() {
        let mut order = sample_order();
        order.apply_status("delivered", Some(Category::Receivable), at(2, 10), Duration::days(30));
        let due = order.due_time.unwrap();
        assert_eq!(due, at(2, 10) + Duration::days(30));

        order.apply_status("delivered", Some(Category::Receivable), at(5, 10), Duration::days(30));
        assert_eq!(order.due_time, Some(due));
    }

    #[test]
    fn test_unclassified_status_keeps_raw_label() {
        let mut order = sample_order();
        order.apply_status("  Weird Unknown Label ", None, at(2, 10), Duration::days(30));
        assert_eq!(order.raw_status, "Weird Unknown Label");
        assert_eq!(order.paid_time, None);
    }

    #[test]
    fn test_matches_search_on_name_or_phone() {
        let order = sample_order();
        assert!(order.matches_search("maria"));
        assert!(order.matches_search("98888"));
        assert!(order.matches_search(""));
        assert!(!order.matches_search("joao"));
    }
}
