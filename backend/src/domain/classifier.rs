//! Status classification.
//!
//! Maps free-text status labels coming from the payment provider (or typed
//! by an administrator) onto the canonical [`Category`] set. All matching is
//! driven by a single declarative [`RuleTable`]; nothing else in the crate
//! inspects raw status strings.
//!
//! Classification happens in two steps:
//!
//! 1. **Label resolution**: the trimmed, lower-cased label is compared with
//!    every category's exact matches (in table order), then with every
//!    category's prefixes (in table order). First hit wins; no hit means the
//!    order is unclassified.
//! 2. **Temporal override**: a Receivable order whose due date lies before
//!    `now` is reported as Overdue. This is evaluated on every read and never
//!    written back.

use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::debug;

use crate::domain::models::category::Category;

/// Matching rules owned by one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRules {
    pub category: Category,
    pub exact: Vec<String>,
    pub prefixes: Vec<String>,
}

/// Ordered rule table; order of `rules` is the resolution order
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: Vec<CategoryRules>,
}

const CANONICAL_RULES: &[(Category, &[&str], &[&str])] = &[
    (
        Category::Scheduled,
        &["scheduled", "awaiting payment"],
        &["scheduled", "awaiting payment"],
    ),
    (
        Category::Paid,
        &["paid", "manual paid", "payment confirmed", "payment approved"],
        &["payment approved", "payment confirmed", "paid ", "paid-"],
    ),
    (Category::Receivable, &["to receive"], &["to receive"]),
    (Category::Overdue, &["overdue"], &["overdue"]),
    (
        Category::Failed,
        &["failed", "cancelled", "chargeback", "declined", "expired"],
        &["failed", "cancelled", "chargeback", "declined", "expired"],
    ),
];

/// Lifecycle labels sent by the payment provider webhook
const PROVIDER_EXACT: &[(Category, &str)] = &[
    (Category::Scheduled, "approved"),
    (Category::Receivable, "delivered"),
    (Category::Failed, "refunded"),
    (Category::Failed, "refused"),
];

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

impl RuleTable {
    /// A table with one empty rule set per category, in resolution order
    pub fn empty() -> Self {
        Self {
            rules: Category::ALL
                .into_iter()
                .map(|category| CategoryRules {
                    category,
                    exact: Vec::new(),
                    prefixes: Vec::new(),
                })
                .collect(),
        }
    }

    /// Canonical vocabulary only, without provider aliases
    pub fn canonical() -> Self {
        CANONICAL_RULES
            .iter()
            .fold(Self::empty(), |table, (category, exact, prefixes)| {
                let table = exact
                    .iter()
                    .fold(table, |t, label| t.with_exact(*category, label));
                prefixes
                    .iter()
                    .fold(table, |t, prefix| t.with_prefix(*category, prefix))
            })
    }

    pub fn with_exact(mut self, category: Category, label: &str) -> Self {
        let label = normalize(label);
        if let Some(rules) = self.rules_mut(category) {
            if !rules.exact.contains(&label) {
                rules.exact.push(label);
            }
        }
        self
    }

    /// Prefixes are lower-cased but not trimmed, so `"paid "` keeps its
    /// trailing space
    pub fn with_prefix(mut self, category: Category, prefix: &str) -> Self {
        let prefix = prefix.to_lowercase();
        if let Some(rules) = self.rules_mut(category) {
            if !rules.prefixes.contains(&prefix) {
                rules.prefixes.push(prefix);
            }
        }
        self
    }

    pub fn rules(&self) -> &[CategoryRules] {
        &self.rules
    }

    fn rules_mut(&mut self, category: Category) -> Option<&mut CategoryRules> {
        self.rules.iter_mut().find(|r| r.category == category)
    }

    /// Resolve a raw label to its category, ignoring due dates
    pub fn resolve(&self, raw_status: &str) -> Option<Category> {
        let label = normalize(raw_status);
        if label.is_empty() {
            return None;
        }

        self.rules
            .iter()
            .find(|r| r.exact.iter().any(|e| *e == label))
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|r| r.prefixes.iter().any(|p| label.starts_with(p.as_str())))
            })
            .map(|r| r.category)
    }
}

impl Default for RuleTable {
    /// Canonical vocabulary plus the provider's lifecycle labels
    fn default() -> Self {
        PROVIDER_EXACT
            .iter()
            .fold(Self::canonical(), |table, (category, label)| {
                table.with_exact(*category, label)
            })
    }
}

/// Pure classifier shared by ingestion, admin actions, listings and
/// aggregation
#[derive(Debug, Clone)]
pub struct StatusClassifier {
    rules: Arc<RuleTable>,
}

impl StatusClassifier {
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    /// Category of the label alone, before the overdue override
    pub fn classify_label(&self, raw_status: &str) -> Option<Category> {
        self.rules.resolve(raw_status)
    }

    /// Effective category at `now`
    pub fn classify(
        &self,
        raw_status: &str,
        due_time: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Option<Category> {
        let category = self.classify_label(raw_status);
        match (category, due_time) {
            (Some(Category::Receivable), Some(due)) if due < now => {
                debug!("'{}' is past due since {}, reporting as overdue", raw_status, due);
                Some(Category::Overdue)
            }
            _ => category,
        }
    }
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new(RuleTable::default())
    }
}
