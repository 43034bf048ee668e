//! Domain model for the canonical order category.
use std::fmt;

/// One of the five business states an order can occupy.
///
/// The declaration order is the resolution order used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Scheduled,
    Paid,
    Receivable,
    Overdue,
    Failed,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Scheduled,
        Category::Paid,
        Category::Receivable,
        Category::Overdue,
        Category::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Scheduled => "scheduled",
            Category::Paid => "paid",
            Category::Receivable => "receivable",
            Category::Overdue => "overdue",
            Category::Failed => "failed",
        }
    }

    /// Parse a category name as used in listing filters (case-insensitive)
    pub fn from_name(name: &str) -> Option<Category> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
