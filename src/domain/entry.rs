use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three 50/30/20 buckets. Mutually exclusive; fixed for the
/// lifetime of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Needs,
    Wants,
    Savings,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Needs, Category::Wants, Category::Savings];

    pub fn parse(s: &str) -> Option<Category> {
        match s {
            "needs" => Some(Category::Needs),
            "wants" => Some(Category::Wants),
            "savings" => Some(Category::Savings),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Needs => "needs",
            Category::Wants => "wants",
            Category::Savings => "savings",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEntry {
    pub id: String,
    pub user_id: String,
    pub category: Category,
    pub item: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for both entry creation and entry update. Category travels in
/// the path on creation and is immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPayload {
    pub item: String,
    pub amount: f64,
}
