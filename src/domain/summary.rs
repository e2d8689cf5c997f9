use crate::domain::entry::Category;
use crate::domain::user::User;
use serde::Serialize;
use std::collections::HashMap;

/// Derived budget state for one user. Never persisted; recomputed from
/// the profile and the current entry totals on every read so it is
/// always consistent with the latest mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_income: f64,
    pub percentages: Percentages,
    pub categories: CategoryBreakdowns,
}

#[derive(Debug, Clone, Serialize)]
pub struct Percentages {
    pub needs: u8,
    pub wants: u8,
    pub savings: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdowns {
    pub needs: CategoryBreakdown,
    pub wants: CategoryBreakdown,
    pub savings: CategoryBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    /// income * percentage / 100, the target ceiling for the category.
    pub allowance: f64,
    /// Sum of entry amounts recorded in the category.
    pub actual: f64,
}

/// One row of a monthly report; categories with no entries in the month
/// are omitted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: Category,
    pub total_amount: f64,
    pub entry_count: u64,
}

impl BudgetSummary {
    pub fn compute(user: &User, totals: &HashMap<Category, f64>) -> BudgetSummary {
        let allowance = |pct: u8| user.total_income * f64::from(pct) / 100.0;
        let actual = |c: Category| totals.get(&c).copied().unwrap_or(0.0);

        BudgetSummary {
            total_income: user.total_income,
            percentages: Percentages {
                needs: user.needs_percentage,
                wants: user.wants_percentage,
                savings: user.savings_percentage,
            },
            categories: CategoryBreakdowns {
                needs: CategoryBreakdown {
                    allowance: allowance(user.needs_percentage),
                    actual: actual(Category::Needs),
                },
                wants: CategoryBreakdown {
                    allowance: allowance(user.wants_percentage),
                    actual: actual(Category::Wants),
                },
                savings: CategoryBreakdown {
                    allowance: allowance(user.savings_percentage),
                    actual: actual(Category::Savings),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with(income: f64, needs: u8, wants: u8, savings: u8) -> User {
        let now = Utc::now();
        User {
            id: "u-1".to_string(),
            email: "t@example.com".to_string(),
            password_hash: "h".to_string(),
            first_name: "T".to_string(),
            last_name: "U".to_string(),
            total_income: income,
            needs_percentage: needs,
            wants_percentage: wants,
            savings_percentage: savings,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn allowances_follow_income_split() {
        let user = user_with(50000.0, 50, 30, 20);
        let summary = BudgetSummary::compute(&user, &HashMap::new());

        assert_eq!(summary.categories.needs.allowance, 25000.0);
        assert_eq!(summary.categories.wants.allowance, 15000.0);
        assert_eq!(summary.categories.savings.allowance, 10000.0);
        assert_eq!(summary.total_income, 50000.0);
    }

    #[test]
    fn actuals_default_to_zero_without_entries() {
        let user = user_with(18000.0, 50, 30, 20);
        let summary = BudgetSummary::compute(&user, &HashMap::new());

        assert_eq!(summary.categories.needs.actual, 0.0);
        assert_eq!(summary.categories.wants.actual, 0.0);
        assert_eq!(summary.categories.savings.actual, 0.0);
    }

    #[test]
    fn actuals_come_from_category_totals() {
        let user = user_with(50000.0, 50, 30, 20);
        let mut totals = HashMap::new();
        totals.insert(Category::Needs, 15000.0);
        totals.insert(Category::Savings, 2500.5);

        let summary = BudgetSummary::compute(&user, &totals);

        assert_eq!(summary.categories.needs.actual, 15000.0);
        assert_eq!(summary.categories.wants.actual, 0.0);
        assert_eq!(summary.categories.savings.actual, 2500.5);
    }

    #[test]
    fn zero_income_gives_zero_allowances() {
        let user = user_with(0.0, 50, 30, 20);
        let summary = BudgetSummary::compute(&user, &HashMap::new());

        assert_eq!(summary.categories.needs.allowance, 0.0);
        assert_eq!(summary.categories.wants.allowance, 0.0);
        assert_eq!(summary.categories.savings.allowance, 0.0);
    }

    #[test]
    fn summary_serializes_camel_case() {
        let user = user_with(1000.0, 50, 30, 20);
        let json = serde_json::to_value(BudgetSummary::compute(&user, &HashMap::new())).unwrap();

        assert_eq!(json["totalIncome"], 1000.0);
        assert_eq!(json["percentages"]["needs"], 50);
        assert_eq!(json["categories"]["savings"]["allowance"], 200.0);
    }
}
