use crate::domain::entry::{BudgetEntry, Category};
use crate::domain::summary::CategoryTotal;
use crate::domain::user::{ProfileUpdate, User};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Storage capability for user identity and budget-split settings.
/// Emails are expected to arrive already normalized (lowercase, trimmed).
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn create_user(&self, user: User) -> Result<()>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    /// Overwrites all five mutable profile fields; returns the updated
    /// user, or `None` if the id is unknown.
    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<Option<User>>;
    /// Returns false if the id is unknown.
    async fn update_password(&self, id: &str, password_hash: String) -> Result<bool>;
}

/// Storage capability for category-tagged spending records. Every
/// per-entry operation is scoped by owner: an entry belonging to a
/// different user behaves as if it did not exist.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn insert(&self, entry: BudgetEntry) -> Result<()>;
    /// Newest-first, optionally filtered by category, paged by
    /// limit/offset.
    async fn list_by_user(
        &self,
        user_id: &str,
        category: Option<Category>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<BudgetEntry>>;
    async fn find_owned(&self, id: &str, user_id: &str) -> Result<Option<BudgetEntry>>;
    /// Rewrites item and amount and bumps `updated_at`; category and
    /// owner are immutable. `None` when the entry is absent or not owned.
    async fn update_owned(
        &self,
        id: &str,
        user_id: &str,
        item: String,
        amount: f64,
    ) -> Result<Option<BudgetEntry>>;
    async fn delete_owned(&self, id: &str, user_id: &str) -> Result<bool>;
    /// Returns the number of entries removed.
    async fn delete_all_by_user(&self, user_id: &str) -> Result<u64>;
    async fn totals_by_category(&self, user_id: &str) -> Result<HashMap<Category, f64>>;
    /// Sums restricted to entries created within the given calendar
    /// month (UTC); edits never move an entry between months.
    async fn monthly_totals(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<CategoryTotal>>;
}
