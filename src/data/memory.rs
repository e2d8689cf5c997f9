use crate::domain::entry::{BudgetEntry, Category};
use crate::domain::repository::{EntryStore, ProfileStore};
use crate::domain::summary::CategoryTotal;
use crate::domain::user::{ProfileUpdate, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

/// In-memory store backing both capabilities. Used by the test suites
/// and the default demo configuration.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    entries: Arc<RwLock<Vec<BudgetEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    #[instrument(skip(self, user), fields(user_id = %user.id, email = %user.email))]
    async fn create_user(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user);
        debug!("User saved to memory store");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    #[instrument(skip(self, update))]
    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(id) else {
            trace!("Profile update for unknown user");
            return Ok(None);
        };
        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.total_income = update.total_income;
        user.needs_percentage = update.needs_percentage;
        user.wants_percentage = update.wants_percentage;
        user.savings_percentage = update.savings_percentage;
        user.updated_at = Utc::now();
        debug!("Profile updated");
        Ok(Some(user.clone()))
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: &str, password_hash: String) -> Result<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(id) else {
            return Ok(false);
        };
        user.password_hash = password_hash;
        user.updated_at = Utc::now();
        debug!("Password hash replaced");
        Ok(true)
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    #[instrument(skip(self, entry), fields(entry_id = %entry.id, user_id = %entry.user_id))]
    async fn insert(&self, entry: BudgetEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.push(entry);
        debug!("Entry saved to memory store");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_user(
        &self,
        user_id: &str,
        category: Option<Category>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<BudgetEntry>> {
        let entries = self.entries.read().await;
        Ok(super::page_for_user(&entries, user_id, category, limit, offset))
    }

    #[instrument(skip(self))]
    async fn find_owned(&self, id: &str, user_id: &str) -> Result<Option<BudgetEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|e| e.id == id && e.user_id == user_id)
            .cloned())
    }

    #[instrument(skip(self, item))]
    async fn update_owned(
        &self,
        id: &str,
        user_id: &str,
        item: String,
        amount: f64,
    ) -> Result<Option<BudgetEntry>> {
        let mut entries = self.entries.write().await;
        Ok(super::update_owned_in(&mut entries, id, user_id, item, amount))
    }

    #[instrument(skip(self))]
    async fn delete_owned(&self, id: &str, user_id: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        Ok(super::delete_owned_in(&mut entries, id, user_id))
    }

    #[instrument(skip(self))]
    async fn delete_all_by_user(&self, user_id: &str) -> Result<u64> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.user_id != user_id);
        let removed = (before - entries.len()) as u64;
        debug!(removed, "Entries cleared for user");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn totals_by_category(&self, user_id: &str) -> Result<HashMap<Category, f64>> {
        let entries = self.entries.read().await;
        Ok(super::totals_for_user(&entries, user_id))
    }

    #[instrument(skip(self))]
    async fn monthly_totals(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<CategoryTotal>> {
        let entries = self.entries.read().await;
        Ok(super::monthly_rollup(&entries, user_id, year, month))
    }
}
