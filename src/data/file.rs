use crate::domain::entry::{BudgetEntry, Category};
use crate::domain::repository::{EntryStore, ProfileStore};
use crate::domain::summary::CategoryTotal;
use crate::domain::user::{ProfileUpdate, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

#[derive(Debug, Default, Serialize, Deserialize)]
struct FileState {
    users: Vec<User>,
    entries: Vec<BudgetEntry>,
}

/// JSON-file-backed store for the single-user prototype. Every mutation
/// rewrites the whole file; there is no cross-process coordination, so
/// this must only be used by a single server process.
pub struct JsonFileStore {
    path: PathBuf,
    state: Arc<Mutex<FileState>>,
}

impl JsonFileStore {
    /// Loads existing data from `path`, creating the file with an empty
    /// state when it does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read data file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse data file {}", path.display()))?
        } else {
            info!(path = %path.display(), "Data file not found, starting empty");
            FileState::default()
        };

        let store = Self {
            path,
            state: Arc::new(Mutex::new(state)),
        };
        if !store.path.exists() {
            let state = store.state.lock().await;
            store.persist(&state).await?;
        }
        Ok(store)
    }

    async fn persist(&self, state: &FileState) -> Result<()> {
        let raw = serde_json::to_vec_pretty(state).context("failed to serialize data file")?;
        tokio::fs::write(&self.path, raw)
            .await
            .with_context(|| format!("failed to write data file {}", self.path.display()))?;
        debug!(path = %self.path.display(), "Data file rewritten");
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for JsonFileStore {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create_user(&self, user: User) -> Result<()> {
        let mut state = self.state.lock().await;
        state.users.push(user);
        self.persist(&state).await
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    #[instrument(skip(self, update))]
    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<Option<User>> {
        let mut state = self.state.lock().await;
        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.total_income = update.total_income;
        user.needs_percentage = update.needs_percentage;
        user.wants_percentage = update.wants_percentage;
        user.savings_percentage = update.savings_percentage;
        user.updated_at = Utc::now();
        let updated = user.clone();
        self.persist(&state).await?;
        Ok(Some(updated))
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: &str, password_hash: String) -> Result<bool> {
        let mut state = self.state.lock().await;
        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.password_hash = password_hash;
        user.updated_at = Utc::now();
        self.persist(&state).await?;
        Ok(true)
    }
}

#[async_trait]
impl EntryStore for JsonFileStore {
    #[instrument(skip(self, entry), fields(entry_id = %entry.id, user_id = %entry.user_id))]
    async fn insert(&self, entry: BudgetEntry) -> Result<()> {
        let mut state = self.state.lock().await;
        state.entries.push(entry);
        self.persist(&state).await
    }

    #[instrument(skip(self))]
    async fn list_by_user(
        &self,
        user_id: &str,
        category: Option<Category>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<BudgetEntry>> {
        let state = self.state.lock().await;
        Ok(super::page_for_user(&state.entries, user_id, category, limit, offset))
    }

    #[instrument(skip(self))]
    async fn find_owned(&self, id: &str, user_id: &str) -> Result<Option<BudgetEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .entries
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
        let mut state = self.state.lock().await;
        let updated = super::update_owned_in(&mut state.entries, id, user_id, item, amount);
        if updated.is_some() {
            self.persist(&state).await?;
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_owned(&self, id: &str, user_id: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        let removed = super::delete_owned_in(&mut state.entries, id, user_id);
        if removed {
            self.persist(&state).await?;
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn delete_all_by_user(&self, user_id: &str) -> Result<u64> {
        let mut state = self.state.lock().await;
        let before = state.entries.len();
        state.entries.retain(|e| e.user_id != user_id);
        let removed = (before - state.entries.len()) as u64;
        if removed > 0 {
            self.persist(&state).await?;
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn totals_by_category(
        &self,
        user_id: &str,
    ) -> Result<std::collections::HashMap<Category, f64>> {
        let state = self.state.lock().await;
        Ok(super::totals_for_user(&state.entries, user_id))
    }

    #[instrument(skip(self))]
    async fn monthly_totals(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<CategoryTotal>> {
        let state = self.state.lock().await;
        Ok(super::monthly_rollup(&state.entries, user_id, year, month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct TempFile(PathBuf);

    impl TempFile {
        fn new() -> Self {
            TempFile(std::env::temp_dir().join(format!("budget-test-{}.json", Uuid::new_v4())))
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn user(id: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: id.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            total_income: 18000.0,
            needs_percentage: 50,
            wants_percentage: 30,
            savings_percentage: 20,
            created_at: now,
            updated_at: now,
        }
    }

    fn entry(id: &str, user_id: &str, category: Category, amount: f64) -> BudgetEntry {
        let now = Utc::now();
        BudgetEntry {
            id: id.to_string(),
            user_id: user_id.to_string(),
            category,
            item: "groceries".to_string(),
            amount,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn open_creates_empty_data_file() {
        let tmp = TempFile::new();
        let _store = JsonFileStore::open(&tmp.0).await.unwrap();
        assert!(tmp.0.exists());

        let raw = std::fs::read_to_string(&tmp.0).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(parsed["users"].as_array().unwrap().is_empty());
        assert!(parsed["entries"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn state_survives_reopen() {
        let tmp = TempFile::new();
        {
            let store = JsonFileStore::open(&tmp.0).await.unwrap();
            store.create_user(user("u1", "a@example.com")).await.unwrap();
            store.insert(entry("e1", "u1", Category::Needs, 120.0)).await.unwrap();
            store.insert(entry("e2", "u1", Category::Savings, 30.0)).await.unwrap();
        }

        let reopened = JsonFileStore::open(&tmp.0).await.unwrap();
        let u = reopened.find_by_id("u1").await.unwrap().unwrap();
        assert_eq!(u.email, "a@example.com");

        let entries = reopened.list_by_user("u1", None, 50, 0).await.unwrap();
        assert_eq!(entries.len(), 2);
        // Newest-first.
        assert_eq!(entries[0].id, "e2");

        let totals = reopened.totals_by_category("u1").await.unwrap();
        assert_eq!(totals[&Category::Needs], 120.0);
        assert_eq!(totals[&Category::Savings], 30.0);
    }

    #[tokio::test]
    async fn deletes_are_persisted() {
        let tmp = TempFile::new();
        {
            let store = JsonFileStore::open(&tmp.0).await.unwrap();
            store.create_user(user("u1", "a@example.com")).await.unwrap();
            store.insert(entry("e1", "u1", Category::Wants, 10.0)).await.unwrap();
            store.insert(entry("e2", "u1", Category::Wants, 20.0)).await.unwrap();
            assert!(store.delete_owned("e1", "u1").await.unwrap());
        }

        let reopened = JsonFileStore::open(&tmp.0).await.unwrap();
        assert!(reopened.find_owned("e1", "u1").await.unwrap().is_none());
        assert_eq!(reopened.delete_all_by_user("u1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn ownership_scoping_applies() {
        let tmp = TempFile::new();
        let store = JsonFileStore::open(&tmp.0).await.unwrap();
        store.insert(entry("e1", "owner", Category::Needs, 5.0)).await.unwrap();

        assert!(store.find_owned("e1", "other").await.unwrap().is_none());
        assert!(!store.delete_owned("e1", "other").await.unwrap());
        assert!(
            store
                .update_owned("e1", "other", "x".to_string(), 1.0)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn open_rejects_corrupt_file() {
        let tmp = TempFile::new();
        std::fs::write(&tmp.0, "not json at all").unwrap();
        assert!(JsonFileStore::open(&tmp.0).await.is_err());
    }
}
