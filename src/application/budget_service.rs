use crate::domain::entry::{BudgetEntry, Category, EntryPayload};
use crate::domain::error::DomainError;
use crate::domain::repository::{EntryStore, ProfileStore};
use crate::domain::summary::{BudgetSummary, CategoryTotal};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const DEFAULT_PAGE_LIMIT: usize = 50;

/// Entry CRUD plus on-demand budget aggregation. Every mutating
/// operation returns a fresh summary alongside its result so clients
/// never need a second round trip; summaries are never cached.
pub struct BudgetService {
    profiles: Arc<dyn ProfileStore>,
    entries: Arc<dyn EntryStore>,
}

impl BudgetService {
    pub fn new(profiles: Arc<dyn ProfileStore>, entries: Arc<dyn EntryStore>) -> Self {
        Self { profiles, entries }
    }

    #[instrument(skip(self))]
    pub async fn summary(&self, user_id: &str) -> Result<BudgetSummary> {
        let user = self
            .profiles
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;
        let totals = self.entries.totals_by_category(user_id).await?;
        Ok(BudgetSummary::compute(&user, &totals))
    }

    #[instrument(skip(self, payload), fields(category = %category))]
    pub async fn add_entry(
        &self,
        user_id: &str,
        category: Category,
        payload: EntryPayload,
    ) -> Result<(BudgetEntry, BudgetSummary)> {
        check_amount(payload.amount)?;

        let now = Utc::now();
        let entry = BudgetEntry {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            category,
            item: payload.item.trim().to_string(),
            amount: payload.amount,
            created_at: now,
            updated_at: now,
        };

        self.entries.insert(entry.clone()).await?;
        let summary = self.summary(user_id).await?;

        info!(entry_id = %entry.id, amount = entry.amount, "Entry added");
        Ok((entry, summary))
    }

    #[instrument(skip(self))]
    pub async fn list_entries(
        &self,
        user_id: &str,
        category: Option<Category>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<BudgetEntry>> {
        self.entries
            .list_by_user(
                user_id,
                category,
                limit.unwrap_or(DEFAULT_PAGE_LIMIT),
                offset.unwrap_or(0),
            )
            .await
    }

    #[instrument(skip(self, payload))]
    pub async fn update_entry(
        &self,
        id: &str,
        user_id: &str,
        payload: EntryPayload,
    ) -> Result<(BudgetEntry, BudgetSummary)> {
        check_amount(payload.amount)?;

        let entry = self
            .entries
            .update_owned(id, user_id, payload.item.trim().to_string(), payload.amount)
            .await?
            .ok_or_else(|| {
                warn!(entry_id = id, "Update for absent or foreign entry");
                DomainError::NotFound("Entry not found".to_string())
            })?;

        let summary = self.summary(user_id).await?;
        info!(entry_id = %entry.id, "Entry updated");
        Ok((entry, summary))
    }

    #[instrument(skip(self))]
    pub async fn delete_entry(&self, id: &str, user_id: &str) -> Result<BudgetSummary> {
        let removed = self.entries.delete_owned(id, user_id).await?;
        if !removed {
            warn!(entry_id = id, "Delete for absent or foreign entry");
            return Err(DomainError::NotFound("Entry not found".to_string()).into());
        }

        let summary = self.summary(user_id).await?;
        info!(entry_id = id, "Entry deleted");
        Ok(summary)
    }

    #[instrument(skip(self))]
    pub async fn monthly_totals(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<CategoryTotal>> {
        if !(1..=12).contains(&month) {
            return Err(
                DomainError::Validation(format!("Month must be between 1 and 12, got {month}"))
                    .into(),
            );
        }
        self.entries.monthly_totals(user_id, year, month).await
    }

    /// Deletes every entry for the user and reports how many were
    /// removed, plus the (now empty) summary.
    #[instrument(skip(self))]
    pub async fn reset(&self, user_id: &str) -> Result<(u64, BudgetSummary)> {
        let removed = self.entries.delete_all_by_user(user_id).await?;
        let summary = self.summary(user_id).await?;
        info!(removed, "Budget reset");
        Ok((removed, summary))
    }
}

fn check_amount(amount: f64) -> Result<(), DomainError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DomainError::Validation(
            "Amount must be a positive number".to_string(),
        ));
    }
    Ok(())
}
