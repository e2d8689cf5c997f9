pub mod file;
pub mod memory;

use crate::domain::entry::{BudgetEntry, Category};
use crate::domain::summary::CategoryTotal;
use chrono::{Datelike, Utc};
use std::collections::HashMap;

// Scan helpers shared by the two stores. Both keep entries in a Vec in
// insertion order, so creation order is positional and newest-first is
// a reverse scan.

pub(crate) fn page_for_user(
    entries: &[BudgetEntry],
    user_id: &str,
    category: Option<Category>,
    limit: usize,
    offset: usize,
) -> Vec<BudgetEntry> {
    entries
        .iter()
        .rev()
        .filter(|e| e.user_id == user_id)
        .filter(|e| category.is_none_or(|c| e.category == c))
        .skip(offset)
        .take(limit)
        .cloned()
        .collect()
}

pub(crate) fn totals_for_user(entries: &[BudgetEntry], user_id: &str) -> HashMap<Category, f64> {
    let mut totals = HashMap::new();
    for entry in entries.iter().filter(|e| e.user_id == user_id) {
        *totals.entry(entry.category).or_insert(0.0) += entry.amount;
    }
    totals
}

pub(crate) fn monthly_rollup(
    entries: &[BudgetEntry],
    user_id: &str,
    year: i32,
    month: u32,
) -> Vec<CategoryTotal> {
    let mut sums: HashMap<Category, (f64, u64)> = HashMap::new();
    for entry in entries.iter().filter(|e| {
        e.user_id == user_id && e.created_at.year() == year && e.created_at.month() == month
    }) {
        let slot = sums.entry(entry.category).or_insert((0.0, 0));
        slot.0 += entry.amount;
        slot.1 += 1;
    }

    Category::ALL
        .iter()
        .filter_map(|&category| {
            sums.get(&category).map(|&(total_amount, entry_count)| CategoryTotal {
                category,
                total_amount,
                entry_count,
            })
        })
        .collect()
}

pub(crate) fn update_owned_in(
    entries: &mut [BudgetEntry],
    id: &str,
    user_id: &str,
    item: String,
    amount: f64,
) -> Option<BudgetEntry> {
    let entry = entries
        .iter_mut()
        .find(|e| e.id == id && e.user_id == user_id)?;
    entry.item = item;
    entry.amount = amount;
    entry.updated_at = Utc::now();
    Some(entry.clone())
}

pub(crate) fn delete_owned_in(entries: &mut Vec<BudgetEntry>, id: &str, user_id: &str) -> bool {
    let before = entries.len();
    entries.retain(|e| !(e.id == id && e.user_id == user_id));
    entries.len() < before
}
