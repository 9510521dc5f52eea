//! Derived analytics over the inventory state.
//!
//! All functions here are pure: they read the state and the supplied date and
//! compute their answer on demand. Nothing is cached.

use chrono::{Duration, NaiveDate};
use shared::{CategoryCount, DailyCalories, InventoryItem, ItemConsumption};

use crate::domain::state::RefillrState;

/// Days covered by the weekly calorie report, today included
pub const WEEKLY_REPORT_DAYS: i64 = 7;

/// Entries returned by [`top_consumed_items`]
pub const TOP_CONSUMED_LIMIT: usize = 5;

pub fn calories_on(state: &RefillrState, date: NaiveDate) -> f64 {
    state
        .usage_records
        .iter()
        .filter(|record| record.date == date)
        .map(|record| record.calories)
        .sum()
}

pub fn todays_calories(state: &RefillrState, today: NaiveDate) -> f64 {
    calories_on(state, today)
}

pub fn items_needing_refill(state: &RefillrState) -> Vec<InventoryItem> {
    state
        .items
        .iter()
        .filter(|item| item.needs_refill())
        .cloned()
        .collect()
}

/// Calories per day for the week ending today, oldest first.
///
/// Usage of items that have since been removed still counts.
pub fn weekly_calorie_report(state: &RefillrState, today: NaiveDate) -> Vec<DailyCalories> {
    (0..WEEKLY_REPORT_DAYS)
        .rev()
        .map(|days_back| {
            let date = today - Duration::days(days_back);
            DailyCalories {
                date,
                calories: calories_on(state, date),
            }
        })
        .collect()
}

/// Items ranked by total quantity consumed across the whole usage log.
///
/// Records whose item no longer exists are dropped. Ties keep the order in
/// which the item first appears in the log.
pub fn top_consumed_items(state: &RefillrState) -> Vec<ItemConsumption> {
    let mut totals: Vec<(&str, f64)> = Vec::new();
    for record in &state.usage_records {
        match totals.iter_mut().find(|(id, _)| *id == record.item_id) {
            Some((_, total)) => *total += record.quantity,
            None => totals.push((record.item_id.as_str(), record.quantity)),
        }
    }

    let mut ranked: Vec<ItemConsumption> = totals
        .into_iter()
        .filter_map(|(id, total_used)| {
            state.find_item(id).map(|item| ItemConsumption {
                item: item.clone(),
                total_used,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.total_used.total_cmp(&a.total_used));
    ranked.truncate(TOP_CONSUMED_LIMIT);
    ranked
}

/// Number of items per category, in order of first appearance
pub fn category_breakdown(state: &RefillrState) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for item in &state.items {
        match counts.iter_mut().find(|entry| entry.category == item.category) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                category: item.category,
                count: 1,
            }),
        }
    }
    counts
}

/// Items the daily rollover is configured to draw down
pub fn daily_items(state: &RefillrState) -> Vec<InventoryItem> {
    state
        .items
        .iter()
        .filter(|item| item.auto_subtract_daily)
        .cloned()
        .collect()
}

/// Share of the monthly limit already spent, as a percentage
pub fn budget_usage_percent(state: &RefillrState) -> f64 {
    let budget = &state.budget;
    if budget.monthly_limit == 0.0 {
        return 0.0;
    }
    budget.current_spent / budget.monthly_limit * 100.0
}
