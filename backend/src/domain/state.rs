//! The in-memory inventory state and its transitions.
//!
//! Every mutation the store offers is a method here that takes the current
//! date explicitly, so transitions stay deterministic and the store handle
//! only adds clock reading and persistence around them.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use shared::{BudgetData, InventoryItem, Settings, Theme, UsageRecord};

use crate::domain::commands::items::{ItemUpdate, NewItem};
use crate::domain::commands::settings::{BudgetUpdate, SettingsUpdate};

/// Everything the store owns. This is also the shape written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefillrState {
    #[serde(default)]
    pub items: Vec<InventoryItem>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub budget: BudgetData,
    #[serde(default)]
    pub usage_records: Vec<UsageRecord>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub streak: u32,
    /// Date of the last applied daily rollover
    #[serde(default, with = "optional_date")]
    pub last_auto_subtract_date: Option<NaiveDate>,
}

impl RefillrState {
    /// Empty state with the budget period labelled for `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            items: Vec::new(),
            settings: Settings::default(),
            budget: BudgetData::for_date(today),
            usage_records: Vec::new(),
            theme: Theme::default(),
            streak: 0,
            last_auto_subtract_date: None,
        }
    }

    pub fn find_item(&self, id: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn find_item_mut(&mut self, id: &str) -> Option<&mut InventoryItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn add_item(&mut self, new_item: NewItem, id: String) -> InventoryItem {
        let item = new_item.into_item(id);
        self.items.push(item.clone());
        item
    }

    /// Merge `update` into the item. Values are not validated.
    pub fn update_item(&mut self, id: &str, update: ItemUpdate) -> bool {
        match self.find_item_mut(id) {
            Some(item) => {
                update.apply_to(item);
                true
            }
            None => false,
        }
    }

    /// Remove the item. Its usage records are kept.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Add `amount` to the quantity without clamping
    pub fn refill_item(&mut self, id: &str, amount: f64) -> bool {
        match self.find_item_mut(id) {
            Some(item) => {
                item.quantity += amount;
                true
            }
            None => false,
        }
    }

    /// Decrement the quantity, floored at zero, and log the consumption.
    ///
    /// Calories are charged on the requested `amount`, even when less than
    /// that was actually left.
    pub fn subtract_quantity(
        &mut self,
        id: &str,
        amount: f64,
        today: NaiveDate,
    ) -> Option<UsageRecord> {
        let item = self.find_item_mut(id)?;
        item.quantity = (item.quantity - amount).max(0.0);

        let record = UsageRecord {
            item_id: item.id.clone(),
            date: today,
            quantity: amount,
            calories: amount * item.calories_per_unit,
        };
        debug!(
            "Recorded usage of {} {} of '{}' ({} kcal)",
            amount, item.unit, item.name, record.calories
        );

        self.usage_records.push(record.clone());
        Some(record)
    }

    pub fn add_usage_record(&mut self, record: UsageRecord) {
        self.usage_records.push(record);
    }

    /// Append a dated entry to the item's notes. Blank text is ignored.
    pub fn append_item_note(&mut self, id: &str, text: &str, today: NaiveDate) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        let Some(item) = self.find_item_mut(id) else {
            return false;
        };

        let entry = format!("{}: {}", today.format("%Y-%m-%d"), text);
        item.notes = Some(match item.notes.take() {
            Some(existing) if !existing.is_empty() => format!("{}\n{}", existing, entry),
            _ => entry,
        });
        true
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) {
        update.apply_to(&mut self.settings);
    }

    pub fn update_budget(&mut self, update: BudgetUpdate) {
        update.apply_to(&mut self.budget);
    }

    pub fn add_expense(&mut self, amount: f64) {
        self.budget.current_spent += amount;
    }

    /// Keep the settings figure and the budget limit in step
    pub fn set_monthly_budget(&mut self, amount: f64) {
        self.settings.monthly_budget = amount;
        self.budget.monthly_limit = amount;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}

/// Persists `Option<NaiveDate>` as `"YYYY-MM-DD"` or an empty string.
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
