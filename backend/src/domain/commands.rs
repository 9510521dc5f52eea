//! Domain-level command types.
//!
//! These are the payloads the UI collaborator hands to the store. Update
//! commands carry only the fields to change; everything left as `None` keeps
//! its current value (shallow merge).

pub mod items {
    use chrono::NaiveDate;
    use shared::{Category, InventoryItem, Unit};

    /// Input for adding an item. The store assigns the id.
    #[derive(Debug, Clone, PartialEq)]
    pub struct NewItem {
        pub name: String,
        pub category: Category,
        pub quantity: f64,
        pub unit: Unit,
        pub calories_per_unit: f64,
        pub purchase_date: NaiveDate,
        pub expiry_date: NaiveDate,
        pub auto_subtract_daily: bool,
        pub daily_usage: Option<f64>,
        pub notes: Option<String>,
        pub refill_threshold: Option<f64>,
    }

    impl NewItem {
        pub fn into_item(self, id: String) -> InventoryItem {
            InventoryItem {
                id,
                name: self.name,
                category: self.category,
                quantity: self.quantity,
                unit: self.unit,
                calories_per_unit: self.calories_per_unit,
                purchase_date: self.purchase_date,
                expiry_date: self.expiry_date,
                auto_subtract_daily: self.auto_subtract_daily,
                daily_usage: self.daily_usage,
                notes: self.notes,
                refill_threshold: self.refill_threshold,
            }
        }
    }

    /// Partial item update. Optional item fields use a nested option so
    /// `Some(None)` clears the value.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ItemUpdate {
        pub name: Option<String>,
        pub category: Option<Category>,
        pub quantity: Option<f64>,
        pub unit: Option<Unit>,
        pub calories_per_unit: Option<f64>,
        pub purchase_date: Option<NaiveDate>,
        pub expiry_date: Option<NaiveDate>,
        pub auto_subtract_daily: Option<bool>,
        pub daily_usage: Option<Option<f64>>,
        pub notes: Option<Option<String>>,
        pub refill_threshold: Option<Option<f64>>,
    }

    impl ItemUpdate {
        pub fn apply_to(self, item: &mut InventoryItem) {
            if let Some(name) = self.name {
                item.name = name;
            }
            if let Some(category) = self.category {
                item.category = category;
            }
            if let Some(quantity) = self.quantity {
                item.quantity = quantity;
            }
            if let Some(unit) = self.unit {
                item.unit = unit;
            }
            if let Some(calories_per_unit) = self.calories_per_unit {
                item.calories_per_unit = calories_per_unit;
            }
            if let Some(purchase_date) = self.purchase_date {
                item.purchase_date = purchase_date;
            }
            if let Some(expiry_date) = self.expiry_date {
                item.expiry_date = expiry_date;
            }
            if let Some(auto_subtract_daily) = self.auto_subtract_daily {
                item.auto_subtract_daily = auto_subtract_daily;
            }
            if let Some(daily_usage) = self.daily_usage {
                item.daily_usage = daily_usage;
            }
            if let Some(notes) = self.notes {
                item.notes = notes;
            }
            if let Some(refill_threshold) = self.refill_threshold {
                item.refill_threshold = refill_threshold;
            }
        }
    }
}

pub mod settings {
    use shared::{BudgetData, Settings};

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct SettingsUpdate {
        pub auto_subtract_daily: Option<bool>,
        pub notify_on_refill_needed: Option<bool>,
        pub budget_tracking: Option<bool>,
        pub notification_sound: Option<bool>,
        pub monthly_budget: Option<f64>,
    }

    impl SettingsUpdate {
        pub fn apply_to(self, settings: &mut Settings) {
            if let Some(value) = self.auto_subtract_daily {
                settings.auto_subtract_daily = value;
            }
            if let Some(value) = self.notify_on_refill_needed {
                settings.notify_on_refill_needed = value;
            }
            if let Some(value) = self.budget_tracking {
                settings.budget_tracking = value;
            }
            if let Some(value) = self.notification_sound {
                settings.notification_sound = value;
            }
            if let Some(value) = self.monthly_budget {
                settings.monthly_budget = value;
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct BudgetUpdate {
        pub monthly_limit: Option<f64>,
        pub current_spent: Option<f64>,
        pub month: Option<String>,
        pub year: Option<i32>,
    }

    impl BudgetUpdate {
        pub fn apply_to(self, budget: &mut BudgetData) {
            if let Some(value) = self.monthly_limit {
                budget.monthly_limit = value;
            }
            if let Some(value) = self.current_spent {
                budget.current_spent = value;
            }
            if let Some(value) = self.month {
                budget.month = value;
            }
            if let Some(value) = self.year {
                budget.year = value;
            }
        }
    }
}
