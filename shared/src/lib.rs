use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Refill threshold applied when an item does not carry its own.
pub const DEFAULT_REFILL_THRESHOLD: f64 = 5.0;

/// Grocery category an item is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Dairy,
    Grains,
    Protein,
    Vegetables,
    Fruits,
    Beverages,
    Snacks,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Dairy,
        Category::Grains,
        Category::Protein,
        Category::Vegetables,
        Category::Fruits,
        Category::Beverages,
        Category::Snacks,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dairy => "Dairy",
            Category::Grains => "Grains",
            Category::Protein => "Protein",
            Category::Vegetables => "Vegetables",
            Category::Fruits => "Fruits",
            Category::Beverages => "Beverages",
            Category::Snacks => "Snacks",
            Category::Other => "Other",
        }
    }

    /// Parse a category name, ignoring case
    pub fn from_string(s: &str) -> Result<Self, String> {
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid category: {}", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurement unit an item's quantity is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Grams,
    Pieces,
    Litres,
    Kg,
    Ml,
}

impl Unit {
    pub const ALL: [Unit; 5] = [Unit::Grams, Unit::Pieces, Unit::Litres, Unit::Kg, Unit::Ml];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Grams => "grams",
            Unit::Pieces => "pieces",
            Unit::Litres => "litres",
            Unit::Kg => "kg",
            Unit::Ml => "ml",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        Unit::ALL
            .iter()
            .copied()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid unit: {}", s))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked product in the pantry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Opaque identifier assigned when the item is added
    pub id: String,
    pub name: String,
    pub category: Category,
    /// Amount remaining, in `unit`
    pub quantity: f64,
    pub unit: Unit,
    pub calories_per_unit: f64,
    pub purchase_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub auto_subtract_daily: bool,
    /// Amount consumed per day by the daily rollover
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_usage: Option<f64>,
    /// Free-text log, one dated entry per line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refill_threshold: Option<f64>,
}

impl InventoryItem {
    /// The item's own threshold, or the default of 5 when none is set
    pub fn effective_refill_threshold(&self) -> f64 {
        self.refill_threshold.unwrap_or(DEFAULT_REFILL_THRESHOLD)
    }

    pub fn needs_refill(&self) -> bool {
        self.quantity <= self.effective_refill_threshold()
    }
}

/// A single consumption event. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub item_id: String,
    pub date: NaiveDate,
    pub quantity: f64,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub auto_subtract_daily: bool,
    pub notify_on_refill_needed: bool,
    pub budget_tracking: bool,
    pub notification_sound: bool,
    pub monthly_budget: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_subtract_daily: true,
            notify_on_refill_needed: true,
            budget_tracking: true,
            notification_sound: false,
            monthly_budget: 200.0,
        }
    }
}

/// Budgeting period labels plus the running spend. The period is not rolled automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetData {
    pub monthly_limit: f64,
    pub current_spent: f64,
    pub month: String,
    pub year: i32,
}

impl BudgetData {
    /// Fresh budget labelled with the month containing `date`
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            monthly_limit: 200.0,
            current_spent: 0.0,
            month: date.format("%B").to_string(),
            year: date.year(),
        }
    }
}

impl Default for BudgetData {
    fn default() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Calories consumed on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCalories {
    pub date: NaiveDate,
    pub calories: f64,
}

/// Total amount of an item consumed across the whole usage log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemConsumption {
    pub item: InventoryItem,
    pub total_used: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryStatus {
    /// Expiry date is in the past
    Expired,
    /// Expires today or within 3 days
    Critical,
    /// Expires within 4 to 7 days
    Soon,
    Fresh,
}

impl ExpiryStatus {
    pub fn from_days_until_expiry(days: i64) -> Self {
        match days {
            d if d < 0 => ExpiryStatus::Expired,
            0..=3 => ExpiryStatus::Critical,
            4..=7 => ExpiryStatus::Soon,
            _ => ExpiryStatus::Fresh,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryAlert {
    pub item: InventoryItem,
    pub days_until_expiry: i64,
    pub status: ExpiryStatus,
}

/// How close an item is to its refill threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockLevel {
    /// At or below the threshold
    Low,
    /// At or below twice the threshold
    Warning,
    Healthy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}
