//! Low-stock and expiry alerts.

use chrono::NaiveDate;
use shared::{ExpiryAlert, ExpiryStatus, InventoryItem, StockLevel};

use crate::domain::analytics;
use crate::domain::state::RefillrState;

/// Whole days from `today` until the item expires; negative once expired
pub fn days_until_expiry(item: &InventoryItem, today: NaiveDate) -> i64 {
    (item.expiry_date - today).num_days()
}

pub fn expiry_status(item: &InventoryItem, today: NaiveDate) -> ExpiryStatus {
    ExpiryStatus::from_days_until_expiry(days_until_expiry(item, today))
}

/// Every item that is expired or expires within a week, soonest first
pub fn expiry_alerts(state: &RefillrState, today: NaiveDate) -> Vec<ExpiryAlert> {
    let mut alerts: Vec<ExpiryAlert> = state
        .items
        .iter()
        .filter_map(|item| match expiry_status(item, today) {
            ExpiryStatus::Fresh => None,
            status => Some(ExpiryAlert {
                item: item.clone(),
                days_until_expiry: days_until_expiry(item, today),
                status,
            }),
        })
        .collect();

    alerts.sort_by_key(|alert| alert.days_until_expiry);
    alerts
}

/// The item whose expiry date comes next, ignoring anything expiring today or earlier
pub fn next_expiring_item(state: &RefillrState, today: NaiveDate) -> Option<InventoryItem> {
    state
        .items
        .iter()
        .filter(|item| item.expiry_date > today)
        .min_by_key(|item| item.expiry_date)
        .cloned()
}

pub fn stock_level(item: &InventoryItem) -> StockLevel {
    let threshold = item.effective_refill_threshold();
    if item.quantity <= threshold {
        StockLevel::Low
    } else if item.quantity <= threshold * 2.0 {
        StockLevel::Warning
    } else {
        StockLevel::Healthy
    }
}

/// Items to notify about, honouring the refill notification setting
pub fn refill_notifications(state: &RefillrState) -> Vec<InventoryItem> {
    if !state.settings.notify_on_refill_needed {
        return Vec::new();
    }
    analytics::items_needing_refill(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::items::NewItem;
    use crate::domain::commands::settings::SettingsUpdate;
    use chrono::Duration;
    use shared::{Category, Unit};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 10).unwrap()
    }

    fn expiring_in(name: &str, days: i64) -> NewItem {
        NewItem {
            name: name.to_string(),
            category: Category::Vegetables,
            quantity: 10.0,
            unit: Unit::Grams,
            calories_per_unit: 1.0,
            purchase_date: today() - Duration::days(5),
            expiry_date: today() + Duration::days(days),
            auto_subtract_daily: false,
            daily_usage: None,
            notes: None,
            refill_threshold: None,
        }
    }

    #[test]
    fn test_expiry_alerts_sorted_and_fresh_excluded() {
        let mut state = RefillrState::new(today());
        state.add_item(expiring_in("Carrots", 30), "carrots".to_string());
        state.add_item(expiring_in("Spinach", 2), "spinach".to_string());
        state.add_item(expiring_in("Lettuce", -1), "lettuce".to_string());
        state.add_item(expiring_in("Peppers", 6), "peppers".to_string());

        let alerts = expiry_alerts(&state, today());
        let summary: Vec<(&str, i64, ExpiryStatus)> = alerts
            .iter()
            .map(|a| (a.item.id.as_str(), a.days_until_expiry, a.status))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("lettuce", -1, ExpiryStatus::Expired),
                ("spinach", 2, ExpiryStatus::Critical),
                ("peppers", 6, ExpiryStatus::Soon),
            ]
        );
    }

    #[test]
    fn test_expiry_status_band_edges() {
        let status = |days| {
            let item = expiring_in("Kale", days).into_item("kale".to_string());
            expiry_status(&item, today())
        };

        assert_eq!(status(-1), ExpiryStatus::Expired);
        assert_eq!(status(0), ExpiryStatus::Critical);
        assert_eq!(status(3), ExpiryStatus::Critical);
        assert_eq!(status(4), ExpiryStatus::Soon);
        assert_eq!(status(7), ExpiryStatus::Soon);
        assert_eq!(status(8), ExpiryStatus::Fresh);
    }

    #[test]
    fn test_next_expiring_item_skips_today_and_past() {
        let mut state = RefillrState::new(today());
        state.add_item(expiring_in("Lettuce", -2), "lettuce".to_string());
        state.add_item(expiring_in("Herbs", 0), "herbs".to_string());
        state.add_item(expiring_in("Peppers", 9), "peppers".to_string());
        state.add_item(expiring_in("Spinach", 4), "spinach".to_string());

        let next = next_expiring_item(&state, today()).unwrap();
        assert_eq!(next.id, "spinach");

        assert!(next_expiring_item(&RefillrState::new(today()), today()).is_none());
    }

    #[test]
    fn test_stock_level_bands() {
        let mut item = expiring_in("Carrots", 10).into_item("carrots".to_string());
        item.refill_threshold = Some(2.0);

        item.quantity = 2.0;
        assert_eq!(stock_level(&item), StockLevel::Low);
        item.quantity = 4.0;
        assert_eq!(stock_level(&item), StockLevel::Warning);
        item.quantity = 4.5;
        assert_eq!(stock_level(&item), StockLevel::Healthy);
    }

    #[test]
    fn test_refill_notifications_follow_setting() {
        let mut state = RefillrState::new(today());
        let mut low = expiring_in("Beans", 20);
        low.quantity = 1.0;
        state.add_item(low, "beans".to_string());

        assert_eq!(refill_notifications(&state).len(), 1);

        state.update_settings(SettingsUpdate {
            notify_on_refill_needed: Some(false),
            ..Default::default()
        });
        assert!(refill_notifications(&state).is_empty());
    }
}
