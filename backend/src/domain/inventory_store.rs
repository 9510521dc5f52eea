//! The inventory store handle.
//!
//! Owns the [`RefillrState`], a [`Clock`] and a [`StateStorage`]. Every
//! mutation runs the matching state transition and then snapshots the new
//! state through storage. A failed snapshot is logged and never undoes or
//! fails the mutation.

use chrono::NaiveDate;
use log::{debug, error, info, warn};
use shared::{
    BudgetData, CategoryCount, DailyCalories, ExpiryAlert, ExpiryStatus, InventoryItem,
    ItemConsumption, Settings, StockLevel, Theme, UsageRecord,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::alerts;
use crate::domain::analytics;
use crate::domain::clock::Clock;
use crate::domain::commands::items::{ItemUpdate, NewItem};
use crate::domain::commands::settings::{BudgetUpdate, SettingsUpdate};
use crate::domain::rollover::{self, RolloverOutcome};
use crate::domain::state::RefillrState;
use crate::storage::traits::StateStorage;

pub struct InventoryStore<S: StateStorage> {
    state: RefillrState,
    storage: S,
    clock: Arc<dyn Clock>,
    /// Off when the saved snapshot could not be read, so it is not overwritten
    persistence_enabled: bool,
}

impl<S: StateStorage> InventoryStore<S> {
    /// Open the store, hydrating from storage or starting empty.
    ///
    /// A snapshot that exists but cannot be read is left untouched on disk:
    /// the store runs on fresh in-memory state and skips saving.
    pub fn new(storage: S, clock: Arc<dyn Clock>) -> Self {
        let today = clock.today();
        let (state, persistence_enabled) = match storage.load_state() {
            Ok(Some(state)) => {
                info!(
                    "Hydrated store: {} items, {} usage records, streak {}",
                    state.items.len(),
                    state.usage_records.len(),
                    state.streak
                );
                (state, true)
            }
            Ok(None) => {
                info!("No saved state found, starting with an empty store");
                (RefillrState::new(today), true)
            }
            Err(e) => {
                error!(
                    "Failed to load saved state, continuing with an empty store and saving disabled: {}",
                    e
                );
                (RefillrState::new(today), false)
            }
        };

        Self {
            state,
            storage,
            clock,
            persistence_enabled,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn state(&self) -> &RefillrState {
        &self.state
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.state.items
    }

    pub fn item(&self, id: &str) -> Option<&InventoryItem> {
        self.state.find_item(id)
    }

    pub fn usage_records(&self) -> &[UsageRecord] {
        &self.state.usage_records
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn budget(&self) -> &BudgetData {
        &self.state.budget
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn streak(&self) -> u32 {
        self.state.streak
    }

    pub fn last_auto_subtract_date(&self) -> Option<NaiveDate> {
        self.state.last_auto_subtract_date
    }

    pub fn is_persistence_enabled(&self) -> bool {
        self.persistence_enabled
    }

    /// Run a state transition, then snapshot the result
    fn commit<R>(
        &mut self,
        operation: &str,
        transition: impl FnOnce(&mut RefillrState, NaiveDate) -> R,
    ) -> R {
        let today = self.clock.today();
        let result = transition(&mut self.state, today);
        debug!("Applied {}", operation);
        self.persist(operation);
        result
    }

    fn persist(&self, operation: &str) {
        if !self.persistence_enabled {
            warn!("Skipping save after {}: saving is disabled", operation);
            return;
        }
        if let Err(e) = self.storage.save_state(&self.state) {
            error!("Failed to save state after {}: {}", operation, e);
        }
    }

    /// Best-effort write of the current state
    pub fn flush(&self) {
        self.persist("flush");
    }

    // Item mutations

    pub fn add_item(&mut self, new_item: NewItem) -> InventoryItem {
        let id = Uuid::new_v4().to_string();
        let item = self.commit("add_item", |state, _| state.add_item(new_item, id));
        info!("Added item '{}' with ID: {}", item.name, item.id);
        item
    }

    /// Returns `false` when no item has `id`
    pub fn update_item(&mut self, id: &str, update: ItemUpdate) -> bool {
        let updated = self.commit("update_item", |state, _| state.update_item(id, update));
        if !updated {
            warn!("Update ignored, item not found: {}", id);
        }
        updated
    }

    pub fn remove_item(&mut self, id: &str) -> bool {
        let removed = self.commit("remove_item", |state, _| state.remove_item(id));
        if removed {
            info!("Removed item: {}", id);
        } else {
            warn!("Remove ignored, item not found: {}", id);
        }
        removed
    }

    pub fn refill_item(&mut self, id: &str, amount: f64) -> bool {
        let refilled = self.commit("refill_item", |state, _| state.refill_item(id, amount));
        if !refilled {
            warn!("Refill ignored, item not found: {}", id);
        }
        refilled
    }

    /// Refill and stamp today's date as the purchase date
    pub fn restock_item(&mut self, id: &str, amount: f64) -> bool {
        self.commit("restock_item", |state, today| {
            let refilled = state.refill_item(id, amount);
            if refilled {
                state.update_item(
                    id,
                    ItemUpdate {
                        purchase_date: Some(today),
                        ..Default::default()
                    },
                );
            }
            refilled
        })
    }

    /// Record manual consumption. `None` when no item has `id`.
    pub fn subtract_quantity(&mut self, id: &str, amount: f64) -> Option<UsageRecord> {
        let record = self.commit("subtract_quantity", |state, today| {
            state.subtract_quantity(id, amount, today)
        });
        if record.is_none() {
            warn!("Usage ignored, item not found: {}", id);
        }
        record
    }

    pub fn add_usage_record(&mut self, record: UsageRecord) {
        self.commit("add_usage_record", |state, _| state.add_usage_record(record));
    }

    pub fn append_item_note(&mut self, id: &str, text: &str) -> bool {
        self.commit("append_item_note", |state, today| {
            state.append_item_note(id, text, today)
        })
    }

    // Settings and budget

    pub fn update_settings(&mut self, update: SettingsUpdate) {
        self.commit("update_settings", |state, _| state.update_settings(update));
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.commit("set_theme", |state, _| state.set_theme(theme));
    }

    pub fn update_budget(&mut self, update: BudgetUpdate) {
        self.commit("update_budget", |state, _| state.update_budget(update));
    }

    pub fn add_expense(&mut self, amount: f64) {
        self.commit("add_expense", |state, _| state.add_expense(amount));
    }

    pub fn set_monthly_budget(&mut self, amount: f64) {
        self.commit("set_monthly_budget", |state, _| state.set_monthly_budget(amount));
    }

    // Daily rollover

    /// Apply today's auto-subtraction once, then update the streak
    pub fn perform_daily_subtraction(&mut self) -> RolloverOutcome {
        let today = self.clock.today();
        if self.state.last_auto_subtract_date == Some(today) {
            debug!("Daily rollover already applied for {}", today);
            return RolloverOutcome::AlreadyApplied;
        }

        let outcome = self.commit("perform_daily_subtraction", rollover::perform_daily_subtraction);
        self.update_streak();
        outcome
    }

    /// Increment the streak if anything was used today. Not guarded per day.
    pub fn update_streak(&mut self) -> bool {
        let today = self.clock.today();
        if !rollover::has_activity_on(&self.state, today) {
            return false;
        }
        self.commit("update_streak", rollover::update_streak)
    }

    // Queries

    pub fn todays_calories(&self) -> f64 {
        analytics::todays_calories(&self.state, self.today())
    }

    pub fn items_needing_refill(&self) -> Vec<InventoryItem> {
        analytics::items_needing_refill(&self.state)
    }

    pub fn weekly_calorie_report(&self) -> Vec<DailyCalories> {
        analytics::weekly_calorie_report(&self.state, self.today())
    }

    pub fn top_consumed_items(&self) -> Vec<ItemConsumption> {
        analytics::top_consumed_items(&self.state)
    }

    pub fn category_breakdown(&self) -> Vec<CategoryCount> {
        analytics::category_breakdown(&self.state)
    }

    pub fn daily_items(&self) -> Vec<InventoryItem> {
        analytics::daily_items(&self.state)
    }

    pub fn budget_usage_percent(&self) -> f64 {
        analytics::budget_usage_percent(&self.state)
    }

    pub fn expiry_alerts(&self) -> Vec<ExpiryAlert> {
        alerts::expiry_alerts(&self.state, self.today())
    }

    pub fn next_expiring_item(&self) -> Option<InventoryItem> {
        alerts::next_expiring_item(&self.state, self.today())
    }

    pub fn days_until_expiry(&self, item: &InventoryItem) -> i64 {
        alerts::days_until_expiry(item, self.today())
    }

    pub fn expiry_status(&self, item: &InventoryItem) -> ExpiryStatus {
        alerts::expiry_status(item, self.today())
    }

    pub fn stock_level(&self, item: &InventoryItem) -> StockLevel {
        alerts::stock_level(item)
    }

    pub fn refill_notifications(&self) -> Vec<InventoryItem> {
        alerts::refill_notifications(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::storage::file::test_utils::{init_test_logging, TestEnvironment};
    use anyhow::Result;
    use chrono::Duration;
    use shared::{Category, Unit};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn day_one() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 26).unwrap()
    }

    fn milk() -> NewItem {
        NewItem {
            name: "Milk".to_string(),
            category: Category::Dairy,
            quantity: 2.0,
            unit: Unit::Litres,
            calories_per_unit: 50.0,
            purchase_date: day_one(),
            expiry_date: day_one() + Duration::days(10),
            auto_subtract_daily: true,
            daily_usage: Some(0.5),
            notes: None,
            refill_threshold: Some(1.0),
        }
    }

    fn rice(quantity: f64) -> NewItem {
        NewItem {
            name: "Rice".to_string(),
            category: Category::Grains,
            quantity,
            unit: Unit::Kg,
            calories_per_unit: 1300.0,
            purchase_date: day_one(),
            expiry_date: day_one() + Duration::days(365),
            auto_subtract_daily: false,
            daily_usage: None,
            notes: None,
            refill_threshold: None,
        }
    }

    /// Storage whose saves always fail; counts attempts
    struct FailingStorage {
        saves: Arc<AtomicUsize>,
    }

    impl StateStorage for FailingStorage {
        fn load_state(&self) -> Result<Option<RefillrState>> {
            Ok(None)
        }

        fn save_state(&self, _state: &RefillrState) -> Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Err(anyhow::anyhow!("disk full"))
        }
    }

    /// Storage holding a snapshot it cannot read
    struct UnreadableStorage {
        saves: Arc<AtomicUsize>,
    }

    impl StateStorage for UnreadableStorage {
        fn load_state(&self) -> Result<Option<RefillrState>> {
            Err(anyhow::anyhow!("Unsupported data format version '2.0'"))
        }

        fn save_state(&self, _state: &RefillrState) -> Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_add_item_assigns_unique_ids() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, _clock) = env.open_store(day_one());

        let first = store.add_item(rice(3.0));
        let second = store.add_item(rice(3.0));

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
        assert_eq!(store.items().len(), 2);
        assert_eq!(store.item(&first.id), Some(&first));
    }

    #[test]
    fn test_quantity_never_negative_after_subtraction() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, clock) = env.open_store(day_one());
        let item = store.add_item(milk());

        for amount in [0.3, 1.1, 5.0, 0.25] {
            store.subtract_quantity(&item.id, amount);
            assert!(store.item(&item.id).unwrap().quantity >= 0.0);
            clock.advance_days(1);
            store.perform_daily_subtraction();
            assert!(store.item(&item.id).unwrap().quantity >= 0.0);
        }
        assert_eq!(store.item(&item.id).unwrap().quantity, 0.0);
    }

    #[test]
    fn test_rollover_twice_same_day_is_identical() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, _clock) = env.open_store(day_one());
        store.add_item(milk());

        assert_eq!(
            store.perform_daily_subtraction(),
            RolloverOutcome::Applied { items_processed: 1 }
        );
        let after_first = store.state().clone();

        assert_eq!(store.perform_daily_subtraction(), RolloverOutcome::AlreadyApplied);
        assert_eq!(store.state(), &after_first);
    }

    #[test]
    fn test_refill_then_subtract_round_trip() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, _clock) = env.open_store(day_one());
        let item = store.add_item(rice(4.0));

        assert!(store.refill_item(&item.id, 2.5));
        let record = store.subtract_quantity(&item.id, 2.5).unwrap();

        assert_eq!(store.item(&item.id).unwrap().quantity, 4.0);
        assert_eq!(store.usage_records().len(), 1);
        assert_eq!(record.quantity, 2.5);
    }

    #[test]
    fn test_calories_use_requested_amount() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, _clock) = env.open_store(day_one());
        let item = store.add_item(rice(1.0));

        let record = store.subtract_quantity(&item.id, 3.0).unwrap();

        assert_eq!(record.calories, 3.0 * 1300.0);
        assert_eq!(store.item(&item.id).unwrap().quantity, 0.0);
        assert_eq!(store.todays_calories(), 3900.0);
    }

    #[test]
    fn test_refill_threshold_default_boundary() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, _clock) = env.open_store(day_one());
        let at_threshold = store.add_item(rice(5.0));
        let above_threshold = store.add_item(rice(5.01));

        let needing: Vec<String> = store.items_needing_refill().into_iter().map(|i| i.id).collect();

        assert!(needing.contains(&at_threshold.id));
        assert!(!needing.contains(&above_threshold.id));
    }

    #[test]
    fn test_weekly_report_always_seven_days_ending_today() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, clock) = env.open_store(day_one());
        let item = store.add_item(rice(10.0));
        store.subtract_quantity(&item.id, 0.1);
        clock.advance_days(2);

        let report = store.weekly_calorie_report();

        assert_eq!(report.len(), 7);
        assert_eq!(report.last().unwrap().date, clock.today());
        assert_eq!(report[4].date, day_one());
        assert_eq!(report[4].calories, 130.0);
        assert_eq!(report.iter().filter(|d| d.calories == 0.0).count(), 6);
    }

    #[test]
    fn test_milk_scenario_over_five_days() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, clock) = env.open_store(day_one());
        let item = store.add_item(milk());

        for _ in 0..4 {
            store.perform_daily_subtraction();
            clock.advance_days(1);
        }

        assert_eq!(store.item(&item.id).unwrap().quantity, 0.0);
        assert_eq!(store.usage_records().len(), 4);
        assert!(store.usage_records().iter().all(|r| r.quantity == 0.5 && r.calories == 25.0));
        assert!(store.items_needing_refill().iter().any(|i| i.id == item.id));

        // Fifth day: quantity stays clamped, usage is still recorded in full
        store.perform_daily_subtraction();
        assert_eq!(store.item(&item.id).unwrap().quantity, 0.0);
        assert_eq!(store.usage_records().len(), 5);
        let last = store.usage_records().last().unwrap();
        assert_eq!(last.quantity, 0.5);
        assert_eq!(last.date, day_one() + Duration::days(4));
        assert_eq!(store.streak(), 5);
    }

    #[test]
    fn test_foreground_sequence_inflates_streak() {
        // Rollover bumps the streak once; an explicit call on the same active
        // day bumps it again.
        let env = TestEnvironment::new().unwrap();
        let (mut store, _clock) = env.open_store(day_one());
        store.add_item(milk());

        store.perform_daily_subtraction();
        store.update_streak();

        assert_eq!(store.streak(), 2);
    }

    #[test]
    fn test_update_streak_without_activity_is_noop() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, _clock) = env.open_store(day_one());
        store.add_item(rice(2.0));

        assert!(!store.update_streak());
        assert_eq!(store.perform_daily_subtraction(), RolloverOutcome::Applied { items_processed: 0 });
        assert_eq!(store.streak(), 0);
    }

    #[test]
    fn test_orphaned_records_stay_in_weekly_report() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, _clock) = env.open_store(day_one());
        let item = store.add_item(rice(2.0));
        store.subtract_quantity(&item.id, 1.0);

        assert!(store.remove_item(&item.id));

        assert_eq!(store.usage_records().len(), 1);
        assert_eq!(store.weekly_calorie_report()[6].calories, 1300.0);
        assert!(store.top_consumed_items().is_empty());
    }

    #[test]
    fn test_unknown_ids_are_silent_noops() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, _clock) = env.open_store(day_one());
        store.add_item(rice(2.0));
        let before = store.state().clone();

        assert!(!store.update_item("nope", ItemUpdate::default()));
        assert!(!store.remove_item("nope"));
        assert!(!store.refill_item("nope", 1.0));
        assert!(!store.restock_item("nope", 1.0));
        assert!(store.subtract_quantity("nope", 1.0).is_none());
        assert!(!store.append_item_note("nope", "hello"));

        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_restock_stamps_purchase_date() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, clock) = env.open_store(day_one());
        let item = store.add_item(rice(1.0));
        clock.advance_days(3);

        assert!(store.restock_item(&item.id, 4.0));

        let restocked = store.item(&item.id).unwrap();
        assert_eq!(restocked.quantity, 5.0);
        assert_eq!(restocked.purchase_date, day_one() + Duration::days(3));
        assert!(store.usage_records().is_empty());
    }

    #[test]
    fn test_notes_are_dated_with_store_clock() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, _clock) = env.open_store(day_one());
        let item = store.add_item(rice(1.0));

        assert!(store.append_item_note(&item.id, "jasmine"));

        assert_eq!(
            store.item(&item.id).unwrap().notes.as_deref(),
            Some("2025-02-26: jasmine")
        );
    }

    #[test]
    fn test_state_survives_restart() {
        let env = TestEnvironment::new().unwrap();
        let clock = FixedClock::new(day_one());
        let item_id;
        {
            let mut store = env.open_store_with_clock(&clock);
            item_id = store.add_item(milk()).id;
            store.perform_daily_subtraction();
            store.set_theme(Theme::Dark);
            store.add_expense(12.0);
        }

        let mut reopened = env.open_store_with_clock(&clock);

        assert_eq!(reopened.item(&item_id).unwrap().quantity, 1.5);
        assert_eq!(reopened.usage_records().len(), 1);
        assert_eq!(reopened.theme(), Theme::Dark);
        assert_eq!(reopened.budget().current_spent, 12.0);
        assert_eq!(reopened.streak(), 1);
        assert_eq!(reopened.last_auto_subtract_date(), Some(day_one()));

        // Guard survives the restart too
        assert_eq!(reopened.perform_daily_subtraction(), RolloverOutcome::AlreadyApplied);
    }

    #[test]
    fn test_save_failure_does_not_undo_mutation() {
        init_test_logging();
        let saves = Arc::new(AtomicUsize::new(0));
        let storage = FailingStorage { saves: saves.clone() };
        let mut store = InventoryStore::new(storage, Arc::new(FixedClock::new(day_one())));

        let item = store.add_item(rice(2.0));
        store.subtract_quantity(&item.id, 0.5);

        assert_eq!(store.item(&item.id).unwrap().quantity, 1.5);
        assert_eq!(store.usage_records().len(), 1);
        assert_eq!(saves.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unreadable_snapshot_is_never_overwritten() {
        init_test_logging();
        let saves = Arc::new(AtomicUsize::new(0));
        let storage = UnreadableStorage { saves: saves.clone() };
        let mut store = InventoryStore::new(storage, Arc::new(FixedClock::new(day_one())));

        assert!(!store.is_persistence_enabled());
        assert!(store.items().is_empty());

        store.add_item(rice(1.0));
        store.flush();

        assert_eq!(store.items().len(), 1);
        assert_eq!(saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_settings_budget_and_alert_queries() {
        let env = TestEnvironment::new().unwrap();
        let (mut store, _clock) = env.open_store(day_one());
        let mut soon = rice(20.0);
        soon.expiry_date = day_one() + Duration::days(2);
        let soon = store.add_item(soon);
        store.add_item(milk());

        store.set_monthly_budget(100.0);
        store.add_expense(25.0);
        store.update_settings(SettingsUpdate {
            notify_on_refill_needed: Some(false),
            ..Default::default()
        });

        assert_eq!(store.budget_usage_percent(), 25.0);
        assert_eq!(store.settings().monthly_budget, 100.0);
        assert!(store.refill_notifications().is_empty());
        assert_eq!(store.expiry_alerts()[0].item.id, soon.id);
        assert_eq!(store.next_expiring_item().unwrap().id, soon.id);
        assert_eq!(store.days_until_expiry(&soon), 2);
        assert_eq!(store.expiry_status(&soon), ExpiryStatus::Critical);
        assert_eq!(store.stock_level(&soon), StockLevel::Healthy);
        assert_eq!(store.daily_items().len(), 1);
        assert_eq!(store.category_breakdown().len(), 2);
    }
}
