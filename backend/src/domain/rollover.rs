//! Daily rollover and streak tracking.
//!
//! The rollover applies every item's configured daily usage once per
//! calendar date. It never schedules itself: the caller triggers it (for
//! example on app foreground) and `last_auto_subtract_date` turns repeat
//! calls on the same date into no-ops.

use chrono::NaiveDate;
use log::{debug, info};

use crate::domain::state::RefillrState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverOutcome {
    /// The rollover already ran for this date
    AlreadyApplied,
    Applied {
        items_processed: usize,
    },
}

/// Subtract `daily_usage` from every auto-subtract item, dated `today`.
///
/// Items flagged for auto-subtraction without a `daily_usage` are skipped.
/// Does not touch the streak; see [`update_streak`].
pub fn perform_daily_subtraction(state: &mut RefillrState, today: NaiveDate) -> RolloverOutcome {
    if state.last_auto_subtract_date == Some(today) {
        debug!("Daily rollover already applied for {}", today);
        return RolloverOutcome::AlreadyApplied;
    }

    let due: Vec<(String, f64)> = state
        .items
        .iter()
        .filter(|item| item.auto_subtract_daily)
        .filter_map(|item| item.daily_usage.map(|usage| (item.id.clone(), usage)))
        .collect();

    for (id, usage) in &due {
        state.subtract_quantity(id, *usage, today);
    }

    state.last_auto_subtract_date = Some(today);
    info!("Daily rollover for {} processed {} items", today, due.len());

    RolloverOutcome::Applied {
        items_processed: due.len(),
    }
}

pub fn has_activity_on(state: &RefillrState, date: NaiveDate) -> bool {
    state.usage_records.iter().any(|record| record.date == date)
}

/// Bump the streak when any usage is recorded for `today`.
///
/// There is no per-day guard: each call on an active day increments again.
pub fn update_streak(state: &mut RefillrState, today: NaiveDate) -> bool {
    if !has_activity_on(state, today) {
        return false;
    }

    state.streak = state.streak.saturating_add(1);
    debug!("Streak is now {}", state.streak);
    true
}
