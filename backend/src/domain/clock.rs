//! Source of "today" for every date-sensitive operation.
//!
//! All store logic works on calendar dates only. Production code reads the
//! device-local date; tests drive a [`FixedClock`] across simulated days.

use chrono::{Duration, Local, NaiveDate};
use std::sync::{Arc, Mutex, PoisonError};

pub trait Clock: Send + Sync {
    /// Current calendar date, without a time component
    fn today(&self) -> NaiveDate;
}

/// Device-local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually advanced clock. Clones share the same date.
#[derive(Debug, Clone)]
pub struct FixedClock {
    current: Arc<Mutex<NaiveDate>>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            current: Arc::new(Mutex::new(date)),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = date;
    }

    pub fn advance_days(&self, days: i64) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
