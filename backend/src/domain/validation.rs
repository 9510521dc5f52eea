//! Input checks for the UI layer.
//!
//! The store accepts any well-typed payload. Callers that want to reject bad
//! form input run these first, the way the add-item and refill screens do.

use chrono::NaiveDate;

use crate::domain::commands::items::NewItem;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Item name cannot be empty")]
    EmptyName,
    #[error("Quantity must be a positive number")]
    NonPositiveQuantity,
    #[error("Calories per unit must be a positive number")]
    NonPositiveCalories,
    #[error("Daily usage cannot be negative")]
    NegativeDailyUsage,
    #[error("Refill threshold cannot be negative")]
    NegativeRefillThreshold,
    #[error("Expiry date {expiry} is before purchase date {purchase}")]
    ExpiryBeforePurchase {
        purchase: NaiveDate,
        expiry: NaiveDate,
    },
    #[error("Amount must be a positive number")]
    NonPositiveAmount,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

pub fn validate_new_item(item: &NewItem) -> Result<(), ValidationError> {
    if item.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !is_positive(item.quantity) {
        return Err(ValidationError::NonPositiveQuantity);
    }
    if !is_positive(item.calories_per_unit) {
        return Err(ValidationError::NonPositiveCalories);
    }
    if item.daily_usage.is_some_and(|usage| !is_non_negative(usage)) {
        return Err(ValidationError::NegativeDailyUsage);
    }
    if item
        .refill_threshold
        .is_some_and(|threshold| !is_non_negative(threshold))
    {
        return Err(ValidationError::NegativeRefillThreshold);
    }
    if item.expiry_date < item.purchase_date {
        return Err(ValidationError::ExpiryBeforePurchase {
            purchase: item.purchase_date,
            expiry: item.expiry_date,
        });
    }
    Ok(())
}

/// Refill and manual usage amounts must be positive
pub fn validate_amount(amount: f64) -> Result<f64, ValidationError> {
    if is_positive(amount) {
        Ok(amount)
    } else {
        Err(ValidationError::NonPositiveAmount)
    }
}

pub fn parse_iso_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}
