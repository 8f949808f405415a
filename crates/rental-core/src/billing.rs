//! # Billing Module
//!
//! The rental cost formula.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Rental Cost                                       │
//! │                                                                         │
//! │  started_at ──────────── elapsed ────────────► ended_at                 │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                   elapsed_hours (fractional, e.g. 1.5)                  │
//! │                            │                                            │
//! │                            ▼                                            │
//! │  total = elapsed_hours × hourly_rate + kilometers × kilometer_rate      │
//! │                                                                         │
//! │  Example: 2.0h × 20.0 + 10km × 0.5 = 45.0                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Numeric Semantics
//! Rates, distances and costs are `f64`, matching the REAL columns they are
//! stored in. The stored cost is never rounded; [`format_amount`] rounds for
//! display only.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{validate_rate, ValidationResult};

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

// =============================================================================
// Rate Schedule
// =============================================================================

/// A car's (hourly_rate, kilometer_rate) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSchedule {
    pub hourly_rate: f64,
    pub kilometer_rate: f64,
}

impl RateSchedule {
    /// Creates a validated rate schedule.
    ///
    /// ## Rules
    /// Both rates must be finite and non-negative. Zero is allowed.
    ///
    /// ## Example
    /// ```rust
    /// use rental_core::RateSchedule;
    ///
    /// assert!(RateSchedule::new(20.0, 0.5).is_ok());
    /// assert!(RateSchedule::new(0.0, 0.0).is_ok());
    /// assert!(RateSchedule::new(-1.0, 0.5).is_err());
    /// ```
    pub fn new(hourly_rate: f64, kilometer_rate: f64) -> ValidationResult<Self> {
        validate_rate("hourly_rate", hourly_rate)?;
        validate_rate("kilometer_rate", kilometer_rate)?;

        Ok(RateSchedule {
            hourly_rate,
            kilometer_rate,
        })
    }

    /// Applies the schedule to a usage record.
    #[inline]
    pub fn cost(&self, elapsed_hours: f64, kilometers: f64) -> f64 {
        elapsed_hours * self.hourly_rate + kilometers * self.kilometer_rate
    }
}

// =============================================================================
// Elapsed Time
// =============================================================================

/// Returns the time between `start` and `end` in fractional hours.
///
/// An `end` earlier than `start` (clock skew) counts as zero hours so a rental
/// is never billed a negative amount.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use rental_core::billing::elapsed_hours;
///
/// let start = Utc::now();
/// assert_eq!(elapsed_hours(start, start + Duration::minutes(90)), 1.5);
/// assert_eq!(elapsed_hours(start, start - Duration::minutes(5)), 0.0);
/// ```
pub fn elapsed_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let elapsed = end.signed_duration_since(start);
    if elapsed <= Duration::zero() {
        return 0.0;
    }

    match elapsed.num_microseconds() {
        Some(micros) => micros as f64 / MICROS_PER_HOUR,
        // Only spans of ~292k years overflow microseconds
        None => elapsed.num_milliseconds() as f64 / MILLIS_PER_HOUR,
    }
}

/// Computes the total cost of a rental closed at `end` after `kilometers`.
pub fn compute_total_cost(
    rates: &RateSchedule,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    kilometers: f64,
) -> f64 {
    rates.cost(elapsed_hours(start, end), kilometers)
}

/// Formats an amount with two decimals for display.
///
/// ## Example
/// ```rust
/// use rental_core::billing::format_amount;
///
/// assert_eq!(format_amount(45.0), "45.00");
/// assert_eq!(format_amount(10.456), "10.46");
/// ```
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_two_hours_ten_km() {
        let rates = RateSchedule::new(20.0, 0.5).unwrap();
        let end = start() + Duration::hours(2);

        assert_eq!(elapsed_hours(start(), end), 2.0);
        assert_eq!(compute_total_cost(&rates, start(), end, 10.0), 45.0);
    }

    #[test]
    fn test_fractional_hours() {
        let end = start() + Duration::minutes(90);
        assert_eq!(elapsed_hours(start(), end), 1.5);

        let end = start() + Duration::seconds(36);
        assert!((elapsed_hours(start(), end) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_zero_and_negative_elapsed() {
        assert_eq!(elapsed_hours(start(), start()), 0.0);
        assert_eq!(elapsed_hours(start(), start() - Duration::hours(1)), 0.0);
    }

    #[test]
    fn test_zero_distance_bills_time_only() {
        let rates = RateSchedule::new(20.0, 0.5).unwrap();
        assert_eq!(rates.cost(3.0, 0.0), 60.0);
    }

    #[test]
    fn test_free_car() {
        let rates = RateSchedule::new(0.0, 0.0).unwrap();
        assert_eq!(rates.cost(5.0, 500.0), 0.0);
    }

    #[test]
    fn test_rate_schedule_rejects_bad_rates() {
        assert!(RateSchedule::new(-0.01, 0.5).is_err());
        assert!(RateSchedule::new(20.0, -0.5).is_err());
        assert!(RateSchedule::new(f64::NAN, 0.5).is_err());
        assert!(RateSchedule::new(20.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(45.0), "45.00");
        assert_eq!(format_amount(1.005_1), "1.01");
    }
}
