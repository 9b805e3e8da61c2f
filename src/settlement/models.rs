//! Domain model for settlement calculations.
//!
//! These types are the calculator's only view of the outside world: pricing
//! tiers, booking snapshot rows, and return data are adapted into them at
//! the boundary (see `adapter`) and never re-parsed downstream.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SettlementError;

/// Granularity a billing period is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodUnit {
    Hour,
    Day,
}

/// Rate plan kind. Named variants carry a fixed billing basis; `Custom`
/// defers to the tier's stored `period_unit`/`period_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl PeriodType {
    /// Fixed (unit, value) basis for the named variants. Monthly prorates
    /// against a 30-day basis; calendar-exact months use `Custom`.
    pub fn fixed_basis(self) -> Option<(PeriodUnit, u32)> {
        match self {
            PeriodType::Hourly => Some((PeriodUnit::Hour, 1)),
            PeriodType::Daily => Some((PeriodUnit::Day, 1)),
            PeriodType::Weekly => Some((PeriodUnit::Day, 7)),
            PeriodType::Monthly => Some((PeriodUnit::Day, 30)),
            PeriodType::Custom => None,
        }
    }
}

/// One selectable rate plan for an item.
///
/// Created and maintained by a pricing-administration workflow elsewhere;
/// read-only to the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    pub id: Uuid,
    pub period_type: PeriodType,
    pub period_unit: PeriodUnit,
    pub period_value: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate_per_period: Decimal,
    #[serde(default)]
    pub min_periods: Option<u32>,
    #[serde(default)]
    pub max_periods: Option<u32>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub priority: i32,
}

impl PricingTier {
    /// Effective (unit, value) this tier bills in.
    pub fn billing_basis(&self) -> (PeriodUnit, u32) {
        self.period_type
            .fixed_basis()
            .unwrap_or((self.period_unit, self.period_value))
    }

    /// Validate the tier invariants before it participates in pricing.
    pub fn validate(&self) -> Result<(), SettlementError> {
        if self.period_value == 0 {
            return Err(SettlementError::InvalidInput {
                field: "period_value",
                message: "must be a positive integer".to_string(),
            });
        }
        if self.rate_per_period < Decimal::ZERO {
            return Err(SettlementError::InvalidInput {
                field: "rate_per_period",
                message: format!("must not be negative, got {}", self.rate_per_period),
            });
        }
        if let (Some(min), Some(max)) = (self.min_periods, self.max_periods) {
            if min > max {
                return Err(SettlementError::InvalidInput {
                    field: "min_periods",
                    message: format!("min_periods {} exceeds max_periods {}", min, max),
                });
            }
        }
        // A named plan whose stored basis disagrees with its fixed basis is
        // a configuration mistake, not something to guess around.
        if let Some(basis) = self.period_type.fixed_basis() {
            if (self.period_unit, self.period_value) != basis {
                return Err(SettlementError::InvalidInput {
                    field: "period_type",
                    message: format!(
                        "{:?} tier must bill in {:?} x {}, got {:?} x {}",
                        self.period_type, basis.0, basis.1, self.period_unit, self.period_value
                    ),
                });
            }
        }
        Ok(())
    }

    /// Whether `periods` falls inside this tier's inclusive bounds.
    /// Unbounded sides qualify everything.
    pub fn accepts_periods(&self, periods: u32) -> bool {
        self.min_periods.map_or(true, |min| periods >= min)
            && self.max_periods.map_or(true, |max| periods <= max)
    }
}

/// One item/quantity/date-range being priced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalLineRequest {
    pub item_id: Uuid,
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Tier id chosen by the operator; the resolver picks one when absent.
    #[serde(default)]
    pub selected_tier: Option<Uuid>,
}

/// Everything needed to settle a return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementInput {
    #[serde(with = "rust_decimal::serde::str")]
    pub deposit_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub line_subtotal: Decimal,
    pub scheduled_return: DateTime<Utc>,
    pub actual_return: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::str")]
    pub late_fee_rate_per_day: Decimal,
    #[serde(default)]
    pub damage_penalties: Vec<Decimal>,
}

/// Signed settlement outcome. `total_refund` is positive when money goes
/// back to the customer and negative when the deposit did not cover the
/// deductions; it is never clamped here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementResult {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_refund: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub late_fees: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub damage_penalties: Decimal,
    pub days_late: u32,
}

/// Lifecycle state of an existing booking in the availability snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

/// One existing reservation, as supplied by the caller. The calculator owns
/// no storage; it only reads these rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingWindow {
    pub booking_id: Uuid,
    pub item_id: Uuid,
    pub location_id: Uuid,
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BookingStatus,
}

impl BookingWindow {
    /// Inclusive date-range overlap test.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end_date && end >= self.start_date
    }
}

/// A booking that blocks part of the requested window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingConflict {
    pub booking_id: Uuid,
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Outcome of an extension/booking conflict query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityCheckResult {
    pub is_available: bool,
    pub available_quantity: u32,
    pub total_quantity: u32,
    pub conflicts: Vec<BookingConflict>,
}
