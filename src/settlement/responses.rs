//! Response DTOs for settlement API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::models::{AvailabilityCheckResult, PeriodType, SettlementResult};
use super::services::LinePricing;

/// Response for line pricing.
#[derive(Debug, Serialize)]
pub struct LinePricingResponse {
    pub tier_id: Uuid,
    pub period_type: PeriodType,
    pub periods: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate_per_period: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub line_subtotal: Decimal,
}

impl From<LinePricing> for LinePricingResponse {
    fn from(pricing: LinePricing) -> Self {
        Self {
            tier_id: pricing.tier_id,
            period_type: pricing.period_type,
            periods: pricing.periods,
            rate_per_period: pricing.rate_per_period,
            line_subtotal: pricing.line_subtotal,
        }
    }
}

/// Response for a settled return. `total_refund` is signed: negative means
/// the customer still owes beyond the deposit.
#[derive(Debug, Serialize)]
pub struct SettlementResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_refund: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub late_fees: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub damage_penalties: Decimal,
    pub days_late: u32,
}

impl From<SettlementResult> for SettlementResponse {
    fn from(result: SettlementResult) -> Self {
        Self {
            total_refund: result.total_refund,
            late_fees: result.late_fees,
            damage_penalties: result.damage_penalties,
            days_late: result.days_late,
        }
    }
}

/// One conflicting booking in an availability response.
#[derive(Debug, Serialize)]
pub struct ConflictResponse {
    pub booking_id: Uuid,
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Response for an availability check.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub is_available: bool,
    pub available_quantity: u32,
    pub total_quantity: u32,
    pub conflicts: Vec<ConflictResponse>,
}

impl From<AvailabilityCheckResult> for AvailabilityResponse {
    fn from(result: AvailabilityCheckResult) -> Self {
        Self {
            is_available: result.is_available,
            available_quantity: result.available_quantity,
            total_quantity: result.total_quantity,
            conflicts: result
                .conflicts
                .into_iter()
                .map(|c| ConflictResponse {
                    booking_id: c.booking_id,
                    quantity: c.quantity,
                    start_date: c.start_date,
                    end_date: c.end_date,
                })
                .collect(),
        }
    }
}

/// Generic settlement error response.
#[derive(Debug, Serialize)]
pub struct SettlementErrorResponse {
    pub error_type: String,
    pub message: String,
}
