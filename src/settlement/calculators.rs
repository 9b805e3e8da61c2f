//! Core settlement calculation functions.
//!
//! Pure functions for settlement math - no I/O, no shared state. Proration,
//! late fees, damage aggregation, and the final deposit settlement all live
//! here; tier selection is in `tiers` and availability in `availability`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

use super::models::{PeriodUnit, SettlementInput, SettlementResult};
use super::SettlementError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Round to specified decimal places, half away from zero.
///
/// Settlement amounts round half away from zero rather than to the nearest
/// even digit, so 2.5 and 3.5 both move away from zero. The strategy is
/// pinned here and tested; every monetary result in this module goes
/// through this function.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use rentdesk_settlement::settlement::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(-2.5), 0), dec!(-3));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an inclusive date range into a billable period count.
///
/// `total_days = (end - start) + 1`; a non-positive span is invalid. Day
/// periods divide the day count, hour periods divide the hour count
/// (days x 24), both with ceiling rounding so partial periods bill whole.
///
/// For every valid range the result is >= 1.
pub fn compute_periods(
    unit: PeriodUnit,
    value: u32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<u32, SettlementError> {
    if value == 0 {
        return Err(SettlementError::InvalidInput {
            field: "period_value",
            message: "must be a positive integer".to_string(),
        });
    }

    let total_days = (end - start).num_days() + 1;
    if total_days <= 0 {
        return Err(SettlementError::InvalidDateRange { start, end });
    }

    let value = i64::from(value);
    let periods = match unit {
        PeriodUnit::Day => (total_days + value - 1) / value,
        PeriodUnit::Hour => {
            let total_hours = total_days * 24;
            (total_hours + value - 1) / value
        }
    };

    Ok(periods as u32)
}

/// Billable periods for a plain day count, used when qualifying tiers
/// against a requested duration before exact dates matter.
pub fn periods_for_days(
    unit: PeriodUnit,
    value: u32,
    requested_days: i64,
) -> Result<u32, SettlementError> {
    if requested_days <= 0 {
        return Err(SettlementError::InvalidInput {
            field: "requested_days",
            message: format!("must be positive, got {}", requested_days),
        });
    }
    if value == 0 {
        return Err(SettlementError::InvalidInput {
            field: "period_value",
            message: "must be a positive integer".to_string(),
        });
    }

    let value = i64::from(value);
    let periods = match unit {
        PeriodUnit::Day => (requested_days + value - 1) / value,
        PeriodUnit::Hour => (requested_days * 24 + value - 1) / value,
    };
    Ok(periods as u32)
}

/// Subtotal = rate x quantity x periods, in exact decimal arithmetic,
/// rounded to currency precision last.
pub fn compute_subtotal(
    rate: Decimal,
    quantity: u32,
    periods: u32,
) -> Result<Decimal, SettlementError> {
    if rate < Decimal::ZERO {
        return Err(SettlementError::InvalidInput {
            field: "rate_per_period",
            message: format!("must not be negative, got {}", rate),
        });
    }
    if quantity == 0 {
        return Err(SettlementError::InvalidInput {
            field: "quantity",
            message: "must be a positive integer".to_string(),
        });
    }

    let subtotal = rate * Decimal::from(quantity) * Decimal::from(periods);
    Ok(round_money(subtotal, 2))
}

/// Days late and the resulting fee.
///
/// Lateness is measured in seconds and ceiled to whole days, so a return
/// one hour past the scheduled time bills one late day. Returns before or
/// at the scheduled time bill nothing. No compounding and no cap; any cap
/// is a business policy layered on by the caller.
pub fn assess_late_fee(
    scheduled: DateTime<Utc>,
    actual: DateTime<Utc>,
    rate_per_day: Decimal,
) -> Result<(u32, Decimal), SettlementError> {
    if rate_per_day < Decimal::ZERO {
        return Err(SettlementError::InvalidInput {
            field: "late_fee_rate_per_day",
            message: format!("must not be negative, got {}", rate_per_day),
        });
    }

    if actual <= scheduled {
        return Ok((0, Decimal::ZERO));
    }

    let late_seconds = (actual - scheduled).num_seconds();
    let days_late = ((late_seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY).max(1) as u32;
    let fee = round_money(Decimal::from(days_late) * rate_per_day, 2);

    Ok((days_late, fee))
}

/// Sum of damage penalty line items. Any negative entry is rejected
/// outright rather than netted against the rest.
pub fn aggregate_damage_penalties(penalties: &[Decimal]) -> Result<Decimal, SettlementError> {
    let mut total = Decimal::ZERO;
    for (index, amount) in penalties.iter().enumerate() {
        if *amount < Decimal::ZERO {
            return Err(SettlementError::InvalidPenalty {
                index,
                amount: *amount,
            });
        }
        total += *amount;
    }
    Ok(total)
}

/// Settle a return: deposit minus late fees minus damage penalties.
///
/// The result is signed and never clamped; a negative `total_refund` means
/// the deposit did not cover the deductions and the caller decides the
/// collection workflow. Rounding is half away from zero to 2 places.
pub fn settle(input: &SettlementInput) -> Result<SettlementResult, SettlementError> {
    if input.deposit_amount < Decimal::ZERO {
        return Err(SettlementError::InvalidInput {
            field: "deposit_amount",
            message: format!("must not be negative, got {}", input.deposit_amount),
        });
    }
    if input.line_subtotal < Decimal::ZERO {
        return Err(SettlementError::InvalidInput {
            field: "line_subtotal",
            message: format!("must not be negative, got {}", input.line_subtotal),
        });
    }

    let (days_late, late_fees) = assess_late_fee(
        input.scheduled_return,
        input.actual_return,
        input.late_fee_rate_per_day,
    )?;
    let damage_penalties = aggregate_damage_penalties(&input.damage_penalties)?;

    let total_refund = round_money(input.deposit_amount - late_fees - damage_penalties, 2);

    Ok(SettlementResult {
        total_refund,
        late_fees,
        damage_penalties,
        days_late,
    })
}
