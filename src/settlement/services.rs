//! Settlement service functions.
//!
//! Thin orchestration over the pure calculators: validate the request,
//! pick a tier, prorate, settle, check availability. This is also the
//! structured-logging boundary; the calculators themselves never log.

use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use super::availability;
use super::calculators;
use super::models::{
    AvailabilityCheckResult, BookingWindow, PeriodType, PricingTier, RentalLineRequest,
    SettlementInput, SettlementResult,
};
use super::tiers;
use super::SettlementError;

/// Result of pricing one rental line.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePricing {
    pub tier_id: Uuid,
    pub period_type: PeriodType,
    pub periods: u32,
    pub rate_per_period: Decimal,
    pub line_subtotal: Decimal,
}

/// Price one rental line against an item's tiers.
///
/// Honors `selected_tier` when the operator picked a plan explicitly
/// (an unknown id is an error, not a fallback); otherwise resolves the
/// tier from the requested duration.
pub fn price_rental_line(
    tiers: &[PricingTier],
    line: &RentalLineRequest,
) -> Result<LinePricing, SettlementError> {
    if line.quantity == 0 {
        return Err(SettlementError::InvalidInput {
            field: "quantity",
            message: "must be a positive integer".to_string(),
        });
    }
    if line.end_date < line.start_date {
        return Err(SettlementError::InvalidDateRange {
            start: line.start_date,
            end: line.end_date,
        });
    }

    let requested_days = (line.end_date - line.start_date).num_days() + 1;

    let tier = match line.selected_tier {
        Some(tier_id) => {
            let tier = tiers
                .iter()
                .find(|t| t.id == tier_id)
                .ok_or_else(|| SettlementError::InvalidInput {
                    field: "selected_tier",
                    message: format!("tier {} not found for item {}", tier_id, line.item_id),
                })?;
            tier.validate()?;
            tier
        }
        None => tiers::resolve_tier(tiers, requested_days)?,
    };

    let (unit, value) = tier.billing_basis();
    let periods = calculators::compute_periods(unit, value, line.start_date, line.end_date)?;
    let line_subtotal =
        calculators::compute_subtotal(tier.rate_per_period, line.quantity, periods)?;

    debug!(
        item_id = %line.item_id,
        tier_id = %tier.id,
        period_type = ?tier.period_type,
        periods,
        %line_subtotal,
        "priced rental line"
    );

    Ok(LinePricing {
        tier_id: tier.id,
        period_type: tier.period_type,
        periods,
        rate_per_period: tier.rate_per_period,
        line_subtotal,
    })
}

/// Settle a return and log the signed outcome.
pub fn settle_return(input: &SettlementInput) -> Result<SettlementResult, SettlementError> {
    let result = calculators::settle(input)?;

    debug!(
        days_late = result.days_late,
        late_fees = %result.late_fees,
        damage_penalties = %result.damage_penalties,
        total_refund = %result.total_refund,
        "settled return"
    );

    Ok(result)
}

/// Gate a duration extension on availability over the requested window.
#[allow(clippy::too_many_arguments)]
pub fn check_extension(
    snapshot: &[BookingWindow],
    total_quantity: u32,
    item_id: Uuid,
    location_id: Uuid,
    requested_quantity: u32,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    exclude_booking_id: Option<Uuid>,
) -> Result<AvailabilityCheckResult, SettlementError> {
    let result = availability::check_availability(
        snapshot,
        total_quantity,
        item_id,
        location_id,
        requested_quantity,
        start_date,
        end_date,
        exclude_booking_id,
    )?;

    debug!(
        %item_id,
        %location_id,
        requested_quantity,
        available = result.available_quantity,
        conflicts = result.conflicts.len(),
        is_available = result.is_available,
        "checked extension availability"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::models::PeriodUnit;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn daily_tier(rate: Decimal) -> PricingTier {
        PricingTier {
            id: Uuid::new_v4(),
            period_type: PeriodType::Daily,
            period_unit: PeriodUnit::Day,
            period_value: 1,
            rate_per_period: rate,
            min_periods: None,
            max_periods: None,
            is_default: true,
            priority: 0,
        }
    }

    fn line(start: NaiveDate, end: NaiveDate, quantity: u32) -> RentalLineRequest {
        RentalLineRequest {
            item_id: Uuid::new_v4(),
            quantity,
            start_date: start,
            end_date: end,
            selected_tier: None,
        }
    }

    #[test]
    fn test_price_line_resolves_and_prorates() {
        let tiers = vec![daily_tier(dec!(12.50))];
        let pricing = price_rental_line(&tiers, &line(date(1), date(3), 2)).unwrap();

        assert_eq!(pricing.tier_id, tiers[0].id);
        assert_eq!(pricing.periods, 3);
        assert_eq!(pricing.line_subtotal, dec!(75.00)); // 12.50 x 2 x 3
    }

    #[test]
    fn test_price_line_honors_selected_tier() {
        let cheap = daily_tier(dec!(10));
        let mut premium = daily_tier(dec!(40));
        premium.is_default = false;
        premium.priority = 5;

        let mut l = line(date(1), date(2), 1);
        l.selected_tier = Some(premium.id);

        let tiers = vec![cheap, premium.clone()];
        let pricing = price_rental_line(&tiers, &l).unwrap();
        assert_eq!(pricing.tier_id, premium.id);
        assert_eq!(pricing.line_subtotal, dec!(80)); // 40 x 1 x 2
    }

    #[test]
    fn test_price_line_unknown_selected_tier_fails() {
        let tiers = vec![daily_tier(dec!(10))];
        let mut l = line(date(1), date(2), 1);
        l.selected_tier = Some(Uuid::new_v4());

        let err = price_rental_line(&tiers, &l);
        assert!(matches!(
            err,
            Err(SettlementError::InvalidInput { field: "selected_tier", .. })
        ));
    }

    #[test]
    fn test_price_line_rejects_inverted_dates() {
        let tiers = vec![daily_tier(dec!(10))];
        let err = price_rental_line(&tiers, &line(date(5), date(2), 1));
        assert!(matches!(err, Err(SettlementError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_price_line_rejects_zero_quantity() {
        let tiers = vec![daily_tier(dec!(10))];
        let err = price_rental_line(&tiers, &line(date(1), date(2), 0));
        assert!(matches!(err, Err(SettlementError::InvalidInput { .. })));
    }
}
