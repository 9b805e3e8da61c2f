//! Rate resolver: picks the pricing tier that applies to a requested
//! duration.
//!
//! Resolution is pure and deterministic: qualify tiers by their period
//! bounds, then prefer lowest priority, then the default flag, then the
//! lowest rate. When nothing qualifies the default tier is the fallback;
//! with no default the resolver fails rather than guessing a rate.

use super::calculators::periods_for_days;
use super::models::PricingTier;
use super::SettlementError;

/// Select the tier that prices a `requested_days`-long rental.
///
/// Each tier's period count is computed in its own billing basis before the
/// min/max bounds are applied, so a weekly tier bounded to `1..=4` periods
/// covers 1 through 28 days.
pub fn resolve_tier(
    tiers: &[PricingTier],
    requested_days: i64,
) -> Result<&PricingTier, SettlementError> {
    if requested_days <= 0 {
        return Err(SettlementError::InvalidInput {
            field: "requested_days",
            message: format!("must be positive, got {}", requested_days),
        });
    }

    for tier in tiers {
        tier.validate()?;
    }

    let qualifying = tiers.iter().filter(|tier| {
        let (unit, value) = tier.billing_basis();
        match periods_for_days(unit, value, requested_days) {
            Ok(periods) => tier.accepts_periods(periods),
            Err(_) => false,
        }
    });

    // Lowest priority wins; ties prefer the default tier, then the lowest
    // rate. The tuple key encodes exactly that order.
    let best = qualifying.min_by_key(|tier| (tier.priority, !tier.is_default, tier.rate_per_period));

    match best {
        Some(tier) => Ok(tier),
        None => tiers
            .iter()
            .find(|tier| tier.is_default)
            .ok_or(SettlementError::NoPricingAvailable { requested_days }),
    }
}
