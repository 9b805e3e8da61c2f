//! Backend payload normalization.
//!
//! The rental backend has shipped the same quantities under several field
//! names over time (`ratePerPeriod`, `rate_per_period`, `rate`, `price`,
//! ...). All of that tolerance lives here, once, at the boundary: payloads
//! are normalized into the domain model or rejected with
//! `MalformedPayload`. A missing rate is never defaulted to zero - a wrong
//! silent default would misstate what a customer owes.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use super::models::{BookingStatus, BookingWindow, PeriodType, PeriodUnit, PricingTier};
use super::SettlementError;

/// Normalize a tier-listing payload into validated pricing tiers.
///
/// Accepts a bare array, or an object wrapping the array under
/// `pricingTiers` / `pricing_tiers` / `tiers` / `data`.
pub fn tiers_from_payload(payload: &Value) -> Result<Vec<PricingTier>, SettlementError> {
    let items = unwrap_array(payload, &["pricingTiers", "pricing_tiers", "tiers", "data"])
        .ok_or_else(|| malformed("no tier array found in payload"))?;

    let mut tiers = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let tier = tier_from_value(item)
            .map_err(|e| malformed(&format!("tier at index {}: {}", index, e)))?;
        tier.validate()?;
        tiers.push(tier);
    }
    Ok(tiers)
}

/// Normalize a booking-listing payload into snapshot rows.
///
/// Accepts a bare array, or an object wrapping it under `bookings` /
/// `reservations` / `data`.
pub fn bookings_from_payload(payload: &Value) -> Result<Vec<BookingWindow>, SettlementError> {
    let items = unwrap_array(payload, &["bookings", "reservations", "data"])
        .ok_or_else(|| malformed("no booking array found in payload"))?;

    let mut bookings = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let booking = booking_from_value(item)
            .map_err(|e| malformed(&format!("booking at index {}: {}", index, e)))?;
        bookings.push(booking);
    }
    Ok(bookings)
}

fn tier_from_value(value: &Value) -> Result<PricingTier, SettlementError> {
    let id = uuid_field(value, &["id", "tierId", "tier_id"])
        .ok_or_else(|| malformed("missing tier id"))?;

    let rate_per_period = decimal_field(
        value,
        &["ratePerPeriod", "rate_per_period", "rate", "price"],
    )
    .ok_or_else(|| malformed("missing rate"))?;

    let period_type = string_field(value, &["periodType", "period_type", "type"])
        .map(|s| parse_period_type(&s))
        .transpose()?
        .unwrap_or(PeriodType::Daily);

    // Named plans carry their own basis; only custom plans need the raw
    // unit/value fields.
    let (period_unit, period_value) = match period_type.fixed_basis() {
        Some(basis) => basis,
        None => {
            let unit = string_field(value, &["periodUnit", "period_unit", "unit"])
                .map(|s| parse_period_unit(&s))
                .transpose()?
                .ok_or_else(|| malformed("custom tier missing period unit"))?;
            let val = integer_field(value, &["periodValue", "period_value", "duration"])
                .ok_or_else(|| malformed("custom tier missing period value"))?;
            (unit, val)
        }
    };

    Ok(PricingTier {
        id,
        period_type,
        period_unit,
        period_value,
        rate_per_period,
        min_periods: integer_field(value, &["minPeriods", "min_periods"]),
        max_periods: integer_field(value, &["maxPeriods", "max_periods"]),
        is_default: bool_field(value, &["isDefault", "is_default", "default"]),
        priority: integer_field(value, &["priority"]).map_or(0, |p| p as i32),
    })
}

fn booking_from_value(value: &Value) -> Result<BookingWindow, SettlementError> {
    let booking_id = uuid_field(value, &["bookingId", "booking_id", "id"])
        .ok_or_else(|| malformed("missing booking id"))?;
    let item_id = uuid_field(value, &["itemId", "item_id"])
        .ok_or_else(|| malformed("missing item id"))?;
    let location_id = uuid_field(value, &["locationId", "location_id"])
        .ok_or_else(|| malformed("missing location id"))?;
    let quantity = integer_field(value, &["quantity", "qty", "bookedQuantity"])
        .ok_or_else(|| malformed("missing quantity"))?;
    let start_date = date_field(value, &["startDate", "start_date", "from"])
        .ok_or_else(|| malformed("missing or unparseable start date"))?;
    let end_date = date_field(value, &["endDate", "end_date", "to"])
        .ok_or_else(|| malformed("missing or unparseable end date"))?;

    // A row with no status still blocks the window; only an explicit
    // cancellation frees it.
    let status = string_field(value, &["status", "bookingStatus", "booking_status"])
        .map(|s| parse_booking_status(&s))
        .transpose()?
        .unwrap_or(BookingStatus::Confirmed);

    Ok(BookingWindow {
        booking_id,
        item_id,
        location_id,
        quantity,
        start_date,
        end_date,
        status,
    })
}

fn parse_period_type(s: &str) -> Result<PeriodType, SettlementError> {
    match s.to_ascii_lowercase().as_str() {
        "hourly" => Ok(PeriodType::Hourly),
        "daily" => Ok(PeriodType::Daily),
        "weekly" => Ok(PeriodType::Weekly),
        "monthly" => Ok(PeriodType::Monthly),
        "custom" => Ok(PeriodType::Custom),
        other => Err(malformed(&format!("unknown period type '{}'", other))),
    }
}

fn parse_period_unit(s: &str) -> Result<PeriodUnit, SettlementError> {
    match s.to_ascii_lowercase().as_str() {
        "hour" | "hours" => Ok(PeriodUnit::Hour),
        "day" | "days" => Ok(PeriodUnit::Day),
        other => Err(malformed(&format!("unknown period unit '{}'", other))),
    }
}

fn parse_booking_status(s: &str) -> Result<BookingStatus, SettlementError> {
    match s.to_ascii_lowercase().as_str() {
        "pending" => Ok(BookingStatus::Pending),
        "confirmed" => Ok(BookingStatus::Confirmed),
        "active" => Ok(BookingStatus::Active),
        "completed" => Ok(BookingStatus::Completed),
        "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
        other => Err(malformed(&format!("unknown booking status '{}'", other))),
    }
}

fn unwrap_array<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    if let Some(items) = payload.as_array() {
        return Some(items);
    }
    keys.iter()
        .find_map(|key| payload.get(key))
        .and_then(Value::as_array)
}

/// First present alias wins. Accepts both string-encoded and numeric
/// decimals, the two encodings the backend has used.
fn decimal_field(value: &Value, keys: &[&str]) -> Option<Decimal> {
    let field = keys.iter().find_map(|key| value.get(key))?;
    match field {
        Value::String(s) => s.parse::<Decimal>().ok(),
        Value::Number(_) => field.as_f64().and_then(|f| Decimal::try_from(f).ok()),
        _ => None,
    }
}

fn integer_field(value: &Value, keys: &[&str]) -> Option<u32> {
    let field = keys.iter().find_map(|key| value.get(key))?;
    match field {
        Value::Number(_) => field.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.parse::<u32>().ok(),
        _ => None,
    }
}

fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn bool_field(value: &Value, keys: &[&str]) -> bool {
    keys.iter()
        .find_map(|key| value.get(key))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn uuid_field(value: &Value, keys: &[&str]) -> Option<Uuid> {
    string_field(value, keys).and_then(|s| Uuid::parse_str(&s).ok())
}

/// Dates arrive either as plain `YYYY-MM-DD` or as RFC 3339 timestamps.
fn date_field(value: &Value, keys: &[&str]) -> Option<NaiveDate> {
    let s = string_field(value, keys)?;
    s.parse::<NaiveDate>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(&s).ok().map(|dt| dt.date_naive()))
}

fn malformed(message: &str) -> SettlementError {
    SettlementError::MalformedPayload(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    const TIER_ID: &str = "7e2c9c5a-3f3a-4e9e-9d7c-0a1b2c3d4e5f";

    #[test]
    fn test_tier_camel_case_payload() {
        let payload = json!({
            "pricingTiers": [{
                "id": TIER_ID,
                "periodType": "weekly",
                "ratePerPeriod": "60.00",
                "minPeriods": 1,
                "maxPeriods": 4,
                "isDefault": true,
                "priority": 1
            }]
        });

        let tiers = tiers_from_payload(&payload).unwrap();
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0].period_type, PeriodType::Weekly);
        assert_eq!(tiers[0].billing_basis(), (PeriodUnit::Day, 7));
        assert_eq!(tiers[0].rate_per_period, dec!(60.00));
        assert!(tiers[0].is_default);
    }

    #[test]
    fn test_tier_snake_case_and_numeric_rate() {
        let payload = json!({
            "tiers": [{
                "tier_id": TIER_ID,
                "period_type": "daily",
                "rate_per_period": 12.5
            }]
        });

        let tiers = tiers_from_payload(&payload).unwrap();
        assert_eq!(tiers[0].rate_per_period, dec!(12.5));
        assert_eq!(tiers[0].priority, 0);
        assert!(!tiers[0].is_default);
    }

    #[test]
    fn test_tier_bare_array_with_price_alias() {
        let payload = json!([{ "id": TIER_ID, "price": "9.99" }]);
        let tiers = tiers_from_payload(&payload).unwrap();
        // No period type defaults to daily.
        assert_eq!(tiers[0].period_type, PeriodType::Daily);
        assert_eq!(tiers[0].rate_per_period, dec!(9.99));
    }

    #[test]
    fn test_tier_custom_requires_basis() {
        let payload = json!([{
            "id": TIER_ID,
            "type": "custom",
            "rate": "5",
            "unit": "hours",
            "duration": 4
        }]);
        let tiers = tiers_from_payload(&payload).unwrap();
        assert_eq!(tiers[0].billing_basis(), (PeriodUnit::Hour, 4));

        let missing = json!([{ "id": TIER_ID, "type": "custom", "rate": "5" }]);
        assert!(matches!(
            tiers_from_payload(&missing),
            Err(SettlementError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_tier_missing_rate_fails_loudly() {
        let payload = json!([{ "id": TIER_ID, "periodType": "daily" }]);
        let err = tiers_from_payload(&payload);
        assert!(matches!(err, Err(SettlementError::MalformedPayload(_))));
    }

    #[test]
    fn test_tier_unknown_period_type_rejected() {
        let payload = json!([{ "id": TIER_ID, "rate": "5", "periodType": "fortnightly" }]);
        assert!(tiers_from_payload(&payload).is_err());
    }

    #[test]
    fn test_payload_without_array_rejected() {
        let payload = json!({ "message": "ok" });
        assert!(tiers_from_payload(&payload).is_err());
    }

    #[test]
    fn test_booking_normalization() {
        let booking_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();
        let location_id = Uuid::new_v4();
        let payload = json!({
            "bookings": [{
                "bookingId": booking_id.to_string(),
                "itemId": item_id.to_string(),
                "locationId": location_id.to_string(),
                "quantity": 3,
                "startDate": "2024-06-10",
                "endDate": "2024-06-15T00:00:00Z",
                "status": "CONFIRMED"
            }]
        });

        let bookings = bookings_from_payload(&payload).unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].booking_id, booking_id);
        assert_eq!(bookings[0].quantity, 3);
        assert_eq!(
            bookings[0].end_date,
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
        assert_eq!(bookings[0].status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_booking_missing_status_blocks_window() {
        let payload = json!([{
            "id": Uuid::new_v4().to_string(),
            "item_id": Uuid::new_v4().to_string(),
            "location_id": Uuid::new_v4().to_string(),
            "qty": "2",
            "from": "2024-06-10",
            "to": "2024-06-12"
        }]);

        let bookings = bookings_from_payload(&payload).unwrap();
        assert_eq!(bookings[0].status, BookingStatus::Confirmed);
        assert_eq!(bookings[0].quantity, 2);
    }

    #[test]
    fn test_booking_unparseable_date_rejected() {
        let payload = json!([{
            "id": Uuid::new_v4().to_string(),
            "item_id": Uuid::new_v4().to_string(),
            "location_id": Uuid::new_v4().to_string(),
            "quantity": 1,
            "startDate": "June 10th",
            "endDate": "2024-06-12"
        }]);
        assert!(matches!(
            bookings_from_payload(&payload),
            Err(SettlementError::MalformedPayload(_))
        ));
    }
}
