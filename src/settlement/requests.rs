//! Request DTOs for settlement API endpoints.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::models::{BookingWindow, PricingTier, RentalLineRequest, SettlementInput};

/// Request to price one rental line against an item's tiers.
#[derive(Debug, Deserialize)]
pub struct PriceLineRequest {
    pub tiers: Vec<PricingTier>,
    pub line: RentalLineRequest,
}

/// Request to settle a return.
#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    #[serde(flatten)]
    pub input: SettlementInput,
}

/// Request to check availability for an extension or a new booking.
///
/// The booking snapshot is supplied by the caller; the calculator owns no
/// storage.
#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    #[serde(default)]
    pub bookings: Vec<BookingWindow>,
    pub total_quantity: u32,
    pub item_id: Uuid,
    pub location_id: Uuid,
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub exclude_booking_id: Option<Uuid>,
}
