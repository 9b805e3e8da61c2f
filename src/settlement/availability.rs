//! Extension conflict gate.
//!
//! Stateless predicate over a caller-supplied snapshot of existing
//! bookings; re-evaluated on every call, owns no storage.

use chrono::NaiveDate;
use uuid::Uuid;

use super::models::{AvailabilityCheckResult, BookingConflict, BookingStatus, BookingWindow};
use super::SettlementError;

/// Check whether `requested_quantity` units of an item are free at a
/// location over an inclusive candidate window.
///
/// A snapshot row conflicts when its date range overlaps the candidate
/// window and it is not cancelled. `exclude_booking_id` lets an in-progress
/// extension ignore its own prior reservation. Rows for other items or
/// locations are skipped even if the caller forgot to filter them out.
#[allow(clippy::too_many_arguments)]
pub fn check_availability(
    snapshot: &[BookingWindow],
    total_quantity: u32,
    item_id: Uuid,
    location_id: Uuid,
    requested_quantity: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    exclude_booking_id: Option<Uuid>,
) -> Result<AvailabilityCheckResult, SettlementError> {
    if end_date < start_date {
        return Err(SettlementError::InvalidDateRange {
            start: start_date,
            end: end_date,
        });
    }
    if requested_quantity == 0 {
        return Err(SettlementError::InvalidInput {
            field: "requested_quantity",
            message: "must be a positive integer".to_string(),
        });
    }

    let mut reserved: u32 = 0;
    let mut conflicts = Vec::new();

    for booking in snapshot {
        if booking.item_id != item_id || booking.location_id != location_id {
            continue;
        }
        if booking.status == BookingStatus::Cancelled {
            continue;
        }
        if exclude_booking_id == Some(booking.booking_id) {
            continue;
        }
        if !booking.overlaps(start_date, end_date) {
            continue;
        }

        reserved = reserved.saturating_add(booking.quantity);
        conflicts.push(BookingConflict {
            booking_id: booking.booking_id,
            quantity: booking.quantity,
            start_date: booking.start_date,
            end_date: booking.end_date,
        });
    }

    // An overbooked snapshot saturates at zero rather than going negative.
    let available_quantity = total_quantity.saturating_sub(reserved);

    Ok(AvailabilityCheckResult {
        is_available: available_quantity >= requested_quantity,
        available_quantity,
        total_quantity,
        conflicts,
    })
}
