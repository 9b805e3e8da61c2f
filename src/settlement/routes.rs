//! Settlement route handlers.
//!
//! JSON endpoints the rental application calls in place of invoking the
//! library directly. Handlers validate nothing themselves; the service
//! layer and calculators own all the rules.

use axum::{
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;

use super::requests::{AvailabilityRequest, PriceLineRequest, SettleRequest};
use super::responses::{AvailabilityResponse, LinePricingResponse, SettlementResponse};
use super::services;

/// Build the settlement router.
pub fn router() -> Router {
    Router::new()
        .route("/api/settlement/price-line", post(price_line))
        .route("/api/settlement/settle", post(settle))
        .route("/api/settlement/availability", post(availability))
        .route("/healthz", get(healthz))
}

async fn price_line(Json(req): Json<PriceLineRequest>) -> Result<Json<LinePricingResponse>> {
    let pricing = services::price_rental_line(&req.tiers, &req.line)?;
    Ok(Json(pricing.into()))
}

async fn settle(Json(req): Json<SettleRequest>) -> Result<Json<SettlementResponse>> {
    let result = services::settle_return(&req.input)?;
    Ok(Json(result.into()))
}

async fn availability(Json(req): Json<AvailabilityRequest>) -> Result<Json<AvailabilityResponse>> {
    let result = services::check_extension(
        &req.bookings,
        req.total_quantity,
        req.item_id,
        req.location_id,
        req.quantity,
        req.start_date,
        req.end_date,
        req.exclude_booking_id,
    )?;
    Ok(Json(result.into()))
}

async fn healthz() -> &'static str {
    "ok"
}
