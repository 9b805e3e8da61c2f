//! Rental settlement engine.
//!
//! Pure calculation components for pricing rental lines, assessing late
//! fees and damage, settling deposits, and gating duration extensions on
//! booking availability. Called by the surrounding rental application via
//! HTTP/JSON; every function here is a synchronous pure function over
//! caller-supplied values.

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub mod adapter;
pub mod availability;
pub mod calculators;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod tiers;

// Re-export commonly used items
pub use availability::check_availability;
pub use calculators::{round_money, settle};
pub use routes::router;
pub use services::{price_rental_line, LinePricing};
pub use tiers::resolve_tier;

/// Settlement calculation error types.
///
/// All variants are local validation failures detected synchronously; none
/// are retryable. The calculator fails loudly rather than substituting a
/// best-guess financial figure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettlementError {
    #[error("invalid date range: {start} through {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("no pricing tier qualifies for {requested_days} day(s) and no default tier exists")]
    NoPricingAvailable { requested_days: i64 },

    #[error("damage penalty at index {index} is negative: {amount}")]
    InvalidPenalty { index: usize, amount: Decimal },

    #[error("invalid {field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    #[error("malformed backend payload: {0}")]
    MalformedPayload(String),
}

impl SettlementError {
    /// Stable machine-readable tag used in JSON error responses.
    pub fn error_type(&self) -> &'static str {
        match self {
            SettlementError::InvalidDateRange { .. } => "invalid_date_range",
            SettlementError::NoPricingAvailable { .. } => "no_pricing_available",
            SettlementError::InvalidPenalty { .. } => "invalid_penalty",
            SettlementError::InvalidInput { .. } => "invalid_input",
            SettlementError::MalformedPayload(_) => "malformed_payload",
        }
    }
}
