//! rentdesk-settlement: settlement and extension-pricing engine for rental
//! operations.
//!
//! The `settlement` module holds the pure calculators (rate resolution,
//! proration, late fees, deposit settlement, availability checking) plus
//! the JSON boundary that exposes them to the rental application.

pub mod error;
pub mod settlement;

pub use error::{AppError, Result};
