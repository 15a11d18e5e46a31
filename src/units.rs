//! Display-unit / base-unit currency conversion
//!
//! The ledger accounts in whole base units (lamports); the storefront UI
//! speaks display units (SOL). The conversion is a fixed exact multiplier
//! with floor semantics on the way down, so a fractional remainder can never
//! round a buyer up by one base unit.

use crate::errors::{OrchestratorError, Result};
use solana_sdk::native_token::LAMPORTS_PER_SOL;

/// Base units per display unit, fixed by the ledger
pub const BASE_UNITS_PER_DISPLAY: u64 = LAMPORTS_PER_SOL;

/// Convert a display-unit amount into whole base units, flooring fractions
///
/// Rejects non-finite, negative, and overflow-range inputs with
/// `InvalidInput`. `0.0` is a valid amount here; callers that require a
/// positive payment enforce that themselves.
pub fn to_base_units(display: f64) -> Result<u64> {
    if !display.is_finite() {
        return Err(OrchestratorError::invalid_input(format!(
            "amount must be finite, got {display}"
        )));
    }
    if display < 0.0 {
        return Err(OrchestratorError::invalid_input(format!(
            "amount must be non-negative, got {display}"
        )));
    }

    let scaled = display * BASE_UNITS_PER_DISPLAY as f64;
    if scaled >= u64::MAX as f64 {
        return Err(OrchestratorError::invalid_input(format!(
            "amount {display} overflows base units"
        )));
    }

    Ok(scaled.floor() as u64)
}

/// Convert base units back to display units for presentation
///
/// Integer-splits the value into whole and fractional parts before touching
/// floating point, so whole-unit amounts round-trip exactly through
/// [`to_base_units`].
pub fn to_display_units(base: u64) -> f64 {
    let whole = base / BASE_UNITS_PER_DISPLAY;
    let frac = base % BASE_UNITS_PER_DISPLAY;
    whole as f64 + frac as f64 / BASE_UNITS_PER_DISPLAY as f64
}
