//! Moneyness conventions.
//!
//! The SABR expansion is written in terms of `ln(F/K)`, while strike grids
//! are usually quoted as simple moneyness `K/F`.

/// Convert a strike to log-moneyness as the SABR expansion uses it: `ln(F / K)`.
///
/// Positive for strikes below the forward.
pub fn log_moneyness(forward: f64, strike: f64) -> f64 {
    (forward / strike).ln()
}

/// Convert a strike to simple moneyness: `m = K / F`.
pub fn moneyness(strike: f64, forward: f64) -> f64 {
    strike / forward
}
