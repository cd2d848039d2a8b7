//! SABR (Stochastic Alpha Beta Rho) smile model.
//!
//! SABR models the forward price as a CEV process with stochastic volatility:
//!
//! ```text
//! dF = σ · F^β · dW₁
//! dσ = ν · σ · dW₂
//! dW₁·dW₂ = ρ dt
//! ```
//!
//! The Hagan formula provides a closed-form approximation for Black implied
//! volatility as a function of strike. The expansion has a removable
//! singularity at `K = F` (`ln(F/K) → 0` makes `z/χ(z)` a 0/0), so evaluation
//! dispatches on the at-the-money condition:
//!
//! ```text
//! ATM:      σ = α / F^(1−β) · C(F^(1−β))
//! general:  σ = α / (fk · D) · z / χ(z) · C(fk)
//!
//! fk   = (F·K)^((1−β)/2)
//! z    = ν/α · fk · ln(F/K)
//! χ(z) = ln((√(1 − 2ρz + z²) + z − ρ) / (1 − ρ))
//! D    = 1 + (1−β)²/24 · ln²(F/K) + (1−β)⁴/1920 · ln⁴(F/K)
//! C(x) = 1 + T · ((1−β)²α²/(24x²) + ρβαν/(4x) + (2 − 3ρ²)ν²/24)
//! ```
//!
//! # Example
//!
//! ```
//! use sabrvol::smile::{SabrParameters, implied_volatility, volatility_smile};
//!
//! let params = SabrParameters::new(0.2, 0.5, -0.3, 0.4).unwrap();
//! let atm = implied_volatility(100.0, 100.0, 1.0, &params).unwrap();
//! assert!((atm.0 - 0.02022475).abs() < 1e-9);
//!
//! let smile = volatility_smile(100.0, 1.0, &params, &[80.0, 100.0, 120.0]).unwrap();
//! assert_eq!(smile.len(), 3);
//! assert!(smile.vols()[0] > smile.vols()[1]);
//! ```
//!
//! # References
//! - Hagan, P. et al. "Managing Smile Risk" (2002)

use serde::{Deserialize, Serialize};

use crate::conventions::log_moneyness;
use crate::error::{self, SabrError};
use crate::smile::grid::StrikeGrid;
use crate::smile::{SmilePoint, SmileSection, VolatilitySmile};
use crate::types::{Strike, Vol};
use crate::validate::{validate_in_range, validate_non_negative, validate_positive};

/// Relative distance `|F − K| / F` below which a strike is treated as at the money.
pub const ATM_TOLERANCE: f64 = 1e-12;

/// Below this `|z|`, `z/χ(z)` is taken from its Taylor series instead of the
/// closed form, which loses all precision as `χ(z) → 0`.
pub const Z_SERIES_THRESHOLD: f64 = 1e-6;

/// `1 − ρ` below this is treated as `ρ = 1`, where `χ(z)` is undefined away from
/// the money; `1 + ρ` below this is treated as `ρ = −1`.
pub const RHO_DEGENERACY_TOLERANCE: f64 = 1e-12;

/// SABR model parameters for one underlying and expiry.
///
/// Always valid once constructed: [`SabrParameters::new`] and serde
/// deserialization both enforce the ranges below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SabrParametersRaw")]
pub struct SabrParameters {
    /// Initial vol level α > 0.
    alpha: f64,
    /// CEV exponent β ∈ \[0, 1\] (0 = normal, 1 = lognormal backbone).
    beta: f64,
    /// Forward-vol correlation ρ ∈ \[−1, 1\].
    rho: f64,
    /// Vol-of-vol ν ≥ 0 (ν = 0 reduces to the CEV model).
    volvol: f64,
}

#[derive(Deserialize)]
struct SabrParametersRaw {
    alpha: f64,
    beta: f64,
    rho: f64,
    volvol: f64,
}

impl TryFrom<SabrParametersRaw> for SabrParameters {
    type Error = SabrError;
    fn try_from(raw: SabrParametersRaw) -> Result<Self, Self::Error> {
        Self::new(raw.alpha, raw.beta, raw.rho, raw.volvol)
    }
}

impl SabrParameters {
    /// Create a validated SABR parameter set.
    ///
    /// `rho = ±1` is accepted; an evaluation that hits the resulting
    /// singularity reports [`SabrError::NumericDegeneracy`] instead.
    ///
    /// # Errors
    /// Returns [`SabrError::InvalidParameter`] if `alpha <= 0`, `beta` is
    /// outside \[0, 1\], `rho` is outside \[−1, 1\], `volvol < 0`, or any value
    /// is NaN or infinite.
    pub fn new(alpha: f64, beta: f64, rho: f64, volvol: f64) -> error::Result<Self> {
        validate_positive(alpha, "alpha")?;
        validate_in_range(beta, 0.0, 1.0, "beta")?;
        validate_in_range(rho, -1.0, 1.0, "rho")?;
        validate_non_negative(volvol, "volvol")?;
        Ok(Self {
            alpha,
            beta,
            rho,
            volvol,
        })
    }

    /// Returns the alpha (initial vol level) parameter.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the beta (CEV exponent) parameter.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Returns the rho (forward-vol correlation) parameter.
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Returns the volvol (vol-of-vol) parameter.
    pub fn volvol(&self) -> f64 {
        self.volvol
    }

    /// Hagan's expiry correction `C(x)` evaluated at the scaled forward `x`.
    fn expiry_correction(&self, fk: f64, time_to_expiry: f64) -> f64 {
        let one_minus_beta = 1.0 - self.beta;
        1.0 + time_to_expiry
            * (one_minus_beta.powi(2) * self.alpha.powi(2) / (24.0 * fk.powi(2))
                + 0.25 * self.rho * self.beta * self.alpha * self.volvol / fk
                + (2.0 - 3.0 * self.rho.powi(2)) * self.volvol.powi(2) / 24.0)
    }
}

/// One volatility query: a forward, a strike and a time to expiry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketPoint {
    forward: f64,
    strike: f64,
    time_to_expiry: f64,
}

impl MarketPoint {
    /// # Errors
    /// Returns [`SabrError::InvalidParameter`] unless all three inputs are
    /// positive and finite.
    pub fn new(forward: f64, strike: f64, time_to_expiry: f64) -> error::Result<Self> {
        validate_positive(forward, "forward")?;
        validate_positive(strike, "strike")?;
        validate_positive(time_to_expiry, "time_to_expiry")?;
        Ok(Self {
            forward,
            strike,
            time_to_expiry,
        })
    }

    pub fn forward(&self) -> f64 {
        self.forward
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn time_to_expiry(&self) -> f64 {
        self.time_to_expiry
    }

    /// `ln(F / K)`.
    pub fn log_moneyness(&self) -> f64 {
        log_moneyness(self.forward, self.strike)
    }

    /// Whether the strike is within [`ATM_TOLERANCE`] (relative) of the forward.
    pub fn is_at_the_money(&self) -> bool {
        (self.forward - self.strike).abs() <= ATM_TOLERANCE * self.forward
    }

    /// Hagan implied Black volatility at this point.
    ///
    /// # Errors
    /// Returns [`SabrError::NumericDegeneracy`] if the expansion is singular
    /// (`rho = 1` away from the money) or yields a non-finite or non-positive vol.
    pub fn implied_vol(&self, params: &SabrParameters) -> error::Result<Vol> {
        let vol = if self.is_at_the_money() {
            self.atm_vol(params)
        } else {
            self.general_vol(params)?
        };

        if !vol.is_finite() || vol <= 0.0 {
            return Err(self.degenerate(params, format!("implied vol evaluated to {vol:e}")));
        }
        Ok(Vol(vol))
    }

    fn atm_vol(&self, params: &SabrParameters) -> f64 {
        let fk = self.forward.powf(1.0 - params.beta);
        params.alpha / fk * params.expiry_correction(fk, self.time_to_expiry)
    }

    fn general_vol(&self, params: &SabrParameters) -> error::Result<f64> {
        let one_minus_beta = 1.0 - params.beta;
        let fk = (self.forward * self.strike).powf(one_minus_beta / 2.0);
        let log_fk = self.log_moneyness();
        let z = params.volvol / params.alpha * fk * log_fk;

        let ratio = z_over_chi(z, params.rho)
            .ok_or_else(|| self.degenerate(params, format!("chi(z) is singular at z={z:e}")))?;

        let denom = fk
            * (1.0
                + one_minus_beta.powi(2) / 24.0 * log_fk.powi(2)
                + one_minus_beta.powi(4) / 1920.0 * log_fk.powi(4));

        Ok(params.alpha / denom * ratio * params.expiry_correction(fk, self.time_to_expiry))
    }

    fn degenerate(&self, params: &SabrParameters, detail: String) -> SabrError {
        #[cfg(feature = "logging")]
        tracing::debug!(
            forward = self.forward,
            strike = self.strike,
            rho = params.rho,
            volvol = params.volvol,
            %detail,
            "SABR evaluation degenerate"
        );
        #[cfg(not(feature = "logging"))]
        let _ = params;

        SabrError::NumericDegeneracy {
            message: format!("F={:e}, K={:e}: {detail}", self.forward, self.strike),
        }
    }
}

/// `z / χ(z)`, or `None` where `χ` is singular or non-finite.
///
/// `rho = 1` is rejected for every `z` so that a smile never mixes values
/// and errors depending on how close a strike sits to the forward.
fn z_over_chi(z: f64, rho: f64) -> Option<f64> {
    let one_minus_rho = 1.0 - rho;
    if one_minus_rho < RHO_DEGENERACY_TOLERANCE {
        return None;
    }
    if z.abs() < Z_SERIES_THRESHOLD {
        return Some(1.0 - 0.5 * rho * z + (2.0 - 3.0 * rho * rho) * z * z / 12.0);
    }
    // rho = -1: the numerator |1 + z| + z + 1 vanishes for z <= -1.
    if 1.0 + rho < RHO_DEGENERACY_TOLERANCE && z <= -1.0 {
        return None;
    }
    // Non-negative for |rho| <= 1; clamp round-off near the boundary.
    let disc = (1.0 - 2.0 * rho * z + z * z).max(0.0);
    let chi = ((disc.sqrt() + z - rho) / one_minus_rho).ln();
    if !chi.is_finite() || chi == 0.0 {
        return None;
    }
    Some(z / chi)
}

/// SABR implied Black volatility for a single strike.
///
/// # Errors
/// Returns [`SabrError::InvalidParameter`] if `forward`, `strike` or
/// `time_to_expiry` is non-positive or non-finite, and
/// [`SabrError::NumericDegeneracy`] if the expansion breaks down.
pub fn implied_volatility(
    forward: f64,
    strike: f64,
    time_to_expiry: f64,
    params: &SabrParameters,
) -> error::Result<Vol> {
    MarketPoint::new(forward, strike, time_to_expiry)?.implied_vol(params)
}

/// SABR implied volatilities across a strike sequence.
///
/// The result has one point per input strike, in input order. Evaluation is
/// all-or-nothing: the first failing strike aborts the batch and its error
/// names the strike's index.
///
/// # Errors
/// Returns [`SabrError::InvalidParameter`] for an empty strike slice or any
/// invalid input, [`SabrError::NumericDegeneracy`] if any strike is degenerate.
pub fn volatility_smile(
    forward: f64,
    time_to_expiry: f64,
    params: &SabrParameters,
    strikes: &[f64],
) -> error::Result<VolatilitySmile> {
    #[cfg(feature = "logging")]
    tracing::debug!(
        forward,
        time_to_expiry,
        n_strikes = strikes.len(),
        "SABR smile evaluation started"
    );

    validate_positive(forward, "forward")?;
    validate_positive(time_to_expiry, "time_to_expiry")?;
    if strikes.is_empty() {
        return Err(SabrError::InvalidParameter {
            message: "strike sequence is empty".into(),
        });
    }

    let points = strikes
        .iter()
        .enumerate()
        .map(|(i, &strike)| {
            let vol = implied_volatility(forward, strike, time_to_expiry, params)
                .map_err(|e| at_strike(e, i))?;
            Ok(SmilePoint {
                strike: Strike(strike),
                vol,
            })
        })
        .collect::<error::Result<Vec<_>>>()?;

    Ok(VolatilitySmile::new(forward, time_to_expiry, points))
}

fn at_strike(err: SabrError, index: usize) -> SabrError {
    match err {
        SabrError::InvalidParameter { message } => SabrError::InvalidParameter {
            message: format!("strike #{index}: {message}"),
        },
        SabrError::NumericDegeneracy { message } => SabrError::NumericDegeneracy {
            message: format!("strike #{index}: {message}"),
        },
    }
}

/// SABR volatility smile at a fixed forward and expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SabrSmileRaw", into = "SabrSmileRaw")]
pub struct SabrSmile {
    forward: f64,
    expiry: f64,
    params: SabrParameters,
}

#[derive(Serialize, Deserialize)]
struct SabrSmileRaw {
    forward: f64,
    expiry: f64,
    alpha: f64,
    beta: f64,
    rho: f64,
    volvol: f64,
}

impl TryFrom<SabrSmileRaw> for SabrSmile {
    type Error = SabrError;
    fn try_from(raw: SabrSmileRaw) -> Result<Self, Self::Error> {
        Self::from_raw(
            raw.forward,
            raw.expiry,
            raw.alpha,
            raw.beta,
            raw.rho,
            raw.volvol,
        )
    }
}

impl From<SabrSmile> for SabrSmileRaw {
    fn from(s: SabrSmile) -> Self {
        Self {
            forward: s.forward,
            expiry: s.expiry,
            alpha: s.params.alpha,
            beta: s.params.beta,
            rho: s.params.rho,
            volvol: s.params.volvol,
        }
    }
}

impl SabrSmile {
    /// Create a SABR smile from a validated parameter set.
    ///
    /// # Errors
    /// Returns [`SabrError::InvalidParameter`] if `forward` or `expiry` is
    /// non-positive or non-finite.
    pub fn new(forward: f64, expiry: f64, params: SabrParameters) -> error::Result<Self> {
        validate_positive(forward, "forward")?;
        validate_positive(expiry, "expiry")?;
        Ok(Self {
            forward,
            expiry,
            params,
        })
    }

    /// Create a SABR smile from raw parameter values.
    ///
    /// # Errors
    /// Returns [`SabrError::InvalidParameter`] if any value is out of range.
    pub fn from_raw(
        forward: f64,
        expiry: f64,
        alpha: f64,
        beta: f64,
        rho: f64,
        volvol: f64,
    ) -> error::Result<Self> {
        Self::new(forward, expiry, SabrParameters::new(alpha, beta, rho, volvol)?)
    }

    pub fn params(&self) -> &SabrParameters {
        &self.params
    }

    /// Evaluate the smile at the given strikes.
    ///
    /// # Errors
    /// See [`volatility_smile`].
    pub fn smile(&self, strikes: &[f64]) -> error::Result<VolatilitySmile> {
        volatility_smile(self.forward, self.expiry, &self.params, strikes)
    }

    /// Evaluate the smile on a strike grid around this smile's forward.
    ///
    /// # Errors
    /// Returns [`SabrError::InvalidParameter`] for an invalid grid, otherwise
    /// see [`volatility_smile`].
    pub fn smile_on(&self, grid: &StrikeGrid) -> error::Result<VolatilitySmile> {
        let strikes = grid.strikes(self.forward)?;
        self.smile(&strikes)
    }
}

impl SmileSection for SabrSmile {
    fn vol(&self, strike: f64) -> error::Result<Vol> {
        implied_volatility(self.forward, strike, self.expiry, &self.params)
    }

    fn forward(&self) -> f64 {
        self.forward
    }

    fn expiry(&self) -> f64 {
        self.expiry
    }
}
