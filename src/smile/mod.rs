//! Single-tenor volatility smiles.
//!
//! A smile represents how implied volatility varies with strike at a fixed
//! expiry. The model lives in [`sabr`]; [`VolatilitySmile`] is the evaluated
//! curve handed to display layers, and [`StrikeGrid`] generates the strikes.
//!
//! ## Models
//!
//! - [`SabrSmile`]: SABR stochastic vol model (Hagan et al.), 4 parameters

pub mod grid;
pub mod sabr;

pub use grid::{MAX_GRID_POINTS, StrikeGrid};
pub use sabr::{MarketPoint, SabrParameters, SabrSmile, implied_volatility, volatility_smile};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error;
use crate::types::{Strike, Variance, Vol};

/// A single-tenor volatility smile.
///
/// # Thread Safety
/// All implementations must be `Send + Sync` so a smile can be shared across
/// concurrent requests without locking.
///
/// # Error Handling
/// Methods return `Result` so implementations can report invalid strikes and
/// numerical failures rather than panicking.
pub trait SmileSection: Send + Sync {
    /// Implied Black volatility σ at the given strike.
    fn vol(&self, strike: f64) -> error::Result<Vol>;

    /// Total Black variance σ²T at the given strike.
    ///
    /// Default implementation derives from [`vol`](SmileSection::vol):
    /// `variance(K) = vol(K)² × expiry`.
    fn variance(&self, strike: f64) -> error::Result<Variance> {
        let v = self.vol(strike)?;
        Ok(Variance(v.0 * v.0 * self.expiry()))
    }

    /// Forward price F at this tenor.
    fn forward(&self) -> f64;

    /// Time to expiry T in years.
    fn expiry(&self) -> f64;
}

/// One evaluated point on a smile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmilePoint {
    pub strike: Strike,
    pub vol: Vol,
}

/// An evaluated volatility smile: `(strike, implied vol)` pairs for a fixed
/// forward and expiry.
///
/// Points keep the order of the strikes they were computed from; the smile
/// does not sort them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilitySmile {
    forward: f64,
    expiry: f64,
    points: Vec<SmilePoint>,
}

impl VolatilitySmile {
    /// Wrap already-evaluated points.
    pub fn new(forward: f64, expiry: f64, points: Vec<SmilePoint>) -> Self {
        Self {
            forward,
            expiry,
            points,
        }
    }

    pub fn forward(&self) -> f64 {
        self.forward
    }

    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    pub fn points(&self) -> &[SmilePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SmilePoint> {
        self.points.iter()
    }

    /// Strikes in smile order, e.g. for the x-axis of a chart.
    pub fn strikes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.strike.0).collect()
    }

    /// Implied vols in smile order, e.g. for the y-axis of a chart.
    pub fn vols(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.vol.0).collect()
    }
}

impl<'a> IntoIterator for &'a VolatilitySmile {
    type Item = &'a SmilePoint;
    type IntoIter = std::slice::Iter<'a, SmilePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Renders the smile as a strike / implied-vol table (vol in percent).
impl fmt::Display for VolatilitySmile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forward={}, Expiry={}y", self.forward, self.expiry)?;
        writeln!(f, "{:>10} {:>10}", "Strike", "Vol")?;
        writeln!(f, "{}", "-".repeat(21))?;
        for p in &self.points {
            writeln!(f, "{:>10.2} {:>9.4}%", p.strike.0, p.vol.0 * 100.0)?;
        }
        Ok(())
    }
}
