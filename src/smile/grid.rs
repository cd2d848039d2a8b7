//! Strike grid configuration.
//!
//! A smile is displayed over an evenly spaced range of strikes around the
//! forward, e.g. 10 points between 80% and 120% of F.
//!
//! ```
//! use sabrvol::smile::StrikeGrid;
//!
//! let strikes = StrikeGrid::default().strikes(100.0).unwrap();
//! assert_eq!(strikes.len(), 10);
//! assert!((strikes[0] - 80.0).abs() < 1e-12);
//! assert!((strikes[9] - 120.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::conventions::moneyness;
use crate::error::{self, SabrError};
use crate::validate::validate_positive;

/// Largest number of strikes a grid may generate.
pub const MAX_GRID_POINTS: usize = 10_000;

/// Evenly spaced strikes between `lower · F` and `upper · F`, inclusive.
///
/// Bounds are moneyness fractions of the forward. Missing fields fall back
/// to the defaults (0.8, 1.2, 10 points) when deserialized, and the result
/// is validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StrikeGridRaw")]
pub struct StrikeGrid {
    /// Lowest strike as a fraction of the forward.
    pub lower: f64,
    /// Highest strike as a fraction of the forward.
    pub upper: f64,
    /// Number of strikes, endpoints included.
    pub points: usize,
}

impl Default for StrikeGrid {
    fn default() -> Self {
        Self {
            lower: 0.8,
            upper: 1.2,
            points: 10,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct StrikeGridRaw {
    lower: f64,
    upper: f64,
    points: usize,
}

impl Default for StrikeGridRaw {
    fn default() -> Self {
        let StrikeGrid {
            lower,
            upper,
            points,
        } = StrikeGrid::default();
        Self {
            lower,
            upper,
            points,
        }
    }
}

impl TryFrom<StrikeGridRaw> for StrikeGrid {
    type Error = SabrError;

    fn try_from(raw: StrikeGridRaw) -> Result<Self, Self::Error> {
        Self::new(raw.lower, raw.upper, raw.points)
    }
}

impl StrikeGrid {
    /// Create a moneyness grid.
    ///
    /// # Errors
    /// Returns [`SabrError::InvalidParameter`] if a bound is non-positive or
    /// non-finite, `lower > upper`, `points` is zero or above
    /// [`MAX_GRID_POINTS`], or a multi-point grid has `lower == upper`.
    pub fn new(lower: f64, upper: f64, points: usize) -> error::Result<Self> {
        let grid = Self {
            lower,
            upper,
            points,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Create a grid from absolute strike bounds, e.g. `[50, 150]`.
    ///
    /// The bounds are stored relative to `forward`.
    ///
    /// # Errors
    /// Same conditions as [`StrikeGrid::new`], plus a non-positive `forward`.
    pub fn absolute(forward: f64, lo: f64, hi: f64, points: usize) -> error::Result<Self> {
        validate_positive(forward, "forward")?;
        validate_positive(lo, "lower strike")?;
        validate_positive(hi, "upper strike")?;
        Self::new(moneyness(lo, forward), moneyness(hi, forward), points)
    }

    /// Strikes for the given forward, in increasing order.
    ///
    /// # Errors
    /// Returns [`SabrError::InvalidParameter`] for a non-positive forward or
    /// an invalid grid (fields are public, so they are re-checked here).
    pub fn strikes(&self, forward: f64) -> error::Result<Vec<f64>> {
        validate_positive(forward, "forward")?;
        self.validate()?;

        let lo = self.lower * forward;
        if self.points == 1 {
            return Ok(vec![lo]);
        }
        let hi = self.upper * forward;
        let step = (hi - lo) / (self.points - 1) as f64;
        // Pin the last point so floating-point drift cannot overshoot the bound.
        Ok((0..self.points)
            .map(|i| {
                if i == self.points - 1 {
                    hi
                } else {
                    lo + step * i as f64
                }
            })
            .collect())
    }

    fn validate(&self) -> error::Result<()> {
        validate_positive(self.lower, "grid lower bound")?;
        validate_positive(self.upper, "grid upper bound")?;
        if self.points == 0 {
            return Err(SabrError::InvalidParameter {
                message: "strike grid needs at least one point".into(),
            });
        }
        if self.points > MAX_GRID_POINTS {
            return Err(SabrError::InvalidParameter {
                message: format!(
                    "strike grid allows at most {MAX_GRID_POINTS} points, got {}",
                    self.points
                ),
            });
        }
        if self.lower > self.upper || (self.points > 1 && self.lower == self.upper) {
            return Err(SabrError::InvalidParameter {
                message: format!(
                    "strike grid bounds must satisfy lower < upper, got [{}, {}]",
                    self.lower, self.upper
                ),
            });
        }
        Ok(())
    }
}
