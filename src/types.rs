//! Core domain types for SABR smile evaluation.
//!
//! These newtypes wrap `f64` to provide compile-time type safety, preventing
//! accidental mixing of a strike with a volatility in smile output.
//!
//! **Outputs use newtypes**: [`Vol`], [`Variance`], [`Strike`] wrap return
//! values. **Inputs use bare `f64`**: `implied_volatility(forward, strike, ..)`
//! takes raw floats, validated on entry.
//!
//! # Why no `Eq` or `Ord`?
//! These types wrap `f64`, which does not implement `Eq` or `Ord` because `NaN`
//! breaks total ordering. We derive `PartialEq` and `PartialOrd` only.

use serde::{Deserialize, Serialize};

/// Strike price `K` of an option contract.
///
/// # Examples
/// ```
/// use sabrvol::types::Strike;
/// let strike = Strike(100.0);
/// assert_eq!(strike.0, 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Strike(pub f64);

/// Implied Black volatility `σ`, measured as annualized standard deviation.
///
/// A vol of 0.20 represents 20% annualized volatility.
///
/// # Examples
/// ```
/// use sabrvol::types::Vol;
/// let vol = Vol(0.20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Vol(pub f64);

/// Total Black variance `σ²T`.
///
/// # Examples
/// ```
/// use sabrvol::types::Variance;
/// let var = Variance(0.04); // 20% vol over one year
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Variance(pub f64);
