//! # sabrvol
//!
//! SABR implied volatility and volatility smiles.
//!
//! Evaluates Hagan's closed-form approximation of the Black implied
//! volatility under the SABR model for a single strike, and across a strike
//! sequence to produce a smile ready for display.
//!
//! ## Architecture
//!
//! - **`smile::sabr`**: the pricer: [`SabrParameters`], [`implied_volatility`],
//!   [`volatility_smile`], and the [`SabrSmile`] model
//! - **`smile`**: the [`SmileSection`] trait and the evaluated [`VolatilitySmile`]
//! - **`smile::grid`**: [`StrikeGrid`], evenly spaced strikes around the forward
//!
//! ## Design
//!
//! - **Newtypes for outputs, bare `f64` for inputs.** [`Vol`], [`Variance`] and
//!   [`Strike`] wrap return values. Inputs are validated on entry.
//! - **No panics.** Every fallible operation returns [`Result`]. Invalid input
//!   is [`SabrError::InvalidParameter`]; a singular or non-finite evaluation is
//!   [`SabrError::NumericDegeneracy`]. NaN never reaches the caller as a vol.
//! - **Pure.** No global or cached state; every call allocates fresh output.
//!   All types are `Send + Sync` and can be used from any number of threads.
//! - **Serializable.** Parameter sets, grids and smiles implement Serde, with
//!   validation on deserialization where invariants exist.
//!
//! ## Example
//!
//! ```
//! use sabrvol::{SabrSmile, SmileSection, StrikeGrid};
//!
//! let model = SabrSmile::from_raw(100.0, 1.0, 0.2, 0.5, -0.3, 0.4).unwrap();
//! let smile = model.smile_on(&StrikeGrid::default()).unwrap();
//! assert_eq!(smile.len(), 10);
//! assert!(model.vol(80.0).unwrap() > model.vol(100.0).unwrap());
//! ```

pub mod conventions;
pub mod error;
pub mod smile;
pub mod types;
mod validate;

#[doc(inline)]
pub use error::{Result, SabrError};
#[doc(inline)]
pub use smile::{
    MAX_GRID_POINTS, MarketPoint, SabrParameters, SabrSmile, SmilePoint, SmileSection, StrikeGrid,
    VolatilitySmile, implied_volatility, volatility_smile,
};
#[doc(inline)]
pub use types::{Strike, Variance, Vol};
