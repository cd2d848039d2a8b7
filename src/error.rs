//! Error types for the sabrvol library.
//!
//! All fallible operations return `Result<T, SabrError>` rather than panicking,
//! so callers (a web form, a batch job) decide how to report a bad input or a
//! degenerate evaluation.

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, SabrError>;

/// Errors that can occur while evaluating SABR implied volatilities.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SabrError {
    /// A model parameter or market input is outside its documented range
    /// (e.g., non-positive alpha, beta outside \[0, 1\], zero expiry).
    ///
    /// Retrying with the same input cannot succeed.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// The Hagan expansion is singular or produced a non-finite value
    /// (e.g., rho = 1 away from the money).
    #[error("numeric degeneracy: {message}")]
    NumericDegeneracy { message: String },
}
