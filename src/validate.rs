//! Input validation helpers.
//!
//! Standardizes validation across the crate using `!is_finite()` to reject
//! NaN, +Inf, and -Inf uniformly.

use crate::error::SabrError;

/// Validate that a value is strictly positive and finite (rejects NaN, Inf, zero, negatives).
pub(crate) fn validate_positive(value: f64, name: &str) -> crate::error::Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SabrError::InvalidParameter {
            message: format!("{name} must be positive and finite, got {value}"),
        });
    }
    Ok(value)
}

/// Validate that a value is non-negative and finite (rejects NaN, Inf, negatives).
pub(crate) fn validate_non_negative(value: f64, name: &str) -> crate::error::Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(SabrError::InvalidParameter {
            message: format!("{name} must be non-negative and finite, got {value}"),
        });
    }
    Ok(value)
}

/// Validate that a value lies in the closed interval `[lo, hi]` (rejects NaN).
pub(crate) fn validate_in_range(
    value: f64,
    lo: f64,
    hi: f64,
    name: &str,
) -> crate::error::Result<f64> {
    if !(lo..=hi).contains(&value) {
        return Err(SabrError::InvalidParameter {
            message: format!("{name} must be in [{lo}, {hi}], got {value}"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_accepts_and_rejects() {
        assert_eq!(validate_positive(1.5, "x").unwrap(), 1.5);
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(validate_positive(bad, "x").is_err());
        }
    }

    #[test]
    fn non_negative_allows_zero() {
        assert_eq!(validate_non_negative(0.0, "x").unwrap(), 0.0);
        assert!(validate_non_negative(-1e-15, "x").is_err());
        assert!(validate_non_negative(f64::INFINITY, "x").is_err());
    }

    #[test]
    fn range_is_closed_and_rejects_nan() {
        assert!(validate_in_range(-1.0, -1.0, 1.0, "rho").is_ok());
        assert!(validate_in_range(1.0, -1.0, 1.0, "rho").is_ok());
        assert!(validate_in_range(1.0 + 1e-12, -1.0, 1.0, "rho").is_err());
        assert!(validate_in_range(f64::NAN, -1.0, 1.0, "rho").is_err());
    }

    #[test]
    fn message_names_the_field() {
        let err = validate_in_range(2.0, 0.0, 1.0, "beta").unwrap_err();
        assert!(format!("{err}").contains("beta"));
    }
}
