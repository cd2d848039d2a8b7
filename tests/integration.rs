//! Integration tests for the sabrvol public API.
//!
//! Exercises the path a display layer takes: build parameters from scalar
//! inputs, generate a strike grid, evaluate the smile, and hand the
//! (strike, vol) pairs on. Also covers error reporting and sharing across
//! threads.

use std::sync::Arc;
use std::thread;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use sabrvol::SabrError;
use sabrvol::smile::{
    MarketPoint, SabrParameters, SabrSmile, SmileSection, StrikeGrid, VolatilitySmile,
    implied_volatility, volatility_smile,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const F0: f64 = 100.0;
const T: f64 = 1.0;

/// Equity-style parameters from the reference scenario.
fn reference_params() -> SabrParameters {
    SabrParameters::new(0.2, 0.5, -0.3, 0.4).unwrap()
}

/// Ten evenly spaced strikes between 80 and 120, as the reference script uses.
fn reference_strikes() -> Vec<f64> {
    StrikeGrid::default().strikes(F0).unwrap()
}

// ---------------------------------------------------------------------------
// Reference scenario
// ---------------------------------------------------------------------------

#[test]
fn reference_atm_vol() {
    let v = implied_volatility(F0, F0, T, &reference_params()).unwrap();
    // 0.2 / sqrt(100) * 1.0112375
    assert_abs_diff_eq!(v.0, 0.02022475, epsilon = 1e-9);
}

#[test]
fn reference_smile_has_skew_and_wings() {
    let strikes = [80.0, 90.0, 100.0, 110.0, 120.0];
    let smile = volatility_smile(F0, T, &reference_params(), &strikes).unwrap();
    let vols = smile.vols();

    assert_eq!(smile.strikes(), strikes.to_vec());
    // Negative rho: downside vols dominate.
    assert!(vols[0] > vols[2]);
    assert!(vols[1] > vols[2]);
    assert!(vols[0] > vols[4]);
    // Monotone decreasing down to the money on the put side.
    assert!(vols[0] > vols[1]);
    for v in &vols {
        assert!(v.is_finite() && *v > 0.0);
    }
}

#[test]
fn reference_grid_smile_matches_pointwise() {
    let params = reference_params();
    let strikes = reference_strikes();
    let smile = volatility_smile(F0, T, &params, &strikes).unwrap();

    assert_eq!(smile.len(), 10);
    for p in &smile {
        let v = implied_volatility(F0, p.strike.0, T, &params).unwrap();
        assert_eq!(p.vol, v);
    }
}

#[test]
fn sabr_smile_and_free_functions_agree() {
    let model = SabrSmile::new(F0, T, reference_params()).unwrap();
    let via_model = model.smile_on(&StrikeGrid::default()).unwrap();
    let via_fn = volatility_smile(F0, T, &reference_params(), &reference_strikes()).unwrap();
    assert_eq!(via_model, via_fn);

    for k in [85.0, 100.0, 115.0] {
        assert_eq!(
            model.vol(k).unwrap(),
            implied_volatility(F0, k, T, &reference_params()).unwrap()
        );
    }
}

// ---------------------------------------------------------------------------
// Branch agreement
// ---------------------------------------------------------------------------

#[test]
fn general_branch_converges_to_atm_from_both_sides() {
    let params = reference_params();
    let atm = implied_volatility(F0, F0, T, &params).unwrap().0;

    let mut prev_gap = f64::INFINITY;
    for eps in [1e-3, 1e-4, 1e-5] {
        let below = implied_volatility(F0, F0 * (1.0 - eps), T, &params).unwrap().0;
        let above = implied_volatility(F0, F0 * (1.0 + eps), T, &params).unwrap().0;
        assert!((below - atm).abs() < 1e-4, "eps={eps}: below={below}, atm={atm}");
        assert!((above - atm).abs() < 1e-4, "eps={eps}: above={above}, atm={atm}");

        let gap = (below - atm).abs().max((above - atm).abs());
        assert!(gap < prev_gap, "gap should shrink as K -> F");
        prev_gap = gap;
    }
}

#[test]
fn market_point_evaluation_matches_free_function() {
    let params = reference_params();
    let point = MarketPoint::new(F0, 95.0, T).unwrap();
    assert!(!point.is_at_the_money());
    assert_relative_eq!(point.log_moneyness(), (100.0_f64 / 95.0).ln());
    assert_eq!(
        point.implied_vol(&params).unwrap(),
        implied_volatility(F0, 95.0, T, &params).unwrap()
    );
}

#[test]
fn longer_expiry_scales_only_the_correction() {
    // Leading order is expiry-independent; the correction grows linearly in T.
    let params = reference_params();
    let v1 = implied_volatility(F0, F0, 1.0, &params).unwrap().0;
    let v2 = implied_volatility(F0, F0, 2.0, &params).unwrap().0;
    let v0 = 0.02;
    assert_relative_eq!((v2 - v0) / (v1 - v0), 2.0, max_relative = 1e-9);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn negative_alpha_is_invalid_parameter() {
    let r = SabrParameters::new(-0.1, 0.5, -0.3, 0.4);
    assert!(matches!(r, Err(SabrError::InvalidParameter { .. })));
    let r = SabrSmile::from_raw(F0, T, -0.1, 0.5, -0.3, 0.4);
    assert!(matches!(r, Err(SabrError::InvalidParameter { .. })));
}

#[test]
fn rho_one_off_the_money_reports_degeneracy() {
    let params = SabrParameters::new(0.2, 0.5, 1.0, 0.4).unwrap();
    let r = implied_volatility(F0, 90.0, T, &params);
    assert!(matches!(r, Err(SabrError::NumericDegeneracy { .. })));

    let r = volatility_smile(F0, T, &params, &reference_strikes());
    assert!(matches!(r, Err(SabrError::NumericDegeneracy { .. })));
}

#[test]
fn errors_render_user_facing_messages() {
    let err = implied_volatility(F0, -1.0, T, &reference_params()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("strike"), "{msg}");

    let err = SabrParameters::new(0.2, 1.5, 0.0, 0.4).unwrap_err();
    assert!(err.to_string().contains("beta"));
}

// ---------------------------------------------------------------------------
// Serde (external display layer)
// ---------------------------------------------------------------------------

#[test]
fn form_like_json_to_smile_json() {
    let params: SabrParameters =
        serde_json::from_str(r#"{"alpha":0.2,"beta":0.5,"rho":-0.3,"volvol":0.4}"#).unwrap();
    let grid: StrikeGrid =
        serde_json::from_str(r#"{"lower":0.5,"upper":1.5,"points":50}"#).unwrap();

    let smile = volatility_smile(F0, T, &params, &grid.strikes(F0).unwrap()).unwrap();
    assert_eq!(smile.len(), 50);

    let json = serde_json::to_string(&smile).unwrap();
    let back: VolatilitySmile = serde_json::from_str(&json).unwrap();
    assert_eq!(back, smile);
}

#[test]
fn invalid_json_parameters_are_rejected() {
    for json in [
        r#"{"alpha":-0.1,"beta":0.5,"rho":-0.3,"volvol":0.4}"#,
        r#"{"alpha":0.2,"beta":1.5,"rho":-0.3,"volvol":0.4}"#,
        r#"{"alpha":0.2,"beta":0.5,"rho":-1.3,"volvol":0.4}"#,
        r#"{"alpha":0.2,"beta":0.5,"rho":-0.3,"volvol":-0.4}"#,
        r#"{"alpha":0.2,"beta":0.5,"rho":-0.3}"#,
    ] {
        assert!(serde_json::from_str::<SabrParameters>(json).is_err(), "{json}");
    }
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn public_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SabrParameters>();
    assert_send_sync::<MarketPoint>();
    assert_send_sync::<SabrSmile>();
    assert_send_sync::<VolatilitySmile>();
    assert_send_sync::<StrikeGrid>();
    assert_send_sync::<SabrError>();
}

#[test]
fn concurrent_requests_agree() {
    let model: Arc<dyn SmileSection> = Arc::new(SabrSmile::new(F0, T, reference_params()).unwrap());
    let expected: Vec<f64> = reference_strikes()
        .iter()
        .map(|&k| model.vol(k).unwrap().0)
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let model = Arc::clone(&model);
            thread::spawn(move || {
                reference_strikes()
                    .iter()
                    .map(|&k| model.vol(k).unwrap().0)
                    .collect::<Vec<f64>>()
            })
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
