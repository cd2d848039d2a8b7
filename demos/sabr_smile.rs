//! SABR smile: evaluation across strikes and error reporting.
//!
//!   1. Evaluate the equity reference smile on 10 strikes from 80 to 120
//!   2. Compare backbones (beta) at fixed alpha, rho, volvol
//!   3. Show how invalid and degenerate inputs are reported
//!
//! Run with: `cargo run --example sabr_smile`

use sabrvol::smile::{SabrParameters, SabrSmile, SmileSection, StrikeGrid, volatility_smile};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ---------------------------------------------------------------
    // 1. Reference smile
    // ---------------------------------------------------------------

    let f0 = 100.0;
    let t = 1.0;

    let params = SabrParameters::new(
        0.2,  // alpha: initial vol level
        0.5,  // beta: CIR-like backbone
        -0.3, // rho: negative skew (equity)
        0.4,  // volvol: smile curvature
    )?;

    let strikes = StrikeGrid::default().strikes(f0)?;
    let smile = volatility_smile(f0, t, &params, &strikes)?;
    println!("{smile}");

    // ---------------------------------------------------------------
    // 2. Backbone comparison
    // ---------------------------------------------------------------

    println!("--- Backbone comparison ---\n");
    print!("{:>8}", "beta\\K");
    for &k in &[80.0, 90.0, 100.0, 110.0, 120.0] {
        print!("{k:>10.0}");
    }
    println!();
    println!("{}", "-".repeat(58));

    for beta in [0.0, 0.5, 1.0] {
        let model = SabrSmile::from_raw(f0, t, 0.2, beta, -0.3, 0.4)?;
        print!("{beta:>8.1}");
        for &k in &[80.0, 90.0, 100.0, 110.0, 120.0] {
            print!("{:>9.4}%", model.vol(k)?.0 * 100.0);
        }
        println!();
    }

    // ---------------------------------------------------------------
    // 3. Error reporting
    // ---------------------------------------------------------------

    println!("\n--- Error reporting ---\n");

    match SabrParameters::new(-0.1, 0.5, -0.3, 0.4) {
        Ok(_) => println!("alpha=-0.1 unexpectedly accepted"),
        Err(e) => println!("alpha=-0.1: {e}"),
    }

    let rho_one = SabrParameters::new(0.2, 0.5, 1.0, 0.4)?;
    match volatility_smile(f0, t, &rho_one, &strikes) {
        Ok(_) => println!("rho=1 unexpectedly evaluated"),
        Err(e) => println!("rho=1: {e}"),
    }

    Ok(())
}
