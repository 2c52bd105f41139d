use anyhow::Result;
use radiant::Blackbody;

fn main() -> Result<()> {
    println!("Blackbody spectral emissive power [W/(m2 um)].");
    let bb = Blackbody::default();
    let temperatures = [300.0, 800.0, 1500.0, 5800.0];

    print!("{:>10}", "lambda");
    for t in temperatures {
        print!("{:>14}", format!("{t} K"));
    }
    println!();
    for k in 0..=40 {
        let lambda = 0.1 * 1.2_f64.powi(k);
        print!("{lambda:>10.3}");
        for t in temperatures {
            print!("{:>14.4e}", bb.spectral_emissive_power(lambda, t, 1.0)?);
        }
        println!();
    }

    println!();
    for t in temperatures {
        let total = bb.total_emissive_power(t)?;
        println!(
            "T = {t:>6} K: E_b = {:.4e} W/m2, lambda_max = {:.3} um, f(0-lambda_max) = {:.4}",
            total.value,
            bb.peak_wavelength(t)?,
            bb.fraction_function(bb.peak_wavelength(t)?, t)?,
        );
    }
    Ok(())
}
