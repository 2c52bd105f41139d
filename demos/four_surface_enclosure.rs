use std::path::Path;

use anyhow::Result;
use radiant::io::{Delimiter, read_view3d};
use radiant::numeric::DenseLu;
use radiant::{Blackbody, ExchangeConfig, TotalExchangeArea, solve_enclosure};

fn main() -> Result<()> {
    println!("Four-surface enclosure: net-radiation method vs. total exchange areas.");

    let enclosure = read_view3d(
        Path::new("demos/data/four_surface_view3d.txt"),
        Delimiter::Whitespace,
    )?;
    println!("Row sums: {:.6}", enclosure.row_sums());

    let temperatures = [1000.0, 600.0, 1000.0, 600.0];
    let solution = solve_enclosure(
        &enclosure,
        &temperatures,
        &Blackbody::default(),
        &DenseLu::default(),
    )?;

    let exchange = TotalExchangeArea::from_enclosure(&enclosure, &ExchangeConfig::default())?;
    let eb = ndarray::Array1::from(solution.emissive_power.clone());
    let q_zonal = exchange.heat_flow(eb.view())?;

    println!("{:>4} {:>10} {:>14} {:>14} {:>12} {:>12}", "i", "T [K]", "J [W/m2]", "q [W/m2]", "Q [W]", "Q_ss [W]");
    for i in 0..enclosure.len() {
        println!(
            "{:>4} {:>10.1} {:>14.2} {:>14.2} {:>12.2} {:>12.2}",
            i, temperatures[i], solution.radiosity[i], solution.heat_flux[i], solution.heat_rate[i], q_zonal[i]
        );
    }
    println!("SS =\n{:.6}", exchange.ss());
    Ok(())
}
