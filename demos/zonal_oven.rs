use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use radiant::io::{Delimiter, read_view3d};
use radiant::{
    ExchangeConfig, SolverState, SurfaceBoundary, TotalExchangeArea, ZonalConfig, ZonalSolver,
};

fn main() -> Result<()> {
    println!("Zonal method: cubic oven heated from the floor.");

    let cube = read_view3d(Path::new("demos/data/cube_view3d.txt"), Delimiter::Whitespace)?;
    let exchange = TotalExchangeArea::from_enclosure(&cube, &ExchangeConfig::default())?;

    // Floor receives 200 W/m2; all walls lose heat to 300 K through U = 0.15 W/(m2 K).
    let boundaries: Vec<SurfaceBoundary> = (0..cube.len())
        .map(|i| SurfaceBoundary::new(0.15, 10.0, if i == 0 { 200.0 } else { 0.0 }, 300.0))
        .collect();
    let initial = vec![300.0; cube.len()];

    let t0 = Instant::now();
    let mut solver = ZonalSolver::new(&exchange, &boundaries, &initial, ZonalConfig::default())?;
    loop {
        let state = solver.step()?;
        if let SolverState::Iterating { iteration, rms } | SolverState::Converged { iterations: iteration, rms } = state {
            println!("iteration {iteration:>3}: rms = {rms:.3e} K, T0 = {:.3} K", solver.temperatures()[0]);
        }
        if matches!(state, SolverState::Converged { .. }) {
            break;
        }
    }
    let solution = solver.run()?;
    println!("Converged in {:.3} ms", t0.elapsed().as_secs_f64() * 1e3);

    println!("{:>4} {:>10} {:>10} {:>10} {:>10}", "i", "T [K]", "q_rad", "q_conv", "q_back");
    for i in 0..solution.temperatures.len() {
        println!(
            "{:>4} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
            i,
            solution.temperatures[i],
            solution.radiative_flux[i],
            solution.convective_flux[i],
            solution.back_flux[i]
        );
    }
    if let Some(t_air) = solution.air_temperature {
        println!("Air node: {t_air:.3} K");
    }
    Ok(())
}
