use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use radiant::io::{Delimiter, read_json, read_spectral_table, read_view3d, to_json_string, write_json};
use radiant::numeric::{DenseLu, Extrapolation};
use radiant::sim::zonal::solve_scenarios;
use radiant::{Blackbody, ExchangeConfig, PhysicalConstants, TotalExchangeArea, ZonalScenario, solve_enclosure};

/// Enclosure radiation and zonal heat transfer for diffuse-gray surfaces
#[derive(Parser)]
#[command(name = "radiant")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Blackbody, enclosure and zonal radiation calculations", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Blackbody emission at one temperature
    Blackbody {
        /// Temperature [K]
        #[arg(short, long)]
        temperature: f64,
        /// Wavelength for spectral power and fraction [um]
        #[arg(short, long)]
        wavelength: Option<f64>,
        /// Use the rounded textbook constants instead of CODATA
        #[arg(long)]
        textbook: bool,
    },
    /// Effective band value of a tabulated spectral property
    Band {
        /// Two-column table (wavelength_um, value)
        table: PathBuf,
        #[arg(long)]
        lambda1: f64,
        #[arg(long)]
        lambda2: f64,
        /// Source temperature [K]
        #[arg(short, long)]
        temperature: f64,
        /// Sampling step [um]
        #[arg(long, default_value_t = 0.01)]
        step: f64,
    },
    /// Summation and reciprocity checks of a View3D output file
    Check {
        file: PathBuf,
        /// Field delimiter (default: whitespace)
        #[arg(short, long)]
        delimiter: Option<char>,
        #[arg(long, default_value_t = 1e-6)]
        tolerance: f64,
    },
    /// Radiosity and net flux of every surface at fixed temperatures
    Enclosure {
        file: PathBuf,
        /// Surface temperatures [K], comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        temperatures: Vec<f64>,
        #[arg(short, long)]
        delimiter: Option<char>,
        /// Write the solution as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Zonal-method scenarios from a JSON file
    Zonal {
        file: PathBuf,
        /// JSON array of scenarios
        #[arg(short, long)]
        scenarios: PathBuf,
        #[arg(short, long)]
        delimiter: Option<char>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn delimiter(c: Option<char>) -> Delimiter {
    c.map_or(Delimiter::Whitespace, Delimiter::Char)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Blackbody {
            temperature,
            wavelength,
            textbook,
        } => {
            let constants = if textbook {
                PhysicalConstants::textbook()
            } else {
                PhysicalConstants::codata()
            };
            let bb = Blackbody::new(constants);
            let total = bb.total_emissive_power(temperature)?;
            println!("T = {temperature} K");
            println!("E_b = {:.6e} W/m2 (+/- {:.1e})", total.value, total.error);
            println!("lambda_max = {:.4} um", bb.peak_wavelength(temperature)?);
            if let Some(l) = wavelength {
                println!(
                    "E_b,lambda({l} um) = {:.6e} W/m2/um",
                    bb.spectral_emissive_power(l, temperature, 1.0)?
                );
                println!("f(0-{l} um) = {:.6}", bb.fraction_function(l, temperature)?);
            }
        }
        Commands::Band {
            table,
            lambda1,
            lambda2,
            temperature,
            step,
        } => {
            let curve = read_spectral_table(&table, Extrapolation::Fail)?;
            let result = Blackbody::default()
                .effective_band_absorptivity(lambda1, lambda2, temperature, &curve, step)?;
            println!(
                "effective value over [{lambda1}, {lambda2}) um at {temperature} K: {:.6}",
                result.effective
            );
        }
        Commands::Check {
            file,
            delimiter: d,
            tolerance,
        } => {
            let enclosure = read_view3d(&file, delimiter(d))?;
            println!("{} surfaces", enclosure.len());
            for (i, s) in enclosure.row_sums().iter().enumerate() {
                println!("  row {i}: sum F = {s:.6}");
            }
            let (residual, (i, j)) = enclosure.reciprocity_residual();
            println!("max |A_i F_ij - A_j F_ji| = {residual:.3e} at ({i}, {j})");
            let summation = enclosure.check_summation(tolerance);
            let reciprocity = enclosure.check_reciprocity(tolerance);
            if summation.is_err() || reciprocity.is_err() {
                bail!("{} failed the view-factor checks", file.display());
            }
            info!("view factors consistent");
        }
        Commands::Enclosure {
            file,
            temperatures,
            delimiter: d,
            output,
        } => {
            let enclosure = read_view3d(&file, delimiter(d))?;
            let solution = solve_enclosure(
                &enclosure,
                &temperatures,
                &Blackbody::default(),
                &DenseLu::default(),
            )?;
            println!("{}", to_json_string(&solution)?);
            if let Some(path) = output {
                write_json(&path, &solution)?;
            }
        }
        Commands::Zonal {
            file,
            scenarios,
            delimiter: d,
            output,
        } => {
            let enclosure = read_view3d(&file, delimiter(d))?;
            let exchange = TotalExchangeArea::from_enclosure(&enclosure, &ExchangeConfig::default())
                .with_context(|| format!("Cannot assemble exchange areas for {}", file.display()))?;
            let scenarios: Vec<ZonalScenario> = read_json(&scenarios)?;

            let mut solutions = Vec::new();
            for (scenario, result) in scenarios.iter().zip(solve_scenarios(&exchange, &scenarios)) {
                match result {
                    Ok(solution) => {
                        println!(
                            "{}: {} iterations, T = {:.2?} K, T_air = {:?}",
                            scenario.name,
                            solution.iterations,
                            solution.temperatures,
                            solution.air_temperature
                        );
                        solutions.push(solution);
                    }
                    Err(e) => warn!(scenario = %scenario.name, error = %e, "scenario failed"),
                }
            }
            if let Some(path) = output {
                write_json(&path, &solutions)?;
            }
            if solutions.len() < scenarios.len() {
                bail!("{} of {} scenarios failed", scenarios.len() - solutions.len(), scenarios.len());
            }
        }
    }
    Ok(())
}
