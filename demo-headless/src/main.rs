use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use storm_sim_core::{run_ensemble, RunSummary, StormConstants, StormEngine, DEFAULT_SEED};
use tracing_subscriber::EnvFilter;

/// Thunderstorm lifecycle simulation
///
/// With no arguments the reference storm runs silently to completion.
#[derive(Parser, Debug)]
#[command(name = "storm-sim")]
#[command(about = "Deterministic thunderstorm lifecycle simulation", long_about = None)]
struct Args {
    /// Seed for the random stream
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// JSON file overriding the constant table
    #[arg(short, long)]
    constants: Option<PathBuf>,

    /// Give up if the storm has not ended after this many steps
    #[arg(long)]
    max_steps: Option<u64>,

    /// Print a summary of the run
    #[arg(short, long)]
    report: bool,

    /// Write the step-by-step trace as JSON
    #[arg(long)]
    trace_json: Option<PathBuf>,

    /// Run this many consecutive seeds in parallel and print one line each
    #[arg(short, long, conflicts_with_all = ["max_steps", "report", "trace_json"])]
    ensemble: Option<u64>,
}

fn load_constants(path: Option<&PathBuf>) -> anyhow::Result<StormConstants> {
    let Some(path) = path else {
        return Ok(StormConstants::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading constants from {}", path.display()))?;
    let constants: StormConstants = serde_json::from_str(&text)
        .with_context(|| format!("parsing constants in {}", path.display()))?;
    constants.validate()?;
    Ok(constants)
}

fn print_summary(summary: &RunSummary) {
    let tally = &summary.tally;
    println!("=== Storm Summary (seed {}) ===", summary.seed);
    println!("Iterations: {}", summary.iterations);
    println!(
        "Brewing: {}, Threshold: {}, Full storm: {} (impact {}, downpour {}, frenzy {}, chaos {}, silence {})",
        tally.brewing,
        tally.threshold,
        tally.full_storm(),
        tally.impact,
        tally.downpour,
        tally.frenzy,
        tally.chaos,
        tally.silence
    );
    println!("Lightning strikes: {}", summary.lightning_events);

    let s = &summary.final_state;
    let wind = s.wind_vector();
    println!(
        "Final: T={:.1}°C, P={:.1} hPa, RH={:.0}%, soil={:.1}°C, wind {:.2} @ {:.0}° ({:+.2}, {:+.2})",
        s.temperature,
        s.pressure,
        s.humidity,
        s.soil_temperature,
        s.wind_speed,
        s.wind_direction,
        wind.x,
        wind.y
    );
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let constants = load_constants(args.constants.as_ref())?;

    if let Some(count) = args.ensemble {
        let seeds: Vec<u64> = (args.seed..args.seed.saturating_add(count)).collect();
        for summary in run_ensemble(&constants, &seeds)? {
            println!(
                "seed {:>6}: {:>4} iterations, {:>2} strikes, frenzy {}, chaos {}",
                summary.seed,
                summary.iterations,
                summary.lightning_events,
                summary.tally.frenzy,
                summary.tally.chaos
            );
        }
        return Ok(());
    }

    let mut engine = StormEngine::with_constants(constants, args.seed)?;

    if args.report || args.trace_json.is_some() {
        let trace = match args.max_steps {
            Some(limit) => engine.run_traced_bounded(limit)?,
            None => engine.run_traced(),
        };
        if let Some(path) = &args.trace_json {
            let json = serde_json::to_string_pretty(&trace)?;
            fs::write(path, json)
                .with_context(|| format!("writing trace to {}", path.display()))?;
        }
        if args.report {
            print_summary(&RunSummary::from_trace(args.seed, &trace));
        }
    } else if let Some(limit) = args.max_steps {
        engine.run_bounded(limit)?;
    } else {
        engine.run();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn ensemble_refuses_single_run_options() {
        let extras: [&[&str]; 3] = [&["--max-steps", "50"], &["--report"], &["--trace-json", "t.json"]];
        for extra in extras {
            let argv = ["storm-sim", "--ensemble", "4"].iter().chain(extra);
            let err = Args::try_parse_from(argv).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict, "{extra:?}");
        }
    }

    #[test]
    fn single_run_options_combine() {
        let args = Args::try_parse_from(["storm-sim", "--max-steps", "50", "--report"]).unwrap();
        assert_eq!(args.max_steps, Some(50));
        assert!(args.report);
        assert_eq!(args.seed, DEFAULT_SEED);
        assert_eq!(args.ensemble, None);
    }
}
