//! GSL - Gas Sensor Laboratory
//! Command-line interface for replaying trajectories through simulated MOX sensors

mod experiment;
mod trajectory;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use experiment::Experiment;
use gsl_core::{Point3, RateLimited};
use gsl_olfactory::{CalibrationTables, DirectorySource, MoxSensor, SnapshotSource};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trajectory::Polyline;

#[derive(Parser)]
#[command(name = "gsl")]
#[command(author = "GSL Contributors")]
#[command(version = "2026.1.16")]
#[command(about = "GSL - simulated MOX gas sensors over precomputed dispersion data", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a trajectory through a MOX sensor and emit JSON lines
    Replay {
        /// Experiment file (.toml)
        #[arg(value_name = "EXPERIMENT")]
        experiment: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Inspect a gas data directory
    Inspect {
        /// Directory holding iteration_<N>_fil.npy / iteration_<N>_head.npy
        #[arg(value_name = "GAS_DATA_DIR")]
        dir: PathBuf,

        /// Iteration to summarize (defaults to the last one)
        #[arg(short, long)]
        iteration: Option<u32>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Replay { experiment, output } => replay_command(&experiment, output.as_deref()),
        Commands::Inspect { dir, iteration } => inspect_command(&dir, iteration),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "gsl=debug,gsl_olfactory=debug,gsl_environment=debug"
    } else {
        "gsl=info,gsl_olfactory=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

// ============================================================================
// Replay
// ============================================================================

/// Uma linha da saída JSONL
#[derive(Debug, Serialize)]
struct ReplayRecord {
    run: u32,
    time: f64,
    position: [f64; 3],
    sensor_output: f64,
    gas_concentration: f64,
    rs_r0: f64,
}

fn replay_command(experiment_path: &Path, output: Option<&Path>) -> Result<()> {
    let experiment = Experiment::from_file(experiment_path)?;

    if let Some(path) = &experiment.calibration {
        let tables = CalibrationTables::from_file(path)
            .with_context(|| format!("Failed to load calibration tables {}", path.display()))?;
        CalibrationTables::install(tables)?;
    }

    let grid = Arc::new(experiment.load_grid()?);
    let source = DirectorySource::new(&experiment.environment.gas_data_dir)?;
    let sensor = MoxSensor::new(experiment.mox.clone(), Box::new(source), grid)?;
    let mut sensor = RateLimited::new(sensor);

    let waypoints = experiment.trajectory.waypoints.iter().copied().map(Point3::from).collect();
    let path = Polyline::new(waypoints, experiment.trajectory.speed)?;

    let sink: Box<dyn Write> = match output {
        Some(file) => {
            Box::new(File::create(file).with_context(|| format!("Failed to create {}", file.display()))?)
        }
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(sink);

    eprintln!(
        "{} {} through {} ({} run(s), {:.1} m path)",
        "Replaying".green().bold(),
        experiment_path.display().to_string().cyan(),
        sensor.name(),
        experiment.trajectory.runs,
        path.length()
    );

    let dt = experiment.trajectory.physics_dt;
    let steps = experiment.steps_per_run();
    let mut readings = 0usize;

    for run in 0..experiment.trajectory.runs {
        sensor.reset();
        for step in 1..=steps {
            let time = step as f64 * dt;
            let position = path.position_at(time);
            let Some(reading) = sensor.update(position, dt)? else {
                continue;
            };

            let record = ReplayRecord {
                run,
                time,
                position: position.to_array(),
                sensor_output: reading.sensor_output,
                gas_concentration: reading.gas_concentration,
                rs_r0: reading.rs_r0,
            };
            serde_json::to_writer(&mut writer, &record)?;
            writer.write_all(b"\n")?;
            readings += 1;
        }
        info!(run, time = sensor.inner().time_total(), "Run finished");
    }
    writer.flush()?;

    eprintln!(
        "{} {} readings",
        "    Finished".green().bold(),
        readings.to_string().cyan()
    );
    Ok(())
}

// ============================================================================
// Inspect
// ============================================================================

fn inspect_command(dir: &Path, iteration: Option<u32>) -> Result<()> {
    let mut source = DirectorySource::new(dir)?;
    let last = source.last_iteration()?;
    let iteration = iteration.unwrap_or(last);
    let snapshot = source.load(iteration)?;

    println!("{} {}", "Gas data".green().bold(), dir.display().to_string().cyan());
    println!("  {:<22} {}", "last iteration:", last);
    println!("  {:<22} {}", "iteration:", iteration);
    println!("  {:<22} {}", "filaments:", snapshot.filaments.len());
    println!("  {:<22} {:e}", "filament moles:", snapshot.header.filament_moles);
    println!("  {:<22} {:e}", "total moles per cm3:", snapshot.header.total_moles_all_gases);

    let sigma_range = snapshot.filaments.iter().map(|f| f.sigma).fold(None, |acc, s| match acc {
        None => Some((s, s)),
        Some((lo, hi)) => Some((f64::min(lo, s), f64::max(hi, s))),
    });
    match sigma_range {
        Some((lo, hi)) => println!("  {:<22} {:.3} .. {:.3}", "sigma range:", lo, hi),
        None => println!("  {:<22} -", "sigma range:"),
    }
    Ok(())
}
