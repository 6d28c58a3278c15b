//! # Mechanism Simulator
//!
//! Closed-loop simulation of one mechanism from a TOML file or a built-in
//! preset. Emits one JSON [`Sample`](mech_control::sim::Sample) per line on
//! stdout; logs go to stderr.
//!
//! ```text
//! mech_sim --preset elevator --goal 0.5 --ticks 250
//! mech_sim --config config/elevator.toml --goal 1.2 --profile --ticks 400
//! ```

use clap::{Parser, ValueEnum};
use mech_common::consts::DT;
use mech_common::gains::ControlMode;
use mech_common::mechanism::MechanismFile;
use mech_common::presets;
use mech_control::config::{LoadedMechanism, load_mechanism};
use mech_control::control::MotionState;
use mech_control::plant::ModelSource;
use mech_control::sim::CommandSource;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    Elevator,
    Flywheel,
}

impl PresetArg {
    fn file(self) -> MechanismFile {
        match self {
            PresetArg::Elevator => presets::elevator(),
            PresetArg::Flywheel => presets::flywheel(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Position,
    Velocity,
}

impl From<ModeArg> for ControlMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Position => ControlMode::Position,
            ModeArg::Velocity => ControlMode::Velocity,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlantArg {
    Physics,
    Characterized,
}

impl From<PlantArg> for ModelSource {
    fn from(plant: PlantArg) -> Self {
        match plant {
            PlantArg::Physics => ModelSource::Physics,
            PlantArg::Characterized => ModelSource::Characterized,
        }
    }
}

/// Mechanism simulator: feedforward + PID against a plant model
#[derive(Parser, Debug)]
#[command(name = "mech_sim")]
#[command(version)]
#[command(about = "Closed-loop simulation of an elevator or flywheel")]
struct Args {
    /// Mechanism TOML file. Overrides --preset.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Built-in mechanism.
    #[arg(long, value_enum, default_value = "elevator")]
    preset: PresetArg,

    /// Set-point: position [m] in position mode, velocity in velocity mode.
    #[arg(long, default_value_t = 0.5)]
    goal: f64,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 250)]
    ticks: usize,

    /// Loop period [s].
    #[arg(long, default_value_t = DT)]
    dt: f64,

    /// Control loop (defaults to the mechanism file's mode).
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Plant model source.
    #[arg(long, value_enum, default_value = "characterized")]
    plant: PlantArg,

    /// Follow a trapezoidal profile to the goal instead of stepping.
    #[arg(long)]
    profile: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("mech_sim v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = match &args.config {
        Some(path) => {
            info!("Loading mechanism from {}", path.display());
            load_mechanism(path)?.file
        }
        None => args.preset.file(),
    };
    if let Some(mode) = args.mode {
        file.mode = mode.into();
    }
    let loaded = LoadedMechanism::from_file(file)?;

    let command = match (args.profile, loaded.file.mode) {
        (true, _) => CommandSource::Profiled {
            goal: MotionState::at(args.goal),
        },
        (false, ControlMode::Position) => CommandSource::Hold(MotionState::at(args.goal)),
        (false, ControlMode::Velocity) => CommandSource::Hold(MotionState::spinning(args.goal)),
    };

    let mut harness = loaded.harness(args.plant.into(), command, args.dt)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut last = None;
    for sample in harness.by_ref().take(args.ticks) {
        serde_json::to_writer(&mut out, &sample)?;
        writeln!(out)?;
        last = Some(sample);
    }
    out.flush()?;

    let state = harness.plant().state();
    info!(
        ticks = args.ticks,
        position = state.position,
        velocity = state.velocity,
        faulted = last.is_some_and(|s| s.fault.is_some()),
        "simulation complete"
    );
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
///
/// Logs go to stderr so stdout carries only samples.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
