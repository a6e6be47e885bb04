// Copyright 2026 QEMO Contributors
// SPDX-License-Identifier: Apache-2.0

//! QEMO command-line driver
//!
//! Runs the numeric core against the built-in reference state vector.
//!
//! # Usage
//!
//! ```bash
//! # Metrics of a three-qubit GHZ state
//! qemo metrics --preset ghz --qubits 3
//!
//! # Evolve |0000⟩ under the emotion-driven schedule
//! qemo evolve --model adaptive --emotion anxious --comfort 20
//!
//! # Tune a two-qubit ansatz towards maximal concurrence
//! qemo optimize --strategy hybrid
//!
//! # Show effective configuration
//! qemo config --config /path/to/qemo.yaml
//! ```

use std::f64::consts::FRAC_PI_4;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use ndarray::Array1;
use num_complex::Complex64;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use qemo_core::entanglement::{compute_all_metrics_with, concurrence, MetricsReport};
use qemo_core::optimize::{HybridOptimizer, SpsaOptimizer};
use qemo_core::schedule::{
    time_dependent_evolution, CouplingMode, EmotionalCondition, EvolutionStep, GateApplier,
    GateKind, HamiltonianModel, Needs,
};
use qemo_core::state::StateVector;
use qemo_core::{config::Config, Error, Result, VERSION};

/// QEMO emotional quantum state engine
#[derive(Parser)]
#[command(name = "qemo")]
#[command(author = "QEMO Contributors")]
#[command(version = VERSION)]
#[command(about = "Entanglement metrics, Hamiltonian schedules and optimizers")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "QEMO_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute entanglement metrics of a state
    Metrics {
        /// Built-in state
        #[arg(long, value_enum, default_value_t = Preset::Bell, conflicts_with = "amplitudes")]
        preset: Preset,

        /// Qubits for the product, GHZ and W presets
        #[arg(long, default_value_t = 2)]
        qubits: usize,

        /// JSON file holding [[re, im], ...] amplitudes
        #[arg(long)]
        amplitudes: Option<PathBuf>,
    },

    /// Evolve |0…0⟩ under a Hamiltonian schedule
    Evolve {
        /// Control-field model
        #[arg(long, value_enum, default_value_t = ModelArg::Adaptive)]
        model: ModelArg,

        /// Emotion label for the adaptive model
        #[arg(long, default_value = "calm")]
        emotion: String,

        /// Comfort need (0-100)
        #[arg(long, default_value_t = 50.0)]
        comfort: f64,

        /// Stimulation need (0-100)
        #[arg(long, default_value_t = 50.0)]
        stimulation: f64,

        /// Connection need (0-100)
        #[arg(long, default_value_t = 50.0)]
        connection: f64,

        /// Total evolution time
        #[arg(long)]
        duration: Option<f64>,

        /// Time step
        #[arg(long)]
        dt: Option<f64>,

        /// Number of qubits
        #[arg(long)]
        qubits: Option<usize>,

        /// Coupling realization (legacy, physical)
        #[arg(long)]
        coupling: Option<CouplingMode>,
    },

    /// Tune a two-qubit ansatz to maximize concurrence
    Optimize {
        /// Optimization strategy
        #[arg(long, value_enum, default_value_t = Strategy::Spsa)]
        strategy: Strategy,

        /// SPSA iteration budget
        #[arg(long, default_value_t = 100)]
        iterations: usize,

        /// SPSA plateau tolerance
        #[arg(long, default_value_t = 1e-6)]
        tolerance: f64,

        /// Starting angles θ0,θ1,θ2 (defaults to π/4 each)
        #[arg(long, value_delimiter = ',')]
        initial: Option<Vec<f64>>,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Product,
    Bell,
    Ghz,
    W,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelArg {
    Heat,
    Wave,
    Schrodinger,
    ReactionDiffusion,
    Adaptive,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    Spsa,
    Hybrid,
}

#[derive(Serialize)]
struct EvolveReport {
    model: HamiltonianModel,
    history: Vec<EvolutionStep>,
    metrics: MetricsReport,
}

#[derive(Serialize)]
struct TuningReport<T> {
    strategy: &'static str,
    outcome: T,
    concurrence: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, config.logging.is_json());

    match cli.command {
        Commands::Metrics {
            preset,
            qubits,
            amplitudes,
        } => {
            config.validate()?;
            let state = match amplitudes {
                Some(path) => load_amplitudes(&path)?,
                None => preset_state(preset, qubits)?,
            };
            let n = state.num_subsystems();
            let report = compute_all_metrics_with(state.amplitudes(), n, &config.metrics)?;
            info!(num_subsystems = n, degraded = report.is_degraded(), "Metrics computed");
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Evolve {
            model,
            emotion,
            comfort,
            stimulation,
            connection,
            duration,
            dt,
            qubits,
            coupling,
        } => {
            // Override config with CLI args
            let mut config = config;
            if let Some(duration) = duration {
                config.schedule.duration = duration;
            }
            if let Some(dt) = dt {
                config.schedule.dt = dt;
            }
            if let Some(n) = qubits {
                config.schedule.num_subsystems = n;
            }
            if let Some(mode) = coupling {
                config.schedule.coupling_mode = mode;
            }
            config.validate()?;

            let needs = Needs {
                comfort,
                stimulation,
                connection,
            };
            let model = match model {
                ModelArg::Heat => HamiltonianModel::heat(),
                ModelArg::Wave => HamiltonianModel::wave(),
                ModelArg::Schrodinger => HamiltonianModel::schrodinger(),
                ModelArg::ReactionDiffusion => HamiltonianModel::reaction_diffusion(),
                ModelArg::Adaptive => {
                    HamiltonianModel::Adaptive(EmotionalCondition::from_label(&emotion, &needs))
                }
            };

            let n = config.schedule.num_subsystems;
            let mut state = StateVector::zero(n)?;
            let history = time_dependent_evolution(&mut state, &config.schedule, &model)?;
            let metrics = compute_all_metrics_with(state.amplitudes(), n, &config.metrics)?;

            info!(
                model = model.name(),
                steps = history.len(),
                coupling_mode = %config.schedule.coupling_mode,
                "Evolution complete"
            );
            let report = EvolveReport {
                model,
                history,
                metrics,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Optimize {
            strategy,
            iterations,
            tolerance,
            initial,
        } => {
            config.validate()?;
            let initial = initial.unwrap_or_else(|| DEFAULT_ANGLES.to_vec());
            if initial.len() != DEFAULT_ANGLES.len() {
                return Err(Error::Config(format!(
                    "--initial takes {} angles, got {}",
                    DEFAULT_ANGLES.len(),
                    initial.len()
                )));
            }
            let ansatz = EntanglingAnsatz::new()?;
            let loss = |p: &[f64]| ansatz.loss(p);
            let state_fn = |p: &[f64]| ansatz.amplitudes(p);

            info!(
                version = VERSION,
                iterations,
                start_concurrence = 1.0 - ansatz.loss(&initial),
                "Starting ansatz tuning"
            );
            match strategy {
                Strategy::Spsa => {
                    let mut optimizer = SpsaOptimizer::new(config.spsa.clone())?;
                    let outcome = optimizer.optimize(loss, &initial, iterations, tolerance)?;
                    let concurrence = 1.0 - outcome.best_loss;
                    print_json(&TuningReport {
                        strategy: "spsa",
                        outcome,
                        concurrence,
                    })?;
                }
                Strategy::Hybrid => {
                    let mut hybrid = config.hybrid.clone();
                    hybrid.spsa_iterations = iterations;
                    hybrid.spsa_tolerance = tolerance;
                    let mut optimizer = HybridOptimizer::new(hybrid)?;
                    let outcome = optimizer.optimize(loss, &state_fn, &initial)?;
                    let concurrence = 1.0 - outcome.best_loss;
                    print_json(&TuningReport {
                        strategy: "hybrid",
                        outcome,
                        concurrence,
                    })?;
                }
            }
        }

        Commands::Config => {
            // Show effective configuration
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => match config.validate() {
            Ok(()) => {
                println!("Configuration is valid");
            }
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

/// Initialize logging with tracing. Output goes to stderr so that stdout
/// carries only command results.
fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn preset_state(preset: Preset, qubits: usize) -> Result<StateVector> {
    match preset {
        Preset::Product => StateVector::zero(qubits),
        Preset::Bell => Ok(StateVector::bell()),
        Preset::Ghz => StateVector::ghz(qubits),
        Preset::W => StateVector::w(qubits),
    }
}

/// Read `[[re, im], ...]` amplitudes; the length fixes the qubit count.
fn load_amplitudes(path: &Path) -> Result<StateVector> {
    let content = std::fs::read_to_string(path)?;
    let pairs: Vec<[f64; 2]> = serde_json::from_str(&content)?;
    if !pairs.len().is_power_of_two() {
        return Err(Error::Config(format!(
            "{}: amplitude count {} is not a power of two",
            path.display(),
            pairs.len()
        )));
    }
    let n = pairs.len().trailing_zeros() as usize;
    let amplitudes: Array1<Complex64> = pairs
        .iter()
        .map(|&[re, im]| Complex64::new(re, im))
        .collect();
    StateVector::from_amplitudes(amplitudes, n)
}

/// Starting angles for ansatz tuning. Concurrence there is sin³(π/4) ≈ 0.35
/// with a non-vanishing gradient in every angle.
const DEFAULT_ANGLES: [f64; 3] = [FRAC_PI_4; 3];

/// RY(θ0) on q0, RY(θ1) on q1, then ZZ(θ2), applied to |00⟩.
///
/// Its concurrence is |sin θ0 · sin θ1 · sin θ2|.
struct EntanglingAnsatz {
    template: StateVector,
}

impl EntanglingAnsatz {
    fn new() -> Result<Self> {
        Ok(Self {
            template: StateVector::zero(2)?,
        })
    }

    fn state(&self, params: &[f64]) -> Result<StateVector> {
        let mut state = self.template.clone();
        state.apply_rotation(GateKind::Ry, 0, params[0]);
        state.apply_rotation(GateKind::Ry, 1, params[1]);
        state.apply_interaction(0, 1, params[2])?;
        Ok(state)
    }

    /// 1 − C(0, 1); a failed evaluation scores as a separable state.
    fn loss(&self, params: &[f64]) -> f64 {
        self.state(params)
            .and_then(|s| concurrence(s.amplitudes(), 0, 1, 2))
            .map_or(1.0, |c| 1.0 - c)
    }

    fn amplitudes(&self, params: &[f64]) -> Array1<Complex64> {
        self.state(params)
            .map(StateVector::into_amplitudes)
            .unwrap_or_else(|_| self.template.amplitudes().clone())
    }
}
