use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mlp_live::{Activation, ConfigPatch, NetworkConfig, Preset, Session, Source, StopCriteria};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DataArg {
    And,
    Or,
    Xor,
    Rgb,
    Random,
}

impl From<DataArg> for Source {
    fn from(value: DataArg) -> Self {
        match value {
            DataArg::And => Source::Preset(Preset::And),
            DataArg::Or => Source::Preset(Preset::Or),
            DataArg::Xor => Source::Preset(Preset::Xor),
            DataArg::Rgb => Source::Preset(Preset::Rgb),
            DataArg::Random => Source::Random,
        }
    }
}

/// Train the live network headless and print how it ends up.
#[derive(Debug, Parser)]
#[command(name = "mlp-live", version)]
struct Cli {
    /// Training data.
    #[arg(long, value_enum, default_value = "xor")]
    preset: DataArg,

    /// Hidden layer size.
    #[arg(long, default_value_t = 5)]
    hidden: usize,

    /// Input layer size (ignored for table presets).
    #[arg(long, default_value_t = 3)]
    inputs: usize,

    /// Output layer size (ignored for table presets).
    #[arg(long, default_value_t = 2)]
    outputs: usize,

    #[arg(long, default_value_t = 0.1)]
    learning_rate: f32,

    /// Sigmoid, Tanh, ReLU or Linear.
    #[arg(long, default_value = "ReLU")]
    hidden_activation: String,

    /// Sigmoid, Tanh, ReLU or Linear.
    #[arg(long, default_value = "Sigmoid")]
    output_activation: String,

    #[arg(long, default_value_t = 5000)]
    max_epochs: u64,

    #[arg(long, default_value_t = 0.001)]
    target_loss: f32,

    /// Seed for weights and sample selection (entropy if omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Log loss and accuracy every N steps.
    #[arg(long, default_value_t = 500)]
    report_every: u64,

    /// JSON config patch applied over the flags, e.g. `{"hiddenNodes": 8}`.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> mlp_live::Result<()> {
    let mut config = NetworkConfig {
        learning_rate: cli.learning_rate,
        hidden_activation: Activation::from_name(&cli.hidden_activation),
        output_activation: Activation::from_name(&cli.output_activation),
        input_nodes: cli.inputs,
        hidden_nodes: cli.hidden,
        output_nodes: cli.outputs,
    };
    if let Some(path) = &cli.config {
        let text = std::fs::read_to_string(path).map_err(|e| {
            mlp_live::Error::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        config = config.merged(&ConfigPatch::from_json_str(&text)?);
    }

    let criteria = StopCriteria {
        max_epochs: cli.max_epochs,
        target_loss: cli.target_loss,
    };
    let source = Source::from(cli.preset);
    let mut session = match cli.seed {
        Some(seed) => Session::with_seed(config, source, criteria, seed)?,
        None => Session::new(config, source, criteria)?,
    };

    let every = cli.report_every.max(1);
    session.start();
    while session.is_running() {
        let outcome = session.step();
        let iteration = session.network().iteration();
        if iteration % every == 0 || outcome.stopped.is_some() {
            let acc = session.accuracy();
            info!(iteration, loss = outcome.stats.loss, accuracy = acc, "progress");
        }
    }

    report(&mut session);
    Ok(())
}

fn report(session: &mut Session) {
    let samples = match session.source() {
        Source::Preset(preset) => preset.rows(),
        Source::Random => vec![session.current_sample().clone()],
    };
    // Work on a copy so the session's displayed state is left alone.
    let mut net = session.network().clone();
    for s in &samples {
        net.forward(&s.input);
        let out: Vec<f32> = net.outputs().collect();
        println!("{:?} -> {:.4?} (target {:?})", s.input, out, s.target);
    }
    println!(
        "iterations={} loss={:.5} accuracy={:.0}%",
        net.iteration(),
        net.loss(),
        session.accuracy()
    );
}
