use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use senscraft::commands;
use senscraft::util::io::atomic_write;
use senscraft::{AnalysisFile, init_logging};

#[derive(Parser, Debug)]
#[command(name = "senscraft")]
#[command(about = "Sensitivity and robustness scenarios for multi-criteria decisions")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Write logs to `senscraft.log` in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Io {
    /// Analysis file (YAML)
    config: PathBuf,

    /// Write results here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate every weight vector on a regular grid
    WeightsGrid(Io),
    /// Add uniform noise to the decision matrix
    PerturbMatrix(Io),
    /// Add uniform noise to the weights and renormalize
    PerturbWeights(Io),
    /// Draw random weight vectors from a distribution
    MonteCarlo(Io),
    /// Remove criteria and redistribute their weight
    RemoveCriteria(Io),
    /// Remove alternatives from the decision matrix
    RemoveAlternatives(Io),
    /// Merge several rankings into compromise rankings
    Compromise(Io),
}

impl Command {
    fn io(&self) -> &Io {
        match self {
            Command::WeightsGrid(io)
            | Command::PerturbMatrix(io)
            | Command::PerturbWeights(io)
            | Command::MonteCarlo(io)
            | Command::RemoveCriteria(io)
            | Command::RemoveAlternatives(io)
            | Command::Compromise(io) => io,
        }
    }
}

fn write_output(output: Option<&Path>, content: &str) -> color_eyre::Result<()> {
    match output {
        Some(path) => {
            atomic_write(path, content)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "results written");
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let _guard = init_logging(&cli.log_level, cli.log_dir.as_deref())?;

    let io = cli.command.io();
    let file = AnalysisFile::load(&io.config)?;

    let content = match &cli.command {
        Command::WeightsGrid(_) => commands::run_weights_grid(&file)?,
        Command::PerturbMatrix(_) => commands::run_perturb_matrix(&file)?,
        Command::PerturbWeights(_) => commands::run_perturb_weights(&file)?,
        Command::MonteCarlo(_) => commands::run_monte_carlo(&file)?,
        Command::RemoveCriteria(_) => commands::run_remove_criteria(&file)?,
        Command::RemoveAlternatives(_) => commands::run_remove_alternatives(&file)?,
        Command::Compromise(_) => commands::run_compromise(&file)?,
    };

    write_output(io.output.as_deref(), &content)
}
