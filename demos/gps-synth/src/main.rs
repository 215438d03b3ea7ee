//! gps_synth: generate synthetic GPS trajectories from a TOML run file.
//!
//! ```text
//! gps_synth --config demos/gps-synth/run.toml run
//! gps_synth --config demos/gps-synth/run.toml check
//! ```
//!
//! Log verbosity defaults to `info`; override with `RUST_LOG`.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use gs_output::{OutputObserver, open_writer};
use gs_sim::{RunConfig, SimBuilder};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Run configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Write output here instead of the configured directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate every profile and write the output tables.
    Run,

    /// Validate the configuration and build the networks, then stop.
    Check,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = Cli::parse();
    log::debug!("{args:#?}");

    let mut config = RunConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }
    log::info!(
        "{} networks, {} profiles, {} users, seed {}",
        config.networks.len(),
        config.profiles.len(),
        config.total_users(),
        config.seed
    );

    let output = config.output.clone();
    let started = Instant::now();
    let sim = SimBuilder::new(config).build().context("failed to build networks")?;
    log::info!("networks ready in {:.1?}", started.elapsed());

    match args.command {
        Command::Check => {
            log::info!("configuration ok");
            Ok(())
        }
        Command::Run => {
            let writer = open_writer(&output).context("failed to open output")?;
            let mut observer = OutputObserver::new(writer);
            let summary = sim.run(&mut observer).context("simulation failed")?;
            if let Some(error) = observer.take_error() {
                return Err(error).context("failed to write output");
            }
            if summary.agents() == 0 {
                bail!("no user could be simulated ({} skipped)", summary.failed());
            }
            log::info!(
                "wrote {} samples of {} users to {} in {:.1?}",
                summary.samples(),
                summary.agents(),
                output.dir.display(),
                started.elapsed()
            );
            Ok(())
        }
    }
}
