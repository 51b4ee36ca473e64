//! warehouse-replay CLI
//!
//! Replays a clingo warehouse plan in the terminal, one frame per timestep.

use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use warehouse_replay::render::{CLEAR_SCREEN, CURSOR_HOME};
use warehouse_replay::{load_facts, load_plan, Renderer, Replay, ReplayConfig, WitnessSelector};

#[derive(Parser, Debug)]
#[command(
    name = "warehouse-replay",
    version,
    about = "Replay a clingo warehouse plan as a text grid"
)]
struct Cli {
    /// ASP file with the initial `init/2` facts.
    facts: PathBuf,
    /// clingo JSON output (`--outf=2`) holding the plan.
    plan: PathBuf,
    /// Seconds to wait between frames.
    #[arg(long)]
    delay: Option<f64>,
    /// Model to replay: `first`, `last` or a zero-based index.
    #[arg(long)]
    witness: Option<WitnessSelector>,
    /// Do not clear the terminal between frames.
    #[arg(long)]
    no_clear: bool,
    /// TOML file with replay settings; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print only the final summary.
    #[arg(long)]
    final_only: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<ReplayConfig> {
        let mut config = match &self.config {
            Some(path) => ReplayConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ReplayConfig::default(),
        };
        if let Some(delay) = self.delay {
            config = config.with_delay_secs(delay);
        }
        if let Some(witness) = self.witness {
            config = config.with_witness(witness);
        }
        if self.no_clear {
            config = config.without_clear();
        }
        config.validate().context("invalid replay settings")?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.resolve_config()?;
    debug!(?config, "resolved replay config");

    let facts = load_facts(&cli.facts)
        .with_context(|| format!("reading facts from {}", cli.facts.display()))?;
    let loaded = load_plan(&cli.plan, config.witness)
        .with_context(|| format!("reading plan from {}", cli.plan.display()))?;
    let plan = loaded.plan;

    let mut renderer = Renderer::new(config.symbols.clone(), facts.bounds);
    let mut out = io::stdout().lock();

    if cli.final_only {
        let outcome = Replay::new(facts.state, &plan).run_to_end();
        info!(
            final_time = outcome.final_time,
            rejections = outcome.rejections(),
            "replay finished"
        );
        write!(
            out,
            "{}",
            renderer.final_summary(&outcome.final_state, outcome.final_time)
        )?;
        out.flush()?;
        return Ok(());
    }

    writeln!(out, "Pre-calculating maximum cell width for consistent grid size...")?;
    for frame in Replay::new(facts.state.clone(), &plan) {
        renderer.fit(&frame.state);
    }
    writeln!(
        out,
        "Calculation complete. Fixed cell width for visualization: {}",
        renderer.cell_width()
    )?;
    writeln!(out, "\nStarting Visualization...")?;

    let delay = config.delay();
    let mut last = None;
    for frame in Replay::new(facts.state, &plan) {
        if config.clear_screen {
            write!(out, "{CLEAR_SCREEN}{CURSOR_HOME}")?;
        }
        write!(out, "{}", renderer.render_frame(&frame))?;
        out.flush()?;

        let pause = if frame.time == 0 { delay.saturating_mul(2) } else { delay };
        thread::sleep(pause);
        last = Some((frame.time, frame.state));
    }

    if let Some((final_time, final_state)) = last {
        write!(out, "{}", renderer.final_summary(&final_state, final_time))?;
    }
    out.flush()?;
    Ok(())
}
