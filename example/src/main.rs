use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use sheeter::{config::SheetConfig, px::Px};
use tracing::info;

mod container;
mod scenario;

use scenario::{Scenario, Stage};

#[derive(Parser)]
#[command(name = "example")]
#[command(version, about = "Replays scripted gestures against a headless bottom sheet", long_about = None)]
struct Cli {
    /// TOML file overriding the sheet tuning
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Height of the view hosting the sheet, in pixels
    #[arg(long, default_value_t = 1600)]
    container_height: i32,
    /// Height of the screen, in pixels
    #[arg(long, default_value_t = 1800)]
    screen_height: i32,
    /// Frames per second of the simulated display
    #[arg(long, default_value_t = 60)]
    fps: u32,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay one scenario
    Run {
        #[arg(value_enum)]
        scenario: Scenario,
    },
    /// Replay every scenario in turn
    All,
    /// Print the effective configuration
    Config,
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("error,sheeter=info,example=info")
        {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SheetConfig::load(path)
            .with_context(|| format!("failed to load sheet config from {}", path.display()))?,
        None => SheetConfig::default(),
    };
    if cli.fps == 0 {
        bail!("--fps must be positive");
    }

    let stage = Stage {
        container_height: Px::new(cli.container_height),
        screen_height: Px::new(cli.screen_height),
        frame: Duration::from_secs_f64(1.0 / f64::from(cli.fps)),
        config,
    };

    match cli.command {
        Commands::Run { scenario } => report(&stage, scenario),
        Commands::All => {
            for scenario in Scenario::ALL {
                report(&stage, scenario)?;
            }
            Ok(())
        }
        Commands::Config => {
            println!("{:#?}", stage.config);
            Ok(())
        }
    }
}

fn report(stage: &Stage, scenario: Scenario) -> Result<()> {
    let outcome = stage
        .run(scenario)
        .with_context(|| format!("scenario {scenario:?} failed"))?;
    info!(
        "{scenario:?}: {} frames, {} completion(s)",
        outcome.frames,
        outcome.completions.len()
    );
    println!(
        "{scenario:?}: state={:?} dismissed={} peak={} final={} frames={}",
        outcome.state,
        outcome.dismissed,
        outcome
            .peak_height
            .map_or_else(|| "-".to_string(), |h| h.to_string()),
        outcome
            .final_height
            .map_or_else(|| "-".to_string(), |h| h.to_string()),
        outcome.frames,
    );
    for completion in &outcome.completions {
        println!(
            "  completed toward {:?} at {:?}",
            completion.target, completion.position
        );
    }
    Ok(())
}
