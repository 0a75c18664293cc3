//! Underplay command-line entry point.
//!
//! Inspects configuration and dry-runs the platform adapter against a
//! simulated platform player.

use std::{error::Error, path::PathBuf, sync::Arc, thread, time::Duration};

use clap::{Parser, Subcommand};
use futures::StreamExt;
use tracing::{debug, info};
use underplay::{
    config::Config,
    services::player::{
        NotificationMonitor, PlatformPlayerAdapter, PlaybackState, UnderlyingPlayer, Volume,
        backends::DummyPlatformPlayer,
    },
    tracing_config,
};

#[derive(Parser)]
#[command(name = "underplay")]
#[command(about = "Drive platform media players through a uniform playback adapter")]
struct Cli {
    /// Configuration file (defaults to the XDG config location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to the rolling log directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a simulated item through the adapter and print the state trace
    Simulate {
        /// Item length in seconds
        #[arg(long, default_value_t = 10.0)]
        length: f64,

        /// Simulated seconds per step
        #[arg(long, default_value_t = 1.0)]
        step: f64,

        /// Seek here (seconds) before starting
        #[arg(long)]
        seek: Option<f64>,

        /// Output volume (0.0 - 1.0)
        #[arg(long)]
        volume: Option<f64>,

        /// Playback rate
        #[arg(long)]
        rate: Option<f32>,

        /// Print one JSON object per step
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML
    Config,
    /// Print the configuration JSON schema
    Schema,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;

    let _guard = if cli.log_file {
        Some(tracing_config::init_with_file(config.general.log_level)?)
    } else {
        tracing_config::init(config.general.log_level)?;
        None
    };

    match cli.command {
        Commands::Simulate {
            length,
            step,
            seek,
            volume,
            rate,
            json,
        } => {
            let options = SimulateOptions {
                length: Duration::try_from_secs_f64(length)?,
                step: Duration::try_from_secs_f64(step)?,
                seek: seek.map(Duration::try_from_secs_f64).transpose()?,
                volume,
                rate,
                json,
            };
            simulate(config, options).await?;
        }
        Commands::Config => print!("{}", config.to_toml_string()?),
        Commands::Schema => {
            let schema = schemars::schema_for!(Config);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

struct SimulateOptions {
    length: Duration,
    step: Duration,
    seek: Option<Duration>,
    volume: Option<f64>,
    rate: Option<f32>,
    json: bool,
}

async fn simulate(config: Config, options: SimulateOptions) -> Result<(), Box<dyn Error>> {
    if options.step.is_zero() {
        return Err("step must be greater than zero".into());
    }

    let platform = Arc::new(DummyPlatformPlayer::new(Some(options.length)));
    let adapter = Arc::new(PlatformPlayerAdapter::with_player(
        platform.clone(),
        config.player,
    ));
    let _monitor = NotificationMonitor::start(&adapter)?;

    let mut states = adapter.watch_playback_state();
    tokio::spawn(async move {
        while let Some(state) = states.next().await {
            info!(%state, "Playback state changed");
        }
    });

    if let Some(volume) = options.volume {
        adapter.set_volume(Volume::new(volume)).await?;
    }
    if let Some(rate) = options.rate {
        adapter.set_rate(rate).await?;
    }
    if let Some(position) = options.seek {
        adapter.seek(position).await?;
    }

    adapter.play().await?;

    let max_steps = (options.length.as_secs_f64() / options.step.as_secs_f64()).ceil() as u64 + 1;
    for _ in 0..=max_steps {
        report_step(&adapter, options.json)?;

        if matches!(
            adapter.playback_state(),
            PlaybackState::Finished | PlaybackState::Failed
        ) {
            break;
        }

        // Platform players tick on their own threads.
        let ticking = platform.clone();
        let step = options.step;
        thread::spawn(move || ticking.advance(step))
            .join()
            .map_err(|_| "platform thread panicked")?;

        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    debug!("Simulation complete");
    Ok(())
}

fn report_step(adapter: &PlatformPlayerAdapter, json: bool) -> Result<(), Box<dyn Error>> {
    let position = adapter.current_time()?.as_secs_f64();
    let state = adapter.playback_state();

    if json {
        let line = serde_json::json!({
            "position": position,
            "state": state.to_string(),
            "volume": *adapter.volume.get(),
            "rate": adapter.rate.get(),
        });
        println!("{line}");
    } else {
        println!("{position:>8.2}s  {state}");
    }

    Ok(())
}
