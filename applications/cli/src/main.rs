/// Tempo - headless queue player
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tempo_analytics::{HttpPlayRecorder, PlayHistoryClient};
use tempo_cli::{library, CliConfig, Command, Flow, Session};
use tempo_playback::{NoopRecorder, PlayRecorder};
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tempo")]
#[command(about = "Tempo Player queue controller on a simulated audio backend", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./tempo.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a track list and read playback commands from stdin
    Play {
        /// JSON track list
        #[arg(short, long)]
        tracks: PathBuf,
        /// Queue position (1-based) to start playing immediately
        #[arg(short, long)]
        start: Option<usize>,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for player output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tempo_cli=info,tempo_playback=info,tempo_analytics=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Play { tracks, start } => play(&config, &tracks, start)?,
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn play(config: &CliConfig, tracks: &std::path::Path, start: Option<usize>) -> anyhow::Result<()> {
    let tracks = library::load_tracks(tracks)?;
    tracing::info!("Loaded {} tracks", tracks.len());

    // Background runtime only when plays are reported
    let runtime = if config.analytics.enabled {
        Some(Runtime::new()?)
    } else {
        None
    };

    let recorder: Box<dyn PlayRecorder> = match &runtime {
        Some(runtime) => {
            let client = PlayHistoryClient::new(config.analytics_config())?;
            tracing::info!("Reporting plays to {}", client.base_url());
            Box::new(HttpPlayRecorder::new(client, runtime.handle().clone()))
        }
        None => Box::new(NoopRecorder),
    };

    let mut session = Session::new(
        tracks,
        recorder,
        config.player.clone(),
        config.simulation.default_duration_secs,
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(position) = start {
        let command = Command::Select(position.saturating_sub(1));
        if let Err(e) = session.execute(command, &mut out) {
            writeln!(out, "error: {}", e)?;
        }
    }

    writeln!(out, "{}", session.status_line())?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{} (try 'help')", e)?;
                continue;
            }
        };

        match session.execute(command, &mut out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => writeln!(out, "error: {}", e)?,
        }
        out.flush()?;
    }

    if let Some(runtime) = runtime {
        // Let in-flight play reports finish
        runtime.shutdown_timeout(Duration::from_secs(2));
    }

    Ok(())
}
