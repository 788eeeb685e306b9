//! stream-countdown - A countdown overlay for live streams
//!
//! Shows a running clock and a status message, with a control surface to
//! adjust the duration, messages and layout while the timer is live:
//! - Frames go to stdout as text lines or JSON objects
//! - Commands are read from stdin
//! - Settings persist in a key=value config file

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use stream_countdown::cli::{self, Cli, Commands, ConfigCommand, Display, OutputFormat, RunArgs};
use stream_countdown::config::{render_config, ConfigStore};
use stream_countdown::control::ControlSurface;
use stream_countdown::display::{JsonPresenter, Presenter, TerminalPresenter};
use stream_countdown::sound::{default_assets_dir, try_create_player, AssetSounds, CuePlayer};
use stream_countdown::{OverlayApp, TimerConfig};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    let code = match execute(cli).await {
        Ok(()) => 0,
        Err(e) => {
            Display::show_error(&format!("{:#}", e));
            1
        }
    };

    // The stdin reader blocks on a thread that cannot be cancelled, so exit
    // without waiting for the runtime to shut down.
    std::process::exit(code);
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr; stdout carries only frames.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        None | Some(Commands::Run) => run_overlay(cli.config, &cli.run).await,
        Some(Commands::Config(command)) => config_command(cli.config, command),
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            Ok(())
        }
    }
}

/// Runs the overlay until the control surface closes it.
async fn run_overlay(config_path: Option<PathBuf>, args: &RunArgs) -> Result<()> {
    let store = ConfigStore::locate(config_path).context("Failed to locate config file")?;
    debug!(path = %store.path().display(), "using config file");
    let config = store.load();
    let cues = build_cues(args);

    let presenter: Box<dyn Presenter> = match args.output {
        OutputFormat::Text => Box::new(TerminalPresenter::stdout()),
        OutputFormat::Json => Box::new(JsonPresenter::stdout()),
    };

    let mut app = OverlayApp::with_system_clock(config.clone(), presenter)
        .with_store(store)
        .with_cues(cues.clone())
        .with_precision(args.precision);

    let (tx, rx) = mpsc::unbounded_channel();
    let events = app.subscribe();
    let surface = ControlSurface::new(config, app.phase(), cues, tx);
    let input = tokio::spawn(cli::drive(
        BufReader::new(tokio::io::stdin()),
        surface,
        events,
    ));

    app.run(rx).await?;

    if input.is_finished() {
        match input.await {
            Ok(Err(e)) => warn!("{:#}", e),
            Err(e) => warn!("Control input task failed: {}", e),
            Ok(Ok(())) => {}
        }
    }
    Ok(())
}

/// Builds the cue player, or a silent one if sound is off or unavailable.
fn build_cues(args: &RunArgs) -> CuePlayer {
    if args.no_sound {
        return CuePlayer::silent();
    }

    let Some(dir) = args.assets.clone().or_else(default_assets_dir) else {
        warn!("No assets directory, sound disabled");
        return CuePlayer::silent();
    };
    let sounds = AssetSounds::discover(&dir);

    match try_create_player() {
        Some(player) => CuePlayer::new(Arc::new(player), sounds),
        None => CuePlayer::silent(),
    }
}

/// Executes a `config` subcommand.
fn config_command(config_path: Option<PathBuf>, command: ConfigCommand) -> Result<()> {
    let store = ConfigStore::locate(config_path).context("Failed to locate config file")?;

    match command {
        ConfigCommand::Show => {
            let config = store.try_load()?;
            Display::show_config(store.path(), &render_config(&config));
        }
        ConfigCommand::Init { force } => {
            if store.path().exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    store.path().display()
                );
            }
            store.save(&TimerConfig::default())?;
            Display::show_config_written(store.path());
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
