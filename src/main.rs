//! Application entry point — voice-to-session.
//!
//! # Startup sequence
//!
//! 1. Parse CLI arguments.
//! 2. Load [`AppConfig`] from disk (falls back to defaults with a warning).
//! 3. Initialise logging.
//! 4. Build the text sink and the transcriber factory from config tags.
//! 5. Start the [`SessionController`].
//! 6. Install the Ctrl-C handler for cooperative shutdown.
//! 7. Poll the status observable, logging phase changes, until the session
//!    returns to Idle.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use voice_to_session::{
    config::AppConfig,
    factory,
    session::{phase_of, SessionController, SessionPhase},
    sink::TargetLookup,
};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Dictate speech into a tmux session.
#[derive(Debug, Parser)]
#[command(name = "voice-to-session", version)]
struct Cli {
    /// Name of the tmux session that receives dictated text.
    #[arg(short, long, env = "VOICE_SESSION_TARGET")]
    target: Option<String>,

    /// Whisper model file stem under the models directory.
    #[arg(short, long)]
    model: Option<String>,

    /// Load settings from an explicit file instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log all operational detail.
    #[arg(short, long)]
    debug: bool,
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Configuration — keep any load error until the logger is up.
    let config_result = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let (mut config, config_err) = match config_result {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(target) = cli.target {
        config.target = target;
    }
    if let Some(model) = cli.model {
        config.stt.model = model;
    }
    if cli.debug {
        config.debug = true;
    }

    // Logging
    let default_filter = if config.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    log::info!("voice-to-session starting up");

    if let Some(e) = config_err {
        log::warn!("failed to load settings ({e}); using defaults");
    }

    // Sink and transcriber factory. The CLI pins the target for the run; a
    // graphical frontend would hand in a lookup backed by its selector.
    let target_name = config.target.clone();
    let lookup: TargetLookup = Box::new(move || target_name.clone());

    let sink = factory::create_sink(&config, lookup)?;
    let transcribers = factory::create_transcriber_factory(&config)?;

    let mut controller = SessionController::new(transcribers, sink, &config);
    let status = controller.status();

    // Ctrl-C requests a cooperative stop; the in-flight phrase completes
    // before the worker exits.
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || shutdown.store(true, Ordering::SeqCst))
            .context("failed to install Ctrl-C handler")?;
    }

    controller.start()?;
    log::info!(
        "dictating into tmux session '{}'; press Ctrl-C to stop",
        config.target
    );

    let mut last_phase = phase_of(&status);
    let mut stop_requested = false;
    loop {
        std::thread::sleep(Duration::from_millis(200));

        let phase = phase_of(&status);
        if phase != last_phase {
            log::info!("session: {}", phase.label());
            last_phase = phase;
        }

        if shutdown.load(Ordering::SeqCst) && !stop_requested {
            controller.stop();
            stop_requested = true;
        }

        if phase == SessionPhase::Idle {
            break;
        }
    }

    if let Some(error) = status.lock().unwrap().last_error.take() {
        log::error!("session ended with an error: {error}");
        anyhow::bail!(error);
    }

    Ok(())
}
