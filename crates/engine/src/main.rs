//! Clockwork - terminal host for the clock engine.
//!
//! Reads one command per line from stdin (`start`, `stop`, `toggle`,
//! `status`, `set HH:MM:SS`, `quit`, or `key=value` options) and applies it
//! to the engine.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clockwork_engine::api::ClockCommand;
use clockwork_engine::infrastructure::{
    clock::SystemClock, notifier::TracingNotifier, ports::ClockPort, settings::ClockSettings,
};
use clockwork_engine::{ClockApp, CommandOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clockwork_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Clockwork");

    // Load configuration
    let settings = ClockSettings::from_env()?;
    let bounds = settings.rate_bounds()?;
    tracing::info!(
        min_rate = bounds.min_magnitude(),
        max_rate = bounds.max_magnitude(),
        countdown_start = %settings.countdown_start,
        start_time = %settings.start_time,
        realtime_startup_delay_ms = settings.realtime_startup_delay_ms,
        manual_time_set_allowed = settings.manual_time_set_allowed,
        "Clock settings loaded"
    );

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let notifier = Arc::new(TracingNotifier::new(clock.clone()));
    let mut app = ClockApp::new(&settings, clock, Some(notifier))?;

    if let Some(delay) = settings.realtime_startup_delay() {
        app.schedule_real_time_startup(delay);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = next_input_line(&mut lines) => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                None
            }
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command: ClockCommand = match line.parse() {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(input = %line.trim(), error = %e, "Ignoring command");
                continue;
            }
        };

        match app.execute(command).await {
            Ok(CommandOutcome::Applied) => {}
            Ok(CommandOutcome::Snapshot(snapshot)) => {
                println!("{}", serde_json::to_string(&snapshot)?);
            }
            Ok(CommandOutcome::Quit) => break,
            Err(e) => tracing::warn!(command = ?command, error = %e, "Command rejected"),
        }
    }

    app.shutdown().await;
    Ok(())
}

/// Next line of input. Lines that are not valid UTF-8 are logged and skipped;
/// any other read error ends the host.
async fn next_input_line<R>(lines: &mut Lines<R>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match lines.next_line().await {
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                tracing::warn!(error = %e, "Ignoring unreadable input line");
            }
            other => return other,
        }
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
