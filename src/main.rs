//! Sightline - adaptive UI discovery and verified-action engine.
//!
//! Operator entry point: loads the configuration, wires the engine and runs
//! one command, printing JSON on stdout.

mod cli;
mod wiring;

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sightline_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig, sightline_dir};
use sightline_desktop_control::{EnigoActuator, ScreenCapturer};
use sightline_protocols::{FocusedWindowProvider, PointerSource, ScreenCapture, WindowTarget};

use cli::{BridgeAction, Cli, Commands, ConfigAction};
use wiring::Engine;

fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&logging.dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("sightline")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&logging.dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the file writer flushing until exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // stdout carries command output, so the console layer writes to stderr.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| sightline_dir().join("config.toml"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let path = config_path(&cli);

    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Validate => validate_config(&path),
        };
    }

    let config = ConfigLoader::load_or_default(&path)?;
    init_tracing(&config.logging)?;
    info!(config = %path.display(), "Sightline starting");

    let engine = Engine::new(config);
    run(engine, cli.command).await
}

async fn run(engine: Engine, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Detect { class, process } => {
            let strategy = engine.dispatcher.detect(&class, &process);
            print_json(&json!({
                "windowClass": class,
                "processName": process,
                "strategy": strategy,
            }))
        }

        Commands::Discover {
            class,
            process,
            title,
        } => {
            let tree = if class.is_none() && process.is_none() && title.is_none() {
                engine.dispatcher.discover_focused().await?
            } else {
                let target = WindowTarget::new(
                    title.unwrap_or_default(),
                    class.unwrap_or_default(),
                    process.unwrap_or_default(),
                );
                engine.dispatcher.discover(Some(target)).await?
            };
            print_json(&tree)
        }

        Commands::Browser { process, title, at } => {
            let target = WindowTarget::new(title, "", process);
            let info = engine.browser.detector().detect(&target, None).await;
            match at {
                None => print_json(&info),
                Some((x, y)) => {
                    let element = engine.browser.element_at(&target, x, y).await?;
                    print_json(&json!({ "browser": info, "element": element }))
                }
            }
        }

        Commands::Recover { browser } => {
            let active_app = match engine.window.focused_window().await {
                Ok(window) => window.map(|w| w.process_name),
                Err(e) => {
                    warn!(error = %e, "Focused window unavailable");
                    None
                }
            };
            let result = engine
                .recovery_saga()
                .run(browser.as_deref(), active_app.as_deref())
                .await;
            print_json(&result)
        }

        Commands::Bridge { action } => match action {
            BridgeAction::Probe => print_json(&json!({
                "endpoint": engine.bridge.endpoint(),
                "available": engine.bridge.is_available().await,
            })),
            BridgeAction::Elements => {
                let snapshot = engine.bridge.get_elements().await?;
                print_json(&snapshot)
            }
        },

        Commands::Capture { output } => {
            let shot = ScreenCapturer::new().capture().await?;
            tokio::fs::write(&output, &shot.data).await?;
            print_json(&json!({
                "path": output,
                "width": shot.width,
                "height": shot.height,
            }))
        }

        Commands::Pointer => {
            let (x, y) = EnigoActuator::new().position().await?;
            print_json(&json!({ "x": x, "y": y }))
        }

        // Handled before the engine is built.
        Commands::Config { .. } => Ok(()),
    }
}

fn validate_config(path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let config: Config = ConfigLoader::load(path)?;
    let result = ConfigValidator::validate(&config)?;

    let errors: Vec<_> = result
        .errors
        .iter()
        .map(|e| json!({ "path": e.path, "message": e.message }))
        .collect();
    let warnings: Vec<_> = result
        .warnings
        .iter()
        .map(|w| json!({ "path": w.path, "message": w.message }))
        .collect();
    print_json(&json!({
        "path": path,
        "valid": result.is_valid(),
        "errors": errors,
        "warnings": warnings,
    }))?;

    if !result.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}
