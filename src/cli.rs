//! CLI definitions for Sightline.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sightline CLI.
#[derive(Parser)]
#[command(name = "sightline")]
#[command(about = "Adaptive UI discovery and verified-action engine")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.sightline/config.toml)
    #[arg(short, long, global = true, env = "SIGHTLINE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the discovery strategy for a window
    Detect {
        /// Window class
        #[arg(long, default_value = "")]
        class: String,

        /// Owning process name
        #[arg(long, default_value = "")]
        process: String,
    },

    /// Discover UI elements (the focused window when no target is given)
    Discover {
        #[arg(long)]
        class: Option<String>,

        #[arg(long)]
        process: Option<String>,

        #[arg(long)]
        title: Option<String>,
    },

    /// Detect a browser and its debugging state
    Browser {
        /// Browser process name or hint
        #[arg(long)]
        process: String,

        /// Window title used to pick the page
        #[arg(long, default_value = "")]
        title: String,

        /// Also resolve the page element under a screen point
        #[arg(long, value_parser = parse_point)]
        at: Option<(f64, f64)>,
    },

    /// Relaunch a browser with remote debugging, preserving tabs
    Recover {
        /// Browser hint (defaults to the focused application)
        #[arg(long)]
        browser: Option<String>,
    },

    /// Game bridge commands
    Bridge {
        #[command(subcommand)]
        action: BridgeAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Capture the primary monitor to a PNG file
    Capture {
        output: PathBuf,
    },

    /// Print the pointer position
    Pointer,
}

#[derive(Subcommand)]
pub(crate) enum BridgeAction {
    /// Check whether a bridge is listening
    Probe,

    /// Fetch one element snapshot
    Elements,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Validate the configuration file
    Validate,
}

/// `x,y` in screen pixels.
pub(crate) fn parse_point(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{value}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{}': {e}", s.trim()))
    };
    Ok((parse(x)?, parse(y)?))
}
