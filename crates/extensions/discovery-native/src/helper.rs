//! Discovery through external helper programs.
//!
//! A helper is any executable that prints the window's elements as JSON on
//! stdout. Helpers exist per platform technique (accessibility walks,
//! legacy sweeps, shell enumeration) and are configured under
//! `[discovery.helpers.<source>]`.
//!
//! Helper misbehaviour (timeout, non-zero exit, unparseable output) yields
//! zero elements so the dispatcher moves on to its next fallback. Only a
//! helper that cannot be started at all is reported as an error.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use sightline_config::{DiscoveryConfig, HelperConfig};
use sightline_protocols::{DiscoveryError, DiscoverySource, RawElement, SourceKind, UIElement, WindowTarget};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Accepted stdout shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum HelperOutput {
    List(Vec<RawElement>),
    Wrapped {
        #[serde(default)]
        elements: Vec<RawElement>,
    },
}

/// Parse helper stdout: empty, a JSON array, or `{"elements": [...]}`.
pub fn parse_helper_output(stdout: &str) -> Result<Vec<UIElement>, serde_json::Error> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let raw = match serde_json::from_str::<HelperOutput>(trimmed)? {
        HelperOutput::List(elements) | HelperOutput::Wrapped { elements } => elements,
    };
    Ok(raw.into_iter().filter_map(RawElement::normalize).collect())
}

/// Replace `{window}`, `{class}`, `{process}` and `{pid}` in one argument.
pub fn substitute(arg: &str, target: &WindowTarget) -> String {
    let pid = target.pid.map(|p| p.to_string()).unwrap_or_default();
    arg.replace("{window}", &target.title)
        .replace("{class}", &target.window_class)
        .replace("{process}", &target.process_name)
        .replace("{pid}", &pid)
}

pub struct HelperSource {
    kind: SourceKind,
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl HelperSource {
    pub fn new(kind: SourceKind, program: impl Into<PathBuf>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            kind,
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(kind: SourceKind, config: &HelperConfig, default_timeout: Duration) -> Self {
        let timeout = config.timeout_ms.map(Duration::from_millis).unwrap_or(default_timeout);
        Self::new(kind, config.program.clone(), config.args.clone(), timeout)
    }

    /// One source per `[discovery.helpers.*]` entry; unknown names are skipped.
    pub fn all_from_config(config: &DiscoveryConfig) -> Vec<Self> {
        let mut sources: Vec<Self> = config
            .helpers
            .iter()
            .filter_map(|(name, helper)| match SourceKind::from_name(name) {
                Some(SourceKind::Browser | SourceKind::GameBridge) | None => {
                    warn!(helper = %name, "Ignoring helper for unknown or built-in source");
                    None
                }
                Some(kind) => Some(Self::from_config(kind, helper, config.helper_timeout())),
            })
            .collect();
        sources.sort_by_key(|s| s.kind);
        sources
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }
}

#[async_trait]
impl DiscoverySource for HelperSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    #[instrument(skip(self, target), fields(source = %self.kind, window = %target.title))]
    async fn run(&self, target: &WindowTarget) -> Result<Vec<UIElement>, DiscoveryError> {
        let args: Vec<String> = self.args.iter().map(|a| substitute(a, target)).collect();

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DiscoveryError::Helper(format!("{}: {e}", self.program.display())))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(error = %e, "Helper I/O failed");
                return Ok(Vec::new());
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Helper timed out");
                return Ok(Vec::new());
            }
        };

        if !output.status.success() {
            warn!(
                code = output.status.code().unwrap_or(-1),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Helper exited with failure"
            );
            return Ok(Vec::new());
        }

        match parse_helper_output(&String::from_utf8_lossy(&output.stdout)) {
            Ok(elements) => {
                debug!(elements = elements.len(), "Helper finished");
                Ok(elements)
            }
            Err(e) => {
                warn!(error = %e, "Helper printed invalid JSON");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
#[path = "helper_tests.rs"]
mod tests;
