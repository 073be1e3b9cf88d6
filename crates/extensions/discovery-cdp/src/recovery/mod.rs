//! Browser recovery: relaunch a browser with remote debugging enabled,
//! carrying the user's open tabs across.
//!
//! Seven steps run in a fixed order. Every step is recorded with its status
//! and emitted as one structured event on the `sightline::recovery` target.
//! Failures before relaunch are tolerated; a failed relaunch aborts and the
//! remaining steps stay `pending`.

mod endpoint;
mod host;
mod profile;

pub use endpoint::{DebugEndpoint, HttpDebugEndpoint};
pub use host::{BrowserHost, HostError, SystemBrowserHost, parse_scripted_urls};
pub use profile::{ProfileSync, sync_profile};

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use sightline_config::RecoveryConfig;
use tracing::{debug, info};

use crate::browser::BrowserFamily;

/// Recovery steps in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryStep {
    Detect,
    SaveTabs,
    Close,
    SyncProfile,
    Relaunch,
    RestoreTabs,
    Verify,
}

impl RecoveryStep {
    pub const ALL: [RecoveryStep; 7] = [
        RecoveryStep::Detect,
        RecoveryStep::SaveTabs,
        RecoveryStep::Close,
        RecoveryStep::SyncProfile,
        RecoveryStep::Relaunch,
        RecoveryStep::RestoreTabs,
        RecoveryStep::Verify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryStep::Detect => "detect",
            RecoveryStep::SaveTabs => "save-tabs",
            RecoveryStep::Close => "close",
            RecoveryStep::SyncProfile => "sync-profile",
            RecoveryStep::Relaunch => "relaunch",
            RecoveryStep::RestoreTabs => "restore-tabs",
            RecoveryStep::Verify => "verify",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Skipped,
    Success,
    Error,
    /// Not reached because an earlier step aborted the run.
    Pending,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Skipped => "skipped",
            StepStatus::Success => "success",
            StepStatus::Error => "error",
            StepStatus::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub step: RecoveryStep,
    pub status: StepStatus,
    pub message: String,
    pub duration_ms: u64,
}

/// Report of one recovery run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryResult {
    pub success: bool,
    pub browser: Option<String>,
    pub tabs_saved: usize,
    pub tabs_restored: usize,
    pub debugging_enabled: bool,
    pub debug_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub steps: Vec<StepOutcome>,
}

impl RecoveryResult {
    pub fn step(&self, step: RecoveryStep) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step == step)
    }
}

#[derive(Default)]
struct StepLog {
    steps: Vec<StepOutcome>,
}

impl StepLog {
    fn record(&mut self, step: RecoveryStep, status: StepStatus, message: impl Into<String>, started: Instant) {
        let message = message.into();
        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            target: "sightline::recovery",
            step = step.as_str(),
            status = status.as_str(),
            duration_ms,
            message = %message,
            "recovery step"
        );
        self.steps.push(StepOutcome {
            step,
            status,
            message,
            duration_ms,
        });
    }

    fn into_steps(mut self) -> Vec<StepOutcome> {
        for step in RecoveryStep::ALL {
            if !self.steps.iter().any(|s| s.step == step) {
                self.steps.push(StepOutcome {
                    step,
                    status: StepStatus::Pending,
                    message: String::new(),
                    duration_ms: 0,
                });
            }
        }
        self.steps
    }
}

/// Runs the seven recovery steps against a host and a debugging endpoint.
pub struct RecoverySaga {
    host: Arc<dyn BrowserHost>,
    endpoint: Arc<dyn DebugEndpoint>,
    config: RecoveryConfig,
    /// Port an already-debuggable browser would answer on.
    current_port: u16,
}

impl RecoverySaga {
    pub fn new(host: Arc<dyn BrowserHost>, endpoint: Arc<dyn DebugEndpoint>, config: RecoveryConfig) -> Self {
        let current_port = config.debug_port;
        Self {
            host,
            endpoint,
            config,
            current_port,
        }
    }

    pub fn with_current_port(mut self, port: u16) -> Self {
        self.current_port = port;
        self
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Recover the browser named by `hint`, or by the active application.
    ///
    /// Never returns an error: failures are reported in the result.
    pub async fn run(&self, hint: Option<&str>, active_app: Option<&str>) -> RecoveryResult {
        let port = self.config.debug_port;
        let mut log = StepLog::default();
        let mut result = RecoveryResult {
            debug_port: port,
            ..Default::default()
        };

        // 1. Detect
        let started = Instant::now();
        let subject = hint.filter(|h| !h.trim().is_empty()).or(active_app).unwrap_or_default();
        let Some(family) = BrowserFamily::from_hint(subject) else {
            let message = format!("'{subject}' is not a supported browser");
            log.record(RecoveryStep::Detect, StepStatus::Error, message.clone(), started);
            result.error = Some(message);
            result.steps = log.into_steps();
            return result;
        };
        result.browser = Some(family.id().to_string());
        log.record(RecoveryStep::Detect, StepStatus::Success, family.app_name(), started);

        // 2. Save tabs
        let started = Instant::now();
        let urls = self.save_tabs(family, &mut log, started).await;
        result.tabs_saved = urls.len();

        // 3. Close
        let started = Instant::now();
        match self.host.close(family, self.config.close_wait()).await {
            Ok(()) => log.record(RecoveryStep::Close, StepStatus::Success, "browser closed", started),
            Err(e) => log.record(RecoveryStep::Close, StepStatus::Error, e.to_string(), started),
        }

        // 4. Sync profile
        let started = Instant::now();
        let profile_dir = self.config.profile_dir(family.id());
        if self.config.resync_profile {
            match self.host.sync_profile(family, &profile_dir).await {
                Ok(stats) => log.record(
                    RecoveryStep::SyncProfile,
                    StepStatus::Success,
                    format!("copied {} files, {} failed", stats.copied, stats.failed),
                    started,
                ),
                Err(e) => log.record(RecoveryStep::SyncProfile, StepStatus::Error, e.to_string(), started),
            }
        } else {
            log.record(RecoveryStep::SyncProfile, StepStatus::Skipped, "resync disabled", started);
        }

        // 5. Relaunch
        let started = Instant::now();
        match self.host.launch(family, port, &profile_dir).await {
            Ok(pid) => log.record(
                RecoveryStep::Relaunch,
                StepStatus::Success,
                format!("pid {pid} on port {port}"),
                started,
            ),
            Err(e) => {
                let message = format!("relaunch failed: {e}");
                log.record(RecoveryStep::Relaunch, StepStatus::Error, message.clone(), started);
                result.error = Some(message);
                result.steps = log.into_steps();
                return result;
            }
        }
        tokio::time::sleep(self.config.startup_wait()).await;

        // 6. Restore tabs
        let started = Instant::now();
        let reachable = self.wait_reachable(port).await;
        if !reachable {
            log.record(
                RecoveryStep::RestoreTabs,
                StepStatus::Error,
                format!("endpoint unreachable after {} polls", self.config.poll_attempts),
                started,
            );
        } else if urls.is_empty() {
            log.record(RecoveryStep::RestoreTabs, StepStatus::Skipped, "no tabs to restore", started);
        } else {
            match self.endpoint.open_tabs(port, &urls).await {
                Ok(opened) => {
                    result.tabs_restored = opened;
                    log.record(
                        RecoveryStep::RestoreTabs,
                        StepStatus::Success,
                        format!("restored {opened} of {}", urls.len()),
                        started,
                    );
                }
                Err(e) => log.record(RecoveryStep::RestoreTabs, StepStatus::Error, e.to_string(), started),
            }
        }

        // 7. Verify
        let started = Instant::now();
        result.debugging_enabled = self.endpoint.is_reachable(port).await;
        if result.debugging_enabled {
            log.record(
                RecoveryStep::Verify,
                StepStatus::Success,
                format!("debugging reachable on port {port}"),
                started,
            );
        } else {
            let message = format!("debugging not reachable on port {port}");
            log.record(RecoveryStep::Verify, StepStatus::Error, message.clone(), started);
            result.error = Some(message);
        }

        result.success = result.debugging_enabled;
        result.steps = log.into_steps();
        result
    }

    /// Debugger listing when one is already reachable, else OS scripting.
    async fn save_tabs(&self, family: BrowserFamily, log: &mut StepLog, started: Instant) -> Vec<String> {
        if self.endpoint.is_reachable(self.current_port).await {
            match self.endpoint.page_urls(self.current_port).await {
                Ok(urls) => {
                    let message = format!("saved {} tabs via debugger", urls.len());
                    log.record(RecoveryStep::SaveTabs, StepStatus::Success, message, started);
                    return urls;
                }
                Err(e) => debug!(error = %e, "Debugger tab listing failed"),
            }
        }

        match self.host.scripted_tab_urls(family).await {
            Ok(urls) => {
                let message = format!("saved {} tabs via scripting", urls.len());
                log.record(RecoveryStep::SaveTabs, StepStatus::Success, message, started);
                urls
            }
            Err(e) => {
                let message = format!("no tabs saved: {e}");
                log.record(RecoveryStep::SaveTabs, StepStatus::Error, message, started);
                Vec::new()
            }
        }
    }

    async fn wait_reachable(&self, port: u16) -> bool {
        let attempts = self.config.poll_attempts.max(1);
        for attempt in 1..=attempts {
            if self.endpoint.is_reachable(port).await {
                debug!(attempt, port, "Debugging endpoint reachable");
                return true;
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.poll_interval()).await;
            }
        }
        false
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
