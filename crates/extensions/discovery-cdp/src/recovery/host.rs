//! Operating-system side of recovery: processes, scripting, launching.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System, UpdateKind};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::profile::{self, ProfileSync};
use crate::browser::{BrowserFamily, BrowserProcess, parse_debug_port};

/// Interval between "has it exited yet" checks while closing.
const EXIT_POLL: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Not supported on this platform: {0}")]
    Unsupported(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What recovery needs from the machine the browser runs on.
#[async_trait]
pub trait BrowserHost: Send + Sync {
    /// Running processes of one family, main processes first.
    async fn find_processes(&self, family: BrowserFamily) -> Vec<BrowserProcess>;

    /// Tab URLs read through OS scripting, without a debugger.
    async fn scripted_tab_urls(&self, family: BrowserFamily) -> Result<Vec<String>, HostError>;

    /// Graceful quit, then force after `grace`.
    async fn close(&self, family: BrowserFamily, grace: Duration) -> Result<(), HostError>;

    /// Seed `dest` from the family's everyday profile.
    async fn sync_profile(&self, family: BrowserFamily, dest: &Path) -> Result<ProfileSync, HostError>;

    /// Start the browser with debugging on `port`; returns the pid.
    async fn launch(&self, family: BrowserFamily, port: u16, profile_dir: &Path) -> Result<u32, HostError>;
}

/// [`BrowserHost`] for the local machine.
///
/// Process-table scans are blocking and run on the blocking pool.
#[derive(Debug, Default, Clone)]
pub struct SystemBrowserHost;

impl SystemBrowserHost {
    pub fn new() -> Self {
        Self
    }

    fn find_executable(family: BrowserFamily) -> Option<PathBuf> {
        family.executable_candidates().into_iter().find(|p| p.exists())
    }

    async fn request_quit(family: BrowserFamily, pids: &[u32]) {
        if cfg!(target_os = "macos") {
            let script = format!(r#"tell application "{}" to quit"#, family.app_name());
            if let Err(e) = run_output("osascript", &["-e", &script]).await {
                warn!(browser = %family, error = %e, "Scripted quit failed");
            }
        } else if cfg!(target_os = "windows") {
            if let Err(e) = run_output("taskkill", &["/IM", family.windows_image()]).await {
                warn!(browser = %family, error = %e, "taskkill failed");
            }
        } else {
            signal_blocking(pids.to_vec(), false).await;
        }
    }
}

fn snapshot() -> System {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always),
    );
    system
}

fn scan_processes(family: BrowserFamily) -> Vec<BrowserProcess> {
    let system = snapshot();
    let mut found: Vec<BrowserProcess> = system
        .processes()
        .values()
        .filter_map(|process| {
            let name = process.name().to_string_lossy().into_owned();
            if !family.matches_process(&name) {
                return None;
            }
            let args: Vec<String> = process
                .cmd()
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect();
            Some(BrowserProcess {
                pid: process.pid().as_u32(),
                name,
                debug_port: parse_debug_port(&args),
                is_main: !args.iter().any(|a| a.starts_with("--type=")),
            })
        })
        .collect();
    found.sort_by_key(|p| (!p.is_main, p.pid));
    found
}

/// SIGTERM, or kill when `force`. Returns how many signals were not delivered.
fn signal_processes(pids: &[u32], force: bool) -> usize {
    let system = snapshot();
    pids.iter()
        .filter_map(|pid| system.process(Pid::from_u32(*pid)))
        .filter(|process| {
            let sent = if force {
                process.kill()
            } else {
                process.kill_with(Signal::Term).unwrap_or(false)
            };
            !sent
        })
        .count()
}

async fn signal_blocking(pids: Vec<u32>, force: bool) -> usize {
    let count = pids.len();
    match tokio::task::spawn_blocking(move || signal_processes(&pids, force)).await {
        Ok(failed) => failed,
        Err(e) => {
            warn!(error = %e, "Signal task failed");
            count
        }
    }
}

async fn run_output(program: &str, args: &[&str]) -> Result<String, HostError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await?;
    if !output.status.success() {
        return Err(HostError::Command(format!(
            "{program} exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// AppleScript list output: `url1, url2, url3`.
pub fn parse_scripted_urls(output: &str) -> Vec<String> {
    output
        .split(", ")
        .map(str::trim)
        .filter(|u| !u.is_empty() && *u != "missing value")
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl BrowserHost for SystemBrowserHost {
    async fn find_processes(&self, family: BrowserFamily) -> Vec<BrowserProcess> {
        match tokio::task::spawn_blocking(move || scan_processes(family)).await {
            Ok(found) => found,
            Err(e) => {
                warn!(browser = %family, error = %e, "Process scan task failed");
                Vec::new()
            }
        }
    }

    async fn scripted_tab_urls(&self, family: BrowserFamily) -> Result<Vec<String>, HostError> {
        if !cfg!(target_os = "macos") {
            return Err(HostError::Unsupported("tab scripting".to_string()));
        }
        let script = format!(
            r#"tell application "{}" to get URL of every tab of every window"#,
            family.app_name()
        );
        let output = run_output("osascript", &["-e", &script]).await?;
        Ok(parse_scripted_urls(&output))
    }

    async fn close(&self, family: BrowserFamily, grace: Duration) -> Result<(), HostError> {
        let pids: Vec<u32> = self.find_processes(family).await.iter().map(|p| p.pid).collect();
        if pids.is_empty() {
            debug!(browser = %family, "Browser not running");
            return Ok(());
        }

        Self::request_quit(family, &pids).await;

        let started = Instant::now();
        while started.elapsed() < grace {
            if self.find_processes(family).await.is_empty() {
                info!(browser = %family, "Browser exited");
                return Ok(());
            }
            tokio::time::sleep(EXIT_POLL).await;
        }

        let remaining: Vec<u32> = self.find_processes(family).await.iter().map(|p| p.pid).collect();
        let survivors = signal_blocking(remaining, true).await;
        if survivors > 0 {
            return Err(HostError::Command(format!("{survivors} {family} processes survived kill")));
        }
        warn!(browser = %family, "Browser force-killed after grace period");
        Ok(())
    }

    async fn sync_profile(&self, family: BrowserFamily, dest: &Path) -> Result<ProfileSync, HostError> {
        let source = family
            .default_profile_dir()
            .ok_or_else(|| HostError::NotFound(format!("{family} profile directory")))?;
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || profile::sync_profile(&source, &dest))
            .await
            .map_err(|e| HostError::Command(e.to_string()))?
            .map_err(HostError::from)
    }

    async fn launch(&self, family: BrowserFamily, port: u16, profile_dir: &Path) -> Result<u32, HostError> {
        let executable = Self::find_executable(family)
            .ok_or_else(|| HostError::NotFound(format!("{family} executable")))?;
        tokio::fs::create_dir_all(profile_dir).await?;

        info!(browser = %family, port, profile = %profile_dir.display(), "Launching browser");

        let child = Command::new(&executable)
            .arg(format!("--remote-debugging-port={port}"))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        child
            .id()
            .ok_or_else(|| HostError::Command("browser exited immediately".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scripted_urls() {
        let urls = parse_scripted_urls("https://a.example/, https://b.example/x, missing value\n");
        assert_eq!(urls, vec!["https://a.example/", "https://b.example/x"]);
        assert!(parse_scripted_urls("\n").is_empty());
    }

    #[test]
    fn test_signal_skips_missing_pids() {
        assert_eq!(signal_processes(&[], true), 0);
        // Pids above the kernel maximum never exist.
        assert_eq!(signal_processes(&[u32::MAX - 1], false), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_find_processes_off_executor() {
        let host = SystemBrowserHost::new();
        let ticker = tokio::spawn(async { tokio::task::yield_now().await });

        let found = host.find_processes(BrowserFamily::Vivaldi).await;

        assert!(ticker.await.is_ok());
        assert!(found.windows(2).all(|w| (!w[0].is_main, w[0].pid) <= (!w[1].is_main, w[1].pid)));
        assert!(found.iter().all(|p| BrowserFamily::Vivaldi.matches_process(&p.name)));
    }
}
