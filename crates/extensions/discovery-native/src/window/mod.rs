//! Focused-window detection.

mod parsers;

pub use parsers::{FrontWindow, parse_front_window, parse_xdotool_geometry, parse_xprop_class};

use async_trait::async_trait;
use sightline_protocols::{FocusedWindowProvider, WindowError, WindowTarget};

#[cfg(any(target_os = "linux", target_os = "macos"))]
use tokio::process::Command;
#[cfg(any(target_os = "linux", target_os = "macos"))]
use tracing::debug;

/// Run a query command; `None` when it exits non-zero.
#[cfg(any(target_os = "linux", target_os = "macos"))]
async fn query(program: &str, args: &[&str]) -> Result<Option<String>, WindowError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| WindowError::QueryFailed(format!("{program}: {e}")))?;
    if !output.status.success() {
        debug!(program, stderr = %String::from_utf8_lossy(&output.stderr).trim(), "Window query failed");
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&output.stdout).trim_end().to_string()))
}

/// Focused window of the local desktop session.
#[derive(Debug, Default, Clone)]
pub struct SystemWindowProvider;

impl SystemWindowProvider {
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "linux")]
    async fn query_focused(&self) -> Result<Option<WindowTarget>, WindowError> {
        let Some(id) = query("xdotool", &["getactivewindow"]).await? else {
            return Ok(None);
        };
        let id = id.trim().to_string();

        let title = query("xdotool", &["getwindowname", &id]).await?.unwrap_or_default();
        let pid: Option<u32> = query("xdotool", &["getwindowpid", &id])
            .await?
            .and_then(|p| p.trim().parse().ok());
        let bounds = query("xdotool", &["getwindowgeometry", "--shell", &id])
            .await?
            .and_then(|out| parse_xdotool_geometry(&out));
        let class = query("xprop", &["-id", &id, "WM_CLASS"])
            .await?
            .and_then(|out| parse_xprop_class(&out))
            .unwrap_or_default();

        let process = match pid {
            Some(pid) => tokio::fs::read_to_string(format!("/proc/{pid}/comm"))
                .await
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            None => String::new(),
        };

        let mut target = WindowTarget::new(title, class, process);
        target.pid = pid;
        target.bounds = bounds;
        Ok(Some(target))
    }

    #[cfg(target_os = "macos")]
    async fn query_focused(&self) -> Result<Option<WindowTarget>, WindowError> {
        const SCRIPT: &str = r#"
            tell application "System Events"
                set frontApp to first application process whose frontmost is true
                set appName to name of frontApp
                set appPid to unix id of frontApp
                set winTitle to ""
                set winBounds to "0,0,0,0"
                try
                    set frontWin to front window of frontApp
                    set winTitle to name of frontWin
                    set p to position of frontWin
                    set s to size of frontWin
                    set winBounds to ((item 1 of p) as text) & "," & ((item 2 of p) as text) & "," & ((item 1 of s) as text) & "," & ((item 2 of s) as text)
                end try
                return appName & linefeed & appPid & linefeed & winTitle & linefeed & winBounds
            end tell
        "#;

        let Some(output) = query("osascript", &["-e", SCRIPT]).await? else {
            return Ok(None);
        };
        Ok(parse_front_window(&output).map(|front| {
            let mut target = WindowTarget::new(front.title, String::new(), front.app_name);
            target.pid = front.pid;
            target.bounds = front.bounds;
            target
        }))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    async fn query_focused(&self) -> Result<Option<WindowTarget>, WindowError> {
        Err(WindowError::PlatformNotSupported)
    }
}

#[async_trait]
impl FocusedWindowProvider for SystemWindowProvider {
    async fn focused_window(&self) -> Result<Option<WindowTarget>, WindowError> {
        self.query_focused().await
    }
}
