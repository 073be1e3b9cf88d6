//! Chromium-family browsers and detection of their debugging state.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use sightline_protocols::{BrowserInfo, WindowTarget};
use tracing::debug;

use crate::recovery::{BrowserHost, DebugEndpoint};

/// Browsers that speak the DevTools protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserFamily {
    Chrome,
    Edge,
    Brave,
    Chromium,
    Opera,
    Vivaldi,
}

impl BrowserFamily {
    /// Most specific markers first: "chrome" must be tried last.
    pub const ALL: [BrowserFamily; 6] = [
        BrowserFamily::Edge,
        BrowserFamily::Brave,
        BrowserFamily::Opera,
        BrowserFamily::Vivaldi,
        BrowserFamily::Chromium,
        BrowserFamily::Chrome,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            BrowserFamily::Chrome => "chrome",
            BrowserFamily::Edge => "edge",
            BrowserFamily::Brave => "brave",
            BrowserFamily::Chromium => "chromium",
            BrowserFamily::Opera => "opera",
            BrowserFamily::Vivaldi => "vivaldi",
        }
    }

    /// Application name used by macOS scripting.
    pub fn app_name(&self) -> &'static str {
        match self {
            BrowserFamily::Chrome => "Google Chrome",
            BrowserFamily::Edge => "Microsoft Edge",
            BrowserFamily::Brave => "Brave Browser",
            BrowserFamily::Chromium => "Chromium",
            BrowserFamily::Opera => "Opera",
            BrowserFamily::Vivaldi => "Vivaldi",
        }
    }

    /// Lowercase process-name markers across platforms.
    pub fn process_markers(&self) -> &'static [&'static str] {
        match self {
            BrowserFamily::Chrome => &["chrome", "google chrome", "google-chrome"],
            BrowserFamily::Edge => &["msedge", "microsoft edge", "microsoft-edge"],
            BrowserFamily::Brave => &["brave"],
            BrowserFamily::Chromium => &["chromium"],
            BrowserFamily::Opera => &["opera"],
            BrowserFamily::Vivaldi => &["vivaldi"],
        }
    }

    /// Classify a process name, application name or free-form hint.
    pub fn from_hint(hint: &str) -> Option<Self> {
        let hint = hint.trim().to_lowercase();
        if hint.is_empty() {
            return None;
        }
        let hint = hint.strip_suffix(".exe").unwrap_or(&hint);
        Self::ALL.into_iter().find(|family| {
            family.id() == hint || family.process_markers().iter().any(|m| hint.contains(m))
        })
    }

    pub fn matches_process(&self, process_name: &str) -> bool {
        Self::from_hint(process_name) == Some(*self)
    }

    /// Image name for `taskkill /IM`.
    pub fn windows_image(&self) -> &'static str {
        match self {
            BrowserFamily::Chrome => "chrome.exe",
            BrowserFamily::Edge => "msedge.exe",
            BrowserFamily::Brave => "brave.exe",
            BrowserFamily::Chromium => "chromium.exe",
            BrowserFamily::Opera => "opera.exe",
            BrowserFamily::Vivaldi => "vivaldi.exe",
        }
    }

    /// Installed executable locations to try, in order.
    pub fn executable_candidates(&self) -> Vec<PathBuf> {
        let paths: &[&str] = if cfg!(target_os = "macos") {
            match self {
                BrowserFamily::Chrome => &["/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"],
                BrowserFamily::Edge => &["/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge"],
                BrowserFamily::Brave => &["/Applications/Brave Browser.app/Contents/MacOS/Brave Browser"],
                BrowserFamily::Chromium => &["/Applications/Chromium.app/Contents/MacOS/Chromium"],
                BrowserFamily::Opera => &["/Applications/Opera.app/Contents/MacOS/Opera"],
                BrowserFamily::Vivaldi => &["/Applications/Vivaldi.app/Contents/MacOS/Vivaldi"],
            }
        } else if cfg!(target_os = "windows") {
            match self {
                BrowserFamily::Chrome => &[
                    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
                    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
                ],
                BrowserFamily::Edge => &[
                    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
                    r"C:\Program Files\Microsoft\Edge\Application\msedge.exe",
                ],
                BrowserFamily::Brave => &[
                    r"C:\Program Files\BraveSoftware\Brave-Browser\Application\brave.exe",
                ],
                BrowserFamily::Chromium => &[r"C:\Program Files\Chromium\Application\chrome.exe"],
                BrowserFamily::Opera => &[r"C:\Program Files\Opera\launcher.exe"],
                BrowserFamily::Vivaldi => &[r"C:\Program Files\Vivaldi\Application\vivaldi.exe"],
            }
        } else {
            match self {
                BrowserFamily::Chrome => &["/usr/bin/google-chrome", "/usr/bin/google-chrome-stable"],
                BrowserFamily::Edge => &["/usr/bin/microsoft-edge", "/usr/bin/microsoft-edge-stable"],
                BrowserFamily::Brave => &["/usr/bin/brave-browser", "/usr/bin/brave"],
                BrowserFamily::Chromium => &[
                    "/usr/bin/chromium",
                    "/usr/bin/chromium-browser",
                    "/snap/bin/chromium",
                ],
                BrowserFamily::Opera => &["/usr/bin/opera"],
                BrowserFamily::Vivaldi => &["/usr/bin/vivaldi", "/usr/bin/vivaldi-stable"],
            }
        };
        let mut candidates: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();

        let local = dirs::data_local_dir().filter(|_| cfg!(target_os = "windows"));
        if let Some(local) = local {
            let per_user = match self {
                BrowserFamily::Chrome => Some(r"Google\Chrome\Application\chrome.exe"),
                BrowserFamily::Brave => Some(r"BraveSoftware\Brave-Browser\Application\brave.exe"),
                BrowserFamily::Opera => Some(r"Programs\Opera\launcher.exe"),
                BrowserFamily::Vivaldi => Some(r"Vivaldi\Application\vivaldi.exe"),
                _ => None,
            };
            candidates.extend(per_user.map(|p| local.join(p)));
        }
        candidates
    }

    /// The user's everyday profile directory.
    pub fn default_profile_dir(&self) -> Option<PathBuf> {
        if cfg!(target_os = "windows") {
            let local = dirs::data_local_dir()?;
            Some(match self {
                BrowserFamily::Chrome => local.join(r"Google\Chrome\User Data"),
                BrowserFamily::Edge => local.join(r"Microsoft\Edge\User Data"),
                BrowserFamily::Brave => local.join(r"BraveSoftware\Brave-Browser\User Data"),
                BrowserFamily::Chromium => local.join(r"Chromium\User Data"),
                BrowserFamily::Opera => dirs::config_dir()?.join(r"Opera Software\Opera Stable"),
                BrowserFamily::Vivaldi => local.join(r"Vivaldi\User Data"),
            })
        } else if cfg!(target_os = "macos") {
            let support = dirs::config_dir()?;
            Some(support.join(match self {
                BrowserFamily::Chrome => "Google/Chrome",
                BrowserFamily::Edge => "Microsoft Edge",
                BrowserFamily::Brave => "BraveSoftware/Brave-Browser",
                BrowserFamily::Chromium => "Chromium",
                BrowserFamily::Opera => "com.operasoftware.Opera",
                BrowserFamily::Vivaldi => "Vivaldi",
            }))
        } else {
            let config = dirs::config_dir()?;
            Some(config.join(match self {
                BrowserFamily::Chrome => "google-chrome",
                BrowserFamily::Edge => "microsoft-edge",
                BrowserFamily::Brave => "BraveSoftware/Brave-Browser",
                BrowserFamily::Chromium => "chromium",
                BrowserFamily::Opera => "opera",
                BrowserFamily::Vivaldi => "vivaldi",
            }))
        }
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A running browser process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserProcess {
    pub pid: u32,
    pub name: String,
    pub debug_port: Option<u16>,
    /// False for renderer, GPU and utility children (`--type=...`).
    pub is_main: bool,
}

/// `--remote-debugging-port=N` or `--remote-debugging-port N`.
pub fn parse_debug_port<S: AsRef<str>>(args: &[S]) -> Option<u16> {
    const FLAG: &str = "--remote-debugging-port";
    let mut iter = args.iter().map(|a| a.as_ref());
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix(FLAG) {
            let value = match value.strip_prefix('=') {
                Some(v) => v,
                None if value.is_empty() => iter.next().unwrap_or_default(),
                None => continue,
            };
            if let Ok(port) = value.trim().parse::<u16>() {
                return (port != 0).then_some(port);
            }
        }
    }
    None
}

/// Builds a fresh [`BrowserInfo`] on every call.
pub struct BrowserDetector {
    host: Arc<dyn BrowserHost>,
    endpoint: Arc<dyn DebugEndpoint>,
    fallback_port: u16,
}

impl BrowserDetector {
    pub fn new(host: Arc<dyn BrowserHost>, endpoint: Arc<dyn DebugEndpoint>, fallback_port: u16) -> Self {
        Self {
            host,
            endpoint,
            fallback_port,
        }
    }

    /// Detect the browser behind a window. `hint` overrides the process name.
    ///
    /// `None` when the window does not belong to a known browser.
    pub async fn detect(&self, target: &WindowTarget, hint: Option<&str>) -> Option<BrowserInfo> {
        let family = BrowserFamily::from_hint(hint.unwrap_or(&target.process_name))?;

        let processes = self.host.find_processes(family).await;
        let main = processes.iter().find(|p| p.is_main).or(processes.first());
        let flagged_port = processes.iter().find_map(|p| p.debug_port);

        let probe_port = flagged_port.unwrap_or(self.fallback_port);
        let enabled = self.endpoint.is_reachable(probe_port).await;
        debug!(browser = %family, probe_port, enabled, "Probed debugging endpoint");

        Some(BrowserInfo {
            browser_type: family.id().to_string(),
            process_id: main.map(|p| p.pid).or(target.pid).unwrap_or(0),
            debug_port: flagged_port.or(enabled.then_some(probe_port)),
            is_debugging_enabled: enabled,
            window_title: target.title.clone(),
            window_class: target.window_class.clone(),
        })
    }
}

#[cfg(test)]
#[path = "browser_tests.rs"]
mod tests;
