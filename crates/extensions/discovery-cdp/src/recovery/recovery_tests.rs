use super::*;

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::browser::BrowserProcess;
use crate::cdp::CdpError;

#[derive(Default)]
struct FakeHost {
    tabs: Vec<String>,
    launch_fails: bool,
    calls: Mutex<Vec<&'static str>>,
    launched: Arc<AtomicBool>,
}

#[async_trait]
impl BrowserHost for FakeHost {
    async fn find_processes(&self, _family: BrowserFamily) -> Vec<BrowserProcess> {
        Vec::new()
    }

    async fn scripted_tab_urls(&self, _family: BrowserFamily) -> Result<Vec<String>, HostError> {
        self.calls.lock().push("script");
        Ok(self.tabs.clone())
    }

    async fn close(&self, _family: BrowserFamily, _grace: Duration) -> Result<(), HostError> {
        self.calls.lock().push("close");
        Ok(())
    }

    async fn sync_profile(&self, _family: BrowserFamily, _dest: &Path) -> Result<ProfileSync, HostError> {
        self.calls.lock().push("sync");
        Ok(ProfileSync { copied: 12, failed: 0 })
    }

    async fn launch(&self, _family: BrowserFamily, _port: u16, _dir: &Path) -> Result<u32, HostError> {
        self.calls.lock().push("launch");
        if self.launch_fails {
            return Err(HostError::NotFound("chrome executable".to_string()));
        }
        self.launched.store(true, Ordering::SeqCst);
        Ok(4242)
    }
}

/// Unreachable until launched, then reachable after `ready_after` failed polls.
struct FakeEndpoint {
    launched: Arc<AtomicBool>,
    ready_after: u32,
    polls: AtomicU32,
    opened: Mutex<Vec<String>>,
}

impl FakeEndpoint {
    fn new(launched: Arc<AtomicBool>, ready_after: u32) -> Self {
        Self {
            launched,
            ready_after,
            polls: AtomicU32::new(0),
            opened: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DebugEndpoint for FakeEndpoint {
    async fn is_reachable(&self, _port: u16) -> bool {
        if !self.launched.load(Ordering::SeqCst) {
            return false;
        }
        self.polls.fetch_add(1, Ordering::SeqCst) >= self.ready_after
    }

    async fn page_urls(&self, _port: u16) -> Result<Vec<String>, CdpError> {
        Ok(Vec::new())
    }

    async fn open_tabs(&self, _port: u16, urls: &[String]) -> Result<usize, CdpError> {
        self.opened.lock().extend(urls.iter().cloned());
        Ok(urls.len())
    }
}

fn tabs() -> Vec<String> {
    vec![
        "https://mail.example.com/".to_string(),
        "https://docs.example.com/a".to_string(),
        "https://news.example.com/".to_string(),
    ]
}

fn saga(host: Arc<FakeHost>, endpoint: Arc<FakeEndpoint>) -> RecoverySaga {
    RecoverySaga::new(host, endpoint, RecoveryConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_full_recovery_restores_every_tab() {
    let host = Arc::new(FakeHost {
        tabs: tabs(),
        ..Default::default()
    });
    let endpoint = Arc::new(FakeEndpoint::new(host.launched.clone(), 2));

    let result = saga(host.clone(), endpoint.clone()).run(Some("chrome"), None).await;

    assert!(result.success);
    assert!(result.debugging_enabled);
    assert_eq!(result.browser.as_deref(), Some("chrome"));
    assert_eq!(result.tabs_saved, 3);
    assert_eq!(result.tabs_restored, 3);
    assert!(result.error.is_none());
    assert_eq!(*endpoint.opened.lock(), tabs());
    assert_eq!(*host.calls.lock(), vec!["script", "close", "sync", "launch"]);

    assert_eq!(result.steps.len(), 7);
    let order: Vec<RecoveryStep> = result.steps.iter().map(|s| s.step).collect();
    assert_eq!(order, RecoveryStep::ALL.to_vec());
    assert!(result.steps.iter().all(|s| s.status == StepStatus::Success));
}

#[tokio::test(start_paused = true)]
async fn test_active_app_used_without_hint() {
    let host = Arc::new(FakeHost::default());
    let endpoint = Arc::new(FakeEndpoint::new(host.launched.clone(), 0));

    let result = saga(host, endpoint).run(None, Some("Microsoft Edge")).await;

    assert_eq!(result.browser.as_deref(), Some("edge"));
    assert!(result.success);
    let restore = result.step(RecoveryStep::RestoreTabs).unwrap();
    assert_eq!(restore.status, StepStatus::Skipped);
}

#[tokio::test(start_paused = true)]
async fn test_unsupported_browser_stops_at_detect() {
    let host = Arc::new(FakeHost::default());
    let endpoint = Arc::new(FakeEndpoint::new(host.launched.clone(), 0));

    let result = saga(host.clone(), endpoint).run(Some("firefox"), None).await;

    assert!(!result.success);
    assert!(result.browser.is_none());
    assert!(result.error.as_deref().unwrap().contains("firefox"));
    assert_eq!(result.step(RecoveryStep::Detect).unwrap().status, StepStatus::Error);
    assert_eq!(result.step(RecoveryStep::Verify).unwrap().status, StepStatus::Pending);
    assert!(host.calls.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_relaunch_failure_aborts() {
    let host = Arc::new(FakeHost {
        tabs: tabs(),
        launch_fails: true,
        ..Default::default()
    });
    let endpoint = Arc::new(FakeEndpoint::new(host.launched.clone(), 0));

    let result = saga(host, endpoint.clone()).run(Some("chrome"), None).await;

    assert!(!result.success);
    assert_eq!(result.tabs_saved, 3);
    assert_eq!(result.tabs_restored, 0);
    assert!(result.error.as_deref().unwrap().starts_with("relaunch failed"));
    assert_eq!(result.step(RecoveryStep::Relaunch).unwrap().status, StepStatus::Error);
    assert_eq!(result.step(RecoveryStep::RestoreTabs).unwrap().status, StepStatus::Pending);
    assert!(endpoint.opened.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_endpoint_never_ready() {
    let host = Arc::new(FakeHost {
        tabs: tabs(),
        ..Default::default()
    });
    let endpoint = Arc::new(FakeEndpoint::new(host.launched.clone(), u32::MAX));

    let result = saga(host, endpoint).run(Some("chrome"), None).await;

    assert!(!result.success);
    assert!(!result.debugging_enabled);
    assert_eq!(result.step(RecoveryStep::RestoreTabs).unwrap().status, StepStatus::Error);
    assert_eq!(result.step(RecoveryStep::Verify).unwrap().status, StepStatus::Error);
}

#[tokio::test(start_paused = true)]
async fn test_no_sleep_after_last_failed_poll() {
    let host = Arc::new(FakeHost::default());
    let endpoint = Arc::new(FakeEndpoint::new(host.launched.clone(), u32::MAX));
    let config = RecoveryConfig {
        startup_wait_ms: 500,
        poll_attempts: 3,
        poll_interval_ms: 100,
        ..Default::default()
    };

    let started = tokio::time::Instant::now();
    let result = RecoverySaga::new(host, endpoint.clone(), config)
        .run(Some("chrome"), None)
        .await;

    assert!(!result.debugging_enabled);
    // Three waits plus the verify check.
    assert_eq!(endpoint.polls.load(Ordering::SeqCst), 4);
    assert_eq!(started.elapsed(), Duration::from_millis(700));
}

#[tokio::test(start_paused = true)]
async fn test_resync_disabled_is_skipped() {
    let host = Arc::new(FakeHost::default());
    let endpoint = Arc::new(FakeEndpoint::new(host.launched.clone(), 0));
    let config = RecoveryConfig {
        resync_profile: false,
        ..Default::default()
    };

    let result = RecoverySaga::new(host.clone(), endpoint, config)
        .run(Some("brave"), None)
        .await;

    assert_eq!(result.step(RecoveryStep::SyncProfile).unwrap().status, StepStatus::Skipped);
    assert!(!host.calls.lock().contains(&"sync"));
}

#[test]
fn test_result_serializes_camel_case() {
    let result = RecoveryResult {
        tabs_saved: 2,
        steps: vec![StepOutcome {
            step: RecoveryStep::SaveTabs,
            status: StepStatus::Success,
            message: "ok".to_string(),
            duration_ms: 3,
        }],
        ..Default::default()
    };
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["tabsSaved"], 2);
    assert_eq!(json["steps"][0]["step"], "save-tabs");
    assert_eq!(json["steps"][0]["status"], "success");
    assert!(json.get("error").is_none());
}
