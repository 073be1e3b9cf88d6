//! The browser discovery source.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use sightline_config::{CdpConfig, Config};
use sightline_core::BreakerPolicy;
use sightline_protocols::{DiscoveryError, DiscoverySource, SourceKind, UIElement, WindowTarget};
use tracing::{debug, info, instrument, warn};

use crate::browser::BrowserDetector;
use crate::cdp::{CdpClient, PageSession, TargetInfo};
use crate::connector::CdpConnector;
use crate::extractor;
use crate::offset::{ScreenOffset, chrome_offset};
use crate::recovery::{BrowserHost, DebugEndpoint, RecoverySaga};

/// Page whose title the window title contains, longest match first;
/// otherwise the first user page.
pub fn pick_target<'a>(targets: &'a [TargetInfo], window_title: &str) -> Option<&'a TargetInfo> {
    targets
        .iter()
        .filter(|t| !t.title.is_empty() && window_title.contains(t.title.as_str()))
        .max_by_key(|t| t.title.len())
        .or_else(|| targets.first())
}

/// Discovers page content of Chromium-family browsers through the DevTools
/// protocol, running recovery once when debugging is off.
pub struct BrowserSource {
    cdp: CdpConfig,
    breaker: BreakerPolicy,
    connectors: Mutex<HashMap<u16, Arc<CdpConnector>>>,
    detector: BrowserDetector,
    recovery: Option<RecoverySaga>,
    /// When recovery last failed; suppresses reruns for one breaker window.
    failed_recovery: Mutex<Option<Instant>>,
}

impl BrowserSource {
    pub fn new(
        cdp: CdpConfig,
        breaker: BreakerPolicy,
        host: Arc<dyn BrowserHost>,
        endpoint: Arc<dyn DebugEndpoint>,
    ) -> Self {
        let detector = BrowserDetector::new(host, endpoint, cdp.port);
        Self {
            cdp,
            breaker,
            connectors: Mutex::new(HashMap::new()),
            detector,
            recovery: None,
            failed_recovery: Mutex::new(None),
        }
    }

    /// Source wired from `[cdp]`, `[breaker]` and `[recovery]`.
    pub fn from_config(config: &Config, host: Arc<dyn BrowserHost>, endpoint: Arc<dyn DebugEndpoint>) -> Self {
        let source = Self::new(
            config.cdp.clone(),
            BreakerPolicy::from(&config.breaker),
            host.clone(),
            endpoint.clone(),
        );
        if config.recovery.enabled {
            let saga = RecoverySaga::new(host, endpoint, config.recovery.clone()).with_current_port(config.cdp.port);
            source.with_recovery(saga)
        } else {
            source
        }
    }

    pub fn with_recovery(mut self, saga: RecoverySaga) -> Self {
        self.recovery = Some(saga);
        self
    }

    pub fn detector(&self) -> &BrowserDetector {
        &self.detector
    }

    /// Shared connector, and breaker, for one port.
    pub fn connector(&self, port: u16) -> Arc<CdpConnector> {
        self.connectors
            .lock()
            .entry(port)
            .or_insert_with(|| Arc::new(CdpConnector::new(self.cdp.host.clone(), port, &self.cdp, self.breaker)))
            .clone()
    }

    async fn debug_port(&self, target: &WindowTarget) -> u16 {
        self.detector
            .detect(target, None)
            .await
            .and_then(|info| info.debug_port)
            .unwrap_or(self.cdp.port)
    }

    /// Element under a screen point in the target's page.
    pub async fn element_at(&self, target: &WindowTarget, x: f64, y: f64) -> Result<Option<UIElement>, DiscoveryError> {
        let port = self.debug_port(target).await;
        let client = self.connector(port).connect().await?;
        let result = locate_in_page(&client, target, x, y).await;
        client.close().await;
        result
    }

    fn recovery_suppressed(&self) -> bool {
        self.failed_recovery
            .lock()
            .is_some_and(|at| at.elapsed() < self.breaker.reset_window)
    }

    async fn discover_on(&self, port: u16, target: &WindowTarget) -> Result<Vec<UIElement>, DiscoveryError> {
        let client = self.connector(port).connect().await?;
        let result = discover_page(&client, target).await;
        client.close().await;
        result
    }
}

async fn open_page(client: &CdpClient, target: &WindowTarget) -> Result<Option<PageSession>, DiscoveryError> {
    let targets = client.page_targets().await?;
    let Some(page) = pick_target(&targets, &target.title) else {
        debug!("Browser has no user pages");
        return Ok(None);
    };
    debug!(target_id = %page.target_id, title = %page.title, "Attaching to page");
    let session = client.attach(&page.target_id).await?;
    session.enable_accessibility().await?;
    Ok(Some(session))
}

async fn locate_in_page(
    client: &CdpClient,
    target: &WindowTarget,
    x: f64,
    y: f64,
) -> Result<Option<UIElement>, DiscoveryError> {
    let Some(session) = open_page(client, target).await? else {
        return Ok(None);
    };
    let offset = ScreenOffset::new(target.bounds, chrome_offset(&session).await);
    Ok(extractor::element_at(&session, x, y, offset).await?)
}

async fn discover_page(client: &CdpClient, target: &WindowTarget) -> Result<Vec<UIElement>, DiscoveryError> {
    let Some(session) = open_page(client, target).await? else {
        return Ok(Vec::new());
    };
    let nodes = session.get_full_tree().await?;
    let offset = ScreenOffset::new(target.bounds, chrome_offset(&session).await);
    let elements = extractor::extract(&session, &nodes, offset).await?;

    if let Err(e) = session.disable_accessibility().await {
        debug!(error = %e, "Failed to disable accessibility domain");
    }
    Ok(elements)
}

#[async_trait]
impl DiscoverySource for BrowserSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Browser
    }

    #[instrument(skip(self, target), fields(window = %target.title))]
    async fn run(&self, target: &WindowTarget) -> Result<Vec<UIElement>, DiscoveryError> {
        let port = self.debug_port(target).await;
        let first = self.discover_on(port, target).await;

        let not_enabled = matches!(&first, Err(DiscoveryError::Connection(e)) if e.is_not_enabled());
        let Some(saga) = self.recovery.as_ref().filter(|_| not_enabled) else {
            return first;
        };

        if self.recovery_suppressed() {
            debug!("Recovery failed within the breaker window, not retrying");
            return first;
        }

        info!(process = %target.process_name, "Debugging disabled, running browser recovery");
        let report = saga.run(Some(&target.process_name), None).await;
        if !report.success {
            warn!(error = report.error.as_deref().unwrap_or_default(), "Browser recovery failed");
            *self.failed_recovery.lock() = Some(Instant::now());
            return first;
        }
        *self.failed_recovery.lock() = None;

        let port = report.debug_port;
        self.connector(port).reset_breaker();
        self.discover_on(port, target).await
    }
}
