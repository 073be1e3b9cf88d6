use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sightline_config::RuleTable;
use sightline_protocols::{BridgeError, ConnectionError, Rect, WindowBounds, WindowError};

use super::*;

struct FakeSource {
    kind: SourceKind,
    result: Result<usize, fn() -> DiscoveryError>,
    calls: AtomicUsize,
}

impl FakeSource {
    fn ok(kind: SourceKind, count: usize) -> Arc<Self> {
        Arc::new(Self {
            kind,
            result: Ok(count),
            calls: AtomicUsize::new(0),
        })
    }

    fn err(kind: SourceKind, error: fn() -> DiscoveryError) -> Arc<Self> {
        Arc::new(Self {
            kind,
            result: Err(error),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl sightline_protocols::DiscoverySource for FakeSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn run(&self, _target: &WindowTarget) -> Result<Vec<UIElement>, DiscoveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(count) => Ok((0..*count)
                .filter_map(|i| {
                    let kind = if i % 2 == 0 { "Button" } else { "Text" };
                    UIElement::from_parts(
                        kind,
                        format!("{}-{i}", self.kind),
                        Rect::new(i as f64, 0.0, 10.0, 10.0),
                        true,
                    )
                })
                .collect()),
            Err(make) => Err(make()),
        }
    }
}

fn dispatcher(sources: Vec<Arc<FakeSource>>) -> StrategyDispatcher {
    let registry = Arc::new(SourceRegistry::new());
    for source in sources {
        registry.register(source);
    }
    StrategyDispatcher::new(StrategyDetector::new(RuleTable::builtin()), registry)
}

fn notepad() -> WindowTarget {
    WindowTarget::new("Untitled - Notepad", "Notepad", "notepad.exe")
}

#[tokio::test]
async fn test_primary_sufficient_skips_fallback() {
    let primary = FakeSource::ok(SourceKind::Accessibility, 12);
    let fallback = FakeSource::ok(SourceKind::DocumentSearch, 40);
    let d = dispatcher(vec![primary.clone(), fallback.clone()]);

    let tree = d.discover(Some(notepad())).await.unwrap();
    assert_eq!(tree.strategy, Strategy::Native);
    assert_eq!(tree.len(), 12);
    assert_eq!(fallback.calls(), 0);
}

#[tokio::test]
async fn test_keeps_largest_result_not_union() {
    let primary = FakeSource::ok(SourceKind::Accessibility, 3);
    let fallback = FakeSource::ok(SourceKind::DocumentSearch, 7);
    let d = dispatcher(vec![primary.clone(), fallback.clone()]);

    let tree = d.discover(Some(notepad())).await.unwrap();
    assert_eq!(tree.len(), 7);
    assert!(tree.elements.iter().all(|e| e.name.starts_with("document-search")));
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);
}

#[tokio::test]
async fn test_smaller_fallback_does_not_replace() {
    let primary = FakeSource::ok(SourceKind::Accessibility, 5);
    let doc = FakeSource::ok(SourceKind::DocumentSearch, 2);
    let legacy = FakeSource::ok(SourceKind::LegacyAccessibility, 4);
    let d = dispatcher(vec![primary, doc, legacy.clone()]);

    let target = WindowTarget::new("Slack", "Chrome_WidgetWin_1", "slack");
    let tree = d.discover(Some(target)).await.unwrap();
    assert_eq!(tree.strategy, Strategy::ElectronStyle);
    assert_eq!(tree.len(), 5);
    assert_eq!(legacy.calls(), 1);
}

#[tokio::test]
async fn test_partitions_ui_and_content() {
    let d = dispatcher(vec![FakeSource::ok(SourceKind::Accessibility, 10)]);
    let tree = d.discover(Some(notepad())).await.unwrap();
    assert_eq!(tree.ui.len(), 5);
    assert_eq!(tree.content.len(), 5);
}

#[tokio::test]
async fn test_primary_error_recovered_by_fallback() {
    let primary = FakeSource::err(
        SourceKind::Browser,
        || DiscoveryError::Connection(ConnectionError::NotEnabled("refused".into())),
    );
    let fallback = FakeSource::ok(SourceKind::Accessibility, 4);
    let d = dispatcher(vec![primary, fallback]);

    let target = WindowTarget::new("GitHub", "Chrome_WidgetWin_1", "chrome.exe");
    let tree = d.discover(Some(target)).await.unwrap();
    assert_eq!(tree.strategy, Strategy::Browser);
    assert_eq!(tree.len(), 4);
}

#[tokio::test]
async fn test_all_sources_fail_is_exhausted() {
    let primary = FakeSource::err(
        SourceKind::GameBridge,
        || DiscoveryError::Bridge(BridgeError::NotRunning("refused".into())),
    );
    let fallback = FakeSource::err(SourceKind::Accessibility, || {
        DiscoveryError::Helper("bad json".into())
    });
    let d = dispatcher(vec![primary, fallback]);

    let target = WindowTarget::new("Game", "UnityWndClass", "game.exe");
    match d.discover(Some(target)).await {
        Err(DiscoveryError::Exhausted { strategy, last }) => {
            assert_eq!(strategy, Strategy::GameBridge);
            assert!(last.contains("bad json"));
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_no_registered_source_is_unavailable() {
    let d = dispatcher(vec![]);
    assert!(matches!(
        d.discover(Some(notepad())).await,
        Err(DiscoveryError::Unavailable(_))
    ));
}

#[tokio::test]
async fn test_no_window_uses_shell() {
    let shell = FakeSource::ok(SourceKind::Shell, 3);
    let d = dispatcher(vec![shell.clone()]);

    let tree = d.discover(None).await.unwrap();
    assert_eq!(tree.strategy, Strategy::Shell);
    assert_eq!(tree.window, SHELL_WINDOW_TITLE);
    assert_eq!(shell.calls(), 1);
}

#[tokio::test]
async fn test_no_window_without_shell_source_is_empty_tree() {
    let browser = FakeSource::ok(SourceKind::Browser, 5);
    let d = dispatcher(vec![browser.clone(), FakeSource::ok(SourceKind::GameBridge, 5)]);

    let tree = d.discover(None).await.unwrap();
    assert_eq!(tree.strategy, Strategy::Shell);
    assert_eq!(tree.window, SHELL_WINDOW_TITLE);
    assert!(tree.elements.is_empty());
    assert_eq!(browser.calls(), 0);
}

#[tokio::test]
async fn test_bridge_active_flag() {
    let bridge = FakeSource::ok(SourceKind::GameBridge, 2);
    let d = dispatcher(vec![bridge]);
    let target = WindowTarget::new("Game", "UnityWndClass", "game.exe").with_bounds(WindowBounds {
        x: 100,
        y: 50,
        width: 800,
        height: 600,
    });

    let tree = d.discover(Some(target)).await.unwrap();
    assert_eq!(tree.bridge_active, Some(true));
    assert_eq!(tree.window_bounds.map(|b| b.x), Some(100));
}

#[tokio::test]
async fn test_bridge_inactive_when_fallback_wins() {
    let bridge = FakeSource::err(
        SourceKind::GameBridge,
        || DiscoveryError::Bridge(BridgeError::NotRunning("refused".into())),
    );
    let native = FakeSource::ok(SourceKind::Accessibility, 2);
    let d = dispatcher(vec![bridge, native]);

    let target = WindowTarget::new("Game", "UnityWndClass", "game.exe");
    let tree = d.discover(Some(target)).await.unwrap();
    assert_eq!(tree.bridge_active, Some(false));
}

struct FixedWindow(Option<WindowTarget>);

#[async_trait]
impl FocusedWindowProvider for FixedWindow {
    async fn focused_window(&self) -> Result<Option<WindowTarget>, WindowError> {
        Ok(self.0.clone())
    }
}

struct BrokenWindow;

#[async_trait]
impl FocusedWindowProvider for BrokenWindow {
    async fn focused_window(&self) -> Result<Option<WindowTarget>, WindowError> {
        Err(WindowError::PlatformNotSupported)
    }
}

#[tokio::test]
async fn test_discover_focused() {
    let d = dispatcher(vec![FakeSource::ok(SourceKind::Accessibility, 1)])
        .with_focused_window(Arc::new(FixedWindow(Some(notepad()))));
    let tree = d.discover_focused().await.unwrap();
    assert_eq!(tree.window, "Untitled - Notepad");
}

#[tokio::test]
async fn test_discover_focused_error_falls_to_shell() {
    let d = dispatcher(vec![FakeSource::ok(SourceKind::Shell, 1)])
        .with_focused_window(Arc::new(BrokenWindow));
    let tree = d.discover_focused().await.unwrap();
    assert_eq!(tree.strategy, Strategy::Shell);
}

#[tokio::test]
async fn test_min_elements_from_config() {
    let primary = FakeSource::ok(SourceKind::Accessibility, 3);
    let fallback = FakeSource::ok(SourceKind::DocumentSearch, 9);
    let config = DiscoveryConfig {
        min_elements: 2,
        ..Default::default()
    };
    let d = dispatcher(vec![primary, fallback.clone()]).with_config(&config);

    let tree = d.discover(Some(notepad())).await.unwrap();
    assert_eq!(tree.len(), 3);
    assert_eq!(fallback.calls(), 0);
}
