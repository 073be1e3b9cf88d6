//! Config → components.

use std::sync::Arc;

use sightline_config::{Config, RuleTable};
use sightline_core::{BreakerPolicy, SourceRegistry, StrategyDetector, StrategyDispatcher};
use sightline_discovery_bridge::{BridgeClient, BridgeSource};
use sightline_discovery_cdp::{BrowserHost, BrowserSource, DebugEndpoint, HttpDebugEndpoint, RecoverySaga, SystemBrowserHost};
use sightline_discovery_native::{HelperSource, SystemWindowProvider};
use tracing::info;

/// Long-lived components built from one configuration.
pub(crate) struct Engine {
    pub config: Config,
    pub host: Arc<dyn BrowserHost>,
    pub endpoint: Arc<dyn DebugEndpoint>,
    pub browser: Arc<BrowserSource>,
    pub bridge: Arc<BridgeClient>,
    pub window: Arc<SystemWindowProvider>,
    pub dispatcher: StrategyDispatcher,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        let host: Arc<dyn BrowserHost> = Arc::new(SystemBrowserHost::new());
        let endpoint: Arc<dyn DebugEndpoint> =
            Arc::new(HttpDebugEndpoint::new(config.cdp.host.clone(), config.cdp.connect_timeout()));
        let browser = Arc::new(BrowserSource::from_config(&config, host.clone(), endpoint.clone()));
        let bridge = Arc::new(BridgeClient::new(&config.bridge, BreakerPolicy::from(&config.breaker)));
        let window = Arc::new(SystemWindowProvider::new());

        let registry = Arc::new(SourceRegistry::new());
        for helper in HelperSource::all_from_config(&config.discovery) {
            registry.register(Arc::new(helper));
        }
        registry.register(browser.clone());
        registry.register(Arc::new(BridgeSource::new(bridge.clone())));
        info!(sources = ?registry.kinds(), "Discovery sources registered");

        let rules = match &config.discovery.rules_file {
            Some(path) => RuleTable::load(path),
            None => RuleTable::builtin(),
        };
        let dispatcher = StrategyDispatcher::new(StrategyDetector::new(rules), registry)
            .with_config(&config.discovery)
            .with_focused_window(window.clone());

        Self {
            config,
            host,
            endpoint,
            browser,
            bridge,
            window,
            dispatcher,
        }
    }

    /// A standalone saga, independent of the `[recovery] enabled` switch.
    pub fn recovery_saga(&self) -> RecoverySaga {
        RecoverySaga::new(self.host.clone(), self.endpoint.clone(), self.config.recovery.clone())
            .with_current_port(self.config.cdp.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline_config::HelperConfig;
    use sightline_protocols::{SourceKind, Strategy};

    #[test]
    fn test_engine_registers_sources() {
        let mut config = Config::default();
        config.discovery.helpers.insert(
            "accessibility".to_string(),
            HelperConfig {
                program: "/usr/bin/true".into(),
                args: Vec::new(),
                timeout_ms: None,
            },
        );
        let engine = Engine::new(config);

        let kinds = engine.dispatcher.registry().kinds();
        assert!(kinds.contains(&SourceKind::Accessibility));
        assert!(kinds.contains(&SourceKind::Browser));
        assert!(kinds.contains(&SourceKind::GameBridge));
        assert_eq!(engine.dispatcher.detect("", "chrome.exe"), Strategy::Browser);
    }
}
