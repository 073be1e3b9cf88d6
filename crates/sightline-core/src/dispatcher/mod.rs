//! Strategy dispatch with fallback chains.
//!
//! A request names a window (or none, meaning nothing is focused). The
//! dispatcher detects the strategy, runs the plan's sources in order and keeps
//! the single largest result. Results are never merged.

mod plan;
mod registry;

use std::sync::Arc;

use sightline_config::DiscoveryConfig;
use sightline_protocols::{
    DiscoveryError, FocusedWindowProvider, SourceKind, Strategy, UIElement, UITree, WindowTarget,
};
use tracing::{debug, info, instrument, warn};

use crate::strategy::StrategyDetector;

pub use plan::FallbackPlan;
pub use registry::SourceRegistry;

/// Below this many elements the fallback chain continues.
pub const DEFAULT_MIN_ELEMENTS: usize = 10;

/// Title used for the shell pseudo-window when nothing is focused.
pub const SHELL_WINDOW_TITLE: &str = "Desktop";

pub struct StrategyDispatcher {
    detector: StrategyDetector,
    registry: Arc<SourceRegistry>,
    focused: Option<Arc<dyn FocusedWindowProvider>>,
    min_elements: usize,
}

impl StrategyDispatcher {
    pub fn new(detector: StrategyDetector, registry: Arc<SourceRegistry>) -> Self {
        Self {
            detector,
            registry,
            focused: None,
            min_elements: DEFAULT_MIN_ELEMENTS,
        }
    }

    pub fn with_config(mut self, config: &DiscoveryConfig) -> Self {
        self.min_elements = config.min_elements;
        self
    }

    pub fn with_min_elements(mut self, min_elements: usize) -> Self {
        self.min_elements = min_elements;
        self
    }

    pub fn with_focused_window(mut self, provider: Arc<dyn FocusedWindowProvider>) -> Self {
        self.focused = Some(provider);
        self
    }

    pub fn detector(&self) -> &StrategyDetector {
        &self.detector
    }

    pub fn registry(&self) -> &Arc<SourceRegistry> {
        &self.registry
    }

    pub fn detect(&self, window_class: &str, process_name: &str) -> Strategy {
        self.detector.detect(window_class, process_name)
    }

    /// Discover the focused window, or the shell when nothing is focused.
    pub async fn discover_focused(&self) -> Result<UITree, DiscoveryError> {
        let target = match &self.focused {
            Some(provider) => match provider.focused_window().await {
                Ok(target) => target,
                Err(e) => {
                    warn!(error = %e, "Focused window query failed, using shell");
                    None
                }
            },
            None => None,
        };
        self.discover(target).await
    }

    /// Discover elements in `target`; `None` short-circuits to the shell strategy.
    pub async fn discover(&self, target: Option<WindowTarget>) -> Result<UITree, DiscoveryError> {
        match target {
            Some(target) => {
                let strategy = self.detect(&target.window_class, &target.process_name);
                self.discover_with(target, strategy).await
            }
            None => {
                debug!("No focused window, dispatching to shell");
                let target = WindowTarget::new(SHELL_WINDOW_TITLE, "", "");
                self.discover_with(target, Strategy::Shell).await
            }
        }
    }

    /// Run the fallback plan for an already-chosen strategy.
    #[instrument(skip(self, target), fields(window = %target.title, %strategy))]
    pub async fn discover_with(
        &self,
        target: WindowTarget,
        strategy: Strategy,
    ) -> Result<UITree, DiscoveryError> {
        let plan = FallbackPlan::for_strategy(strategy);
        let mut best: Option<(SourceKind, Vec<UIElement>)> = None;
        let mut last_error: Option<DiscoveryError> = None;
        let mut attempted = 0usize;

        for kind in &plan.steps {
            let Some(source) = self.registry.get(*kind) else {
                debug!(source = %kind, "Source not registered, skipping");
                continue;
            };
            attempted += 1;

            match source.run(&target).await {
                Ok(elements) => {
                    debug!(source = %kind, count = elements.len(), "Source returned elements");
                    let better = best
                        .as_ref()
                        .is_none_or(|(_, current)| elements.len() > current.len());
                    if better {
                        best = Some((*kind, elements));
                    }
                }
                Err(e) => {
                    warn!(source = %kind, error = %e, "Discovery source failed");
                    last_error = Some(e);
                }
            }

            let enough = best
                .as_ref()
                .is_some_and(|(_, elements)| elements.len() >= self.min_elements);
            if enough {
                break;
            }
        }

        let (kind, elements) = match best {
            Some(found) => found,
            None if attempted == 0 && strategy == Strategy::Shell => {
                warn!("No shell source registered, returning an empty desktop tree");
                return Ok(UITree::new(target.title, target.window_class, strategy, Vec::new()));
            }
            None if attempted == 0 => {
                return Err(DiscoveryError::Unavailable(format!(
                    "no discovery source registered for strategy {strategy}"
                )));
            }
            None => {
                return Err(DiscoveryError::Exhausted {
                    strategy,
                    last: last_error.map(|e| e.to_string()).unwrap_or_default(),
                });
            }
        };

        info!(source = %kind, count = elements.len(), "Discovery complete");

        let mut tree = UITree::new(target.title, target.window_class, strategy, elements)
            .with_window_bounds(target.bounds);
        if strategy == Strategy::GameBridge {
            tree = tree.with_bridge_active(kind == SourceKind::GameBridge);
        }
        Ok(tree)
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
