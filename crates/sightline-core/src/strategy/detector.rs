//! Window class / process name → [`Strategy`].

use sightline_config::RuleTable;
use sightline_protocols::Strategy;
use tracing::debug;

use super::game::GameSignatures;

/// Ordered substring heuristics, evaluated after every table lookup misses.
pub const HEURISTICS: &[(&str, Strategy)] = &[
    ("chrome_widgetwin", Strategy::ElectronStyle),
    ("chrome_renderwidgethosthwnd", Strategy::ElectronStyle),
    ("webview", Strategy::EmbeddedWebview),
    ("applicationframe", Strategy::UwpShell),
];

/// Decides which discovery strategy fits a window.
#[derive(Debug, Clone)]
pub struct StrategyDetector {
    rules: RuleTable,
    games: GameSignatures,
}

impl Default for StrategyDetector {
    fn default() -> Self {
        Self::new(RuleTable::builtin())
    }
}

impl StrategyDetector {
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules,
            games: GameSignatures::default(),
        }
    }

    pub fn with_game_signatures(mut self, games: GameSignatures) -> Self {
        self.games = games;
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn games(&self) -> &GameSignatures {
        &self.games
    }

    /// Pick a strategy.
    ///
    /// Order: game signature, exact process name, exact window class,
    /// window-class substring, [`HEURISTICS`], table fallback.
    pub fn detect(&self, window_class: &str, process_name: &str) -> Strategy {
        let (strategy, reason) = self.detect_with_reason(window_class, process_name);
        debug!(window_class, process_name, %strategy, reason, "Detected strategy");
        strategy
    }

    fn detect_with_reason(&self, window_class: &str, process_name: &str) -> (Strategy, &'static str) {
        if self.games.matches(window_class, process_name) {
            return (Strategy::GameBridge, "game signature");
        }
        if let Some(strategy) = self.rules.lookup_process(process_name) {
            return (strategy, "process name");
        }
        if let Some(strategy) = self.rules.lookup_class(window_class) {
            return (strategy, "window class");
        }
        if let Some(strategy) = self.rules.match_class_substring(window_class) {
            return (strategy, "window class substring");
        }
        if let Some(strategy) = heuristic(window_class) {
            return (strategy, "heuristic");
        }
        (self.rules.fallback, "fallback")
    }
}

fn heuristic(window_class: &str) -> Option<Strategy> {
    if window_class.is_empty() {
        return None;
    }
    let class = window_class.to_lowercase();
    HEURISTICS
        .iter()
        .find(|(marker, _)| class.contains(marker))
        .map(|(_, strategy)| *strategy)
}

#[cfg(test)]
#[path = "detector_tests.rs"]
mod tests;
