//! Source order per strategy.

use sightline_protocols::{SourceKind, Strategy};

/// Sources to try for a strategy, primary first.
///
/// Later sources only run while the best result so far is below the
/// dispatcher's minimum element count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPlan {
    pub strategy: Strategy,
    pub steps: Vec<SourceKind>,
}

impl FallbackPlan {
    pub fn for_strategy(strategy: Strategy) -> Self {
        use SourceKind::*;
        let steps = match strategy {
            Strategy::Native => vec![Accessibility, DocumentSearch],
            Strategy::ElectronStyle => vec![Accessibility, DocumentSearch, LegacyAccessibility],
            Strategy::EmbeddedWebview => {
                vec![EmbeddedWebview, DocumentSearch, LegacyAccessibility]
            }
            Strategy::UwpShell => vec![UwpShell, Accessibility],
            Strategy::Browser => vec![Browser, Accessibility],
            Strategy::GameBridge => vec![GameBridge, Accessibility],
            Strategy::Shell => vec![Shell],
        };
        Self { strategy, steps }
    }

    pub fn primary(&self) -> Option<SourceKind> {
        self.steps.first().copied()
    }

    pub fn fallbacks(&self) -> &[SourceKind] {
        self.steps.get(1..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_falls_back_to_document_search() {
        let plan = FallbackPlan::for_strategy(Strategy::Native);
        assert_eq!(plan.primary(), Some(SourceKind::Accessibility));
        assert_eq!(plan.fallbacks(), &[SourceKind::DocumentSearch]);
    }

    #[test]
    fn test_web_content_chain() {
        for strategy in [Strategy::ElectronStyle, Strategy::EmbeddedWebview] {
            let plan = FallbackPlan::for_strategy(strategy);
            assert_eq!(
                plan.fallbacks(),
                &[SourceKind::DocumentSearch, SourceKind::LegacyAccessibility]
            );
        }
    }

    #[test]
    fn test_every_strategy_has_a_primary() {
        for strategy in Strategy::ALL {
            assert!(FallbackPlan::for_strategy(strategy).primary().is_some());
        }
    }
}
