//! Restricted-action guard.

use regex::{Regex, RegexBuilder};
use sightline_protocols::SafetyError;

/// Refuses action descriptions matching any configured pattern.
#[derive(Debug, Clone, Default)]
pub struct ActionGuard {
    patterns: Vec<Regex>,
}

impl ActionGuard {
    /// Compile case-insensitive patterns.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| RegexBuilder::new(p.as_ref()).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn check(&self, description: &str) -> Result<(), SafetyError> {
        match self.patterns.iter().find(|re| re.is_match(description)) {
            Some(re) => Err(SafetyError::RestrictedAction {
                description: description.to_string(),
                pattern: re.as_str().to_string(),
            }),
            None => Ok(()),
        }
    }
}
