//! The verified-action loop.
//!
//! capture → locate → act → settle → capture → verify, up to
//! `max_attempts` times. Ordinary failures are folded into the result;
//! safety errors are returned unchanged and never retried.

use std::sync::Arc;

use sightline_config::ActionConfig;
use sightline_protocols::{
    ActionKind, Actuator, ActuatorError, CaptureError, Located, SafetyError, ScreenCapture,
    SmartActOptions, SmartClickResult, VisionError, VisionModel,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::guard::ActionGuard;
use super::kill_switch::KillSwitch;

/// Why a single attempt did not succeed.
#[derive(Debug, Error)]
enum AttemptFailure {
    #[error("Screen capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error("Action failed: {0}")]
    Actuator(#[from] ActuatorError),

    #[error("Target not found: {0}")]
    NotFound(String),

    #[error("Low confidence ({confidence:.2}) locating target, need {required:.2}")]
    LowConfidence { confidence: f32, required: f32 },

    #[error("Verification failed: {0}")]
    NotVerified(String),
}

pub struct ActionLoop {
    capture: Arc<dyn ScreenCapture>,
    vision: Arc<dyn VisionModel>,
    actuator: Arc<dyn Actuator>,
    kill_switch: Option<Arc<KillSwitch>>,
    guard: ActionGuard,
    defaults: SmartActOptions,
}

impl ActionLoop {
    pub fn new(
        capture: Arc<dyn ScreenCapture>,
        vision: Arc<dyn VisionModel>,
        actuator: Arc<dyn Actuator>,
    ) -> Self {
        Self {
            capture,
            vision,
            actuator,
            kill_switch: None,
            guard: ActionGuard::default(),
            defaults: SmartActOptions::default(),
        }
    }

    pub fn with_kill_switch(mut self, kill_switch: Arc<KillSwitch>) -> Self {
        self.kill_switch = Some(kill_switch);
        self
    }

    pub fn with_guard(mut self, guard: ActionGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Apply `[action]` settings. Fails only on an invalid restricted pattern.
    pub fn with_config(mut self, config: &ActionConfig) -> Result<Self, regex::Error> {
        self.guard = ActionGuard::new(&config.restricted_patterns)?;
        self.defaults = SmartActOptions {
            max_attempts: config.max_attempts,
            verify_delay: config.verify_delay(),
            min_confidence: config.min_confidence,
            expectation: None,
        };
        Ok(self)
    }

    /// Options built from configuration, for callers that only override a field.
    pub fn default_options(&self) -> SmartActOptions {
        self.defaults.clone()
    }

    pub fn kill_switch(&self) -> Option<&Arc<KillSwitch>> {
        self.kill_switch.as_ref()
    }

    /// Perform `action` on the described target and confirm it took effect.
    #[instrument(skip(self, options), fields(action = action.verb()))]
    pub async fn smart_act(
        &self,
        description: &str,
        action: ActionKind,
        options: SmartActOptions,
    ) -> Result<SmartClickResult, SafetyError> {
        self.guard.check(description)?;

        let max_attempts = options.max_attempts.max(1);
        let expectation = options.expectation.clone().unwrap_or_else(|| {
            format!("The {} on \"{}\" took visible effect", action.verb(), description)
        });
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            if let Some(kill_switch) = &self.kill_switch {
                kill_switch.check().await?;
            }

            match self.attempt(description, &action, &options, &expectation).await {
                Ok(located) => {
                    info!(attempt, x = located.x, y = located.y, "Action verified");
                    return Ok(SmartClickResult::succeeded(attempt, located));
                }
                Err(failure) => {
                    warn!(attempt, max_attempts, error = %failure, "Action attempt failed");
                    last_error = Some(failure.to_string());
                }
            }
        }

        Ok(SmartClickResult::failed(max_attempts, last_error))
    }

    async fn attempt(
        &self,
        description: &str,
        action: &ActionKind,
        options: &SmartActOptions,
        expectation: &str,
    ) -> Result<Located, AttemptFailure> {
        let before = self.capture.capture().await?;

        let located = self
            .vision
            .locate(&before, description)
            .await?
            .ok_or_else(|| AttemptFailure::NotFound(description.to_string()))?;
        if located.confidence < options.min_confidence {
            return Err(AttemptFailure::LowConfidence {
                confidence: located.confidence,
                required: options.min_confidence,
            });
        }

        self.actuator.perform(action, located.x, located.y).await?;
        if let Some(kill_switch) = &self.kill_switch {
            kill_switch.record_action(located.x, located.y).await;
        }

        tokio::time::sleep(options.verify_delay).await;

        let after = self.capture.capture().await?;
        let verdict = self.vision.verify(&before, &after, expectation).await?;
        if !verdict.changed {
            return Err(AttemptFailure::NotVerified(verdict.reason));
        }
        Ok(located)
    }
}

#[cfg(test)]
#[path = "smart_act_tests.rs"]
mod tests;
