//! Failure-counting circuit breaker.
//!
//! Two states. **Closed**: calls pass. **Open**: calls fail immediately.
//! The breaker opens once `failure_count >= threshold` and closes again when
//! `reset_window` has elapsed since the last failure. State is evaluated on
//! every [`CircuitBreaker::check`], so no timer task is needed.

use std::time::{Duration, Instant};

use sightline_config::BreakerConfig;
use tracing::{info, warn};

/// Breaker thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerPolicy {
    pub threshold: u32,
    pub reset_window: Duration,
}

impl Default for BreakerPolicy {
    fn default() -> Self {
        Self {
            threshold: 3,
            reset_window: Duration::from_secs(30),
        }
    }
}

impl From<&BreakerConfig> for BreakerPolicy {
    fn from(config: &BreakerConfig) -> Self {
        Self {
            threshold: config.threshold.max(1),
            reset_window: config.reset_window(),
        }
    }
}

/// Observable breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open { retry_in: Duration },
}

/// Returned by [`CircuitBreaker::check`] while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitOpen {
    pub retry_in: Duration,
}

/// One breaker per remote-connection client.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    policy: BreakerPolicy,
    failure_count: u32,
    last_failure: Option<Instant>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, policy: BreakerPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            failure_count: 0,
            last_failure: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> BreakerPolicy {
        self.policy
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn last_failure(&self) -> Option<Instant> {
        self.last_failure
    }

    /// Current state without mutating counters.
    pub fn state(&self) -> CircuitState {
        self.state_at(Instant::now())
    }

    pub(crate) fn state_at(&self, now: Instant) -> CircuitState {
        if self.failure_count < self.policy.threshold {
            return CircuitState::Closed;
        }
        match self.last_failure {
            Some(at) => {
                let elapsed = now.saturating_duration_since(at);
                if elapsed >= self.policy.reset_window {
                    CircuitState::Closed
                } else {
                    CircuitState::Open {
                        retry_in: self.policy.reset_window - elapsed,
                    }
                }
            }
            None => CircuitState::Closed,
        }
    }

    /// Gate a call attempt.
    ///
    /// Resets the counters when the reset window has elapsed on an open breaker.
    pub fn check(&mut self) -> Result<(), CircuitOpen> {
        self.check_at(Instant::now())
    }

    pub(crate) fn check_at(&mut self, now: Instant) -> Result<(), CircuitOpen> {
        match self.state_at(now) {
            CircuitState::Open { retry_in } => Err(CircuitOpen { retry_in }),
            CircuitState::Closed => {
                if self.failure_count >= self.policy.threshold {
                    info!(breaker = %self.name, "circuit breaker closed after reset window");
                    self.failure_count = 0;
                    self.last_failure = None;
                }
                Ok(())
            }
        }
    }

    /// Record a successful call.
    pub fn record_success(&mut self) {
        if self.failure_count > 0 {
            info!(breaker = %self.name, "circuit breaker reset after success");
        }
        self.failure_count = 0;
        self.last_failure = None;
    }

    /// Record a failed call.
    pub fn record_failure(&mut self) {
        self.record_failure_at(Instant::now());
    }

    pub(crate) fn record_failure_at(&mut self, now: Instant) {
        self.failure_count = self.failure_count.saturating_add(1);
        self.last_failure = Some(now);
        if self.failure_count == self.policy.threshold {
            warn!(
                breaker = %self.name,
                failures = self.failure_count,
                reset_window_secs = self.policy.reset_window.as_secs(),
                "circuit breaker opened after {} consecutive failures",
                self.failure_count
            );
        }
    }
}

#[cfg(test)]
#[path = "breaker_tests.rs"]
mod tests;
