//! Pointer-displacement kill switch.
//!
//! Before each attempt the pointer is compared with where it was left after
//! the previous self-initiated action. Movement beyond the threshold means the
//! operator has taken over; the switch latches until [`KillSwitch::reset`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use sightline_config::KillSwitchConfig;
use sightline_protocols::{PointerSource, SafetyError};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct State {
    anchor: Option<(i32, i32)>,
    last_self_move: Option<Instant>,
    tripped: Option<SafetyError>,
}

pub struct KillSwitch {
    pointer: Arc<dyn PointerSource>,
    enabled: bool,
    threshold_px: f64,
    cooldown: Duration,
    state: Mutex<State>,
}

impl KillSwitch {
    pub fn new(pointer: Arc<dyn PointerSource>, threshold_px: f64, cooldown: Duration) -> Self {
        Self {
            pointer,
            enabled: true,
            threshold_px,
            cooldown,
            state: Mutex::new(State::default()),
        }
    }

    pub fn from_config(pointer: Arc<dyn PointerSource>, config: &KillSwitchConfig) -> Self {
        let mut switch = Self::new(pointer, config.threshold_px, config.cooldown());
        switch.enabled = config.enabled;
        switch
    }

    pub fn threshold_px(&self) -> f64 {
        self.threshold_px
    }

    pub fn is_tripped(&self) -> bool {
        self.state.lock().tripped.is_some()
    }

    /// Operator reset: clears the latch and the stored anchor.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        if state.tripped.take().is_some() {
            info!("Kill switch reset by operator");
        }
        state.anchor = None;
        state.last_self_move = None;
    }

    /// Fails with [`SafetyError::UserInterrupt`] when the operator moved the pointer.
    pub async fn check(&self) -> Result<(), SafetyError> {
        if !self.enabled {
            return Ok(());
        }

        let (anchor, in_cooldown) = {
            let state = self.state.lock();
            if let Some(err) = &state.tripped {
                return Err(err.clone());
            }
            let in_cooldown = state
                .last_self_move
                .is_some_and(|at| at.elapsed() < self.cooldown);
            (state.anchor, in_cooldown)
        };

        if in_cooldown {
            debug!("Kill switch check skipped during self-move cooldown");
            return Ok(());
        }

        let current = match self.pointer.position().await {
            Ok(pos) => pos,
            Err(e) => {
                warn!(error = %e, "Pointer position unavailable, skipping kill switch check");
                return Ok(());
            }
        };

        let Some(anchor) = anchor else {
            self.state.lock().anchor = Some(current);
            return Ok(());
        };

        let distance = displacement(anchor, current);
        if distance > self.threshold_px {
            let err = SafetyError::UserInterrupt {
                distance,
                threshold: self.threshold_px,
            };
            warn!(
                distance,
                threshold = self.threshold_px,
                "Kill switch tripped: operator moved the pointer"
            );
            self.state.lock().tripped = Some(err.clone());
            return Err(err);
        }
        Ok(())
    }

    /// Record a self-initiated action that left the pointer near `(x, y)`.
    pub async fn record_action(&self, x: i32, y: i32) {
        let position = self.pointer.position().await.unwrap_or((x, y));
        let mut state = self.state.lock();
        state.anchor = Some(position);
        state.last_self_move = Some(Instant::now());
    }
}

fn displacement(from: (i32, i32), to: (i32, i32)) -> f64 {
    let dx = f64::from(to.0 - from.0);
    let dy = f64::from(to.1 - from.1);
    dx.hypot(dy)
}

#[cfg(test)]
#[path = "kill_switch_tests.rs"]
mod tests;
