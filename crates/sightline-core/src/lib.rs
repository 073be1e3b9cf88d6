//! # Sightline Core
//!
//! The engine's decision logic, independent of any particular backend:
//!
//! - [`CircuitBreaker`] and [`RetryPolicy`] - failure gating for remote clients
//! - [`StrategyDetector`] - window class / process name → [`Strategy`]
//! - [`StrategyDispatcher`] - runs sources with fallback chains
//! - [`ActionLoop`] - capture → locate → act → verify → retry
//! - [`KillSwitch`] - stops automation when the operator takes the pointer
//!
//! [`Strategy`]: sightline_protocols::Strategy

pub mod action;
pub mod breaker;
pub mod dispatcher;
pub mod retry;
pub mod strategy;

pub use action::{ActionGuard, ActionLoop, ImageAnalyzer, KillSwitch, PromptVision};
pub use breaker::{BreakerPolicy, CircuitBreaker, CircuitOpen, CircuitState};
pub use dispatcher::{FallbackPlan, SourceRegistry, StrategyDispatcher};
pub use retry::RetryPolicy;
pub use strategy::{GameSignatures, StrategyDetector};
