//! Browser discovery for Sightline.
//!
//! Reads the accessibility tree of a Chromium-family browser over the Chrome
//! DevTools Protocol and maps it to screen-space elements.
//!
//! ## Setup
//!
//! The browser must run with remote debugging enabled:
//!
//! ```bash
//! google-chrome --remote-debugging-port=9222 --user-data-dir=/path/to/profile
//! ```
//!
//! When it does not, [`BrowserSource`] runs the [`RecoverySaga`]: the
//! browser is closed, relaunched on a dedicated profile copied from the
//! everyday one, and its tabs are reopened.

pub mod browser;
pub mod cdp;
pub mod connector;
pub mod extractor;
pub mod offset;
pub mod recovery;
mod source;

pub use browser::{BrowserDetector, BrowserFamily, BrowserProcess, parse_debug_port};
pub use connector::CdpConnector;
pub use recovery::{
    BrowserHost, DebugEndpoint, HttpDebugEndpoint, RecoveryResult, RecoverySaga, RecoveryStep, StepOutcome,
    StepStatus, SystemBrowserHost,
};
pub use source::{BrowserSource, pick_target};
