//! Chrome DevTools Protocol client.
//!
//! Talks to a Chromium-family browser started with
//! `--remote-debugging-port`. Only the domains discovery needs are wrapped:
//! Target, Accessibility, DOM and Runtime.

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
