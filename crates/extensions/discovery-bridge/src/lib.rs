//! Game-bridge discovery for Sightline.
//!
//! A companion plugin inside the game listens on loopback (default port
//! 9876) and answers every connection with one length-prefixed JSON frame
//! describing the visible UI.

mod client;
pub mod framing;
mod source;
pub mod wire;

pub use client::{BridgeClient, BridgeSnapshot, is_available};
pub use source::BridgeSource;
pub use wire::{GameInfo, Resolution};
