//! Bridge-backed discovery source.

use std::sync::Arc;

use async_trait::async_trait;
use sightline_protocols::{DiscoveryError, DiscoverySource, SourceKind, UIElement, WindowTarget};

use crate::client::BridgeClient;

pub struct BridgeSource {
    client: Arc<BridgeClient>,
}

impl BridgeSource {
    pub fn new(client: Arc<BridgeClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<BridgeClient> {
        &self.client
    }
}

#[async_trait]
impl DiscoverySource for BridgeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::GameBridge
    }

    async fn run(&self, _target: &WindowTarget) -> Result<Vec<UIElement>, DiscoveryError> {
        Ok(self.client.get_elements().await?.elements)
    }
}
