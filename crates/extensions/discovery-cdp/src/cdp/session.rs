//! CDP page session for a single attached target.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use super::client::Channel;
use super::error::CdpError;
use super::protocol::{AXNode, BoxModel, NodeAtLocation};

/// Error code CDP uses for nodes without layout.
const NO_LAYOUT: i64 = -32000;

/// A session attached to one page target.
pub struct PageSession {
    target_id: String,
    session_id: String,
    channel: Arc<Channel>,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, channel: Arc<Channel>) -> Self {
        Self {
            target_id,
            session_id,
            channel,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.channel.call(method, params, Some(&self.session_id)).await
    }

    // ========================================================================
    // Accessibility
    // ========================================================================

    pub async fn enable_accessibility(&self) -> Result<(), CdpError> {
        self.call("DOM.enable", None).await?;
        self.call("Accessibility.enable", None).await?;
        debug!("Enabled accessibility for session {}", self.session_id);
        Ok(())
    }

    pub async fn disable_accessibility(&self) -> Result<(), CdpError> {
        self.call("Accessibility.disable", None).await?;
        Ok(())
    }

    /// The whole accessibility tree, flattened.
    pub async fn get_full_tree(&self) -> Result<Vec<AXNode>, CdpError> {
        let result = self.call("Accessibility.getFullAXTree", None).await?;
        parse_nodes(result)
    }

    /// The accessibility subtree rooted at a DOM node.
    pub async fn get_partial_tree(&self, backend_node_id: i64) -> Result<Vec<AXNode>, CdpError> {
        let result = self
            .call(
                "Accessibility.getPartialAXTree",
                Some(json!({
                    "backendNodeId": backend_node_id,
                    "fetchRelatives": true
                })),
            )
            .await?;
        parse_nodes(result)
    }

    // ========================================================================
    // DOM
    // ========================================================================

    /// Box model for a DOM node; `None` when it has no layout.
    pub async fn get_box_model(&self, backend_node_id: i64) -> Result<Option<BoxModel>, CdpError> {
        let result = self
            .call(
                "DOM.getBoxModel",
                Some(json!({"backendNodeId": backend_node_id})),
            )
            .await;

        match result {
            Ok(r) => {
                let model: BoxModel = serde_json::from_value(r["model"].clone())?;
                Ok(Some(model))
            }
            Err(CdpError::Protocol { code: NO_LAYOUT, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// DOM node at a page-relative point.
    pub async fn get_node_for_location(&self, x: i64, y: i64) -> Result<NodeAtLocation, CdpError> {
        let result = self
            .call(
                "DOM.getNodeForLocation",
                Some(json!({
                    "x": x,
                    "y": y,
                    "includeUserAgentShadowDOM": false
                })),
            )
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    // ========================================================================
    // Runtime
    // ========================================================================

    /// Evaluate a JavaScript expression, returning its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["text"].as_str().unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }
}

fn parse_nodes(result: Value) -> Result<Vec<AXNode>, CdpError> {
    match result.get("nodes") {
        Some(nodes) => Ok(serde_json::from_value(nodes.clone())?),
        None => Err(CdpError::InvalidResponse("Missing nodes".to_string())),
    }
}
