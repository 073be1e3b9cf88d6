//! CDP message and domain types used by discovery.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// CDP request message.
#[derive(Debug, Serialize)]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// CDP response or event message.
#[derive(Debug, Deserialize)]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    pub method: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
}

/// Target info from `Target.getTargets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub target_id: String,
    #[serde(rename = "type")]
    pub target_type: String,
    pub title: String,
    pub url: String,
    pub attached: Option<bool>,
}

/// Schemes of browser-internal pages that are never discovery targets.
const INTERNAL_SCHEMES: &[&str] = &[
    "chrome://",
    "chrome-extension://",
    "chrome-untrusted://",
    "devtools://",
    "edge://",
    "brave://",
    "opera://",
    "vivaldi://",
    "about:",
];

impl TargetInfo {
    /// A real web page: type `page` and not a browser-internal URL.
    pub fn is_user_page(&self) -> bool {
        self.target_type == "page" && !is_internal_url(&self.url)
    }
}

/// Page entry from the `/json/list` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: String,
    #[serde(default)]
    pub title: String,
    pub url: String,
    pub web_socket_debugger_url: Option<String>,
}

impl PageInfo {
    pub fn is_user_page(&self) -> bool {
        self.page_type == "page" && !is_internal_url(&self.url)
    }
}

pub fn is_internal_url(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    INTERNAL_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

/// Browser version info from `/json/version`.
///
/// Chrome returns PascalCase field names for this endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser", default)]
    pub browser: String,
    #[serde(rename = "Protocol-Version", default)]
    pub protocol_version: String,
    #[serde(rename = "User-Agent", default)]
    pub user_agent: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// Box model from `DOM.getBoxModel`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxModel {
    pub content: Vec<f64>,
    pub border: Vec<f64>,
    pub width: i64,
    pub height: i64,
}

/// Node returned by `DOM.getNodeForLocation`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAtLocation {
    pub backend_node_id: i64,
    pub frame_id: Option<String>,
    pub node_id: Option<i64>,
}

/// AX node from the Accessibility domain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AXNode {
    pub node_id: String,
    #[serde(default)]
    pub ignored: bool,
    pub role: Option<AXValue>,
    pub name: Option<AXValue>,
    pub description: Option<AXValue>,
    pub value: Option<AXValue>,
    pub properties: Option<Vec<AXProperty>>,
    pub child_ids: Option<Vec<String>>,
    #[serde(rename = "backendDOMNodeId")]
    pub backend_dom_node_id: Option<i64>,
}

impl AXNode {
    pub fn role(&self) -> Option<&str> {
        self.role.as_ref().and_then(AXValue::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(AXValue::as_str)
    }

    /// Boolean property by name; absent means false.
    pub fn flag(&self, name: &str) -> bool {
        self.properties
            .iter()
            .flatten()
            .find(|p| p.name == name)
            .and_then(|p| p.value.value.as_ref())
            .map(|v| match v {
                Value::Bool(b) => *b,
                Value::String(s) => s == "true",
                _ => false,
            })
            .unwrap_or(false)
    }
}

/// AX value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AXValue {
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: Option<Value>,
}

impl AXValue {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }

    /// String form of the value; numbers and booleans are rendered.
    pub fn to_text(&self) -> Option<String> {
        match self.value.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// AX property.
#[derive(Debug, Clone, Deserialize)]
pub struct AXProperty {
    pub name: String,
    pub value: AXValue,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
