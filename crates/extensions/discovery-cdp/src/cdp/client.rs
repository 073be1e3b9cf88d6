//! CDP WebSocket client.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use super::error::CdpError;
use super::protocol::{CdpRequest, CdpResponse, TargetInfo};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, CdpError>>>>>;

/// Request/response plumbing shared by the client and its page sessions.
pub(crate) struct Channel {
    ws_tx: tokio::sync::Mutex<WsSink>,
    pending: Pending,
    request_id: AtomicU64,
    request_timeout: Duration,
}

impl Channel {
    /// Send a command and wait for its reply.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        let sent = {
            let mut ws = self.ws_tx.lock().await;
            ws.send(Message::Text(json.into())).await
        };
        if let Err(e) = sent {
            self.pending.lock().remove(&id);
            return Err(e.into());
        }

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }
}

/// Connection to a browser's debugger WebSocket.
pub struct CdpClient {
    browser_ws_url: String,
    channel: Arc<Channel>,
    recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Open the browser-level WebSocket.
    pub async fn connect(browser_ws_url: &str, request_timeout: Duration) -> Result<Self, CdpError> {
        let url = url::Url::parse(browser_ws_url)?;
        let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
        let (ws_sink, ws_source) = ws_stream.split();
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));

        let recv_task = {
            let pending = pending.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, pending).await;
            })
        };

        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            browser_ws_url: browser_ws_url.to_string(),
            channel: Arc::new(Channel {
                ws_tx: tokio::sync::Mutex::new(ws_sink),
                pending,
                request_id: AtomicU64::new(1),
                request_timeout,
            }),
            recv_task,
        })
    }

    /// Routes replies to their waiting callers; events are ignored.
    async fn receive_loop(mut ws_source: WsSource, pending: Pending) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(resp) => {
                            let Some(id) = resp.id else { continue };
                            let Some(tx) = pending.lock().remove(&id) else { continue };
                            let result = match resp.error {
                                Some(error) => Err(CdpError::Protocol {
                                    code: error.code,
                                    message: error.message,
                                }),
                                None => Ok(resp.result.unwrap_or(Value::Null)),
                            };
                            let _ = tx.send(result);
                        }
                        Err(e) => warn!("Failed to parse CDP message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    warn!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
        // Dropping the senders wakes every waiter with SessionClosed.
        pending.lock().clear();
    }

    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    /// Browser-level command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.channel.call(method, params, None).await
    }

    /// All targets known to the browser.
    pub async fn get_targets(&self) -> Result<Vec<TargetInfo>, CdpError> {
        let result = self.call("Target.getTargets", None).await?;
        let targets: Vec<TargetInfo> = serde_json::from_value(result["targetInfos"].clone())?;
        Ok(targets)
    }

    /// Open page targets, excluding browser-internal pages.
    pub async fn page_targets(&self) -> Result<Vec<TargetInfo>, CdpError> {
        Ok(self
            .get_targets()
            .await?
            .into_iter()
            .filter(TargetInfo::is_user_page)
            .collect())
    }

    /// Open a new tab; returns its target id.
    pub async fn create_target(&self, url: &str) -> Result<String, CdpError> {
        let result = self
            .call("Target.createTarget", Some(json!({ "url": url })))
            .await?;
        result["targetId"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CdpError::InvalidResponse("Missing targetId".to_string()))
    }

    /// Attach to an existing page with a flattened session.
    pub async fn attach(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        Ok(PageSession::new(
            target_id.to_string(),
            session_id,
            self.channel.clone(),
        ))
    }

    /// Best-effort shutdown of the WebSocket. Never fails.
    pub async fn close(self) {
        let result = {
            let mut ws = self.channel.ws_tx.lock().await;
            ws.close().await
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to close CDP connection cleanly");
        }
    }
}

impl fmt::Debug for CdpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CdpClient")
            .field("browser_ws_url", &self.browser_ws_url)
            .finish_non_exhaustive()
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}
