// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/node/client.rs
// Version: 1.0.1
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file subscribes to the consensus node's WebSocket event feed, located
// in the node subdirectory. Consensus, blockchain, and network notifications
// are translated into session events on the orchestrator channel. The first
// connect also requests the node's network identity, which seeds the device
// id. After startup the feed re-dials on its own; the orchestrator never
// retries connects itself.
//
// Tree Location:
// - src/node/client.rs (consensus node feed client)
// - Depends on: tokio, tokio-tungstenite, futures-util, serde_json, tracing

use crate::Result;
use crate::core::types::SessionEvent;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, warn};

/// Delay between re-dials of the node feed
pub const RECONNECT_DELAY: Duration = Duration::from_secs(10);

/// Bound on the startup exchange (connect, subscribe, identity response). A
/// node that accepts the socket but never answers must fail startup, not
/// hang it.
pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(15);

const SUBSCRIBE_REQUEST_ID: u64 = 1;
const IDENTITY_REQUEST_ID: u64 = 2;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Client for the consensus node's WebSocket event feed
pub struct NodeClient {
    url: String,
    reconnect_delay: Duration,
    startup_timeout: Duration,
}

impl NodeClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            reconnect_delay: RECONNECT_DELAY,
            startup_timeout: STARTUP_TIMEOUT,
        }
    }

    /// Connect, subscribe, and request the node's network identity, then keep
    /// the feed alive in the background. The initial connect is part of the
    /// startup sequence and therefore fatal on failure or timeout; later
    /// drops emit `ConsensusLost` and re-dial with a fixed delay.
    pub async fn start(self, events: UnboundedSender<SessionEvent>) -> Result<String> {
        let mut stream = timeout(self.startup_timeout, connect_and_subscribe(&self.url))
            .await
            .map_err(|_| "timed out connecting to the node feed")??;
        let identity = timeout(self.startup_timeout, request_identity(&mut stream, &events))
            .await
            .map_err(|_| "timed out waiting for the node's network identity")??;

        tokio::spawn(async move {
            let mut current = Some(stream);
            loop {
                let ws = match current.take() {
                    Some(ws) => ws,
                    None => match connect_and_subscribe(&self.url).await {
                        Ok(ws) => ws,
                        Err(e) => {
                            warn!("node feed reconnect failed: {}", e);
                            sleep(self.reconnect_delay).await;
                            continue;
                        }
                    },
                };
                pump(ws, &events).await;
                if events.send(SessionEvent::ConsensusLost).is_err() {
                    break; // orchestrator is gone
                }
                warn!("📡 Node feed lost, retrying in {:?}", self.reconnect_delay);
                sleep(self.reconnect_delay).await;
            }
        });

        Ok(identity)
    }
}

async fn connect_and_subscribe(url: &str) -> Result<WsStream> {
    let (mut stream, _) = connect_async(url).await?;
    let subscribe = json!({
        "id": SUBSCRIBE_REQUEST_ID,
        "method": "subscribe",
        "params": ["consensus", "blockchain", "network"],
    });
    stream.send(Message::Text(subscribe.to_string())).await?;
    Ok(stream)
}

/// Request the network identity, forwarding any notifications that arrive
/// while waiting for the response.
async fn request_identity(
    stream: &mut WsStream,
    events: &UnboundedSender<SessionEvent>,
) -> Result<String> {
    let request = json!({ "id": IDENTITY_REQUEST_ID, "method": "get-network-identity" });
    stream.send(Message::Text(request.to_string())).await?;

    while let Some(message) = stream.next().await {
        let Message::Text(text) = message? else {
            continue;
        };
        let Ok(value) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        if value.get("id").and_then(Value::as_u64) == Some(IDENTITY_REQUEST_ID) {
            let identity = value
                .get("result")
                .and_then(Value::as_str)
                .ok_or("node identity response carried no result")?;
            return Ok(identity.to_string());
        }
        if let Some(event) = parse_notification(&value) {
            let _ = events.send(event);
        }
    }
    Err("node feed closed before answering the identity request".into())
}

/// Drain the feed into the event channel until it closes
async fn pump(ws: WsStream, events: &UnboundedSender<SessionEvent>) {
    let (mut write, mut read) = ws.split();
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let Ok(value) = serde_json::from_str::<Value>(&text) else {
                    debug!("ignoring non-JSON feed message");
                    continue;
                };
                if let Some(event) = parse_notification(&value) {
                    if events.send(event).is_err() {
                        return;
                    }
                }
            }
            Ok(Message::Ping(payload)) => {
                let _ = write.send(Message::Pong(payload)).await;
            }
            Ok(Message::Close(_)) | Err(_) => break,
            _ => {}
        }
    }
}

/// Map one feed notification to a session event
fn parse_notification(message: &Value) -> Option<SessionEvent> {
    let params = message.get("params");
    match message.get("method")?.as_str()? {
        "consensus-established" => Some(SessionEvent::ConsensusEstablished),
        "consensus-lost" => Some(SessionEvent::ConsensusLost),
        "head-changed" => {
            let height = params?.get("height")?.as_u64()? as u32;
            Some(SessionEvent::HeadChanged { height })
        }
        "peer-joined" => {
            let address = params?.get("address")?.as_str()?.to_string();
            Some(SessionEvent::PeerJoined { address })
        }
        "peer-left" => {
            let address = params?.get("address")?.as_str()?.to_string();
            Some(SessionEvent::PeerLeft { address })
        }
        method => {
            debug!("ignoring feed notification: {}", method);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    #[test]
    fn test_parse_consensus_notifications() {
        let established = json!({ "method": "consensus-established" });
        assert_eq!(
            parse_notification(&established),
            Some(SessionEvent::ConsensusEstablished)
        );
        let lost = json!({ "method": "consensus-lost" });
        assert_eq!(parse_notification(&lost), Some(SessionEvent::ConsensusLost));
    }

    #[test]
    fn test_parse_head_and_peer_notifications() {
        let head = json!({ "method": "head-changed", "params": { "height": 123456 } });
        assert_eq!(
            parse_notification(&head),
            Some(SessionEvent::HeadChanged { height: 123456 })
        );
        let joined = json!({ "method": "peer-joined", "params": { "address": "wss://seed1.nimiq.com:8443" } });
        assert_eq!(
            parse_notification(&joined),
            Some(SessionEvent::PeerJoined {
                address: "wss://seed1.nimiq.com:8443".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rejects_incomplete_notifications() {
        assert_eq!(parse_notification(&json!({ "method": "head-changed" })), None);
        assert_eq!(parse_notification(&json!({ "result": "ok" })), None);
        assert_eq!(parse_notification(&json!({ "method": "unknown" })), None);
    }

    #[tokio::test]
    async fn test_start_yields_identity_then_events() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        // Scripted node: answer the identity request, then push notifications
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            while let Some(Ok(message)) = ws.next().await {
                let Message::Text(text) = message else { continue };
                let value: Value = serde_json::from_str(&text).unwrap();
                if value["method"] == "get-network-identity" {
                    let reply = json!({ "id": value["id"], "result": "peer-1234" });
                    ws.send(Message::Text(reply.to_string())).await.unwrap();
                    let established = json!({ "method": "consensus-established" });
                    ws.send(Message::Text(established.to_string())).await.unwrap();
                    let head = json!({ "method": "head-changed", "params": { "height": 42 } });
                    ws.send(Message::Text(head.to_string())).await.unwrap();
                }
            }
        });

        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let client = NodeClient::new(&format!("ws://127.0.0.1:{}/", port));
        let identity = client.start(events_tx).await.expect("start should succeed");
        assert_eq!(identity, "peer-1234");

        let first = timeout(Duration::from_secs(2), events_rx.recv()).await.unwrap();
        assert_eq!(first, Some(SessionEvent::ConsensusEstablished));
        let second = timeout(Duration::from_secs(2), events_rx.recv()).await.unwrap();
        assert_eq!(second, Some(SessionEvent::HeadChanged { height: 42 }));
    }

    #[tokio::test]
    async fn test_start_fails_when_node_never_answers() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        // Scripted node: complete the handshake, then swallow every request
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            while let Some(Ok(_)) = ws.next().await {}
        });

        let (events_tx, _events_rx) = mpsc::unbounded_channel();
        let client = NodeClient {
            url: format!("ws://127.0.0.1:{}/", port),
            reconnect_delay: RECONNECT_DELAY,
            startup_timeout: Duration::from_millis(200),
        };
        let result = timeout(Duration::from_secs(2), client.start(events_tx))
            .await
            .expect("start must resolve within the startup bound");
        assert!(result.is_err(), "a silent node must fail startup");
    }

    #[tokio::test]
    async fn test_start_fails_when_node_is_down() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let (events_tx, _events_rx) = mpsc::unbounded_channel();
        let client = NodeClient::new(&format!("ws://127.0.0.1:{}/", port));
        assert!(client.start(events_tx).await.is_err());
    }
}

// Changelog:
// - v1.0.1 (2026-08-27): Bound the startup exchange with STARTUP_TIMEOUT so
//   a node that accepts the socket but never answers fails startup.
// - v1.0.0 (2026-08-27): Initial node feed client.
//   - WebSocket subscription with identity request, background re-dial loop
//     emitting ConsensusLost on feed drops.
