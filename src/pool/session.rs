// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/pool/session.rs
// Version: 1.0.0
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file implements the mining session collaborator, located in the pool
// subdirectory. The MiningSession trait is the narrow interface the
// orchestrator drives; PoolSession is the TCP-backed implementation that
// registers the device with the pool and forwards backend notifications
// (shares found, hash-rate measurements) onto the shared event channel.
//
// Tree Location:
// - src/pool/session.rs (mining session trait and TCP implementation)
// - Depends on: tokio, async-trait, serde_json, tracing

use crate::Result;
use crate::core::types::{Address, DeviceData, GpuDevice, SessionEvent};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpStream, lookup_host};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// The mining session as seen by the orchestrator. Injected rather than
/// constructed internally so tests can substitute a double.
#[async_trait]
pub trait MiningSession: Send {
    /// Open the pool connection. Must not be called while already connected.
    async fn connect(&mut self, host: &str, port: u16) -> Result<()>;

    /// Close the pool connection. A no-op when not connected, including
    /// against a connection that never finished establishing.
    async fn disconnect(&mut self);

    /// Per-device descriptors used to label hash-rate reports
    fn gpu_info(&self) -> &[GpuDevice];
}

struct Connection {
    writer: OwnedWriteHalf,
    reader_task: JoinHandle<()>,
}

/// TCP-backed mining session for the NimiqPocket pool
pub struct PoolSession {
    payout_address: Address,
    device_id: u32,
    device_data: DeviceData,
    devices: Vec<u32>,
    memory: Vec<u32>,
    gpu_info: Vec<GpuDevice>,
    events: UnboundedSender<SessionEvent>,
    connection: Option<Connection>,
}

impl PoolSession {
    pub fn new(
        payout_address: Address,
        device_id: u32,
        device_data: DeviceData,
        devices: Vec<u32>,
        memory: Vec<u32>,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        // Device selection doubles as the report labels; a single implicit
        // device when the configuration does not narrow it down.
        let gpu_info = if devices.is_empty() {
            vec![GpuDevice { idx: 0 }]
        } else {
            devices.iter().map(|&idx| GpuDevice { idx }).collect()
        };
        Self {
            payout_address,
            device_id,
            device_data,
            devices,
            memory,
            gpu_info,
            events,
            connection: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Resolve a pool address from either IP or domain form
    async fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
        let endpoint = format!("{}:{}", host, port);
        if let Ok(addr) = endpoint.parse::<SocketAddr>() {
            return Ok(addr);
        }
        let mut addrs = lookup_host(&endpoint).await?;
        addrs
            .next()
            .ok_or_else(|| format!("no addresses found for {}", endpoint).into())
    }

    fn register_message(&self) -> String {
        let register = json!({
            "message": "register",
            "address": self.payout_address.to_string(),
            "device_id": self.device_id,
            "device_data": self.device_data,
            "devices": self.devices,
            "memory": self.memory,
        });
        format!("{}\n", register)
    }
}

/// Map one backend notification line to a session event
fn parse_backend_message(line: &str) -> Option<SessionEvent> {
    let message: Value = serde_json::from_str(line).ok()?;
    let params = message.get("params");
    match message.get("method")?.as_str()? {
        "share" => {
            let nonce = params?.get("nonce")?.as_u64()? as u32;
            Some(SessionEvent::ShareFound { nonce })
        }
        "hashrates-changed" => {
            let rates = params?
                .get("rates")?
                .as_array()?
                .iter()
                .map(|rate| rate.as_f64())
                .collect::<Option<Vec<f64>>>()?;
            Some(SessionEvent::HashratesChanged { rates })
        }
        method => {
            debug!("ignoring pool message: {}", method);
            None
        }
    }
}

#[async_trait]
impl MiningSession for PoolSession {
    async fn connect(&mut self, host: &str, port: u16) -> Result<()> {
        if self.connection.is_some() {
            warn!("connect requested while already connected, ignoring");
            return Ok(());
        }

        let addr = Self::resolve(host, port).await?;
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?; // Low latency matters more than throughput
        let (reader, mut writer) = stream.into_split();

        writer.write_all(self.register_message().as_bytes()).await?;
        writer.flush().await?;
        info!("📤 Registered device {} with {}", self.device_id, host);

        // Reconnection is consensus-driven, so the reader just drains the
        // stream into the event channel and stops on EOF.
        let events = self.events.clone();
        let reader_task = tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if let Some(event) = parse_backend_message(&line) {
                    if events.send(event).is_err() {
                        return;
                    }
                }
            }
            debug!("pool stream closed");
        });

        self.connection = Some(Connection {
            writer,
            reader_task,
        });
        Ok(())
    }

    async fn disconnect(&mut self) {
        match self.connection.take() {
            Some(connection) => {
                connection.reader_task.abort();
                let mut writer = connection.writer;
                let _ = writer.shutdown().await;
                info!("📡 Disconnected from pool");
            }
            None => debug!("disconnect requested while not connected"),
        }
    }

    fn gpu_info(&self) -> &[GpuDevice] {
        &self.gpu_info
    }
}


// Changelog:
// - v1.0.0 (2026-08-27): Initial mining session.
//   - MiningSession trait at the orchestrator seam, TCP implementation with
//     JSON registration and a backend-notification reader task.
