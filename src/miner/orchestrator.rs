// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/miner/orchestrator.rs
// Version: 1.0.0
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file implements the session orchestrator, located in the miner
// subdirectory. It owns the mining session and drives its connect/disconnect
// lifecycle from consensus events, and it formats the operator-facing status
// lines for blocks, peers, shares, and hash rates. Handlers run one at a
// time on a single event channel, so no locking is needed.
//
// Tree Location:
// - src/miner/orchestrator.rs (session state machine and event wiring)
// - Depends on: tokio, tracing

use crate::Result;
use crate::core::types::{GpuDevice, SessionEvent, SessionState};
use crate::pool::MiningSession;
use crate::utils::format::human_hashrate;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info};

/// While still syncing, report the block height only every Nth block
pub const SYNC_REPORT_INTERVAL: u32 = 100;

/// The top-level state machine: owns the mining session, reacts to events
pub struct SessionOrchestrator<S: MiningSession> {
    session: S,
    host: String,
    port: u16,
    state: SessionState,
    consensus_established: bool,
}

impl<S: MiningSession> SessionOrchestrator<S> {
    pub fn new(session: S, host: String, port: u16) -> Self {
        Self {
            session,
            host,
            port,
            state: SessionState::Idle,
            consensus_established: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Process events until the channel closes. Each handler runs to
    /// completion before the next event is taken.
    pub async fn run(mut self, mut events: UnboundedReceiver<SessionEvent>) -> Result<()> {
        self.state = SessionState::AwaitingConsensus;
        info!("⏳ Awaiting consensus");
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        debug!("event channel closed, orchestrator stopping");
        Ok(())
    }

    async fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ConsensusEstablished => self.on_consensus_established().await,
            SessionEvent::ConsensusLost => self.on_consensus_lost().await,
            SessionEvent::HeadChanged { height } => {
                if self.should_report_head(height) {
                    info!("⛓️ Now at block: {}", height);
                }
            }
            SessionEvent::PeerJoined { address } => info!("🤝 Connected to {}", address),
            SessionEvent::PeerLeft { address } => info!("👋 Disconnected from {}", address),
            SessionEvent::ShareFound { nonce } => info!("💎 Found share. Nonce: {}", nonce),
            SessionEvent::HashratesChanged { rates } => {
                info!("⚡ {}", hashrate_report(&rates, self.session.gpu_info()));
            }
        }
    }

    async fn on_consensus_established(&mut self) {
        self.consensus_established = true;
        if self.state == SessionState::Connected {
            // Idempotence guard: never issue a second connect
            debug!("consensus re-established while connected, ignoring");
            return;
        }
        info!("🔗 Connecting to {}:{}", self.host, self.port);
        match self.session.connect(&self.host, self.port).await {
            Ok(()) => self.state = SessionState::Connected,
            Err(e) => {
                // No retry here: the next established signal reconnects
                error!("failed to connect to pool: {}", e);
                self.state = SessionState::Disconnected;
            }
        }
    }

    async fn on_consensus_lost(&mut self) {
        self.consensus_established = false;
        if self.state == SessionState::Connected {
            self.session.disconnect().await;
        }
        self.state = SessionState::Disconnected;
    }

    /// Report every block once consensus holds, every Nth block while syncing
    fn should_report_head(&self, height: u32) -> bool {
        self.consensus_established || height % SYNC_REPORT_INTERVAL == 0
    }
}

/// Aggregate per-device rates into the operator-facing hash-rate line:
/// total first, then the per-device breakdown labeled by device index.
pub fn hashrate_report(rates: &[f64], gpus: &[GpuDevice]) -> String {
    let total: f64 = rates.iter().sum();
    let breakdown = rates
        .iter()
        .enumerate()
        .map(|(slot, rate)| {
            let idx = gpus.get(slot).map(|gpu| gpu.idx).unwrap_or(slot as u32);
            format!("GPU{}: {}", idx, human_hashrate(*rate))
        })
        .collect::<Vec<_>>()
        .join(" | ");
    format!("Hashrate: {} | {}", human_hashrate(total), breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug, PartialEq)]
    enum Call {
        Connect(String, u16),
        Disconnect,
    }

    struct MockSession {
        calls: Vec<Call>,
        gpu_info: Vec<GpuDevice>,
        fail_connect: bool,
    }

    impl MockSession {
        fn new() -> Self {
            Self {
                calls: Vec::new(),
                gpu_info: vec![GpuDevice { idx: 0 }, GpuDevice { idx: 1 }, GpuDevice { idx: 2 }],
                fail_connect: false,
            }
        }
    }

    #[async_trait]
    impl MiningSession for MockSession {
        async fn connect(&mut self, host: &str, port: u16) -> crate::Result<()> {
            self.calls.push(Call::Connect(host.to_string(), port));
            if self.fail_connect {
                return Err("connection refused".into());
            }
            Ok(())
        }

        async fn disconnect(&mut self) {
            self.calls.push(Call::Disconnect);
        }

        fn gpu_info(&self) -> &[GpuDevice] {
            &self.gpu_info
        }
    }

    fn orchestrator() -> SessionOrchestrator<MockSession> {
        SessionOrchestrator::new(MockSession::new(), "us.nimiqpocket.com".to_string(), 8444)
    }

    #[tokio::test]
    async fn test_established_lost_established_sequence() {
        let mut orchestrator = orchestrator();
        orchestrator.handle_event(SessionEvent::ConsensusEstablished).await;
        orchestrator.handle_event(SessionEvent::ConsensusLost).await;
        orchestrator.handle_event(SessionEvent::ConsensusEstablished).await;

        assert_eq!(
            orchestrator.session.calls,
            vec![
                Call::Connect("us.nimiqpocket.com".to_string(), 8444),
                Call::Disconnect,
                Call::Connect("us.nimiqpocket.com".to_string(), 8444),
            ],
            "exactly two connects and one disconnect, in that order"
        );
        assert_eq!(orchestrator.state(), SessionState::Connected);
    }

    #[tokio::test]
    async fn test_no_connect_while_connected() {
        let mut orchestrator = orchestrator();
        orchestrator.handle_event(SessionEvent::ConsensusEstablished).await;
        orchestrator.handle_event(SessionEvent::ConsensusEstablished).await;

        let connects = orchestrator
            .session
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Connect(_, _)))
            .count();
        assert_eq!(connects, 1, "repeat established must not reconnect");
    }

    #[tokio::test]
    async fn test_lost_while_not_connected_is_noop() {
        let mut orchestrator = orchestrator();
        orchestrator.handle_event(SessionEvent::ConsensusLost).await;

        assert!(orchestrator.session.calls.is_empty());
        assert_eq!(orchestrator.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_failure_waits_for_next_established() {
        let mut orchestrator = orchestrator();
        orchestrator.session.fail_connect = true;
        orchestrator.handle_event(SessionEvent::ConsensusEstablished).await;
        assert_eq!(orchestrator.state(), SessionState::Disconnected);

        orchestrator.session.fail_connect = false;
        orchestrator.handle_event(SessionEvent::ConsensusEstablished).await;
        assert_eq!(orchestrator.state(), SessionState::Connected);
        assert_eq!(orchestrator.session.calls.len(), 2, "one connect per established");
    }

    #[tokio::test]
    async fn test_head_reports_gated_while_syncing() {
        let mut orchestrator = orchestrator();
        assert!(!orchestrator.should_report_head(99));
        assert!(orchestrator.should_report_head(100));
        assert!(orchestrator.should_report_head(0), "boundary block reports");

        orchestrator.handle_event(SessionEvent::ConsensusEstablished).await;
        assert!(orchestrator.should_report_head(99), "every block once established");
    }

    #[test]
    fn test_hashrate_report_aggregation() {
        let gpus = [GpuDevice { idx: 0 }, GpuDevice { idx: 1 }, GpuDevice { idx: 2 }];
        let report = hashrate_report(&[100.0, 250.0, 650.0], &gpus);
        assert_eq!(
            report,
            "Hashrate: 1.0 kH/s | GPU0: 100 H/s | GPU1: 250 H/s | GPU2: 650 H/s"
        );
    }

    #[test]
    fn test_hashrate_report_single_device() {
        let gpus = [GpuDevice { idx: 0 }];
        let report = hashrate_report(&[50.0], &gpus);
        assert_eq!(report, "Hashrate: 50 H/s | GPU0: 50 H/s");
    }

    #[test]
    fn test_hashrate_report_uses_device_indices() {
        // Devices 1 and 3 selected in the configuration
        let gpus = [GpuDevice { idx: 1 }, GpuDevice { idx: 3 }];
        let report = hashrate_report(&[1000.0, 2000.0], &gpus);
        assert_eq!(report, "Hashrate: 3.0 kH/s | GPU1: 1.0 kH/s | GPU3: 2.0 kH/s");
    }
}

// Changelog:
// - v1.0.0 (2026-08-27): Initial session orchestrator.
//   - Connect on established with an idempotence guard, disconnect on lost,
//     gated head reports, peer/share/hash-rate status lines.
