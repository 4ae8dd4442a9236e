// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/pool/selector.rs
// Version: 1.0.0
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file ranks candidate pool hosts by TCP connect latency, located in the
// pool subdirectory. Probes run concurrently with a per-host timeout so one
// unreachable host cannot stall selection; the result is always a permutation
// of the candidates with unreachable hosts ranked last.
//
// Tree Location:
// - src/pool/selector.rs (latency prober and server selector)
// - Depends on: tokio, futures-util, tracing

use futures_util::future;
use std::cmp::Ordering;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time;
use tracing::debug;

/// Per-host probe timeout. Also covers DNS resolution of the host.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// One candidate host with its measured probe cost. `latency == None` marks a
/// host that failed to respond within the timeout.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedServer {
    pub host: String,
    pub latency: Option<Duration>,
}

/// Selects the best pool server by probing all candidates concurrently
#[derive(Debug, Clone)]
pub struct ServerFinder {
    timeout: Duration,
}

impl Default for ServerFinder {
    fn default() -> Self {
        Self::new(PROBE_TIMEOUT)
    }
}

impl ServerFinder {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Probe every candidate on `port` and return them best-to-worst.
    ///
    /// Reachable hosts come first, ordered by ascending connect latency;
    /// unreachable hosts follow in their original input order. The result is
    /// always a permutation of the candidates, so when every probe fails the
    /// caller's fallback (the head of the list) is simply the first input.
    pub async fn find_closest_servers(&self, candidates: &[String], port: u16) -> Vec<RankedServer> {
        let probes = candidates.iter().map(|host| {
            let host = host.clone();
            let timeout = self.timeout;
            async move {
                let latency = Self::probe(&host, port, timeout).await;
                RankedServer { host, latency }
            }
        });
        let mut ranked: Vec<RankedServer> = future::join_all(probes).await;

        // Stable sort: failures compare equal, keeping input order among them
        ranked.sort_by(|a, b| match (a.latency, b.latency) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        for server in &ranked {
            match server.latency {
                Some(latency) => debug!("probe {}: {:?}", server.host, latency),
                None => debug!("probe {}: no response", server.host),
            }
        }
        ranked
    }

    /// TCP connect probe with an internal timeout; `None` on any failure
    async fn probe(host: &str, port: u16, timeout: Duration) -> Option<Duration> {
        let start = Instant::now();
        match time::timeout(timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(_stream)) => Some(start.elapsed()),
            _ => None,
        }
    }
}


// Changelog:
// - v1.0.0 (2026-08-27): Initial latency-based server selection.
//   - Concurrent TCP connect probes with a 2s per-host timeout, stable
//     ranking with unreachable hosts last.
