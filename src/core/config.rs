// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/core/config.rs
// Version: 1.0.0
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file implements configuration loading for the NimiqPocket miner
// client, located in the core subdirectory. The configuration is read once at
// startup from a JSON file, optionally overridden from the command line, and
// treated as immutable afterwards. Any configuration error is fatal.
//
// Tree Location:
// - src/core/config.rs (configuration loading and validation)
// - Depends on: serde, serde_json, thiserror

use crate::core::types::{Address, AddressError, Args};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Candidate pool hosts probed at startup
pub const DEFAULT_SERVERS: [&str; 2] = ["us.nimiqpocket.com", "hk.nimiqpocket.com"];

/// The pool listens on a fixed port regardless of the probed port
pub const POOL_PORT: u16 = 8444;

/// Default WebSocket endpoint of the consensus node event feed
pub const DEFAULT_NODE_FEED: &str = "ws://127.0.0.1:8648/ws";

/// Default claimed hash rate in kH/s
pub const DEFAULT_HASHRATE_KHS: f64 = 100.0;

/// Configuration errors, all fatal at startup (exit code 1)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed config file {path}: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
    #[error("config is missing the required 'address' key")]
    MissingAddress,
    #[error("invalid payout address: {0}")]
    InvalidAddress(#[from] AddressError),
}

/// Mining configuration, loaded once at startup. No hot reload.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Payout address in user-friendly form (required)
    pub address: String,
    /// Device name, `"*"` = synthesize from machine attributes
    pub name: String,
    /// Pinned pool host; when set, latency-based selection is advisory only
    pub server: Option<String>,
    /// Port used for latency probes (the pool port itself is fixed)
    pub port: u16,
    /// Claimed hash rate in kH/s
    pub hashrate: f64,
    /// Hashing-backend device selection, opaque to this client
    pub devices: Vec<u32>,
    /// Hashing-backend per-device memory selection, opaque to this client
    pub memory: Vec<u32>,
    /// WebSocket endpoint of the consensus node event feed
    pub node: String,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            name: "*".to_string(),
            server: None,
            port: POOL_PORT,
            hashrate: DEFAULT_HASHRATE_KHS,
            devices: Vec::new(),
            memory: Vec::new(),
            node: DEFAULT_NODE_FEED.to_string(),
        }
    }
}

impl MinerConfig {
    /// Load the configuration file and fail on anything unreadable,
    /// malformed, or missing the payout address.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        let config: MinerConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Malformed {
                path: path.display().to_string(),
                source,
            })?;
        if config.address.trim().is_empty() {
            return Err(ConfigError::MissingAddress);
        }
        Ok(config)
    }

    /// Apply command-line overrides on top of the file values
    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(server) = &args.server {
            self.server = Some(server.clone());
        }
        if let Some(name) = &args.name {
            self.name = name.clone();
        }
        if let Some(hashrate) = args.hashrate {
            self.hashrate = hashrate;
        }
    }

    /// Parse and validate the payout address
    pub fn payout_address(&self) -> Result<Address, ConfigError> {
        Ok(Address::from_user_friendly(&self.address)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BURN_ADDRESS: &str = "NQ07 0000 0000 0000 0000 0000 0000 0000 0000";

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"{
                "address": "NQ07 0000 0000 0000 0000 0000 0000 0000 0000",
                "name": "rig-01",
                "server": "hk.nimiqpocket.com",
                "port": 8443,
                "hashrate": 200.0,
                "devices": [0, 1],
                "memory": [2048, 2048]
            }"#,
        );
        let config = MinerConfig::load(file.path()).expect("config should load");
        assert_eq!(config.name, "rig-01");
        assert_eq!(config.server.as_deref(), Some("hk.nimiqpocket.com"));
        assert_eq!(config.port, 8443);
        assert_eq!(config.hashrate, 200.0);
        assert_eq!(config.devices, vec![0, 1]);
        assert!(config.payout_address().is_ok());
    }

    #[test]
    fn test_load_applies_defaults() {
        let file = write_config(&format!(r#"{{ "address": "{}" }}"#, BURN_ADDRESS));
        let config = MinerConfig::load(file.path()).expect("config should load");
        assert_eq!(config.name, "*");
        assert_eq!(config.server, None);
        assert_eq!(config.port, POOL_PORT);
        assert_eq!(config.hashrate, DEFAULT_HASHRATE_KHS);
        assert_eq!(config.node, DEFAULT_NODE_FEED);
    }

    #[test]
    fn test_load_rejects_missing_address() {
        let file = write_config(r#"{ "name": "rig-01" }"#);
        let result = MinerConfig::load(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::MissingAddress));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let file = write_config("{ not json");
        let result = MinerConfig::load(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_load_rejects_missing_file() {
        let result = MinerConfig::load(Path::new("/nonexistent/config.json"));
        assert!(matches!(result.unwrap_err(), ConfigError::Unreadable { .. }));
    }

    #[test]
    fn test_invalid_address_is_reported() {
        let file = write_config(r#"{ "address": "NQ99 not an address" }"#);
        let config = MinerConfig::load(file.path()).expect("file itself is fine");
        assert!(matches!(
            config.payout_address().unwrap_err(),
            ConfigError::InvalidAddress(_)
        ));
    }
}

// Changelog:
// - v1.0.0 (2026-08-27): Initial configuration module.
//   - JSON config file with defaults for every key except the payout address,
//     command-line overrides, and a fatal error taxonomy.
