// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/lib.rs
// Version: 1.0.0
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file serves as the main library entry point for the NimiqPocket miner
// client, located at the root of the source tree. It exports all public
// modules and types that other crates or binaries can use.
//
// Tree Location:
// - src/lib.rs (root library file)
// - Exports modules: core, miner, node, pool, utils

pub mod core;
pub mod miner;
pub mod node;
pub mod pool;
pub mod utils;

// Re-export commonly used types at the crate root for convenience
pub use crate::core::config::MinerConfig;
pub use crate::core::device::DeviceIdentity;
pub use crate::core::difficulty::start_difficulty;
pub use crate::miner::SessionOrchestrator;
pub use crate::node::NodeClient;
pub use crate::pool::{PoolSession, ServerFinder};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

// Changelog:
// - v1.0.0 (2026-08-27): Initial library root.
//   - Purpose: Organizes the client into core, miner, node, pool, and utils
//     modules and defines the shared Result type.
//   - Note: This file acts as the public interface, simplifying integration
//     with main.rs and the integration test suite.
