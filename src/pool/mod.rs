// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/pool/mod.rs
// Version: 1.0.0
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file is the module declaration for the pool-facing functionality of
// the NimiqPocket miner client, located in the pool subdirectory: server
// selection by latency and the mining session connection.
//
// Tree Location:
// - src/pool/mod.rs (pool module entry point)
// - Submodules: selector, session

pub mod selector;
pub mod session;

// Re-export key types for convenience
pub use selector::{RankedServer, ServerFinder};
pub use session::{MiningSession, PoolSession};
