// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/miner/mod.rs
// Version: 1.0.0
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file is the module declaration for the session orchestration logic of
// the NimiqPocket miner client, located in the miner subdirectory.
//
// Tree Location:
// - src/miner/mod.rs (miner module entry point)
// - Submodules: orchestrator

pub mod orchestrator;

pub use orchestrator::{SYNC_REPORT_INTERVAL, SessionOrchestrator};
