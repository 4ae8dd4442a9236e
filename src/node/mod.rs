// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/node/mod.rs
// Version: 1.0.0
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file is the module declaration for the consensus node collaborator,
// located in the node subdirectory. The consensus engine runs out of process;
// this module adapts its event feed onto the orchestrator channel.
//
// Tree Location:
// - src/node/mod.rs (node module entry point)
// - Submodules: client

pub mod client;

pub use client::NodeClient;
