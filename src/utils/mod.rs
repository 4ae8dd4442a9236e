// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/utils/mod.rs
// Version: 1.0.0
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file is the module declaration for utility functions in the
// NimiqPocket miner client, located in the utils subdirectory.
//
// Tree Location:
// - src/utils/mod.rs (utils module entry point)
// - Submodules: format

pub mod format;

pub use format::human_hashrate;
