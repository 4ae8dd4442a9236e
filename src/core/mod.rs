// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/core/mod.rs
// Version: 1.0.0
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file is the module declaration for the core functionality of the
// NimiqPocket miner client, located in the core subdirectory. It declares
// submodules and re-exports key types for use throughout the project.
//
// Tree Location:
// - src/core/mod.rs (core module entry point)
// - Submodules: config, device, difficulty, types

pub mod config;
pub mod device;
pub mod difficulty;
pub mod types;

// Re-export key types for convenience
pub use config::{ConfigError, MinerConfig};
pub use device::DeviceIdentity;
pub use types::{Address, Args, DeviceData, GpuDevice, SessionEvent, SessionState};

// Changelog:
// - v1.0.0 (2026-08-27): Initial module layout.
//   - Purpose: Organizes configuration, device identity, difficulty math, and
//     shared data types behind one entry point.
