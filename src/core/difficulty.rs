// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/core/difficulty.rs
// Version: 1.0.0
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file derives the initial share difficulty from the claimed hash rate,
// located in the core subdirectory. The difficulty scales linearly with the
// claimed throughput so that shares arrive at roughly the desired cadence at
// connection time; the pool retunes after observing real performance.

use crate::core::config::DEFAULT_HASHRATE_KHS;

/// Desired share submissions per second at the claimed hash rate
pub const DESIRED_SPS: f64 = 5.0;

/// Initial share difficulty for a claimed hash rate in kH/s.
///
/// `start_difficulty = (hashrate * 1000 * DESIRED_SPS) / 2^16`. Non-positive
/// or non-finite claims substitute the 100 kH/s default instead of producing
/// a degenerate target. Pure function, no other error conditions.
pub fn start_difficulty(hashrate_khs: f64) -> f64 {
    let hashrate = if hashrate_khs.is_finite() && hashrate_khs > 0.0 {
        hashrate_khs
    } else {
        DEFAULT_HASHRATE_KHS
    };
    (1_000.0 * hashrate * DESIRED_SPS) / (1u64 << 16) as f64
}


// Changelog:
// - v1.0.0 (2026-08-27): Initial difficulty derivation.
//   - Linear scaling with the claimed hash rate at 5 shares/s, with the
//     100 kH/s default substituted for invalid claims.
