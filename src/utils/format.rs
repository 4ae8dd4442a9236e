// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/utils/format.rs
// Version: 1.0.0
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file provides formatting helpers for operator-facing status lines in
// the NimiqPocket miner client, located in the utils subdirectory.
//
// Tree Location:
// - src/utils/format.rs (formatting utilities)
// - Depends on: std

/// Auto-scaling hash-rate units above the plain H/s range
const UNITS: [&str; 8] = ["kH/s", "MH/s", "GH/s", "TH/s", "PH/s", "EH/s", "ZH/s", "YH/s"];

/// Scale threshold between units
const THRESH: f64 = 1000.0;

/// Render a hash rate in H/s with auto-scaled units.
///
/// Rates below 1000 H/s are printed as-is ("50 H/s"); larger rates are scaled
/// in steps of 1000 with one decimal ("1.0 kH/s", "2.5 MH/s"), capped at YH/s.
pub fn human_hashrate(hashes: f64) -> String {
    if hashes.abs() < THRESH {
        return format!("{} H/s", hashes);
    }
    let mut value = hashes;
    let mut unit = 0;
    loop {
        value /= THRESH;
        if value.abs() < THRESH || unit == UNITS.len() - 1 {
            break;
        }
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}


// Changelog:
// - v1.0.0 (2026-08-27): Initial formatting helpers.
//   - human_hashrate with plain H/s below 1000 and one-decimal auto-scaled
//     units above.
