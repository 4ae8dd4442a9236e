// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/core/types.rs
// Version: 1.0.1
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file defines core data structures for the NimiqPocket miner client,
// located in the core subdirectory. It includes the command-line arguments,
// the user-friendly payout address, the session state machine states, the
// inbound event type, and the device metadata sent to the pool.
//
// Tree Location:
// - src/core/types.rs (core data structures)
// - Depends on: clap, serde, thiserror

use clap::Parser;
use serde::Serialize;
use std::fmt::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Command-line arguments for the NimiqPocket miner client
#[derive(Parser, Debug)]
#[command(
    name = "nimiqpocket-miner",
    author = "NimiqPocket",
    version = "1.0.0",
    about = "NimiqPocket pool miner client",
    long_about = "NimiqPocket miner client: selects the closest pool server by latency,\n\
                  derives a start difficulty from the claimed hash rate, and keeps the\n\
                  pool session in sync with the consensus state of a Nimiq node.\n\n\
                  Examples:\n\
                    nimiqpocket-miner --config config.json\n\
                    nimiqpocket-miner --config config.json --server us.nimiqpocket.com --hashrate 200"
)]
pub struct Args {
    /// Path to the JSON configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        default_value = "config.json",
        help = "Path to the miner configuration file"
    )]
    pub config: PathBuf,

    /// Pin the pool server, skipping latency-based selection
    #[arg(
        long,
        value_name = "HOST",
        help = "Pin the pool server (skips latency-based selection)"
    )]
    pub server: Option<String>,

    /// Device name reported to the pool ('*' = auto-generate)
    #[arg(long, value_name = "NAME", help = "Device name ('*' = auto-generate)")]
    pub name: Option<String>,

    /// Claimed hash rate in kH/s, used to derive the start difficulty
    #[arg(long, value_name = "KHS", help = "Claimed hash rate in kH/s")]
    pub hashrate: Option<f64>,
}

/// Base32 alphabet used by user-friendly addresses
const ADDRESS_ALPHABET: &str = "0123456789ABCDEFGHJKLMNPQRSTUVXY";

/// Errors produced while parsing a user-friendly payout address
#[derive(Debug, Error, PartialEq)]
pub enum AddressError {
    #[error("address must be 36 characters without spaces, got {0}")]
    InvalidLength(usize),
    #[error("address must start with 'NQ'")]
    InvalidCountryCode,
    #[error("invalid character '{0}' in address")]
    InvalidCharacter(char),
    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// A validated user-friendly payout address: "NQ" + two check digits + 32
/// base32 characters, with an IBAN-style mod-97 checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address(String);

impl Address {
    /// Parse a user-friendly address, tolerating spaces and lowercase input.
    pub fn from_user_friendly(input: &str) -> Result<Self, AddressError> {
        let normalized: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        if let Some(c) = normalized.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(AddressError::InvalidCharacter(c));
        }
        if normalized.len() != 36 {
            return Err(AddressError::InvalidLength(normalized.len()));
        }
        if !normalized.starts_with("NQ") {
            return Err(AddressError::InvalidCountryCode);
        }
        if let Some(c) = normalized[2..4].chars().find(|c| !c.is_ascii_digit()) {
            return Err(AddressError::InvalidCharacter(c));
        }
        if let Some(c) = normalized[4..].chars().find(|c| !ADDRESS_ALPHABET.contains(*c)) {
            return Err(AddressError::InvalidCharacter(c));
        }

        // IBAN check: move the country code and check digits behind the
        // payload, expand letters to numbers, and verify mod 97 == 1.
        let rearranged = format!("{}{}", &normalized[4..], &normalized[..4]);
        if Self::mod_97(&rearranged) != 1 {
            return Err(AddressError::ChecksumMismatch);
        }

        Ok(Self(normalized))
    }

    /// Remainder mod 97 over the IBAN digit expansion of `input`
    fn mod_97(input: &str) -> u32 {
        input
            .chars()
            .flat_map(|c| {
                if c.is_ascii_digit() {
                    vec![c as u32 - '0' as u32]
                } else {
                    let value = c as u32 - 'A' as u32 + 10;
                    vec![value / 10, value % 10]
                }
            })
            .fold(0u32, |rem, digit| (rem * 10 + digit) % 97)
    }
}

impl fmt::Display for Address {
    /// Render in the user-friendly form: groups of four separated by spaces
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.0.chars().enumerate() {
            if i > 0 && i % 4 == 0 {
                f.write_char(' ')?;
            }
            f.write_char(c)?;
        }
        Ok(())
    }
}

/// Session lifecycle states, owned exclusively by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingConsensus,
    Connected,
    Disconnected,
}

/// The single inbound event type feeding the session orchestrator. Consensus
/// and network events arrive from the node feed, share and hash-rate events
/// from the mining session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ConsensusEstablished,
    ConsensusLost,
    HeadChanged { height: u32 },
    PeerJoined { address: String },
    PeerLeft { address: String },
    ShareFound { nonce: u32 },
    HashratesChanged { rates: Vec<f64> },
}

/// Device metadata sent to the pool on registration
#[derive(Debug, Clone, Serialize)]
pub struct DeviceData {
    pub device_name: String,
    pub start_difficulty: f64,
    pub miner_version: String,
}

/// Per-device descriptor used to label hash-rate reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GpuDevice {
    pub idx: u32,
}


// Changelog:
// - v1.0.1 (2026-08-27): Address display now writes characters directly
//   instead of re-slicing the backing string.
// - v1.0.0 (2026-08-27): Initial core types.
//   - Command-line arguments, user-friendly address parsing with mod-97
//     checksum, session states, the inbound SessionEvent type, and the
//     device metadata payload.
