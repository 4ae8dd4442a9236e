// NimiqPocket Miner - Free and Open Source Software Statement
//
// This project, nimiqpocket-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License. You are free to use, modify, and distribute
// this software in accordance with the license terms. Contributions are
// welcome via pull requests to the project repository.
//
// File: src/core/device.rs
// Version: 1.0.1
// Developer: NimiqPocket <pool@nimiqpocket.com>
//
// This file builds the device identity reported to the pool, located in the
// core subdirectory. The device name is either taken verbatim from the
// configuration or synthesized from machine attributes; the device id is
// derived deterministically from the node's network identity so the pool can
// recognize returning devices across restarts.
//
// Tree Location:
// - src/core/device.rs (device identity builder)
// - Depends on: sha2, hex, sysinfo, std

use sha2::{Digest, Sha256};
use std::net::UdpSocket;

/// Version string reported to the pool
pub const MINER_VERSION: &str = "GPU Miner 1.0.0";

/// Configured name that requests auto-synthesis
pub const WILDCARD_NAME: &str = "*";

/// Stable device identity, created once at startup and immutable afterwards
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    pub device_id: u32,
    pub device_name: String,
}

impl DeviceIdentity {
    /// Build the identity from the configured name override and the node's
    /// network identity string.
    pub fn build(name_override: &str, network_identity: &str) -> Self {
        let device_name = if name_override != WILDCARD_NAME {
            name_override.to_string()
        } else {
            synthesize_device_name(
                &local_address(),
                std::env::consts::OS,
                std::env::consts::ARCH,
                &os_release(),
            )
        };
        Self {
            device_id: generate_device_id(network_identity),
            device_name,
        }
    }

    /// Device id in the hex form used for operator-facing output
    pub fn device_id_hex(&self) -> String {
        hex::encode(self.device_id.to_be_bytes())
    }
}

/// Space-joined device name: local address, platform, architecture, release,
/// in that fixed order.
pub fn synthesize_device_name(address: &str, platform: &str, arch: &str, release: &str) -> String {
    [address, platform, arch, release].join(" ")
}

/// Deterministic device id: the leading 32 bits of the SHA-256 digest of the
/// network identity. Stable for the same machine/network configuration.
pub fn generate_device_id(network_identity: &str) -> u32 {
    let digest = Sha256::digest(network_identity.as_bytes());
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Local address of the default route. Falls back to loopback when the
/// machine has no route; the name only has to be descriptive.
fn local_address() -> String {
    UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("8.8.8.8:80")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string())
}

/// Kernel release string, matching what `os.release()` reported upstream
fn os_release() -> String {
    sysinfo::System::kernel_version().unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_name_order() {
        let name = synthesize_device_name("192.168.1.10", "linux", "x86_64", "6.1.0");
        assert_eq!(name, "192.168.1.10 linux x86_64 6.1.0");
    }

    #[test]
    fn test_override_used_verbatim() {
        let identity = DeviceIdentity::build("office-rig", "peer-identity");
        assert_eq!(identity.device_name, "office-rig");
    }

    #[test]
    fn test_wildcard_synthesizes_name() {
        let identity = DeviceIdentity::build(WILDCARD_NAME, "peer-identity");
        assert_ne!(identity.device_name, WILDCARD_NAME);
        // address, platform, arch, then a release that may itself contain
        // spaces on some kernels
        let mut parts = identity.device_name.splitn(3, ' ');
        assert!(parts.next().is_some_and(|addr| !addr.is_empty()));
        assert_eq!(parts.next(), Some(std::env::consts::OS));
        let rest = parts.next().expect("arch and release components");
        assert!(
            rest.starts_with(std::env::consts::ARCH),
            "expected arch prefix in '{}'",
            rest
        );
    }

    #[test]
    fn test_device_id_hex_is_eight_lowercase_digits() {
        let identity = DeviceIdentity::build("office-rig", "peer-identity");
        let rendered = identity.device_id_hex();
        assert_eq!(rendered.len(), 8);
        assert!(rendered.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(rendered, hex::encode(identity.device_id.to_be_bytes()));
    }

    #[test]
    fn test_device_id_is_stable_and_distinct() {
        let a = generate_device_id("ws://node-a/peer-1");
        let b = generate_device_id("ws://node-a/peer-1");
        let c = generate_device_id("ws://node-b/peer-2");
        assert_eq!(a, b, "same identity must map to the same device id");
        assert_ne!(a, c, "distinct identities should not collide");
    }
}

// Changelog:
// - v1.0.1 (2026-08-27): Added device_id_hex for operator-facing output.
// - v1.0.0 (2026-08-27): Initial device identity builder.
//   - Verbatim override or synthesized "<ip> <platform> <arch> <release>"
//     name, SHA-256 based device id.
