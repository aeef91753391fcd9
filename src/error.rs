use std::fmt;

use crate::cpu::RunState;

/// Anomalies reported by `CPU::step`.
///
/// None of these abort emulation. `InvalidOpcode` is returned after the
/// no-op has completed, so the caller may log it and keep stepping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// The byte at `address` has no documented meaning on the active variant.
    /// PC has moved past it and `cycles` were charged.
    InvalidOpcode { opcode: u8, address: u16, cycles: u32 },
    /// The CPU executed STP or WAI and will not fetch until it is reset.
    Halted { state: RunState, pc: u16 },
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::InvalidOpcode { opcode, address, .. } => {
                write!(f, "invalid opcode ${:02X} at ${:04X}", opcode, address)
            }
            ExecutionError::Halted { state, pc } => {
                write!(f, "CPU is {:?} at ${:04X}", state, pc)
            }
        }
    }
}

impl std::error::Error for ExecutionError {}

#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    Encoding(base64::DecodeError),
    /// The RLE stream was truncated or expanded to the wrong length.
    Compression(String),
    /// SHA-256 of the restored image does not match the recorded checksum.
    ChecksumMismatch { expected: String, actual: String },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Json(e) => write!(f, "snapshot JSON error: {}", e),
            SnapshotError::Encoding(e) => write!(f, "snapshot memory encoding error: {}", e),
            SnapshotError::Compression(msg) => write!(f, "snapshot memory image corrupt: {}", msg),
            SnapshotError::ChecksumMismatch { expected, actual } => {
                write!(f, "snapshot checksum mismatch: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Json(e) => Some(e),
            SnapshotError::Encoding(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Json(e)
    }
}

impl From<base64::DecodeError> for SnapshotError {
    fn from(e: base64::DecodeError) -> Self {
        SnapshotError::Encoding(e)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "invalid emulator config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
