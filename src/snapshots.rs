//! Save states: registers, run state and the full 64 KiB image.
//!
//! The image is run-length encoded, then base64 encoded so the snapshot
//! stays plain JSON. A SHA-256 of the raw image is checked on restore.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::Variant;
use crate::cpu::{RunState, CPU};
use crate::error::SnapshotError;
use crate::memory::{Memory, MEMORY_SIZE};
use crate::registers::Registers;

// Marks a run (count, value) or, followed by 0x00, a literal 0xFF.
const RLE_MARKER: u8 = 0xFF;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSnapshot {
    pub variant: Variant,
    pub registers: Registers,
    pub cycles: u64,
    pub state: RunState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub cpu: CpuSnapshot,
    /// base64 of the RLE-compressed image
    pub memory: String,
    /// Lowercase hex SHA-256 of the uncompressed image
    pub checksum: String,
    /// Compressed image size
    pub size_bytes: u64,
    pub compression_ratio: f32,
    pub instruction_count: u64,
}

impl MachineSnapshot {
    pub fn capture(name: impl Into<String>, cpu: &CPU, memory: &Memory, instruction_count: u64) -> Self {
        let cpu_state = CpuSnapshot {
            variant: cpu.variant(),
            registers: cpu.registers,
            cycles: cpu.get_cycles(),
            state: cpu.state,
        };

        let image = memory.as_slice();
        let compressed = compress_memory(image);
        let compression_ratio = compressed.len() as f32 / image.len() as f32;

        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Utc::now(),
            cpu: cpu_state,
            memory: STANDARD.encode(&compressed),
            checksum: checksum(image),
            size_bytes: compressed.len() as u64,
            compression_ratio,
            instruction_count,
        }
    }

    /// Decodes and verifies the memory image without touching any machine.
    pub fn memory_image(&self) -> Result<Vec<u8>, SnapshotError> {
        let compressed = STANDARD.decode(&self.memory)?;
        let image = decompress_memory(&compressed)?;
        let actual = checksum(&image);
        if actual != self.checksum {
            return Err(SnapshotError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual,
            });
        }
        Ok(image)
    }

    /// Loads the snapshot into `cpu` and `memory`. Nothing is modified
    /// unless the image decodes and its checksum matches.
    pub fn restore(&self, cpu: &mut CPU, memory: &mut Memory) -> Result<(), SnapshotError> {
        let image = self.memory_image()?;
        memory.copy_from(&image);
        cpu.restore_state(self.cpu.registers, self.cpu.cycles, self.cpu.state, self.cpu.variant);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }
}

fn checksum(image: &[u8]) -> String {
    format!("{:x}", Sha256::digest(image))
}

// Simple run-length encoding for memory compression
fn compress_memory(memory: &[u8]) -> Vec<u8> {
    let mut compressed = Vec::new();
    let mut i = 0;

    while i < memory.len() {
        let current_byte = memory[i];
        let mut count = 1;

        while i + count < memory.len() && memory[i + count] == current_byte && count < 255 {
            count += 1;
        }

        if count > 3 || current_byte == 0 {
            compressed.extend_from_slice(&[RLE_MARKER, count as u8, current_byte]);
        } else {
            for _ in 0..count {
                if current_byte == RLE_MARKER {
                    compressed.extend_from_slice(&[RLE_MARKER, 0x00]);
                } else {
                    compressed.push(current_byte);
                }
            }
        }

        i += count;
    }

    compressed
}

fn decompress_memory(compressed: &[u8]) -> Result<Vec<u8>, SnapshotError> {
    let mut decompressed = Vec::with_capacity(MEMORY_SIZE);
    let mut i = 0;

    while i < compressed.len() {
        if compressed[i] != RLE_MARKER {
            decompressed.push(compressed[i]);
            i += 1;
            continue;
        }

        match compressed.get(i + 1).copied() {
            None => return Err(SnapshotError::Compression("truncated RLE marker".to_string())),
            Some(0x00) => {
                decompressed.push(RLE_MARKER);
                i += 2;
            }
            Some(count) => {
                let value = *compressed
                    .get(i + 2)
                    .ok_or_else(|| SnapshotError::Compression("truncated RLE run".to_string()))?;
                decompressed.extend(std::iter::repeat(value).take(count as usize));
                i += 3;
            }
        }

        if decompressed.len() > MEMORY_SIZE {
            break;
        }
    }

    if decompressed.len() != MEMORY_SIZE {
        return Err(SnapshotError::Compression(format!(
            "image is {} bytes, expected {}",
            decompressed.len(),
            MEMORY_SIZE
        )));
    }

    Ok(decompressed)
}
