use serde::{Deserialize, Serialize};

pub const MEMORY_SIZE: usize = 0x10000;

pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

pub const STACK_BASE: u16 = 0x0100;

/// Byte-addressable bus the CPU fetches from and writes to.
///
/// Accesses never fail: the 6502 has no bus-error signal, and every `u16`
/// is a valid address.
pub trait Bus {
    fn read(&self, address: u16) -> u8;

    fn write(&mut self, address: u16, value: u8);

    // Read a 16-bit value in little-endian format
    fn read_u16(&self, address: u16) -> u16 {
        let low = self.read(address) as u16;
        let high = self.read(address.wrapping_add(1)) as u16;
        (high << 8) | low
    }
}

/// Flat 64 KiB RAM, zeroed on creation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            data: vec![0; MEMORY_SIZE],
        }
    }

    // read/write/read_u16 mirror `Bus` so callers holding a `Memory` need not import the trait.
    pub fn read(&self, address: u16) -> u8 {
        self.data[address as usize]
    }

    pub fn write(&mut self, address: u16, value: u8) {
        self.data[address as usize] = value;
    }

    /// Copies `program` into memory starting at `base_address`.
    /// Bytes that run past $FFFF wrap around to $0000.
    pub fn load_program(&mut self, base_address: u16, program: &[u8]) {
        let mut address = base_address;
        for &byte in program {
            self.write(address, byte);
            address = address.wrapping_add(1);
        }
    }

    pub fn read_u16(&self, address: u16) -> u16 {
        Bus::read_u16(self, address)
    }

    // Write a 16-bit value in little-endian format
    pub fn write_u16(&mut self, address: u16, value: u16) {
        self.write(address, (value & 0xFF) as u8);
        self.write(address.wrapping_add(1), (value >> 8) as u8);
    }

    pub fn set_reset_vector(&mut self, target: u16) {
        self.write_u16(RESET_VECTOR, target);
    }

    /// The whole 64 KiB image, for snapshots.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Replaces the whole image. `image` must be exactly 64 KiB.
    pub(crate) fn copy_from(&mut self, image: &[u8]) {
        self.data.copy_from_slice(image);
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").field("size", &self.data.len()).finish()
    }
}

impl Bus for Memory {
    fn read(&self, address: u16) -> u8 {
        self.data[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.data[address as usize] = value;
    }
}
