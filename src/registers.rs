use serde::{Deserialize, Serialize};

// Status register flags
pub const CARRY_FLAG: u8 = 0x01;
pub const ZERO_FLAG: u8 = 0x02;
pub const INTERRUPT_DISABLE: u8 = 0x04;
pub const DECIMAL_MODE: u8 = 0x08;
pub const BREAK_COMMAND: u8 = 0x10;
pub const UNUSED_FLAG: u8 = 0x20;
pub const OVERFLOW_FLAG: u8 = 0x40;
pub const NEGATIVE_FLAG: u8 = 0x80;

/// Status byte immediately after reset: I, B and the unused bit set.
pub const RESET_STATUS: u8 = INTERRUPT_DISABLE | BREAK_COMMAND | UNUSED_FLAG;

/// Programmer-visible register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Registers {
    pub pc: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub status: u8,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            pc: 0,
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFF,
            status: RESET_STATUS,
        }
    }

    pub fn set_flag(&mut self, flag: u8, value: bool) {
        if value {
            self.status |= flag;
        } else {
            self.status &= !flag;
        }
    }

    pub fn get_flag(&self, flag: u8) -> bool {
        (self.status & flag) != 0
    }

    pub fn update_zero_negative(&mut self, value: u8) {
        self.set_flag(ZERO_FLAG, value == 0);
        self.set_flag(NEGATIVE_FLAG, (value & 0x80) != 0);
    }

    /// Carry as 0 or 1, for ADC/SBC/ROL/ROR.
    pub fn carry(&self) -> u8 {
        self.status & CARRY_FLAG
    }

    /// The byte PHP and BRK push: B and the unused bit always read as 1
    /// on the stack, whatever the live register holds.
    pub fn status_for_push(&self) -> u8 {
        self.status | BREAK_COMMAND | UNUSED_FLAG
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
