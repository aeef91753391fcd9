//! Opcode decode tables.
//!
//! Each variant has its own 256-entry table, built once from per-byte
//! `match` arms. Bytes with no documented instruction decode to
//! `Opcode::Invalid`.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::addressing::AddressingMode;
use crate::config::Variant;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    ADC, AND, ASL, BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRK, BVC, BVS, CLC,
    CLD, CLI, CLV, CMP, CPX, CPY, DEC, DEX, DEY, EOR, INC, INX, INY, JMP,
    JSR, LDA, LDX, LDY, LSR, NOP, ORA, PHA, PHP, PLA, PLP, ROL, ROR, RTI,
    RTS, SBC, SEC, SED, SEI, STA, STX, STY, TAX, TAY, TSX, TXA, TXS, TYA,

    // 65C02
    BRA, PHX, PHY, PLX, PLY, STP, STZ, TRB, TSB, WAI,
    BBR0, BBR1, BBR2, BBR3, BBR4, BBR5, BBR6, BBR7,
    BBS0, BBS1, BBS2, BBS3, BBS4, BBS5, BBS6, BBS7,
    RMB0, RMB1, RMB2, RMB3, RMB4, RMB5, RMB6, RMB7,
    SMB0, SMB1, SMB2, SMB3, SMB4, SMB5, SMB6, SMB7,

    /// No documented instruction at this byte.
    Invalid,
}

impl Opcode {
    /// Bit number tested or modified by BBRn/BBSn/RMBn/SMBn.
    pub fn bit_index(&self) -> Option<u8> {
        use Opcode::*;
        match self {
            BBR0 | BBS0 | RMB0 | SMB0 => Some(0),
            BBR1 | BBS1 | RMB1 | SMB1 => Some(1),
            BBR2 | BBS2 | RMB2 | SMB2 => Some(2),
            BBR3 | BBS3 | RMB3 | SMB3 => Some(3),
            BBR4 | BBS4 | RMB4 | SMB4 => Some(4),
            BBR5 | BBS5 | RMB5 | SMB5 => Some(5),
            BBR6 | BBS6 | RMB6 | SMB6 => Some(6),
            BBR7 | BBS7 | RMB7 | SMB7 => Some(7),
            _ => None,
        }
    }

    /// Instructions that only read their operand and pay one extra cycle
    /// when indexing crosses a page.
    fn reads_operand(&self) -> bool {
        use Opcode::*;
        matches!(self, ADC | AND | BIT | CMP | EOR | LDA | LDX | LDY | ORA | SBC)
    }

    fn shifts(&self) -> bool {
        matches!(self, Opcode::ASL | Opcode::LSR | Opcode::ROL | Opcode::ROR)
    }
}

/// One decode table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpcodeEntry {
    pub opcode: Opcode,
    pub mode: AddressingMode,
    /// Cycle cost before page-cross and branch penalties.
    pub cycles: u8,
    /// Charge one more cycle when the resolver reports a page cross.
    pub page_penalty: bool,
}

impl OpcodeEntry {
    pub const INVALID: OpcodeEntry = OpcodeEntry {
        opcode: Opcode::Invalid,
        mode: AddressingMode::Implied,
        cycles: 1,
        page_penalty: false,
    };

    pub fn is_valid(&self) -> bool {
        self.opcode != Opcode::Invalid
    }

    /// Total instruction length including the opcode byte.
    pub fn size_bytes(&self) -> u16 {
        1 + self.mode.operand_len()
    }
}

type Slot = Option<(Opcode, AddressingMode, u8)>;

fn nmos_slot(byte: u8) -> Slot {
    use AddressingMode::*;
    use Opcode::*;
    let slot = match byte {
        0x00 => (BRK, Stack, 7),
        0x01 => (ORA, ZeroPageIndexedIndirect, 6),
        0x05 => (ORA, ZeroPage, 3),
        0x06 => (ASL, ZeroPage, 5),
        0x08 => (PHP, Stack, 3),
        0x09 => (ORA, Immediate, 2),
        0x0A => (ASL, Accumulator, 2),
        0x0D => (ORA, Absolute, 4),
        0x0E => (ASL, Absolute, 6),

        0x10 => (BPL, Relative, 2),
        0x11 => (ORA, ZeroPageIndirectIndexedY, 5),
        0x15 => (ORA, ZeroPageX, 4),
        0x16 => (ASL, ZeroPageX, 6),
        0x18 => (CLC, Implied, 2),
        0x19 => (ORA, AbsoluteY, 4),
        0x1D => (ORA, AbsoluteX, 4),
        0x1E => (ASL, AbsoluteX, 7),

        0x20 => (JSR, Absolute, 6),
        0x21 => (AND, ZeroPageIndexedIndirect, 6),
        0x24 => (BIT, ZeroPage, 3),
        0x25 => (AND, ZeroPage, 3),
        0x26 => (ROL, ZeroPage, 5),
        0x28 => (PLP, Stack, 4),
        0x29 => (AND, Immediate, 2),
        0x2A => (ROL, Accumulator, 2),
        0x2C => (BIT, Absolute, 4),
        0x2D => (AND, Absolute, 4),
        0x2E => (ROL, Absolute, 6),

        0x30 => (BMI, Relative, 2),
        0x31 => (AND, ZeroPageIndirectIndexedY, 5),
        0x35 => (AND, ZeroPageX, 4),
        0x36 => (ROL, ZeroPageX, 6),
        0x38 => (SEC, Implied, 2),
        0x39 => (AND, AbsoluteY, 4),
        0x3D => (AND, AbsoluteX, 4),
        0x3E => (ROL, AbsoluteX, 7),

        0x40 => (RTI, Stack, 6),
        0x41 => (EOR, ZeroPageIndexedIndirect, 6),
        0x45 => (EOR, ZeroPage, 3),
        0x46 => (LSR, ZeroPage, 5),
        0x48 => (PHA, Stack, 3),
        0x49 => (EOR, Immediate, 2),
        0x4A => (LSR, Accumulator, 2),
        0x4C => (JMP, Absolute, 3),
        0x4D => (EOR, Absolute, 4),
        0x4E => (LSR, Absolute, 6),

        0x50 => (BVC, Relative, 2),
        0x51 => (EOR, ZeroPageIndirectIndexedY, 5),
        0x55 => (EOR, ZeroPageX, 4),
        0x56 => (LSR, ZeroPageX, 6),
        0x58 => (CLI, Implied, 2),
        0x59 => (EOR, AbsoluteY, 4),
        0x5D => (EOR, AbsoluteX, 4),
        0x5E => (LSR, AbsoluteX, 7),

        0x60 => (RTS, Stack, 6),
        0x61 => (ADC, ZeroPageIndexedIndirect, 6),
        0x65 => (ADC, ZeroPage, 3),
        0x66 => (ROR, ZeroPage, 5),
        0x68 => (PLA, Stack, 4),
        0x69 => (ADC, Immediate, 2),
        0x6A => (ROR, Accumulator, 2),
        0x6C => (JMP, AbsoluteIndirect, 5),
        0x6D => (ADC, Absolute, 4),
        0x6E => (ROR, Absolute, 6),

        0x70 => (BVS, Relative, 2),
        0x71 => (ADC, ZeroPageIndirectIndexedY, 5),
        0x75 => (ADC, ZeroPageX, 4),
        0x76 => (ROR, ZeroPageX, 6),
        0x78 => (SEI, Implied, 2),
        0x79 => (ADC, AbsoluteY, 4),
        0x7D => (ADC, AbsoluteX, 4),
        0x7E => (ROR, AbsoluteX, 7),

        0x81 => (STA, ZeroPageIndexedIndirect, 6),
        0x84 => (STY, ZeroPage, 3),
        0x85 => (STA, ZeroPage, 3),
        0x86 => (STX, ZeroPage, 3),
        0x88 => (DEY, Implied, 2),
        0x8A => (TXA, Implied, 2),
        0x8C => (STY, Absolute, 4),
        0x8D => (STA, Absolute, 4),
        0x8E => (STX, Absolute, 4),

        0x90 => (BCC, Relative, 2),
        0x91 => (STA, ZeroPageIndirectIndexedY, 6),
        0x94 => (STY, ZeroPageX, 4),
        0x95 => (STA, ZeroPageX, 4),
        0x96 => (STX, ZeroPageY, 4),
        0x98 => (TYA, Implied, 2),
        0x99 => (STA, AbsoluteY, 5),
        0x9A => (TXS, Implied, 2),
        0x9D => (STA, AbsoluteX, 5),

        0xA0 => (LDY, Immediate, 2),
        0xA1 => (LDA, ZeroPageIndexedIndirect, 6),
        0xA2 => (LDX, Immediate, 2),
        0xA4 => (LDY, ZeroPage, 3),
        0xA5 => (LDA, ZeroPage, 3),
        0xA6 => (LDX, ZeroPage, 3),
        0xA8 => (TAY, Implied, 2),
        0xA9 => (LDA, Immediate, 2),
        0xAA => (TAX, Implied, 2),
        0xAC => (LDY, Absolute, 4),
        0xAD => (LDA, Absolute, 4),
        0xAE => (LDX, Absolute, 4),

        0xB0 => (BCS, Relative, 2),
        0xB1 => (LDA, ZeroPageIndirectIndexedY, 5),
        0xB4 => (LDY, ZeroPageX, 4),
        0xB5 => (LDA, ZeroPageX, 4),
        0xB6 => (LDX, ZeroPageY, 4),
        0xB8 => (CLV, Implied, 2),
        0xB9 => (LDA, AbsoluteY, 4),
        0xBA => (TSX, Implied, 2),
        0xBC => (LDY, AbsoluteX, 4),
        0xBD => (LDA, AbsoluteX, 4),
        0xBE => (LDX, AbsoluteY, 4),

        0xC0 => (CPY, Immediate, 2),
        0xC1 => (CMP, ZeroPageIndexedIndirect, 6),
        0xC4 => (CPY, ZeroPage, 3),
        0xC5 => (CMP, ZeroPage, 3),
        0xC6 => (DEC, ZeroPage, 5),
        0xC8 => (INY, Implied, 2),
        0xC9 => (CMP, Immediate, 2),
        0xCA => (DEX, Implied, 2),
        0xCC => (CPY, Absolute, 4),
        0xCD => (CMP, Absolute, 4),
        0xCE => (DEC, Absolute, 6),

        0xD0 => (BNE, Relative, 2),
        0xD1 => (CMP, ZeroPageIndirectIndexedY, 5),
        0xD5 => (CMP, ZeroPageX, 4),
        0xD6 => (DEC, ZeroPageX, 6),
        0xD8 => (CLD, Implied, 2),
        0xD9 => (CMP, AbsoluteY, 4),
        0xDD => (CMP, AbsoluteX, 4),
        0xDE => (DEC, AbsoluteX, 7),

        0xE0 => (CPX, Immediate, 2),
        0xE1 => (SBC, ZeroPageIndexedIndirect, 6),
        0xE4 => (CPX, ZeroPage, 3),
        0xE5 => (SBC, ZeroPage, 3),
        0xE6 => (INC, ZeroPage, 5),
        0xE8 => (INX, Implied, 2),
        0xE9 => (SBC, Immediate, 2),
        0xEA => (NOP, Implied, 2),
        0xEC => (CPX, Absolute, 4),
        0xED => (SBC, Absolute, 4),
        0xEE => (INC, Absolute, 6),

        0xF0 => (BEQ, Relative, 2),
        0xF1 => (SBC, ZeroPageIndirectIndexedY, 5),
        0xF5 => (SBC, ZeroPageX, 4),
        0xF6 => (INC, ZeroPageX, 6),
        0xF8 => (SED, Implied, 2),
        0xF9 => (SBC, AbsoluteY, 4),
        0xFD => (SBC, AbsoluteX, 4),
        0xFE => (INC, AbsoluteX, 7),

        _ => return None,
    };
    Some(slot)
}

/// 65C02 slots that differ from, or are absent on, the NMOS part.
fn cmos_slot(byte: u8) -> Slot {
    use AddressingMode::*;
    use Opcode::*;
    let slot = match byte {
        0x04 => (TSB, ZeroPage, 5),
        0x0C => (TSB, Absolute, 6),
        0x12 => (ORA, ZeroPageIndirect, 5),
        0x14 => (TRB, ZeroPage, 5),
        0x1A => (INC, Accumulator, 2),
        0x1C => (TRB, Absolute, 6),
        0x1E => (ASL, AbsoluteX, 6),
        0x32 => (AND, ZeroPageIndirect, 5),
        0x34 => (BIT, ZeroPageX, 4),
        0x3A => (DEC, Accumulator, 2),
        0x3C => (BIT, AbsoluteX, 4),
        0x3E => (ROL, AbsoluteX, 6),
        0x52 => (EOR, ZeroPageIndirect, 5),
        0x5A => (PHY, Stack, 3),
        0x5E => (LSR, AbsoluteX, 6),
        0x64 => (STZ, ZeroPage, 3),
        0x6C => (JMP, AbsoluteIndirect, 6),
        0x72 => (ADC, ZeroPageIndirect, 5),
        0x74 => (STZ, ZeroPageX, 4),
        0x7A => (PLY, Stack, 4),
        0x7C => (JMP, AbsoluteIndexedIndirect, 6),
        0x7E => (ROR, AbsoluteX, 6),
        0x80 => (BRA, Relative, 2),
        0x89 => (BIT, Immediate, 2),
        0x92 => (STA, ZeroPageIndirect, 5),
        0x9C => (STZ, Absolute, 4),
        0x9E => (STZ, AbsoluteX, 5),
        0xB2 => (LDA, ZeroPageIndirect, 5),
        0xCB => (WAI, Implied, 3),
        0xD2 => (CMP, ZeroPageIndirect, 5),
        0xDA => (PHX, Stack, 3),
        0xDB => (STP, Implied, 3),
        0xF2 => (SBC, ZeroPageIndirect, 5),
        0xFA => (PLX, Stack, 4),

        0x07 => (RMB0, ZeroPage, 5),
        0x17 => (RMB1, ZeroPage, 5),
        0x27 => (RMB2, ZeroPage, 5),
        0x37 => (RMB3, ZeroPage, 5),
        0x47 => (RMB4, ZeroPage, 5),
        0x57 => (RMB5, ZeroPage, 5),
        0x67 => (RMB6, ZeroPage, 5),
        0x77 => (RMB7, ZeroPage, 5),
        0x87 => (SMB0, ZeroPage, 5),
        0x97 => (SMB1, ZeroPage, 5),
        0xA7 => (SMB2, ZeroPage, 5),
        0xB7 => (SMB3, ZeroPage, 5),
        0xC7 => (SMB4, ZeroPage, 5),
        0xD7 => (SMB5, ZeroPage, 5),
        0xE7 => (SMB6, ZeroPage, 5),
        0xF7 => (SMB7, ZeroPage, 5),

        0x0F => (BBR0, ZeroPageRelative, 5),
        0x1F => (BBR1, ZeroPageRelative, 5),
        0x2F => (BBR2, ZeroPageRelative, 5),
        0x3F => (BBR3, ZeroPageRelative, 5),
        0x4F => (BBR4, ZeroPageRelative, 5),
        0x5F => (BBR5, ZeroPageRelative, 5),
        0x6F => (BBR6, ZeroPageRelative, 5),
        0x7F => (BBR7, ZeroPageRelative, 5),
        0x8F => (BBS0, ZeroPageRelative, 5),
        0x9F => (BBS1, ZeroPageRelative, 5),
        0xAF => (BBS2, ZeroPageRelative, 5),
        0xBF => (BBS3, ZeroPageRelative, 5),
        0xCF => (BBS4, ZeroPageRelative, 5),
        0xDF => (BBS5, ZeroPageRelative, 5),
        0xEF => (BBS6, ZeroPageRelative, 5),
        0xFF => (BBS7, ZeroPageRelative, 5),

        _ => return nmos_slot(byte),
    };
    Some(slot)
}

fn page_penalty(opcode: Opcode, mode: AddressingMode, variant: Variant) -> bool {
    let indexed = matches!(
        mode,
        AddressingMode::AbsoluteX | AddressingMode::AbsoluteY | AddressingMode::ZeroPageIndirectIndexedY
    );
    indexed && (opcode.reads_operand() || (variant.is_cmos() && opcode.shifts()))
}

fn build_entry(byte: u8, variant: Variant) -> OpcodeEntry {
    let slot = match variant {
        Variant::Nmos6502 => nmos_slot(byte),
        Variant::Cmos65C02 => cmos_slot(byte),
    };
    match slot {
        Some((opcode, mode, cycles)) => OpcodeEntry {
            opcode,
            mode,
            cycles,
            page_penalty: page_penalty(opcode, mode, variant),
        },
        None => OpcodeEntry::INVALID,
    }
}

fn build_table(variant: Variant) -> [OpcodeEntry; 256] {
    let mut table = [OpcodeEntry::INVALID; 256];
    for (byte, entry) in table.iter_mut().enumerate() {
        *entry = build_entry(byte as u8, variant);
    }
    table
}

lazy_static! {
    /// NMOS 6502 decode table, indexed by opcode byte.
    pub static ref NMOS_TABLE: [OpcodeEntry; 256] = build_table(Variant::Nmos6502);

    /// WDC 65C02 decode table, indexed by opcode byte.
    pub static ref CMOS_TABLE: [OpcodeEntry; 256] = build_table(Variant::Cmos65C02);
}

pub fn table(variant: Variant) -> &'static [OpcodeEntry; 256] {
    match variant {
        Variant::Nmos6502 => &NMOS_TABLE,
        Variant::Cmos65C02 => &CMOS_TABLE,
    }
}

pub fn decode(byte: u8, variant: Variant) -> OpcodeEntry {
    table(variant)[byte as usize]
}
