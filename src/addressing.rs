//! Addressing modes and effective-address resolution.
//!
//! `resolve` is called with PC pointing just past the opcode byte. It
//! consumes the operand bytes, leaves PC on the next instruction, and
//! reports whether indexing moved the address onto another page.

use serde::{Deserialize, Serialize};

use crate::config::Variant;
use crate::memory::Bus;
use crate::registers::Registers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressingMode {
    /// `a`
    Absolute,
    /// `(a,x)`, 65C02 JMP only
    AbsoluteIndexedIndirect,
    /// `a,x`
    AbsoluteX,
    /// `a,y`
    AbsoluteY,
    /// `(a)`, JMP only
    AbsoluteIndirect,
    /// `A`
    Accumulator,
    /// `#`
    Immediate,
    /// `i`
    Implied,
    /// `r`
    Relative,
    /// `s`
    Stack,
    /// `zp`
    ZeroPage,
    /// `(zp,x)`
    ZeroPageIndexedIndirect,
    /// `zp,x`
    ZeroPageX,
    /// `zp,y`
    ZeroPageY,
    /// `(zp)`, 65C02
    ZeroPageIndirect,
    /// `(zp),y`
    ZeroPageIndirectIndexedY,
    /// `zp,r`, 65C02 BBRn/BBSn: a zero-page address then a branch offset
    ZeroPageRelative,
}

impl AddressingMode {
    /// Number of bytes following the opcode.
    pub fn operand_len(&self) -> u16 {
        match self {
            AddressingMode::Accumulator | AddressingMode::Implied | AddressingMode::Stack => 0,
            AddressingMode::Immediate
            | AddressingMode::Relative
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageIndexedIndirect
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::ZeroPageIndirect
            | AddressingMode::ZeroPageIndirectIndexedY => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteIndexedIndirect
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::AbsoluteIndirect
            | AddressingMode::ZeroPageRelative => 2,
        }
    }
}

/// What an instruction operates on once its mode has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Implied and stack modes.
    Implied,
    Accumulator,
    Immediate(u8),
    /// Effective address; for relative mode, the branch target.
    Address(u16),
    /// BBRn/BBSn: the zero-page byte to test and the branch target.
    BitBranch { zero_page: u8, target: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub operand: Operand,
    /// The effective address (or branch target) lies on a different page
    /// from the base it was computed from.
    pub page_crossed: bool,
}

impl Resolved {
    fn plain(operand: Operand) -> Self {
        Resolved { operand, page_crossed: false }
    }

    fn indexed(base: u16, address: u16) -> Self {
        Resolved {
            operand: Operand::Address(address),
            page_crossed: crosses_page(base, address),
        }
    }
}

pub fn crosses_page(from: u16, to: u16) -> bool {
    (from & 0xFF00) != (to & 0xFF00)
}

fn next_byte<B: Bus + ?Sized>(regs: &mut Registers, bus: &B) -> u8 {
    let value = bus.read(regs.pc);
    regs.pc = regs.pc.wrapping_add(1);
    value
}

fn next_word<B: Bus + ?Sized>(regs: &mut Registers, bus: &B) -> u16 {
    let low = next_byte(regs, bus) as u16;
    let high = next_byte(regs, bus) as u16;
    (high << 8) | low
}

/// Reads a pointer stored in zero page. The high byte comes from
/// `pointer + 1` wrapped within page zero, so $FF pairs with $00.
fn zero_page_word<B: Bus + ?Sized>(bus: &B, pointer: u8) -> u16 {
    let low = bus.read(pointer as u16) as u16;
    let high = bus.read(pointer.wrapping_add(1) as u16) as u16;
    (high << 8) | low
}

fn relative_target(pc: u16, offset: u8) -> u16 {
    pc.wrapping_add_signed(offset as i8 as i16)
}

/// Resolves `mode` against the bytes at PC, advancing PC past them.
pub fn resolve<B: Bus + ?Sized>(
    mode: AddressingMode,
    regs: &mut Registers,
    bus: &B,
    variant: Variant,
) -> Resolved {
    match mode {
        AddressingMode::Implied | AddressingMode::Stack => Resolved::plain(Operand::Implied),
        AddressingMode::Accumulator => Resolved::plain(Operand::Accumulator),
        AddressingMode::Immediate => Resolved::plain(Operand::Immediate(next_byte(regs, bus))),
        AddressingMode::ZeroPage => {
            let address = next_byte(regs, bus) as u16;
            Resolved::plain(Operand::Address(address))
        }
        AddressingMode::ZeroPageX => {
            let address = next_byte(regs, bus).wrapping_add(regs.x) as u16;
            Resolved::plain(Operand::Address(address))
        }
        AddressingMode::ZeroPageY => {
            let address = next_byte(regs, bus).wrapping_add(regs.y) as u16;
            Resolved::plain(Operand::Address(address))
        }
        AddressingMode::ZeroPageIndexedIndirect => {
            let pointer = next_byte(regs, bus).wrapping_add(regs.x);
            Resolved::plain(Operand::Address(zero_page_word(bus, pointer)))
        }
        AddressingMode::ZeroPageIndirect => {
            let pointer = next_byte(regs, bus);
            Resolved::plain(Operand::Address(zero_page_word(bus, pointer)))
        }
        AddressingMode::ZeroPageIndirectIndexedY => {
            let pointer = next_byte(regs, bus);
            let base = zero_page_word(bus, pointer);
            Resolved::indexed(base, base.wrapping_add(regs.y as u16))
        }
        AddressingMode::Absolute => Resolved::plain(Operand::Address(next_word(regs, bus))),
        AddressingMode::AbsoluteX => {
            let base = next_word(regs, bus);
            Resolved::indexed(base, base.wrapping_add(regs.x as u16))
        }
        AddressingMode::AbsoluteY => {
            let base = next_word(regs, bus);
            Resolved::indexed(base, base.wrapping_add(regs.y as u16))
        }
        AddressingMode::AbsoluteIndirect => {
            let pointer = next_word(regs, bus);
            let low = bus.read(pointer) as u16;
            let high_address = if variant.is_cmos() {
                pointer.wrapping_add(1)
            } else {
                // NMOS never carries into the pointer's high byte:
                // JMP ($30FF) takes its high byte from $3000.
                (pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF)
            };
            let high = bus.read(high_address) as u16;
            Resolved::plain(Operand::Address((high << 8) | low))
        }
        AddressingMode::AbsoluteIndexedIndirect => {
            let pointer = next_word(regs, bus).wrapping_add(regs.x as u16);
            Resolved::plain(Operand::Address(bus.read_u16(pointer)))
        }
        AddressingMode::Relative => {
            let offset = next_byte(regs, bus);
            let target = relative_target(regs.pc, offset);
            Resolved::indexed(regs.pc, target)
        }
        AddressingMode::ZeroPageRelative => {
            let zero_page = next_byte(regs, bus);
            let offset = next_byte(regs, bus);
            let target = relative_target(regs.pc, offset);
            Resolved {
                operand: Operand::BitBranch { zero_page, target },
                page_crossed: crosses_page(regs.pc, target),
            }
        }
    }
}
