//! Instruction semantics, one file per family.
//!
//! Each handler runs after `addressing::resolve` has consumed the operand
//! bytes. Handlers return the cycles they add on top of the base count:
//! taken branches and 65C02 decimal-mode arithmetic. The page-crossing
//! penalty for indexed reads is applied by the caller.

mod alu;
mod bits;
mod branches;
mod control;
mod inc_dec;
mod load_store;
mod shifts;
mod stack;

use crate::addressing::{Operand, Resolved};
use crate::cpu::CPU;
use crate::memory::Bus;
use crate::opcodes::Opcode;
use crate::registers::*;

pub(crate) fn execute<B: Bus + ?Sized>(cpu: &mut CPU, bus: &mut B, opcode: Opcode, resolved: Resolved) -> u32 {
    use Opcode::*;

    let operand = resolved.operand;
    let status = cpu.registers.status;

    match opcode {
        // Load/store
        LDA => cpu.lda(bus, operand),
        LDX => cpu.ldx(bus, operand),
        LDY => cpu.ldy(bus, operand),
        STA => cpu.store(bus, operand, cpu.registers.a),
        STX => cpu.store(bus, operand, cpu.registers.x),
        STY => cpu.store(bus, operand, cpu.registers.y),
        STZ => cpu.store(bus, operand, 0),

        // Transfers
        TAX => cpu.tax(),
        TAY => cpu.tay(),
        TXA => cpu.txa(),
        TYA => cpu.tya(),
        TSX => cpu.tsx(),
        TXS => cpu.txs(),

        // Arithmetic
        ADC => {
            let value = cpu.read_operand(bus, operand);
            return cpu.adc(value);
        }
        SBC => {
            let value = cpu.read_operand(bus, operand);
            return cpu.sbc(value);
        }
        CMP => cpu.compare(cpu.registers.a, cpu.read_operand(bus, operand)),
        CPX => cpu.compare(cpu.registers.x, cpu.read_operand(bus, operand)),
        CPY => cpu.compare(cpu.registers.y, cpu.read_operand(bus, operand)),

        // Logical
        AND => cpu.and(cpu.read_operand(bus, operand)),
        ORA => cpu.ora(cpu.read_operand(bus, operand)),
        EOR => cpu.eor(cpu.read_operand(bus, operand)),
        BIT => cpu.bit(bus, operand),
        TRB => cpu.trb(bus, operand),
        TSB => cpu.tsb(bus, operand),
        RMB0 | RMB1 | RMB2 | RMB3 | RMB4 | RMB5 | RMB6 | RMB7 => {
            cpu.rmb(bus, operand, opcode.bit_index().unwrap_or(0))
        }
        SMB0 | SMB1 | SMB2 | SMB3 | SMB4 | SMB5 | SMB6 | SMB7 => {
            cpu.smb(bus, operand, opcode.bit_index().unwrap_or(0))
        }

        // Shifts and rotates
        ASL => cpu.asl(bus, operand),
        LSR => cpu.lsr(bus, operand),
        ROL => cpu.rol(bus, operand),
        ROR => cpu.ror(bus, operand),

        // Increments and decrements
        INC => cpu.inc(bus, operand),
        DEC => cpu.dec(bus, operand),
        INX => cpu.inx(),
        INY => cpu.iny(),
        DEX => cpu.dex(),
        DEY => cpu.dey(),

        // Branches
        BCC => return cpu.branch(status & CARRY_FLAG == 0, resolved),
        BCS => return cpu.branch(status & CARRY_FLAG != 0, resolved),
        BNE => return cpu.branch(status & ZERO_FLAG == 0, resolved),
        BEQ => return cpu.branch(status & ZERO_FLAG != 0, resolved),
        BPL => return cpu.branch(status & NEGATIVE_FLAG == 0, resolved),
        BMI => return cpu.branch(status & NEGATIVE_FLAG != 0, resolved),
        BVC => return cpu.branch(status & OVERFLOW_FLAG == 0, resolved),
        BVS => return cpu.branch(status & OVERFLOW_FLAG != 0, resolved),
        BRA => return cpu.branch(true, resolved),
        BBR0 | BBR1 | BBR2 | BBR3 | BBR4 | BBR5 | BBR6 | BBR7 => {
            return cpu.branch_on_bit(bus, opcode.bit_index().unwrap_or(0), false, resolved)
        }
        BBS0 | BBS1 | BBS2 | BBS3 | BBS4 | BBS5 | BBS6 | BBS7 => {
            return cpu.branch_on_bit(bus, opcode.bit_index().unwrap_or(0), true, resolved)
        }

        // Stack
        PHA => cpu.push(bus, cpu.registers.a),
        PHX => cpu.push(bus, cpu.registers.x),
        PHY => cpu.push(bus, cpu.registers.y),
        PHP => cpu.php(bus),
        PLA => cpu.pla(bus),
        PLX => cpu.plx(bus),
        PLY => cpu.ply(bus),
        PLP => cpu.plp(bus),

        // Control flow
        JMP => cpu.jmp(operand),
        JSR => cpu.jsr(bus, operand),
        RTS => cpu.rts(bus),
        RTI => cpu.rti(bus),
        BRK => cpu.brk(bus),
        STP => cpu.stp(),
        WAI => cpu.wai(),

        // Flags
        CLC => cpu.set_flag(CARRY_FLAG, false),
        SEC => cpu.set_flag(CARRY_FLAG, true),
        CLI => cpu.set_flag(INTERRUPT_DISABLE, false),
        SEI => cpu.set_flag(INTERRUPT_DISABLE, true),
        CLD => cpu.set_flag(DECIMAL_MODE, false),
        SED => cpu.set_flag(DECIMAL_MODE, true),
        CLV => cpu.set_flag(OVERFLOW_FLAG, false),

        NOP | Invalid => {}
    }

    0
}

impl CPU {
    /// The byte an instruction reads: an immediate, the accumulator or memory.
    fn read_operand<B: Bus + ?Sized>(&self, bus: &B, operand: Operand) -> u8 {
        match operand {
            Operand::Immediate(value) => value,
            Operand::Accumulator => self.registers.a,
            Operand::Address(address) => bus.read(address),
            Operand::BitBranch { zero_page, .. } => bus.read(zero_page as u16),
            Operand::Implied => 0,
        }
    }

    /// Writes back the result of a read-modify-write instruction.
    fn write_operand<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand, value: u8) {
        match operand {
            Operand::Accumulator => self.registers.a = value,
            Operand::Address(address) => bus.write(address, value),
            Operand::BitBranch { zero_page, .. } => bus.write(zero_page as u16, value),
            Operand::Immediate(_) | Operand::Implied => {}
        }
    }

    /// Applies `op` to the operand, stores the result, and sets N and Z from it.
    fn read_modify_write<B, F>(&mut self, bus: &mut B, operand: Operand, op: F)
    where
        B: Bus + ?Sized,
        F: FnOnce(&mut Registers, u8) -> u8,
    {
        let value = self.read_operand(bus, operand);
        let result = op(&mut self.registers, value);
        self.write_operand(bus, operand, result);
        self.registers.update_zero_negative(result);
    }
}
