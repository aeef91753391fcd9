use crate::addressing::Operand;
use crate::cpu::CPU;
use crate::memory::Bus;
use crate::registers::*;

impl CPU {
    pub(super) fn asl<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand) {
        self.read_modify_write(bus, operand, |regs, value| {
            regs.set_flag(CARRY_FLAG, value & 0x80 != 0);
            value << 1
        });
    }

    pub(super) fn lsr<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand) {
        self.read_modify_write(bus, operand, |regs, value| {
            regs.set_flag(CARRY_FLAG, value & 0x01 != 0);
            value >> 1
        });
    }

    pub(super) fn rol<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand) {
        self.read_modify_write(bus, operand, |regs, value| {
            let carry_in = regs.carry();
            regs.set_flag(CARRY_FLAG, value & 0x80 != 0);
            (value << 1) | carry_in
        });
    }

    pub(super) fn ror<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand) {
        self.read_modify_write(bus, operand, |regs, value| {
            let carry_in = regs.carry();
            regs.set_flag(CARRY_FLAG, value & 0x01 != 0);
            (value >> 1) | (carry_in << 7)
        });
    }
}
