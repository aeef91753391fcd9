use crate::addressing::Operand;
use crate::cpu::CPU;
use crate::memory::Bus;

impl CPU {
    // Memory, or the accumulator on the 65C02
    pub(super) fn inc<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand) {
        self.read_modify_write(bus, operand, |_, value| value.wrapping_add(1));
    }

    pub(super) fn dec<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand) {
        self.read_modify_write(bus, operand, |_, value| value.wrapping_sub(1));
    }

    pub(super) fn inx(&mut self) {
        self.registers.x = self.registers.x.wrapping_add(1);
        self.registers.update_zero_negative(self.registers.x);
    }

    pub(super) fn iny(&mut self) {
        self.registers.y = self.registers.y.wrapping_add(1);
        self.registers.update_zero_negative(self.registers.y);
    }

    pub(super) fn dex(&mut self) {
        self.registers.x = self.registers.x.wrapping_sub(1);
        self.registers.update_zero_negative(self.registers.x);
    }

    pub(super) fn dey(&mut self) {
        self.registers.y = self.registers.y.wrapping_sub(1);
        self.registers.update_zero_negative(self.registers.y);
    }
}
