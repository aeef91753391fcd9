use crate::addressing::Operand;
use crate::cpu::{RunState, CPU};
use crate::memory::{Bus, IRQ_VECTOR};
use crate::registers::*;

impl CPU {
    pub(super) fn jmp(&mut self, operand: Operand) {
        if let Operand::Address(target) = operand {
            self.registers.pc = target;
        }
    }

    /// Pushes the address of the JSR's last byte, high byte first.
    pub(super) fn jsr<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand) {
        if let Operand::Address(target) = operand {
            let return_address = self.registers.pc.wrapping_sub(1);
            self.push_u16(bus, return_address);
            self.registers.pc = target;
        }
    }

    pub(super) fn rts<B: Bus + ?Sized>(&mut self, bus: &B) {
        self.registers.pc = self.pull_u16(bus).wrapping_add(1);
    }

    pub(super) fn rti<B: Bus + ?Sized>(&mut self, bus: &B) {
        self.registers.status = self.pull(bus);
        self.registers.pc = self.pull_u16(bus);
    }

    /// Software interrupt. BRK is a two-byte instruction: the pushed return
    /// address skips the signature byte after the opcode.
    pub(super) fn brk<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        let return_address = self.registers.pc.wrapping_add(1);
        self.push_u16(bus, return_address);
        let status = self.registers.status_for_push();
        self.push(bus, status);

        self.registers.set_flag(INTERRUPT_DISABLE, true);
        if self.variant().is_cmos() {
            self.registers.set_flag(DECIMAL_MODE, false);
        }
        self.registers.pc = bus.read_u16(IRQ_VECTOR);
    }

    pub(super) fn stp(&mut self) {
        log::debug!("STP at ${:04X}", self.registers.pc.wrapping_sub(1));
        self.state = RunState::Stopped;
    }

    pub(super) fn wai(&mut self) {
        log::debug!("WAI at ${:04X}", self.registers.pc.wrapping_sub(1));
        self.state = RunState::Waiting;
    }
}
