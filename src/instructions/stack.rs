use crate::cpu::CPU;
use crate::memory::Bus;

impl CPU {
    pub(super) fn php<B: Bus + ?Sized>(&mut self, bus: &mut B) {
        let status = self.registers.status_for_push();
        self.push(bus, status);
    }

    /// Restores the pulled byte verbatim, B and the unused bit included.
    pub(super) fn plp<B: Bus + ?Sized>(&mut self, bus: &B) {
        self.registers.status = self.pull(bus);
    }

    pub(super) fn pla<B: Bus + ?Sized>(&mut self, bus: &B) {
        self.registers.a = self.pull(bus);
        self.registers.update_zero_negative(self.registers.a);
    }

    pub(super) fn plx<B: Bus + ?Sized>(&mut self, bus: &B) {
        self.registers.x = self.pull(bus);
        self.registers.update_zero_negative(self.registers.x);
    }

    pub(super) fn ply<B: Bus + ?Sized>(&mut self, bus: &B) {
        self.registers.y = self.pull(bus);
        self.registers.update_zero_negative(self.registers.y);
    }
}
