use crate::addressing::Operand;
use crate::cpu::CPU;
use crate::memory::Bus;

impl CPU {
    pub(super) fn lda<B: Bus + ?Sized>(&mut self, bus: &B, operand: Operand) {
        self.registers.a = self.read_operand(bus, operand);
        self.registers.update_zero_negative(self.registers.a);
    }

    pub(super) fn ldx<B: Bus + ?Sized>(&mut self, bus: &B, operand: Operand) {
        self.registers.x = self.read_operand(bus, operand);
        self.registers.update_zero_negative(self.registers.x);
    }

    pub(super) fn ldy<B: Bus + ?Sized>(&mut self, bus: &B, operand: Operand) {
        self.registers.y = self.read_operand(bus, operand);
        self.registers.update_zero_negative(self.registers.y);
    }

    // STA/STX/STY/STZ; stores never touch flags
    pub(super) fn store<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand, value: u8) {
        if let Operand::Address(address) = operand {
            bus.write(address, value);
        }
    }

    pub(super) fn tax(&mut self) {
        self.registers.x = self.registers.a;
        self.registers.update_zero_negative(self.registers.x);
    }

    pub(super) fn tay(&mut self) {
        self.registers.y = self.registers.a;
        self.registers.update_zero_negative(self.registers.y);
    }

    pub(super) fn txa(&mut self) {
        self.registers.a = self.registers.x;
        self.registers.update_zero_negative(self.registers.a);
    }

    pub(super) fn tya(&mut self) {
        self.registers.a = self.registers.y;
        self.registers.update_zero_negative(self.registers.a);
    }

    pub(super) fn tsx(&mut self) {
        self.registers.x = self.registers.sp;
        self.registers.update_zero_negative(self.registers.x);
    }

    pub(super) fn txs(&mut self) {
        self.registers.sp = self.registers.x;
    }
}
