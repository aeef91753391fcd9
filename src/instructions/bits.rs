use crate::addressing::Operand;
use crate::cpu::CPU;
use crate::memory::Bus;
use crate::registers::*;

impl CPU {
    /// Z from A & M. Memory forms also copy bits 7 and 6 into N and V;
    /// the 65C02 immediate form touches only Z.
    pub(super) fn bit<B: Bus + ?Sized>(&mut self, bus: &B, operand: Operand) {
        let value = self.read_operand(bus, operand);
        self.registers.set_flag(ZERO_FLAG, self.registers.a & value == 0);
        if !matches!(operand, Operand::Immediate(_)) {
            self.registers.set_flag(NEGATIVE_FLAG, value & 0x80 != 0);
            self.registers.set_flag(OVERFLOW_FLAG, value & 0x40 != 0);
        }
    }

    pub(super) fn trb<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand) {
        let value = self.read_operand(bus, operand);
        self.registers.set_flag(ZERO_FLAG, self.registers.a & value == 0);
        self.write_operand(bus, operand, value & !self.registers.a);
    }

    pub(super) fn tsb<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand) {
        let value = self.read_operand(bus, operand);
        self.registers.set_flag(ZERO_FLAG, self.registers.a & value == 0);
        self.write_operand(bus, operand, value | self.registers.a);
    }

    pub(super) fn rmb<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand, bit: u8) {
        let value = self.read_operand(bus, operand);
        self.write_operand(bus, operand, value & !(1 << bit));
    }

    pub(super) fn smb<B: Bus + ?Sized>(&mut self, bus: &mut B, operand: Operand, bit: u8) {
        let value = self.read_operand(bus, operand);
        self.write_operand(bus, operand, value | (1 << bit));
    }
}

#[cfg(test)]
mod tests {
    use crate::instructions::test_support::{cmos, nmos};
    use crate::registers::*;

    #[test]
    fn test_bit_memory_copies_high_bits() {
        // LDA #$01; BIT $10
        let (mut cpu, mut memory) = nmos(&[0xA9, 0x01, 0x24, 0x10]);
        memory.write(0x0010, 0xC0);
        cpu.step(&mut memory).unwrap();
        assert_eq!(cpu.step(&mut memory), Ok(3));
        assert!(cpu.get_flag(ZERO_FLAG));
        assert!(cpu.get_flag(NEGATIVE_FLAG));
        assert!(cpu.get_flag(OVERFLOW_FLAG));
        assert_eq!(cpu.get_register_a(), 0x01);
    }

    #[test]
    fn test_bit_immediate_only_sets_zero() {
        // LDA #$FF (sets N); CLV; BIT #$40
        let (mut cpu, mut memory) = cmos(&[0xA9, 0xFF, 0xB8, 0x89, 0x40]);
        for _ in 0..3 {
            cpu.step(&mut memory).unwrap();
        }
        assert!(!cpu.get_flag(ZERO_FLAG));
        assert!(cpu.get_flag(NEGATIVE_FLAG));
        assert!(!cpu.get_flag(OVERFLOW_FLAG));
    }

    #[test]
    fn test_tsb_and_trb() {
        // LDA #$0F; TSB $20; TRB $21
        let (mut cpu, mut memory) = cmos(&[0xA9, 0x0F, 0x04, 0x20, 0x14, 0x21]);
        memory.write(0x0020, 0xF0);
        memory.write(0x0021, 0xFF);

        cpu.step(&mut memory).unwrap();
        assert_eq!(cpu.step(&mut memory), Ok(5));
        assert_eq!(memory.read(0x0020), 0xFF);
        assert!(cpu.get_flag(ZERO_FLAG));

        cpu.step(&mut memory).unwrap();
        assert_eq!(memory.read(0x0021), 0xF0);
        assert!(!cpu.get_flag(ZERO_FLAG));
        assert_eq!(cpu.get_register_a(), 0x0F);
    }

    #[test]
    fn test_rmb_smb() {
        // SMB3 $30; RMB7 $31
        let (mut cpu, mut memory) = cmos(&[0xB7, 0x30, 0x77, 0x31]);
        memory.write(0x0031, 0xFF);
        let status = cpu.get_status();

        assert_eq!(cpu.step(&mut memory), Ok(5));
        assert_eq!(memory.read(0x0030), 0x08);
        cpu.step(&mut memory).unwrap();
        assert_eq!(memory.read(0x0031), 0x7F);
        assert_eq!(cpu.get_status(), status);
    }
}
