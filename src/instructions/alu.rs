//! ADC, SBC, compares and the bitwise accumulator operations.
//!
//! Decimal mode follows the documented behavior of each part. On the NMOS
//! 6502, N and Z after a BCD add come from intermediate results and V from
//! the half-corrected sum; SBC sets every flag from the binary difference.
//! The 65C02 derives N and Z from the corrected result and spends one
//! extra cycle.

use crate::cpu::CPU;
use crate::registers::*;

impl CPU {
    pub(super) fn adc(&mut self, value: u8) -> u32 {
        if !self.registers.get_flag(DECIMAL_MODE) {
            add_binary(&mut self.registers, value);
            return 0;
        }
        let cmos = self.variant().is_cmos();
        add_decimal(&mut self.registers, value, cmos);
        if cmos { 1 } else { 0 }
    }

    pub(super) fn sbc(&mut self, value: u8) -> u32 {
        if !self.registers.get_flag(DECIMAL_MODE) {
            // A - M - !C is A + !M + C
            add_binary(&mut self.registers, !value);
            return 0;
        }
        let cmos = self.variant().is_cmos();
        subtract_decimal(&mut self.registers, value, cmos);
        if cmos { 1 } else { 0 }
    }

    pub(super) fn compare(&mut self, register: u8, value: u8) {
        let result = register.wrapping_sub(value);
        self.registers.set_flag(CARRY_FLAG, register >= value);
        self.registers.update_zero_negative(result);
    }

    pub(super) fn and(&mut self, value: u8) {
        self.registers.a &= value;
        self.registers.update_zero_negative(self.registers.a);
    }

    pub(super) fn ora(&mut self, value: u8) {
        self.registers.a |= value;
        self.registers.update_zero_negative(self.registers.a);
    }

    pub(super) fn eor(&mut self, value: u8) {
        self.registers.a ^= value;
        self.registers.update_zero_negative(self.registers.a);
    }
}

fn add_binary(regs: &mut Registers, value: u8) {
    let a = regs.a;
    let sum = a as u16 + value as u16 + regs.carry() as u16;
    let result = sum as u8;

    regs.set_flag(CARRY_FLAG, sum > 0xFF);
    regs.set_flag(OVERFLOW_FLAG, (a ^ result) & (value ^ result) & 0x80 != 0);
    regs.a = result;
    regs.update_zero_negative(result);
}

fn add_decimal(regs: &mut Registers, value: u8, cmos: bool) {
    let a = regs.a;
    let carry = regs.carry() as u16;
    let binary = (a as u16 + value as u16 + carry) as u8;

    let mut low = (a & 0x0F) as u16 + (value & 0x0F) as u16 + carry;
    if low >= 0x0A {
        low = ((low + 0x06) & 0x0F) + 0x10;
    }
    let mut sum = (a & 0xF0) as u16 + (value & 0xF0) as u16 + low;
    // Sum before the high-nibble correction
    let partial = sum as u8;
    if sum >= 0xA0 {
        sum += 0x60;
    }
    let result = sum as u8;

    regs.set_flag(CARRY_FLAG, sum > 0xFF);
    regs.set_flag(OVERFLOW_FLAG, (a ^ partial) & (value ^ partial) & 0x80 != 0);
    regs.a = result;

    if cmos {
        regs.update_zero_negative(result);
    } else {
        regs.set_flag(ZERO_FLAG, binary == 0);
        regs.set_flag(NEGATIVE_FLAG, partial & 0x80 != 0);
    }
}

fn subtract_decimal(regs: &mut Registers, value: u8, cmos: bool) {
    let a = regs.a;
    let carry = regs.carry() as i16;

    // C and V come from the binary difference on both parts; on NMOS so do N and Z.
    add_binary(regs, !value);

    let mut low = (a & 0x0F) as i16 - (value & 0x0F) as i16 + carry - 1;
    let result = if cmos {
        let mut difference = a as i16 - value as i16 + carry - 1;
        if difference < 0 {
            difference -= 0x60;
        }
        if low < 0 {
            difference -= 0x06;
        }
        difference as u8
    } else {
        if low < 0 {
            low = ((low - 0x06) & 0x0F) - 0x10;
        }
        let mut difference = (a & 0xF0) as i16 - (value & 0xF0) as i16 + low;
        if difference < 0 {
            difference -= 0x60;
        }
        difference as u8
    };

    regs.a = result;
    if cmos {
        regs.update_zero_negative(result);
    }
}
