use crate::addressing::{Operand, Resolved};
use crate::cpu::CPU;
use crate::memory::Bus;

// Taken branches cost one extra cycle, two if the target is on another page.
fn taken_cost(resolved: &Resolved) -> u32 {
    if resolved.page_crossed { 2 } else { 1 }
}

impl CPU {
    pub(super) fn branch(&mut self, condition: bool, resolved: Resolved) -> u32 {
        match resolved.operand {
            Operand::Address(target) if condition => {
                self.registers.pc = target;
                taken_cost(&resolved)
            }
            _ => 0,
        }
    }

    /// BBRn/BBSn: branch when bit `bit` of the zero-page byte equals `set`.
    pub(super) fn branch_on_bit<B: Bus + ?Sized>(&mut self, bus: &B, bit: u8, set: bool, resolved: Resolved) -> u32 {
        let Operand::BitBranch { zero_page, target } = resolved.operand else {
            return 0;
        };
        let bit_is_set = bus.read(zero_page as u16) & (1 << bit) != 0;
        if bit_is_set != set {
            return 0;
        }
        self.registers.pc = target;
        taken_cost(&resolved)
    }
}
