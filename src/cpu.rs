use serde::{Deserialize, Serialize};

use crate::addressing::{self, AddressingMode};
use crate::config::Variant;
use crate::error::ExecutionError;
use crate::instructions;
use crate::memory::{Bus, RESET_VECTOR, STACK_BASE};
use crate::opcodes::{self, Opcode};
use crate::registers::{Registers, RESET_STATUS};

/// Whether the CPU will fetch on the next `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RunState {
    #[default]
    Running,
    /// Parked by WAI. Only reset resumes, since interrupt lines are not modelled.
    Waiting,
    /// Parked by STP until reset.
    Stopped,
}

/// The most recently decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Address the opcode byte was fetched from.
    pub address: u16,
    pub opcode_byte: u8,
    pub opcode: Opcode,
    pub mode: AddressingMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CPU {
    pub registers: Registers,
    /// Total cycles since the last reset.
    pub cycles: u64,
    pub state: RunState,
    variant: Variant,
    last_instruction: Option<Instruction>,
}

impl CPU {
    pub fn new(variant: Variant) -> Self {
        CPU {
            registers: Registers::new(),
            cycles: 0,
            state: RunState::Running,
            variant,
            last_instruction: None,
        }
    }

    /// Puts the CPU in its post-reset state and loads PC from $FFFC/$FFFD.
    pub fn reset<B: Bus + ?Sized>(&mut self, bus: &B) {
        self.registers = Registers {
            pc: bus.read_u16(RESET_VECTOR),
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFF,
            status: RESET_STATUS,
        };
        self.cycles = 0;
        self.state = RunState::Running;
        self.last_instruction = None;
        log::debug!("{} reset, PC=${:04X}", self.variant.name(), self.registers.pc);
    }

    /// Executes one instruction and returns the cycles it took.
    ///
    /// An undocumented opcode is executed as a one-byte, one-cycle no-op and
    /// then reported as `ExecutionError::InvalidOpcode`; the CPU is left ready
    /// for the next step. A CPU parked by STP or WAI returns
    /// `ExecutionError::Halted` without touching any state.
    pub fn step<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<u32, ExecutionError> {
        if self.state != RunState::Running {
            return Err(ExecutionError::Halted {
                state: self.state,
                pc: self.registers.pc,
            });
        }

        let address = self.registers.pc;
        let opcode_byte = bus.read(address);
        self.registers.pc = address.wrapping_add(1);

        let entry = opcodes::decode(opcode_byte, self.variant);
        self.last_instruction = Some(Instruction {
            address,
            opcode_byte,
            opcode: entry.opcode,
            mode: entry.mode,
        });

        let resolved = addressing::resolve(entry.mode, &mut self.registers, &*bus, self.variant);
        let extra = instructions::execute(self, bus, entry.opcode, resolved);

        let mut cycles = entry.cycles as u32 + extra;
        if entry.page_penalty && resolved.page_crossed {
            cycles += 1;
        }
        self.cycles += cycles as u64;

        if !entry.is_valid() {
            log::warn!("invalid opcode ${:02X} at ${:04X}, treated as NOP", opcode_byte, address);
            return Err(ExecutionError::InvalidOpcode {
                opcode: opcode_byte,
                address,
                cycles,
            });
        }

        Ok(cycles)
    }

    /// Steps until at least `cycle_budget` cycles have elapsed. Returns the
    /// cycles actually consumed, which may overshoot by part of an instruction.
    pub fn run_for_cycles<B: Bus + ?Sized>(&mut self, bus: &mut B, cycle_budget: u64) -> Result<u64, ExecutionError> {
        let start_cycles = self.cycles;
        let target_cycles = start_cycles.saturating_add(cycle_budget);

        while self.cycles < target_cycles {
            self.step(bus)?;
        }

        Ok(self.cycles - start_cycles)
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last_instruction
    }

    /// Overwrites the whole CPU state, as when loading a snapshot.
    pub(crate) fn restore_state(&mut self, registers: Registers, cycles: u64, state: RunState, variant: Variant) {
        self.registers = registers;
        self.cycles = cycles;
        self.state = state;
        self.variant = variant;
        self.last_instruction = None;
    }

    // Getters
    pub fn get_register_a(&self) -> u8 { self.registers.a }
    pub fn get_register_x(&self) -> u8 { self.registers.x }
    pub fn get_register_y(&self) -> u8 { self.registers.y }
    pub fn get_pc(&self) -> u16 { self.registers.pc }
    pub fn get_sp(&self) -> u8 { self.registers.sp }
    pub fn get_status(&self) -> u8 { self.registers.status }
    pub fn get_cycles(&self) -> u64 { self.cycles }
    pub fn is_halted(&self) -> bool { self.state != RunState::Running }

    pub fn set_flag(&mut self, flag: u8, value: bool) {
        self.registers.set_flag(flag, value);
    }

    pub fn get_flag(&self, flag: u8) -> bool {
        self.registers.get_flag(flag)
    }

    // Stack lives at $0100-$01FF; SP wraps silently in both directions.
    pub(crate) fn push<B: Bus + ?Sized>(&mut self, bus: &mut B, value: u8) {
        bus.write(STACK_BASE | self.registers.sp as u16, value);
        self.registers.sp = self.registers.sp.wrapping_sub(1);
    }

    pub(crate) fn pull<B: Bus + ?Sized>(&mut self, bus: &B) -> u8 {
        self.registers.sp = self.registers.sp.wrapping_add(1);
        bus.read(STACK_BASE | self.registers.sp as u16)
    }

    pub(crate) fn push_u16<B: Bus + ?Sized>(&mut self, bus: &mut B, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, (value & 0xFF) as u8);
    }

    pub(crate) fn pull_u16<B: Bus + ?Sized>(&mut self, bus: &B) -> u16 {
        let low = self.pull(bus) as u16;
        let high = self.pull(bus) as u16;
        (high << 8) | low
    }
}

impl Default for CPU {
    fn default() -> Self {
        Self::new(Variant::Nmos6502)
    }
}
