use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{EmulatorConfig, ProgramImage, Variant};
use crate::cpu::{Instruction, RunState, CPU};
use crate::error::{ExecutionError, SnapshotError};
use crate::memory::Memory;
use crate::metrics::{self, Timer};
use crate::snapshots::MachineSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuState {
    pub variant: Variant,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub pc: u16,
    pub sp: u8,
    pub status: u8,
    pub cycles: u64,
    pub state: RunState,
    pub halted: bool,
    pub last_instruction: Option<Instruction>,
}

/// Why `execute_steps` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    StepLimit,
    /// STP or WAI parked the CPU.
    Halted,
    /// `halt_on_invalid` is set and an invalid opcode was hit.
    InvalidOpcode { opcode: u8, address: u16 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub steps_executed: u64,
    pub cycles: u64,
    pub invalid_opcodes: u64,
    pub halted: bool,
    pub stop_reason: StopReason,
    pub final_state: CpuState,
}

/// A CPU wired to its own 64 KiB of memory.
#[derive(Debug)]
pub struct Emulator {
    pub id: String,
    pub cpu: CPU,
    pub memory: Memory,
    config: EmulatorConfig,
    instructions: u64,
    invalid_opcodes: u64,
}

impl Emulator {
    pub fn new(config: EmulatorConfig) -> Self {
        if config.record_metrics {
            if let Err(e) = metrics::init_metrics() {
                log::warn!("metrics registration failed: {}", e);
            }
        }

        Self {
            id: Uuid::new_v4().to_string(),
            cpu: CPU::new(config.variant),
            memory: Memory::new(),
            config,
            instructions: 0,
            invalid_opcodes: 0,
        }
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn instructions_executed(&self) -> u64 {
        self.instructions
    }

    pub fn invalid_opcodes(&self) -> u64 {
        self.invalid_opcodes
    }

    pub fn state(&self) -> CpuState {
        CpuState {
            variant: self.cpu.variant(),
            a: self.cpu.get_register_a(),
            x: self.cpu.get_register_x(),
            y: self.cpu.get_register_y(),
            pc: self.cpu.get_pc(),
            sp: self.cpu.get_sp(),
            status: self.cpu.get_status(),
            cycles: self.cpu.get_cycles(),
            state: self.cpu.state,
            halted: self.cpu.is_halted(),
            last_instruction: self.cpu.last_instruction(),
        }
    }

    pub fn reset(&mut self) {
        self.cpu.reset(&self.memory);
        self.instructions = 0;
        self.invalid_opcodes = 0;
        if self.config.record_metrics {
            metrics::record_emulator_reset(&self.id);
        }
    }

    /// One instruction. Invalid opcodes are counted and passed through.
    pub fn step(&mut self) -> Result<u32, ExecutionError> {
        let timer = Timer::new();
        let result = self.cpu.step(&mut self.memory);

        match &result {
            Ok(cycles) => {
                self.instructions += 1;
                if self.config.record_metrics {
                    if let Some(instruction) = self.cpu.last_instruction() {
                        metrics::record_instruction(
                            instruction.opcode_byte,
                            instruction.opcode,
                            *cycles,
                            timer.elapsed(),
                        );
                    }
                }
            }
            Err(ExecutionError::InvalidOpcode { opcode, .. }) => {
                self.instructions += 1;
                self.invalid_opcodes += 1;
                if self.config.record_metrics {
                    metrics::record_invalid_opcode(*opcode, self.cpu.variant().name());
                }
            }
            Err(ExecutionError::Halted { .. }) => {}
        }

        result
    }

    pub fn execute_steps(&mut self, steps: u64) -> ExecutionResult {
        let start_cycles = self.cpu.get_cycles();
        let start_invalid = self.invalid_opcodes;
        let mut executed = 0;
        let mut stop_reason = StopReason::StepLimit;

        for _ in 0..steps {
            match self.step() {
                Ok(_) => executed += 1,
                Err(ExecutionError::InvalidOpcode { opcode, address, .. }) => {
                    executed += 1;
                    if self.config.halt_on_invalid {
                        stop_reason = StopReason::InvalidOpcode { opcode, address };
                        break;
                    }
                }
                Err(ExecutionError::Halted { .. }) => break,
            }
        }

        if self.cpu.is_halted() && stop_reason == StopReason::StepLimit {
            stop_reason = StopReason::Halted;
        }

        ExecutionResult {
            steps_executed: executed,
            cycles: self.cpu.get_cycles() - start_cycles,
            invalid_opcodes: self.invalid_opcodes - start_invalid,
            halted: self.cpu.is_halted(),
            stop_reason,
            final_state: self.state(),
        }
    }

    /// Runs until the CPU halts or `max_steps` instructions have executed.
    pub fn run(&mut self) -> ExecutionResult {
        self.execute_steps(self.config.max_steps)
    }

    pub fn load_program(&mut self, address: u16, data: &[u8]) {
        self.memory.load_program(address, data);
        if self.config.record_metrics {
            metrics::record_program_load(&self.id);
        }
    }

    /// Loads `image` and, when it carries a reset vector, installs the
    /// vector and resets so the next step executes the image.
    pub fn load_image(&mut self, image: &ProgramImage) {
        self.load_program(image.load_address, &image.bytes);
        if let Some(vector) = image.reset_vector {
            self.memory.set_reset_vector(vector);
            self.reset();
        }
    }

    /// `length` bytes from `address`, wrapping past $FFFF.
    pub fn read_memory(&self, address: u16, length: u16) -> Vec<u8> {
        (0..length).map(|i| self.memory.read(address.wrapping_add(i))).collect()
    }

    pub fn write_memory(&mut self, address: u16, value: u8) {
        self.memory.write(address, value);
    }

    pub fn snapshot(&self, name: impl Into<String>) -> MachineSnapshot {
        let snapshot = MachineSnapshot::capture(name, &self.cpu, &self.memory, self.instructions);
        if self.config.record_metrics {
            metrics::record_snapshot("capture");
        }
        snapshot
    }

    /// Replaces the machine with `snapshot`, variant included. The machine
    /// is untouched when the snapshot fails verification. Snapshots carry
    /// no invalid-opcode history, so that counter restarts at zero.
    pub fn restore(&mut self, snapshot: &MachineSnapshot) -> Result<(), SnapshotError> {
        snapshot.restore(&mut self.cpu, &mut self.memory)?;
        self.config.variant = snapshot.cpu.variant;
        self.instructions = snapshot.instruction_count;
        self.invalid_opcodes = 0;
        if self.config.record_metrics {
            metrics::record_snapshot("restore");
        }
        Ok(())
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new(EmulatorConfig::default())
    }
}
