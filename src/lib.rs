//! # MOS 6502 / WDC 65C02 CPU Emulator
//!
//! A functional emulator core for the MOS 6502 8-bit microprocessor and
//! its CMOS successor, the WDC 65C02. It reproduces register state, flag
//! semantics, effective-address computation and per-instruction cycle
//! counts closely enough that programs written for the real chips run
//! with the same results.
//!
//! ## Features
//!
//! - Complete documented instruction set for both variants, decoded through
//!   a 256-entry table per variant
//! - Page-crossing and taken-branch cycle penalties
//! - Binary and decimal (BCD) arithmetic with each variant's flag behavior
//! - Historic NMOS quirks such as the JMP ($xxFF) page-wrap bug
//! - 65C02 additions: BRA, STZ, TRB/TSB, PHX/PHY/PLX/PLY, (zp) addressing,
//!   BBR/BBS/RMB/SMB, STP and WAI
//! - Host wrapper with JSON snapshots and Prometheus metrics
//!
//! ## Example
//!
//! ```rust
//! use mos65xx::{Bus, Memory, Variant, CPU};
//!
//! let mut memory = Memory::new();
//!
//! // LDA #$42; STA $10
//! memory.load_program(0x8000, &[0xA9, 0x42, 0x85, 0x10]);
//! memory.set_reset_vector(0x8000);
//!
//! let mut cpu = CPU::new(Variant::Nmos6502);
//! cpu.reset(&memory);
//!
//! assert_eq!(cpu.step(&mut memory), Ok(2));
//! assert_eq!(cpu.step(&mut memory), Ok(3));
//! assert_eq!(cpu.get_register_a(), 0x42);
//! assert_eq!(Bus::read(&memory, 0x10), 0x42);
//! ```

pub mod addressing;
pub mod config;
pub mod cpu;
pub mod emulator;
pub mod error;
mod instructions;
pub mod memory;
pub mod metrics;
pub mod opcodes;
pub mod registers;
pub mod snapshots;

pub use addressing::AddressingMode;
pub use config::{EmulatorConfig, ProgramImage, Variant};
pub use cpu::{Instruction, RunState, CPU};
pub use emulator::{CpuState, Emulator, ExecutionResult, StopReason};
pub use error::{ConfigError, ExecutionError, SnapshotError};
pub use memory::{Bus, Memory};
pub use opcodes::{Opcode, OpcodeEntry};
pub use snapshots::MachineSnapshot;
