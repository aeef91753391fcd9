use lazy_static::lazy_static;
use prometheus::core::Collector;
use prometheus::{Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::{Duration, Instant};

use crate::opcodes::Opcode;

lazy_static! {
    /// Registry every emulator metric is registered with
    pub static ref REGISTRY: Registry = Registry::new();

    /// Counter for total CPU instructions executed by opcode
    pub static ref CPU_INSTRUCTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("cpu_instructions_total", "Total number of CPU instructions executed by opcode"),
        &["opcode", "instruction"]
    ).expect("Failed to create CPU instructions counter");

    /// Counter for CPU cycles executed
    pub static ref CPU_CYCLES_TOTAL: Counter = Counter::new(
        "cpu_cycles_total", "Total number of CPU cycles executed"
    ).expect("Failed to create CPU cycles counter");

    /// Histogram for host time spent per instruction
    pub static ref INSTRUCTION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("instruction_duration_seconds", "Time spent executing instructions")
            .buckets(vec![0.000001, 0.000005, 0.00001, 0.00005, 0.0001, 0.0005, 0.001]),
        &["instruction"]
    ).expect("Failed to create instruction duration histogram");

    /// Counter for undocumented opcodes hit, by variant
    pub static ref INVALID_OPCODES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("invalid_opcodes_total", "Total number of invalid opcodes executed as NOP"),
        &["opcode", "variant"]
    ).expect("Failed to create invalid opcodes counter");

    /// Counter for emulator resets
    pub static ref EMULATOR_RESETS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("emulator_resets_total", "Total number of emulator resets"),
        &["emulator_id"]
    ).expect("Failed to create emulator resets counter");

    /// Counter for program loads
    pub static ref PROGRAM_LOADS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("program_loads_total", "Total number of programs loaded"),
        &["emulator_id"]
    ).expect("Failed to create program loads counter");

    /// Counter for snapshots taken and restored
    pub static ref SNAPSHOTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("snapshots_total", "Total number of snapshot operations"),
        &["operation"]
    ).expect("Failed to create snapshots counter");
}

/// Registers every metric with `REGISTRY`. Safe to call more than once.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    let collectors: Vec<Box<dyn Collector>> = vec![
        Box::new(CPU_INSTRUCTIONS_TOTAL.clone()),
        Box::new(CPU_CYCLES_TOTAL.clone()),
        Box::new(INSTRUCTION_DURATION.clone()),
        Box::new(INVALID_OPCODES_TOTAL.clone()),
        Box::new(EMULATOR_RESETS_TOTAL.clone()),
        Box::new(PROGRAM_LOADS_TOTAL.clone()),
        Box::new(SNAPSHOTS_TOTAL.clone()),
    ];

    for collector in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Record a CPU instruction execution
pub fn record_instruction(opcode_byte: u8, opcode: Opcode, cycles: u32, duration: Duration) {
    let name = instruction_name(opcode);
    CPU_INSTRUCTIONS_TOTAL
        .with_label_values(&[&format!("0x{:02X}", opcode_byte), name])
        .inc();

    CPU_CYCLES_TOTAL.inc_by(cycles as f64);

    INSTRUCTION_DURATION
        .with_label_values(&[name])
        .observe(duration.as_secs_f64());
}

pub fn record_invalid_opcode(opcode_byte: u8, variant: &str) {
    INVALID_OPCODES_TOTAL
        .with_label_values(&[&format!("0x{:02X}", opcode_byte), variant])
        .inc();
}

/// Record an emulator reset
pub fn record_emulator_reset(emulator_id: &str) {
    EMULATOR_RESETS_TOTAL
        .with_label_values(&[emulator_id])
        .inc();
}

/// Record a program load
pub fn record_program_load(emulator_id: &str) {
    PROGRAM_LOADS_TOTAL
        .with_label_values(&[emulator_id])
        .inc();
}

/// `operation` is "capture" or "restore"
pub fn record_snapshot(operation: &str) {
    SNAPSHOTS_TOTAL
        .with_label_values(&[operation])
        .inc();
}

/// Renders the registry in the Prometheus text exposition format.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Helper struct for timing operations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Mnemonic used as the `instruction` label.
pub fn instruction_name(opcode: Opcode) -> &'static str {
    use Opcode::*;
    match opcode {
        ADC => "ADC", AND => "AND", ASL => "ASL", BCC => "BCC", BCS => "BCS", BEQ => "BEQ",
        BIT => "BIT", BMI => "BMI", BNE => "BNE", BPL => "BPL", BRK => "BRK", BVC => "BVC",
        BVS => "BVS", CLC => "CLC", CLD => "CLD", CLI => "CLI", CLV => "CLV", CMP => "CMP",
        CPX => "CPX", CPY => "CPY", DEC => "DEC", DEX => "DEX", DEY => "DEY", EOR => "EOR",
        INC => "INC", INX => "INX", INY => "INY", JMP => "JMP", JSR => "JSR", LDA => "LDA",
        LDX => "LDX", LDY => "LDY", LSR => "LSR", NOP => "NOP", ORA => "ORA", PHA => "PHA",
        PHP => "PHP", PLA => "PLA", PLP => "PLP", ROL => "ROL", ROR => "ROR", RTI => "RTI",
        RTS => "RTS", SBC => "SBC", SEC => "SEC", SED => "SED", SEI => "SEI", STA => "STA",
        STX => "STX", STY => "STY", TAX => "TAX", TAY => "TAY", TSX => "TSX", TXA => "TXA",
        TXS => "TXS", TYA => "TYA",

        BRA => "BRA", PHX => "PHX", PHY => "PHY", PLX => "PLX", PLY => "PLY", STP => "STP",
        STZ => "STZ", TRB => "TRB", TSB => "TSB", WAI => "WAI",

        BBR0 => "BBR0", BBR1 => "BBR1", BBR2 => "BBR2", BBR3 => "BBR3",
        BBR4 => "BBR4", BBR5 => "BBR5", BBR6 => "BBR6", BBR7 => "BBR7",
        BBS0 => "BBS0", BBS1 => "BBS1", BBS2 => "BBS2", BBS3 => "BBS3",
        BBS4 => "BBS4", BBS5 => "BBS5", BBS6 => "BBS6", BBS7 => "BBS7",
        RMB0 => "RMB0", RMB1 => "RMB1", RMB2 => "RMB2", RMB3 => "RMB3",
        RMB4 => "RMB4", RMB5 => "RMB5", RMB6 => "RMB6", RMB7 => "RMB7",
        SMB0 => "SMB0", SMB1 => "SMB1", SMB2 => "SMB2", SMB3 => "SMB3",
        SMB4 => "SMB4", SMB5 => "SMB5", SMB6 => "SMB6", SMB7 => "SMB7",

        Invalid => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_metrics_is_idempotent() {
        assert!(init_metrics().is_ok());
        assert!(init_metrics().is_ok());
    }

    #[test]
    fn test_record_and_gather() {
        init_metrics().unwrap();
        record_instruction(0xA9, Opcode::LDA, 2, Duration::from_nanos(50));
        record_invalid_opcode(0x02, "nmos6502");
        record_snapshot("capture");

        let text = gather_metrics().unwrap();
        assert!(text.contains("cpu_instructions_total"));
        assert!(text.contains("instruction=\"LDA\""));
        assert!(text.contains("opcode=\"0xA9\""));
        assert!(text.contains("invalid_opcodes_total"));
        assert!(text.contains("snapshots_total"));
    }

    #[test]
    fn test_cycles_counter_accumulates() {
        let before = CPU_CYCLES_TOTAL.get();
        record_instruction(0xEA, Opcode::NOP, 2, Duration::from_nanos(10));
        assert!(CPU_CYCLES_TOTAL.get() >= before + 2.0);
    }

    #[test]
    fn test_instruction_names() {
        assert_eq!(instruction_name(Opcode::LDA), "LDA");
        assert_eq!(instruction_name(Opcode::BBS7), "BBS7");
        assert_eq!(instruction_name(Opcode::Invalid), "UNKNOWN");
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new();
        assert!(timer.elapsed() < Duration::from_secs(60));
    }
}
