//! Whole-table checks on both decode tables.

use mos65xx::addressing::AddressingMode;
use mos65xx::opcodes::{decode, table, OpcodeEntry};
use mos65xx::{Memory, Opcode, Variant, CPU};

#[test]
fn test_documented_opcode_counts() {
    let nmos = table(Variant::Nmos6502).iter().filter(|e| e.is_valid()).count();
    let cmos = table(Variant::Cmos65C02).iter().filter(|e| e.is_valid()).count();
    assert_eq!(nmos, 151);
    assert_eq!(cmos, 212);
}

#[test]
fn test_cmos_is_superset_of_nmos() {
    for byte in 0..=255u8 {
        let nmos = decode(byte, Variant::Nmos6502);
        if !nmos.is_valid() {
            continue;
        }
        let cmos = decode(byte, Variant::Cmos65C02);
        assert_eq!(cmos.opcode, nmos.opcode, "opcode ${:02X}", byte);
        assert_eq!(cmos.mode, nmos.mode, "opcode ${:02X}", byte);
    }
}

#[test]
fn test_invalid_entries_are_one_byte_one_cycle() {
    for variant in [Variant::Nmos6502, Variant::Cmos65C02] {
        for entry in table(variant).iter().filter(|e| !e.is_valid()) {
            assert_eq!(entry.opcode, Opcode::Invalid);
            assert_eq!(entry.mode, AddressingMode::Implied);
            assert_eq!(entry.cycles, 1);
            assert_eq!(entry.size_bytes(), 1);
            assert!(!entry.page_penalty);
        }
    }
}

#[test]
fn test_cycle_counts_in_range() {
    for variant in [Variant::Nmos6502, Variant::Cmos65C02] {
        for (byte, entry) in table(variant).iter().enumerate() {
            if entry.is_valid() {
                assert!((2..=7).contains(&entry.cycles), "{:?} ${:02X}", variant, byte);
            }
        }
    }
}

#[test]
fn test_page_penalty_only_on_indexed_modes() {
    for variant in [Variant::Nmos6502, Variant::Cmos65C02] {
        for entry in table(variant).iter().filter(|e| e.page_penalty) {
            assert!(matches!(
                entry.mode,
                AddressingMode::AbsoluteX | AddressingMode::AbsoluteY | AddressingMode::ZeroPageIndirectIndexedY
            ));
            assert!(!matches!(entry.opcode, Opcode::STA | Opcode::STZ | Opcode::INC | Opcode::DEC));
        }
    }
}

#[test]
fn test_size_matches_mode() {
    let cases = [
        (0xA9, 2), // LDA #
        (0xAD, 3), // LDA abs
        (0xEA, 1), // NOP
        (0x0A, 1), // ASL A
        (0x6C, 3), // JMP (abs)
        (0xD0, 2), // BNE
    ];
    for (byte, size) in cases {
        assert_eq!(decode(byte, Variant::Nmos6502).size_bytes(), size, "${:02X}", byte);
    }
    // BBR0 zp,rel
    assert_eq!(decode(0x0F, Variant::Cmos65C02).size_bytes(), 3);
}

#[test]
fn test_every_byte_executes_without_panic() {
    for variant in [Variant::Nmos6502, Variant::Cmos65C02] {
        for byte in 0..=255u8 {
            let mut memory = Memory::new();
            memory.load_program(0x0400, &[byte, 0x80, 0x12]);
            memory.set_reset_vector(0x0400);
            let mut cpu = CPU::new(variant);
            cpu.reset(&memory);
            cpu.registers.x = 0xFF;
            cpu.registers.y = 0xFF;

            let entry = decode(byte, variant);
            match cpu.step(&mut memory) {
                Ok(cycles) => {
                    assert!(entry.is_valid());
                    assert!(cycles >= entry.cycles as u32);
                    assert_eq!(cpu.get_cycles(), cycles as u64);
                }
                Err(_) => {
                    assert!(!entry.is_valid());
                    assert_eq!(cpu.get_pc(), 0x0401);
                    assert_eq!(cpu.get_cycles(), 1);
                }
            }
        }
    }
}

type Expected = Option<(Opcode, AddressingMode, u8, bool)>;

/// Reference decode table assembled from the 6502 opcode matrix layout
/// (instruction groups at fixed column offsets) rather than byte by byte.
struct Reference {
    slots: [Expected; 256],
}

impl Reference {
    fn set(&mut self, byte: u8, opcode: Opcode, mode: AddressingMode, cycles: u8, penalty: bool) {
        self.slots[byte as usize] = Some((opcode, mode, cycles, penalty));
    }

    /// ORA/AND/EOR/ADC/LDA/CMP/SBC: eight modes at fixed offsets from `(zp,x)`.
    fn read_group(&mut self, opcode: Opcode, base: u8) {
        use AddressingMode::*;
        self.set(base, opcode, ZeroPageIndexedIndirect, 6, false);
        self.set(base + 0x04, opcode, ZeroPage, 3, false);
        self.set(base + 0x08, opcode, Immediate, 2, false);
        self.set(base + 0x0C, opcode, Absolute, 4, false);
        self.set(base + 0x10, opcode, ZeroPageIndirectIndexedY, 5, true);
        self.set(base + 0x14, opcode, ZeroPageX, 4, false);
        self.set(base + 0x18, opcode, AbsoluteY, 4, true);
        self.set(base + 0x1C, opcode, AbsoluteX, 4, true);
    }

    /// ASL/ROL/LSR/ROR, offsets from the zero-page form.
    fn shift_group(&mut self, opcode: Opcode, base: u8) {
        use AddressingMode::*;
        self.set(base, opcode, ZeroPage, 5, false);
        self.set(base + 0x04, opcode, Accumulator, 2, false);
        self.set(base + 0x08, opcode, Absolute, 6, false);
        self.set(base + 0x10, opcode, ZeroPageX, 6, false);
        self.set(base + 0x18, opcode, AbsoluteX, 7, false);
    }

    /// INC/DEC, offsets from the zero-page form.
    fn step_group(&mut self, opcode: Opcode, base: u8) {
        use AddressingMode::*;
        self.set(base, opcode, ZeroPage, 5, false);
        self.set(base + 0x08, opcode, Absolute, 6, false);
        self.set(base + 0x10, opcode, ZeroPageX, 6, false);
        self.set(base + 0x18, opcode, AbsoluteX, 7, false);
    }

    fn nmos() -> Self {
        use AddressingMode::*;
        use Opcode::*;
        let mut r = Reference { slots: [None; 256] };

        for (opcode, base) in [(ORA, 0x01), (AND, 0x21), (EOR, 0x41), (ADC, 0x61), (LDA, 0xA1), (CMP, 0xC1), (SBC, 0xE1)] {
            r.read_group(opcode, base);
        }
        for (opcode, base) in [(ASL, 0x06), (ROL, 0x26), (LSR, 0x46), (ROR, 0x66)] {
            r.shift_group(opcode, base);
        }
        r.step_group(DEC, 0xC6);
        r.step_group(INC, 0xE6);

        r.set(0x81, STA, ZeroPageIndexedIndirect, 6, false);
        r.set(0x85, STA, ZeroPage, 3, false);
        r.set(0x8D, STA, Absolute, 4, false);
        r.set(0x91, STA, ZeroPageIndirectIndexedY, 6, false);
        r.set(0x95, STA, ZeroPageX, 4, false);
        r.set(0x99, STA, AbsoluteY, 5, false);
        r.set(0x9D, STA, AbsoluteX, 5, false);
        r.set(0x86, STX, ZeroPage, 3, false);
        r.set(0x8E, STX, Absolute, 4, false);
        r.set(0x96, STX, ZeroPageY, 4, false);
        r.set(0x84, STY, ZeroPage, 3, false);
        r.set(0x8C, STY, Absolute, 4, false);
        r.set(0x94, STY, ZeroPageX, 4, false);

        r.set(0xA2, LDX, Immediate, 2, false);
        r.set(0xA6, LDX, ZeroPage, 3, false);
        r.set(0xAE, LDX, Absolute, 4, false);
        r.set(0xB6, LDX, ZeroPageY, 4, false);
        r.set(0xBE, LDX, AbsoluteY, 4, true);
        r.set(0xA0, LDY, Immediate, 2, false);
        r.set(0xA4, LDY, ZeroPage, 3, false);
        r.set(0xAC, LDY, Absolute, 4, false);
        r.set(0xB4, LDY, ZeroPageX, 4, false);
        r.set(0xBC, LDY, AbsoluteX, 4, true);

        r.set(0xE0, CPX, Immediate, 2, false);
        r.set(0xE4, CPX, ZeroPage, 3, false);
        r.set(0xEC, CPX, Absolute, 4, false);
        r.set(0xC0, CPY, Immediate, 2, false);
        r.set(0xC4, CPY, ZeroPage, 3, false);
        r.set(0xCC, CPY, Absolute, 4, false);
        r.set(0x24, BIT, ZeroPage, 3, false);
        r.set(0x2C, BIT, Absolute, 4, false);

        for (opcode, byte) in [(BPL, 0x10), (BMI, 0x30), (BVC, 0x50), (BVS, 0x70), (BCC, 0x90), (BCS, 0xB0), (BNE, 0xD0), (BEQ, 0xF0)] {
            r.set(byte, opcode, Relative, 2, false);
        }

        r.set(0x4C, JMP, Absolute, 3, false);
        r.set(0x6C, JMP, AbsoluteIndirect, 5, false);
        r.set(0x20, JSR, Absolute, 6, false);
        r.set(0x60, RTS, Stack, 6, false);
        r.set(0x40, RTI, Stack, 6, false);
        r.set(0x00, BRK, Stack, 7, false);

        r.set(0x48, PHA, Stack, 3, false);
        r.set(0x08, PHP, Stack, 3, false);
        r.set(0x68, PLA, Stack, 4, false);
        r.set(0x28, PLP, Stack, 4, false);

        for (opcode, byte) in [
            (CLC, 0x18), (SEC, 0x38), (CLI, 0x58), (SEI, 0x78), (CLV, 0xB8), (CLD, 0xD8), (SED, 0xF8),
            (TAX, 0xAA), (TAY, 0xA8), (TXA, 0x8A), (TYA, 0x98), (TSX, 0xBA), (TXS, 0x9A),
            (INX, 0xE8), (INY, 0xC8), (DEX, 0xCA), (DEY, 0x88), (NOP, 0xEA),
        ] {
            r.set(byte, opcode, Implied, 2, false);
        }
        r
    }

    fn cmos() -> Self {
        use AddressingMode::*;
        use Opcode::*;
        let mut r = Reference::nmos();

        // (zp) sits one byte past each (zp),y form
        for (opcode, byte) in [(ORA, 0x12), (AND, 0x32), (EOR, 0x52), (ADC, 0x72), (STA, 0x92), (LDA, 0xB2), (CMP, 0xD2), (SBC, 0xF2)] {
            r.set(byte, opcode, ZeroPageIndirect, 5, false);
        }
        for (opcode, byte) in [(ASL, 0x1E), (ROL, 0x3E), (LSR, 0x5E), (ROR, 0x7E)] {
            r.set(byte, opcode, AbsoluteX, 6, true);
        }
        r.set(0x6C, JMP, AbsoluteIndirect, 6, false);
        r.set(0x7C, JMP, AbsoluteIndexedIndirect, 6, false);

        r.set(0x89, BIT, Immediate, 2, false);
        r.set(0x34, BIT, ZeroPageX, 4, false);
        r.set(0x3C, BIT, AbsoluteX, 4, true);
        r.set(0x04, TSB, ZeroPage, 5, false);
        r.set(0x0C, TSB, Absolute, 6, false);
        r.set(0x14, TRB, ZeroPage, 5, false);
        r.set(0x1C, TRB, Absolute, 6, false);
        r.set(0x1A, INC, Accumulator, 2, false);
        r.set(0x3A, DEC, Accumulator, 2, false);

        r.set(0x64, STZ, ZeroPage, 3, false);
        r.set(0x74, STZ, ZeroPageX, 4, false);
        r.set(0x9C, STZ, Absolute, 4, false);
        r.set(0x9E, STZ, AbsoluteX, 5, false);

        r.set(0xDA, PHX, Stack, 3, false);
        r.set(0x5A, PHY, Stack, 3, false);
        r.set(0xFA, PLX, Stack, 4, false);
        r.set(0x7A, PLY, Stack, 4, false);

        r.set(0x80, BRA, Relative, 2, false);
        r.set(0xCB, WAI, Implied, 3, false);
        r.set(0xDB, STP, Implied, 3, false);

        let rmb = [RMB0, RMB1, RMB2, RMB3, RMB4, RMB5, RMB6, RMB7];
        let smb = [SMB0, SMB1, SMB2, SMB3, SMB4, SMB5, SMB6, SMB7];
        let bbr = [BBR0, BBR1, BBR2, BBR3, BBR4, BBR5, BBR6, BBR7];
        let bbs = [BBS0, BBS1, BBS2, BBS3, BBS4, BBS5, BBS6, BBS7];
        for bit in 0..8u8 {
            let row = bit << 4;
            r.set(0x07 | row, rmb[bit as usize], ZeroPage, 5, false);
            r.set(0x87 | row, smb[bit as usize], ZeroPage, 5, false);
            r.set(0x0F | row, bbr[bit as usize], ZeroPageRelative, 5, false);
            r.set(0x8F | row, bbs[bit as usize], ZeroPageRelative, 5, false);
        }
        r
    }
}

fn assert_matches_reference(variant: Variant, reference: Reference) {
    let mut mismatches = Vec::new();
    for byte in 0..=255u8 {
        let entry = decode(byte, variant);
        let actual = if entry.is_valid() {
            Some((entry.opcode, entry.mode, entry.cycles, entry.page_penalty))
        } else {
            assert_eq!(entry, OpcodeEntry::INVALID, "${:02X}", byte);
            None
        };
        let expected = reference.slots[byte as usize];
        if actual != expected {
            mismatches.push(format!("${:02X}: decoded {:?}, expected {:?}", byte, actual, expected));
        }
    }
    assert!(mismatches.is_empty(), "{:?} table differs:\n{}", variant, mismatches.join("\n"));
}

#[test]
fn test_reference_tables_have_documented_counts() {
    assert_eq!(Reference::nmos().slots.iter().flatten().count(), 151);
    assert_eq!(Reference::cmos().slots.iter().flatten().count(), 212);
}

#[test]
fn test_nmos_table_matches_reference() {
    assert_matches_reference(Variant::Nmos6502, Reference::nmos());
}

#[test]
fn test_cmos_table_matches_reference() {
    assert_matches_reference(Variant::Cmos65C02, Reference::cmos());
}
