use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Chip variant selecting the decode table and the few behavioral
/// differences between the original NMOS part and the CMOS redesign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Variant {
    /// MOS 6502: JMP ($xxFF) page-wrap bug, NMOS decimal-mode flags.
    #[default]
    #[serde(rename = "nmos6502")]
    Nmos6502,
    /// WDC 65C02: extra opcodes and addressing modes, bug fixes.
    #[serde(rename = "cmos65c02")]
    Cmos65C02,
}

impl Variant {
    pub fn is_cmos(&self) -> bool {
        matches!(self, Variant::Cmos65C02)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Nmos6502 => "nmos6502",
            Variant::Cmos65C02 => "cmos65c02",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    pub variant: Variant,
    /// Record every step in the global Prometheus registry.
    pub record_metrics: bool,
    /// Stop `execute_steps`/`run` at the first invalid opcode instead of
    /// treating it as a one-byte no-op.
    pub halt_on_invalid: bool,
    /// Upper bound on instructions executed by a single `run` call.
    pub max_steps: u64,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Nmos6502,
            record_metrics: false,
            halt_on_invalid: false,
            max_steps: 1_000_000,
        }
    }
}

impl EmulatorConfig {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str(text)?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        Ok(text)
    }
}

/// A program image plus the reset vector that should point at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramImage {
    pub load_address: u16,
    pub bytes: Vec<u8>,
    /// When set, written to $FFFC/$FFFD after the bytes are loaded.
    pub reset_vector: Option<u16>,
}

impl ProgramImage {
    /// Image that starts executing at its own load address.
    pub fn at(load_address: u16, bytes: Vec<u8>) -> Self {
        Self {
            load_address,
            bytes,
            reset_vector: Some(load_address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EmulatorConfig::default();
        assert_eq!(config.variant, Variant::Nmos6502);
        assert!(!config.record_metrics);
        assert!(!config.halt_on_invalid);
        assert_eq!(config.max_steps, 1_000_000);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = EmulatorConfig::from_json(r#"{"variant": "cmos65c02", "max_steps": 10}"#).unwrap();
        assert_eq!(config.variant, Variant::Cmos65C02);
        assert_eq!(config.max_steps, 10);
        assert!(!config.record_metrics);
    }

    #[test]
    fn test_config_json_round_trip() {
        let mut config = EmulatorConfig::new(Variant::Cmos65C02);
        config.halt_on_invalid = true;
        let text = config.to_json().unwrap();
        assert_eq!(EmulatorConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_bad_variant_is_rejected() {
        assert!(EmulatorConfig::from_json(r#"{"variant": "2a03"}"#).is_err());
    }

    #[test]
    fn test_program_image_at() {
        let image = ProgramImage::at(0x8000, vec![0xEA]);
        assert_eq!(image.reset_vector, Some(0x8000));
    }
}
