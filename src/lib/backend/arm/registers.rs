use std::fmt::{Formatter, Error};

use registry::RBASE_ARM;

const CORE_BASE: i32 = RBASE_ARM;
const FLOAT_BASE: i32 = RBASE_ARM + 16;
const FPSR: i32 = RBASE_ARM + 32;
const FPCR: i32 = RBASE_ARM + 33;
const CPSR: i32 = RBASE_ARM + 34;
const SPSR: i32 = RBASE_ARM + 35;

/// First id past the ARM register space.
pub const MAXREG: i32 = RBASE_ARM + 36;

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum ArmRegister {
    Core(u8),   // R0-R15
    Float(u8),  // F0-F15
    FPSR,
    FPCR,
    CPSR,
    SPSR,
}

impl ArmRegister {
    pub const FP: ArmRegister = ArmRegister::Core(11);
    pub const IP: ArmRegister = ArmRegister::Core(12);
    pub const SP: ArmRegister = ArmRegister::Core(13);
    pub const LR: ArmRegister = ArmRegister::Core(14);
    pub const PC: ArmRegister = ArmRegister::Core(15);

    pub fn from_id(reg: i32) -> Option<ArmRegister> {
        match reg {
            r if CORE_BASE <= r && r < FLOAT_BASE => Some(ArmRegister::Core((r - CORE_BASE) as u8)),
            r if FLOAT_BASE <= r && r < FPSR => Some(ArmRegister::Float((r - FLOAT_BASE) as u8)),
            FPSR => Some(ArmRegister::FPSR),
            FPCR => Some(ArmRegister::FPCR),
            CPSR => Some(ArmRegister::CPSR),
            SPSR => Some(ArmRegister::SPSR),
            _ => None,
        }
    }

    pub fn id(&self) -> i32 {
        match *self {
            ArmRegister::Core(n) => CORE_BASE + (n & 15) as i32,
            ArmRegister::Float(n) => FLOAT_BASE + (n & 15) as i32,
            ArmRegister::FPSR => FPSR,
            ArmRegister::FPCR => FPCR,
            ArmRegister::CPSR => CPSR,
            ArmRegister::SPSR => SPSR,
        }
    }
}

impl std::fmt::Display for ArmRegister {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            ArmRegister::Core(n) => f.write_fmt(format_args!("R{}", n)),
            ArmRegister::Float(n) => f.write_fmt(format_args!("F{}", n)),
            ArmRegister::FPSR => f.write_str("FPSR"),
            ArmRegister::FPCR => f.write_str("FPCR"),
            ArmRegister::CPSR => f.write_str("CPSR"),
            ArmRegister::SPSR => f.write_str("SPSR"),
        }
    }
}

#[test]
fn ids_round_trip() {
    for reg in RBASE_ARM..MAXREG {
        let arm = ArmRegister::from_id(reg).expect("named");
        assert_eq!(arm.id(), reg);
    }
    assert_eq!(ArmRegister::from_id(MAXREG), None);
    assert_eq!(ArmRegister::from_id(RBASE_ARM - 1), None);
}

#[test]
fn aliases_are_core_registers() {
    assert_eq!(ArmRegister::SP.to_string(), "R13");
    assert_eq!(ArmRegister::PC.id(), RBASE_ARM + 15);
    assert_eq!(ArmRegister::Float(7).to_string(), "F7");
}
