use backend::Backend;
use registry::RBASE_ARM;

pub use self::registers::{ArmRegister, MAXREG};

mod registers;

pub struct ARMBackend {}

impl Backend for ARMBackend {
    fn arch(&self) -> &'static str {
        "arm"
    }

    fn register_range(&self) -> (i32, i32) {
        (RBASE_ARM, MAXREG)
    }

    fn rconv(&self, reg: i32) -> String {
        match ArmRegister::from_id(reg) {
            Some(arm) => arm.to_string(),
            None => format!("Rgok{}", reg - RBASE_ARM),
        }
    }
}

#[test]
fn names_core_and_float_registers() {
    let backend = ARMBackend {};
    assert_eq!(backend.rconv(RBASE_ARM), "R0");
    assert_eq!(backend.rconv(ArmRegister::LR.id()), "R14");
    assert_eq!(backend.rconv(RBASE_ARM + 16), "F0");
    assert_eq!(backend.rconv(ArmRegister::CPSR.id()), "CPSR");
    assert_eq!(backend.rconv(MAXREG + 2), "Rgok38");
}
