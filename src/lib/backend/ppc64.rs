use backend::Backend;
use registry::RBASE_PPC64;

pub const REG_R0: i32 = RBASE_PPC64;
pub const REG_F0: i32 = RBASE_PPC64 + 32;
pub const REG_CR0: i32 = RBASE_PPC64 + 64;
pub const REG_CR7: i32 = RBASE_PPC64 + 71;
pub const REG_MSR: i32 = RBASE_PPC64 + 72;
pub const REG_FPSCR: i32 = RBASE_PPC64 + 73;
pub const REG_CR: i32 = RBASE_PPC64 + 74;

/// Special purpose registers, numbered as in mtspr/mfspr.
pub const REG_SPR0: i32 = RBASE_PPC64 + 1024;
pub const REG_XER: i32 = REG_SPR0 + 1;
pub const REG_LR: i32 = REG_SPR0 + 8;
pub const REG_CTR: i32 = REG_SPR0 + 9;

/// Device control registers.
pub const REG_DCR0: i32 = RBASE_PPC64 + 2048;

pub const MAXREG: i32 = REG_DCR0 + 1024;

pub struct PPC64Backend {}

impl Backend for PPC64Backend {
    fn arch(&self) -> &'static str {
        "ppc64"
    }

    fn register_range(&self) -> (i32, i32) {
        (RBASE_PPC64, MAXREG)
    }

    fn rconv(&self, r: i32) -> String {
        match r {
            r if REG_R0 <= r && r < REG_R0 + 32 => format!("R{}", r - REG_R0),
            r if REG_F0 <= r && r < REG_F0 + 32 => format!("F{}", r - REG_F0),
            r if REG_CR0 <= r && r <= REG_CR7 => format!("CR{}", r - REG_CR0),
            REG_CR => "CR".to_string(),
            REG_MSR => "MSR".to_string(),
            REG_FPSCR => "FPSCR".to_string(),
            REG_XER => "XER".to_string(),
            REG_LR => "LR".to_string(),
            REG_CTR => "CTR".to_string(),
            r if REG_SPR0 <= r && r < REG_SPR0 + 1024 => format!("SPR({})", r - REG_SPR0),
            r if REG_DCR0 <= r && r < REG_DCR0 + 1024 => format!("DCR({})", r - REG_DCR0),
            r => format!("Rgok{}", r - RBASE_PPC64),
        }
    }
}

#[test]
fn names_every_register_class() {
    let backend = PPC64Backend {};
    assert_eq!(backend.rconv(REG_R0 + 31), "R31");
    assert_eq!(backend.rconv(REG_F0 + 1), "F1");
    assert_eq!(backend.rconv(REG_CR0 + 7), "CR7");
    assert_eq!(backend.rconv(REG_CR), "CR");
    assert_eq!(backend.rconv(REG_LR), "LR");
    assert_eq!(backend.rconv(REG_SPR0 + 268), "SPR(268)");
    assert_eq!(backend.rconv(REG_DCR0 + 3), "DCR(3)");
    assert_eq!(backend.rconv(RBASE_PPC64 + 100), "Rgok100");
}
