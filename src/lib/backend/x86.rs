use backend::Backend;
use registry::{RBASE_386, RBASE_AMD64};

/// Register names in id order, starting at the backend's base. 386 and
/// amd64 share the table; 386 code just never uses the 64-bit names.
pub const REGISTERS: &[&str] = &[
    "AL", "CL", "DL", "BL", "SPB", "BPB", "SIB", "DIB",
    "R8B", "R9B", "R10B", "R11B", "R12B", "R13B", "R14B", "R15B",
    "AX", "CX", "DX", "BX", "SP", "BP", "SI", "DI",
    "R8", "R9", "R10", "R11", "R12", "R13", "R14", "R15",
    "AH", "CH", "DH", "BH",
    "F0", "F1", "F2", "F3", "F4", "F5", "F6", "F7",
    "M0", "M1", "M2", "M3", "M4", "M5", "M6", "M7",
    "X0", "X1", "X2", "X3", "X4", "X5", "X6", "X7",
    "X8", "X9", "X10", "X11", "X12", "X13", "X14", "X15",
    "CS", "SS", "DS", "ES", "FS", "GS",
    "GDTR", "IDTR", "LDTR", "MSW", "TASK",
    "CR0", "CR1", "CR2", "CR3", "CR4", "CR5", "CR6", "CR7",
    "CR8", "CR9", "CR10", "CR11", "CR12", "CR13", "CR14", "CR15",
    "DR0", "DR1", "DR2", "DR3", "DR4", "DR5", "DR6", "DR7",
    "TR0", "TR1", "TR2", "TR3", "TR4", "TR5", "TR6", "TR7",
    "TLS",
];

// Offsets into REGISTERS, for callers building operands by hand.
pub const REG_AL: i32 = 0;
pub const REG_AX: i32 = 16;
pub const REG_SP: i32 = 20;
pub const REG_BP: i32 = 21;
pub const REG_AH: i32 = 32;
pub const REG_F0: i32 = 36;
pub const REG_X0: i32 = 52;
pub const REG_CS: i32 = 68;
pub const REG_TLS: i32 = 111;

pub struct X86Backend {
    arch: &'static str,
    base: i32,
}

impl X86Backend {
    pub fn i386() -> X86Backend {
        X86Backend { arch: "386", base: RBASE_386 }
    }

    pub fn amd64() -> X86Backend {
        X86Backend { arch: "amd64", base: RBASE_AMD64 }
    }

    /// Global id of the register at `offset` in the table.
    pub fn reg(&self, offset: i32) -> i32 {
        self.base + offset
    }
}

impl Backend for X86Backend {
    fn arch(&self) -> &'static str {
        self.arch
    }

    fn register_range(&self) -> (i32, i32) {
        (self.base, self.base + REGISTERS.len() as i32)
    }

    fn rconv(&self, reg: i32) -> String {
        let offset = reg - self.base;
        if offset >= 0 && (offset as usize) < REGISTERS.len() {
            return REGISTERS[offset as usize].to_string();
        }
        format!("Rgok{}", offset)
    }
}

#[test]
fn table_offsets() {
    assert_eq!(REGISTERS[REG_AX as usize], "AX");
    assert_eq!(REGISTERS[REG_SP as usize], "SP");
    assert_eq!(REGISTERS[REG_BP as usize], "BP");
    assert_eq!(REGISTERS[REG_AH as usize], "AH");
    assert_eq!(REGISTERS[REG_F0 as usize], "F0");
    assert_eq!(REGISTERS[REG_X0 as usize], "X0");
    assert_eq!(REGISTERS[REG_CS as usize], "CS");
    assert_eq!(REGISTERS[REG_TLS as usize], "TLS");
    assert_eq!(REGISTERS.len(), 112);
}

#[test]
fn both_variants_share_names() {
    let i386 = X86Backend::i386();
    let amd64 = X86Backend::amd64();
    assert_eq!(i386.rconv(i386.reg(REG_AX)), "AX");
    assert_eq!(amd64.rconv(amd64.reg(REG_AX)), "AX");
    assert_eq!(amd64.rconv(amd64.reg(REG_X0 + 15)), "X15");
    assert_eq!(amd64.rconv(amd64.base + 500), "Rgok500");
}
