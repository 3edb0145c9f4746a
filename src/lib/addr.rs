//! Instruction operands.
//!
//! `Addr` is the typed form: the operand kind is a closed enum and each kind
//! carries only the payload it uses. `RawAddr` is the numeric record used by
//! older producers; converting it is the one place unknown kind and
//! addressing-mode codes can enter.

use std::sync::Arc;

use registry::REG_NONE;
use shift::Shift;

/// Argument size of a TEXT directive whose frame size is not known.
pub const ARGS_SIZE_UNKNOWN: i32 = i32::min_value();

pub const TYPE_NONE: i16 = 0;
pub const TYPE_BRANCH: i16 = 5;
pub const TYPE_TEXTSIZE: i16 = 6;
pub const TYPE_MEM: i16 = 7;
pub const TYPE_CONST: i16 = 8;
pub const TYPE_FCONST: i16 = 9;
pub const TYPE_SCONST: i16 = 10;
pub const TYPE_REG: i16 = 11;
pub const TYPE_ADDR: i16 = 12;
pub const TYPE_SHIFT: i16 = 13;
pub const TYPE_REGREG: i16 = 14;
pub const TYPE_REGREG2: i16 = 15;
pub const TYPE_INDIR: i16 = 16;

pub const NAME_NONE: i16 = 0;
pub const NAME_EXTERN: i16 = 1;
pub const NAME_STATIC: i16 = 2;
pub const NAME_AUTO: i16 = 3;
pub const NAME_PARAM: i16 = 4;

/// A linker symbol. Operands only ever read its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LSym {
    pub name: String,
}

impl LSym {
    pub fn new<S: Into<String>>(name: S) -> Arc<LSym> {
        Arc::new(LSym { name: name.into() })
    }
}

/// The part of an instruction the operand renderer consults: its own
/// program counter and, once branches are resolved, the instruction it
/// branches to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Prog {
    pub pc: i64,
    pub lineno: i32,
    pub pcond: Option<Arc<Prog>>,
}

impl Prog {
    pub fn at(pc: i64) -> Arc<Prog> {
        Arc::new(Prog { pc, ..Prog::default() })
    }

    pub fn branching_to(target: Arc<Prog>) -> Prog {
        Prog { pcond: Some(target), ..Prog::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgsSize {
    Unknown,
    Known(i32),
}

impl ArgsSize {
    pub fn from_raw(raw: i32) -> ArgsSize {
        if raw == ARGS_SIZE_UNKNOWN {
            ArgsSize::Unknown
        } else {
            ArgsSize::Known(raw)
        }
    }

    pub fn raw(&self) -> i32 {
        match *self {
            ArgsSize::Unknown => ARGS_SIZE_UNKNOWN,
            ArgsSize::Known(size) => size,
        }
    }
}

/// How the operand's location is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrName {
    None,
    Extern,  // global symbol, SB-relative
    Static,  // file-local symbol, SB-relative
    Auto,    // local in the stack frame, SP-relative
    Param,   // argument in the caller's frame, FP-relative
    Unknown(i16),
}

impl AddrName {
    pub fn from_code(code: i16) -> AddrName {
        match code {
            NAME_NONE => AddrName::None,
            NAME_EXTERN => AddrName::Extern,
            NAME_STATIC => AddrName::Static,
            NAME_AUTO => AddrName::Auto,
            NAME_PARAM => AddrName::Param,
            _ => AddrName::Unknown(code),
        }
    }

    pub fn code(&self) -> i16 {
        match *self {
            AddrName::None => NAME_NONE,
            AddrName::Extern => NAME_EXTERN,
            AddrName::Static => NAME_STATIC,
            AddrName::Auto => NAME_AUTO,
            AddrName::Param => NAME_PARAM,
            AddrName::Unknown(code) => code,
        }
    }
}

impl Default for AddrName {
    fn default() -> AddrName {
        AddrName::None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddrType {
    None,
    /// A branch target; the payload is the target instruction once the
    /// operand itself has been linked.
    Branch(Option<Arc<Prog>>),
    TextSize(ArgsSize),
    Mem,
    Const,
    FConst(f64),
    SConst(String),
    Reg,
    Addr,
    /// Shifted register; the packed shift lives in `Addr::offset`.
    Shift,
    /// Register pair; the payload is the second register.
    RegReg(i32),
    RegReg2(i32),
    Indir,
    Unknown(i16),
}

impl AddrType {
    pub fn code(&self) -> i16 {
        match *self {
            AddrType::None => TYPE_NONE,
            AddrType::Branch(_) => TYPE_BRANCH,
            AddrType::TextSize(_) => TYPE_TEXTSIZE,
            AddrType::Mem => TYPE_MEM,
            AddrType::Const => TYPE_CONST,
            AddrType::FConst(_) => TYPE_FCONST,
            AddrType::SConst(_) => TYPE_SCONST,
            AddrType::Reg => TYPE_REG,
            AddrType::Addr => TYPE_ADDR,
            AddrType::Shift => TYPE_SHIFT,
            AddrType::RegReg(_) => TYPE_REGREG,
            AddrType::RegReg2(_) => TYPE_REGREG2,
            AddrType::Indir => TYPE_INDIR,
            AddrType::Unknown(code) => code,
        }
    }
}

impl Default for AddrType {
    fn default() -> AddrType {
        AddrType::None
    }
}

/// Scaled index register of a memory operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index {
    pub reg: i32,
    pub scale: i16,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Addr {
    pub ty: AddrType,
    pub name: AddrName,
    pub reg: i32,
    pub offset: i64,
    pub index: Option<Index>,
    pub sym: Option<Arc<LSym>>,
}

impl Addr {
    pub fn reg(reg: i32) -> Addr {
        Addr { ty: AddrType::Reg, reg, ..Addr::default() }
    }

    pub fn mem(reg: i32, offset: i64) -> Addr {
        Addr { ty: AddrType::Mem, reg, offset, ..Addr::default() }
    }

    pub fn constant(value: i64) -> Addr {
        Addr { ty: AddrType::Const, offset: value, ..Addr::default() }
    }

    pub fn fconst(value: f64) -> Addr {
        Addr { ty: AddrType::FConst(value), ..Addr::default() }
    }

    pub fn sconst<S: Into<String>>(value: S) -> Addr {
        Addr { ty: AddrType::SConst(value.into()), ..Addr::default() }
    }

    pub fn branch(offset: i64) -> Addr {
        Addr { ty: AddrType::Branch(None), offset, ..Addr::default() }
    }

    pub fn text_size(frame: i64, args: ArgsSize) -> Addr {
        Addr { ty: AddrType::TextSize(args), offset: frame, ..Addr::default() }
    }

    pub fn shift(shift: Shift) -> Addr {
        Addr { ty: AddrType::Shift, offset: shift.encode(), ..Addr::default() }
    }

    /// A memory operand naming `sym` with the given addressing mode.
    pub fn symbol(name: AddrName, sym: Arc<LSym>, offset: i64) -> Addr {
        Addr { ty: AddrType::Mem, name, offset, sym: Some(sym), ..Addr::default() }
    }

    pub fn with_type(self, ty: AddrType) -> Addr {
        Addr { ty, ..self }
    }

    pub fn with_index(self, reg: i32, scale: i16) -> Addr {
        Addr { index: Some(Index { reg, scale }), ..self }
    }

    pub fn has_reg(&self) -> bool {
        self.reg != REG_NONE
    }
}

/// Operand record as produced by numeric-coded sources. The union slots
/// (`branch`, `argsize`, `dval`, `sval`) are read according to `ty`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAddr {
    pub ty: i16,
    pub name: i16,
    pub reg: i32,
    pub index: i32,
    pub scale: i16,
    pub offset: i64,
    pub sym: Option<Arc<LSym>>,
    pub branch: Option<Arc<Prog>>,
    pub argsize: i32,
    pub dval: f64,
    pub sval: String,
}

impl Default for RawAddr {
    fn default() -> RawAddr {
        RawAddr {
            ty: TYPE_NONE,
            name: NAME_NONE,
            reg: REG_NONE,
            index: REG_NONE,
            scale: 0,
            offset: 0,
            sym: None,
            branch: None,
            argsize: ARGS_SIZE_UNKNOWN,
            dval: 0.0,
            sval: String::new(),
        }
    }
}

impl From<RawAddr> for Addr {
    fn from(raw: RawAddr) -> Addr {
        let ty = match raw.ty {
            TYPE_NONE => AddrType::None,
            TYPE_BRANCH => AddrType::Branch(raw.branch),
            TYPE_TEXTSIZE => AddrType::TextSize(ArgsSize::from_raw(raw.argsize)),
            TYPE_MEM => AddrType::Mem,
            TYPE_CONST => AddrType::Const,
            TYPE_FCONST => AddrType::FConst(raw.dval),
            TYPE_SCONST => AddrType::SConst(raw.sval),
            TYPE_REG => AddrType::Reg,
            TYPE_ADDR => AddrType::Addr,
            TYPE_SHIFT => AddrType::Shift,
            TYPE_REGREG => AddrType::RegReg(raw.offset as i32),
            TYPE_REGREG2 => AddrType::RegReg2(raw.offset as i32),
            TYPE_INDIR => AddrType::Indir,
            code => AddrType::Unknown(code),
        };
        let index = if raw.index != REG_NONE {
            Some(Index { reg: raw.index, scale: raw.scale })
        } else {
            None
        };
        Addr {
            ty,
            name: AddrName::from_code(raw.name),
            reg: raw.reg,
            offset: raw.offset,
            index,
            sym: raw.sym,
        }
    }
}

#[test]
fn raw_codes_decode_to_kinds() {
    for code in TYPE_BRANCH..TYPE_INDIR + 1 {
        let addr = Addr::from(RawAddr { ty: code, ..RawAddr::default() });
        assert_eq!(addr.ty.code(), code);
    }
    for code in NAME_NONE..NAME_PARAM + 1 {
        assert_eq!(AddrName::from_code(code).code(), code);
    }
}

#[test]
fn unassigned_codes_stay_unknown() {
    assert_eq!(Addr::from(RawAddr { ty: 3, ..RawAddr::default() }).ty, AddrType::Unknown(3));
    assert_eq!(Addr::from(RawAddr { ty: 17, ..RawAddr::default() }).ty, AddrType::Unknown(17));
    assert_eq!(AddrName::from_code(9), AddrName::Unknown(9));
}

#[test]
fn raw_union_slots_follow_the_kind() {
    let addr = Addr::from(RawAddr { ty: TYPE_TEXTSIZE, offset: 24, argsize: 16, ..RawAddr::default() });
    assert_eq!(addr.ty, AddrType::TextSize(ArgsSize::Known(16)));

    let addr = Addr::from(RawAddr { ty: TYPE_TEXTSIZE, ..RawAddr::default() });
    assert_eq!(addr.ty, AddrType::TextSize(ArgsSize::Unknown));

    let addr = Addr::from(RawAddr { ty: TYPE_REGREG, reg: 3, offset: 4, ..RawAddr::default() });
    assert_eq!(addr.ty, AddrType::RegReg(4));

    let addr = Addr::from(RawAddr { ty: TYPE_MEM, reg: 1, index: 2, scale: 8, ..RawAddr::default() });
    assert_eq!(addr.index, Some(Index { reg: 2, scale: 8 }));
}
