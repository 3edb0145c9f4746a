//! Packed shifted-register operands.
//!
//! Bit layout of the packed value (carried in `Addr::offset`):
//!
//! ```text
//!  bits 0-3   register being shifted
//!  bit  4     shift amount is a register
//!  bits 5-6   operator: 0 <<, 1 >>, 2 ->, 3 @>
//!  bits 7-11  immediate shift amount (bit 4 clear)
//!  bits 8-11  shift amount register (bit 4 set)
//! ```
//!
//! Encoders elsewhere in the toolchain produce these bit patterns, so the
//! layout is fixed.

use std::fmt;

const REG_MASK: i64 = 0xf;
const AMOUNT_IN_REG: i64 = 1 << 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    Lsl,
    Lsr,
    Asr,
    Ror,
}

impl ShiftOp {
    fn from_bits(bits: i64) -> ShiftOp {
        match bits & 3 {
            0 => ShiftOp::Lsl,
            1 => ShiftOp::Lsr,
            2 => ShiftOp::Asr,
            _ => ShiftOp::Ror,
        }
    }

    fn bits(&self) -> i64 {
        match *self {
            ShiftOp::Lsl => 0,
            ShiftOp::Lsr => 1,
            ShiftOp::Asr => 2,
            ShiftOp::Ror => 3,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match *self {
            ShiftOp::Lsl => "<<",
            ShiftOp::Lsr => ">>",
            ShiftOp::Asr => "->",
            ShiftOp::Ror => "@>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftAmount {
    Imm(u8),  // 0-31
    Reg(u8),  // 0-15
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub reg: u8,
    pub op: ShiftOp,
    pub amount: ShiftAmount,
}

impl Shift {
    /// Bits outside the layout are ignored.
    pub fn decode(v: i64) -> Shift {
        let amount = if v & AMOUNT_IN_REG != 0 {
            ShiftAmount::Reg(((v >> 8) & REG_MASK) as u8)
        } else {
            ShiftAmount::Imm(((v >> 7) & 31) as u8)
        };
        Shift {
            reg: (v & REG_MASK) as u8,
            op: ShiftOp::from_bits(v >> 5),
            amount,
        }
    }

    /// Fields wider than their slot are truncated to it.
    pub fn encode(&self) -> i64 {
        let base = (self.reg as i64 & REG_MASK) | (self.op.bits() << 5);
        match self.amount {
            ShiftAmount::Imm(n) => base | ((n as i64 & 31) << 7),
            ShiftAmount::Reg(r) => base | AMOUNT_IN_REG | ((r as i64 & REG_MASK) << 8),
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.amount {
            ShiftAmount::Imm(n) => write!(f, "R{}{}{}", self.reg, self.op.mnemonic(), n),
            ShiftAmount::Reg(r) => write!(f, "R{}{}R{}", self.reg, self.op.mnemonic(), r),
        }
    }
}
