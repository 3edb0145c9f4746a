//! Textual rendering of operands.
//!
//! The output grammar is relied on by listings and golden tests, so spelling,
//! spacing and punctuation are exact. Rendering never fails: operands that
//! make no sense still produce a best-effort string such as `type=3`.

use std::fmt::{self, Display, Formatter, Write};

use addr::{Addr, AddrName, AddrType, ArgsSize, Prog};
use registry::{RegSpace, REG_NONE};
use shift::Shift;

/// The base part of an operand: offset, register and symbol according to
/// its addressing mode.
pub struct BaseDisplay<'a> {
    regs: &'a RegSpace,
    addr: &'a Addr,
}

/// A whole operand. `prog` is the enclosing instruction, consulted only
/// for branch targets.
pub struct OperandDisplay<'a> {
    regs: &'a RegSpace,
    prog: Option<&'a Prog>,
    addr: &'a Addr,
}

pub fn base<'a>(regs: &'a RegSpace, addr: &'a Addr) -> BaseDisplay<'a> {
    BaseDisplay { regs, addr }
}

pub fn operand<'a>(regs: &'a RegSpace, prog: Option<&'a Prog>, addr: &'a Addr) -> OperandDisplay<'a> {
    OperandDisplay { regs, prog, addr }
}

pub fn render_base(regs: &RegSpace, addr: &Addr) -> String {
    base(regs, addr).to_string()
}

pub fn render_operand(regs: &RegSpace, prog: Option<&Prog>, addr: &Addr) -> String {
    operand(regs, prog, addr).to_string()
}

/// Empty for zero, otherwise the offset with an explicit sign.
pub fn offset_suffix(off: i64) -> String {
    OffsetSuffix(off).to_string()
}

struct OffsetSuffix(i64);

impl Display for OffsetSuffix {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.0 == 0 {
            return Ok(());
        }
        write!(f, "{:+}", self.0)
    }
}

fn sym_name(addr: &Addr) -> &str {
    match addr.sym {
        Some(ref sym) => &sym.name,
        None => "",
    }
}

impl<'a> Display for BaseDisplay<'a> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let a = self.addr;
        match a.name {
            AddrName::None => {
                if a.reg == REG_NONE {
                    write!(f, "{}", a.offset)
                } else if a.offset == 0 {
                    write!(f, "({})", self.regs.resolve_name(a.reg))
                } else {
                    write!(f, "{}({})", a.offset, self.regs.resolve_name(a.reg))
                }
            }
            AddrName::Extern =>
                write!(f, "{}{}(SB)", sym_name(a), OffsetSuffix(a.offset)),
            AddrName::Static =>
                write!(f, "{}<>{}(SB)", sym_name(a), OffsetSuffix(a.offset)),
            AddrName::Auto =>
                write!(f, "{}{}(SP)", sym_name(a), OffsetSuffix(a.offset)),
            AddrName::Param =>
                write!(f, "{}{}(FP)", sym_name(a), OffsetSuffix(a.offset)),
            AddrName::Unknown(code) => write!(f, "name={}", code),
        }
    }
}

impl<'a> Display for OperandDisplay<'a> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let a = self.addr;
        let regs = self.regs;
        let mconv = base(regs, a);
        match a.ty {
            AddrType::None => {
                if a.name != AddrName::None || a.reg != REG_NONE || a.sym.is_some() {
                    write!(f, "{}({})(NONE)", mconv, regs.resolve_name(a.reg))?;
                }
                Ok(())
            }

            AddrType::Reg => {
                // x86 instructions like PINSRQ CX,$1,X6 carry the $1 in the
                // register operand.
                if a.offset != 0 {
                    write!(f, "${},{}", a.offset, regs.resolve_name(a.reg))
                } else if a.name != AddrName::None || a.sym.is_some() {
                    write!(f, "{}({})(REG)", mconv, regs.resolve_name(a.reg))
                } else {
                    f.write_str(&regs.resolve_name(a.reg))
                }
            }

            AddrType::Branch(ref target) => {
                let resolved = self.prog.and_then(|p| p.pcond.as_ref());
                if let Some(ref sym) = a.sym {
                    write!(f, "{}(SB)", sym.name)
                } else if let Some(pcond) = resolved {
                    write!(f, "{}", pcond.pc)
                } else if let Some(ref target) = *target {
                    write!(f, "{}", target.pc)
                } else {
                    write!(f, "{}(PC)", a.offset)
                }
            }

            AddrType::Indir => write!(f, "*{}", mconv),

            AddrType::Mem => {
                write!(f, "{}", mconv)?;
                if let Some(index) = a.index {
                    write!(f, "({}*{})", regs.resolve_name(index.reg), index.scale)?;
                }
                Ok(())
            }

            AddrType::Const => {
                if a.reg != REG_NONE {
                    write!(f, "${}({})", mconv, regs.resolve_name(a.reg))
                } else {
                    write!(f, "${}", mconv)
                }
            }

            AddrType::TextSize(ArgsSize::Unknown) => write!(f, "${}", a.offset),
            AddrType::TextSize(ArgsSize::Known(args)) => write!(f, "${}-{}", a.offset, args),

            AddrType::FConst(value) => write!(f, "$({})", fconv(value)),

            AddrType::SConst(ref value) => write!(f, "${}", quote(value)),

            AddrType::Addr => write!(f, "${}", mconv),

            AddrType::Shift => {
                write!(f, "{}", Shift::decode(a.offset))?;
                if a.reg != REG_NONE {
                    write!(f, "({})", regs.resolve_name(a.reg))?;
                }
                Ok(())
            }

            AddrType::RegReg(second) =>
                write!(f, "({}, {})", regs.resolve_name(a.reg), regs.resolve_name(second)),

            AddrType::RegReg2(second) =>
                write!(f, "{}, {}", regs.resolve_name(a.reg), regs.resolve_name(second)),

            AddrType::Unknown(code) => write!(f, "type={}", code),
        }
    }
}

/// Floating constant with 17 significant digits, the shortest precision
/// that round-trips every f64. Integral values keep a ".0" so they still
/// read as floating point.
pub fn fconv(value: f64) -> String {
    let mut s = format_g17(value);
    if !s.contains('.') && !s.contains('e') {
        s.push_str(".0");
    }
    s
}

const SIGNIFICANT_DIGITS: i32 = 17;

/// `%.17g`: scientific notation when the decimal exponent is below -4 or at
/// least 17, plain decimal otherwise, trailing zeros removed either way.
fn format_g17(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf".to_string() } else { "-Inf".to_string() };
    }

    // Rounding to 17 digits first settles the exponent (9.99..e2 may become 1e3).
    let sci = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let (mantissa, exp) = match sci.find('e') {
        Some(pos) => (&sci[..pos], sci[pos + 1..].parse::<i32>().unwrap_or(0)),
        None => (&sci[..], 0),
    };

    if exp < -4 || exp >= SIGNIFICANT_DIGITS {
        let mut out = trim_fraction(mantissa).to_string();
        let sign = if exp < 0 { '-' } else { '+' };
        write!(out, "e{}{:02}", sign, exp.abs()).unwrap_or(());
        out
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exp) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}

/// Printable in the sense of letters, marks, numbers, punctuation, symbols
/// and the ASCII space. Separators, format, private-use and unassigned code
/// points are not.
fn is_print(c: char) -> bool {
    if c.is_ascii() {
        return c == ' ' || c.is_ascii_graphic();
    }
    // Only a leading combining mark gets escaped for being one, so look at
    // the character in second position.
    let pair: String = ['a', c].iter().collect();
    pair.escape_debug().nth(1) != Some('\\')
}

/// Double-quoted string literal with escapes for quotes, backslashes and
/// non-printing characters.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                write!(out, "\\x{:02x}", c as u32).unwrap_or(());
            }
            c if !is_print(c) => {
                if (c as u32) < 0x10000 {
                    write!(out, "\\u{:04x}", c as u32).unwrap_or(());
                } else {
                    write!(out, "\\U{:08x}", c as u32).unwrap_or(());
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[test]
fn offset_suffix_signs() {
    assert_eq!(offset_suffix(0), "");
    assert_eq!(offset_suffix(123), "+123");
    assert_eq!(offset_suffix(-45), "-45");
}

#[test]
fn fconv_keeps_floats_visible() {
    assert_eq!(fconv(1.0), "1.0");
    assert_eq!(fconv(0.0), "0.0");
    assert_eq!(fconv(-0.0), "-0.0");
    assert_eq!(fconv(-2.5), "-2.5");
    assert_eq!(fconv(100.0), "100.0");
}

#[test]
fn fconv_uses_seventeen_digits() {
    assert_eq!(fconv(0.1), "0.10000000000000001");
    assert_eq!(fconv(1.0 / 3.0), "0.33333333333333331");
    assert_eq!(fconv(123456789.0), "123456789.0");
}

#[test]
fn fconv_switches_to_exponent() {
    assert_eq!(fconv(1e17), "1e+17");
    assert_eq!(fconv(1e16), "10000000000000000.0");
    assert_eq!(fconv(0.0001), "0.0001");
    assert_eq!(fconv(0.00001), "1.0000000000000001e-05");
    assert_eq!(fconv(1267650600228229401496703205376.0), "1.2676506002282294e+30");
    assert_eq!(fconv(5e-324), "4.9406564584124654e-324");
}

#[test]
fn fconv_special_values() {
    assert_eq!(fconv(::std::f64::NAN), "NaN.0");
    assert_eq!(fconv(::std::f64::INFINITY), "+Inf.0");
    assert_eq!(fconv(::std::f64::NEG_INFINITY), "-Inf.0");
}

#[test]
fn quote_escapes() {
    assert_eq!(quote("hello"), "\"hello\"");
    assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
    assert_eq!(quote("tab\tnl\n"), "\"tab\\tnl\\n\"");
    assert_eq!(quote("\u{0}\u{1b}"), "\"\\x00\\x1b\"");
    assert_eq!(quote("\u{85}"), "\"\\u0085\"");
    assert_eq!(quote("héllo"), "\"héllo\"");
}

#[test]
fn quote_escapes_separators_format_and_private_use() {
    assert_eq!(quote("\u{a0}"), "\"\\u00a0\"");
    assert_eq!(quote("\u{200b}"), "\"\\u200b\"");
    assert_eq!(quote("\u{2028}"), "\"\\u2028\"");
    assert_eq!(quote("\u{e000}"), "\"\\ue000\"");
    assert_eq!(quote("\u{feff}"), "\"\\ufeff\"");
    assert_eq!(quote("\u{f0000}"), "\"\\U000f0000\"");
}

#[test]
fn quote_keeps_printable_text() {
    assert_eq!(quote("e\u{301}"), "\"e\u{301}\"");
    assert_eq!(quote("\u{301}"), "\"\u{301}\"");
    assert_eq!(quote("'·€😀"), "\"'·€😀\"");
}
