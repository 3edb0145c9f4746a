//! Reader for operand description listings.
//!
//! Each non-blank line describes one operand by kind and fields, e.g.
//! `mem name=param sym=x off=8` or `shift expr=R3->R4`. The reader builds the
//! same untyped record numeric sources produce and decodes it through
//! `Addr::from`, so listings exercise the renderer exactly as a backend would.

use std::collections::HashSet;
use std::convert::TryFrom;

use itertools::Itertools;
use pest::iterators::Pair;
use pest::Parser;
use regex::Regex;

use addr::*;
use backend;
use format;
use registry::RegSpace;
use shift::{Shift, ShiftAmount, ShiftOp};

#[derive(Parser)]
#[grammar = "operands.pest"]
pub struct OperandParser;

/// One described operand and the instruction context it appears in.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    pub lineno: usize,
    pub prog: Option<Prog>,
    pub addr: Addr,
}

impl Operand {
    pub fn render(&self, regs: &RegSpace) -> String {
        format::render_operand(regs, self.prog.as_ref(), &self.addr)
    }
}

const KINDS: &[(&str, i16)] = &[
    ("none", TYPE_NONE),
    ("branch", TYPE_BRANCH),
    ("textsize", TYPE_TEXTSIZE),
    ("mem", TYPE_MEM),
    ("const", TYPE_CONST),
    ("fconst", TYPE_FCONST),
    ("sconst", TYPE_SCONST),
    ("reg", TYPE_REG),
    ("addr", TYPE_ADDR),
    ("shift", TYPE_SHIFT),
    ("regreg", TYPE_REGREG),
    ("regreg2", TYPE_REGREG2),
    ("indir", TYPE_INDIR),
];

const NAMES: &[(&str, i16)] = &[
    ("none", NAME_NONE),
    ("extern", NAME_EXTERN),
    ("static", NAME_STATIC),
    ("auto", NAME_AUTO),
    ("param", NAME_PARAM),
];

fn code_for(table: &[(&str, i16)], what: &str, word: &str) -> Result<i16, String> {
    if let Some(&(_, code)) = table.iter().find(|&&(name, _)| name == word) {
        return Ok(code);
    }
    word.parse::<i16>().map_err(|_| {
        format!("unknown {} '{}' (expected one of {} or a number)",
                what, word, table.iter().map(|&(name, _)| name).join(", "))
    })
}

fn parse_int(text: &str) -> Result<i64, String> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.starts_with('-') || digits.starts_with('+') {
        return Err(format!("invalid integer '{}'", text));
    }
    let magnitude = if digits.starts_with("0x") || digits.starts_with("0X") {
        i128::from_str_radix(&digits[2..], 16)
    } else {
        digits.parse::<i128>()
    };
    let value = match magnitude {
        Ok(m) if negative => -m,
        Ok(m) => m,
        Err(_) => return Err(format!("invalid integer '{}'", text)),
    };
    i64::try_from(value).map_err(|_| format!("integer '{}' out of range", text))
}

/// Narrows a parsed value to the width of the slot it is stored in.
fn narrow<T: TryFrom<i64>>(what: &str, value: i64) -> Result<T, String> {
    T::try_from(value).map_err(|_| format!("{} {} out of range", what, value))
}

fn parse_float(text: &str) -> Result<f64, String> {
    match text.to_lowercase().as_str() {
        "nan" => Ok(::std::f64::NAN),
        "inf" | "+inf" => Ok(::std::f64::INFINITY),
        "-inf" => Ok(::std::f64::NEG_INFINITY),
        _ => text.parse::<f64>().map_err(|_| format!("invalid float '{}'", text)),
    }
}

/// `AX`, `AX@amd64` or a numeric id. Unqualified names resolve to the first
/// registered architecture that has them.
fn parse_register(regs: &RegSpace, text: &str) -> Result<i32, String> {
    if text.starts_with('-') || text.bytes().all(|b| b.is_ascii_digit()) {
        return narrow("register id", parse_int(text)?);
    }
    let found = match text.find('@') {
        Some(at) => {
            let (name, arch) = (&text[..at], &text[at + 1..]);
            let backend = backend::backend_for_arch(arch)
                .ok_or_else(|| format!("unknown architecture '{}'", arch))?;
            let (lo, hi) = backend.register_range();
            regs.lookup_within(name, lo, hi)
        }
        None => regs.lookup(text),
    };
    found.ok_or_else(|| format!("unknown register '{}'", text))
}

fn parse_shift(text: &str) -> Result<Shift, String> {
    let re = Regex::new(r"^R(\d+)(<<|>>|->|@>)(R?)(\d+)$").map_err(|e| e.to_string())?;
    let caps = re.captures(text)
        .ok_or_else(|| format!("invalid shift '{}' (expected e.g. R3<<5 or R3->R4)", text))?;
    let number = |i: usize, max: u8| -> Result<u8, String> {
        match caps[i].parse::<u8>() {
            Ok(n) if n <= max => Ok(n),
            _ => Err(format!("shift field '{}' out of range 0-{}", &caps[i], max)),
        }
    };
    let op = match &caps[2] {
        "<<" => ShiftOp::Lsl,
        ">>" => ShiftOp::Lsr,
        "->" => ShiftOp::Asr,
        _ => ShiftOp::Ror,
    };
    let amount = if caps[3].is_empty() {
        ShiftAmount::Imm(number(4, 31)?)
    } else {
        ShiftAmount::Reg(number(4, 15)?)
    };
    Ok(Shift { reg: number(1, 15)?, op, amount })
}

fn unescape(text: &str) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let esc = chars.next().ok_or_else(|| "dangling escape".to_string())?;
        match esc {
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0' => out.push('\0'),
            '\\' | '"' => out.push(esc),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                let byte = u8::from_str_radix(&hex, 16)
                    .map_err(|_| format!("invalid escape '\\x{}'", hex))?;
                out.push(byte as char);
            }
            other => return Err(format!("unknown escape '\\{}'", other)),
        }
    }
    Ok(out)
}

fn field_value(pair: Pair<Rule>) -> Result<String, String> {
    match pair.as_rule() {
        Rule::string => {
            let chars = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            unescape(chars)
        }
        _ => Ok(pair.as_str().to_string()),
    }
}

fn build_operand(pair: Pair<Rule>, lineno: usize, regs: &RegSpace) -> Result<Operand, String> {
    let mut inner = pair.into_inner();
    let kind = inner.next().ok_or_else(|| "missing operand kind".to_string())?;

    let mut raw = RawAddr::default();
    raw.ty = code_for(KINDS, "kind", kind.as_str())?;
    let mut prog = None;
    let mut seen = HashSet::new();

    for field in inner {
        let mut parts = field.into_inner();
        let (key, value) = match (parts.next(), parts.next()) {
            (Some(key), Some(value)) => (key.as_str(), field_value(value)?),
            _ => return Err("malformed field".to_string()),
        };
        if !seen.insert(key) {
            return Err(format!("field '{}' given twice", key));
        }
        match key {
            "name" => raw.name = code_for(NAMES, "name", &value)?,
            "reg" => raw.reg = parse_register(regs, &value)?,
            "index" => raw.index = parse_register(regs, &value)?,
            "scale" => raw.scale = narrow("scale", parse_int(&value)?)?,
            "off" => raw.offset = parse_int(&value)?,
            "sym" => raw.sym = Some(LSym::new(value)),
            "pc" => {
                let target = Prog::at(parse_int(&value)?);
                prog = Some(Prog::branching_to(target));
            }
            "target" => raw.branch = Some(Prog::at(parse_int(&value)?)),
            "argsize" => raw.argsize = narrow("argsize", parse_int(&value)?)?,
            "val" => raw.dval = parse_float(&value)?,
            "str" => raw.sval = value,
            "reg2" => raw.offset = i64::from(parse_register(regs, &value)?),
            "expr" => raw.offset = parse_shift(&value)?.encode(),
            other => return Err(format!("unknown field '{}'", other)),
        }
    }

    let lineno32 = i32::try_from(lineno).unwrap_or(i32::max_value());
    let prog = prog.map(|p: Prog| Prog { lineno: lineno32, ..p });
    Ok(Operand { lineno, prog, addr: Addr::from(raw) })
}

/// Parses one line. Blank and comment-only lines yield `None`.
pub fn parse_line(line: &str, lineno: usize, regs: &RegSpace) -> Result<Option<Operand>, String> {
    let with_line = |e: String| format!("line {}: {}", lineno, e);

    let pairs = OperandParser::parse(Rule::line, line)
        .map_err(|e| with_line(format!("{}", e)))?;
    for pair in pairs.flatten() {
        if pair.as_rule() == Rule::operand {
            return build_operand(pair, lineno, regs).map(Some).map_err(with_line);
        }
    }
    Ok(None)
}

pub fn parse_listing(src: &str, regs: &RegSpace) -> Result<Vec<Operand>, String> {
    let mut operands = vec![];
    for (i, line) in src.lines().enumerate() {
        if let Some(operand) = parse_line(line, i + 1, regs)? {
            operands.push(operand);
        }
    }
    Ok(operands)
}

/// Renders every operand in `src`, one per output line.
pub fn render_listing(src: &str, regs: &RegSpace) -> Result<String, String> {
    let operands = parse_listing(src, regs)?;
    Ok(operands.iter().map(|o| format!("{}\n", o.render(regs))).collect())
}
