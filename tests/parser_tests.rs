/// Integration tests for the operand listing reader.
extern crate asmconvlib;
extern crate tempfile;

mod common;

use asmconvlib::addr::{AddrName, AddrType, ArgsSize};
use asmconvlib::bio::BioWriter;
use asmconvlib::parser;
use std::fs;
use std::io::Cursor;

#[test]
fn parse_test1() {
    let regs = common::regs();
    let operands = parser::parse_listing("mem name=param sym=x off=8\n\n# done\n", &regs).unwrap();
    assert_eq!(operands.len(), 1);
    assert_eq!(operands[0].lineno, 1);
    assert_eq!(operands[0].addr.ty, AddrType::Mem);
    assert_eq!(operands[0].addr.name, AddrName::Param);
    assert_eq!(operands[0].addr.offset, 8);
}

#[test]
fn numeric_kinds_decode_like_names() {
    let regs = common::regs();
    let by_name = parser::parse_listing("textsize off=8 argsize=4", &regs).unwrap();
    let by_code = parser::parse_listing("6 off=8 argsize=4", &regs).unwrap();
    assert_eq!(by_name, by_code);
    assert_eq!(by_name[0].addr.ty, AddrType::TextSize(ArgsSize::Known(4)));
}

#[test]
fn listing_renders_one_line_per_operand() {
    let regs = common::regs();
    let src = "const off=1\n  # indented comment\nreg reg=R0@arm\nbranch target=12 pc=20\n";
    assert_eq!(parser::render_listing(src, &regs), Ok("$1\nR0\n20\n".to_string()));
}

#[test]
fn branch_context_carries_line_number() {
    let regs = common::regs();
    let operands = parser::parse_listing("\n\nbranch pc=20", &regs).unwrap();
    let prog = operands[0].prog.as_ref().expect("instruction context");
    assert_eq!(prog.lineno, 3);
    assert_eq!(prog.pcond.as_ref().map(|p| p.pc), Some(20));
}

#[test]
fn unknown_fields_and_kinds_are_errors() {
    let regs = common::regs();
    assert_eq!(parser::render_listing("mem colour=red", &regs),
               Err("line 1: unknown field 'colour'".to_string()));
    assert!(parser::render_listing("bogus", &regs).unwrap_err().starts_with("line 1: unknown kind 'bogus'"));
    assert_eq!(parser::render_listing("reg reg=AX@vax", &regs),
               Err("line 1: unknown architecture 'vax'".to_string()));
}

#[test]
fn render_file_writes_and_counts() {
    let regs = common::regs();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("listing.ops");
    fs::write(&path, "const off=3\n# skip\nfconst val=2\n").unwrap();

    let mut out = BioWriter::new(Cursor::new(vec![]));
    let count = asmconvlib::render_file(path.to_str().unwrap(), &regs, false, &mut out).unwrap();
    assert_eq!(count, 2);
    let bytes = out.term().unwrap().into_inner();
    assert_eq!(String::from_utf8(bytes).unwrap(), "$3\n$(2.0)\n");
}

#[test]
fn render_file_prefixes_errors_with_path() {
    let regs = common::regs();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.ops");
    fs::write(&path, "const off=3\nconst off=zz\n").unwrap();
    let path = path.to_str().unwrap().to_string();

    let mut out = BioWriter::new(Cursor::new(vec![]));
    let err = asmconvlib::render_file(&path, &regs, false, &mut out).unwrap_err();
    assert_eq!(err, format!("{}: line 2: invalid integer 'zz'", path));
}
