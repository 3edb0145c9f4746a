/// Buffered file I/O through temporary files.
extern crate asmconvlib;
extern crate tempfile;

use asmconvlib::bio::{self, BioReader, BioWriter};
use std::io::{SeekFrom, Write};
use tempfile::NamedTempFile;

#[test]
fn write_then_read_lines() {
    let file = NamedTempFile::new().unwrap();
    let mut out = BioWriter::create(file.path()).unwrap();
    out.write_str("mem off=8\n").unwrap();
    writeln!(out, "reg reg={}", "AX").unwrap();
    out.putc(b'#').unwrap();
    assert_eq!(out.offset().unwrap(), 22);
    out.term().unwrap();

    let mut input = BioReader::open(file.path()).unwrap();
    assert_eq!(input.rdstr(b'\n', true).unwrap(), Some("mem off=8".to_string()));
    assert_eq!(input.linelen(), 10);
    assert_eq!(input.rdline(b'\n').unwrap(), Some("reg reg=AX\n".to_string()));
    assert_eq!(input.rdline(b'\n').unwrap(), Some("#".to_string()));
    assert_eq!(input.rdline(b'\n').unwrap(), None);
}

#[test]
fn seek_and_reread() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"abcdefgh").unwrap();
    file.flush().unwrap();

    let mut input = BioReader::open(file.path()).unwrap();
    let mut buf = [0u8; 3];
    assert_eq!(input.read_full(&mut buf).unwrap(), 3);
    assert_eq!(&buf, b"abc");
    assert_eq!(input.seek(SeekFrom::Start(6)).unwrap(), 6);
    assert_eq!(input.getc(), Some(b'g'));
    input.ungetc();
    assert_eq!(input.getc(), Some(b'g'));
    let mut rest = [0u8; 8];
    assert_eq!(input.read_full(&mut rest).unwrap(), 1);
}

#[test]
fn access_reports_existence() {
    let file = NamedTempFile::new().unwrap();
    assert!(bio::access(file.path()));
    let gone = file.path().to_path_buf();
    drop(file);
    assert!(!bio::access(&gone));
}

#[test]
fn open_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(BioReader::open(dir.path().join("missing.ops")).is_err());
}
