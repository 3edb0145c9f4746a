#![warn(trivial_numeric_casts)]

extern crate getopts;
extern crate itertools;
extern crate linked_hash_set;
extern crate pest;
extern crate regex;

#[macro_use]
extern crate pest_derive;

pub mod addr;
pub mod backend;
pub mod bio;
pub mod env;
pub mod format;
pub mod parser;
pub mod registry;
pub mod shift;

use bio::{BioReader, BioWriter};
use registry::RegSpace;
use std::io::Write;
use std::path::Path;

fn convert_io_error<T>(result: Result<T, std::io::Error>) -> Result<T, String> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => Err(format!("{}", e)),
    }
}

/// Renders the operand listing at `path` into `out`, one operand per line,
/// and returns how many operands were rendered.
pub fn render_file<W: Write>(
    path: &str,
    regs: &RegSpace,
    do_verbose: bool,
    out: &mut BioWriter<W>,
) -> Result<usize, String> {
    let mut input = BioReader::open(path).map_err(|e| format!("{}: {}", path, e))?;

    if do_verbose {
        eprintln!("Rendering {}", path);
    }

    let mut count = 0;
    let mut lineno = 0;
    while let Some(line) = convert_io_error(input.rdstr(b'\n', true))? {
        lineno += 1;
        let operand = match parser::parse_line(&line, lineno, regs) {
            Ok(Some(operand)) => operand,
            Ok(None) => continue,
            Err(e) => return Err(format!("{}: {}", path, e)),
        };
        let text = operand.render(regs);
        if do_verbose {
            eprintln!("{:>5}  {:<40} {}", lineno, line.trim(), text);
        }
        convert_io_error(out.write_str(&text))?;
        convert_io_error(out.putc(b'\n'))?;
        count += 1;
    }

    convert_io_error(out.flush())?;
    Ok(count)
}

/// Convert "dir/foo.ops" to "dir/foo.golden".
pub fn golden_path(ops_path: &str) -> String {
    Path::new(ops_path)
        .with_extension("golden")
        .to_string_lossy()
        .into_owned()
}

#[test]
fn golden_path_test() {
    assert_eq!(golden_path("test.ops"), "test.golden");
}

#[test]
fn golden_path_relative_path_test() {
    assert_eq!(golden_path("dir/test.ops"), "dir/test.golden");
}
