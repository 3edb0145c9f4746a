use asmconvlib::backend;
use asmconvlib::bio::BioWriter;
use asmconvlib::registry::RegSpace;
use std::fs;
use tempfile::NamedTempFile;

pub fn regs() -> RegSpace {
    backend::registry_with_all_backends().expect("all backends register")
}

/// Renders `testdata/<ops_file>` through a temporary file and compares the
/// result with the matching `.golden` file.
pub fn golden(ops_file: &str) {
    let ops_path = format!("testdata/{}", ops_file);
    let golden_path = asmconvlib::golden_path(&ops_path);

    let outfile = NamedTempFile::new().expect("tempfile");
    let mut out = BioWriter::new(outfile.reopen().expect("reopen tempfile"));
    asmconvlib::render_file(&ops_path, &regs(), false, &mut out).expect("render");
    out.term().expect("flush");

    let actual = fs::read_to_string(outfile.path()).expect("rendered output");
    let expected = fs::read_to_string(&golden_path).expect("golden file");
    println!("=== RENDERED ====");
    println!("{}", actual);
    assert_eq!(expected, actual, "{} differs from {}", ops_path, golden_path);
}
