/// Integration tests for the asmconv binary.
extern crate tempfile;

use std::fs;
use std::process::{Command, Output};
use std::str;

fn asmconv(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_asmconv"))
        .args(args)
        .env_remove("ASMCONV_ARCH")
        .output()
        .expect("failed to execute asmconv")
}

fn stdout(output: &Output) -> String {
    str::from_utf8(&output.stdout).unwrap().to_owned()
}

#[test]
fn renders_listing_to_stdout() {
    let output = asmconv(&["testdata/branches.ops"]);
    assert!(output.status.success());
    let expected = fs::read_to_string("testdata/branches.golden").unwrap();
    assert_eq!(stdout(&output), expected);
}

#[test]
fn renders_listing_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("shifts.out");
    let output = asmconv(&["-o", out.to_str().unwrap(), "testdata/shifts.ops"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert_eq!(fs::read_to_string(&out).unwrap(),
               fs::read_to_string("testdata/shifts.golden").unwrap());
}

#[test]
fn names_register_ids() {
    let output = asmconv(&["--arch", "arm,ppc64", "--reg", "3086", "--reg", "0", "--reg", "4096"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "R14\nNONE\nR0\n");
}

#[test]
fn arch_aliases_do_not_collide() {
    let output = asmconv(&["--arch", "ppc64,ppc64le", "--reg", "4096"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "R0\n");
}

#[test]
fn lists_named_registers() {
    let output = asmconv(&["--arch", "arm", "--list-registers"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert_eq!(text.lines().count(), 36);
    assert!(text.starts_with("3072\tarm\tR0\n"));
    assert!(text.ends_with("3107\tarm\tSPSR\n"));
}

#[test]
fn verbose_reports_on_stderr() {
    let output = asmconv(&["--verbose", "--arch", "386", "--reg", "1040"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "AX\n");
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("Registered 386 registers [1024, 1136)"));
}

#[test]
fn usage_errors_exit_with_one() {
    assert_eq!(asmconv(&[]).status.code(), Some(1));
    assert_eq!(asmconv(&["--no-such-flag"]).status.code(), Some(1));
    assert_eq!(asmconv(&["--arch", "vax", "--reg", "1"]).status.code(), Some(1));
}

#[test]
fn processing_errors_exit_with_two() {
    let output = asmconv(&["testdata/does_not_exist.ops"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(str::from_utf8(&output.stderr).unwrap().contains("testdata/does_not_exist.ops"));
    assert_eq!(asmconv(&["--reg", "R0"]).status.code(), Some(2));
}

#[test]
fn version_and_env() {
    let output = asmconv(&["--version"]);
    assert_eq!(stdout(&output), format!("asmconv {}\n", env!("CARGO_PKG_VERSION")));
    let output = asmconv(&["--env"]);
    assert!(stdout(&output).contains("ASMCONV_ARM="));
}
