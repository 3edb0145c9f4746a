//! Toolchain configuration read from the environment.
//!
//! Every setting falls back to a default derived from the host when its
//! variable is unset or empty.

use std::env;
use std::sync::OnceLock;
use std::time::Instant;

pub const ROOT_VAR: &str = "ASMCONV_ROOT";
pub const OS_VAR: &str = "ASMCONV_OS";
pub const ARCH_VAR: &str = "ASMCONV_ARCH";
pub const ARM_VAR: &str = "ASMCONV_ARM";
pub const X86_FLOAT_VAR: &str = "ASMCONV_386";

const DEFAULT_ARM: &str = "7";
const DEFAULT_X86_FLOAT: &str = "sse2";

pub fn env_or(key: &str, value: &str) -> String {
    match env::var(key) {
        Ok(ref x) if !x.is_empty() => x.clone(),
        _ => value.to_string(),
    }
}

/// Leading-sign decimal parse that yields 0 instead of an error.
pub fn atoi(s: &str) -> i32 {
    s.trim().parse().unwrap_or(0)
}

static START: OnceLock<Instant> = OnceLock::new();

/// Starts the process clock read by `cputime`. Later calls do nothing.
pub fn start_clock() {
    START.get_or_init(Instant::now);
}

/// Seconds since `start_clock`, or since the first call if the clock was
/// never started.
pub fn cputime() -> f64 {
    START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Host architecture under the names the backends register as.
pub fn host_arch() -> &'static str {
    match env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "arm" => "arm",
        "powerpc64" => "ppc64",
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    pub root: String,
    pub os: String,
    pub arch: String,
    /// ARM architecture version, e.g. "5", "6" or "7".
    pub arm: String,
    /// Floating point mode for 386: "387" or "sse2".
    pub x86_float: String,
}

impl TargetConfig {
    pub fn from_env() -> TargetConfig {
        TargetConfig {
            root: env_or(ROOT_VAR, env!("CARGO_MANIFEST_DIR")),
            os: env_or(OS_VAR, env::consts::OS),
            arch: env_or(ARCH_VAR, host_arch()),
            arm: env_or(ARM_VAR, DEFAULT_ARM),
            x86_float: env_or(X86_FLOAT_VAR, DEFAULT_X86_FLOAT),
        }
    }

    pub fn arm_version(&self) -> i32 {
        atoi(&self.arm)
    }

    /// `KEY="value"` lines, one per setting.
    pub fn describe(&self) -> Vec<String> {
        vec![
            format!("{}=\"{}\"", ROOT_VAR, self.root),
            format!("{}=\"{}\"", OS_VAR, self.os),
            format!("{}=\"{}\"", ARCH_VAR, self.arch),
            format!("{}=\"{}\"", ARM_VAR, self.arm),
            format!("{}=\"{}\"", X86_FLOAT_VAR, self.x86_float),
        ]
    }
}

#[test]
fn atoi_is_lenient() {
    assert_eq!(atoi("7"), 7);
    assert_eq!(atoi(" -12 "), -12);
    assert_eq!(atoi("7a"), 0);
    assert_eq!(atoi(""), 0);
}

#[test]
fn host_arch_names_a_known_backend_on_supported_hosts() {
    if cfg!(target_arch = "x86_64") {
        assert_eq!(host_arch(), "amd64");
    }
}

#[test]
fn cputime_only_moves_forward() {
    start_clock();
    let first = cputime();
    ::std::thread::sleep(::std::time::Duration::from_millis(5));
    let second = cputime();
    assert!(first >= 0.0);
    assert!(second - first >= 0.004);
}
