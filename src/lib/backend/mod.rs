pub mod arm;
pub mod ppc64;
pub mod x86;

use std::sync::Arc;

use env::TargetConfig;
use getopts::{Matches, Options};
use linked_hash_set::LinkedHashSet;
use registry::{RegSpace, RegisterError};

/// An architecture that owns a slice of the global register id space and
/// knows how to name the ids in it.
pub trait Backend: Send + Sync {
    fn arch(&self) -> &'static str;

    /// Half-open range `[lo, hi)` of register ids this backend names.
    fn register_range(&self) -> (i32, i32);

    fn rconv(&self, reg: i32) -> String;
}

pub const ARCHES: &[&str] = &["386", "amd64", "arm", "ppc64"];

pub fn backend_for_arch(arch: &str) -> Option<Arc<dyn Backend>> {
    match arch {
        "386" => Some(Arc::new(x86::X86Backend::i386())),
        "amd64" => Some(Arc::new(x86::X86Backend::amd64())),
        "arm" => Some(Arc::new(arm::ARMBackend {})),
        "ppc64" | "ppc64le" => Some(Arc::new(ppc64::PPC64Backend {})),
        _ => None,
    }
}

pub fn all_backends() -> Vec<Arc<dyn Backend>> {
    ARCHES.iter().filter_map(|arch| backend_for_arch(arch)).collect()
}

pub fn register_backend(space: &mut RegSpace, backend: Arc<dyn Backend>) -> Result<(), RegisterError> {
    let (lo, hi) = backend.register_range();
    space.register_range(lo, hi, move |reg| backend.rconv(reg))
}

pub fn register_backends(backends: &[Arc<dyn Backend>]) -> Result<RegSpace, RegisterError> {
    let mut space = RegSpace::new();
    for backend in backends {
        register_backend(&mut space, backend.clone())?;
    }
    Ok(space)
}

pub fn registry_with_all_backends() -> Result<RegSpace, RegisterError> {
    register_backends(&all_backends())
}

pub fn register_cli_options(options: &mut Options) {
    options.optopt(
        "a",
        "arch",
        "comma-separated architectures whose registers to name, in registration order (default: all)",
        "all|host|386|amd64|arm|ppc64",
    );
}

/// Decodes `--arch`. Repeated names are registered once, at their first
/// position; `host` stands for the configured target architecture.
pub fn init_from_cli_options(matches: &Matches, config: &TargetConfig) -> Result<Vec<Arc<dyn Backend>>, String> {
    let choice = matches.opt_str("arch").unwrap_or_else(|| "all".to_string());

    let mut names = LinkedHashSet::new();
    for name in choice.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match name {
            "all" => {
                for arch in ARCHES {
                    names.insert_if_absent(arch.to_string());
                }
            }
            "host" => {
                names.insert_if_absent(config.arch.clone());
            }
            other => {
                names.insert_if_absent(other.to_string());
            }
        }
    }

    if names.is_empty() {
        return Err("No architecture was specified".to_string());
    }

    // Aliases such as ppc64le resolve to a backend already chosen by name.
    let mut arches = LinkedHashSet::new();
    let mut backends = vec![];
    for name in names.iter() {
        let backend = backend_for_arch(name)
            .ok_or_else(|| format!("Unrecognized architecture: {}", name))?;
        if arches.insert(backend.arch()) {
            backends.push(backend);
        }
    }
    Ok(backends)
}

#[test]
fn every_arch_has_a_backend() {
    for arch in ARCHES {
        let backend = backend_for_arch(arch).expect("backend");
        assert_eq!(backend.arch(), *arch);
    }
}

#[test]
fn all_backends_register_disjoint_ranges() {
    let space = registry_with_all_backends().unwrap();
    assert_eq!(space.ranges().count(), ARCHES.len());
}
