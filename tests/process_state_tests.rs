/// Tests touching process-wide state: the installed registry and the
/// environment. Each runs in its own forked process.
extern crate asmconvlib;
#[macro_use]
extern crate rusty_fork;

use asmconvlib::backend;
use asmconvlib::env::{self, TargetConfig};
use asmconvlib::registry::{self, RegSpace};
use std::env as stdenv;

rusty_fork_test! {
    #[test]
    fn rconv_without_registry_uses_fallbacks() {
        assert!(registry::global().is_none());
        assert_eq!(registry::rconv(0), "NONE");
        assert_eq!(registry::rconv(3072), "R???3072");
    }

    #[test]
    fn installed_registry_is_write_once() {
        let space = backend::registry_with_all_backends().unwrap();
        assert!(registry::install(space).is_ok());
        assert_eq!(registry::rconv(3072), "R0");

        let mut other = RegSpace::new();
        other.register_range(3072, 3073, |_| "X".to_string()).unwrap();
        let rejected = registry::install(other).unwrap_err();
        assert_eq!(rejected.resolve_name(3072), "X");
        assert_eq!(registry::rconv(3072), "R0");
        assert_eq!(registry::global().unwrap().ranges().count(), 4);
    }

    #[test]
    fn target_config_reads_environment() {
        stdenv::set_var(env::OS_VAR, "plan9");
        stdenv::set_var(env::ARCH_VAR, "arm");
        stdenv::set_var(env::ARM_VAR, "5");
        stdenv::set_var(env::X86_FLOAT_VAR, "");
        let config = TargetConfig::from_env();
        assert_eq!(config.os, "plan9");
        assert_eq!(config.arch, "arm");
        assert_eq!(config.arm_version(), 5);
        assert_eq!(config.x86_float, "sse2");
        assert!(config.describe().contains(&"ASMCONV_OS=\"plan9\"".to_string()));
    }

    #[test]
    fn unset_variables_fall_back_to_host() {
        stdenv::remove_var(env::ARCH_VAR);
        stdenv::remove_var(env::ARM_VAR);
        let config = TargetConfig::from_env();
        assert_eq!(config.arch, env::host_arch());
        assert_eq!(config.arm_version(), 7);
        assert_eq!(env::env_or("ASMCONV_SURELY_UNSET", "fallback"), "fallback");
    }
}
