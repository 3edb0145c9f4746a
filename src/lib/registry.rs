//! Register namespace registry.
//!
//! Each architecture backend claims a half-open range of global register ids
//! and supplies the function that names the ids inside it. Resolution is a
//! linear scan in registration order; there are few enough architectures that
//! sorting the ranges would not pay for itself.

use std::fmt;
use std::sync::OnceLock;

/// Register id 0 is never a register.
pub const REG_NONE: i32 = 0;

// Each register space should start at 0 modulo some power of 2, because
// the encoders mask register numbers.
pub const RBASE_386: i32 = 1 * 1024;
pub const RBASE_AMD64: i32 = 2 * 1024;
pub const RBASE_ARM: i32 = 3 * 1024;
pub const RBASE_PPC64: i32 = 4 * 1024;
// The next free base is 8*1024 (PPC64 has many registers).

pub type Rconv = Box<dyn Fn(i32) -> String + Send + Sync>;

struct RegSet {
    lo: i32,
    hi: i32,
    rconv: Rconv,
}

impl RegSet {
    fn contains(&self, reg: i32) -> bool {
        self.lo <= reg && reg < self.hi
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    EmptyRange { lo: i32, hi: i32 },
    Overlap { lo: i32, hi: i32, existing_lo: i32, existing_hi: i32 },
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RegisterError::EmptyRange { lo, hi } =>
                write!(f, "register range [{}, {}) is empty", lo, hi),
            RegisterError::Overlap { lo, hi, existing_lo, existing_hi } =>
                write!(f, "register range [{}, {}) overlaps registered range [{}, {})",
                       lo, hi, existing_lo, existing_hi),
        }
    }
}

impl std::error::Error for RegisterError {}

/// An append-only set of register ranges. Ranges never overlap: a
/// registration that would shadow part of an earlier range is rejected.
#[derive(Default)]
pub struct RegSpace {
    sets: Vec<RegSet>,
}

impl RegSpace {
    pub fn new() -> RegSpace {
        RegSpace { sets: vec![] }
    }

    /// Binds `rconv` to the register ids `lo` through `hi - 1`.
    pub fn register_range<F>(&mut self, lo: i32, hi: i32, rconv: F) -> Result<(), RegisterError>
        where F: Fn(i32) -> String + Send + Sync + 'static
    {
        if lo >= hi {
            return Err(RegisterError::EmptyRange { lo, hi });
        }
        if let Some(existing) = self.sets.iter().find(|rs| lo < rs.hi && rs.lo < hi) {
            return Err(RegisterError::Overlap {
                lo,
                hi,
                existing_lo: existing.lo,
                existing_hi: existing.hi,
            });
        }
        self.sets.push(RegSet { lo, hi, rconv: Box::new(rconv) });
        Ok(())
    }

    pub fn resolve_name(&self, reg: i32) -> String {
        if reg == REG_NONE {
            return "NONE".to_string();
        }
        match self.sets.iter().find(|rs| rs.contains(reg)) {
            Some(rs) => (rs.rconv)(reg),
            None => format!("R???{}", reg),
        }
    }

    /// Reverse of `resolve_name`: the first id whose rendered name is `name`.
    pub fn lookup(&self, name: &str) -> Option<i32> {
        if name == "NONE" {
            return Some(REG_NONE);
        }
        self.sets
            .iter()
            .flat_map(|rs| (rs.lo..rs.hi).map(move |reg| (reg, rs)))
            .find(|&(reg, rs)| reg != REG_NONE && (rs.rconv)(reg) == name)
            .map(|(reg, _)| reg)
    }

    /// Like `lookup`, but only considers ids in `[lo, hi)`. Architectures
    /// reuse register names, so this is how a name is pinned to one of them.
    pub fn lookup_within(&self, name: &str, lo: i32, hi: i32) -> Option<i32> {
        (lo..hi).find(|&reg| {
            reg != REG_NONE
                && self.sets.iter().any(|rs| rs.contains(reg))
                && self.resolve_name(reg) == name
        })
    }

    pub fn ranges<'a>(&'a self) -> impl Iterator<Item = (i32, i32)> + 'a {
        self.sets.iter().map(|rs| (rs.lo, rs.hi))
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl fmt::Debug for RegSpace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.sets.iter().map(|rs| rs.lo..rs.hi))
            .finish()
    }
}

static GLOBAL: OnceLock<RegSpace> = OnceLock::new();

/// Installs the process-wide registry. Only the first call succeeds; later
/// calls hand their registry back unchanged.
pub fn install(space: RegSpace) -> Result<(), RegSpace> {
    GLOBAL.set(space)
}

pub fn global() -> Option<&'static RegSpace> {
    GLOBAL.get()
}

/// Resolves through the process-wide registry, or an empty one if nothing
/// has been installed yet.
pub fn rconv(reg: i32) -> String {
    match global() {
        Some(space) => space.resolve_name(reg),
        None => RegSpace::new().resolve_name(reg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(tag: &'static str) -> impl Fn(i32) -> String + Send + Sync + 'static {
        move |reg| format!("{}{}", tag, reg)
    }

    #[test]
    fn none_is_reserved() {
        let mut space = RegSpace::new();
        space.register_range(0, 10, tagged("A")).unwrap();
        assert_eq!(space.resolve_name(0), "NONE");
        assert_eq!(space.resolve_name(3), "A3");
    }

    #[test]
    fn overlap_is_rejected_and_first_range_kept() {
        let mut space = RegSpace::new();
        space.register_range(0, 10, tagged("A")).unwrap();
        let err = space.register_range(5, 15, tagged("B")).unwrap_err();
        assert_eq!(err, RegisterError::Overlap { lo: 5, hi: 15, existing_lo: 0, existing_hi: 10 });
        assert_eq!(space.resolve_name(7), "A7");
        assert_eq!(space.resolve_name(12), "R???12");
        assert_eq!(space.ranges().collect::<Vec<_>>(), vec![(0, 10)]);
    }

    #[test]
    fn adjacent_ranges_do_not_overlap() {
        let mut space = RegSpace::new();
        space.register_range(10, 20, tagged("A")).unwrap();
        space.register_range(20, 30, tagged("B")).unwrap();
        space.register_range(1, 10, tagged("C")).unwrap();
        assert_eq!(space.resolve_name(19), "A19");
        assert_eq!(space.resolve_name(20), "B20");
        assert_eq!(space.resolve_name(1), "C1");
    }

    #[test]
    fn empty_range_is_rejected() {
        let mut space = RegSpace::new();
        assert_eq!(space.register_range(8, 8, tagged("A")),
                   Err(RegisterError::EmptyRange { lo: 8, hi: 8 }));
        assert!(space.is_empty());
    }

    #[test]
    fn lookup_reverses_resolve() {
        let mut space = RegSpace::new();
        space.register_range(100, 104, tagged("X")).unwrap();
        assert_eq!(space.lookup("X102"), Some(102));
        assert_eq!(space.lookup("NONE"), Some(REG_NONE));
        assert_eq!(space.lookup("Y1"), None);
    }

    #[test]
    fn lookup_within_picks_the_named_range() {
        let mut space = RegSpace::new();
        space.register_range(10, 20, |r| format!("R{}", r % 10)).unwrap();
        space.register_range(20, 30, |r| format!("R{}", r % 10)).unwrap();
        assert_eq!(space.lookup("R3"), Some(13));
        assert_eq!(space.lookup_within("R3", 20, 30), Some(23));
        assert_eq!(space.lookup_within("R3", 30, 40), None);
    }

    #[test]
    fn error_messages() {
        let err = RegisterError::Overlap { lo: 5, hi: 15, existing_lo: 0, existing_hi: 10 };
        assert_eq!(format!("{}", err), "register range [5, 15) overlaps registered range [0, 10)");
    }
}
