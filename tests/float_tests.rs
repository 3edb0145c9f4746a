/// Floating constants render with enough digits to read back exactly.
extern crate asmconvlib;
extern crate ieee754;
#[macro_use]
extern crate quickcheck;

use asmconvlib::format::fconv;
use ieee754::Ieee754;

fn parse_back(text: &str) -> f64 {
    text.parse().expect("rendered float parses")
}

quickcheck! {
    fn finite_values_round_trip(value: f64) -> bool {
        !value.is_finite() || parse_back(&fconv(value)).to_bits() == value.to_bits()
    }

    fn rendering_always_looks_floating(value: f64) -> bool {
        let text = fconv(value);
        text.contains('.') || text.contains('e')
    }

    fn adjacent_values_render_differently(value: f64) -> bool {
        if !value.is_finite() || value == ::std::f64::MAX {
            return true;
        }
        fconv(value) != fconv(value.next())
    }
}

#[test]
fn neighbours_of_one() {
    assert_eq!(fconv(1.0), "1.0");
    assert_eq!(fconv(1.0f64.next()), "1.0000000000000002");
    assert_eq!(fconv(1.0f64.prev()), "0.99999999999999989");
}

#[test]
fn smallest_subnormal_round_trips() {
    let tiny = 0.0f64.next();
    assert_eq!(parse_back(&fconv(tiny)), tiny);
}
