use crate::CoreError;

/// Floating point type used throughout the calculators
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-6,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Round to a fixed number of decimal places for display.
///
/// Calculator outputs are display quantities, so rounding happens at the
/// engine boundary rather than in the presentation layer.
pub fn round_to(v: Real, decimals: u32) -> Real {
    let factor = 10_f64.powi(decimals as i32);
    (v * factor).round() / factor
}

/// Round to the nearest whole number (imbalance percentages).
pub fn round_whole(v: Real) -> Real {
    v.round()
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn round_to_display_precision() {
        assert_eq!(round_to(13.649, 1), 13.6);
        assert_eq!(round_to(13.65001, 1), 13.7);
        assert_eq!(round_whole(49.6), 50.0);
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }
}
