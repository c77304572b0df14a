//! The "either exact rational, or Float(p)" entry type used by Gram–Schmidt
//! data, Babai's estimator and the LLL reducer (§3 `GramSchmidtData`, §9
//! "exact rationals and arbitrary-precision arithmetic").
//!
//! The source system makes this a compile-time generic choice where the
//! host language allows it. Rust's trait system could express it too, but
//! every caller here needs to flip between the two at a single runtime
//! decision point (whether the caller passed a `precision`), so this is the
//! tag-dispatch fallback the design notes call out explicitly: an internal
//! enum, not a generic parameter.

use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};

use rug::{Float, Integer, Rational};

/// Either an exact rational, or a `Float` of fixed precision.
///
/// Arithmetic between two `Approx` values of differing precision promotes
/// to the larger of the two. Mixing `Exact` and `Approx` promotes the exact
/// operand to the approximate one's precision; this only happens at the
/// edges of a computation (e.g. comparing an exact delta threshold against
/// an approximate norm) and never silently drops precision below what the
/// caller asked for.
#[derive(Clone, Debug)]
pub enum Real {
    Exact(Rational),
    Approx(Float),
}

impl Real {
    pub fn from_integer(n: &Integer, precision: Option<u32>) -> Self {
        match precision {
            None => Real::Exact(Rational::from(n)),
            Some(p) => Real::Approx(Float::with_val(p, n)),
        }
    }

    pub fn zero(precision: Option<u32>) -> Self {
        match precision {
            None => Real::Exact(Rational::new()),
            Some(p) => Real::Approx(Float::with_val(p, 0)),
        }
    }

    pub fn from_f64(value: f64, precision: Option<u32>) -> Self {
        match precision {
            None => Real::Exact(Rational::from_f64(value).expect("finite f64")),
            Some(p) => Real::Approx(Float::with_val(p, value)),
        }
    }

    pub fn precision(&self) -> Option<u32> {
        match self {
            Real::Exact(_) => None,
            Real::Approx(f) => Some(f.prec()),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Real::Exact(r) => r.cmp0() == Ordering::Equal,
            Real::Approx(f) => f.is_zero(),
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Real::Exact(r) => r.cmp0() == Ordering::Less,
            Real::Approx(f) => f.is_sign_negative() && !f.is_zero(),
        }
    }

    /// Round-half-away-from-zero, as required by Babai's estimator.
    pub fn round(&self) -> Integer {
        let r = match self {
            Real::Exact(r) => r.clone(),
            Real::Approx(f) => f.to_rational().unwrap_or_default(),
        };
        Integer::from(r.round_ref())
    }

    pub fn abs(&self) -> Real {
        match self {
            Real::Exact(r) => Real::Exact(r.clone().abs()),
            Real::Approx(f) => Real::Approx(f.clone().abs()),
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Real::Exact(r) => r.to_f64(),
            Real::Approx(f) => f.to_f64(),
        }
    }

    fn common_precision(a: &Real, b: &Real) -> Option<u32> {
        match (a.precision(), b.precision()) {
            (None, None) => None,
            (Some(p), None) | (None, Some(p)) => Some(p),
            (Some(p1), Some(p2)) => Some(p1.max(p2)),
        }
    }

    fn as_float(&self, precision: u32) -> Float {
        match self {
            Real::Exact(r) => Float::with_val(precision, r),
            Real::Approx(f) => Float::with_val(precision, &*f),
        }
    }
}

impl From<&Integer> for Real {
    fn from(n: &Integer) -> Self {
        Real::from_integer(n, None)
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<&Real> for Real {
            type Output = Real;
            fn $method(self, other: &Real) -> Real {
                match (self, other) {
                    (Real::Exact(a), Real::Exact(b)) => Real::Exact(a.$method(b)),
                    (a, b) => {
                        let p = Real::common_precision(&a, b)
                            .expect("at least one approximate operand carries a precision");
                        Real::Approx(a.as_float(p).$method(b.as_float(p)))
                    }
                }
            }
        }

        impl $trait<Real> for Real {
            type Output = Real;
            fn $method(self, other: Real) -> Real {
                $trait::$method(self, &other)
            }
        }
    };
}

impl_binop!(Add, add);
impl_binop!(Sub, sub);
impl_binop!(Mul, mul);
impl_binop!(Div, div);

impl Neg for Real {
    type Output = Real;
    fn neg(self) -> Real {
        match self {
            Real::Exact(r) => Real::Exact(-r),
            Real::Approx(f) => Real::Approx(-f),
        }
    }
}

impl PartialEq for Real {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Real {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Real::Exact(a), Real::Exact(b)) => a.partial_cmp(b),
            _ => {
                let p = Real::common_precision(self, other)?;
                self.as_float(p).partial_cmp(&other.as_float(p))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exact_arithmetic_is_exact() {
        let a = Real::from_integer(&Integer::from(7), None);
        let b = Real::from_integer(&Integer::from(3), None);
        let sum = a.clone() + &b;
        assert_eq!(sum.round(), Integer::from(10));
        let ratio = a / &b;
        // 7/3 rounds (half away from zero) to 2
        assert_eq!(ratio.round(), Integer::from(2));
    }

    #[test]
    fn approx_respects_requested_precision() {
        let a = Real::from_integer(&Integer::from(1), Some(64));
        assert_eq!(a.precision(), Some(64));
    }

    #[test]
    fn round_half_away_from_zero() {
        let half = Real::Exact(Rational::from((1, 2)));
        assert_eq!(half.round(), Integer::from(1));
        let neg_half = Real::Exact(Rational::from((-1, 2)));
        assert_eq!(neg_half.round(), Integer::from(-1));
    }

    #[test]
    fn ordering_across_exact_values() {
        let a = Real::from_integer(&Integer::from(2), None);
        let b = Real::from_integer(&Integer::from(3), None);
        assert!(a < b);
    }
}
