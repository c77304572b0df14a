//! The opaque cyclic-group-element contract (§3, §9 "dynamic dispatch on
//! group elements → an abstraction"): solvers are generic over
//! [`CyclicGroupElement`], never over a concrete representation. Three
//! concrete implementations are provided, mirroring the variants the
//! original system dispatches on at runtime (integer-mod subgroup,
//! elliptic-curve point, simulated group of declared order).

use std::hash::{Hash, Hasher};

use rug::Integer;

/// A multiplicatively-written element of a cyclic group. The group itself
/// is never named in the trait: every method is defined relative to `self`
/// and its operand, which the caller guarantees belong to the same group.
pub trait CyclicGroupElement: Clone + PartialEq {
    fn multiply(&self, other: &Self) -> Self;
    fn invert(&self) -> Self;
    fn identity(&self) -> Self;
    fn is_identity(&self) -> bool;

    /// `self^exponent`, including negative exponents via [`Self::invert`].
    /// Square-and-multiply; `O(log exponent)` calls to `multiply`.
    fn power(&self, exponent: &Integer) -> Self {
        if exponent.cmp0() == std::cmp::Ordering::Less {
            return self.invert().power(&Integer::from(-exponent));
        }

        let mut base = self.clone();
        let mut e = exponent.clone();
        let mut acc = self.identity();
        while e.cmp0() == std::cmp::Ordering::Greater {
            if e.is_odd() {
                acc = acc.multiply(&base);
            }
            base = base.multiply(&base);
            e >>= 1;
        }
        acc
    }
}

/// An element of `(Z/NZ)*`, with multiplication and inversion taken modulo
/// `N`. Equality (and hashing) compares the canonical representative
/// `value mod N`, so the identity always compares equal regardless of which
/// representative (`1`, `N+1`, …) produced it.
#[derive(Clone, Debug)]
pub struct IntegerModN {
    value: Integer,
    modulus: Integer,
}

impl IntegerModN {
    pub fn new(value: Integer, modulus: Integer) -> Self {
        assert!(modulus.cmp0() == std::cmp::Ordering::Greater, "modulus must be positive");
        Self {
            value: value.rem_euc(modulus.clone()),
            modulus,
        }
    }

    pub fn value(&self) -> &Integer {
        &self.value
    }
}

impl PartialEq for IntegerModN {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus && self.value == other.value
    }
}
impl Eq for IntegerModN {}

impl Hash for IntegerModN {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.modulus.hash(state);
    }
}

impl CyclicGroupElement for IntegerModN {
    fn multiply(&self, other: &Self) -> Self {
        assert_eq!(self.modulus, other.modulus, "group elements from different moduli");
        Self::new(Integer::from(&self.value * &other.value), self.modulus.clone())
    }

    fn invert(&self) -> Self {
        let inv = self
            .value
            .clone()
            .invert(&self.modulus)
            .unwrap_or_else(|_| panic!("{} is not invertible mod {}", self.value, self.modulus));
        Self::new(inv, self.modulus.clone())
    }

    fn identity(&self) -> Self {
        Self::new(Integer::from(1), self.modulus.clone())
    }

    fn is_identity(&self) -> bool {
        self.value == 1
    }
}

/// A simulated cyclic group of declared order `r`, represented internally
/// as an additive exponent mod `r` but exposed through the same
/// multiplicative interface as every other variant. Used by test scenarios
/// and callers who want to exercise the solvers against a group of known
/// order without paying for real arithmetic.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SimulatedGroupElement {
    exponent: Integer,
    order: Integer,
}

impl SimulatedGroupElement {
    pub fn generator(order: Integer) -> Self {
        assert!(order.cmp0() == std::cmp::Ordering::Greater, "order must be positive");
        Self {
            exponent: Integer::from(1),
            order,
        }
    }

    pub fn order(&self) -> &Integer {
        &self.order
    }
}

impl CyclicGroupElement for SimulatedGroupElement {
    fn multiply(&self, other: &Self) -> Self {
        assert_eq!(self.order, other.order, "group elements from different declared orders");
        Self {
            exponent: Integer::from(&self.exponent + &other.exponent).rem_euc(self.order.clone()),
            order: self.order.clone(),
        }
    }

    fn invert(&self) -> Self {
        Self {
            exponent: Integer::from(-&self.exponent).rem_euc(self.order.clone()),
            order: self.order.clone(),
        }
    }

    fn identity(&self) -> Self {
        Self {
            exponent: Integer::from(0),
            order: self.order.clone(),
        }
    }

    fn is_identity(&self) -> bool {
        self.exponent.cmp0() == std::cmp::Ordering::Equal
    }
}

/// A point on the short Weierstrass curve `y^2 = x^3 + a x + b (mod p)`,
/// written multiplicatively per §9's note that elliptic-curve points are
/// "exposed as multiplicative" even though the underlying operation is
/// point addition. `p` is assumed prime; no curve-validity check is
/// performed on construction — callers, not this module, own their inputs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WeierstrassPoint {
    Infinity { a: Integer, p: Integer },
    Affine { x: Integer, y: Integer, a: Integer, p: Integer },
}

impl WeierstrassPoint {
    pub fn infinity(a: Integer, p: Integer) -> Self {
        WeierstrassPoint::Infinity { a, p }
    }

    pub fn affine(x: Integer, y: Integer, a: Integer, p: Integer) -> Self {
        WeierstrassPoint::Affine { x, y, a, p }
    }

    fn curve(&self) -> (&Integer, &Integer) {
        match self {
            WeierstrassPoint::Infinity { a, p } => (a, p),
            WeierstrassPoint::Affine { a, p, .. } => (a, p),
        }
    }
}

impl CyclicGroupElement for WeierstrassPoint {
    fn multiply(&self, other: &Self) -> Self {
        let (a, p) = self.curve();
        assert_eq!((a, p), other.curve(), "points from different curves");

        match (self, other) {
            (WeierstrassPoint::Infinity { .. }, _) => other.clone(),
            (_, WeierstrassPoint::Infinity { .. }) => self.clone(),
            (WeierstrassPoint::Affine { x: x1, y: y1, .. }, WeierstrassPoint::Affine { x: x2, y: y2, .. }) => {
                if x1 == x2 && Integer::from(y1 + y2).rem_euc(p.clone()) == 0 {
                    return WeierstrassPoint::Infinity { a: a.clone(), p: p.clone() };
                }

                let lambda_raw = if x1 == x2 {
                    let x1_sq = Integer::from(x1 * x1);
                    let num = Integer::from(Integer::from(&x1_sq * 3) + a);
                    let den = Integer::from(y1 * 2);
                    Integer::from(num * den.invert(p).expect("non-singular curve"))
                } else {
                    let num = Integer::from(y2 - y1);
                    let den = Integer::from(x2 - x1);
                    Integer::from(num * den.invert(p).expect("distinct x-coordinates are coprime to p"))
                };
                let lambda = lambda_raw.rem_euc(p.clone());

                let x3 = (Integer::from(&lambda * &lambda) - x1 - x2).rem_euc(p.clone());
                let y3 = (Integer::from(&lambda * Integer::from(x1 - &x3)) - y1).rem_euc(p.clone());
                WeierstrassPoint::Affine { x: x3, y: y3, a: a.clone(), p: p.clone() }
            }
        }
    }

    fn invert(&self) -> Self {
        match self {
            WeierstrassPoint::Infinity { .. } => self.clone(),
            WeierstrassPoint::Affine { x, y, a, p } => {
                WeierstrassPoint::Affine { x: x.clone(), y: Integer::from(-y).rem_euc(p.clone()), a: a.clone(), p: p.clone() }
            }
        }
    }

    fn identity(&self) -> Self {
        let (a, p) = self.curve();
        WeierstrassPoint::Infinity { a: a.clone(), p: p.clone() }
    }

    fn is_identity(&self) -> bool {
        matches!(self, WeierstrassPoint::Infinity { .. })
    }
}
