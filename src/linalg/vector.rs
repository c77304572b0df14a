//! Row vectors over `Integer` or [`Real`] (§3 `Vector<T>`).
//!
//! Kept concrete per element type (`IntVector`, `RealVector`) rather than
//! generic over a shared `Coefficient` trait — the two element types used
//! here (`Integer`, `Real`) have different enough arithmetic (the latter is
//! itself a tagged union) that a shared trait would buy little.

use std::ops::{Index, IndexMut};

use rug::Integer;

use super::scalar::Real;

/// An ordered sequence of `Integer` coefficients: one row of a [`super::Matrix`].
#[derive(Clone, PartialEq, Debug)]
pub struct IntVector {
    coefficients: Vec<Integer>,
}

impl IntVector {
    pub fn from_vec(coefficients: Vec<Integer>) -> Self {
        Self { coefficients }
    }

    pub fn zero(dimension: usize) -> Self {
        Self {
            coefficients: vec![Integer::new(); dimension],
        }
    }

    pub fn basis_vector(dimension: usize, position: usize) -> Self {
        assert!(position < dimension);
        let mut coefficients = vec![Integer::new(); dimension];
        coefficients[position] = Integer::from(1);
        Self { coefficients }
    }

    pub fn dimension(&self) -> usize {
        self.coefficients.len()
    }

    pub fn as_slice(&self) -> &[Integer] {
        &self.coefficients
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|c| c.cmp0() == std::cmp::Ordering::Equal)
    }

    pub fn add(&self, other: &Self) -> Self {
        assert_eq!(self.dimension(), other.dimension());
        Self::from_vec(
            self.coefficients
                .iter()
                .zip(&other.coefficients)
                .map(|(a, b)| Integer::from(a + b))
                .collect(),
        )
    }

    pub fn sub(&self, other: &Self) -> Self {
        assert_eq!(self.dimension(), other.dimension());
        Self::from_vec(
            self.coefficients
                .iter()
                .zip(&other.coefficients)
                .map(|(a, b)| Integer::from(a - b))
                .collect(),
        )
    }

    pub fn neg(&self) -> Self {
        Self::from_vec(self.coefficients.iter().map(|a| Integer::from(-a)).collect())
    }

    /// Scale by an integer.
    pub fn scale(&self, factor: &Integer) -> Self {
        Self::from_vec(
            self.coefficients
                .iter()
                .map(|a| Integer::from(a * factor))
                .collect(),
        )
    }

    pub fn dot(&self, other: &Self) -> Integer {
        assert_eq!(self.dimension(), other.dimension());
        self.coefficients
            .iter()
            .zip(&other.coefficients)
            .map(|(a, b)| Integer::from(a * b))
            .sum()
    }

    pub fn norm2(&self) -> Integer {
        self.dot(self)
    }

    /// Reinterpret as a vector of [`Real`], at the given precision (exact if `None`).
    pub fn to_real(&self, precision: Option<u32>) -> RealVector {
        RealVector::from_vec(
            self.coefficients
                .iter()
                .map(|c| Real::from_integer(c, precision))
                .collect(),
        )
    }
}

impl Index<usize> for IntVector {
    type Output = Integer;
    fn index(&self, index: usize) -> &Integer {
        &self.coefficients[index]
    }
}

impl IndexMut<usize> for IntVector {
    fn index_mut(&mut self, index: usize) -> &mut Integer {
        &mut self.coefficients[index]
    }
}

/// An ordered sequence of [`Real`] coefficients, used for Gram–Schmidt data,
/// targets and lattice-vector coordinates during enumeration.
#[derive(Clone, Debug)]
pub struct RealVector {
    coefficients: Vec<Real>,
}

impl RealVector {
    pub fn from_vec(coefficients: Vec<Real>) -> Self {
        Self { coefficients }
    }

    pub fn zero(dimension: usize, precision: Option<u32>) -> Self {
        Self {
            coefficients: (0..dimension).map(|_| Real::zero(precision)).collect(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.coefficients.len()
    }

    pub fn as_slice(&self) -> &[Real] {
        &self.coefficients
    }

    pub fn add(&self, other: &Self) -> Self {
        assert_eq!(self.dimension(), other.dimension());
        Self::from_vec(
            self.coefficients
                .iter()
                .zip(&other.coefficients)
                .map(|(a, b)| a.clone() + b)
                .collect(),
        )
    }

    pub fn sub(&self, other: &Self) -> Self {
        assert_eq!(self.dimension(), other.dimension());
        Self::from_vec(
            self.coefficients
                .iter()
                .zip(&other.coefficients)
                .map(|(a, b)| a.clone() - b)
                .collect(),
        )
    }

    pub fn scale(&self, factor: &Real) -> Self {
        Self::from_vec(self.coefficients.iter().map(|a| a.clone() * factor).collect())
    }

    pub fn dot(&self, other: &Self) -> Real {
        assert_eq!(self.dimension(), other.dimension());
        let mut acc = Real::zero(self.coefficients.first().and_then(Real::precision));
        for (a, b) in self.coefficients.iter().zip(&other.coefficients) {
            acc = acc + &(a.clone() * b);
        }
        acc
    }

    pub fn norm2(&self) -> Real {
        self.dot(self)
    }
}

impl Index<usize> for RealVector {
    type Output = Real;
    fn index(&self, index: usize) -> &Real {
        &self.coefficients[index]
    }
}

impl IndexMut<usize> for RealVector {
    fn index_mut(&mut self, index: usize) -> &mut Real {
        &mut self.coefficients[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dot_and_norm_agree() {
        let v = IntVector::from_vec(vec![Integer::from(3), Integer::from(4)]);
        assert_eq!(v.norm2(), Integer::from(25));
    }

    #[test]
    fn add_sub_are_inverses() {
        let a = IntVector::from_vec(vec![Integer::from(1), Integer::from(2)]);
        let b = IntVector::from_vec(vec![Integer::from(5), Integer::from(-1)]);
        assert_eq!(a.add(&b).sub(&b), a);
    }
}
