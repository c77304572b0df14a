//! Matrices as an ordered sequence of row vectors (§3 `Matrix<T>`).

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use rug::Integer;

use super::vector::{IntVector, RealVector};

/// A matrix of `Integer` rows: used as a `LatticeBasis`.
#[derive(Clone, PartialEq)]
pub struct IntMatrix {
    rows: Vec<IntVector>,
    dimensions: (usize, usize),
}

impl IntMatrix {
    pub fn from_rows(rows: Vec<IntVector>) -> Self {
        let dimensions = match rows.first() {
            Some(r) => (rows.len(), r.dimension()),
            None => (0, 0),
        };
        for r in &rows {
            assert_eq!(r.dimension(), dimensions.1, "ragged matrix rows");
        }
        Self { rows, dimensions }
    }

    /// Build from literal integer rows, for tests and callers working with small examples.
    pub fn from_i64_rows(rows: Vec<Vec<i64>>) -> Self {
        Self::from_rows(
            rows.into_iter()
                .map(|row| IntVector::from_vec(row.into_iter().map(Integer::from).collect()))
                .collect(),
        )
    }

    pub fn identity(n: usize) -> Self {
        Self::from_rows((0..n).map(|i| IntVector::basis_vector(n, i)).collect())
    }

    /// (n, d): `n` rows, each of dimension `d`.
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    pub fn rows(&self) -> &[IntVector] {
        &self.rows
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        self.rows.swap(i, j);
    }

    pub fn insert(&mut self, from: usize, to: usize) {
        let v = self.rows.remove(from);
        self.rows.insert(to, v);
    }

    pub fn to_real(&self, precision: Option<u32>) -> RealMatrix {
        RealMatrix::from_rows(self.rows.iter().map(|r| r.to_real(precision)).collect())
    }
}

impl Index<usize> for IntMatrix {
    type Output = IntVector;
    fn index(&self, index: usize) -> &IntVector {
        &self.rows[index]
    }
}

impl IndexMut<usize> for IntMatrix {
    fn index_mut(&mut self, index: usize) -> &mut IntVector {
        &mut self.rows[index]
    }
}

impl fmt::Debug for IntMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{:?}", self.rows)
    }
}

/// A matrix of [`super::Real`] rows: used for Gram–Schmidt data `(Bs, M)`.
#[derive(Clone)]
pub struct RealMatrix {
    rows: Vec<RealVector>,
    dimensions: (usize, usize),
}

impl RealMatrix {
    pub fn from_rows(rows: Vec<RealVector>) -> Self {
        let dimensions = match rows.first() {
            Some(r) => (rows.len(), r.dimension()),
            None => (0, 0),
        };
        Self { rows, dimensions }
    }

    pub fn filled(n: usize, d: usize, precision: Option<u32>) -> Self {
        Self::from_rows((0..n).map(|_| RealVector::zero(d, precision)).collect())
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    pub fn rows(&self) -> &[RealVector] {
        &self.rows
    }
}

impl Index<usize> for RealMatrix {
    type Output = RealVector;
    fn index(&self, index: usize) -> &RealVector {
        &self.rows[index]
    }
}

impl IndexMut<usize> for RealMatrix {
    fn index_mut(&mut self, index: usize) -> &mut RealVector {
        &mut self.rows[index]
    }
}

impl fmt::Debug for RealMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{:?}", self.rows)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn identity_has_unit_rows() {
        let id = IntMatrix::identity(3);
        assert_eq!(id.dimensions(), (3, 3));
        assert_eq!(id[1][1], Integer::from(1));
        assert_eq!(id[1][0], Integer::from(0));
    }

    #[test]
    fn swap_exchanges_rows() {
        let mut m = IntMatrix::from_i64_rows(vec![vec![1, 0], vec![0, 1]]);
        m.swap(0, 1);
        assert_eq!(m[0], IntVector::from_vec(vec![Integer::from(0), Integer::from(1)]));
    }
}
