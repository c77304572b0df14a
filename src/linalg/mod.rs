//! Exact linear algebra: matrix dimensions, inversion, left-solve,
//! dot products, norms and Gram–Schmidt orthogonalisation.

pub mod matrix;
pub mod scalar;
pub mod vector;

pub use matrix::{IntMatrix, RealMatrix};
pub use scalar::Real;
pub use vector::{IntVector, RealVector};

use rug::{Integer, Rational};

use crate::error::{Error, Result};

/// `(Bs, M)` as defined in §3: `Bs` is the orthogonalised row matrix and `M`
/// the lower-triangular matrix of projection coefficients with unit
/// diagonal, such that `B = M . Bs`.
pub type GramSchmidtData = (RealMatrix, RealMatrix);

/// Gram–Schmidt orthogonalisation of the rows of `basis`.
///
/// Entries are exact rationals when `precision` is `None`, otherwise
/// `Real::Approx` values at that precision.
pub fn gram_schmidt(basis: &IntMatrix, precision: Option<u32>) -> GramSchmidtData {
    let (n, d) = basis.dimensions();
    let mut bs = RealMatrix::filled(n, d, precision);
    let mut mu = RealMatrix::filled(n, n, precision);

    for i in 0..n {
        let b_i = basis[i].to_real(precision);
        mu[i][i] = Real::from_integer(&Integer::from(1), precision);

        let mut projection = b_i.clone();
        for j in 0..i {
            let bs_j = bs[j].clone();
            let norm_j = bs_j.norm2();
            let mu_ij = if norm_j.is_zero() {
                Real::zero(precision)
            } else {
                b_i.dot(&bs_j) / &norm_j
            };
            mu[i][j] = mu_ij.clone();
            projection = projection.sub(&bs_j.scale(&mu_ij));
        }
        bs[i] = projection;
    }

    (bs, mu)
}

/// Exact inverse of a square rational matrix, by Gauss-Jordan elimination.
///
/// Fails with [`Error::Singular`] when the matrix has no pivot in some
/// column, i.e. its determinant is zero.
pub fn invert(b: &[Vec<Rational>]) -> Result<Vec<Vec<Rational>>> {
    let n = b.len();
    assert!(b.iter().all(|row| row.len() == n), "invert requires a square matrix");

    let zero = Rational::new();
    let mut aug: Vec<Vec<Rational>> = (0..n)
        .map(|i| {
            let mut row = b[i].clone();
            row.extend((0..n).map(|j| Rational::from(if i == j { 1 } else { 0 })));
            row
        })
        .collect();

    for col in 0..n {
        let pivot_row = (col..n).find(|&r| aug[r][col] != zero);
        let pivot_row = match pivot_row {
            Some(r) => r,
            None => return Err(Error::Singular),
        };
        aug.swap(col, pivot_row);

        let pivot = aug[col][col].clone();
        for j in 0..2 * n {
            aug[col][j] /= pivot.clone();
        }

        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = aug[r][col].clone();
            if factor != zero {
                for j in 0..2 * n {
                    let sub = Rational::from(&factor * &aug[col][j]);
                    aug[r][j] -= sub;
                }
            }
        }
    }

    Ok((0..n).map(|i| aug[i][n..].to_vec()).collect())
}

/// Solve `c . b = o` for integer row vector `c`, given square integer matrix
/// `b` and integer row vector `o`. Returns `None` when `o . b^{-1}` is not
/// an integer vector (no such `c` exists over `Z`).
pub fn solve_left(b: &IntMatrix, o: &IntVector) -> Result<Option<IntVector>> {
    let (n, d) = b.dimensions();
    assert_eq!(n, d, "solve_left requires a square basis");
    assert_eq!(o.dimension(), n);

    let rational_rows: Vec<Vec<Rational>> = b
        .rows()
        .iter()
        .map(|row| row.as_slice().iter().map(Rational::from).collect())
        .collect();

    let inverse = invert(&rational_rows)?;

    // c_j = sum_i o_i * inverse[i][j]
    let mut c = Vec::with_capacity(n);
    for j in 0..n {
        let mut acc = Rational::new();
        for i in 0..n {
            acc += Rational::from(&o[i]) * &inverse[i][j];
        }
        if acc.denom() != &Integer::from(1) {
            return Ok(None);
        }
        c.push(acc.numer().clone());
    }

    Ok(Some(IntVector::from_vec(c)))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn invert_of_identity_is_identity() {
        let id = vec![
            vec![Rational::from(1), Rational::from(0)],
            vec![Rational::from(0), Rational::from(1)],
        ];
        let inv = invert(&id).unwrap();
        assert_eq!(inv, id);
    }

    #[test]
    fn invert_singular_fails() {
        let singular = vec![
            vec![Rational::from(1), Rational::from(2)],
            vec![Rational::from(2), Rational::from(4)],
        ];
        assert!(matches!(invert(&singular), Err(Error::Singular)));
    }

    #[test]
    fn solve_left_recovers_integer_combination() {
        // b = [[1,1],[0,1]], c = [2,3] => o = c.b = [2, 5]
        let b = IntMatrix::from_i64_rows(vec![vec![1, 1], vec![0, 1]]);
        let o = IntVector::from_vec(vec![Integer::from(2), Integer::from(5)]);
        let c = solve_left(&b, &o).unwrap().unwrap();
        assert_eq!(c, IntVector::from_vec(vec![Integer::from(2), Integer::from(3)]));
    }

    #[test]
    fn solve_left_absent_when_not_integral() {
        let b = IntMatrix::from_i64_rows(vec![vec![2, 0], vec![0, 2]]);
        let o = IntVector::from_vec(vec![Integer::from(1), Integer::from(1)]);
        assert_eq!(solve_left(&b, &o).unwrap(), None);
    }

    #[test]
    fn gram_schmidt_invariant_holds() {
        let basis = IntMatrix::from_i64_rows(vec![vec![1, 1], vec![-1, 0]]);
        let (bs, mu) = gram_schmidt(&basis, None);
        // b_1* = b_1 - mu_10 b_0*
        let reconstructed = bs[0].scale(&mu[1][0]).add(&bs[1]);
        let b1 = basis[1].to_real(None);
        for i in 0..2 {
            assert_eq!(reconstructed[i].round(), b1[i].round());
        }
        assert!(bs[0].norm2().to_f64() >= 0.0);
        assert!(bs[1].norm2().to_f64() >= 0.0);
    }
}
