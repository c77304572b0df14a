//! The general n-row δ-LLL basis reduction.
//!
//! Follows the textbook size-reduce/Lovász-swap loop; the Gram–Schmidt data
//! is recomputed from the current basis at the head of every outer
//! iteration instead of updated in place. That trades an O(1) incremental
//! swap update for a simpler correctness argument: every claim this module
//! makes about `(Bs, M)` starts from a fresh, from-scratch orthogonalisation.

use std::cmp::Ordering;

use rug::Rational;

use crate::error::Result;
use crate::linalg::{gram_schmidt, GramSchmidtData, IntMatrix, Real};
use crate::timeout::Timeout;

/// δ-LLL-reduce the rows of `basis`, returning the reduced basis. `delta`
/// must lie in `(1/4, 1]`; the conventional choice is `3/4`. `precision`
/// controls the Gram–Schmidt arithmetic used internally (`None` for exact
/// rationals); it has no bearing on the (always-exact) result.
///
/// `timeout` is checked once per outer iteration; [`crate::error::Error::TimedOut`]
/// propagates the instant it is found elapsed, leaving no guarantee about
/// how close to reduced the partial basis is.
pub fn lll_reduce(basis: &IntMatrix, delta: f64, timeout: &Timeout, precision: Option<u32>) -> Result<IntMatrix> {
    assert!(delta > 0.25 && delta <= 1.0, "delta must lie in (1/4, 1]");

    let (n, _) = basis.dimensions();
    let mut b = basis.clone();
    if n <= 1 {
        return Ok(b);
    }

    let delta_real = Real::from_f64(delta, precision);
    let mut k = 1usize;

    while k < n {
        timeout.check()?;

        let (_, mu) = gram_schmidt(&b, precision);
        for j in (0..k).rev() {
            let c = mu[k][j].round();
            if c.cmp0() != Ordering::Equal {
                b[k] = b[k].sub(&b[j].scale(&c));
            }
        }

        let (bs, mu) = gram_schmidt(&b, precision);
        let norm_k = bs[k].norm2();
        let norm_km1 = bs[k - 1].norm2();
        let mu_k_km1 = mu[k][k - 1].clone();
        let lovasz_rhs = (delta_real.clone() - &(mu_k_km1.clone() * &mu_k_km1)) * &norm_km1;

        if norm_k >= lovasz_rhs {
            k += 1;
        } else {
            b.swap(k, k - 1);
            k = k.saturating_sub(1).max(1);
        }
    }

    Ok(b)
}

/// [`lll_reduce`] plus the Gram–Schmidt data of the result, at the same
/// `precision`, so callers (Babai, enumeration) don't recompute it.
pub fn lll_reduce_with_gso(
    basis: &IntMatrix,
    delta: f64,
    timeout: &Timeout,
    precision: Option<u32>,
) -> Result<(IntMatrix, GramSchmidtData)> {
    let reduced = lll_reduce(basis, delta, timeout, precision)?;
    let gso = gram_schmidt(&reduced, precision);
    Ok((reduced, gso))
}

/// `true` iff `basis` is already δ-LLL-reduced: every `|mu_ij| <= 1/2` for
/// `i > j`, and the Lovász condition holds between every consecutive pair of
/// Gram–Schmidt vectors.
pub fn is_lll_reduced(basis: &IntMatrix, delta: f64) -> bool {
    assert!(delta > 0.25 && delta <= 1.0, "delta must lie in (1/4, 1]");

    let (n, _) = basis.dimensions();
    if n <= 1 {
        return true;
    }

    let (bs, mu) = gram_schmidt(basis, None);
    let half = Real::Exact(Rational::from((1, 2)));
    for i in 0..n {
        for j in 0..i {
            if mu[i][j].abs() > half {
                return false;
            }
        }
    }

    let delta_real = Real::from_f64(delta, None);
    for k in 1..n {
        let norm_k = bs[k].norm2();
        let norm_km1 = bs[k - 1].norm2();
        let mu_k_km1 = mu[k][k - 1].clone();
        let rhs = (delta_real.clone() - &(mu_k_km1.clone() * &mu_k_km1)) * &norm_km1;
        if norm_k < rhs {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reduces_a_skewed_basis() {
        let basis = IntMatrix::from_i64_rows(vec![
            vec![1, 1, 1],
            vec![-1, 0, 2],
            vec![3, 5, 6],
        ]);
        let reduced = lll_reduce(&basis, 0.75, &Timeout::indefinite(), None).unwrap();
        assert!(is_lll_reduced(&reduced, 0.75));
    }

    #[test]
    fn already_reduced_basis_is_a_fixed_point() {
        let basis = IntMatrix::from_i64_rows(vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]]);
        assert!(is_lll_reduced(&basis, 0.75));
        let reduced = lll_reduce(&basis, 0.75, &Timeout::indefinite(), None).unwrap();
        assert_eq!(reduced, basis);
    }

    #[test]
    fn preserves_the_lattice_spanned() {
        // row reduction is a sequence of unimodular operations, so the
        // reduced basis must solve_left back to integer coefficients for
        // every original row.
        let basis = IntMatrix::from_i64_rows(vec![vec![10, 7], vec![1, 1]]);
        let reduced = lll_reduce(&basis, 0.75, &Timeout::indefinite(), None).unwrap();
        for i in 0..2 {
            assert!(crate::linalg::solve_left(&reduced, &basis[i]).unwrap().is_some());
        }
    }

    #[test]
    fn times_out_on_an_already_elapsed_deadline() {
        let basis = IntMatrix::from_i64_rows(vec![vec![10, 7], vec![1, 1]]);
        let result = lll_reduce(&basis, 0.75, &Timeout::after_seconds(-1), None);
        assert!(matches!(result, Err(crate::error::Error::TimedOut)));
    }
}
