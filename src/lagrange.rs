//! Lagrange (Gauss) reduction of a 2-dimensional lattice basis.
//!
//! Used directly by the order-finding solver's 2D "lattice shortest vector"
//! method, and as the dimension-2 special case the general LLL reducer
//! falls back to conceptually.

use rug::{Integer, Rational};

use crate::linalg::{IntMatrix, IntVector};

fn round_div(n: &Integer, d: &Integer) -> Integer {
    assert!(d.cmp0() != std::cmp::Ordering::Equal, "division by a zero-norm vector");
    Integer::from(Rational::from((n.clone(), d.clone())).round_ref())
}

/// Lagrange-reduce the 2-row basis `a`, optionally seeding the search with
/// a prior row-multiple matrix `u0` (typically close to reduced already,
/// e.g. from an adjacent frequency offset, per §4.J).
///
/// Returns `(a', u')` with `a'` Lagrange-reduced, `a' = u' . a`, and
/// `det(u') = +-1`.
pub fn lagrange_reduce(a: &IntMatrix, u0: Option<&IntMatrix>) -> (IntMatrix, IntMatrix) {
    assert_eq!(a.dimensions().0, 2, "lagrange reduction operates on a 2-row basis");

    let mut b0 = a[0].clone();
    let mut b1 = a[1].clone();
    let mut w0 = u0.map(|u| u[0].clone()).unwrap_or_else(|| IntVector::basis_vector(2, 0));
    let mut w1 = u0.map(|u| u[1].clone()).unwrap_or_else(|| IntVector::basis_vector(2, 1));

    loop {
        if b1.norm2() < b0.norm2() {
            std::mem::swap(&mut b0, &mut b1);
            std::mem::swap(&mut w0, &mut w1);
        }

        let norm0 = b0.norm2();
        if norm0.cmp0() == std::cmp::Ordering::Equal {
            break;
        }

        let q = round_div(&b0.dot(&b1), &norm0);
        if q.cmp0() == std::cmp::Ordering::Equal {
            break;
        }

        b1 = b1.sub(&b0.scale(&q));
        w1 = w1.sub(&w0.scale(&q));
    }

    if b1.norm2() < b0.norm2() {
        std::mem::swap(&mut b0, &mut b1);
        std::mem::swap(&mut w0, &mut w1);
    }

    (IntMatrix::from_rows(vec![b0, b1]), IntMatrix::from_rows(vec![w0, w1]))
}

/// `||b0|| <= ||b1||` and `|<b0, b1>| <= ||b0||^2 / 2`.
pub fn is_lagrange_reduced(a: &IntMatrix) -> bool {
    assert_eq!(a.dimensions().0, 2);

    let norm0 = a[0].norm2();
    let norm1 = a[1].norm2();
    if norm0 > norm1 {
        return false;
    }

    let dot = a[0].dot(&a[1]);
    Integer::from(2 * dot.abs()) <= norm0
}

#[cfg(test)]
mod test {
    use super::*;

    fn det2(u: &IntMatrix) -> Integer {
        Integer::from(&u[0][0] * &u[1][1]) - Integer::from(&u[0][1] * &u[1][0])
    }

    fn mat_mul(u: &IntMatrix, a: &IntMatrix) -> IntMatrix {
        let rows: Vec<IntVector> = (0..2)
            .map(|i| {
                let mut acc = IntVector::zero(a.dimensions().1);
                for k in 0..2 {
                    acc = acc.add(&a[k].scale(&u[i][k]));
                }
                acc
            })
            .collect();
        IntMatrix::from_rows(rows)
    }

    #[test]
    fn reduces_a_skewed_basis() {
        let a = IntMatrix::from_i64_rows(vec![vec![1001, 1000], vec![1000, 999]]);
        let (reduced, u) = lagrange_reduce(&a, None);
        assert!(is_lagrange_reduced(&reduced));
        assert_eq!(mat_mul(&u, &a), reduced);
        assert_eq!(det2(&u).abs(), Integer::from(1));
    }

    #[test]
    fn already_reduced_basis_is_a_fixed_point() {
        let a = IntMatrix::from_i64_rows(vec![vec![2, 1], vec![-1, 2]]);
        assert!(is_lagrange_reduced(&a));
        let (reduced, _) = lagrange_reduce(&a, None);
        assert_eq!(reduced, a);
    }

    #[test]
    fn seeding_with_prior_u_gives_the_same_result() {
        let a = IntMatrix::from_i64_rows(vec![vec![12345, 100], vec![98765, 1]]);
        let (reduced_cold, _) = lagrange_reduce(&a, None);
        let warm_u = IntMatrix::identity(2);
        let (reduced_warm, _) = lagrange_reduce(&a, Some(&warm_u));
        assert_eq!(reduced_cold, reduced_warm);
    }
}
