//! Babai's nearest-plane algorithm: a deterministic closest-vector
//! estimator given a reduced basis and its Gram–Schmidt data.

use rug::Integer;

use crate::linalg::{GramSchmidtData, IntMatrix, IntVector, Real, RealVector};

/// Starting from `target`, for `i` from `n` down to `1`, subtract
/// `round(<current, b_i*> / ||b_i*||^2) . b_i`. The returned vector is the
/// accumulated integer combination of the rows of `basis` — a lattice
/// vector close to `target`.
///
/// `precision` must match the precision `gs` was computed at (`None` for
/// exact rationals). The only failure-free edge case is an empty basis,
/// for which the zero vector of `target`'s dimension is returned.
pub fn babai_closest_vector(
    basis: &IntMatrix,
    gs: &GramSchmidtData,
    target: &RealVector,
    precision: Option<u32>,
) -> IntVector {
    let (bs, _mu) = gs;
    let (n, d) = basis.dimensions();

    if n == 0 {
        return IntVector::zero(target.dimension());
    }

    let mut residual = target.clone();
    let mut coefficients = vec![Integer::from(0); n];

    for i in (0..n).rev() {
        let b_star_i = &bs[i];
        let norm2 = b_star_i.norm2();
        if norm2.is_zero() {
            // basis[i] lay in the span of the earlier rows; no component to remove.
            continue;
        }

        let projection = residual.dot(b_star_i) / &norm2;
        let c = projection.round();

        let b_i_real = basis[i].to_real(precision);
        residual = residual.sub(&b_i_real.scale(&Real::from_integer(&c, precision)));
        coefficients[i] = c;
    }

    let mut result = IntVector::zero(d);
    for i in 0..n {
        result = result.add(&basis[i].scale(&coefficients[i]));
    }
    result
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::linalg::gram_schmidt;

    #[test]
    fn recovers_an_exact_lattice_point() {
        let basis = IntMatrix::from_i64_rows(vec![vec![2, 1], vec![-1, 2]]);
        let gs = gram_schmidt(&basis, None);

        // target = 3*b0 - 1*b1 exactly
        let exact = basis[0].scale(&Integer::from(3)).sub(&basis[1].scale(&Integer::from(1)));
        let target = exact.to_real(None);

        let closest = babai_closest_vector(&basis, &gs, &target, None);
        assert_eq!(closest, exact);
    }

    #[test]
    fn moves_a_perturbed_target_back_onto_the_lattice() {
        let basis = IntMatrix::from_i64_rows(vec![vec![1, 0], vec![0, 1]]);
        let gs = gram_schmidt(&basis, None);

        let target = crate::linalg::RealVector::from_vec(vec![
            Real::Exact(rug::Rational::from((21, 10))),
            Real::Exact(rug::Rational::from((-9, 10))),
        ]);
        let closest = babai_closest_vector(&basis, &gs, &target, None);
        assert_eq!(closest, IntVector::from_vec(vec![Integer::from(2), Integer::from(-1)]));
    }
}
