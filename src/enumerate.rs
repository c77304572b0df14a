//! Lattice point enumeration, closest-vector and shortest-vector search.
//!
//! `radius` in the surrounding documentation is always a *distance*; this
//! module works with its square throughout (`radius_sq`), since the exact
//! arithmetic backing [`Real`] has no general square root. Every public
//! entry point documents which quantity it expects.

use rug::Integer;

use crate::babai::babai_closest_vector;
use crate::error::{Error, Result};
use crate::linalg::{GramSchmidtData, IntMatrix, IntVector, Real, RealMatrix, RealVector};
use crate::timeout::Timeout;

fn combine(basis: &IntMatrix, coeffs: &[Integer]) -> IntVector {
    let (_, d) = basis.dimensions();
    let mut v = IntVector::zero(d);
    for (i, c) in coeffs.iter().enumerate() {
        v = v.add(&basis[i].scale(c));
    }
    v
}

/// `[lo, hi]` of integers within `sqrt(radius_sq_over_norm)` of `c`, or
/// `None` if the interval is empty. Widened by a small epsilon so a root
/// that lands exactly on an integer isn't lost to floating-point rounding.
fn interval_around(c: &Real, radius_sq_over_norm: &Real) -> Option<(i64, i64)> {
    if radius_sq_over_norm.is_negative() {
        return None;
    }
    let c_f = c.to_f64();
    let r_f = radius_sq_over_norm.to_f64().max(0.0).sqrt();
    let eps = 1e-9;
    let lo = (c_f - r_f - eps).ceil() as i64;
    let hi = (c_f + r_f + eps).floor() as i64;
    if lo > hi {
        None
    } else {
        Some((lo, hi))
    }
}

#[allow(clippy::too_many_arguments)]
fn enumerate_rec(
    level: isize,
    basis: &IntMatrix,
    bs: &RealMatrix,
    centre: &RealVector,
    accumulated: &RealVector,
    coeffs: &mut Vec<Integer>,
    remaining_radius_sq: &Real,
    precision: Option<u32>,
    timeout: &Timeout,
    results: &mut Vec<(IntVector, Vec<Integer>)>,
) -> Result<()> {
    timeout.check()?;

    if level < 0 {
        results.push((combine(basis, coeffs), coeffs.clone()));
        return Ok(());
    }

    let i = level as usize;
    let norm_i = bs[i].norm2();
    if norm_i.is_zero() {
        coeffs[i] = Integer::from(0);
        return enumerate_rec(
            level - 1,
            basis,
            bs,
            centre,
            accumulated,
            coeffs,
            remaining_radius_sq,
            precision,
            timeout,
            results,
        );
    }

    let diff = centre.sub(accumulated);
    let c_i = diff.dot(&bs[i]) / &norm_i;
    let r_sq_over_norm = remaining_radius_sq.clone() / &norm_i;

    let (lo, hi) = match interval_around(&c_i, &r_sq_over_norm) {
        Some(bounds) => bounds,
        None => return Ok(()),
    };

    let centre_i64 = c_i.round().to_i64().unwrap_or(0);
    let mut xs: Vec<i64> = (lo..=hi).collect();
    xs.sort_by_key(|&x| (x - centre_i64).abs());

    for x in xs {
        let x_int = Integer::from(x);
        let delta = Real::from_integer(&x_int, precision) - &c_i;
        let spent = delta.clone() * &delta * &norm_i;
        let new_remaining = remaining_radius_sq.clone() - &spent;
        if new_remaining.is_negative() {
            continue;
        }

        coeffs[i] = x_int.clone();
        let new_accumulated = accumulated.add(&basis[i].scale(&x_int).to_real(precision));
        enumerate_rec(
            level - 1,
            basis,
            bs,
            centre,
            &new_accumulated,
            coeffs,
            &new_remaining,
            precision,
            timeout,
            results,
        )?;
    }
    Ok(())
}

/// Every lattice vector `v` of `basis` with `||v - centre||^2 <= radius_sq`.
pub fn enumerate(
    basis: &IntMatrix,
    gs: &GramSchmidtData,
    centre: &RealVector,
    radius_sq: &Real,
    precision: Option<u32>,
    timeout: &Timeout,
) -> Result<Vec<IntVector>> {
    let (n, d) = basis.dimensions();
    let (bs, _mu) = gs;
    let mut coeffs = vec![Integer::from(0); n];
    let accumulated = RealVector::zero(d, precision);
    let mut results = Vec::new();
    enumerate_rec(
        n as isize - 1,
        basis,
        bs,
        centre,
        &accumulated,
        &mut coeffs,
        radius_sq,
        precision,
        timeout,
        &mut results,
    )?;
    Ok(results.into_iter().map(|(v, _)| v).collect())
}

/// The unique closest lattice vector to `target`, found by enumerating the
/// ball of Babai's estimate and keeping the strict minimiser.
pub fn solve_cvp(
    basis: &IntMatrix,
    gs: &GramSchmidtData,
    target: &RealVector,
    precision: Option<u32>,
    timeout: &Timeout,
) -> Result<IntVector> {
    let estimate = babai_closest_vector(basis, gs, target, precision);
    let dist_sq = target.sub(&estimate.to_real(precision)).norm2();

    let candidates = enumerate(basis, gs, target, &dist_sq, precision, timeout)?;
    let mut best = estimate;
    let mut best_dist = dist_sq;
    for v in candidates {
        let d = target.sub(&v.to_real(precision)).norm2();
        if d < best_dist {
            best_dist = d;
            best = v;
        }
    }
    Ok(best)
}

/// The non-zero lattice vector of minimum norm; ties broken by lexicographic
/// order of the integer coordinate vector in `basis`.
pub fn solve_svp(
    basis: &IntMatrix,
    gs: &GramSchmidtData,
    precision: Option<u32>,
    timeout: &Timeout,
) -> Result<IntVector> {
    let (n, d) = basis.dimensions();
    assert!(n > 0, "solve_svp requires a non-empty basis");

    let centre = RealVector::zero(d, precision);
    let radius_sq = Real::from_integer(&basis[0].norm2(), precision);
    let (bs, _mu) = gs;

    let mut coeffs = vec![Integer::from(0); n];
    let mut results = Vec::new();
    enumerate_rec(
        n as isize - 1,
        basis,
        bs,
        &centre,
        &centre,
        &mut coeffs,
        &radius_sq,
        precision,
        timeout,
        &mut results,
    )?;

    results
        .into_iter()
        .filter(|(v, _)| !v.is_zero())
        .min_by(|(a, ca), (b, cb)| a.norm2().cmp(&b.norm2()).then_with(|| ca.cmp(cb)))
        .map(|(v, _)| v)
        .ok_or_else(|| Error::DomainError("no non-zero vector found within the SVP search radius".into()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::linalg::gram_schmidt;

    #[test]
    fn enumerate_finds_the_centre_itself_at_radius_zero() {
        let basis = IntMatrix::from_i64_rows(vec![vec![1, 0], vec![0, 1]]);
        let gs = gram_schmidt(&basis, None);
        let centre = RealVector::from_vec(vec![
            Real::Exact(rug::Rational::from(2)),
            Real::Exact(rug::Rational::from(3)),
        ]);
        let found = enumerate(&basis, &gs, &centre, &Real::Exact(rug::Rational::from(0)), None, &Timeout::indefinite()).unwrap();
        assert_eq!(found, vec![IntVector::from_vec(vec![Integer::from(2), Integer::from(3)])]);
    }

    #[test]
    fn solve_cvp_matches_babai_on_an_orthogonal_basis() {
        let basis = IntMatrix::from_i64_rows(vec![vec![1, 0], vec![0, 1]]);
        let gs = gram_schmidt(&basis, None);
        let target = RealVector::from_vec(vec![
            Real::Exact(rug::Rational::from((21, 10))),
            Real::Exact(rug::Rational::from((-9, 10))),
        ]);
        let closest = solve_cvp(&basis, &gs, &target, None, &Timeout::indefinite()).unwrap();
        assert_eq!(closest, IntVector::from_vec(vec![Integer::from(2), Integer::from(-1)]));
    }

    #[test]
    fn solve_svp_finds_the_shortest_vector() {
        let basis = IntMatrix::from_i64_rows(vec![vec![2, 0], vec![1, 3]]);
        let gs = gram_schmidt(&basis, None);
        let shortest = solve_svp(&basis, &gs, None, &Timeout::indefinite()).unwrap();
        assert_eq!(shortest.norm2(), Integer::from(4));
    }
}
