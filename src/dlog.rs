//! Discrete-logarithm solvers: Ekerå–Håstad short-DL lattice methods
//! and the general DL-given-r grid search.

use rug::Integer;

use crate::arith::truncmod;
use crate::babai::babai_closest_vector;
use crate::enumerate::{enumerate, solve_cvp};
use crate::error::{Error, Result};
use crate::group::CyclicGroupElement;
use crate::lagrange::lagrange_reduce;
use crate::linalg::{gram_schmidt, IntMatrix, IntVector, Real, RealVector};
use crate::lll::lll_reduce_with_gso;
use crate::timeout::Timeout;

/// Enumeration strategy shared by the multi-pair DL solvers (§6
/// `EnumerationOptions`, discrete-log flavour).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DlEnumeration {
    BabaiOnly,
    ClosestVector,
    BoundedByTau,
}

/// Short DL, single pair (Ekerå–Håstad). Works in the 2D lattice `L^tau`
/// generated by `(j, 2^tau)` and `(2^(m+l), 0)`; the target is
/// `v = (truncmod(-2^m * k, 2^(m+l)), 0)`. Enumerates candidate vectors
/// within a radius that grows with `t` and checks each candidate `d`
/// against `x = g^d`.
///
/// `t` bounds the enumeration radius (`None` picks the smallest `t` making
/// the search ball cover the lattice's fundamental domain, i.e.
/// `t = max(0, l - m)`, a "t-balanced" lattice per §4.K).
#[allow(clippy::too_many_arguments)]
pub fn solve_j_k_for_d<G: CyclicGroupElement>(
    j: &Integer,
    k: &Integer,
    m: u32,
    l: u32,
    g: &G,
    x: &G,
    tau: u32,
    t: Option<u32>,
    timeout: &Timeout,
) -> Result<Option<Integer>> {
    timeout.check()?;

    let two_tau = Integer::from(1) << tau;
    let modulus = Integer::from(1) << (m + l);

    let basis = IntMatrix::from_rows(vec![
        IntVector::from_vec(vec![j.clone(), two_tau.clone()]),
        IntVector::from_vec(vec![modulus.clone(), Integer::from(0)]),
    ]);
    let (reduced, _u) = lagrange_reduce(&basis, None);
    let gs = gram_schmidt(&reduced, None);

    let v0 = truncmod(&Integer::from(-(Integer::from(1) << m) * k), &modulus)?;
    let target = RealVector::from_vec(vec![Real::from_integer(&v0, None), Real::zero(None)]);

    let t = t.unwrap_or_else(|| l.saturating_sub(m));
    let delta = m as i32 - l as i32;
    let radius = 2f64.powi(delta + tau as i32 + 1) + 2f64.powi(tau as i32 + t as i32 + 2) + 2.0;
    let radius_sq = Real::from_f64(radius * radius, None);

    let vectors = enumerate(&reduced, &gs, &target, &radius_sq, None, timeout)?;

    let upper = Integer::from(1) << m;
    for u in vectors {
        timeout.check()?;
        let second = u[1].clone();
        if !second.is_divisible(&two_tau) {
            continue;
        }
        let d = Integer::from(&second / &two_tau);
        if d.cmp0() == std::cmp::Ordering::Less || d >= upper {
            continue;
        }
        if g.power(&d) == *x {
            return Ok(Some(d));
        }
    }
    Ok(None)
}

/// Short DL, multiple pairs. Builds a `2n`-dimensional lattice whose short
/// vectors encode `2^tau * d` in a distinguished coordinate, the same
/// construction idiom as [`crate::order::solve_multiple_j_for_r`] scaled to
/// two coordinates per pair.
#[allow(clippy::too_many_arguments)]
pub fn solve_multiple_j_k_for_d<G: CyclicGroupElement>(
    j_k_list: &[(Integer, Integer)],
    m: u32,
    l: u32,
    g: &G,
    x: &G,
    tau: u32,
    delta: f64,
    precision: Option<u32>,
    enumeration: DlEnumeration,
    timeout: &Timeout,
) -> Result<Option<Integer>> {
    let n = j_k_list.len();
    assert!(n > 0, "solve_multiple_j_k_for_d requires at least one pair");
    let dim = 2 * n;

    let modulus = Integer::from(1) << (m + l);
    let two_tau = Integer::from(1) << tau;
    let upper_m = Integer::from(1) << m;

    let mut rows = Vec::with_capacity(dim);
    let mut target = vec![Integer::from(0); dim];
    for (i, (j, k)) in j_k_list.iter().enumerate() {
        let mut row_j = vec![Integer::from(0); dim];
        row_j[0] = j.clone();
        row_j[2 * i + 1] = two_tau.clone();
        rows.push(IntVector::from_vec(row_j));

        let mut row_m = vec![Integer::from(0); dim];
        row_m[2 * i] = modulus.clone();
        rows.push(IntVector::from_vec(row_m));

        target[2 * i] = truncmod(&Integer::from(-&upper_m * k), &modulus)?;
    }

    let basis = IntMatrix::from_rows(rows);
    let (reduced, gs) = lll_reduce_with_gso(&basis, delta, timeout, precision)?;
    let target = RealVector::from_vec(target.into_iter().map(|v| Real::from_integer(&v, precision)).collect());

    let candidate_vectors: Vec<IntVector> = match enumeration {
        DlEnumeration::BabaiOnly => vec![babai_closest_vector(&reduced, &gs, &target, precision)],
        DlEnumeration::ClosestVector => vec![solve_cvp(&reduced, &gs, &target, precision, timeout)?],
        DlEnumeration::BoundedByTau => {
            let radius = (dim as f64).sqrt() * 2f64.powi(m as i32 - l as i32 + tau as i32);
            let radius_sq = Real::from_f64(radius * radius, precision);
            enumerate(&reduced, &gs, &target, &radius_sq, precision, timeout)?
        }
    };

    for u in candidate_vectors {
        timeout.check()?;
        // Every pair's odd coordinate carries 2^tau * d, undisturbed by the
        // target shift (which only touches even coordinates).
        let d = Integer::from(&u[1] / &two_tau);
        if !u[1].is_divisible(&two_tau) || d.cmp0() == std::cmp::Ordering::Less || d >= upper_m {
            continue;
        }
        if g.power(&d) == *x {
            return Ok(Some(d));
        }
    }
    Ok(None)
}

/// General DL given the order `r`. Grid-searches offsets `eta in [-B_eta,
/// B_eta]` and `t in [-B_t, B_t]`; for each pair, solves a small linear
/// equation modulo `r` for a candidate `d` and verifies it.
#[allow(clippy::too_many_arguments)]
pub fn solve_j_k_for_d_given_r<G: CyclicGroupElement>(
    j: &Integer,
    k: &Integer,
    m: u32,
    sigma: u32,
    l: u32,
    g: &G,
    x: &G,
    r: &Integer,
    b_eta: u32,
    b_t: u32,
    timeout: &Timeout,
) -> Result<Option<Integer>> {
    if r.cmp0() != std::cmp::Ordering::Greater {
        return Err(Error::DomainError(format!("solve_j_k_for_d_given_r requires r > 0, got {r}")));
    }
    let k_inv = k
        .clone()
        .invert(r)
        .map_err(|_| Error::DomainError(format!("k = {k} is not invertible mod r = {r}")))?;

    let n = Integer::from(1) << (m + sigma + l);

    for eta in -(b_eta as i64)..=(b_eta as i64) {
        timeout.check()?;
        // s approximates (t - k*d) via j/2^(m+sigma+l) ~ (t - k*d)/r.
        let shifted_j = Integer::from(j - eta);
        let s = round_div(&Integer::from(&shifted_j * r), &n);

        for t_off in -(b_t as i64)..=(b_t as i64) {
            timeout.check()?;
            let kd = Integer::from(t_off) - &s;
            let d = Integer::from(&kd * &k_inv).rem_euc(r.clone());
            if g.power(&d) == *x {
                return Ok(Some(d));
            }
        }
    }
    Ok(None)
}

fn round_div(n: &Integer, d: &Integer) -> Integer {
    Integer::from(rug::Rational::from((n.clone(), d.clone())).round_ref())
}

/// General DL given `r`, multiple pairs: the same lattice pattern as
/// [`solve_multiple_j_k_for_d`], scaled by `tau`, over the `(Z/rZ)`
/// candidate space rather than the full `2^m` range.
#[allow(clippy::too_many_arguments)]
pub fn solve_multiple_j_k_for_d_given_r<G: CyclicGroupElement>(
    j_k_list: &[(Integer, Integer)],
    m: u32,
    l: u32,
    g: &G,
    x: &G,
    r: &Integer,
    tau: u32,
    delta: f64,
    precision: Option<u32>,
    enumeration: DlEnumeration,
    timeout: &Timeout,
) -> Result<Option<Integer>> {
    if r.cmp0() != std::cmp::Ordering::Greater {
        return Err(Error::DomainError(format!("solve_multiple_j_k_for_d_given_r requires r > 0, got {r}")));
    }

    let n = j_k_list.len();
    assert!(n > 0, "solve_multiple_j_k_for_d_given_r requires at least one pair");
    let dim = 2 * n;
    let modulus = Integer::from(1) << (m + l);
    let two_tau = Integer::from(1) << tau;
    let upper_m = Integer::from(1) << m;

    let mut rows = Vec::with_capacity(dim);
    let mut target = vec![Integer::from(0); dim];
    for (i, (j, k)) in j_k_list.iter().enumerate() {
        let mut row_j = vec![Integer::from(0); dim];
        row_j[0] = j.clone();
        row_j[2 * i + 1] = two_tau.clone();
        rows.push(IntVector::from_vec(row_j));

        let mut row_m = vec![Integer::from(0); dim];
        row_m[2 * i] = modulus.clone();
        rows.push(IntVector::from_vec(row_m));

        target[2 * i] = truncmod(&Integer::from(-&upper_m * k), &modulus)?;
    }

    let basis = IntMatrix::from_rows(rows);
    let (reduced, gs) = lll_reduce_with_gso(&basis, delta, timeout, precision)?;
    let target_real = RealVector::from_vec(target.iter().map(|v| Real::from_integer(v, precision)).collect());

    let candidate_vectors: Vec<IntVector> = match enumeration {
        DlEnumeration::BabaiOnly => vec![babai_closest_vector(&reduced, &gs, &target_real, precision)],
        DlEnumeration::ClosestVector => vec![solve_cvp(&reduced, &gs, &target_real, precision, timeout)?],
        DlEnumeration::BoundedByTau => {
            let radius = (dim as f64).sqrt() * 2f64.powi(m as i32 - l as i32 + tau as i32);
            let radius_sq = Real::from_f64(radius * radius, precision);
            enumerate(&reduced, &gs, &target_real, &radius_sq, precision, timeout)?
        }
    };

    for u in candidate_vectors {
        timeout.check()?;
        if !u[1].is_divisible(&two_tau) {
            continue;
        }
        let d = Integer::from(&u[1] / &two_tau).rem_euc(r.clone());
        if g.power(&d) == *x {
            return Ok(Some(d));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::group::SimulatedGroupElement;

    #[test]
    fn short_dl_recovers_a_valid_exponent() {
        let r = Integer::from(23);
        let g = SimulatedGroupElement::generator(r.clone());
        let d_true = Integer::from(7);
        let x = g.power(&d_true);

        // j = 0, k = 0 puts the target at the origin; (0, d_true) is then
        // an exact lattice point of (j, 2^tau)-basis with tau = 0, well
        // within the enumeration radius for a generous t.
        let m = 5;
        let l = 5;
        let tau = 0;
        let j = Integer::from(0);
        let k = Integer::from(0);

        let d = solve_j_k_for_d(&j, &k, m, l, &g, &x, tau, Some(4), &Timeout::indefinite()).unwrap();
        assert!(d.is_some(), "expected a discrete-log candidate to be found");
        assert!(g.power(&d.unwrap()) == x);
    }

    #[test]
    fn short_dl_recovers_a_valid_exponent_with_nonzero_k() {
        let r = Integer::from(23);
        let g = SimulatedGroupElement::generator(r.clone());
        let d_true = Integer::from(7);
        let x = g.power(&d_true);

        // k = 1, j = 288: 7*288 = 2016 = -32 + 2*1024, so (d_true, -2) is
        // an exact (a, b) pair placing the lattice vector (-32, 7) at
        // distance 7 from the target (v0, 0) = (-32, 0), well within the
        // enumeration radius for t = 4.
        let m = 5;
        let l = 5;
        let tau = 0;
        let j = Integer::from(288);
        let k = Integer::from(1);

        let d = solve_j_k_for_d(&j, &k, m, l, &g, &x, tau, Some(4), &Timeout::indefinite()).unwrap();
        assert!(d.is_some(), "expected a discrete-log candidate to be found");
        assert!(g.power(&d.unwrap()) == x);
    }

    #[test]
    fn general_dl_given_r_recovers_exponent_by_grid_search() {
        let r = Integer::from(11);
        let g = SimulatedGroupElement::generator(r.clone());
        let d_true = Integer::from(3);
        let x = g.power(&d_true);

        // k = 1 (trivially invertible); j = -4 is the frequency at which
        // eta = t = 0 gives s = round(j*r / 2^m) = round(-44/16) = -3,
        // so k*d = t - s = 3, d = 3.
        let m = 4u32;
        let sigma = 0u32;
        let l = 0u32;
        let j = Integer::from(-4);
        let k = Integer::from(1);

        let d = solve_j_k_for_d_given_r(&j, &k, m, sigma, l, &g, &x, &r, 2, 2, &Timeout::indefinite()).unwrap();
        assert_eq!(d, Some(d_true));
    }
}
