//! The order-finding solver: lift a frequency sample to a candidate
//! `r̃`, reconstruct the true order via the A-algorithms, and search nearby
//! offsets for a better (smaller) order under peak isolation.

use std::cmp::Ordering;

use rug::Integer;

use crate::babai::babai_closest_vector;
use crate::candidates::CandidateCollection;
use crate::contfrac::continued_fractions;
use crate::enumerate::{enumerate, solve_cvp};
use crate::error::Result;
use crate::group::CyclicGroupElement;
use crate::lagrange::lagrange_reduce;
use crate::linalg::{gram_schmidt, IntMatrix, IntVector, Real, RealVector};
use crate::lll::lll_reduce_with_gso;
use crate::smooth::{a2_speculative_shave, a3_binary_search_shave};
use crate::timeout::Timeout;

/// How a frequency sample is lifted to a candidate `r̃`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolutionMethod {
    ContinuedFractions,
    LatticeShortestVector,
    LatticeEnumerate,
}

/// Enumeration strategy for the multi-sample lattice (§6 `EnumerationOptions`,
/// order-finding flavour).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MultiSampleEnumeration {
    Skip,
    BabaiOnly,
    ClosestVector,
    BoundedByTau,
    BoundedByTauComplete,
}

fn symmetric_offsets(bound: u32) -> impl Iterator<Item = i64> {
    let bound = bound as i64;
    std::iter::once(0).chain((1..=bound).flat_map(|k| vec![k, -k]))
}

fn lift_j_to_r_candidates(
    j: &Integer,
    m: u32,
    l: u32,
    method: SolutionMethod,
    warm_u: Option<&IntMatrix>,
    timeout: &Timeout,
) -> Result<(Vec<Integer>, Option<IntMatrix>)> {
    match method {
        SolutionMethod::ContinuedFractions => {
            let denominators = continued_fractions(j, m, l, None)?;
            Ok((denominators.into_iter().last().into_iter().collect(), None))
        }
        SolutionMethod::LatticeShortestVector => {
            timeout.check()?;
            let basis = IntMatrix::from_rows(vec![
                IntVector::from_vec(vec![j.clone(), Integer::from(1)]),
                IntVector::from_vec(vec![Integer::from(1) << (m + l + 1), Integer::from(0)]),
            ]);
            let (reduced, u) = lagrange_reduce(&basis, warm_u);
            let r_tilde = Integer::from(reduced[0][1].clone()).abs();
            Ok((vec![r_tilde], Some(u)))
        }
        SolutionMethod::LatticeEnumerate => {
            timeout.check()?;
            let basis = IntMatrix::from_rows(vec![
                IntVector::from_vec(vec![j.clone(), Integer::from(1)]),
                IntVector::from_vec(vec![Integer::from(1) << (m + l + 1), Integer::from(0)]),
            ]);
            let (reduced, u) = lagrange_reduce(&basis, warm_u);
            let gs = gram_schmidt(&reduced, None);
            let centre = RealVector::zero(2, None);
            let radius_sq = Real::from_integer(&(Integer::from(1) << (2 * m - 1)), None);
            let vectors = enumerate(&reduced, &gs, &centre, &radius_sq, None, timeout)?;

            let mut candidates: Vec<Integer> = vectors
                .into_iter()
                .filter(|v| !v.is_zero())
                .map(|v| Integer::from(v[1].clone()).abs())
                .collect();
            candidates.sort();
            candidates.dedup();
            Ok((candidates, Some(u)))
        }
    }
}

/// Recover the order of `g` from a single frequency sample `j`.
///
/// `c` is the cm-smoothness cap multiplier; `b` bounds the symmetric offset
/// search; `accept_multiple` returns as soon as A1 succeeds on any
/// candidate (not necessarily the true order); `isolate_peak` stops the
/// offset search once both neighbours of the current best have failed.
#[allow(clippy::too_many_arguments)]
pub fn solve_j_for_r<G: CyclicGroupElement>(
    j: &Integer,
    m: u32,
    l: u32,
    g: &G,
    c: u32,
    b: u32,
    accept_multiple: bool,
    method: SolutionMethod,
    isolate_peak: bool,
    speculative: bool,
    timeout: &Timeout,
) -> Result<Option<Integer>> {
    let mut seen = CandidateCollection::new();
    let mut best: Option<Integer> = None;
    let mut best_offset = 0i64;
    let mut failed_left = false;
    let mut failed_right = false;
    let mut warm_u: Option<IntMatrix> = None;
    let upper = Integer::from(1) << m;

    for offset in symmetric_offsets(b) {
        timeout.check()?;

        let candidate_j = Integer::from(j + offset);
        if candidate_j.cmp0() == Ordering::Less {
            continue;
        }

        let (r_tildes, new_u) = lift_j_to_r_candidates(&candidate_j, m, l, method, warm_u.as_ref(), timeout)?;
        if let Some(u) = new_u {
            warm_u = Some(u);
        }

        let mut matched_this_offset = false;
        for r_tilde in r_tildes {
            if r_tilde.cmp0() != Ordering::Greater || r_tilde >= upper {
                continue;
            }
            if seen.contains(&r_tilde) {
                continue;
            }
            seen.add(r_tilde.clone());

            let shaved = if speculative {
                a2_speculative_shave(g, &r_tilde, m, c, timeout)?
            } else {
                a3_binary_search_shave(g, &r_tilde, m, c, timeout)?
            };

            if let Some(r) = shaved {
                matched_this_offset = true;
                if accept_multiple {
                    return Ok(Some(r));
                }
                if best.as_ref().map_or(true, |current| r < *current) {
                    best = Some(r);
                    best_offset = offset;
                    failed_left = false;
                    failed_right = false;
                }
            }
        }

        if isolate_peak && best.is_some() {
            match offset.cmp(&best_offset) {
                Ordering::Greater if !matched_this_offset => failed_right = true,
                Ordering::Less if !matched_this_offset => failed_left = true,
                _ => {}
            }
            if failed_left && failed_right {
                break;
            }
        }
    }

    Ok(best)
}

/// Recover the order of `g` from several frequency samples at once, via an
/// `(n+1)`-dimensional lattice whose short vectors encode `2^tau * r̃` in
/// their last coordinate.
#[allow(clippy::too_many_arguments)]
pub fn solve_multiple_j_for_r<G: CyclicGroupElement>(
    j_list: &[Integer],
    m: u32,
    l: u32,
    tau: u32,
    g: &G,
    c: u32,
    delta: f64,
    precision: Option<u32>,
    enumeration: MultiSampleEnumeration,
    speculative: bool,
    timeout: &Timeout,
) -> Result<Option<Integer>> {
    let n = j_list.len();
    assert!(n > 0, "solve_multiple_j_for_r requires at least one sample");
    let dim = n + 1;

    let modulus = Integer::from(1) << (m + l);
    let two_tau = Integer::from(1) << tau;

    let mut rows = Vec::with_capacity(dim);
    for (i, j) in j_list.iter().enumerate() {
        let mut row = vec![Integer::from(0); dim];
        row[0] = j.clone();
        row[i + 1] = two_tau.clone();
        rows.push(IntVector::from_vec(row));
    }
    let mut last_row = vec![Integer::from(0); dim];
    last_row[0] = modulus;
    rows.push(IntVector::from_vec(last_row));

    let basis = IntMatrix::from_rows(rows);
    let (reduced, gs) = lll_reduce_with_gso(&basis, delta, timeout, precision)?;

    let candidate_vectors: Vec<IntVector> = match enumeration {
        MultiSampleEnumeration::Skip => Vec::new(),
        MultiSampleEnumeration::BabaiOnly => {
            let target = RealVector::zero(dim, precision);
            vec![babai_closest_vector(&reduced, &gs, &target, precision)]
        }
        MultiSampleEnumeration::ClosestVector => {
            let target = RealVector::zero(dim, precision);
            vec![solve_cvp(&reduced, &gs, &target, precision, timeout)?]
        }
        MultiSampleEnumeration::BoundedByTau | MultiSampleEnumeration::BoundedByTauComplete => {
            let radius = (dim as f64).sqrt() * 2f64.powi(m as i32 - l as i32 + tau as i32);
            let radius_sq = Real::from_f64(radius * radius, precision);
            let centre = RealVector::zero(dim, precision);
            enumerate(&reduced, &gs, &centre, &radius_sq, precision, timeout)?
        }
    };

    let mut best: Option<Integer> = None;
    for v in candidate_vectors {
        let last = v[dim - 1].clone();
        if !last.is_divisible(&two_tau) {
            continue;
        }
        let r_tilde = Integer::from(&last / &two_tau).abs();
        if r_tilde.cmp0() != Ordering::Greater {
            continue;
        }

        let shaved = if speculative {
            a2_speculative_shave(g, &r_tilde, m, c, timeout)?
        } else {
            a3_binary_search_shave(g, &r_tilde, m, c, timeout)?
        };

        if let Some(r) = shaved {
            let is_better = best.as_ref().map_or(true, |current| r < *current);
            if is_better {
                best = Some(r);
            }
            if enumeration != MultiSampleEnumeration::BoundedByTauComplete {
                break;
            }
        }
    }
    Ok(best)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::group::SimulatedGroupElement;

    #[test]
    fn order_3_recovered_via_continued_fractions() {
        // j/2^(m+l) = 5/16; the CF expansion's last denominator under the
        // default bound (floor(2^((m+l)/2)) = 4) is 3, the true order.
        let g = SimulatedGroupElement::generator(Integer::from(3));
        let r = solve_j_for_r(
            &Integer::from(5),
            2,
            2,
            &g,
            2,
            2,
            false,
            SolutionMethod::ContinuedFractions,
            true,
            false,
            &Timeout::indefinite(),
        )
        .unwrap();
        assert_eq!(r, Some(Integer::from(3)));
    }

    #[test]
    fn order_found_via_lattice_shortest_vector() {
        let g = SimulatedGroupElement::generator(Integer::from(3));
        let r = solve_j_for_r(
            &Integer::from(5),
            2,
            2,
            &g,
            2,
            2,
            false,
            SolutionMethod::LatticeShortestVector,
            true,
            false,
            &Timeout::indefinite(),
        )
        .unwrap();
        assert_eq!(r, Some(Integer::from(3)));
    }
}
