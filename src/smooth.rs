//! Smooth reconstruction algorithms A1–A4: recover the order of a
//! group element from a candidate `r̃` under the assumption that `r/d = r̃`
//! for some cm-smooth `d`.

use rug::Integer;

use crate::arith::{prime_power_product, prime_range};
use crate::error::Result;
use crate::group::CyclicGroupElement;
use crate::timeout::Timeout;

fn int_pow(base: &Integer, exponent: u32) -> Integer {
    let mut result = Integer::from(1);
    for _ in 0..exponent {
        result *= base;
    }
    result
}

/// A1: deterministic collection. `P = prime_power_product(c*m)`; returns
/// `r̃ * P` iff `g^(r̃ * P)` is the identity.
pub fn a1_collect_factors<G: CyclicGroupElement>(g: &G, r_tilde: &Integer, m: u32, c: u32, timeout: &Timeout) -> Result<Option<Integer>> {
    timeout.check()?;
    let bound = Integer::from(c) * m;
    let p = prime_power_product(&bound);
    let candidate = Integer::from(r_tilde * &p);
    Ok(if g.power(&candidate).is_identity() {
        Some(candidate)
    } else {
        None
    })
}

/// A2: speculative exponent shaving. Faster on average than A3, slower in
/// the worst case; selected behind `opt_speculative`.
pub fn a2_speculative_shave<G: CyclicGroupElement>(g: &G, r_tilde: &Integer, m: u32, c: u32, timeout: &Timeout) -> Result<Option<Integer>> {
    timeout.check()?;
    let bound = Integer::from(c) * m;
    let p = prime_power_product(&bound);
    let mut candidate = Integer::from(r_tilde * &p);

    if !g.power(&candidate).is_identity() {
        return Ok(None);
    }

    for q in prime_range(&Integer::from(&bound + 1)) {
        timeout.check()?;
        while candidate.is_divisible(&q) {
            let shaved = Integer::from(&candidate / &q);
            if g.power(&shaved).is_identity() {
                candidate = shaved;
            } else {
                break;
            }
        }
    }
    Ok(Some(candidate))
}

/// A3: same guarantee as A2, better worst-case complexity. Instead of A2's
/// linear descent by repeated division, each prime's contribution is found
/// by bisecting how many of its copies can be divided back out of the
/// running candidate while the quotient remains an order of `g` — true for
/// small counts, false once the count exceeds that prime's valuation in
/// the true order, so the boundary is well-defined.
pub fn a3_binary_search_shave<G: CyclicGroupElement>(g: &G, r_tilde: &Integer, m: u32, c: u32, timeout: &Timeout) -> Result<Option<Integer>> {
    timeout.check()?;
    let bound = Integer::from(c) * m;
    let p = prime_power_product(&bound);
    let mut candidate = Integer::from(r_tilde * &p);

    if !g.power(&candidate).is_identity() {
        return Ok(None);
    }

    for q in prime_range(&Integer::from(&bound + 1)) {
        timeout.check()?;

        let mut max_k = 0u32;
        let mut probe = candidate.clone();
        while probe.is_divisible(&q) {
            probe = Integer::from(&probe / &q);
            max_k += 1;
        }
        if max_k == 0 {
            continue;
        }

        let mut lo = 0u32;
        let mut hi = max_k;
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            let reduced = Integer::from(&candidate / int_pow(&q, mid));
            if g.power(&reduced).is_identity() {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        candidate = Integer::from(&candidate / int_pow(&q, lo));
    }
    Ok(Some(candidate))
}

/// A4: bulk filter. Returns the subset of `candidates` for which A1 succeeds.
pub fn a4_bulk_filter<G: CyclicGroupElement>(
    g: &G,
    candidates: &[Integer],
    m: u32,
    c: u32,
    timeout: &Timeout,
) -> Result<Vec<Integer>> {
    let mut survivors = Vec::new();
    for r_tilde in candidates {
        if a1_collect_factors(g, r_tilde, m, c, timeout)?.is_some() {
            survivors.push(r_tilde.clone());
        }
    }
    Ok(survivors)
}
