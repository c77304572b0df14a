//! `FactorCollection` and the complete-factoring solver.

use rug::integer::IsPrime;
use rug::Integer;

use crate::arith::{kappa, prime_power_product};
use crate::error::{Error, Result};
use crate::group::CyclicGroupElement;
use crate::timeout::Timeout;

fn is_prime(n: &Integer) -> bool {
    !matches!(n.is_probably_prime(30), IsPrime::No)
}

/// The coprime factorisation of an `N > 1`, grown monotonically by `add`.
/// Invariants: the product of all factors equals `N`; any two
/// distinct composite factors are coprime; primality is decided by a
/// probabilistic test treated as exact.
#[derive(Clone, Debug)]
pub struct FactorCollection {
    n: Integer,
    factors: Vec<(Integer, bool)>,
}

impl FactorCollection {
    /// `N` must be `> 1`.
    pub fn new(n: Integer) -> Result<Self> {
        if n <= 1 {
            return Err(Error::DomainError(format!("FactorCollection requires N > 1, got {n}")));
        }
        let prime = is_prime(&n);
        Ok(Self { n: n.clone(), factors: vec![(n, prime)] })
    }

    /// Split every existing composite factor `f` against `d` by repeatedly
    /// extracting `gcd(f, d)` until the two are coprime. `d <= 1` is a no-op.
    pub fn add(&mut self, d: &Integer) {
        if *d <= 1 {
            return;
        }
        let mut d = d.clone().abs();
        let mut updated = Vec::with_capacity(self.factors.len());

        for (f, prime) in self.factors.drain(..) {
            if prime {
                updated.push((f, prime));
                continue;
            }

            let mut remaining = f;
            let mut pieces = Vec::new();
            loop {
                let g = remaining.clone().gcd(&d);
                if g == 1 {
                    break;
                }
                pieces.push(g.clone());
                remaining = Integer::from(&remaining / &g);
                d = Integer::from(&d / &g);
            }
            pieces.push(remaining);

            for piece in pieces {
                if piece > 1 {
                    let prime = is_prime(&piece);
                    updated.push((piece, prime));
                }
            }
        }

        self.factors = updated;
    }

    /// `true` iff every tracked factor is a known prime.
    pub fn is_complete(&self) -> bool {
        self.factors.iter().all(|(_, prime)| *prime)
    }

    /// The tracked `(factor, is_prime)` pairs, in no particular order.
    pub fn factors(&self) -> &[(Integer, bool)] {
        &self.factors
    }

    /// The primes found so far, once `is_complete`. Panics if incomplete;
    /// callers should check `is_complete` first (mirrors `unwrap`-at-the-
    /// boundary idiom used elsewhere once a precondition is load-bearing).
    pub fn primes(&self) -> Vec<Integer> {
        self.factors.iter().map(|(f, _)| f.clone()).collect()
    }

    pub fn n(&self) -> &Integer {
        &self.n
    }
}

/// How `N'` is chosen from the current composite factors on each iteration
/// of [`solve_r_for_factors`] (§4.L `opt_process_composite_factors`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeFactorStrategy {
    WholeN,
    ProductOfComposites,
    EachCompositeInTurn,
}

/// Options controlling [`solve_r_for_factors`] (§4.L `opt_*`).
#[derive(Clone, Copy, Debug)]
pub struct FactoringOptions {
    pub split_factors_with_multiplicity: bool,
    pub process_composite_factors: CompositeFactorStrategy,
    pub square: bool,
    pub abort_early: bool,
    pub report_accidental_factors: bool,
    pub exclude_one: bool,
}

impl Default for FactoringOptions {
    fn default() -> Self {
        Self {
            split_factors_with_multiplicity: false,
            process_composite_factors: CompositeFactorStrategy::WholeN,
            square: true,
            abort_early: true,
            report_accidental_factors: false,
            exclude_one: true,
        }
    }
}

fn composite_moduli(collection: &FactorCollection, strategy: CompositeFactorStrategy) -> Vec<Integer> {
    let composites: Vec<Integer> = collection.factors().iter().filter(|(_, prime)| !prime).map(|(f, _)| f.clone()).collect();
    match strategy {
        CompositeFactorStrategy::WholeN => vec![collection.n().clone()],
        CompositeFactorStrategy::ProductOfComposites => {
            if composites.is_empty() {
                Vec::new()
            } else {
                vec![composites.into_iter().fold(Integer::from(1), |acc, c| acc * c)]
            }
        }
        CompositeFactorStrategy::EachCompositeInTurn => composites,
    }
}

/// Recover the complete prime factorisation of `N` given the order `r` of
/// some `x` sampled from `(Z/N'Z)*`, using `sample` as the external
/// source of randomness: called with a modulus and must return a uniform
/// value in `[0, modulus)` (optionally excluding `1`, per
/// `FactoringOptions::exclude_one`).
pub fn solve_r_for_factors(
    n: Integer,
    r: &Integer,
    c: u32,
    k: u32,
    options: FactoringOptions,
    sample: &mut dyn FnMut(&Integer) -> Integer,
    timeout: &Timeout,
) -> Result<Vec<Integer>> {
    let mut collection = FactorCollection::new(n.clone())?;

    if options.split_factors_with_multiplicity {
        let g = Integer::from(r.gcd_ref(&n));
        collection.add(&g);
    }

    let log2_n = Integer::from(n.significant_bits());
    let bound = Integer::from(c) * &log2_n;
    let p = prime_power_product(&bound);
    let e = Integer::from(&p * r);
    let t = kappa(&e);
    let o = Integer::from(&e >> t);

    for _ in 0..k {
        if collection.is_complete() {
            return Ok(collection.primes());
        }
        if timeout.check().is_err() {
            break;
        }

        for modulus in composite_moduli(&collection, options.process_composite_factors) {
            if modulus <= 1 {
                continue;
            }
            timeout.check()?;

            let mut x = sample(&modulus);
            if options.exclude_one {
                while x == 1 {
                    x = sample(&modulus);
                }
            }

            if options.report_accidental_factors {
                let g = Integer::from(x.clone().gcd(&modulus));
                if g > 1 && g != modulus {
                    collection.add(&g);
                }
            }

            let mut y = Integer::from(x.clone().pow_mod_ref(&o, &modulus).ok_or(Error::Singular)?);

            let mut s = None;
            for i in 0..=t {
                timeout.check()?;
                if options.square && i > 0 {
                    y = Integer::from(y.square_ref()).rem_euc(modulus.clone());
                } else if i > 0 {
                    let exp = Integer::from(&o << i);
                    y = Integer::from(x.clone().pow_mod_ref(&exp, &modulus).ok_or(Error::Singular)?);
                }

                if options.abort_early && y == 1 {
                    s = Some(i);
                }

                let minus_one = Integer::from(&y - 1).rem_euc(modulus.clone());
                let plus_one = Integer::from(&y + 1).rem_euc(modulus.clone());
                collection.add(&Integer::from(minus_one.gcd_ref(&modulus)));
                collection.add(&Integer::from(plus_one.gcd_ref(&modulus)));

                if let Some(stop_at) = s {
                    if i >= stop_at {
                        break;
                    }
                }
            }
        }
    }

    if collection.is_complete() {
        Ok(collection.primes())
    } else {
        Err(Error::IncompleteFactorisation(Box::new(collection)))
    }
}

/// Chain an order recovery and a factoring pass: recover `r` from a single
/// frequency sample, then recover the complete factorisation of `N`.
#[allow(clippy::too_many_arguments)]
pub fn solve_j_for_factors<G: CyclicGroupElement>(
    j: &Integer,
    m: u32,
    l: u32,
    g: &G,
    n: Integer,
    c: u32,
    b: u32,
    k: u32,
    method: crate::order::SolutionMethod,
    options: FactoringOptions,
    sample: &mut dyn FnMut(&Integer) -> Integer,
    timeout: &Timeout,
) -> Result<Vec<Integer>> {
    let r = crate::order::solve_j_for_r(j, m, l, g, c, b, false, method, true, false, timeout)?
        .ok_or_else(|| Error::DomainError("no order recovered from the given frequency sample".into()))?;
    solve_r_for_factors(n, &r, c, k, options, sample, timeout)
}

/// As [`solve_j_for_factors`], but `g` is the canonical generator of
/// `(Z/NZ)*` represented via [`crate::group::IntegerModN`], so the caller
/// need not build the group element themselves.
#[allow(clippy::too_many_arguments)]
pub fn solve_j_for_factors_mod_n(
    j: &Integer,
    m: u32,
    l: u32,
    base: &Integer,
    n: Integer,
    c: u32,
    b: u32,
    k: u32,
    method: crate::order::SolutionMethod,
    options: FactoringOptions,
    sample: &mut dyn FnMut(&Integer) -> Integer,
    timeout: &Timeout,
) -> Result<Vec<Integer>> {
    let g = crate::group::IntegerModN::new(base.clone(), n.clone());
    solve_j_for_factors(j, m, l, &g, n, c, b, k, method, options, sample, timeout)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_rejects_n_not_greater_than_one() {
        assert!(FactorCollection::new(Integer::from(1)).is_err());
        assert!(FactorCollection::new(Integer::from(0)).is_err());
    }

    #[test]
    fn new_on_a_prime_is_immediately_complete() {
        let collection = FactorCollection::new(Integer::from(23)).unwrap();
        assert!(collection.is_complete());
        assert_eq!(collection.primes(), vec![Integer::from(23)]);
    }

    #[test]
    fn add_splits_a_composite_factor() {
        // N = 35 = 5 * 7; adding 5 splits it.
        let mut collection = FactorCollection::new(Integer::from(35)).unwrap();
        assert!(!collection.is_complete());
        collection.add(&Integer::from(5));
        assert!(collection.is_complete());
        let mut primes: Vec<i64> = collection.primes().iter().map(|p| p.to_i64().unwrap()).collect();
        primes.sort();
        assert_eq!(primes, vec![5, 7]);
    }

    #[test]
    fn add_is_a_no_op_for_non_positive_or_trivial_divisors() {
        let mut collection = FactorCollection::new(Integer::from(35)).unwrap();
        collection.add(&Integer::from(1));
        collection.add(&Integer::from(0));
        assert!(!collection.is_complete());
        assert_eq!(collection.factors().len(), 1);
    }

    #[test]
    fn solve_r_for_factors_recovers_a_known_factorisation() {
        // N = 15 = 3 * 5, r = 2, x = 4 (order 2 mod 15, since 4^2 = 16 = 1
        // mod 15). P = prime_power_product(c * log2(15)) = prime_power_product(8)
        // = 840 = 2^3 * 3 * 5 * 7; e = P * r = 1680 = 2^4 * 105, so o = 105.
        // 105 is odd, so 4^105 = 4^(105 mod 2) = 4 mod 15, and
        // gcd(4 - 1, 15) = 3, gcd(4 + 1, 15) = 5 split N immediately.
        let n = Integer::from(15);
        let r = Integer::from(2);
        let mut calls = 0u32;
        let mut sample = |_modulus: &Integer| -> Integer {
            calls += 1;
            Integer::from(4)
        };
        let result = solve_r_for_factors(n, &r, 2, 3, FactoringOptions::default(), &mut sample, &Timeout::indefinite());
        let mut primes: Vec<i64> = result.unwrap().iter().map(|p| p.to_i64().unwrap()).collect();
        primes.sort();
        assert_eq!(primes, vec![3, 5]);
        assert!(calls >= 1);
    }

    #[test]
    fn solve_r_for_factors_splits_a_prime_power_via_a_square_root_of_one() {
        // N = 4, r = 1, x = 1 (forced by disabling exclude_one). P =
        // prime_power_product(c * log2(4)) = prime_power_product(6) = 60 =
        // 2^2 * 15; e = P * r = 60, so o = 15. y = 1^15 = 1 mod 4, and
        // gcd(y + 1, 4) = gcd(2, 4) = 2 splits 4 into its two prime factors.
        let n = Integer::from(4);
        let r = Integer::from(1);
        let mut sample = |_modulus: &Integer| -> Integer { Integer::from(1) };
        let result = solve_r_for_factors(
            n,
            &r,
            2,
            2,
            FactoringOptions { exclude_one: false, ..FactoringOptions::default() },
            &mut sample,
            &Timeout::indefinite(),
        );
        let mut primes: Vec<i64> = result.unwrap().iter().map(|p| p.to_i64().unwrap()).collect();
        primes.sort();
        assert_eq!(primes, vec![2, 2]);
    }

    #[test]
    fn solve_r_for_factors_reports_incomplete_on_exhaustion() {
        // N = 9 = 3^2, r = 1, x = 1 always: o = 105 is odd (same P as the
        // N=15 case, e = P * r = 840 = 2^3 * 105), y = 1^105 = 1 mod 9, and
        // gcd(y + 1, 9) = gcd(2, 9) = 1, so no iteration ever uncovers the
        // factor 3 and the k-iteration budget is exhausted.
        let n = Integer::from(9);
        let r = Integer::from(1);
        let mut sample = |_modulus: &Integer| -> Integer { Integer::from(1) };
        let result = solve_r_for_factors(
            n,
            &r,
            2,
            2,
            FactoringOptions { exclude_one: false, ..FactoringOptions::default() },
            &mut sample,
            &Timeout::indefinite(),
        );
        assert!(matches!(result, Err(Error::IncompleteFactorisation(_))));
    }
}
