//! Arithmetic kernel: truncated residues, 2-adic valuation, CRT,
//! smoothness testing and prime enumeration.

use rug::Integer;

use crate::error::{Error, Result};

/// `x mod N`, constrained to the symmetric interval `[-ceil(N/2), ceil(N/2))`.
///
/// Fails only if `N <= 0`. Per §9's Open Questions, the symmetric interval
/// is the authoritative contract (the "[N/2, N/2)" phrasing elsewhere in the
/// documentation is vacuous and disregarded).
pub fn truncmod(x: &Integer, n: &Integer) -> Result<Integer> {
    if n.cmp0() != std::cmp::Ordering::Greater {
        return Err(Error::DomainError(format!("truncmod requires N > 0, got {n}")));
    }

    let mut r = x.clone().rem_euc(n);
    let ceil_half = Integer::from(n + 1) / 2;
    if r >= ceil_half {
        r -= n;
    }
    Ok(r)
}

/// Largest `t` such that `2^t | x`. `x` must be non-zero (`kappa(0)` is
/// never called by the core, per §4.A).
pub fn kappa(x: &Integer) -> u32 {
    assert!(x.cmp0() != std::cmp::Ordering::Equal, "kappa(0) is undefined");
    x.find_one(0).expect("non-zero integer has a lowest set bit")
}

/// Chinese remainder: the unique `v` in `[0, prod Nᵢ)` with `v ≡ vᵢ (mod Nᵢ)`.
///
/// Each modulus must be `>= 2` and pairwise coprime with the others;
/// violating either fails with [`Error::DomainError`]. Computed by
/// iterated two-modulus CRT, so intermediate products grow monotonically.
pub fn crt(values: &[Integer], moduli: &[Integer]) -> Result<Integer> {
    if values.len() != moduli.len() || values.is_empty() {
        return Err(Error::DomainError(
            "crt requires a matching, non-empty list of values and moduli".into(),
        ));
    }

    let mut acc_modulus = moduli[0].clone();
    if acc_modulus < 2 {
        return Err(Error::DomainError("crt moduli must each be >= 2".into()));
    }
    let mut acc_value = values[0].clone().rem_euc(&acc_modulus);

    for (v, n) in values.iter().zip(moduli.iter()).skip(1) {
        if *n < 2 {
            return Err(Error::DomainError("crt moduli must each be >= 2".into()));
        }
        let gcd = acc_modulus.clone().gcd(n);
        if gcd != 1 {
            return Err(Error::DomainError(format!(
                "crt moduli must be pairwise coprime, found gcd {gcd}"
            )));
        }

        // Solve acc_value + acc_modulus * t ≡ v (mod n) for t.
        let v_mod_n = v.clone().rem_euc(n);
        let diff = Integer::from(&v_mod_n - &acc_value).rem_euc(n);
        let inv_acc_modulus = acc_modulus
            .clone()
            .invert(n)
            .map_err(|_| Error::DomainError("crt moduli must be pairwise coprime".into()))?;
        let t = Integer::from(diff * inv_acc_modulus).rem_euc(n);

        acc_value += Integer::from(&acc_modulus * &t);
        acc_modulus *= n;
        acc_value = acc_value.rem_euc(&acc_modulus);
    }

    Ok(acc_value)
}

/// `true` iff, in the unique prime factorisation `d = prod qᵢ^eᵢ`, every
/// prime-power component `qᵢ^eᵢ` is at most `B`.
pub fn is_b_smooth(d: &Integer, bound: &Integer) -> bool {
    let mut remaining = d.clone().abs();
    if remaining <= 1 {
        return true;
    }

    let mut trial = Integer::from(2);
    while Integer::from(&trial * &trial) <= remaining {
        if remaining.is_divisible(&trial) {
            let mut prime_power = Integer::from(1);
            while remaining.is_divisible(&trial) {
                prime_power *= &trial;
                remaining /= &trial;
                if prime_power > *bound {
                    return false;
                }
            }
        }
        trial += 1;
    }

    // Whatever remains (1, or a single prime > sqrt(original d)) is itself
    // a prime power of exponent 1.
    remaining <= *bound
}

/// Ordered ascending list of the primes strictly less than `bound`.
pub fn prime_range(bound: &Integer) -> Vec<Integer> {
    let n = match bound.to_usize() {
        Some(n) if n >= 2 => n,
        _ => return Vec::new(),
    };

    let mut is_composite = vec![false; n];
    let mut primes = Vec::new();
    for candidate in 2..n {
        if !is_composite[candidate] {
            primes.push(Integer::from(candidate));
            let mut multiple = candidate * candidate;
            while multiple < n {
                is_composite[multiple] = true;
                multiple += candidate;
            }
        }
    }
    primes
}

/// `prod_{p < B} p^floor(log_p B)`: the largest `B`-smooth "universal
/// exponent" product, used by the A1–A4 reconstruction algorithms.
pub fn prime_power_product(bound: &Integer) -> Integer {
    let mut product = Integer::from(1);
    for p in prime_range(bound) {
        let mut power = p.clone();
        while Integer::from(&power * &p) <= *bound {
            power *= &p;
        }
        product *= &power;
    }
    product
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn truncmod_is_symmetric_and_congruent() {
        for n in 1..20i64 {
            for x in -50..50i64 {
                let r = truncmod(&Integer::from(x), &Integer::from(n)).unwrap();
                let ceil_half = (n + 1) / 2;
                assert!(r >= -ceil_half && r < ceil_half, "n={n} x={x} r={r}");
                assert_eq!(
                    Integer::from(&r - x).is_divisible(&Integer::from(n)),
                    true,
                    "n={n} x={x} r={r}"
                );
            }
        }
    }

    #[test]
    fn truncmod_rejects_non_positive_modulus() {
        assert!(truncmod(&Integer::from(5), &Integer::from(0)).is_err());
        assert!(truncmod(&Integer::from(5), &Integer::from(-3)).is_err());
    }

    #[test]
    fn kappa_finds_two_adic_valuation() {
        assert_eq!(kappa(&Integer::from(12)), 2);
        assert_eq!(kappa(&Integer::from(1)), 0);
        assert_eq!(kappa(&Integer::from(-8)), 3);
    }

    #[test]
    fn crt_reconstructs_value() {
        let v = crt(
            &[Integer::from(2), Integer::from(3), Integer::from(2)],
            &[Integer::from(3), Integer::from(5), Integer::from(7)],
        )
        .unwrap();
        assert_eq!(v, Integer::from(23));
        assert!(v >= 0 && v < 105);
    }

    #[test]
    fn crt_rejects_non_coprime_moduli() {
        assert!(crt(&[Integer::from(1), Integer::from(1)], &[Integer::from(4), Integer::from(6)]).is_err());
    }

    #[test]
    fn is_b_smooth_matches_definition() {
        // 360 = 2^3 * 3^2 * 5, largest prime-power component is 8
        assert!(is_b_smooth(&Integer::from(360), &Integer::from(9)));
        assert!(!is_b_smooth(&Integer::from(360), &Integer::from(7)));
    }

    #[test]
    fn prime_range_lists_primes_below_bound() {
        let primes: Vec<i64> = prime_range(&Integer::from(20))
            .iter()
            .map(|p| p.to_i64().unwrap())
            .collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19]);
    }

    #[test]
    fn prime_power_product_bounds_each_factor() {
        // primes < 10: 2,3,5,7 -> 2^3 * 3^2 * 5 * 7
        let product = prime_power_product(&Integer::from(10));
        assert_eq!(product, Integer::from(8 * 9 * 5 * 7));
    }
}
