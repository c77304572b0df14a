//! Continued-fraction convergent denominators, used by the
//! continued-fractions lift in the order-finding solver.

use std::cmp::Ordering;

use rug::Integer;

use crate::error::{Error, Result};

/// Denominators of the convergents of `j / 2^(m+l)`, strictly below `bound`
/// (default `floor(2^((m+l)/2))`), in increasing order.
///
/// The trivial zeroth convergent (denominator 1, independent of `j`) is
/// never emitted — `j / 2^(m+l)` is a proper fraction whenever `j` is in
/// range, so its integer part is always `0` and carries no information.
/// `j = 0` therefore yields the empty list: the expansion terminates after
/// that first, unemitted term.
pub fn continued_fractions(j: &Integer, m: u32, l: u32, bound: Option<Integer>) -> Result<Vec<Integer>> {
    if j.cmp0() == Ordering::Less {
        return Err(Error::DomainError(format!("continued_fractions requires j >= 0, got {j}")));
    }
    let modulus = Integer::from(1) << (m + l);
    if *j >= modulus {
        return Err(Error::DomainError(format!(
            "continued_fractions requires j < 2^(m+l) = {modulus}, got {j}"
        )));
    }

    let bound = bound.unwrap_or_else(|| Integer::from(1) << ((m + l) / 2));

    let mut p = j.clone();
    let mut q = modulus;
    let mut d_prev2 = Integer::from(0);
    let mut d_prev1 = Integer::from(1);
    let mut denominators = Vec::new();
    let mut is_first_term = true;

    while q.cmp0() != Ordering::Equal {
        let a = Integer::from(&p / &q);
        let r = Integer::from(&p - &a * &q);
        p = q;
        q = r;

        if is_first_term {
            is_first_term = false;
            continue;
        }

        let d_k = Integer::from(&a * &d_prev1) + &d_prev2;
        d_prev2 = d_prev1;
        d_prev1 = d_k.clone();

        if d_k >= bound {
            break;
        }
        denominators.push(d_k);
    }

    Ok(denominators)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_frequency_yields_no_convergents() {
        assert_eq!(continued_fractions(&Integer::from(0), 4, 4, None).unwrap(), Vec::<Integer>::new());
    }

    #[test]
    fn recovers_the_reference_denominators() {
        let denominators = continued_fractions(&Integer::from(155), 4, 4, None).unwrap();
        let expected: Vec<Integer> = vec![1, 2, 3, 5].into_iter().map(Integer::from).collect();
        assert_eq!(denominators, expected);
    }

    #[test]
    fn denominators_are_strictly_increasing() {
        let denominators = continued_fractions(&Integer::from(12345), 7, 7, None).unwrap();
        for w in denominators.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn rejects_out_of_range_j() {
        assert!(continued_fractions(&Integer::from(-1), 4, 4, None).is_err());
        assert!(continued_fractions(&Integer::from(256), 4, 4, None).is_err());
    }

    #[test]
    fn custom_bound_is_honoured() {
        let denominators = continued_fractions(&Integer::from(155), 4, 4, Some(Integer::from(4))).unwrap();
        let expected: Vec<Integer> = vec![1, 2, 3].into_iter().map(Integer::from).collect();
        assert_eq!(denominators, expected);
    }
}
