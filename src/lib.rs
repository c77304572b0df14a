//! Classical post-processing for the output of Shor-type quantum circuits.
//!
//! # Introduction
//! `shor-postproc` is the classical partner of a quantum order-finding or
//! discrete-logarithm circuit (Shor's algorithm and its Ekerå–Håstad /
//! Ekerå / Seifert variants): given one or more frequency samples drawn
//! from the circuit's output distribution, it recovers the hidden order
//! `r`, discrete log `d`, or the full factorisation of an RSA modulus `N`.
//!
//! The crate is organised bottom-up: exact arithmetic and linear algebra
//! ([`arith`], [`linalg`]) underlie two lattice reducers ([`lagrange`] for
//! 2D bases, [`lll`] for the general case), which in turn underlie the
//! closest/shortest-vector search of [`enumerate`] and [`babai`]. The
//! smoothness-reconstruction algorithms of [`smooth`] and the candidate
//! bookkeeping of [`candidates`] feed the top-level solvers in [`order`],
//! [`dlog`] and [`factor`]. [`group`] is the opaque group-element contract
//! every solver is generic over. [`timeout`] threads a cooperative deadline
//! through every long-running loop.
//!
//! # Examples
//!
//! Recovering a 5-bit order from a single frequency sample via continued
//! fractions:
//!
//! ```rust
//! use shor_postproc::{
//!     group::{CyclicGroupElement, SimulatedGroupElement},
//!     order::{solve_j_for_r, SolutionMethod},
//!     timeout::Timeout,
//! };
//! use rug::Integer;
//!
//! let r = Integer::from(23);
//! let g = SimulatedGroupElement::generator(r.clone());
//!
//! // j = 980 sits near a peak of the order-23 frequency distribution; its
//! // continued-fraction expansion's last denominator under the default
//! // bound (32) is the true order, 23.
//! let recovered = solve_j_for_r(
//!     &Integer::from(980),
//!     5,
//!     5,
//!     &g,
//!     2,
//!     4,
//!     false,
//!     SolutionMethod::ContinuedFractions,
//!     true,
//!     false,
//!     &Timeout::indefinite(),
//! )
//! .unwrap();
//!
//! assert_eq!(recovered, Some(r));
//! ```
//!
//! Driving a known order to the complete factorisation of `N = 15`:
//!
//! ```rust
//! use shor_postproc::factor::{solve_r_for_factors, FactoringOptions};
//! use rug::Integer;
//!
//! let mut sample = |_modulus: &Integer| Integer::from(4);
//! let factors = solve_r_for_factors(
//!     Integer::from(15),
//!     &Integer::from(2),
//!     2,
//!     3,
//!     FactoringOptions::default(),
//!     &mut sample,
//!     &shor_postproc::timeout::Timeout::indefinite(),
//! )
//! .unwrap();
//!
//! let mut primes: Vec<i64> = factors.iter().map(|p| p.to_i64().unwrap()).collect();
//! primes.sort();
//! assert_eq!(primes, vec![3, 5]);
//! ```

extern crate rug;

pub mod arith;
pub mod babai;
pub mod candidates;
pub mod contfrac;
pub mod dlog;
pub mod enumerate;
pub mod error;
pub mod factor;
pub mod group;
pub mod lagrange;
pub mod linalg;
pub mod lll;
pub mod order;
pub mod smooth;
pub mod timeout;
