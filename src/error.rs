//! Error taxonomy surfaced at the crate boundary.

use crate::factor::FactorCollection;

/// Errors returned by the arithmetic, lattice and solver layers.
///
/// Contract violations (out-of-range input, non-coprime moduli, singular
/// matrices) and cancellation are the only failure modes; absence of a
/// solution (e.g. a smoothness assumption not holding) is represented by
/// `Option`, not by this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A cooperative deadline elapsed while a long-running loop was checking it.
    #[error("operation timed out")]
    TimedOut,

    /// `solve_r_for_factors` exhausted its iteration budget or its deadline
    /// before driving `N` to a complete factorisation. Carries the partial
    /// factor collection gathered so far.
    #[error("factorisation incomplete after exhausting the iteration/time budget")]
    IncompleteFactorisation(Box<FactorCollection>),

    /// Exact matrix inversion was attempted on a rank-deficient matrix.
    #[error("matrix is singular")]
    Singular,

    /// An input violated a documented precondition (e.g. a non-positive
    /// modulus, an out-of-range frequency, non-coprime CRT moduli).
    #[error("domain error: {0}")]
    DomainError(String),
}

pub type Result<T> = std::result::Result<T, Error>;
