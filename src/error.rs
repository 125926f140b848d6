//! Error types for the modular linear algebra core.

use thiserror::Error;

/// The error type returned by every fallible operation in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinalgError {
    /// A division (scalar or vector leading-term) by zero was attempted.
    #[error("division by zero: {0}")]
    DivisionByZero(String),

    /// A pivot chosen during elimination over a composite modulus was not
    /// a unit, and no fallback (Howell/HNF) was available to the caller.
    #[error("non-invertible pivot modulo composite n: {0}")]
    NonInvertible(String),

    /// An exact division (`divexact`/`divides_array`) found a non-zero
    /// remainder.
    #[error("inexact division: {0}")]
    Inexact(String),

    /// An iterative solver (Wiedemann/Lanczos, scalar or block) exhausted
    /// `max_iters` without converging.
    #[error("iterative solver failed to converge after {iters} iterations")]
    IterativeFailure {
        /// Number of iterations attempted before giving up.
        iters: usize,
    },

    /// Operand shapes were not compatible with the requested operation.
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch {
        /// Human-readable description of the required shape.
        expected: String,
        /// Human-readable description of the shape actually seen.
        found: String,
    },

    /// Two operands carried different moduli.
    #[error("modulus mismatch: {0}")]
    ModulusMismatch(String),

    /// A modulus of zero (or otherwise invalid) was supplied.
    #[error("invalid modulus: {0}")]
    InvalidModulus(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LinalgError>;
