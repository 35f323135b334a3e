//! Error types for the eigen-extraction engines.
//!
//! All ordinary failure modes are returned as explicit values, never panics:
//! a caller that drives a solve to exhaustion receives the failure kind
//! together with whatever partial results the engine produced before it.
//! Using the [`thiserror`] crate keeps the boilerplate minimal.

use thiserror::Error;

/// Represents all failure modes of the power-iteration and Krylov engines.
#[derive(Error, Debug)]
pub enum EigenError {
    /// The iteration produced (or was handed) an exact zero vector. No
    /// further multiplication can make progress, so the run is over.
    #[error("degenerate vector: the iteration produced an exact zero vector")]
    DegenerateVector,

    /// The power iteration exhausted its iteration bound without reaching a
    /// fixed point or re-entering a previously visited state. Recoverable by
    /// raising the bound or restarting from a different vector.
    #[error("no convergence after {iterations} iterations")]
    NoConvergence { iterations: usize },

    /// The linear solve reported a singular system matrix even though the
    /// pivot selector had already accepted it as nonsingular. This is an
    /// internal contract violation and must be treated as a defect, not
    /// retried.
    #[error("singular system of degree {degree} accepted by the pivot selector")]
    SingularSystem { degree: usize },

    /// The backend eigensolver failed while extracting the roots of a
    /// characteristic polynomial.
    #[error("root finding failed: {0}")]
    RootFinding(String),

    /// The dimensions of the operator and a vector are incompatible for a
    /// matrix-vector product.
    #[error("dimension mismatch: operator expects {expected} rows but vector has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Returned by the pivot selector when every remaining candidate row was
/// rejected, either for a zero entry in the latest Krylov vector or for
/// producing a singular system.
///
/// This is not a hard error at the engine level: the Krylov engine converts
/// it into a termination marker and still hands back every root report
/// produced for smaller degrees.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("pivot candidates exhausted without finding a nonsingular probe row")]
pub struct ProbesExhausted;
