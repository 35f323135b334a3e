//! Power iteration with exact convergence and cycle detection.
//!
//! Repeated normalized multiplication drives a starting vector toward the
//! eigenvector of maximal-modulus eigenvalue. Because the backend performs
//! its arithmetic over a quantized, content-addressed representation, the
//! sequence of normalized vectors lives in a finite state space: it must
//! either reach an exact fixed point or re-enter a previously visited state.
//! Both events are detected by handle comparison, so the loop terminates with
//! a provable stopping condition instead of a floating-point tolerance.
//!
//! The run owns all of its state — current and previous handles, the
//! normalizing scalar, the set of previously observed handles, the iteration
//! counter — so independent solves over the same operator can proceed
//! concurrently as long as each has its own backend access.

use std::collections::HashSet;

use crate::backend::{NormKind, NumericBackend};
use crate::error::EigenError;

/// How the iterate is renormalized after each multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormPolicy {
    /// Divide by the maximal-modulus entry; that entry becomes exactly one.
    /// This is the primary, well-specified path.
    MaxNorm,
    /// Divide by the maximal-modulus entry first (to avoid amplifying a tiny
    /// pivot), then scale to unit Euclidean length.
    L2Norm,
}

/// Which termination test fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The new iterate equals the previous one exactly.
    FixedPoint,
    /// The new iterate re-entered a previously visited state.
    Cycle,
}

/// The dominant eigenpair estimate produced by a convergent run.
#[derive(Debug, Clone, Copy)]
pub struct EigenEstimate<V> {
    /// Estimated dominant eigenvalue: the ratio of successive normalizing
    /// scalars at the moment the termination test fired.
    pub value: f64,
    /// Handle of the final normalized iterate.
    pub vector: V,
    /// Iterations performed, counting the first multiplication as one.
    pub iterations: usize,
    /// Which exact termination test ended the run.
    pub convergence: Convergence,
}

/// Runs the power iteration on `operator` starting from `v0`.
///
/// `max_iterations` bounds the loop; `None` relies entirely on the exact
/// convergence and cycle tests, which is sound over a finite representable
/// value space. A zero `v0` fails with [`EigenError::DegenerateVector`]
/// before any multiplication is attempted, as does an iterate that collapses
/// to the zero vector mid-run.
pub fn run<B: NumericBackend>(
    backend: &mut B,
    operator: &B::Operator,
    v0: B::Vector,
    policy: NormPolicy,
    max_iterations: Option<usize>,
) -> Result<EigenEstimate<B::Vector>, EigenError> {
    if backend.is_zero(v0) {
        return Err(EigenError::DegenerateVector);
    }

    let mut v_new = v0;
    let mut max_el_old = backend.one();
    // Handles that were ever the "older" side of an order comparison; only
    // ever grows. Membership of the current iterate means we have looped.
    let mut seen: HashSet<B::Vector> = HashSet::new();
    let mut iterations = 0usize;

    log::debug!("starting power iteration (policy {policy:?})");
    loop {
        let v_old = v_new;
        let unnorm = backend.multiply(operator, v_old)?;
        if backend.is_zero(unnorm) {
            log::warn!("power iteration produced the zero vector at step {iterations}");
            return Err(EigenError::DegenerateVector);
        }

        let (_, max_el) = backend.max_modulus_entry(unnorm);
        let estimate = backend.divide_scalar(max_el, max_el_old);
        match policy {
            NormPolicy::MaxNorm => {
                // The maximal entry of the iterate is now exactly one, so the
                // next normalizing ratio is taken against the identity.
                v_new = backend.divide(unnorm, max_el)?;
                max_el_old = backend.one();
            }
            NormPolicy::L2Norm => {
                let t = backend.divide(unnorm, max_el)?;
                let norm = backend.norm(t, NormKind::L2);
                v_new = backend.divide(t, norm)?;
                max_el_old = backend.divide_scalar(backend.one(), norm);
            }
        }
        iterations += 1;

        if v_new == v_old {
            log::info!("power iteration reached a fixed point after {iterations} iterations");
            return Ok(EigenEstimate {
                value: estimate,
                vector: v_new,
                iterations,
                convergence: Convergence::FixedPoint,
            });
        }
        // The backend's content-addressing order is an arbitrary but fixed
        // total order on handles; a new iterate that precedes its predecessor
        // is a candidate for having been visited before.
        if v_new < v_old {
            if seen.contains(&v_new) {
                log::info!("power iteration detected a cycle after {iterations} iterations");
                return Ok(EigenEstimate {
                    value: estimate,
                    vector: v_new,
                    iterations,
                    convergence: Convergence::Cycle,
                });
            }
            seen.insert(v_new);
        }
        if Some(iterations) == max_iterations {
            log::warn!("power iteration hit the bound of {iterations} iterations");
            return Err(EigenError::NoConvergence { iterations });
        }
        log::debug!("iteration {iterations}: eigenvalue estimate {estimate}");
    }
}
