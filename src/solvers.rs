//! High-level entry points combining the two engines.
//!
//! [`dominant_eigenpair`] wraps the power iteration and attaches a residual
//! check to the converged estimate. [`dominant_spectrum`] runs the pipeline
//! the Krylov method was designed around: a few rounds of normalized power
//! iteration first, so the seed is already rich in the dominant directions,
//! then the growing-system extraction. Both functions are fully
//! non-interactive and report failures as values.

use crate::algorithms::krylov::{self, KrylovOutcome};
use crate::algorithms::pivot::ProbeOrder;
use crate::algorithms::power::{self, EigenEstimate, NormPolicy};
use crate::backend::{NormKind, NumericBackend};
use crate::error::EigenError;

/// A converged power-iteration result with its residual norm.
#[derive(Debug, Clone, Copy)]
pub struct DominantEigenpair<V> {
    /// The raw estimate from the power engine.
    pub estimate: EigenEstimate<V>,
    /// `|| (A v) / lambda - v ||` in the norm matching the policy. Zero up
    /// to quantization when the run ended on an exact fixed point.
    pub residual: f64,
}

/// Finds the dominant eigenpair of `operator` and checks it.
pub fn dominant_eigenpair<B: NumericBackend>(
    backend: &mut B,
    operator: &B::Operator,
    v0: B::Vector,
    policy: NormPolicy,
    max_iterations: Option<usize>,
) -> Result<DominantEigenpair<B::Vector>, EigenError> {
    let estimate = power::run(backend, operator, v0, policy, max_iterations)?;

    // The normalizing scalars are nonzero by construction, so the estimate
    // cannot be zero and the rescale below is safe.
    let image = backend.multiply(operator, estimate.vector)?;
    let rescaled = backend.divide(image, estimate.value)?;
    let difference = backend.subtract(rescaled, estimate.vector)?;
    let kind = match policy {
        NormPolicy::MaxNorm => NormKind::Max,
        NormPolicy::L2Norm => NormKind::L2,
    };
    let residual = backend.norm(difference, kind);
    log::info!(
        "dominant eigenvalue estimate {} after {} iterations (residual {residual})",
        estimate.value,
        estimate.iterations
    );

    Ok(DominantEigenpair { estimate, residual })
}

/// Parameters for the power-seeded Krylov pipeline.
#[derive(Debug, Clone, Copy)]
pub struct SpectrumParams {
    /// Normalized power-iteration rounds applied to the seed before the
    /// Krylov extraction starts. Zero feeds the raw seed through.
    pub power_rounds: usize,
    /// Highest characteristic-polynomial degree to attempt.
    pub max_degree: usize,
    /// Probe-row draw order for the pivot selector.
    pub probe_order: ProbeOrder,
}

impl Default for SpectrumParams {
    fn default() -> Self {
        Self {
            power_rounds: 3,
            max_degree: 8,
            probe_order: ProbeOrder::default(),
        }
    }
}

/// Recovers several dominant eigenvalues of `operator`.
///
/// The warmup rounds renormalize by the maximal-modulus entry, exactly like
/// the power engine's max-norm step, but without any convergence machinery:
/// a seed that is already a fixed point simply passes through unchanged.
pub fn dominant_spectrum<B: NumericBackend>(
    backend: &mut B,
    operator: &B::Operator,
    v0: B::Vector,
    params: SpectrumParams,
) -> Result<KrylovOutcome, EigenError> {
    if backend.is_zero(v0) {
        return Err(EigenError::DegenerateVector);
    }

    let mut seed = v0;
    for round in 0..params.power_rounds {
        let image = backend.multiply(operator, seed)?;
        if backend.is_zero(image) {
            log::warn!("power warmup produced the zero vector at round {round}");
            return Err(EigenError::DegenerateVector);
        }
        let (_, max_el) = backend.max_modulus_entry(image);
        seed = backend.divide(image, max_el)?;
    }

    krylov::run(backend, operator, seed, params.max_degree, params.probe_order)
}
