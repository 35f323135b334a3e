//! Multi-eigenvalue extraction via growing Krylov linear systems.
//!
//! Starting from a seed vector y0 (ideally one that has already undergone a
//! few rounds of normalized power iteration), the engine generates the raw
//! Krylov sequence y0, Ay0, A²y0, … and samples each vector at a set of
//! probe rows chosen by the pivot selector. For every degree k ≥ 2 the
//! sampled entries form a k×k system `A_k c = -z_k` whose solution provides
//! the non-leading coefficients of a monic degree-k polynomial; the roots of
//! that polynomial approximate eigenvalues reachable from the current Krylov
//! subspace.
//!
//! The engine deliberately does not cluster roots across degrees. A root
//! that keeps reappearing at the same approximate magnitude as k grows is a
//! genuine dominant eigenvalue; one that never recurs is spurious. That
//! judgement is the caller's, and the per-degree [`RootReport`]s carry all
//! the data it needs.

use faer::{c64, Mat};

use super::pivot::{PivotSelector, ProbeOrder};
use crate::backend::NumericBackend;
use crate::error::EigenError;

/// The full root set of one characteristic polynomial, with magnitudes.
#[derive(Debug, Clone)]
pub struct RootReport {
    /// Degree of the polynomial these roots belong to.
    pub degree: usize,
    /// Every root paired with its modulus.
    pub roots: Vec<(c64, f64)>,
}

/// Why the extraction stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KrylovTermination {
    /// Ran through `max_degree` complete iterations.
    Completed,
    /// The Krylov sequence produced the exact zero vector; the subspace is
    /// invariant and no larger degree is reachable. Reports for smaller
    /// degrees remain valid.
    InvariantSubspaceExhausted { degree: usize },
    /// The pivot selector ran out of candidate rows before finding one that
    /// keeps the system nonsingular. Reports for smaller degrees remain
    /// valid.
    NoNonsingularProbe { degree: usize },
}

/// Everything a Krylov run produced, including partial results on the
/// non-fatal termination paths.
#[derive(Debug, Clone)]
pub struct KrylovOutcome {
    /// One report per completed degree ≥ 2, in increasing degree order.
    pub reports: Vec<RootReport>,
    /// Accepted probe rows, in acceptance order. Always distinct.
    pub probe_indices: Vec<usize>,
    /// The reason the run ended.
    pub termination: KrylovTermination,
}

/// Runs the Krylov extraction on `operator` from seed `v0` up to
/// `max_degree`.
///
/// A zero seed fails with [`EigenError::DegenerateVector`]. A singular
/// system that the pivot selector had already accepted surfaces as
/// [`EigenError::SingularSystem`]; that path indicates a defect, not a
/// property of the input.
pub fn run<B: NumericBackend>(
    backend: &mut B,
    operator: &B::Operator,
    v0: B::Vector,
    max_degree: usize,
    order: ProbeOrder,
) -> Result<KrylovOutcome, EigenError> {
    if backend.is_zero(v0) {
        return Err(EigenError::DegenerateVector);
    }

    let dim = backend.dim(v0);
    let mut selector = PivotSelector::new(dim, order);
    let mut krylov_vectors = vec![v0];
    let mut probe_indices: Vec<usize> = Vec::new();
    let mut reports: Vec<RootReport> = Vec::new();

    // Bootstrap: the 1x1 "system" is the seed entry at the first probe row.
    // Any row with a nonzero seed entry qualifies; the selector's
    // determinant screen degenerates to exactly that test here.
    let mut system = match selector.select_probe(
        backend,
        &krylov_vectors,
        Mat::<f64>::zeros(0, 1).as_ref(),
    ) {
        Ok((row, extended)) => {
            probe_indices.push(row);
            extended
        }
        Err(_) => {
            // Unreachable for a nonzero seed, but the contract still returns
            // partial results rather than an error.
            return Ok(KrylovOutcome {
                reports,
                probe_indices,
                termination: KrylovTermination::NoNonsingularProbe { degree: 0 },
            });
        }
    };

    for degree in 1..=max_degree {
        let y = backend.multiply(operator, krylov_vectors[degree - 1])?;
        if backend.is_zero(y) {
            log::info!("Krylov sequence hit the zero vector at degree {degree}");
            return Ok(KrylovOutcome {
                reports,
                probe_indices,
                termination: KrylovTermination::InvariantSubspaceExhausted { degree },
            });
        }
        krylov_vectors.push(y);

        // Sample the newest vector at the already-fixed probe rows.
        let rhs: Vec<f64> = probe_indices
            .iter()
            .map(|&row| backend.scalar_at(y, row))
            .collect();

        if degree >= 2 {
            let negated: Vec<f64> = rhs.iter().map(|&z| -z).collect();
            let coeffs = backend
                .solve_linear(system.as_ref(), &negated)
                .map_err(|e| match e {
                    // The selector vouched for this system; singular here is
                    // a broken contract, reported at the failing degree.
                    EigenError::SingularSystem { .. } => EigenError::SingularSystem { degree },
                    other => other,
                })?;
            let roots = backend.find_polynomial_roots(&coeffs)?;
            log::debug!(
                "degree {degree}: roots {:?}",
                roots.iter().map(|r| r.norm()).collect::<Vec<_>>()
            );
            reports.push(RootReport {
                degree,
                roots: roots.into_iter().map(|r| (r, r.norm())).collect(),
            });
        }

        if degree == max_degree {
            break;
        }

        // Widen the system with the sampled column, then let the selector
        // supply the row that squares it off again.
        let widened = Mat::from_fn(degree, degree + 1, |i, j| {
            if j < degree {
                system[(i, j)]
            } else {
                rhs[i]
            }
        });
        match selector.select_probe(backend, &krylov_vectors, widened.as_ref()) {
            Ok((row, extended)) => {
                probe_indices.push(row);
                system = extended;
            }
            Err(_) => {
                log::warn!("probe selection exhausted at degree {degree}");
                return Ok(KrylovOutcome {
                    reports,
                    probe_indices,
                    termination: KrylovTermination::NoNonsingularProbe { degree },
                });
            }
        }
    }

    Ok(KrylovOutcome {
        reports,
        probe_indices,
        termination: KrylovTermination::Completed,
    })
}
