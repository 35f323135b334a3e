//! Probe-row selection for the growing Krylov linear systems.
//!
//! At Krylov step k the engine needs one more row coordinate at which to
//! sample every Krylov vector computed so far. A careless choice — say,
//! always the next row in index order without screening — can silently build
//! a singular system and hand garbage coefficients to the root finder. The
//! selector is the one place where numerical conditioning is explicitly
//! defended: each candidate row is rejected outright if the latest Krylov
//! vector is zero there, and otherwise accepted only after the determinant of
//! the extended square system checks out nonzero.

use faer::{Mat, MatRef};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::backend::NumericBackend;
use crate::error::ProbesExhausted;

/// The order in which candidate rows are drawn.
///
/// Uniform random without replacement avoids any bias toward low row
/// indices; a fixed deterministic sweep satisfies the same contract and
/// makes runs reproducible without a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOrder {
    /// Draw uniformly at random without replacement. `None` seeds from the
    /// operating system.
    Random { seed: Option<u64> },
    /// Sweep the remaining candidates in ascending row order.
    Sequential,
}

impl Default for ProbeOrder {
    fn default() -> Self {
        ProbeOrder::Random { seed: None }
    }
}

/// Chooses well-conditioned probe rows, without replacement, for one solve.
pub struct PivotSelector {
    candidates: Vec<usize>,
    order: ProbeOrder,
    rng: StdRng,
}

impl PivotSelector {
    /// Creates a selector over all row indices `0..dim`.
    pub fn new(dim: usize, order: ProbeOrder) -> Self {
        let rng = match order {
            ProbeOrder::Random { seed: Some(seed) } => StdRng::seed_from_u64(seed),
            _ => StdRng::from_os_rng(),
        };
        Self {
            candidates: (0..dim).collect(),
            order,
            rng,
        }
    }

    /// Row indices still available for selection.
    pub fn remaining(&self) -> usize {
        self.candidates.len()
    }

    /// Selects the next probe row.
    ///
    /// `system` is the rectangular accumulated matrix with one column per
    /// Krylov vector in `krylov_vectors` and one row per already-accepted
    /// probe. On success returns the accepted row index together with the
    /// square extended system (the input rows plus the sampled row), whose
    /// determinant has been verified nonzero through the backend.
    pub fn select_probe<B: NumericBackend>(
        &mut self,
        backend: &B,
        krylov_vectors: &[B::Vector],
        system: MatRef<'_, f64>,
    ) -> Result<(usize, Mat<f64>), ProbesExhausted> {
        debug_assert_eq!(system.ncols(), krylov_vectors.len());
        debug_assert_eq!(system.nrows() + 1, system.ncols());
        let latest = *krylov_vectors
            .last()
            .expect("at least one Krylov vector is required");

        loop {
            if self.candidates.is_empty() {
                log::warn!("no candidate probe rows left");
                return Err(ProbesExhausted);
            }
            let position = match self.order {
                ProbeOrder::Random { .. } => self.rng.random_range(0..self.candidates.len()),
                ProbeOrder::Sequential => 0,
            };
            let row = self.candidates[position];

            // A zero entry in the latest Krylov vector would contribute a
            // degenerate equation; drop the row immediately.
            if backend.scalar_at(latest, row) == 0.0 {
                log::debug!("rejected probe row {row}: zero entry in latest Krylov vector");
                self.candidates.remove(position);
                continue;
            }

            let extended = extend_system(backend, krylov_vectors, system, row);
            let det = backend.determinant(extended.as_ref());
            if det == 0.0 {
                log::debug!("rejected probe row {row}: extended system is singular");
                self.candidates.remove(position);
                continue;
            }

            log::debug!("accepted probe row {row} (determinant {det})");
            self.candidates.remove(position);
            return Ok((row, extended));
        }
    }
}

/// Appends to `system` the row sampling every Krylov vector at `row`.
fn extend_system<B: NumericBackend>(
    backend: &B,
    krylov_vectors: &[B::Vector],
    system: MatRef<'_, f64>,
    row: usize,
) -> Mat<f64> {
    let side = krylov_vectors.len();
    Mat::from_fn(side, side, |i, j| {
        if i < system.nrows() {
            system[(i, j)]
        } else {
            backend.scalar_at(krylov_vectors[j], row)
        }
    })
}
