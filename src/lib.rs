//! Dominant-eigenvalue extraction over content-addressed linear operators.
//!
//! This crate implements two cooperating iterative methods for recovering
//! the dominant part of the spectrum of a large implicit linear operator:
//!
//! **Power iteration** ([`algorithms::power`]): repeated normalized
//! multiplication converging to the single maximal-modulus eigenpair. The
//! backend's arithmetic is quantized and content-addressed, so convergence
//! is detected *exactly* — the iterate either reproduces itself (fixed
//! point) or revisits a previously seen state (cycle) — rather than through
//! a floating-point tolerance.
//!
//! **Krylov extraction** ([`algorithms::krylov`]): recovers several dominant
//! eigenvalues at once by sampling the raw Krylov sequence y, Ay, A²y, … at
//! probe rows, solving a growing linear system for characteristic-polynomial
//! coefficients at each degree, and reporting every polynomial's roots. A
//! root that persists across increasing degrees is a genuine eigenvalue;
//! one that never recurs is spurious. The [`algorithms::pivot`] selector
//! guards the growing system against singularity by rejecting probe rows
//! until the extended determinant checks out nonzero.
//!
//! Both engines are matrix-free: they speak to the operator exclusively
//! through the [`backend::NumericBackend`] trait, which supplies
//! multiplication, coordinate reads, norms, dense solves and polynomial
//! root-finding. The crate ships one conformant backend,
//! [`store::QuantizedStore`], built on the [`faer`] linear algebra framework
//! with dyadic-grid quantization and vector interning.
//!
//! ## Example
//!
//! ```rust
//! use eigenprobe::solvers::{dominant_eigenpair, dominant_spectrum, SpectrumParams};
//! use eigenprobe::{NormPolicy, NumericBackend, ProbeOrder, QuantizedStore};
//! use faer::Mat;
//!
//! // A diagonal operator with spectrum {10, 7, 3, 1}.
//! let eigs = [10.0, 7.0, 3.0, 1.0];
//! let a = Mat::from_fn(4, 4, |i, j| if i == j { eigs[i] } else { 0.0 });
//!
//! let mut store = QuantizedStore::with_default_precision(4);
//! let v0 = store.vector_from_scalars(&[0.9, 0.7, 0.5, 0.3])?;
//!
//! // The power engine finds the dominant eigenpair with an exact stop.
//! let pair = dominant_eigenpair(&mut store, &a, v0, NormPolicy::MaxNorm, None)?;
//! assert!((pair.estimate.value - 10.0).abs() < 1e-6);
//!
//! // The Krylov engine reports characteristic-polynomial roots per degree.
//! let outcome = dominant_spectrum(
//!     &mut store,
//!     &a,
//!     v0,
//!     SpectrumParams {
//!         power_rounds: 0,
//!         max_degree: 4,
//!         probe_order: ProbeOrder::Sequential,
//!     },
//! )?;
//! let final_report = outcome.reports.last().unwrap();
//! assert_eq!(final_report.degree, 4);
//! assert_eq!(final_report.roots.len(), 4);
//! # Ok::<(), eigenprobe::EigenError>(())
//! ```
//!
//! ## Concurrency
//!
//! Every operation is a blocking call into the backend and each `run` owns
//! its entire iteration state, so independent solves are embarrassingly
//! parallel as long as each has its own backend. There is no parallelism to
//! exploit inside a single solve: step k's output is step k+1's input.

// Declare the modules that form the crate's API structure.
pub mod algorithms;
pub mod backend;
pub mod error;
pub mod solvers;
pub mod store;
pub mod utils;

// Re-export the main API for convenient access.
pub use algorithms::krylov::{KrylovOutcome, KrylovTermination, RootReport};
pub use algorithms::pivot::{PivotSelector, ProbeOrder};
pub use algorithms::power::{Convergence, EigenEstimate, NormPolicy};
pub use backend::{NormKind, NumericBackend};
pub use error::{EigenError, ProbesExhausted};
pub use store::{QuantizedStore, VectorId};
