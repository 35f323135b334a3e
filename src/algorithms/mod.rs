//! The two eigen-extraction algorithms and their shared pivot helper.
//!
//! Dependency order, leaves first: [`crate::backend::NumericBackend`] →
//! [`pivot`] → [`power`] → [`krylov`]. The Krylov engine reuses the same
//! multiplication primitive the power engine normalizes, and leans on the
//! pivot selector to keep its growing linear systems nonsingular.

pub mod krylov;
pub mod pivot;
pub mod power;

pub use krylov::{KrylovOutcome, KrylovTermination, RootReport};
pub use pivot::{PivotSelector, ProbeOrder};
pub use power::{Convergence, EigenEstimate, NormPolicy};
