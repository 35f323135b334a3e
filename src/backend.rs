//! The numeric-backend abstraction consumed by the eigen-extraction engines.
//!
//! The power-iteration and Krylov engines never touch a matrix entry
//! directly. Their fundamental operations are matrix-vector multiplication,
//! scalar extraction by coordinate, norms, small dense linear solves, and
//! polynomial root-finding. Everything else about the operator — how it is
//! stored, compressed, or shared — belongs behind this trait.
//!
//! The abstraction buys two things beyond the usual matrix-free generality:
//!
//! 1. **Exact termination.** Vectors are exposed as opaque *handles* that are
//!    content-addressed: two handles compare equal exactly when they denote
//!    the same numeric content, and the handle order is a fixed total order.
//!    Over a backend with a finite representable value space, the power
//!    iteration therefore terminates with a provable stopping condition
//!    (fixed point or revisited state) instead of a floating-point tolerance.
//! 2. **Testability.** The engines can be exercised against a small dense
//!    backend with analytically known spectra, then pointed at a large
//!    compressed store without changing a line of algorithm code.
//!
//! The crate fixes the working scalar at `f64`: handles stay opaque, scalars
//! read out of them do not. Characteristic-polynomial roots are reported as
//! [`faer::c64`] since real data can have complex-conjugate root pairs.

use faer::{c64, MatRef};
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::EigenError;

/// Which vector norm a backend computation should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormKind {
    /// The maximum-modulus entry (the L-infinity norm).
    Max,
    /// The Euclidean norm.
    L2,
}

/// A numeric backend supplying the operations the engines require.
///
/// Implementations own every vector they hand out. Handles are `Copy` and
/// cheap to compare; the `Ord` impl must be an arbitrary but *fixed* total
/// order consistent with content addressing (the reference implementation
/// uses first-intern order), because the power engine reuses it verbatim for
/// cycle detection.
pub trait NumericBackend {
    /// The opaque operator type, owned by the caller and immutable for the
    /// duration of a solve.
    type Operator;

    /// Content-addressed vector handle. Handle equality implies equality of
    /// the represented numeric content.
    type Vector: Copy + Eq + Ord + Hash + Debug;

    /// Number of rows of the vector behind `v`.
    fn dim(&self, v: Self::Vector) -> usize;

    /// Computes `a * v`, returning the handle of the product vector.
    fn multiply(
        &mut self,
        a: &Self::Operator,
        v: Self::Vector,
    ) -> Result<Self::Vector, EigenError>;

    /// Reads the scalar at coordinate `row` of the column vector `v`.
    fn scalar_at(&self, v: Self::Vector, row: usize) -> f64;

    /// Interns a column vector built from the given scalars.
    fn vector_from_scalars(&mut self, values: &[f64]) -> Result<Self::Vector, EigenError>;

    /// True when `v` is the exact all-zero vector.
    fn is_zero(&self, v: Self::Vector) -> bool;

    /// Computes the requested norm of `v`.
    fn norm(&self, v: Self::Vector, kind: NormKind) -> f64;

    /// Element-wise division of `v` by the scalar `s`.
    fn divide(&mut self, v: Self::Vector, s: f64) -> Result<Self::Vector, EigenError>;

    /// Element-wise difference `a - b`.
    fn subtract(
        &mut self,
        a: Self::Vector,
        b: Self::Vector,
    ) -> Result<Self::Vector, EigenError>;

    /// Scalar division `a / b` at the backend's working precision.
    fn divide_scalar(&self, a: f64, b: f64) -> f64;

    /// The multiplicative identity of the backend's scalar domain.
    fn one(&self) -> f64 {
        1.0
    }

    /// Solves the dense square system `m * x = rhs`.
    ///
    /// Fails with [`EigenError::SingularSystem`] when `m` is not invertible.
    /// The Krylov engine only ever passes systems the pivot selector already
    /// screened, so a singular report from here is a contract violation.
    fn solve_linear(&self, m: MatRef<'_, f64>, rhs: &[f64]) -> Result<Vec<f64>, EigenError>;

    /// Computes the determinant of the dense square matrix `m` at the
    /// backend's working precision.
    fn determinant(&self, m: MatRef<'_, f64>) -> f64;

    /// Finds all roots of the monic polynomial
    /// `x^k + coeffs[k-1] x^(k-1) + ... + coeffs[0]`.
    fn find_polynomial_roots(&self, coeffs: &[f64]) -> Result<Vec<c64>, EigenError>;

    /// Returns the coordinate and value of the maximal-modulus entry of `v`,
    /// breaking ties toward the first such entry in row order.
    ///
    /// Provided in terms of [`scalar_at`](Self::scalar_at); backends with a
    /// cheaper native reduction may override it.
    fn max_modulus_entry(&self, v: Self::Vector) -> (usize, f64) {
        let mut best_row = 0;
        let mut best = self.scalar_at(v, 0);
        for row in 1..self.dim(v) {
            let x = self.scalar_at(v, row);
            if x.abs() > best.abs() {
                best_row = row;
                best = x;
            }
        }
        (best_row, best)
    }
}
