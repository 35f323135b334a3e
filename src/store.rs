//! A dense, content-addressed reference backend.
//!
//! [`QuantizedStore`] implements [`NumericBackend`] over dense [`faer`]
//! matrices with one twist: every scalar it produces is snapped to a dyadic
//! grid before the result is interned. Two quantization knobs control the
//! representable value space:
//!
//! - `region_bits`: results are rounded to the nearest multiple of
//!   `2^-region_bits`.
//! - `zero_region_bits`: results with modulus below `2^-zero_region_bits`
//!   collapse to exact zero.
//!
//! Interning assigns each distinct (post-quantization) vector a [`VectorId`]
//! in first-seen order, so handle equality is content equality and the `Ord`
//! on handles is the fixed total order the power engine uses for its cycle
//! test. A coarse grid makes the representable space small enough that
//! repeated normalized multiplication must revisit a state; a fine grid
//! behaves like ordinary `f64` arithmetic with exact equality still available.

use faer::prelude::*;
use faer::{c64, Mat, MatRef};
use std::collections::HashMap;

use crate::backend::{NormKind, NumericBackend};
use crate::error::EigenError;

/// Default rounding grid: multiples of 2^-34 (about 6e-11), comfortably
/// coarser than `f64` round-off at magnitudes near one.
pub const DEFAULT_REGION_BITS: u32 = 34;

/// Default zero-collapse band: moduli below 2^-30 (about 1e-9) become zero.
pub const DEFAULT_ZERO_REGION_BITS: u32 = 30;

/// Content-addressed handle to a vector held by a [`QuantizedStore`].
///
/// Ids are assigned in first-intern order and never reused, so `Ord` on
/// handles is stable for the lifetime of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VectorId(u64);

impl VectorId {
    /// The raw id, mainly useful for logging.
    pub fn index(self) -> u64 {
        self.0
    }
}

/// Dense quantizing backend over `faer` matrices.
pub struct QuantizedStore {
    dim: usize,
    region_scale: f64,
    zero_threshold: f64,
    contents: Vec<Box<[f64]>>,
    interned: HashMap<Box<[u64]>, VectorId>,
    multiply_count: u64,
}

impl QuantizedStore {
    /// Creates a store for vectors of length `dim` with explicit precision
    /// parameters.
    pub fn new(dim: usize, region_bits: u32, zero_region_bits: u32) -> Self {
        assert!(dim > 0, "store dimension must be positive");
        Self {
            dim,
            region_scale: f64::exp2(region_bits as f64),
            zero_threshold: f64::exp2(-(zero_region_bits as f64)),
            contents: Vec::new(),
            interned: HashMap::new(),
            multiply_count: 0,
        }
    }

    /// Creates a store with the default precision parameters.
    pub fn with_default_precision(dim: usize) -> Self {
        Self::new(dim, DEFAULT_REGION_BITS, DEFAULT_ZERO_REGION_BITS)
    }

    /// The vector length this store was created for.
    pub fn vector_dim(&self) -> usize {
        self.dim
    }

    /// Number of matrix-vector products performed so far.
    pub fn multiply_count(&self) -> u64 {
        self.multiply_count
    }

    /// Number of distinct vectors interned so far.
    pub fn interned_count(&self) -> usize {
        self.contents.len()
    }

    /// The dense content behind a handle.
    pub fn entries(&self, v: VectorId) -> &[f64] {
        &self.contents[v.0 as usize]
    }

    /// Snaps a scalar onto the store's representable grid.
    fn snap(&self, x: f64) -> f64 {
        if !x.is_finite() {
            return x;
        }
        if x.abs() < self.zero_threshold {
            return 0.0;
        }
        let snapped = (x * self.region_scale).round() / self.region_scale;
        // Normalize -0.0 so bit-level interning cannot split the zero class.
        if snapped == 0.0 {
            0.0
        } else {
            snapped
        }
    }

    fn intern(&mut self, mut values: Vec<f64>) -> VectorId {
        for x in values.iter_mut() {
            *x = self.snap(*x);
        }
        let key: Box<[u64]> = values.iter().map(|x| x.to_bits()).collect();
        if let Some(&id) = self.interned.get(&key) {
            return id;
        }
        let id = VectorId(self.contents.len() as u64);
        self.contents.push(values.into_boxed_slice());
        self.interned.insert(key, id);
        id
    }
}

impl NumericBackend for QuantizedStore {
    type Operator = Mat<f64>;
    type Vector = VectorId;

    fn dim(&self, v: VectorId) -> usize {
        self.entries(v).len()
    }

    fn multiply(&mut self, a: &Mat<f64>, v: VectorId) -> Result<VectorId, EigenError> {
        if a.ncols() != self.dim {
            return Err(EigenError::DimensionMismatch {
                expected: a.ncols(),
                actual: self.dim,
            });
        }
        let rhs = Mat::from_fn(self.dim, 1, |i, _| self.entries(v)[i]);
        let product = a * &rhs;
        self.multiply_count += 1;
        let values = (0..product.nrows()).map(|i| product[(i, 0)]).collect();
        Ok(self.intern(values))
    }

    fn scalar_at(&self, v: VectorId, row: usize) -> f64 {
        self.entries(v)[row]
    }

    fn vector_from_scalars(&mut self, values: &[f64]) -> Result<VectorId, EigenError> {
        if values.len() != self.dim {
            return Err(EigenError::DimensionMismatch {
                expected: self.dim,
                actual: values.len(),
            });
        }
        Ok(self.intern(values.to_vec()))
    }

    fn is_zero(&self, v: VectorId) -> bool {
        self.entries(v).iter().all(|&x| x == 0.0)
    }

    fn norm(&self, v: VectorId, kind: NormKind) -> f64 {
        let value = match kind {
            NormKind::Max => self
                .entries(v)
                .iter()
                .fold(0.0f64, |acc, &x| acc.max(x.abs())),
            NormKind::L2 => self
                .entries(v)
                .iter()
                .map(|&x| x * x)
                .sum::<f64>()
                .sqrt(),
        };
        self.snap(value)
    }

    fn divide(&mut self, v: VectorId, s: f64) -> Result<VectorId, EigenError> {
        let values = self.entries(v).iter().map(|&x| x / s).collect();
        Ok(self.intern(values))
    }

    fn subtract(&mut self, a: VectorId, b: VectorId) -> Result<VectorId, EigenError> {
        let values = self
            .entries(a)
            .iter()
            .zip(self.entries(b).iter())
            .map(|(&x, &y)| x - y)
            .collect();
        Ok(self.intern(values))
    }

    fn divide_scalar(&self, a: f64, b: f64) -> f64 {
        self.snap(a / b)
    }

    fn solve_linear(&self, m: MatRef<'_, f64>, rhs: &[f64]) -> Result<Vec<f64>, EigenError> {
        debug_assert_eq!(m.nrows(), m.ncols());
        debug_assert_eq!(m.nrows(), rhs.len());
        if self.determinant(m) == 0.0 {
            return Err(EigenError::SingularSystem { degree: m.nrows() });
        }
        let rhs_mat = Mat::from_fn(rhs.len(), 1, |i, _| rhs[i]);
        let solution = m.partial_piv_lu().solve(&rhs_mat);
        Ok((0..solution.nrows())
            .map(|i| self.snap(solution[(i, 0)]))
            .collect())
    }

    fn determinant(&self, m: MatRef<'_, f64>) -> f64 {
        self.snap(m.determinant())
    }

    fn find_polynomial_roots(&self, coeffs: &[f64]) -> Result<Vec<c64>, EigenError> {
        let degree = coeffs.len();
        if degree == 0 {
            return Ok(Vec::new());
        }
        // Companion matrix of the monic polynomial: ones on the subdiagonal,
        // negated coefficients in the last column. Its eigenvalues are the
        // roots.
        let companion = Mat::from_fn(degree, degree, |i, j| {
            if j == degree - 1 {
                -coeffs[i]
            } else if i == j + 1 {
                1.0
            } else {
                0.0
            }
        });
        companion
            .as_ref()
            .eigenvalues()
            .map_err(|e| EigenError::RootFinding(format!("companion eigensolve failed: {e:?}")))
    }
}
