//! Construction of operators with a fully known spectrum.
//!
//! The recipe: draw a random orthonormal matrix `M` by accumulating
//! Householder reflections, pick the eigenvalues `d_1 < d_2 < ... < d_n`
//! explicitly, and form `E = M^T D M`. The rows of `M` are then the
//! eigenvectors of `E` and the chosen values its eigenvalues, which gives
//! every test a ground truth that does not depend on any eigensolver.

use faer::Mat;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Generates a random orthonormal `dim x dim` matrix with determinant one,
/// built from Householder reflections of normally distributed vectors.
pub fn random_orthonormal<R: Rng>(dim: usize, rng: &mut R) -> Mat<f64> {
    let mut h = Mat::<f64>::identity(dim, dim);
    let mut d = vec![1.0f64; dim];

    for n in 1..dim {
        let block = dim - n + 1;
        let mut x: Vec<f64> = (0..block).map(|_| StandardNormal.sample(rng)).collect();
        d[n - 1] = if x[0] >= 0.0 { 1.0 } else { -1.0 };
        let norm = x.iter().map(|&v| v * v).sum::<f64>().sqrt();
        x[0] -= d[n - 1] * norm;
        let xx: f64 = x.iter().map(|&v| v * v).sum();

        // Identity with its bottom-right block replaced by the reflector
        // I - 2 x x^T / (x . x).
        let offset = n - 1;
        let reflector = Mat::from_fn(dim, dim, |i, j| {
            let identity = if i == j { 1.0 } else { 0.0 };
            if i >= offset && j >= offset {
                identity - 2.0 * x[i - offset] * x[j - offset] / xx
            } else {
                identity
            }
        });
        h = &h * &reflector;
    }

    // Fix the last sign so the determinant comes out to one.
    let parity = if dim % 2 == 1 { 1.0 } else { -1.0 };
    d[dim - 1] = parity * d.iter().product::<f64>();
    Mat::from_fn(dim, dim, |i, j| d[i] * h[(i, j)])
}

/// Builds `E = M^T D M` for the given eigenvalues, with `M` random
/// orthonormal. Returns the operator together with `M`; row `i` of `M` is
/// the eigenvector of `E` for `eigenvalues[i]`.
pub fn known_spectrum_operator<R: Rng>(
    eigenvalues: &[f64],
    rng: &mut R,
) -> (Mat<f64>, Mat<f64>) {
    let dim = eigenvalues.len();
    let m = random_orthonormal(dim, rng);
    let e = Mat::from_fn(dim, dim, |i, j| {
        (0..dim)
            .map(|k| m[(k, i)] * eigenvalues[k] * m[(k, j)])
            .sum()
    });
    (e, m)
}

/// The nonrandom eigenvalue choice: the integers `1..=dim`.
pub fn integer_eigenvalues(dim: usize) -> Vec<f64> {
    (1..=dim).map(|i| i as f64).collect()
}

/// Sorted normally distributed eigenvalues, for spectra without structure.
pub fn sorted_random_eigenvalues<R: Rng>(dim: usize, rng: &mut R) -> Vec<f64> {
    let mut values: Vec<f64> = (0..dim).map(|_| StandardNormal.sample(rng)).collect();
    values.sort_by(f64::total_cmp);
    values
}
