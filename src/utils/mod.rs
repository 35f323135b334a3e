//! Shared utilities for building test problems.
//!
//! The solvers themselves are matrix-free; everything here exists so that
//! tests and the experiment binary can construct operators whose spectra are
//! known analytically before any iteration starts.

pub mod problem_gen;
