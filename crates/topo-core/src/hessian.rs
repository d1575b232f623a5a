//! Hessian evaluation and curvature analysis.

use nalgebra::{DMatrix, SymmetricEigen};

use crate::Potential;

/// Default relative step used by the finite-difference Hessian.
pub const DEFAULT_FD_STEP: f64 = 1e-5;

/// Central finite-difference Hessian built from gradient evaluations.
///
/// Column `j` is `(g(x + h e_j) - g(x - h e_j)) / 2h` with
/// `h = step * max(1, |x_j|)`; the result is symmetrised.
pub fn finite_difference_hessian(potential: &dyn Potential, x: &[f64], step: f64) -> DMatrix<f64> {
    let n = x.len();
    let mut hessian = DMatrix::<f64>::zeros(n, n);
    let mut probe = x.to_vec();
    for j in 0..n {
        let h = step * x[j].abs().max(1.0);
        probe[j] = x[j] + h;
        let forward = potential.gradient(&probe);
        probe[j] = x[j] - h;
        let backward = potential.gradient(&probe);
        probe[j] = x[j];
        for i in 0..n {
            hessian[(i, j)] = (forward[i] - backward[i]) / (2.0 * h);
        }
    }
    0.5 * (&hessian + hessian.transpose())
}

/// Analytic Hessian when available, finite differences otherwise.
pub fn hessian_at(potential: &dyn Potential, x: &[f64], fd_step: f64) -> DMatrix<f64> {
    potential
        .hessian(x)
        .unwrap_or_else(|| finite_difference_hessian(potential, x, fd_step))
}

/// Eigen-decomposition of the Hessian, sorted by ascending eigenvalue.
#[derive(Debug, Clone, PartialEq)]
pub struct Curvature {
    /// Eigenvalues in ascending order.
    pub eigenvalues: Vec<f64>,
    /// Unit eigenvectors matching `eigenvalues`.
    pub eigenvectors: Vec<Vec<f64>>,
}

impl Curvature {
    /// Lowest eigenvalue and its eigenvector.
    pub fn lowest(&self) -> (f64, &[f64]) {
        (self.eigenvalues[0], &self.eigenvectors[0])
    }

    /// Number of eigenvalues strictly below `-tolerance`.
    pub fn negative_count(&self, tolerance: f64) -> usize {
        self.eigenvalues.iter().filter(|&&v| v < -tolerance).count()
    }
}

/// Computes the sorted Hessian spectrum at `x`.
pub fn curvature(potential: &dyn Potential, x: &[f64], fd_step: f64) -> Curvature {
    let hessian = hessian_at(potential, x, fd_step);
    let symmetric = 0.5 * (&hessian + hessian.transpose());
    let eigen = SymmetricEigen::new(symmetric);
    let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[a]
            .partial_cmp(&eigen.eigenvalues[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let eigenvalues = order.iter().map(|&i| eigen.eigenvalues[i]).collect();
    let eigenvectors = order
        .iter()
        .map(|&i| eigen.eigenvectors.column(i).iter().copied().collect())
        .collect();
    Curvature {
        eigenvalues,
        eigenvectors,
    }
}
