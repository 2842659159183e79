//! Eigen-decomposition of symmetric matrices.
//!
//! The engine only needs the spectrum of the (symmetric) adjacency matrix,
//! so the default solver is a cyclic Jacobi rotation scheme: it needs no
//! external linear algebra, converges for every real symmetric input, and
//! yields orthonormal eigenvectors directly.

use super::error::{GraphError, GraphResult};
use super::models::{EigenDecomposition, SpectrumConfig};

/// Magnitude below which an eigenvector entry is treated as zero when
/// choosing the vector's sign.
const SIGN_EPSILON: f64 = 1e-9;

/// Maximum asymmetry tolerated between `a[i][j]` and `a[j][i]`.
const SYMMETRY_EPSILON: f64 = 1e-12;

/// Computes eigenvalues and eigenvectors of a real symmetric matrix.
///
/// Implementations must return values in ascending order, one unit-length
/// vector per value, each with its first significant entry positive.
pub trait EigenSolver: Send + Sync {
    fn decompose(&self, matrix: &[Vec<f64>]) -> GraphResult<EigenDecomposition>;
}

/// Cyclic Jacobi eigen-solver.
#[derive(Debug, Clone)]
pub struct JacobiEigenSolver {
    tolerance: f64,
    max_sweeps: usize,
}

impl JacobiEigenSolver {
    pub fn new(config: &SpectrumConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            max_sweeps: config.max_sweeps,
        }
    }
}

impl Default for JacobiEigenSolver {
    fn default() -> Self {
        Self::new(&SpectrumConfig::default())
    }
}

impl EigenSolver for JacobiEigenSolver {
    fn decompose(&self, matrix: &[Vec<f64>]) -> GraphResult<EigenDecomposition> {
        let n = matrix.len();
        if n == 0 {
            return Ok(EigenDecomposition::default());
        }
        validate_symmetric(matrix)?;

        let mut a: Vec<Vec<f64>> = matrix.to_vec();
        let mut v = identity(n);
        let mut sweeps = 0;

        while off_diagonal_norm(&a) >= self.tolerance {
            if sweeps == self.max_sweeps {
                tracing::warn!(
                    sweeps,
                    residual = off_diagonal_norm(&a),
                    "Jacobi solver did not converge"
                );
                return Err(GraphError::NumericFailure { sweeps });
            }
            sweep(&mut a, &mut v);
            sweeps += 1;
        }
        tracing::debug!(size = n, sweeps, "Jacobi solver converged");

        // Pair each diagonal entry with its eigenvector column, then sort
        let mut pairs: Vec<(f64, Vec<f64>)> = (0..n)
            .map(|j| {
                let mut column: Vec<f64> = (0..n).map(|i| v[i][j]).collect();
                normalize_sign(&mut column);
                (a[j][j], column)
            })
            .collect();
        pairs.sort_by(|x, y| x.0.total_cmp(&y.0));

        let (values, vectors) = pairs.into_iter().unzip();
        Ok(EigenDecomposition { values, vectors })
    }
}

fn validate_symmetric(matrix: &[Vec<f64>]) -> GraphResult<()> {
    let n = matrix.len();
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != n {
            return Err(GraphError::InvalidInput(format!(
                "matrix row {} has {} entries, expected {}",
                i,
                row.len(),
                n
            )));
        }
        if row.iter().any(|x| !x.is_finite()) {
            return Err(GraphError::InvalidInput(format!(
                "matrix row {} contains a non-finite entry",
                i
            )));
        }
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if (matrix[i][j] - matrix[j][i]).abs() > SYMMETRY_EPSILON {
                return Err(GraphError::InvalidInput(format!(
                    "matrix is not symmetric at ({}, {})",
                    i, j
                )));
            }
        }
    }
    Ok(())
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// Frobenius norm of the strictly off-diagonal part.
fn off_diagonal_norm(a: &[Vec<f64>]) -> f64 {
    let n = a.len();
    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum += a[i][j] * a[i][j];
            }
        }
    }
    sum.sqrt()
}

/// One cyclic pass annihilating every upper off-diagonal entry in turn.
fn sweep(a: &mut [Vec<f64>], v: &mut [Vec<f64>]) {
    let n = a.len();
    for p in 0..n {
        for q in (p + 1)..n {
            let apq = a[p][q];
            if apq == 0.0 {
                continue;
            }

            let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
            let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
            let t = sign / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;

            // A ← Jᵀ A J, columns then rows
            for row in a.iter_mut() {
                let (akp, akq) = (row[p], row[q]);
                row[p] = c * akp - s * akq;
                row[q] = s * akp + c * akq;
            }
            for k in 0..n {
                let (apk, aqk) = (a[p][k], a[q][k]);
                a[p][k] = c * apk - s * aqk;
                a[q][k] = s * apk + c * aqk;
            }
            a[p][q] = 0.0;
            a[q][p] = 0.0;

            // V ← V J
            for row in v.iter_mut() {
                let (vkp, vkq) = (row[p], row[q]);
                row[p] = c * vkp - s * vkq;
                row[q] = s * vkp + c * vkq;
            }
        }
    }
}

/// Flip the vector so its first entry with magnitude above
/// [`SIGN_EPSILON`] is positive.
fn normalize_sign(vector: &mut [f64]) {
    if let Some(first) = vector.iter().find(|x| x.abs() > SIGN_EPSILON) {
        if *first < 0.0 {
            vector.iter_mut().for_each(|x| *x = -*x);
        }
    }
}
