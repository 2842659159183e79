//! Mock eigen solver for testing engine consumers.
//!
//! Returns a pre-configured decomposition (or failure) without touching
//! the matrix.

use super::error::{GraphError, GraphResult};
use super::models::EigenDecomposition;
use super::spectrum::EigenSolver;

/// Mock implementation of `EigenSolver` for testing.
pub struct MockEigenSolver {
    result: GraphResult<EigenDecomposition>,
}

impl MockEigenSolver {
    /// A solver that returns an empty decomposition.
    pub fn new() -> Self {
        Self::with_result(EigenDecomposition::default())
    }

    pub fn with_result(result: EigenDecomposition) -> Self {
        Self { result: Ok(result) }
    }

    /// A solver that never converges.
    pub fn failing() -> Self {
        Self {
            result: Err(GraphError::NumericFailure { sweeps: 0 }),
        }
    }
}

impl Default for MockEigenSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl EigenSolver for MockEigenSolver {
    fn decompose(&self, _matrix: &[Vec<f64>]) -> GraphResult<EigenDecomposition> {
        self.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_preset() {
        let mock = MockEigenSolver::new();
        assert!(mock.decompose(&[vec![1.0]]).unwrap().is_empty());
        assert!(MockEigenSolver::failing().decompose(&[]).is_err());
    }
}
