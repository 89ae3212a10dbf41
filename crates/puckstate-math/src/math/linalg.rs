//! Small dense symmetric matrices and Cholesky factorization.
//!
//! The emission model works with per-state covariance matrices whose
//! dimension is the feature count (six for the standard game-stat schema),
//! so a plain row-major `Vec<f64>` with O(d^3) factorization is the right
//! tool; there is no need for a general linear algebra dependency.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors from matrix construction or factorization.
#[derive(Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Matrix is not positive definite; the pivot column that failed.
    NotPositiveDefinite { pivot: usize },
    /// Input dimensions do not agree.
    DimensionMismatch { expected: usize, got: usize },
}

impl fmt::Display for LinalgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinalgError::NotPositiveDefinite { pivot } => {
                write!(f, "matrix not positive definite at pivot {}", pivot)
            }
            LinalgError::DimensionMismatch { expected, got } => {
                write!(f, "dimension mismatch: expected {}, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for LinalgError {}

/// A square matrix stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareMatrix {
    dim: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    /// Zero matrix of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![0.0; dim * dim],
        }
    }

    /// Identity matrix of the given dimension.
    pub fn identity(dim: usize) -> Self {
        let mut m = Self::zeros(dim);
        for i in 0..dim {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Build from nested rows. All rows must have length `rows.len()`.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, LinalgError> {
        let dim = rows.len();
        let mut m = Self::zeros(dim);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(LinalgError::DimensionMismatch {
                    expected: dim,
                    got: row.len(),
                });
            }
            for (j, &v) in row.iter().enumerate() {
                m.set(i, j, v);
            }
        }
        Ok(m)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dim + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.dim + j] = value;
    }

    /// Add `value` to every diagonal entry (ridge regularization).
    pub fn add_diagonal(&mut self, value: f64) {
        for i in 0..self.dim {
            let v = self.get(i, i) + value;
            self.set(i, i, v);
        }
    }

    /// True if any entry is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.data.iter().any(|v| !v.is_finite())
    }

    /// Cholesky factorization A = L L^T for symmetric positive-definite A.
    ///
    /// Only the lower triangle of `self` is read. Fails if a pivot is not
    /// strictly positive, which for a covariance matrix means it is singular
    /// (or numerically indistinguishable from singular).
    pub fn cholesky(&self) -> Result<Cholesky, LinalgError> {
        let n = self.dim;
        let mut lower = vec![0.0; n * n];
        for j in 0..n {
            let mut diag = self.get(j, j);
            for k in 0..j {
                let l = lower[j * n + k];
                diag -= l * l;
            }
            if !(diag > 0.0) || !diag.is_finite() {
                return Err(LinalgError::NotPositiveDefinite { pivot: j });
            }
            let diag_sqrt = diag.sqrt();
            lower[j * n + j] = diag_sqrt;
            for i in (j + 1)..n {
                let mut sum = self.get(i, j);
                for k in 0..j {
                    sum -= lower[i * n + k] * lower[j * n + k];
                }
                lower[i * n + j] = sum / diag_sqrt;
            }
        }
        Ok(Cholesky { dim: n, lower })
    }
}

/// Lower-triangular Cholesky factor of a positive-definite matrix.
#[derive(Debug, Clone)]
pub struct Cholesky {
    dim: usize,
    lower: Vec<f64>,
}

impl Cholesky {
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Solve L y = b by forward substitution.
    pub fn solve_lower(&self, b: &[f64]) -> Result<Vec<f64>, LinalgError> {
        if b.len() != self.dim {
            return Err(LinalgError::DimensionMismatch {
                expected: self.dim,
                got: b.len(),
            });
        }
        let n = self.dim;
        let mut y = vec![0.0; n];
        for i in 0..n {
            let mut sum = b[i];
            for k in 0..i {
                sum -= self.lower[i * n + k] * y[k];
            }
            y[i] = sum / self.lower[i * n + i];
        }
        Ok(y)
    }

    /// log det(A) = 2 * sum(ln L_ii).
    pub fn log_det(&self) -> f64 {
        let n = self.dim;
        (0..n).map(|i| self.lower[i * n + i].ln()).sum::<f64>() * 2.0
    }
}
