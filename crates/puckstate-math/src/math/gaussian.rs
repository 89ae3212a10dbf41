//! Multivariate Gaussian log-density over a Cholesky factor.

use crate::math::linalg::{Cholesky, LinalgError, SquareMatrix};

const LN_2PI: f64 = 1.837_877_066_409_345_3; // ln(2*pi)

/// A multivariate normal distribution with precomputed Cholesky factor.
///
/// Factoring the covariance once per EM iteration amortizes the O(d^3) cost
/// across every observation's density evaluation.
#[derive(Debug, Clone)]
pub struct MvNormal {
    mean: Vec<f64>,
    chol: Cholesky,
    log_det: f64,
}

impl MvNormal {
    /// Build from a mean vector and covariance matrix.
    ///
    /// Fails if the covariance is not positive definite or dimensions
    /// disagree.
    pub fn new(mean: Vec<f64>, covariance: &SquareMatrix) -> Result<Self, LinalgError> {
        if covariance.dim() != mean.len() {
            return Err(LinalgError::DimensionMismatch {
                expected: mean.len(),
                got: covariance.dim(),
            });
        }
        let chol = covariance.cholesky()?;
        let log_det = chol.log_det();
        Ok(Self {
            mean,
            chol,
            log_det,
        })
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Log-density at `x`.
    ///
    /// log N(x; mu, Sigma) = -0.5 * (d ln(2 pi) + ln det Sigma + m)
    /// where m = (x - mu)^T Sigma^-1 (x - mu) via the Cholesky factor.
    pub fn log_density(&self, x: &[f64]) -> Result<f64, LinalgError> {
        if x.len() != self.mean.len() {
            return Err(LinalgError::DimensionMismatch {
                expected: self.mean.len(),
                got: x.len(),
            });
        }
        let centered: Vec<f64> = x
            .iter()
            .zip(self.mean.iter())
            .map(|(xi, mi)| xi - mi)
            .collect();
        let z = self.chol.solve_lower(&centered)?;
        let mahalanobis: f64 = z.iter().map(|v| v * v).sum();
        let d = self.mean.len() as f64;
        Ok(-0.5 * (d * LN_2PI + self.log_det + mahalanobis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn standard_normal_at_origin() {
        let cov = SquareMatrix::identity(1);
        let mvn = MvNormal::new(vec![0.0], &cov).unwrap();
        // ln(1/sqrt(2*pi))
        let expected = -0.5 * LN_2PI;
        assert!(approx_eq(mvn.log_density(&[0.0]).unwrap(), expected, 1e-12));
    }

    #[test]
    fn univariate_matches_closed_form() {
        let var = 2.5f64;
        let mean = 1.0;
        let x = -0.3;
        let mut cov = SquareMatrix::zeros(1);
        cov.set(0, 0, var);
        let mvn = MvNormal::new(vec![mean], &cov).unwrap();
        let expected = -0.5 * (LN_2PI + var.ln() + (x - mean) * (x - mean) / var);
        assert!(approx_eq(mvn.log_density(&[x]).unwrap(), expected, 1e-12));
    }

    #[test]
    fn correlated_bivariate_density() {
        // Sigma = [[2, 1], [1, 2]], det = 3, inverse = 1/3 [[2, -1], [-1, 2]]
        let cov = SquareMatrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
        let mvn = MvNormal::new(vec![0.0, 0.0], &cov).unwrap();
        let x = [1.0, -1.0];
        let mahalanobis = (2.0 * 1.0 + 2.0 * 1.0 + 2.0 * 1.0 * 1.0) / 3.0; // x^T Sigma^-1 x = 2
        let expected = -0.5 * (2.0 * LN_2PI + 3.0f64.ln() + mahalanobis);
        assert!(approx_eq(mvn.log_density(&x).unwrap(), expected, 1e-10));
    }

    #[test]
    fn density_peaks_at_mean() {
        let cov = SquareMatrix::from_rows(&[vec![1.0, 0.3], vec![0.3, 1.0]]).unwrap();
        let mvn = MvNormal::new(vec![0.5, -0.5], &cov).unwrap();
        let at_mean = mvn.log_density(&[0.5, -0.5]).unwrap();
        let off_mean = mvn.log_density(&[1.5, 0.5]).unwrap();
        assert!(at_mean > off_mean);
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let cov = SquareMatrix::identity(2);
        assert!(MvNormal::new(vec![0.0], &cov).is_err());
        let mvn = MvNormal::new(vec![0.0, 0.0], &cov).unwrap();
        assert!(mvn.log_density(&[0.0]).is_err());
    }

    #[test]
    fn singular_covariance_rejected() {
        let cov = SquareMatrix::from_rows(&[vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        assert!(MvNormal::new(vec![0.0, 0.0], &cov).is_err());
    }
}
