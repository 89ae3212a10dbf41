//! Fitted model parameters.

use puckstate_common::{Error, Result};
use puckstate_math::{MvNormal, SquareMatrix};
use serde::{Deserialize, Serialize};

/// A fitted Gaussian-emission HMM.
///
/// Produced once per fit and read-only afterward. Probabilities are stored
/// in the log domain, which is the form every consumer (forward-backward,
/// Viterbi) actually needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianHmm {
    pub n_states: usize,
    pub n_features: usize,
    /// log initial-state distribution, length n_states.
    pub start_log_probs: Vec<f64>,
    /// log transition matrix, n_states x n_states, rows sum to 1 in
    /// probability space.
    pub transition_log_probs: Vec<Vec<f64>>,
    /// Per-state emission means, n_states x n_features.
    pub means: Vec<Vec<f64>>,
    /// Per-state full covariance matrices.
    pub covariances: Vec<SquareMatrix>,
}

impl GaussianHmm {
    /// Build the per-state emission distributions.
    ///
    /// Fails with `SingularCovariance` if any state's covariance is not
    /// positive definite.
    pub fn emitters(&self) -> Result<Vec<MvNormal>> {
        self.means
            .iter()
            .zip(self.covariances.iter())
            .enumerate()
            .map(|(state, (mean, cov))| {
                MvNormal::new(mean.clone(), cov)
                    .map_err(|_| Error::SingularCovariance { state })
            })
            .collect()
    }

    /// Emission log-probability table: `[t][state]` for the observation
    /// sequence.
    pub fn emission_log_probs(&self, observations: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let emitters = self.emitters()?;
        observations
            .iter()
            .map(|obs| {
                emitters
                    .iter()
                    .enumerate()
                    .map(|(state, mvn)| {
                        mvn.log_density(obs)
                            .map_err(|_| Error::SingularCovariance { state })
                    })
                    .collect()
            })
            .collect()
    }
}
