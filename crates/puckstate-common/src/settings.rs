//! Model settings and semantic validation.

use crate::error::{Error, Result};
use crate::record::StateLabel;
use serde::{Deserialize, Serialize};

/// Covariance structure for the per-state Gaussian emissions.
///
/// Only unrestricted per-state covariance is supported; the enum exists so
/// the configuration surface states the choice explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CovarianceKind {
    #[default]
    Full,
}

/// Settings for one fit of the hidden Markov model.
///
/// A fresh model is fit from scratch for every invocation; nothing here is
/// persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HmmSettings {
    /// Number of hidden states K, 2-5 inclusive.
    pub n_states: usize,
    /// Covariance structure for the Gaussian emissions.
    #[serde(default)]
    pub covariance: CovarianceKind,
    /// Hard cap on EM iterations; reaching it is a stop, not an error.
    pub max_iters: usize,
    /// Stop early when the log-likelihood improves by less than this.
    pub tolerance: f64,
    /// Seed for the k-means initialization; fixed seed means identical
    /// input always produces an identical fit.
    pub seed: u64,
    /// Iteration budget for the seeded k-means initialization.
    pub kmeans_iters: usize,
}

impl Default for HmmSettings {
    fn default() -> Self {
        Self {
            n_states: 3,
            covariance: CovarianceKind::Full,
            max_iters: 100,
            tolerance: 1e-4,
            seed: 42,
            kmeans_iters: 20,
        }
    }
}

impl HmmSettings {
    /// Settings with the given state count and defaults elsewhere.
    pub fn with_states(n_states: usize) -> Self {
        Self {
            n_states,
            ..Self::default()
        }
    }

    /// Semantic validation: state count bounds, positive budgets.
    pub fn validate(&self) -> Result<()> {
        if self.n_states < 2 {
            return Err(Error::InvalidSettings(format!(
                "n_states must be at least 2, got {}",
                self.n_states
            )));
        }
        if self.n_states > StateLabel::COUNT {
            return Err(Error::VocabularyExceeded {
                states: self.n_states,
                vocabulary: StateLabel::COUNT,
            });
        }
        if self.max_iters == 0 {
            return Err(Error::InvalidSettings(
                "max_iters must be at least 1".into(),
            ));
        }
        if !(self.tolerance > 0.0) {
            return Err(Error::InvalidSettings(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.kmeans_iters == 0 {
            return Err(Error::InvalidSettings(
                "kmeans_iters must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
