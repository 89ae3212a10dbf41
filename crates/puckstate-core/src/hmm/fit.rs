//! Baum-Welch fitting of the Gaussian HMM.
//!
//! The E-step runs a log-domain forward-backward pass over the standardized
//! feature sequence; the M-step re-estimates the initial distribution,
//! transition matrix, and per-state mean/covariance in closed form. The
//! iteration stops when the log-likelihood improvement drops below the
//! tolerance or the iteration cap is reached; the cap is a hard stop, not an
//! error.
//!
//! Initialization is deterministic given the seed: a seeded k-means pass
//! over the observations provides the initial means, all states share the
//! pooled data covariance, and the start/transition distributions begin
//! uniform. Identical input and settings therefore always produce an
//! identical fit.

use crate::hmm::model::GaussianHmm;
use puckstate_common::{Error, HmmSettings, Result};
use puckstate_math::{log_sum_exp, normalize_log_weights, SquareMatrix};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Ridge added to every covariance diagonal. Keeps near-degenerate states
/// factorizable without masking genuinely singular ones.
const MIN_COVAR: f64 = 1e-3;

/// Posterior mass below which a state is considered starved of data.
const MIN_STATE_WEIGHT: f64 = 1e-10;

/// Outcome of one fit.
#[derive(Debug, Clone)]
pub struct FitResult {
    pub model: GaussianHmm,
    /// Log-likelihood of the observations under the final parameters.
    pub log_likelihood: f64,
    /// EM iterations performed.
    pub iterations: usize,
    /// True if the tolerance was reached before the iteration cap.
    pub converged: bool,
}

/// Fit a Gaussian HMM to a standardized observation sequence.
pub fn fit(observations: &[Vec<f64>], settings: &HmmSettings) -> Result<FitResult> {
    settings.validate()?;

    let n = observations.len();
    let k = settings.n_states;
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    if n < k {
        return Err(Error::TooFewGames {
            games: n,
            states: k,
        });
    }
    let d = observations[0].len();

    let means = init_means(observations, settings);
    let pooled = pooled_covariance(observations, d);
    let covariances = vec![pooled; k];

    let uniform = (1.0 / k as f64).ln();
    let mut model = GaussianHmm {
        n_states: k,
        n_features: d,
        start_log_probs: vec![uniform; k],
        transition_log_probs: vec![vec![uniform; k]; k],
        means,
        covariances,
    };

    let mut prev_ll = f64::NEG_INFINITY;
    let mut log_likelihood = f64::NEG_INFINITY;
    let mut iterations = 0;
    let mut converged = false;

    for iteration in 0..settings.max_iters {
        let log_b = model.emission_log_probs(observations)?;

        // Forward pass.
        let mut log_alpha = vec![vec![0.0; k]; n];
        for j in 0..k {
            log_alpha[0][j] = model.start_log_probs[j] + log_b[0][j];
        }
        let mut scratch = vec![0.0; k];
        for t in 1..n {
            for j in 0..k {
                for (i, s) in scratch.iter_mut().enumerate() {
                    *s = log_alpha[t - 1][i] + model.transition_log_probs[i][j];
                }
                log_alpha[t][j] = log_sum_exp(&scratch) + log_b[t][j];
            }
        }

        log_likelihood = log_sum_exp(&log_alpha[n - 1]);
        iterations = iteration + 1;
        if !log_likelihood.is_finite() {
            return Err(Error::NumericalDivergence { iteration });
        }
        tracing::debug!(iteration, log_likelihood, "EM iteration");

        if (log_likelihood - prev_ll).abs() < settings.tolerance {
            converged = true;
            break;
        }
        prev_ll = log_likelihood;

        // Backward pass.
        let mut log_beta = vec![vec![0.0; k]; n];
        for t in (0..n - 1).rev() {
            for i in 0..k {
                for (j, s) in scratch.iter_mut().enumerate() {
                    *s = model.transition_log_probs[i][j]
                        + log_b[t + 1][j]
                        + log_beta[t + 1][j];
                }
                log_beta[t][i] = log_sum_exp(&scratch);
            }
        }

        // State posteriors gamma[t][j].
        let mut gamma = vec![vec![0.0; k]; n];
        for t in 0..n {
            for j in 0..k {
                gamma[t][j] = log_alpha[t][j] + log_beta[t][j];
            }
            normalize_log_weights(&mut gamma[t]);
        }

        // Expected transition counts.
        let mut xi_sums = vec![vec![0.0; k]; k];
        for t in 0..n - 1 {
            for (i, row) in xi_sums.iter_mut().enumerate() {
                for (j, cell) in row.iter_mut().enumerate() {
                    *cell += (log_alpha[t][i]
                        + model.transition_log_probs[i][j]
                        + log_b[t + 1][j]
                        + log_beta[t + 1][j]
                        - log_likelihood)
                        .exp();
                }
            }
        }

        // M-step.
        for j in 0..k {
            model.start_log_probs[j] = gamma[0][j].max(f64::MIN_POSITIVE).ln();
        }

        for i in 0..k {
            let row_sum: f64 = xi_sums[i].iter().sum();
            if row_sum > 0.0 {
                for j in 0..k {
                    model.transition_log_probs[i][j] =
                        (xi_sums[i][j] / row_sum).max(f64::MIN_POSITIVE).ln();
                }
            } else {
                // State never occupied before the final step; keep it
                // neutral rather than propagating a zero row.
                for j in 0..k {
                    model.transition_log_probs[i][j] = uniform;
                }
            }
        }

        for state in 0..k {
            let weight: f64 = gamma.iter().map(|g| g[state]).sum();
            if weight < MIN_STATE_WEIGHT {
                return Err(Error::SingularCovariance { state });
            }

            let mut mean = vec![0.0; d];
            for (t, obs) in observations.iter().enumerate() {
                for (m, &x) in mean.iter_mut().zip(obs.iter()) {
                    *m += gamma[t][state] * x;
                }
            }
            for m in mean.iter_mut() {
                *m /= weight;
            }

            let mut cov = SquareMatrix::zeros(d);
            for (t, obs) in observations.iter().enumerate() {
                let g = gamma[t][state];
                for a in 0..d {
                    let da = obs[a] - mean[a];
                    for b in 0..d {
                        let db = obs[b] - mean[b];
                        cov.set(a, b, cov.get(a, b) + g * da * db);
                    }
                }
            }
            for a in 0..d {
                for b in 0..d {
                    cov.set(a, b, cov.get(a, b) / weight);
                }
            }
            cov.add_diagonal(MIN_COVAR);
            if cov.has_non_finite() {
                return Err(Error::SingularCovariance { state });
            }

            model.means[state] = mean;
            model.covariances[state] = cov;
        }
    }

    // The last M-step's covariances have not been factorized yet; surface a
    // singular state here instead of from the decoder.
    model.emitters()?;

    tracing::info!(
        iterations,
        converged,
        log_likelihood,
        states = k,
        "HMM fit complete"
    );

    Ok(FitResult {
        model,
        log_likelihood,
        iterations,
        converged,
    })
}

/// Seeded k-means over the observations; returns K initial mean vectors.
fn init_means(observations: &[Vec<f64>], settings: &HmmSettings) -> Vec<Vec<f64>> {
    let n = observations.len();
    let k = settings.n_states;
    let d = observations[0].len();

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);

    let mut centroids: Vec<Vec<f64>> = indices
        .iter()
        .take(k)
        .map(|&i| observations[i].clone())
        .collect();

    let mut assignments = vec![0usize; n];
    for _ in 0..settings.kmeans_iters {
        let mut changed = false;
        for (t, obs) in observations.iter().enumerate() {
            let nearest = nearest_centroid(obs, &centroids);
            if assignments[t] != nearest {
                assignments[t] = nearest;
                changed = true;
            }
        }

        for (c, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&Vec<f64>> = observations
                .iter()
                .zip(assignments.iter())
                .filter(|(_, &a)| a == c)
                .map(|(obs, _)| obs)
                .collect();
            // An empty cluster keeps its previous centroid.
            if members.is_empty() {
                continue;
            }
            let count = members.len() as f64;
            for dim in 0..d {
                centroid[dim] = members.iter().map(|m| m[dim]).sum::<f64>() / count;
            }
        }

        if !changed {
            break;
        }
    }

    centroids
}

fn nearest_centroid(obs: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let dist: f64 = obs
            .iter()
            .zip(centroid.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        if dist < best_dist {
            best_dist = dist;
            best = c;
        }
    }
    best
}

/// Population covariance of the whole data set, ridge-regularized.
fn pooled_covariance(observations: &[Vec<f64>], d: usize) -> SquareMatrix {
    let n = observations.len() as f64;
    let mut mean = vec![0.0; d];
    for obs in observations {
        for (m, &x) in mean.iter_mut().zip(obs.iter()) {
            *m += x;
        }
    }
    for m in mean.iter_mut() {
        *m /= n;
    }

    let mut cov = SquareMatrix::zeros(d);
    for obs in observations {
        for a in 0..d {
            let da = obs[a] - mean[a];
            for b in 0..d {
                cov.set(a, b, cov.get(a, b) + da * (obs[b] - mean[b]));
            }
        }
    }
    for a in 0..d {
        for b in 0..d {
            cov.set(a, b, cov.get(a, b) / n);
        }
    }
    cov.add_diagonal(MIN_COVAR);
    cov
}
