//! Viterbi decoding of the most likely hidden-state sequence.
//!
//! Decodes the single most probable state path given the whole observation
//! sequence and the transition structure; adjacent games are temporally
//! linked, so this is not per-game independent MAP assignment.

use crate::hmm::model::GaussianHmm;
use puckstate_common::{Error, Result};
use puckstate_math::argmax;

/// Most likely state index per observation, in input order.
pub fn viterbi(model: &GaussianHmm, observations: &[Vec<f64>]) -> Result<Vec<usize>> {
    let n = observations.len();
    let k = model.n_states;
    if n == 0 {
        return Err(Error::EmptyInput);
    }

    let log_b = model.emission_log_probs(observations)?;

    // delta[t][j]: best log-probability of any path ending in state j at t.
    let mut delta = vec![vec![f64::NEG_INFINITY; k]; n];
    let mut backpointers = vec![vec![0usize; k]; n];

    for j in 0..k {
        delta[0][j] = model.start_log_probs[j] + log_b[0][j];
    }

    for t in 1..n {
        for j in 0..k {
            let mut best_prev = 0;
            let mut best_score = f64::NEG_INFINITY;
            for i in 0..k {
                let score = delta[t - 1][i] + model.transition_log_probs[i][j];
                if score > best_score {
                    best_score = score;
                    best_prev = i;
                }
            }
            delta[t][j] = best_score + log_b[t][j];
            backpointers[t][j] = best_prev;
        }
    }

    let mut path = vec![0usize; n];
    path[n - 1] = argmax(&delta[n - 1]).unwrap_or(0);
    for t in (0..n - 1).rev() {
        path[t] = backpointers[t + 1][path[t + 1]];
    }

    Ok(path)
}
