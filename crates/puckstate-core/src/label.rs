//! Score-ranked mapping from model states to the fixed label vocabulary.
//!
//! The fitter's internal state numbering is an arbitrary artifact of
//! initialization: state 3 of one fit and state 1 of another can describe
//! the same regime. This resolver ranks states by their fitted goal
//! differential and names them from the fixed vocabulary in rank order,
//! which is what makes assignments comparable across fits.
//!
//! The score is computed on the fitted mean vectors, i.e. in standardized
//! feature space. That makes it a relative ranking across states sharing
//! one standardization, not an absolute goal differential, and it is
//! scale-free across features.

use crate::hmm::model::GaussianHmm;
use puckstate_common::{Error, Feature, Result, StateLabel};
use serde::{Deserialize, Serialize};

static VOCABULARY: [StateLabel; StateLabel::COUNT] = StateLabel::ALL;

/// Resolved state-index → label mapping for one fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMap {
    by_state: Vec<StateLabel>,
}

impl LabelMap {
    /// Rank the fitted states and assign vocabulary names.
    ///
    /// Score per state: fitted mean GoalsFor minus fitted mean GoalsAgainst.
    /// States are sorted by descending score; ties break by ascending state
    /// index, since the model itself offers no natural tie-break.
    pub fn resolve(model: &GaussianHmm) -> Result<Self> {
        let k = model.n_states;
        if k > StateLabel::COUNT {
            return Err(Error::VocabularyExceeded {
                states: k,
                vocabulary: StateLabel::COUNT,
            });
        }

        let gf = Feature::GoalsFor.column();
        let ga = Feature::GoalsAgainst.column();
        let mut ranked: Vec<usize> = (0..k).collect();
        let score = |state: usize| model.means[state][gf] - model.means[state][ga];
        ranked.sort_by(|&a, &b| {
            score(b)
                .partial_cmp(&score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let mut by_state = vec![StateLabel::LockedIn; k];
        for (rank, &state) in ranked.iter().enumerate() {
            // rank < k <= COUNT, so the vocabulary cannot be exhausted here.
            by_state[state] = StateLabel::from_rank(rank).ok_or(Error::VocabularyExceeded {
                states: k,
                vocabulary: StateLabel::COUNT,
            })?;
        }

        Ok(Self { by_state })
    }

    /// Number of states this map covers.
    pub fn n_states(&self) -> usize {
        self.by_state.len()
    }

    /// Label for a single state index.
    pub fn label_for(&self, state: usize) -> Option<StateLabel> {
        self.by_state.get(state).copied()
    }

    /// The labels actually in use, in rank order.
    pub fn used_vocabulary(&self) -> &'static [StateLabel] {
        &VOCABULARY[..self.by_state.len()]
    }

    /// Map a decoded state sequence onto labels.
    pub fn apply(&self, states: &[usize]) -> Result<Vec<StateLabel>> {
        states
            .iter()
            .map(|&s| {
                self.label_for(s).ok_or_else(|| {
                    Error::InvalidSettings(format!(
                        "state index {} out of range for {}-state model",
                        s,
                        self.by_state.len()
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puckstate_math::SquareMatrix;

    /// Model with only the means populated; the resolver reads nothing else.
    fn model_with_means(means: Vec<Vec<f64>>) -> GaussianHmm {
        let k = means.len();
        let d = means[0].len();
        let uniform = (1.0 / k as f64).ln();
        GaussianHmm {
            n_states: k,
            n_features: d,
            start_log_probs: vec![uniform; k],
            transition_log_probs: vec![vec![uniform; k]; k],
            means,
            covariances: vec![SquareMatrix::identity(d); k],
        }
    }

    fn mean(goals_for: f64, goals_against: f64) -> Vec<f64> {
        vec![goals_for, goals_against, 0.0, 0.0, 0.0, 0.0]
    }

    #[test]
    fn best_differential_gets_locked_in() {
        let model = model_with_means(vec![
            mean(-1.0, 1.0), // differential -2, worst
            mean(1.0, -1.0), // differential +2, best
            mean(0.0, 0.0),  // differential 0, middle
        ]);
        let map = LabelMap::resolve(&model).unwrap();
        assert_eq!(map.label_for(1), Some(StateLabel::LockedIn));
        assert_eq!(map.label_for(2), Some(StateLabel::Improving));
        assert_eq!(map.label_for(0), Some(StateLabel::Fatigued));
    }

    #[test]
    fn labels_are_invariant_under_state_renumbering() {
        let means = vec![mean(1.5, -0.5), mean(-0.8, 0.4), mean(0.2, 0.1)];
        let model = model_with_means(means.clone());
        let map = LabelMap::resolve(&model).unwrap();

        // Same components under a permuted internal numbering.
        let permutation = [2usize, 0, 1];
        let permuted_means: Vec<Vec<f64>> =
            permutation.iter().map(|&p| means[p].clone()).collect();
        let permuted_model = model_with_means(permuted_means);
        let permuted_map = LabelMap::resolve(&permuted_model).unwrap();

        let states = [0usize, 1, 2, 2, 1, 0];
        let permuted_states: Vec<usize> = states
            .iter()
            .map(|&s| permutation.iter().position(|&p| p == s).unwrap())
            .collect();

        assert_eq!(
            map.apply(&states).unwrap(),
            permuted_map.apply(&permuted_states).unwrap()
        );
    }

    #[test]
    fn ties_break_by_ascending_state_index() {
        let model = model_with_means(vec![mean(1.0, 1.0), mean(2.0, 2.0)]);
        let map = LabelMap::resolve(&model).unwrap();
        assert_eq!(map.label_for(0), Some(StateLabel::LockedIn));
        assert_eq!(map.label_for(1), Some(StateLabel::Improving));
    }

    #[test]
    fn k2_uses_first_two_names_k5_uses_all() {
        let map2 = LabelMap::resolve(&model_with_means(vec![mean(1.0, 0.0), mean(0.0, 1.0)]))
            .unwrap();
        assert_eq!(
            map2.used_vocabulary(),
            &[StateLabel::LockedIn, StateLabel::Improving][..]
        );

        let means5: Vec<Vec<f64>> = (0..5).map(|i| mean(i as f64, 0.0)).collect();
        let map5 = LabelMap::resolve(&model_with_means(means5)).unwrap();
        assert_eq!(map5.used_vocabulary(), &StateLabel::ALL[..]);
        assert_eq!(map5.label_for(4), Some(StateLabel::LockedIn));
        assert_eq!(map5.label_for(0), Some(StateLabel::Overconfident));
    }

    #[test]
    fn six_states_exceed_vocabulary() {
        let means6: Vec<Vec<f64>> = (0..6).map(|i| mean(i as f64, 0.0)).collect();
        match LabelMap::resolve(&model_with_means(means6)).unwrap_err() {
            Error::VocabularyExceeded { states, vocabulary } => {
                assert_eq!(states, 6);
                assert_eq!(vocabulary, 5);
            }
            other => panic!("expected VocabularyExceeded, got {other:?}"),
        }
    }

    #[test]
    fn apply_rejects_out_of_range_state() {
        let map = LabelMap::resolve(&model_with_means(vec![mean(1.0, 0.0), mean(0.0, 1.0)]))
            .unwrap();
        assert!(map.apply(&[0, 1, 2]).is_err());
    }
}
