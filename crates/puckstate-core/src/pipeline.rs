//! The end-to-end inference pipeline.
//!
//! `infer` is a pure function of the game sequence and settings: normalize,
//! fit, decode, label, annotate, assemble. Nothing is cached or persisted
//! between calls, and a fresh model is fit for every invocation; concurrent
//! callers each get an independent fit. Any stage error aborts the whole
//! run, so a failed fit never yields a partially labeled result.

use crate::annotate::coaching_note;
use crate::hmm;
use crate::label::LabelMap;
use crate::normalize;
use crate::report::{FitDiagnostics, SeasonReport};
use puckstate_common::{AnnotatedGame, Error, GameSequence, HmmSettings, Result};

/// Run the full pipeline over a chronologically ordered game sequence.
pub fn infer(sequence: &GameSequence, settings: &HmmSettings) -> Result<SeasonReport> {
    settings.validate()?;
    if sequence.is_empty() {
        return Err(Error::EmptyInput);
    }

    tracing::info!(
        games = sequence.len(),
        states = settings.n_states,
        seed = settings.seed,
        "starting inference run"
    );

    let raw = sequence.feature_matrix();
    let standardized = normalize::standardize(&raw)?;

    let fit = hmm::fit(&standardized, settings)?;
    let states = hmm::viterbi(&fit.model, &standardized)?;

    let label_map = LabelMap::resolve(&fit.model)?;
    let labels = label_map.apply(&states)?;

    let games: Vec<AnnotatedGame> = sequence
        .iter()
        .zip(states.iter())
        .zip(labels.iter())
        .map(|((record, &state_index), &label)| {
            Ok(AnnotatedGame {
                record: record.clone(),
                state_index,
                label,
                note: coaching_note(label)?.to_string(),
            })
        })
        .collect::<Result<_>>()?;

    Ok(SeasonReport::build(
        games,
        label_map.used_vocabulary(),
        settings.clone(),
        FitDiagnostics {
            log_likelihood: fit.log_likelihood,
            iterations: fit.iterations,
            converged: fit.converged,
        },
    ))
}
