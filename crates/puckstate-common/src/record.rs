//! Game records, the chronological game sequence, and the label vocabulary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed per-game feature columns, in matrix column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    GoalsFor,
    GoalsAgainst,
    ShotsFor,
    ShotsAgainst,
    PenaltyMinutes,
    FaceoffWinPct,
}

impl Feature {
    /// Number of feature columns.
    pub const COUNT: usize = 6;

    /// All features in column order.
    pub const ALL: [Feature; 6] = [
        Feature::GoalsFor,
        Feature::GoalsAgainst,
        Feature::ShotsFor,
        Feature::ShotsAgainst,
        Feature::PenaltyMinutes,
        Feature::FaceoffWinPct,
    ];

    /// Column index of this feature in the feature matrix.
    pub fn column(&self) -> usize {
        match self {
            Feature::GoalsFor => 0,
            Feature::GoalsAgainst => 1,
            Feature::ShotsFor => 2,
            Feature::ShotsAgainst => 3,
            Feature::PenaltyMinutes => 4,
            Feature::FaceoffWinPct => 5,
        }
    }

    /// CSV header name for this feature.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::GoalsFor => "GoalsFor",
            Feature::GoalsAgainst => "GoalsAgainst",
            Feature::ShotsFor => "ShotsFor",
            Feature::ShotsAgainst => "ShotsAgainst",
            Feature::PenaltyMinutes => "PenaltyMinutes",
            Feature::FaceoffWinPct => "FaceoffWinPct",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One game's raw statistics. Immutable once read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub opponent: String,
    pub venue: String,
    pub goals_for: f64,
    pub goals_against: f64,
    pub shots_for: f64,
    pub shots_against: f64,
    pub penalty_minutes: f64,
    pub faceoff_win_pct: f64,
}

impl GameRecord {
    /// Feature values in matrix column order.
    pub fn features(&self) -> [f64; Feature::COUNT] {
        [
            self.goals_for,
            self.goals_against,
            self.shots_for,
            self.shots_against,
            self.penalty_minutes,
            self.faceoff_win_pct,
        ]
    }
}

/// An ordered sequence of games, sorted ascending by date.
///
/// The model treats the season as a time series, so the chronological
/// invariant is enforced at construction and never revisited downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSequence {
    records: Vec<GameRecord>,
}

impl GameSequence {
    /// Build a sequence, sorting the records ascending by date.
    ///
    /// The sort is stable: games on the same date keep their input order.
    pub fn from_records(mut records: Vec<GameRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameRecord> {
        self.records.iter()
    }

    /// Raw feature matrix, one row per game in chronological order.
    pub fn feature_matrix(&self) -> Vec<[f64; Feature::COUNT]> {
        self.records.iter().map(|r| r.features()).collect()
    }
}

/// The fixed performance-state vocabulary, best to worst.
///
/// The fitter's internal state numbering is an arbitrary artifact of
/// initialization; these names are assigned by rank (see the label resolver),
/// which is what makes state assignments comparable across fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateLabel {
    #[serde(rename = "Locked-In")]
    LockedIn,
    Improving,
    Fatigued,
    Demoralized,
    Overconfident,
}

impl StateLabel {
    /// Vocabulary size.
    pub const COUNT: usize = 5;

    /// All labels in rank order (best-performing state first).
    pub const ALL: [StateLabel; 5] = [
        StateLabel::LockedIn,
        StateLabel::Improving,
        StateLabel::Fatigued,
        StateLabel::Demoralized,
        StateLabel::Overconfident,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            StateLabel::LockedIn => "Locked-In",
            StateLabel::Improving => "Improving",
            StateLabel::Fatigued => "Fatigued",
            StateLabel::Demoralized => "Demoralized",
            StateLabel::Overconfident => "Overconfident",
        }
    }

    /// One-line definition for the report legend.
    pub fn definition(&self) -> &'static str {
        match self {
            StateLabel::LockedIn => "High offense & possession, low penalties.",
            StateLabel::Improving => "Upward trend in shots and faceoff wins.",
            StateLabel::Fatigued => "Late-game drop-offs, higher penalty minutes.",
            StateLabel::Demoralized => "Poor results and discipline issues.",
            StateLabel::Overconfident => "Good scoreline but sloppy fundamentals.",
        }
    }

    /// Label for a ranking slot, if the slot is within the vocabulary.
    pub fn from_rank(rank: usize) -> Option<Self> {
        Self::ALL.get(rank).copied()
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A game joined with its inferred state, label, and coaching note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedGame {
    #[serde(flatten)]
    pub record: GameRecord,
    /// Raw state index from the fitted model, in [0, n_states).
    pub state_index: usize,
    /// Rank-resolved semantic label.
    pub label: StateLabel,
    /// Fixed coaching note for the label.
    pub note: String,
}
