//! Season report assembly and rendering.
//!
//! The report carries everything the presentation layer needs: per-game
//! rows with raw features, state index, label, and note; a legend over the
//! labels in use; per-label game counts in rank order; and fit diagnostics.
//! Chart and spreadsheet generation live with external consumers; the CLI's
//! own surfaces are JSON, a plain table, and a one-line summary.

use puckstate_common::{AnnotatedGame, Error, HmmSettings, OutputFormat, Result, StateLabel};
use serde::{Deserialize, Serialize};

/// One legend row: the rank slot, its name, and its definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// 1-based rank slot (1 = best goal differential).
    pub state_number: usize,
    pub name: StateLabel,
    pub definition: String,
}

/// Games spent in one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: StateLabel,
    pub games: usize,
}

/// Diagnostics from the fit that produced this report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitDiagnostics {
    pub log_likelihood: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Complete output of one inference run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonReport {
    pub settings: HmmSettings,
    pub games: Vec<AnnotatedGame>,
    pub legend: Vec<LegendEntry>,
    pub counts: Vec<LabelCount>,
    pub diagnostics: FitDiagnostics,
}

impl SeasonReport {
    /// Assemble the report from annotated games and the labels in use.
    ///
    /// Counts cover the used vocabulary in rank order, zero-filled for
    /// labels no game landed in.
    pub fn build(
        games: Vec<AnnotatedGame>,
        used_vocabulary: &[StateLabel],
        settings: HmmSettings,
        diagnostics: FitDiagnostics,
    ) -> Self {
        let legend = used_vocabulary
            .iter()
            .enumerate()
            .map(|(rank, &name)| LegendEntry {
                state_number: rank + 1,
                name,
                definition: name.definition().to_string(),
            })
            .collect();

        let counts = used_vocabulary
            .iter()
            .map(|&label| LabelCount {
                label,
                games: games.iter().filter(|g| g.label == label).count(),
            })
            .collect();

        Self {
            settings,
            games,
            legend,
            counts,
            diagnostics,
        }
    }

    /// Render to the requested output format.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Table => Ok(self.render_table()),
            OutputFormat::Summary => Ok(self.render_summary()),
        }
    }

    fn render_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{:<10}  {:<14}  {:<6}  {:>3}  {:>3}  {:>3}  {:>3}  {:>4}  {:>5}  {:<13}  Note\n",
            "Date", "Opponent", "Venue", "GF", "GA", "SF", "SA", "PIM", "FO%", "State"
        ));
        for game in &self.games {
            out.push_str(&format!(
                "{:<10}  {:<14}  {:<6}  {:>3}  {:>3}  {:>3}  {:>3}  {:>4}  {:>5.1}  {:<13}  {}\n",
                game.record.date,
                game.record.opponent,
                game.record.venue,
                game.record.goals_for,
                game.record.goals_against,
                game.record.shots_for,
                game.record.shots_against,
                game.record.penalty_minutes,
                game.record.faceoff_win_pct,
                game.label.name(),
                game.note,
            ));
        }

        out.push_str("\nLegend:\n");
        for entry in &self.legend {
            out.push_str(&format!(
                "  {}. {:<13}  {}\n",
                entry.state_number,
                entry.name.name(),
                entry.definition
            ));
        }

        out.push_str("\nGames per state:\n");
        for count in &self.counts {
            out.push_str(&format!("  {:<13}  {}\n", count.label.name(), count.games));
        }

        out.push_str(&format!(
            "\nFit: log-likelihood {:.3}, {} iterations{}\n",
            self.diagnostics.log_likelihood,
            self.diagnostics.iterations,
            if self.diagnostics.converged {
                " (converged)"
            } else {
                " (iteration cap)"
            }
        ));
        out
    }

    fn render_summary(&self) -> String {
        let top = self
            .counts
            .iter()
            .max_by_key(|c| c.games)
            .map(|c| format!("{} ({} games)", c.label.name(), c.games))
            .unwrap_or_else(|| "none".to_string());
        format!(
            "{} games, {} states, most time in {}, log-likelihood {:.2}",
            self.games.len(),
            self.settings.n_states,
            top,
            self.diagnostics.log_likelihood
        )
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puckstate_common::GameRecord;

    fn game(date: &str, label: StateLabel) -> AnnotatedGame {
        AnnotatedGame {
            record: GameRecord {
                date: date.parse().unwrap(),
                opponent: "Bears".into(),
                venue: "Home".into(),
                goals_for: 3.0,
                goals_against: 2.0,
                shots_for: 30.0,
                shots_against: 25.0,
                penalty_minutes: 6.0,
                faceoff_win_pct: 52.0,
            },
            state_index: 0,
            label,
            note: "note".into(),
        }
    }

    fn two_state_report() -> SeasonReport {
        SeasonReport::build(
            vec![
                game("2025-01-05", StateLabel::LockedIn),
                game("2025-01-12", StateLabel::LockedIn),
                game("2025-01-19", StateLabel::Improving),
            ],
            &StateLabel::ALL[..2],
            HmmSettings::with_states(2),
            FitDiagnostics {
                log_likelihood: -42.5,
                iterations: 17,
                converged: true,
            },
        )
    }

    #[test]
    fn counts_follow_rank_order_and_zero_fill() {
        let report = SeasonReport::build(
            vec![game("2025-01-05", StateLabel::Improving)],
            &StateLabel::ALL[..3],
            HmmSettings::with_states(3),
            FitDiagnostics {
                log_likelihood: -1.0,
                iterations: 1,
                converged: false,
            },
        );
        let labels: Vec<_> = report.counts.iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            vec![
                StateLabel::LockedIn,
                StateLabel::Improving,
                StateLabel::Fatigued
            ]
        );
        let games: Vec<_> = report.counts.iter().map(|c| c.games).collect();
        assert_eq!(games, vec![0, 1, 0]);
    }

    #[test]
    fn legend_numbers_rank_slots_from_one() {
        let report = two_state_report();
        assert_eq!(report.legend.len(), 2);
        assert_eq!(report.legend[0].state_number, 1);
        assert_eq!(report.legend[0].name, StateLabel::LockedIn);
        assert_eq!(report.legend[1].name, StateLabel::Improving);
        assert!(!report.legend[0].definition.is_empty());
    }

    #[test]
    fn json_round_trips() {
        let report = two_state_report();
        let json = report.render(OutputFormat::Json).unwrap();
        let back: SeasonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
    }

    #[test]
    fn table_mentions_every_game_and_label() {
        let report = two_state_report();
        let table = report.render(OutputFormat::Table).unwrap();
        assert!(table.contains("2025-01-05"));
        assert!(table.contains("Locked-In"));
        assert!(table.contains("Games per state"));
        assert!(table.contains("(converged)"));
    }

    #[test]
    fn summary_is_one_line() {
        let report = two_state_report();
        let summary = report.render(OutputFormat::Summary).unwrap();
        assert_eq!(summary.lines().count(), 1);
        assert!(summary.contains("3 games"));
        assert!(summary.contains("Locked-In (2 games)"));
    }
}
