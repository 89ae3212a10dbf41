//! CSV ingestion for per-game statistics.
//!
//! Validates the upload contract before any modeling runs: required columns
//! present, ISO dates, numeric feature cells. Rows are sorted ascending by
//! GameDate after parsing, so downstream stages can rely on chronological
//! order regardless of the order games appear in the file.
//!
//! Row numbers in errors are 1-based data rows (the header is not counted).

use puckstate_common::{Error, Feature, GameRecord, GameSequence, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Non-feature columns required in addition to the six features.
const DATE_COLUMN: &str = "GameDate";
const OPPONENT_COLUMN: &str = "Opponent";
const VENUE_COLUMN: &str = "Venue";

/// Read and validate a game-stats CSV file.
pub fn read_csv_path(path: &Path) -> Result<GameSequence> {
    let file = File::open(path)?;
    read_csv(file)
}

/// Read and validate game stats from any reader.
pub fn read_csv<R: Read>(reader: R) -> Result<GameSequence> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| Error::MalformedCsv(e.to_string()))?
        .clone();

    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::MissingColumn {
                column: name.to_string(),
            })
    };

    let date_col = column(DATE_COLUMN)?;
    let opponent_col = column(OPPONENT_COLUMN)?;
    let venue_col = column(VENUE_COLUMN)?;
    let mut feature_cols = [0usize; Feature::COUNT];
    for feature in Feature::ALL {
        feature_cols[feature.column()] = column(feature.name())?;
    }

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row_number = i + 1;
        let row = row.map_err(|e| Error::MalformedCsv(e.to_string()))?;

        let field = |col: usize| row.get(col).unwrap_or("");

        let date_value = field(date_col);
        let date = date_value
            .parse()
            .map_err(|_| Error::UnparseableDate {
                row: row_number,
                value: date_value.to_string(),
            })?;

        let mut features = [0.0f64; Feature::COUNT];
        for feature in Feature::ALL {
            let raw = field(feature_cols[feature.column()]);
            features[feature.column()] =
                raw.parse::<f64>().map_err(|_| Error::NonNumeric {
                    row: row_number,
                    column: feature.name().to_string(),
                })?;
        }

        records.push(GameRecord {
            date,
            opponent: field(opponent_col).to_string(),
            venue: field(venue_col).to_string(),
            goals_for: features[Feature::GoalsFor.column()],
            goals_against: features[Feature::GoalsAgainst.column()],
            shots_for: features[Feature::ShotsFor.column()],
            shots_against: features[Feature::ShotsAgainst.column()],
            penalty_minutes: features[Feature::PenaltyMinutes.column()],
            faceoff_win_pct: features[Feature::FaceoffWinPct.column()],
        });
    }

    if records.is_empty() {
        return Err(Error::EmptyInput);
    }

    tracing::debug!(games = records.len(), "parsed game stats CSV");
    Ok(GameSequence::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "GameDate,Opponent,Venue,GoalsFor,GoalsAgainst,ShotsFor,ShotsAgainst,PenaltyMinutes,FaceoffWinPct";

    fn parse(body: &str) -> Result<GameSequence> {
        read_csv(body.as_bytes())
    }

    #[test]
    fn parses_and_sorts_by_date() {
        let csv = format!(
            "{HEADER}\n\
             2025-01-20,Ravens,Away,2,4,22,31,12,44.0\n\
             2025-01-05,Bears,Home,5,1,35,20,4,58.5\n"
        );
        let seq = parse(&csv).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.records()[0].opponent, "Bears");
        assert_eq!(seq.records()[0].goals_for, 5.0);
        assert_eq!(seq.records()[1].opponent, "Ravens");
    }

    #[test]
    fn missing_column_is_reported_before_parsing_rows() {
        let csv = "GameDate,Opponent,Venue,GoalsFor,GoalsAgainst,ShotsFor,ShotsAgainst,PenaltyMinutes\n\
                   2025-01-05,Bears,Home,5,1,35,20,4\n";
        match parse(csv).unwrap_err() {
            Error::MissingColumn { column } => assert_eq!(column, "FaceoffWinPct"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_date_names_the_row() {
        let csv = format!(
            "{HEADER}\n\
             2025-01-05,Bears,Home,5,1,35,20,4,58.5\n\
             last tuesday,Ravens,Away,2,4,22,31,12,44.0\n"
        );
        match parse(&csv).unwrap_err() {
            Error::UnparseableDate { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "last tuesday");
            }
            other => panic!("expected UnparseableDate, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_feature_names_row_and_column() {
        let csv = format!(
            "{HEADER}\n\
             2025-01-05,Bears,Home,five,1,35,20,4,58.5\n"
        );
        match parse(&csv).unwrap_err() {
            Error::NonNumeric { row, column } => {
                assert_eq!(row, 1);
                assert_eq!(column, "GoalsFor");
            }
            other => panic!("expected NonNumeric, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_rejected() {
        let csv = format!("{HEADER}\n");
        assert!(matches!(parse(&csv).unwrap_err(), Error::EmptyInput));
    }

    #[test]
    fn ragged_row_is_malformed() {
        let csv = format!(
            "{HEADER}\n\
             2025-01-05,Bears,Home,5,1\n"
        );
        assert!(matches!(parse(&csv).unwrap_err(), Error::MalformedCsv(_)));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = format!(
            "{HEADER},Attendance\n\
             2025-01-05,Bears,Home,5,1,35,20,4,58.5,412\n"
        );
        let seq = parse(&csv).unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.records()[0].faceoff_win_pct, 58.5);
    }
}
