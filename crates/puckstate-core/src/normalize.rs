//! Per-column feature standardization.
//!
//! Each column is transformed to mean 0 and standard deviation 1 using the
//! population statistics (ddof = 0) of the input matrix itself; there is no
//! external reference distribution. The transform is pure: the same matrix
//! always standardizes to the same output.

use puckstate_common::{Error, Feature, Result};

/// Standard deviations below this are treated as zero variance rather than
/// silently dividing into NaN/Inf.
const MIN_STD_DEV: f64 = 1e-12;

/// Column statistics computed during standardization.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub means: [f64; Feature::COUNT],
    pub std_devs: [f64; Feature::COUNT],
}

/// Standardize an N x F feature matrix column by column.
///
/// Errors before fitting if any cell is non-finite or any column has zero
/// variance.
pub fn standardize(matrix: &[[f64; Feature::COUNT]]) -> Result<Vec<Vec<f64>>> {
    Ok(standardize_with_stats(matrix)?.0)
}

/// Standardize and also return the per-column statistics used.
pub fn standardize_with_stats(
    matrix: &[[f64; Feature::COUNT]],
) -> Result<(Vec<Vec<f64>>, ColumnStats)> {
    if matrix.is_empty() {
        return Err(Error::EmptyInput);
    }

    for (i, row) in matrix.iter().enumerate() {
        for feature in Feature::ALL {
            let value = row[feature.column()];
            if !value.is_finite() {
                return Err(Error::NonFinite {
                    row: i + 1,
                    column: feature.name().to_string(),
                });
            }
        }
    }

    let n = matrix.len() as f64;
    let mut means = [0.0; Feature::COUNT];
    let mut std_devs = [0.0; Feature::COUNT];

    for feature in Feature::ALL {
        let c = feature.column();
        let mean = matrix.iter().map(|row| row[c]).sum::<f64>() / n;
        let variance = matrix
            .iter()
            .map(|row| {
                let d = row[c] - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();
        if std_dev < MIN_STD_DEV {
            return Err(Error::ZeroVariance {
                column: feature.name().to_string(),
            });
        }
        means[c] = mean;
        std_devs[c] = std_dev;
    }

    let standardized = matrix
        .iter()
        .map(|row| {
            Feature::ALL
                .iter()
                .map(|f| {
                    let c = f.column();
                    (row[c] - means[c]) / std_devs[c]
                })
                .collect()
        })
        .collect();

    Ok((standardized, ColumnStats { means, std_devs }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> Vec<[f64; Feature::COUNT]> {
        vec![
            [5.0, 1.0, 35.0, 20.0, 4.0, 58.5],
            [2.0, 4.0, 22.0, 31.0, 12.0, 44.0],
            [3.0, 2.0, 28.0, 26.0, 8.0, 51.0],
            [4.0, 3.0, 31.0, 24.0, 6.0, 55.0],
        ]
    }

    #[test]
    fn columns_have_zero_mean_unit_std() {
        let matrix = sample_matrix();
        let out = standardize(&matrix).unwrap();
        let n = out.len() as f64;
        for c in 0..Feature::COUNT {
            let mean = out.iter().map(|row| row[c]).sum::<f64>() / n;
            let var = out.iter().map(|row| row[c] * row[c]).sum::<f64>() / n - mean * mean;
            assert!(mean.abs() < 1e-12, "column {c} mean {mean}");
            assert!((var - 1.0).abs() < 1e-9, "column {c} variance {var}");
        }
    }

    #[test]
    fn pure_transform_is_repeatable() {
        let matrix = sample_matrix();
        assert_eq!(standardize(&matrix).unwrap(), standardize(&matrix).unwrap());
    }

    #[test]
    fn zero_variance_column_rejected() {
        let mut matrix = sample_matrix();
        for row in &mut matrix {
            row[Feature::PenaltyMinutes.column()] = 10.0;
        }
        match standardize(&matrix).unwrap_err() {
            Error::ZeroVariance { column } => assert_eq!(column, "PenaltyMinutes"),
            other => panic!("expected ZeroVariance, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_cell_rejected() {
        let mut matrix = sample_matrix();
        matrix[1][Feature::ShotsFor.column()] = f64::NAN;
        match standardize(&matrix).unwrap_err() {
            Error::NonFinite { row, column } => {
                assert_eq!(row, 2);
                assert_eq!(column, "ShotsFor");
            }
            other => panic!("expected NonFinite, got {other:?}"),
        }
    }

    #[test]
    fn empty_matrix_rejected() {
        assert!(matches!(standardize(&[]).unwrap_err(), Error::EmptyInput));
    }

    #[test]
    fn stats_reflect_population_moments() {
        let matrix = vec![
            [1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            [3.0, 5.0, 2.0, 9.0, 7.0, 3.0],
        ];
        let (_, stats) = standardize_with_stats(&matrix).unwrap();
        assert!((stats.means[0] - 2.0).abs() < 1e-12);
        // population std of {1, 3} is 1
        assert!((stats.std_devs[0] - 1.0).abs() < 1e-12);
    }
}
