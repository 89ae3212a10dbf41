//! Numerically stable primitives for log-domain probability math.
//!
//! The forward-backward and Viterbi recursions work entirely in log space;
//! these helpers keep sums of tiny probabilities from underflowing to zero.

/// Stable log(sum(exp(values))).
///
/// Returns NEG_INFINITY for empty input or all -inf inputs.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NEG_INFINITY;
    }
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if max == f64::INFINITY {
        return f64::INFINITY;
    }
    let mut sum = 0.0;
    for v in values {
        sum += (*v - max).exp();
    }
    max + sum.ln()
}

/// Stable log(exp(a) + exp(b)).
pub fn log_add_exp(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    if a == f64::INFINITY || b == f64::INFINITY {
        return f64::INFINITY;
    }
    let m = a.max(b);
    let diff = (a - b).abs();
    m + (-diff).exp().ln_1p()
}

/// Exp-normalize log weights into probabilities summing to 1.
///
/// Writes the result in place. If every weight is -inf, falls back to the
/// uniform distribution rather than producing NaNs.
pub fn normalize_log_weights(log_weights: &mut [f64]) {
    if log_weights.is_empty() {
        return;
    }
    let total = log_sum_exp(log_weights);
    if total == f64::NEG_INFINITY {
        let uniform = 1.0 / log_weights.len() as f64;
        for w in log_weights.iter_mut() {
            *w = uniform;
        }
        return;
    }
    for w in log_weights.iter_mut() {
        *w = (*w - total).exp();
    }
}

/// Index of the maximum value, first occurrence on ties.
///
/// Returns None for empty input.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn log_sum_exp_basic() {
        let out = log_sum_exp(&[0.0, 0.0]);
        assert!(approx_eq(out, 2.0f64.ln(), 1e-12));
    }

    #[test]
    fn log_sum_exp_dominance() {
        let out = log_sum_exp(&[-1000.0, 0.0]);
        assert!(approx_eq(out, 0.0, 1e-12));
    }

    #[test]
    fn log_sum_exp_empty_and_neg_inf() {
        assert_eq!(log_sum_exp(&[]), f64::NEG_INFINITY);
        let out = log_sum_exp(&[f64::NEG_INFINITY, f64::NEG_INFINITY]);
        assert!(out.is_infinite() && out.is_sign_negative());
    }

    #[test]
    fn log_add_exp_matches_lse() {
        let a = 1.234;
        let b = -0.75;
        assert!(approx_eq(log_add_exp(a, b), log_sum_exp(&[a, b]), 1e-12));
    }

    #[test]
    fn normalize_log_weights_sums_to_one() {
        let mut w = [-700.0, -701.0, -699.5];
        normalize_log_weights(&mut w);
        let sum: f64 = w.iter().sum();
        assert!(approx_eq(sum, 1.0, 1e-12));
        assert!(w.iter().all(|&p| p > 0.0));
    }

    #[test]
    fn normalize_log_weights_all_neg_inf_is_uniform() {
        let mut w = [f64::NEG_INFINITY; 4];
        normalize_log_weights(&mut w);
        for p in w {
            assert!(approx_eq(p, 0.25, 1e-12));
        }
    }

    #[test]
    fn argmax_first_on_ties() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    proptest! {
        #[test]
        fn lse_bounded_by_max_plus_log_n(values in prop::collection::vec(-50.0f64..50.0, 1..16)) {
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let out = log_sum_exp(&values);
            prop_assert!(out >= max - 1e-9);
            prop_assert!(out <= max + (values.len() as f64).ln() + 1e-9);
        }

        #[test]
        fn normalized_weights_are_a_distribution(values in prop::collection::vec(-200.0f64..10.0, 1..12)) {
            let mut w = values.clone();
            normalize_log_weights(&mut w);
            let sum: f64 = w.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }
    }
}
