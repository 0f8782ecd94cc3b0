//! Gap filling for sparse series.
//!
//! Every tier takes a slice of optional values and returns a new vector;
//! entries that are already present are never touched. Tiers are chained by
//! the callers, each one only seeing what the previous one left missing.

use crate::model::{AlignError, ImputePolicy, SparseSeries, WeekdaySeries};

/// Carries the last observed value forward.
pub fn forward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    values
        .iter()
        .map(|v| {
            if v.is_some() {
                last = *v;
            }
            last
        })
        .collect()
}

/// Carries the next observed value backward.
pub fn backward_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut next = None;
    let mut out: Vec<Option<f64>> = values
        .iter()
        .rev()
        .map(|v| {
            if v.is_some() {
                next = *v;
            }
            next
        })
        .collect();
    out.reverse();
    out
}

/// Linear interpolation by position between observed neighbours.
/// Trailing gaps repeat the last observation; leading gaps stay missing.
pub fn interpolate_linear(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = values.to_vec();
    let mut prev: Option<(usize, f64)> = None;

    for (idx, value) in values.iter().enumerate() {
        let Some(current) = *value else { continue };
        if let Some((prev_idx, prev_val)) = prev {
            let span = (idx - prev_idx) as f64;
            for gap in (prev_idx + 1)..idx {
                let t = (gap - prev_idx) as f64 / span;
                out[gap] = Some(prev_val + (current - prev_val) * t);
            }
        }
        prev = Some((idx, current));
    }

    if let Some((last_idx, last_val)) = prev {
        for slot in out.iter_mut().skip(last_idx + 1) {
            *slot = Some(last_val);
        }
    }
    out
}

/// Fills every missing entry with `fill`.
pub fn fill_with(values: &[Option<f64>], fill: f64) -> Vec<Option<f64>> {
    values.iter().map(|v| Some(v.unwrap_or(fill))).collect()
}

/// Mean of the observed entries, `None` when nothing is observed.
pub fn observed_mean(values: &[Option<f64>]) -> Option<f64> {
    let observed: Vec<f64> = values.iter().flatten().copied().collect();
    if observed.is_empty() {
        return None;
    }
    Some(observed.iter().sum::<f64>() / observed.len() as f64)
}

pub fn has_missing(values: &[Option<f64>]) -> bool {
    values.iter().any(Option::is_none)
}

/// Applies `policy` to a whole value vector.
pub fn impute(values: &[Option<f64>], policy: ImputePolicy) -> Vec<Option<f64>> {
    if !has_missing(values) {
        return values.to_vec();
    }
    match policy {
        ImputePolicy::ForwardFill => backward_fill(&forward_fill(values)),
        ImputePolicy::Interpolate => backward_fill(&interpolate_linear(values)),
        ImputePolicy::Mean => match observed_mean(values) {
            Some(mean) => fill_with(values, mean),
            None => values.to_vec(),
        },
    }
}

/// Imputes a sparse series into a dense one.
pub fn impute_series(series: SparseSeries, policy: ImputePolicy) -> Result<WeekdaySeries, AlignError> {
    if observed_mean(&series.values).is_none() {
        return Err(AlignError::EmptySeries(series.name));
    }
    let filled = impute(&series.values, policy);
    Ok(SparseSeries {
        name: series.name,
        dates: series.dates,
        values: filled,
    }
    .into_dense())
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: Option<f64> = None;

    #[test]
    fn ffill_then_bfill_covers_leading_gap() {
        let v = [N, Some(1.0), N, N, Some(4.0), N];
        assert_eq!(
            impute(&v, ImputePolicy::ForwardFill),
            vec![Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(4.0), Some(4.0)]
        );
    }

    #[test]
    fn interpolation_is_linear_by_position() {
        let v = [N, Some(1.0), N, N, Some(4.0), N];
        assert_eq!(
            impute(&v, ImputePolicy::Interpolate),
            vec![Some(1.0), Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(4.0)]
        );
    }

    #[test]
    fn mean_fill_uses_observed_values() {
        let v = [Some(1.0), N, Some(5.0)];
        assert_eq!(impute(&v, ImputePolicy::Mean), vec![Some(1.0), Some(3.0), Some(5.0)]);
    }

    #[test]
    fn complete_input_is_untouched() {
        let v = [Some(1.0), Some(2.0)];
        for policy in [ImputePolicy::ForwardFill, ImputePolicy::Interpolate, ImputePolicy::Mean] {
            assert_eq!(impute(&v, policy), v.to_vec());
        }
    }

    #[test]
    fn all_missing_series_is_an_error() {
        let series = SparseSeries {
            name: "WTI".into(),
            dates: vec![chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()],
            values: vec![None],
        };
        assert_eq!(
            impute_series(series, ImputePolicy::ForwardFill),
            Err(AlignError::EmptySeries("WTI".into()))
        );
    }
}
