use crate::model::{AlignedPair, IndicatorError, WeekdaySeries};
use crate::utils::is_weekday;

pub struct SeriesIndicators;

impl SeriesIndicators {
    /// `x[t] - x[t - lag]`; empty when the input is not longer than `lag`.
    pub fn difference(values: &[f64], lag: usize) -> Vec<f64> {
        if lag == 0 || values.len() <= lag {
            return Vec::new();
        }
        values
            .iter()
            .skip(lag)
            .zip(values.iter())
            .map(|(later, earlier)| later - earlier)
            .collect()
    }

    /// `ln(x[t]) - ln(x[t-1])`.
    pub fn log_returns(values: &[f64]) -> Result<Vec<f64>, IndicatorError> {
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| **v <= 0.0) {
            return Err(IndicatorError::NonPositive { index, value });
        }
        Ok(values.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
    }

    /// Reindexes onto every weekday between the first and last date,
    /// carrying the previous value into gaps.
    pub fn business_day_reindex(series: &WeekdaySeries) -> WeekdaySeries {
        let (Some(first), Some(last)) = (series.first_date(), series.last_date()) else {
            return series.clone();
        };
        let mut points = Vec::new();
        let mut last_value = None;
        let mut day = Some(first);
        while let Some(current) = day.filter(|d| *d <= last) {
            if let Some(v) = series.get(current) {
                last_value = Some(v);
            }
            if is_weekday(current) {
                if let Some(v) = last_value {
                    points.push((current, v));
                }
            }
            day = current.succ_opt();
        }
        WeekdaySeries::from_sorted(series.name.clone(), points)
    }

    /// Pearson correlation; `None` for mismatched, empty or constant input.
    pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
        if x.len() != y.len() || x.is_empty() {
            return None;
        }
        let n = x.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;
        let numerator: f64 = x.iter().zip(y.iter()).map(|(xi, yi)| (xi - mean_x) * (yi - mean_y)).sum();
        let denominator_x: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
        let denominator_y: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
        let denominator = (denominator_x * denominator_y).sqrt();
        if denominator == 0.0 {
            None
        } else {
            Some(numerator / denominator)
        }
    }

    /// `corr(x[t], y[t - lag])` for every lag in `-max_lag..=max_lag`,
    /// computed over the overlapping positions only.
    pub fn cross_correlation(x: &[f64], y: &[f64], max_lag: usize) -> Vec<(i64, Option<f64>)> {
        let n = x.len().min(y.len());
        let max_lag = max_lag as i64;
        (-max_lag..=max_lag)
            .map(|lag| {
                let shift = lag.unsigned_abs() as usize;
                if shift >= n {
                    return (lag, None);
                }
                let (xs, ys) = if lag >= 0 {
                    (&x[shift..n], &y[..n - shift])
                } else {
                    (&x[..n - shift], &y[shift..n])
                };
                (lag, Self::pearson(xs, ys))
            })
            .collect()
    }

    /// Cross-correlation of the first differences of an aligned pair.
    pub fn cross_analysis(pair: &AlignedPair, max_lag: usize) -> Vec<(i64, Option<f64>)> {
        let x = Self::difference(pair.primary.values(), 1);
        let y = Self::difference(pair.secondary.values(), 1);
        Self::cross_correlation(&x, &y, max_lag)
    }

    /// Lag of the strongest absolute cross-correlation, if any is defined.
    pub fn strongest_lag(ccf: &[(i64, Option<f64>)]) -> Option<(i64, f64)> {
        ccf.iter()
            .filter_map(|(lag, c)| c.map(|c| (*lag, c)))
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
    }
}
