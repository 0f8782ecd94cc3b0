use crate::analyzer::imputation::{backward_fill, fill_with, forward_fill, has_missing};
use crate::model::{AlignError, AlignPolicy, AlignedPair, WeekdaySeries};
use crate::utils::week_key;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// Puts both series onto one gap-free date index.
pub fn align(
    primary: &WeekdaySeries,
    secondary: &WeekdaySeries,
    policy: AlignPolicy,
) -> Result<AlignedPair, AlignError> {
    match policy {
        AlignPolicy::KeepAllPrimary => keep_all_primary(primary, secondary),
        AlignPolicy::Intersection => Ok(intersection(primary, secondary)),
    }
}

/// Uses every primary date. Missing secondary values are filled with the mean
/// of the secondary's observations in the same ISO week, then forward/backward
/// fill, then the secondary's overall mean.
pub fn keep_all_primary(primary: &WeekdaySeries, secondary: &WeekdaySeries) -> Result<AlignedPair, AlignError> {
    let targets = primary.dates();
    let reindexed: Vec<Option<f64>> = targets.iter().map(|d| secondary.get(*d)).collect();
    let imputed = reindexed.iter().filter(|v| v.is_none()).count();

    let mut filled = fill_from_weekly_mean(targets, &reindexed);
    if has_missing(&filled) {
        debug!("Weekly mean left gaps; falling back to forward/backward fill");
        filled = backward_fill(&forward_fill(&filled));
    }
    if has_missing(&filled) {
        let mean = secondary
            .mean()
            .ok_or_else(|| AlignError::EmptySeries(secondary.name.clone()))?;
        debug!("Falling back to global mean {:.4}", mean);
        filled = fill_with(&filled, mean);
    }

    let secondary_points = targets
        .iter()
        .zip(filled)
        .filter_map(|(date, value)| value.map(|v| (*date, v)));

    Ok(AlignedPair {
        primary: primary.clone(),
        secondary: WeekdaySeries::from_sorted(secondary.name.clone(), secondary_points),
        imputed,
    })
}

/// Fills each missing entry with the mean of the observed entries that share
/// its ISO week. Weeks with nothing observed stay missing.
pub fn fill_from_weekly_mean(dates: &[NaiveDate], values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut weeks: HashMap<(i32, u32), (f64, usize)> = HashMap::new();
    for (date, value) in dates.iter().zip(values) {
        if let Some(v) = value {
            let entry = weeks.entry(week_key(*date)).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }

    dates
        .iter()
        .zip(values)
        .map(|(date, value)| {
            value.or_else(|| {
                weeks
                    .get(&week_key(*date))
                    .map(|(sum, count)| sum / *count as f64)
            })
        })
        .collect()
}

/// Keeps only the dates present in both series.
pub fn intersection(primary: &WeekdaySeries, secondary: &WeekdaySeries) -> AlignedPair {
    let common: Vec<(NaiveDate, f64, f64)> = primary
        .iter()
        .filter_map(|(date, p)| secondary.get(date).map(|s| (date, p, s)))
        .collect();

    AlignedPair {
        primary: WeekdaySeries::from_sorted(primary.name.clone(), common.iter().map(|(d, p, _)| (*d, *p))),
        secondary: WeekdaySeries::from_sorted(secondary.name.clone(), common.iter().map(|(d, _, s)| (*d, *s))),
        imputed: 0,
    }
}
