use crate::model::{Observation, SparseSeries, WeekdaySeries};
use crate::utils::is_weekday;

/// Stable-sorts by date and keeps the first observation of each date.
pub fn normalize_all(name: &str, mut observations: Vec<Observation>) -> SparseSeries {
    observations.sort_by_key(|o| o.date);
    observations.dedup_by_key(|o| o.date);

    let (dates, values) = observations.into_iter().map(|o| (o.date, o.value)).unzip();
    SparseSeries {
        name: name.to_string(),
        dates,
        values,
    }
}

/// Drops Saturdays and Sundays.
pub fn keep_weekdays_only(series: WeekdaySeries) -> WeekdaySeries {
    let name = series.name.clone();
    WeekdaySeries::from_sorted(name, series.iter().filter(|(date, _)| is_weekday(*date)))
}
