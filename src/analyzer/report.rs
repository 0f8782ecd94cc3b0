use crate::model::{AlignedPair, Observation, WeekdaySeries};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const WEEKDAY_NAMES: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn of(dates: &[NaiveDate]) -> Option<Self> {
        Some(Self {
            from: *dates.first()?,
            to: *dates.last()?,
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "from {}  to {}", self.from.format("%Y-%m-%d"), self.to.format("%Y-%m-%d"))
    }
}

/// Counts describing how much data survived cleaning and alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataReport {
    pub primary_name: String,
    pub secondary_name: String,
    pub primary_days: usize,
    pub primary_range: Option<DateRange>,
    pub secondary_days: usize,
    pub secondary_range: Option<DateRange>,
    /// Rows of the raw secondary file with a blank value.
    pub secondary_missing_raw: usize,
    /// Same, split by weekday Mon..Fri.
    pub secondary_missing_by_weekday: [usize; 5],
    /// Dates where both series had data before any fill.
    pub overlap_days: usize,
    pub overlap_range: Option<DateRange>,
    pub aligned_days: usize,
    pub aligned_range: Option<DateRange>,
    pub filled_days: usize,
}

impl DataReport {
    pub fn build(
        raw_secondary: &[Observation],
        primary: &WeekdaySeries,
        secondary: &WeekdaySeries,
        aligned: &AlignedPair,
    ) -> Self {
        let mut missing_by_weekday = [0usize; 5];
        let mut missing_raw = 0;
        for obs in raw_secondary.iter().filter(|o| o.value.is_none()) {
            missing_raw += 1;
            let dow = obs.date.weekday().num_days_from_monday() as usize;
            if let Some(slot) = missing_by_weekday.get_mut(dow) {
                *slot += 1;
            }
        }

        let overlap: Vec<NaiveDate> = primary
            .dates()
            .iter()
            .copied()
            .filter(|d| secondary.get(*d).is_some())
            .collect();

        Self {
            primary_name: primary.name.clone(),
            secondary_name: secondary.name.clone(),
            primary_days: primary.len(),
            primary_range: DateRange::of(primary.dates()),
            secondary_days: secondary.len(),
            secondary_range: DateRange::of(secondary.dates()),
            secondary_missing_raw: missing_raw,
            secondary_missing_by_weekday: missing_by_weekday,
            overlap_days: overlap.len(),
            overlap_range: DateRange::of(&overlap),
            aligned_days: aligned.len(),
            aligned_range: DateRange::of(aligned.dates()),
            filled_days: aligned.len().saturating_sub(overlap.len()),
        }
    }
}

fn range_or_na(range: &Option<DateRange>) -> String {
    range.map(|r| r.to_string()).unwrap_or_else(|| "N/A".to_string())
}

impl fmt::Display for DataReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data are daily; only Monday-Friday are kept (weekends dropped).")?;
        if self.secondary_missing_raw > 0 {
            writeln!(
                f,
                "{}: {} missing prices in CSV were imputed when loading.",
                self.secondary_name, self.secondary_missing_raw
            )?;
            let parts: Vec<String> = WEEKDAY_NAMES
                .iter()
                .zip(self.secondary_missing_by_weekday.iter())
                .map(|(name, count)| format!("{}: {}", name, count))
                .collect();
            writeln!(f, "Missing {} by weekday (raw CSV): {}", self.secondary_name, parts.join(",  "))?;
        }
        writeln!(
            f,
            "Overlapping days (both have data before any fill): {:>6}  {}",
            self.overlap_days,
            range_or_na(&self.overlap_range)
        )?;
        writeln!(
            f,
            "{} (weekdays): {:>6} days   {}",
            self.primary_name,
            self.primary_days,
            range_or_na(&self.primary_range)
        )?;
        writeln!(
            f,
            "{} (weekdays): {:>6} days   {}",
            self.secondary_name,
            self.secondary_days,
            range_or_na(&self.secondary_range)
        )?;
        write!(
            f,
            "Aligned series: {:>6} days  {}  ({} filled for {} days)",
            self.aligned_days,
            range_or_na(&self.aligned_range),
            self.secondary_name,
            self.filled_days
        )
    }
}
