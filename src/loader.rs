// Load pipeline: source -> parser -> normalizer -> (imputation) -> weekday filter
use crate::analyzer::imputation::impute_series;
use crate::config::{PrimaryConfig, SecondaryConfig};
use crate::model::{ImputePolicy, LoadError, Observation, WeekdaySeries};
use crate::normalizer::{keep_weekdays_only, normalize_all};
use crate::parser::{Parser, PrimaryParser, SecondaryParser};
use crate::source::{CsvFileSource, RecordSource};
use tracing::info;

/// A cleaned weekday series together with what was parsed on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub series: WeekdaySeries,
    /// Parsed rows in file order, before dedupe and imputation.
    pub raw: Vec<Observation>,
    /// Rows dropped because the date (or a required value) did not parse.
    pub dropped: usize,
}

impl LoadedSeries {
    pub fn missing_raw(&self) -> usize {
        self.raw.iter().filter(|o| o.value.is_none()).count()
    }
}

/// Loads a series whose every row must carry a value.
pub fn load_primary<S, P>(name: &str, source: &S, parser: &P) -> Result<LoadedSeries, LoadError>
where
    S: RecordSource + ?Sized,
    P: Parser + ?Sized,
{
    let records = source.fetch()?;
    let outcome = parser.parse(&records);
    let raw = outcome.observations.clone();

    let series = keep_weekdays_only(normalize_all(name, outcome.observations).into_dense());
    info!(
        "{}: {} rows read, {} dropped, {} weekdays kept",
        name,
        records.len(),
        outcome.dropped,
        series.len()
    );
    Ok(LoadedSeries {
        series,
        raw,
        dropped: outcome.dropped,
    })
}

/// Loads a series that may have blank values and fills them with `policy`
/// before weekends are removed.
pub fn load_secondary<S, P>(
    name: &str,
    source: &S,
    parser: &P,
    policy: ImputePolicy,
) -> Result<LoadedSeries, LoadError>
where
    S: RecordSource + ?Sized,
    P: Parser + ?Sized,
{
    let records = source.fetch()?;
    let outcome = parser.parse(&records);
    let raw = outcome.observations.clone();

    let sparse = normalize_all(name, outcome.observations);
    let missing = sparse.missing_count();
    if missing > 0 {
        info!("{}: imputing {} missing values ({:?})", name, missing, policy);
    }
    let series = keep_weekdays_only(impute_series(sparse, policy)?);
    info!(
        "{}: {} rows read, {} dropped, {} weekdays kept",
        name,
        records.len(),
        outcome.dropped,
        series.len()
    );
    Ok(LoadedSeries {
        series,
        raw,
        dropped: outcome.dropped,
    })
}

pub fn load_primary_csv(cfg: &PrimaryConfig) -> Result<LoadedSeries, LoadError> {
    let source = CsvFileSource::new(&cfg.path, &cfg.date_column, &cfg.value_column);
    let parser = PrimaryParser::new(cfg.date_pattern.clone(), cfg.number_format);
    load_primary(&cfg.name, &source, &parser)
}

pub fn load_secondary_csv(cfg: &SecondaryConfig) -> Result<LoadedSeries, LoadError> {
    let source = CsvFileSource::new(&cfg.path, &cfg.date_column, &cfg.value_column);
    let parser = SecondaryParser::new(&cfg.date_format);
    load_secondary(&cfg.name, &source, &parser, cfg.impute)
}
