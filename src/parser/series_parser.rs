// Row-level parsing of raw CSV records into observations
use crate::config::DatePattern;
use crate::model::{NumberFormat, Observation, ParserError, RawRecord};
use crate::utils::{parse_date_either, parse_number};
use chrono::NaiveDate;
use tracing::debug;

pub trait Parser {
    fn parse(&self, records: &[RawRecord]) -> ParseOutcome;
}

/// Parsed rows plus the number of rows thrown away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub observations: Vec<Observation>,
    pub dropped: usize,
}

/// Dates in one of two formats, values always required.
pub struct PrimaryParser {
    pub date_pattern: DatePattern,
    pub number_format: NumberFormat,
}

impl PrimaryParser {
    pub fn new(date_pattern: DatePattern, number_format: NumberFormat) -> Self {
        Self {
            date_pattern,
            number_format,
        }
    }

    fn parse_date(&self, raw: &str) -> Result<NaiveDate, ParserError> {
        parse_date_either(
            raw,
            self.date_pattern.marker,
            &self.date_pattern.with_marker,
            &self.date_pattern.without_marker,
        )
    }

    fn parse_row(&self, record: &RawRecord) -> Result<Observation, ParserError> {
        let date = self.parse_date(&record.date)?;
        let value = parse_number(&record.value, self.number_format)?;
        Ok(Observation {
            date,
            value: Some(value),
        })
    }
}

impl Default for PrimaryParser {
    fn default() -> Self {
        Self::new(DatePattern::default(), NumberFormat::Plain)
    }
}

impl Parser for PrimaryParser {
    fn parse(&self, records: &[RawRecord]) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        for record in records {
            match self.parse_row(record) {
                Ok(obs) => outcome.observations.push(obs),
                Err(e) => {
                    debug!("Dropping line {}: {}", record.line, e);
                    outcome.dropped += 1;
                }
            }
        }
        outcome
    }
}

/// Single date format; blank or unparseable values are kept as missing.
pub struct SecondaryParser {
    pub date_format: String,
    pub number_format: NumberFormat,
}

impl SecondaryParser {
    pub fn new(date_format: &str) -> Self {
        Self {
            date_format: date_format.to_string(),
            number_format: NumberFormat::Plain,
        }
    }
}

impl Default for SecondaryParser {
    fn default() -> Self {
        Self::new("%Y-%m-%d")
    }
}

impl Parser for SecondaryParser {
    fn parse(&self, records: &[RawRecord]) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        for record in records {
            let date = match NaiveDate::parse_from_str(record.date.trim(), &self.date_format) {
                Ok(date) => date,
                Err(_) => {
                    debug!("Dropping line {}: unparseable date '{}'", record.line, record.date);
                    outcome.dropped += 1;
                    continue;
                }
            };
            let value = parse_number(&record.value, self.number_format).ok();
            outcome.observations.push(Observation { date, value });
        }
        outcome
    }
}
