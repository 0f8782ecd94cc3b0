use crate::model::{RawRecord, SourceError};
use crate::source::traits::RecordSource;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

/// Reads two named columns out of a delimited file on disk.
pub struct CsvFileSource {
    pub path: PathBuf,
    pub date_column: String,
    pub value_column: String,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>, date_column: &str, value_column: &str) -> Self {
        Self {
            path: path.into(),
            date_column: date_column.to_string(),
            value_column: value_column.to_string(),
        }
    }
}

impl RecordSource for CsvFileSource {
    fn fetch(&self) -> Result<Vec<RawRecord>, SourceError> {
        let file = File::open(&self.path).map_err(|e| SourceError::Open {
            path: self.path.display().to_string(),
            source: e,
        })?;
        let records = read_records(file, &self.date_column, &self.value_column)?;
        debug!("Read {} rows from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// Reads the date and value columns from any CSV reader. Short rows yield
/// empty strings for the missing cells.
pub fn read_records<R: Read>(
    reader: R,
    date_column: &str,
    value_column: &str,
) -> Result<Vec<RawRecord>, SourceError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
            .ok_or_else(|| SourceError::MissingColumn(name.to_string()))
    };
    let date_idx = find(date_column)?;
    let value_idx = find(value_column)?;

    let mut records = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(row + 2);
        records.push(RawRecord {
            line,
            date: record.get(date_idx).unwrap_or("").to_string(),
            value: record.get(value_idx).unwrap_or("").to_string(),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_named_columns_in_any_order() {
        let data = "\u{feff}\"Date\",\"Price\",\"Open\"\n\"01/02/2024\",\"83,21\",\"83.1\"\n03-01-2024,83.3\n";
        let records = read_records(data.as_bytes(), "Date", "Price").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, "01/02/2024");
        assert_eq!(records[0].value, "83,21");
        assert_eq!(records[1].value, "83.3");
        assert_eq!(records[0].line, 2);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read_records("a,b\n1,2\n".as_bytes(), "Date", "b").unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn(c) if c == "Date"));
    }

    #[test]
    fn short_row_gives_blank_value() {
        let records = read_records("observation_date,DCOILWTICO\n2024-01-01\n".as_bytes(), "observation_date", "DCOILWTICO").unwrap();
        assert_eq!(records[0].value, "");
    }

    #[test]
    fn missing_file_is_fatal() {
        let src = CsvFileSource::new("/definitely/not/here.csv", "Date", "Price");
        assert!(matches!(src.fetch(), Err(SourceError::Open { .. })));
    }
}
