use crate::model::{RawRecord, SourceError};

/// Anything that can hand back (date, value) string pairs.
pub trait RecordSource {
    fn fetch(&self) -> Result<Vec<RawRecord>, SourceError>;
}
