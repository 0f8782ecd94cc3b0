pub mod csv_file;
pub mod traits;

pub use csv_file::{CsvFileSource, read_records};
pub use traits::RecordSource;
