pub mod series_parser;

pub use series_parser::{ParseOutcome, Parser, PrimaryParser, SecondaryParser};
