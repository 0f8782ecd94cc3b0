// Analyzer module: imputation, alignment and the statistics built on top.

pub mod alignment;
pub mod imputation;
pub mod indicators;
pub mod report;
pub mod selection;

// Re-export the entry points used by the binary.
pub use alignment::align;
pub use indicators::SeriesIndicators;
pub use report::DataReport;
