pub mod analyzer;
pub mod config;
pub mod exam;
pub mod loader;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod source;
pub mod storage;
pub mod utils;
