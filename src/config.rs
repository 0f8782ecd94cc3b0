use crate::exam::ExamOptions;
use crate::model::{AlignPolicy, ImputePolicy, NumberFormat};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// The primary file carries dates in one of two formats.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatePattern {
    /// Format used when the date contains `marker`.
    #[serde(default = "default_slash_format")]
    pub with_marker: String,
    #[serde(default = "default_dash_format")]
    pub without_marker: String,
    #[serde(default = "default_marker")]
    pub marker: char,
}

impl Default for DatePattern {
    fn default() -> Self {
        Self {
            with_marker: default_slash_format(),
            without_marker: default_dash_format(),
            marker: default_marker(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrimaryConfig {
    pub path: PathBuf,
    #[serde(default = "default_primary_name")]
    pub name: String,
    #[serde(default = "default_primary_date_column")]
    pub date_column: String,
    #[serde(default = "default_primary_value_column")]
    pub value_column: String,
    #[serde(default)]
    pub number_format: NumberFormat,
    #[serde(default)]
    pub date_pattern: DatePattern,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecondaryConfig {
    pub path: PathBuf,
    #[serde(default = "default_secondary_name")]
    pub name: String,
    #[serde(default = "default_secondary_date_column")]
    pub date_column: String,
    #[serde(default = "default_secondary_value_column")]
    pub value_column: String,
    #[serde(default = "default_iso_format")]
    pub date_format: String,
    #[serde(default)]
    pub impute: ImputePolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExamConfig {
    pub root: PathBuf,
    #[serde(default = "default_categories")]
    pub categories: Vec<u32>,
    #[serde(default)]
    pub options: ExamOptions,
}

/// Copies one question's `q.qmd` to a standalone file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QuizConfig {
    pub source: PathBuf,
    /// Question directory name, e.g. `Q1-03`.
    pub question: String,
    pub dest: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub primary: PrimaryConfig,
    pub secondary: SecondaryConfig,
    #[serde(default)]
    pub align: AlignPolicy,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_cross_correlation_lags")]
    pub cross_correlation_lags: usize,
    #[serde(default)]
    pub exam: Option<ExamConfig>,
    #[serde(default)]
    pub quiz: Option<QuizConfig>,
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    Ok(config)
}

fn default_slash_format() -> String {
    "%m/%d/%Y".into()
}

fn default_dash_format() -> String {
    "%d-%m-%Y".into()
}

fn default_marker() -> char {
    '/'
}

fn default_iso_format() -> String {
    "%Y-%m-%d".into()
}

fn default_primary_name() -> String {
    "USD_INR".into()
}

fn default_primary_date_column() -> String {
    "Date".into()
}

fn default_primary_value_column() -> String {
    "Price".into()
}

fn default_secondary_name() -> String {
    "WTI".into()
}

fn default_secondary_date_column() -> String {
    "observation_date".into()
}

fn default_secondary_value_column() -> String {
    "DCOILWTICO".into()
}

fn default_database_path() -> String {
    "data.db".into()
}

fn default_cross_correlation_lags() -> usize {
    20
}

fn default_categories() -> Vec<u32> {
    (1..=6).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg = parse_config(
            r#"{ "primary": { "path": "usd.csv" }, "secondary": { "path": "wti.csv" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.primary.date_column, "Date");
        assert_eq!(cfg.primary.number_format, NumberFormat::Plain);
        assert_eq!(cfg.primary.date_pattern, DatePattern::default());
        assert_eq!(cfg.secondary.value_column, "DCOILWTICO");
        assert_eq!(cfg.secondary.impute, ImputePolicy::ForwardFill);
        assert_eq!(cfg.align, AlignPolicy::KeepAllPrimary);
        assert_eq!(cfg.cross_correlation_lags, 20);
        assert!(cfg.exam.is_none());
        assert!(cfg.quiz.is_none());
    }

    #[test]
    fn explicit_policies() {
        let cfg = parse_config(
            r#"{
                "primary": { "path": "dax.csv", "value_column": "Open", "number_format": "decimal_comma" },
                "secondary": { "path": "wti.csv", "impute": "interpolate" },
                "align": "intersection",
                "exam": { "root": "mt2", "options": { "exam_mode": true } }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.primary.number_format, NumberFormat::DecimalComma);
        assert_eq!(cfg.secondary.impute, ImputePolicy::Interpolate);
        assert_eq!(cfg.align, AlignPolicy::Intersection);
        let exam = cfg.exam.unwrap();
        assert_eq!(exam.categories, vec![1, 2, 3, 4, 5, 6]);
        assert!(exam.options.exam_mode);
    }

    #[test]
    fn quiz_entry() {
        let cfg = parse_config(
            r#"{
                "primary": { "path": "usd.csv" },
                "secondary": { "path": "wti.csv" },
                "quiz": { "source": "mt2", "question": "Q1-03", "dest": "quiz/tmp08.qmd" }
            }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.quiz,
            Some(QuizConfig {
                source: PathBuf::from("mt2"),
                question: "Q1-03".into(),
                dest: PathBuf::from("quiz/tmp08.qmd"),
            })
        );
        assert!(parse_config(r#"{ "primary": { "path": "u.csv" }, "secondary": { "path": "w.csv" }, "quiz": { "source": "mt2" } }"#).is_err());
    }

    #[test]
    fn missing_path_is_an_error() {
        assert!(parse_config(r#"{ "primary": {}, "secondary": { "path": "w.csv" } }"#).is_err());
    }
}
