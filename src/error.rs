use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HarvestError {
    #[error("invalid study accession: {0}")]
    InvalidStudyAccession(String),

    #[error("invalid study tag {0:?}: must not be empty")]
    InvalidStudyTag(String),

    #[error("cannot merge {found} results into {expected} results")]
    ResultTypeMismatch { expected: String, found: String },

    #[error("config file not found at {0}")]
    MissingConfig(PathBuf),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("EVA request failed: {0}")]
    EvaHttp(String),

    #[error("EVA returned status {status}: {message}")]
    EvaStatus { status: u16, message: String },

    #[error("unexpected EVA response shape: {0}")]
    EvaShape(String),

    #[error("ENA request failed: {0}")]
    EnaHttp(String),

    #[error("ENA returned status {status}: {message}")]
    EnaStatus { status: u16, message: String },

    #[error("failed to parse ENA response: {0}")]
    EnaParse(String),

    #[error("failed to write output: {0}")]
    Output(String),
}
