//! Error types in tree-classify
//!

use std::path::PathBuf;

use thiserror::Error;

use crate::classifier::ClassifierKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed input {0}")]
    Csv(#[from] csv::Error),
    #[error("parse error on line {line}: {reason}")]
    Parse { line: u64, reason: String },
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("invalid argument {0}")]
    InvalidArgument(String),
    #[error("classifier has not been fitted yet")]
    NotFitted,
    #[error("classifier has already been fitted")]
    AlreadyFitted,
    #[error("label mismatch {0}")]
    LabelMismatch(String),
    #[error("{0} does not provide class probability estimates")]
    ProbabilitiesUnsupported(ClassifierKind),
    #[error("invalid configuration {0}")]
    Config(String),
    #[error("could not render plot {0}")]
    Plot(String),
    #[error(transparent)]
    Linfa(#[from] linfa::error::Error),
}
