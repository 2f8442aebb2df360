//! Error taxonomy for the core.
//!
//! Configuration errors are fatal and raised while building tables or
//! classifiers. Input errors describe a single bad item that callers skip.
//! Contract violations mean the API was driven in a way it never supports.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LidError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid ratio thresholds: low_ratio ({low}) must be below high_ratio ({high})")]
    InvalidThresholds { low: f64, high: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("min_freq {min_freq} excludes every token in both wordlists")]
    Empty { min_freq: u64 },

    #[error("bad wordlist line {line}: {content:?}")]
    BadCountLine { line: usize, content: String },

    #[error("word counts overflow at {0:?}")]
    CountOverflow(String),

    #[error("bad token/tag pair: {0:?}")]
    MalformedToken(String),

    #[error("internal contract violation: {0}")]
    ContractViolation(&'static str),

    #[error("ratio table codec: {0}")]
    Codec(#[from] bincode::Error),
}

impl LidError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LidError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LidError>;
