//! Error types
//!
//! Every error here is fatal for a run: configuration and patterns are
//! checked before any token is read, and nothing is written until the
//! start/end tables are built.

use thiserror::Error;

/// A malformed or semantically invalid rule set
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("surround-regexp[{index}] must have either 'endings' array or 'end' pattern (or both)")]
    MissingEnd { index: usize },

    #[error(
        "surround-regexp[{index}].endings[{ending}] contains backreferences ($1, $2, etc.) but no \
         'end' pattern is provided for capture groups. Use $0 for the full match or provide an \
         'end' pattern"
    )]
    CaptureWithoutEnd { index: usize, ending: usize },

    #[error("operator-regexp[{index}] pattern is empty")]
    EmptyOperatorPattern { index: usize },
}

/// A regular expression that failed to compile
#[derive(Error, Debug)]
#[error("{origin}: invalid regular expression {pattern:?}: {source}")]
pub struct PatternError {
    /// Where the pattern came from, e.g. `surround-regexp[2].end`
    pub origin: String,
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Top-level error for a classification run
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClassifyError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ClassifyError::Io {
            context: context.into(),
            source,
        }
    }
}
