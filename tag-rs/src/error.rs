//! Error types.
//!
//! [`EvalError`] never escapes a render: the analyzer logs it and substitutes
//! an empty string.  [`ConfigError`] is reported by the bindings-file loader
//! and the `tagscript` binary.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single expression produced no text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("not a number: '{0}'")]
    NotANumber(String),

    #[error("{builtin}: malformed argument '{arg}'")]
    BadArgument { builtin: &'static str, arg: String },

    #[error("'{0}' is not bound to an array")]
    NotAList(String),

    #[error("invalid index '{0}'")]
    BadIndex(String),

    #[error("index '{0}' is out of range")]
    OutOfRange(String),

    #[error("no key '{0}'")]
    MissingKey(String),

    #[error("'{0}' cannot be assigned to")]
    BadTarget(String),

    #[error("malformed condition '{0}'")]
    MalformedCondition(String),
}

/// Errors raised while loading a bindings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read template: {0}")]
    Template(#[source] std::io::Error),

    /// A non-fatal problem on one line; loading continues past it.
    #[error("line {line}: {message}")]
    Line { line: usize, message: String },
}

impl ConfigError {
    pub fn line(line: usize, message: impl Into<String>) -> Self {
        ConfigError::Line { line, message: message.into() }
    }
}
