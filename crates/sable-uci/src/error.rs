//! UCI protocol errors.

use sable_core::{FenError, MoveParseError};

/// Errors that can occur during UCI protocol handling.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command is missing `startpos` or `fen` keyword.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    #[error("invalid FEN '{fen}': {source}")]
    InvalidFen {
        fen: String,
        #[source]
        source: FenError,
    },

    /// A move in the `position` command is malformed or illegal.
    #[error("invalid move in position command: {source}")]
    InvalidMove {
        #[from]
        source: MoveParseError,
    },

    /// A `go` parameter that needs a value was the last token.
    #[error("missing value for go parameter '{param}'")]
    MissingGoValue { param: String },

    #[error("invalid value '{value}' for go parameter '{param}'")]
    InvalidGoValue { param: String, value: String },

    /// `setoption` without `name`.
    #[error("malformed setoption command")]
    MalformedSetOption,

    #[error("unknown option '{name}'")]
    UnknownOption { name: String },

    /// Option value that does not parse or is out of range.
    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOptionValue { name: String, value: String },

    /// The depth given to `bench` could not be parsed.
    #[error("invalid depth: {value}")]
    InvalidDepth { value: String },

    #[error("benchmark failed: {source}")]
    Bench {
        #[source]
        source: FenError,
    },

    /// An I/O error on the protocol streams.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_errors_name_the_option() {
        let err = UciError::InvalidOptionValue { name: "Hash".into(), value: "0".into() };
        assert_eq!(err.to_string(), "invalid value '0' for option 'Hash'");
        let err = UciError::UnknownOption { name: "Ponder".into() };
        assert_eq!(err.to_string(), "unknown option 'Ponder'");
    }

    #[test]
    fn move_errors_convert() {
        let err: UciError = MoveParseError::Illegal("e2e5".into()).into();
        assert_eq!(err.to_string(), "invalid move in position command: illegal move 'e2e5'");
    }
}
