//! Formatting errors

use crate::peg::{ParseError, SourcePosition};
use std::fmt;

/// Why a text could not be formatted
///
/// Formatting never touches the caller's text, so every error means "leave
/// the original as it is".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The text does not follow the grammar for its kind
    Unmatched {
        /// Furthest point the grammar reached
        position: SourcePosition,
        /// What was expected there
        expected: String,
    },

    /// The matching engine refused to run (limits, broken grammar)
    Engine(ParseError),
}

impl FormatError {
    /// Convert an engine error, resolving offsets against `input`
    pub fn from_parse(err: ParseError, input: &str) -> Self {
        match err {
            ParseError::Unmatched { position, expected } => FormatError::Unmatched {
                position: SourcePosition::from_offset(input, position),
                expected,
            },
            ParseError::Failed { position } => FormatError::Unmatched {
                position: SourcePosition::from_offset(input, position),
                expected: "a recognized construct".to_string(),
            },
            other => FormatError::Engine(other),
        }
    }

    /// Where formatting failed, for grammar mismatches
    pub fn position(&self) -> Option<SourcePosition> {
        match self {
            FormatError::Unmatched { position, .. } => Some(*position),
            FormatError::Engine(_) => None,
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Unmatched { position, expected } => {
                write!(f, "cannot format text: at {} expected {}", position, expected)
            }
            FormatError::Engine(err) => write!(f, "cannot format text: {}", err),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Engine(err) => Some(err),
            FormatError::Unmatched { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parse_resolves_line_and_column() {
        let err = ParseError::Unmatched {
            position: 9,
            expected: "\"*/\"".to_string(),
        };
        let err = FormatError::from_parse(err, "/**\n * x\n");
        let position = err.position().unwrap();
        assert_eq!((position.line, position.column), (3, 1));
        assert_eq!(
            err.to_string(),
            "cannot format text: at line 3, column 1 expected \"*/\""
        );
    }

    #[test]
    fn test_engine_errors_pass_through() {
        let err = FormatError::from_parse(
            ParseError::InputTooLarge {
                input_size: 9,
                max_size: 1,
            },
            "",
        );
        assert!(matches!(err, FormatError::Engine(_)));
        assert!(err.position().is_none());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_positions_are_one_based() {
        let err = FormatError::from_parse(ParseError::Failed { position: 0 }, "");
        let position = err.position().unwrap();
        assert_eq!((position.offset, position.line, position.column), (0, 1, 1));

        let err = FormatError::from_parse(ParseError::Failed { position: 99 }, "ab\n");
        let position = err.position().unwrap();
        assert_eq!((position.offset, position.line, position.column), (3, 2, 1));
    }
}
