//! Parse tree node types
//!
//! Nodes are small `Copy` values that point into the arena or the input.
//! Every node carries the byte span it consumed so that composers can
//! recover the verbatim text of any labelled sub-match.

use std::fmt;
use std::ops::Range;

pub use super::source_location::SourcePosition;

/// Parse tree node - optimized for arena allocation
///
/// Children live in the arena's pools and are addressed by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstNode {
    /// Zero-width match (lookahead, end of input)
    Nil {
        /// Offset where the match happened
        offset: u32,
    },

    /// Reference to original input (zero-copy)
    InputRef {
        /// Offset from start of input
        offset: u32,
        /// Length in bytes
        length: u32,
    },

    /// Children of a sequence or repetition
    Array {
        /// Offset of the first consumed byte
        offset: u32,
        /// Number of consumed bytes
        length: u32,
        /// Index into arena's array pool
        pool_index: u32,
        /// Number of items
        count: u32,
    },

    /// Labelled capture
    Hash {
        /// Offset of the first consumed byte
        offset: u32,
        /// Number of consumed bytes
        length: u32,
        /// Index into arena's hash pool
        pool_index: u32,
        /// Number of entries
        count: u32,
    },
}

impl AstNode {
    /// Byte offset where this node starts
    #[inline]
    pub fn offset(&self) -> usize {
        match *self {
            AstNode::Nil { offset }
            | AstNode::InputRef { offset, .. }
            | AstNode::Array { offset, .. }
            | AstNode::Hash { offset, .. } => offset as usize,
        }
    }

    /// Number of bytes consumed by this node
    #[inline]
    pub fn len(&self) -> usize {
        match *self {
            AstNode::Nil { .. } => 0,
            AstNode::InputRef { length, .. }
            | AstNode::Array { length, .. }
            | AstNode::Hash { length, .. } => length as usize,
        }
    }

    /// Check if this node consumed nothing
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte range of the input this node consumed
    #[inline]
    pub fn span(&self) -> Range<usize> {
        let start = self.offset();
        start..start + self.len()
    }

    /// Check if this is a zero-width marker
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, AstNode::Nil { .. })
    }

    /// Check if this is a labelled capture
    #[inline]
    pub fn is_hash(&self) -> bool {
        matches!(self, AstNode::Hash { .. })
    }
}

/// Result of a parse operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseResult {
    /// The parsed node
    pub value: AstNode,
    /// Position after the matched content
    pub end_pos: usize,
}

/// Error type for parse operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An atom did not match at this position (internal backtracking signal)
    Failed {
        /// The byte offset where matching failed
        position: usize,
    },

    /// The grammar could not match the whole input
    Unmatched {
        /// Furthest byte offset any atom reached before failing
        position: usize,
        /// Description of what was expected there
        expected: String,
    },

    /// Invalid grammar specification
    InvalidGrammar {
        /// Reason why the grammar is invalid
        reason: String,
    },

    /// Internal error (shouldn't happen in normal use)
    Internal {
        /// Error message describing the internal error
        message: String,
    },

    /// Input exceeds maximum allowed size
    InputTooLarge {
        /// Size of the input in bytes
        input_size: usize,
        /// Maximum allowed size
        max_size: usize,
    },

    /// Recursion depth limit exceeded
    RecursionLimitExceeded {
        /// Current recursion depth
        depth: usize,
        /// Maximum allowed depth
        max_depth: usize,
    },
}

impl ParseError {
    /// Create a new Failed error
    #[inline]
    pub fn at_position(position: usize) -> Self {
        ParseError::Failed { position }
    }

    /// Byte offset this error refers to, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Failed { position } | ParseError::Unmatched { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }

    /// Render the error with line/column information
    pub fn format_with_position(&self, input: &str) -> String {
        match self {
            ParseError::Failed { position } => {
                let sp = SourcePosition::from_offset(input, *position);
                format!(
                    "Parse failed at line {}, column {} (byte offset {})",
                    sp.line, sp.column, position
                )
            }
            ParseError::Unmatched { position, expected } => {
                let sp = SourcePosition::from_offset(input, *position);
                format!(
                    "No match at line {}, column {}: expected {}",
                    sp.line, sp.column, expected
                )
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Failed { position } => {
                write!(f, "Parse failed at position {}", position)
            }
            ParseError::Unmatched { position, expected } => {
                write!(f, "No match at position {}: expected {}", position, expected)
            }
            ParseError::InvalidGrammar { reason } => {
                write!(f, "Invalid grammar: {}", reason)
            }
            ParseError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
            ParseError::InputTooLarge {
                input_size,
                max_size,
            } => {
                write!(
                    f,
                    "Input too large: {} bytes exceeds limit of {} bytes",
                    input_size, max_size
                )
            }
            ParseError::RecursionLimitExceeded { depth, max_depth } => {
                write!(
                    f,
                    "Recursion limit exceeded: depth {} exceeds limit of {}",
                    depth, max_depth
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}
