//! commentfmt - Grammar-driven reformatting of comments and prose
//!
//! Formats three kinds of text to a target width:
//! - Documentation block comments (`@brief`, `@param`, `@code`, notes,
//!   lists, tables)
//! - Runs of `//` or `#` line comments
//! - Plain paragraphs and bullet lists
//!
//! Each kind is described by a PEG grammar. The text is parsed into
//! labelled constructs and every construct is composed back with its own
//! wrapping and alignment rules. Prefixes and indentation are kept as
//! written; prose is rewrapped.
//!
//! ## Quick Start
//!
//! ```ignore
//! use commentfmt::prelude::*;
//!
//! let config = FormatConfig::default().with_width(40);
//! let text = "// one\n// two\n";
//! assert_eq!(format_line_comment(text, &config)?, "// one two\n");
//! ```
//!
//! ## Formatting Inside a Document
//!
//! ```ignore
//! use commentfmt::scope::format_at;
//!
//! if let Some(edit) = format_at(&document, cursor, &config)? {
//!     document = edit.apply(&document);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging using the `log` crate

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
#![allow(clippy::module_inception)]

/// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { log::trace!($($arg)*) };
}

// Prelude module for convenient imports
pub mod prelude;

// Matching engine
pub mod peg;

// Grammars and composers
pub mod format;

// Editor collaborators
pub mod host;
pub mod scope;

// ============================================================================
// Re-exports
// ============================================================================

pub use format::{
    format_block_comment, format_line_comment, format_paragraph, FormatConfig, FormatError,
    TextKind, UnnamedParams,
};
pub use host::{Preferences, RulerOverride, RulerStore};
pub use peg::{Grammar, ParseError};
pub use scope::{format_at, TextEdit};
