//! Reformatting of comments and prose
//!
//! Three entry points share one pipeline: parse the text with the grammar
//! for its kind, turn the parse tree into paragraphs, and compose each
//! paragraph back to text. The result equals the input when the input is
//! already canonical; on a parse failure nothing is produced and the
//! caller keeps its text.
//!
//! # Example
//!
//! ```ignore
//! use commentfmt::format::{format_block_comment, FormatConfig};
//!
//! let config = FormatConfig::default().with_width(40);
//! let formatted = format_block_comment(text, &config)?;
//! if formatted != text {
//!     // replace
//! }
//! ```

pub mod align;
pub mod block;
pub mod compose;
pub mod config;
pub mod construct;
pub mod error;
pub mod layout;
pub mod line;
pub mod plain;
pub mod primitives;

pub use config::{
    FormatConfig, UnnamedParams, DEFAULT_TAB_SIZE, DEFAULT_WIDTH, UNNAMED_PLACEHOLDER,
};
pub use construct::{ConstructKind, Strategy};
pub use error::FormatError;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which grammar a text is read with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    /// `/** ... */` documentation comment
    BlockComment,
    /// Run of `//` or `#` comment lines
    LineComment,
    /// Prose without comment punctuation
    Paragraph,
}

impl TextKind {
    /// Format `text` as this kind
    pub fn format(self, text: &str, config: &FormatConfig) -> Result<String, FormatError> {
        match self {
            TextKind::BlockComment => format_block_comment(text, config),
            TextKind::LineComment => format_line_comment(text, config),
            TextKind::Paragraph => format_paragraph(text, config),
        }
    }
}

impl fmt::Display for TextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextKind::BlockComment => "block comment",
            TextKind::LineComment => "line comment",
            TextKind::Paragraph => "paragraph",
        };
        f.write_str(name)
    }
}

/// Canonical form of a documentation block comment
pub fn format_block_comment(text: &str, config: &FormatConfig) -> Result<String, FormatError> {
    run(text, |text| block::format(text, config))
}

/// Canonical form of a run of line comments
pub fn format_line_comment(text: &str, config: &FormatConfig) -> Result<String, FormatError> {
    run(text, |text| line::format(text, config))
}

/// Canonical form of plain paragraphs
pub fn format_paragraph(text: &str, config: &FormatConfig) -> Result<String, FormatError> {
    run(text, |text| plain::format(text, config))
}

/// Grammars expect every line to end in `\n`; a missing final line break is
/// supplied for parsing and left out of the result again.
fn run(
    text: &str,
    format: impl FnOnce(&str) -> Result<String, FormatError>,
) -> Result<String, FormatError> {
    log_debug!("Formatting {} bytes", text.len());

    let formatted = if text.ends_with('\n') {
        format(text)?
    } else {
        let terminated = format!("{}\n", text);
        let mut formatted = format(&terminated)?;
        if formatted.ends_with('\n') {
            formatted.pop();
        }
        formatted
    };

    if formatted == text {
        log_debug!("Text is already canonical");
    }
    Ok(formatted)
}
