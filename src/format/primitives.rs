//! Lexical building blocks shared by the grammars
//!
//! The regex engine has no lookaround, so "stop before a tag" is expressed
//! as a grammar-level negative lookahead over [`TAG_START`].

use crate::peg::parser_dsl::*;

/// Run of tabs and spaces, possibly empty
pub const INDENTATION: &str = r"[\t ]*";

/// Non-empty run of tabs and spaces
pub const BLANKS: &str = r"[\t ]+";

/// Everything up to the end of the line, possibly nothing
pub const REST_OF_LINE: &str = r".*";

/// Everything up to the end of the line, at least one character
pub const NON_EMPTY_REST: &str = r".+";

/// A run of non-space characters (parameter names, exception types)
pub const EXPRESSION: &str = r"\S+";

/// Bullet marker followed by its mandatory space
pub const BULLET: &str = r"[\+\-\*] ";

/// Line that is nothing but indentation
pub const BLANK_LINE: &str = r"[\t ]*\n";

/// Tag markers recognized inside block comments
pub const TAG_MARKERS: &[&str] = &[
    "@brief",
    "@tparam",
    "@param",
    "@returns",
    "@return",
    "@code",
    "@endcode",
    "@note",
    "@warning",
    "@throws",
    "@see",
    "@relatedalso",
    "@related",
];

/// Start of anything that opens a new block-comment construct
///
/// Tag markers only count as whole words, so `@briefly` is prose.
pub const TAG_START: &str = r"[\t ]*(?:(?:@brief|@tparam|@param|@returns?|@code|@endcode|@note|@warning|@throws|@see|@relatedalso|@related)\b|\||\[.+\]:|[\+\-\*] )";

/// Line break, or the end of input on an unterminated last line
pub fn line_end() -> Dynamic {
    dynamic(str("\n").or(eof()))
}

/// Positive check for an upcoming line break or end of input
pub fn at_line_end() -> Dynamic {
    dynamic(str("\n").lookahead().or(eof()))
}

/// Whether `word` would be read as the start of a block-comment construct
/// if it began a line
pub fn opens_block_construct(word: &str) -> bool {
    // Any bracket could open a `[label]: target` line later on
    TAG_MARKERS.iter().any(|marker| word.starts_with(marker))
        || word.starts_with(['|', '['])
        || opens_bullet(word)
}

/// Whether `word` would be read as a bullet if it began a plain-text line
pub fn opens_bullet(word: &str) -> bool {
    matches!(word, "+" | "-" | "*")
}
