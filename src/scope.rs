//! Locating the text to format around a cursor
//!
//! Scopes are byte ranges of whole lines in a larger document, so the
//! formatted replacement can be spliced back in place.

use crate::format::{FormatConfig, FormatError, TextKind};
use crate::peg::source_location::{line_index, line_ranges};
use memchr::memmem;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Replacement of one byte range in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// Range of the original text
    pub range: Range<usize>,
    /// Text to put there
    pub new_text: String,
}

impl TextEdit {
    /// Document with this edit applied
    pub fn apply(&self, document: &str) -> String {
        let mut out = String::with_capacity(
            document.len() - self.range.len().min(document.len()) + self.new_text.len(),
        );
        out.push_str(&document[..self.range.start]);
        out.push_str(&self.new_text);
        out.push_str(&document[self.range.end..]);
        out
    }
}

fn is_line_comment(line: &str) -> bool {
    let code = line.trim_start_matches([' ', '\t']);
    code.starts_with("//") || code.starts_with('#')
}

fn is_empty_line(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']).is_empty()
}

/// Widen the cursor line to the maximal run of lines accepted by `keep`
fn line_run(document: &str, offset: usize, keep: impl Fn(&str) -> bool) -> Option<Range<usize>> {
    let ranges = line_ranges(document);
    let row = line_index(&ranges, offset)?;
    let accepted = |index: usize| keep(&document[ranges[index].clone()]);
    if !accepted(row) {
        return None;
    }

    let first = (0..row)
        .rev()
        .take_while(|&index| accepted(index))
        .last()
        .unwrap_or(row);
    let last = (row + 1..ranges.len())
        .take_while(|&index| accepted(index))
        .last()
        .unwrap_or(row);
    Some(ranges[first].start..ranges[last].end)
}

/// Adjacent whole-line `//` or `#` comments around `offset`
pub fn line_comment_scope(document: &str, offset: usize) -> Option<Range<usize>> {
    line_run(document, offset, is_line_comment)
}

/// Non-empty lines around `offset`
///
/// Lines holding only blanks still count as part of the paragraph.
pub fn paragraph_scope(document: &str, offset: usize) -> Option<Range<usize>> {
    line_run(document, offset, |line| !is_empty_line(line))
}

/// The `/* ... */` comment enclosing `offset`, widened to whole lines
pub fn block_comment_scope(document: &str, offset: usize) -> Option<Range<usize>> {
    let bytes = document.as_bytes();
    let offset = offset.min(bytes.len());

    let open = memmem::rfind(&bytes[..(offset + 2).min(bytes.len())], b"/*")?;
    let close = open + 2 + memmem::find(&bytes[open + 2..], b"*/")? + 2;
    if offset > close {
        return None;
    }

    let start = memchr::memrchr(b'\n', &bytes[..open]).map_or(0, |i| i + 1);
    let end = memchr::memchr(b'\n', &bytes[close..]).map_or(bytes.len(), |i| close + i + 1);
    Some(start..end)
}

/// Kind of text at `offset` and the range it covers
///
/// Block comments take precedence over line comments, which take
/// precedence over plain paragraphs.
pub fn scope_at(document: &str, offset: usize) -> Option<(TextKind, Range<usize>)> {
    if let Some(range) = block_comment_scope(document, offset) {
        return Some((TextKind::BlockComment, range));
    }
    if let Some(range) = line_comment_scope(document, offset) {
        return Some((TextKind::LineComment, range));
    }
    paragraph_scope(document, offset).map(|range| (TextKind::Paragraph, range))
}

/// Kind of text at `offset`
pub fn detect_kind(document: &str, offset: usize) -> Option<TextKind> {
    scope_at(document, offset).map(|(kind, _)| kind)
}

/// Format the text around `offset`
///
/// Returns `Ok(None)` when there is nothing to format or the text is
/// already canonical. The document itself is never touched; apply the
/// returned edit to change it.
pub fn format_at(
    document: &str,
    offset: usize,
    config: &FormatConfig,
) -> Result<Option<TextEdit>, FormatError> {
    let Some((kind, range)) = scope_at(document, offset) else {
        log_debug!("Nothing to format at offset {}", offset);
        return Ok(None);
    };

    let original = &document[range.clone()];
    let formatted = kind.format(original, config)?;
    if formatted == original {
        return Ok(None);
    }

    log_debug!("Replacing {} at {:?}", kind, range);
    Ok(Some(TextEdit {
        range,
        new_text: formatted,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "int x;\n\n  // first\n  // second\nint y; // trailing\n\n/**\n * @brief b\n */\nvoid f();\n";

    #[test]
    fn test_line_comment_scope() {
        let offset = SOURCE.find("second").unwrap();
        let range = line_comment_scope(SOURCE, offset).unwrap();
        assert_eq!(&SOURCE[range], "  // first\n  // second\n");
    }

    #[test]
    fn test_trailing_comment_is_not_a_line_comment() {
        let offset = SOURCE.find("trailing").unwrap();
        assert!(line_comment_scope(SOURCE, offset).is_none());
    }

    #[test]
    fn test_block_comment_scope() {
        let offset = SOURCE.find("@brief").unwrap();
        let range = block_comment_scope(SOURCE, offset).unwrap();
        assert_eq!(&SOURCE[range], "/**\n * @brief b\n */\n");
    }

    #[test]
    fn test_block_comment_scope_on_opening() {
        let offset = SOURCE.find("/**").unwrap();
        assert!(block_comment_scope(SOURCE, offset).is_some());
    }

    #[test]
    fn test_after_block_comment() {
        let offset = SOURCE.find("void").unwrap();
        assert!(block_comment_scope(SOURCE, offset).is_none());
        assert_eq!(detect_kind(SOURCE, offset), Some(TextKind::Paragraph));
    }

    #[test]
    fn test_paragraph_scope_stops_at_empty_lines() {
        let text = "a\nb\n\nc\n";
        assert_eq!(paragraph_scope(text, 0), Some(0..4));
        assert_eq!(paragraph_scope(text, 4), None);
        assert_eq!(paragraph_scope(text, 5), Some(5..7));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(scope_at("", 0), None);
    }

    #[test]
    fn test_format_at_returns_edit() {
        let document = "x\n// one\n// two\ny\n";
        let edit = format_at(document, 3, &FormatConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(edit.range, 2..16);
        assert_eq!(edit.apply(document), "x\n// one two\ny\n");
    }

    #[test]
    fn test_format_at_canonical_is_none() {
        let document = "// done\n";
        assert_eq!(format_at(document, 0, &FormatConfig::default()), Ok(None));
    }
}
