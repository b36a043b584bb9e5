//! Runs of single-line comments
//!
//! Every line starts with optional indentation, then `//` or `#` (repeated
//! any number of times), then one space or nothing. Lines holding only the
//! prefix separate paragraphs.

use super::align::{join_contents, TagLine};
use super::compose::{contiguous, ComposeContext};
use super::config::FormatConfig;
use super::error::FormatError;
use super::primitives::*;
use crate::peg::parser_dsl::*;
use crate::peg::{parse_with, regex_cache, Grammar, NodeRef, ParseError};
use std::sync::LazyLock;

static GRAMMAR: LazyLock<Result<Grammar, ParseError>> = LazyLock::new(grammar);

/// Top-level element of a line-comment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<'a> {
    /// Consecutive comment lines with text
    Paragraph(Vec<TagLine<'a>>),
    /// First line of a run of prefix-only lines
    Separator(&'a str),
}

/// Build the line comment grammar
pub fn grammar() -> Result<Grammar, ParseError> {
    GrammarBuilder::new()
        .rule(
            "line_comment",
            oneof![
                ref_("separator").label("separator"),
                ref_("text").label("text"),
            ]
            .many(),
        )
        .rule(
            "prefix",
            all![
                re(INDENTATION),
                re(r"//+!?|#+").label("punctuation"),
                oneof![str(" "), re(r"\w").lookahead(), at_line_end()],
            ],
        )
        .rule(
            "separator",
            all![ref_("prefix"), re(INDENTATION), str("\n")].many1(),
        )
        .rule(
            "line",
            all![
                ref_("prefix").label("prefix"),
                re(r"[\t ]*\S.*").label("contents"),
                str("\n"),
            ]
            .label("line"),
        )
        .rule("text", ref_("line").many1())
        .build()
}

/// Punctuation characters that a wrapped word could fuse into the prefix
fn extends_punctuation(word: &str) -> bool {
    word.starts_with(['/', '#'])
}

/// Behind a prefix with no blank, a line only parses when its text starts
/// with a word character
fn needs_blank(word: &str) -> bool {
    !regex_cache::get_or_compile(r"\w").is_ok_and(|word_char| word_char.is_match(word))
}

fn extract<'i>(root: NodeRef<'_, 'i>) -> Vec<Item<'i>> {
    root.labeled()
        .into_iter()
        .filter_map(|node| match node.label() {
            Some("separator") => Some(Item::Separator(
                node.text().split_inclusive('\n').next().unwrap_or_default(),
            )),
            Some("text") => Some(Item::Paragraph(
                node.labeled()
                    .into_iter()
                    .map(|line| TagLine {
                        prefix: line.attr_text("prefix").unwrap_or_default(),
                        parameters: "",
                        contents: line.attr_text("contents").unwrap_or_default(),
                    })
                    .collect(),
            )),
            _ => None,
        })
        .collect()
}

/// Parse a run of line comments ending in a line break
pub fn parse(text: &str) -> Result<Vec<Item<'_>>, FormatError> {
    let grammar = GRAMMAR
        .as_ref()
        .map_err(|e| FormatError::Engine(e.clone()))?;
    let items = parse_with(grammar, text, extract).map_err(|e| {
        log_debug!("Line comment did not parse: {}", e);
        FormatError::from_parse(e, text)
    })?;
    log_debug!("Parsed line comment with {} items", items.len());
    Ok(items)
}

/// Render parsed items
///
/// Each paragraph reuses the prefix of its first line on every line.
pub fn compose(items: &[Item<'_>], config: &FormatConfig) -> String {
    let ctx = ComposeContext::new(config);
    items
        .iter()
        .map(|item| match item {
            Item::Separator(line) => line.to_string(),
            Item::Paragraph(lines) => {
                let prefix = lines.first().map_or("", |line| line.prefix);
                let sticky: fn(&str) -> bool = if prefix.ends_with([' ', '\t']) {
                    extends_punctuation
                } else {
                    needs_blank
                };
                let text = join_contents(lines.iter().map(|line| line.contents));
                contiguous(prefix, "", &text, &ctx.with_sticky(sticky))
            }
        })
        .collect()
}

/// Parse and compose a line-comment run ending in a line break
pub fn format(text: &str, config: &FormatConfig) -> Result<String, FormatError> {
    let items = parse(text)?;
    Ok(compose(&items, config))
}
