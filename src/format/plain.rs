//! Plain prose paragraphs and bullet lists
//!
//! Lines are kept apart by blank lines. A line whose first word is a bullet
//! (`+`, `-` or `*` and a space) starts a list item; indented or not, any
//! other text line after it continues the item.

use super::align::{join_contents, TagLine};
use super::block::{compose_list_item, list_item, ListItem};
use super::compose::{contiguous, ComposeContext};
use super::config::FormatConfig;
use super::error::FormatError;
use super::primitives::*;
use crate::peg::parser_dsl::*;
use crate::peg::{parse_with, Grammar, NodeRef, ParseError};
use std::sync::LazyLock;

static GRAMMAR: LazyLock<Result<Grammar, ParseError>> = LazyLock::new(grammar);

/// Top-level element of plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<'a> {
    /// Prose lines; `prefix` holds each line's indentation
    Text(Vec<TagLine<'a>>),
    /// Bullet list
    ListItems(Vec<ListItem<'a>>),
    /// First line of a run of blank lines
    Separator(&'a str),
}

/// Build the plain text grammar
pub fn grammar() -> Result<Grammar, ParseError> {
    GrammarBuilder::new()
        .rule(
            "paragraphs",
            oneof![
                ref_("separator").label("separator"),
                ref_("list_items").label("list_items"),
                ref_("text").label("text"),
            ]
            .many(),
        )
        .rule("separator", re(BLANK_LINE).many1())
        .rule(
            "text_line",
            all![
                re(INDENTATION).label("prefix"),
                re(BULLET).not_ahead(),
                re(r"\S.*").label("contents"),
                str("\n"),
            ]
            .label("line"),
        )
        .rule("text", ref_("text_line").many1())
        .rule(
            "list_items",
            oneof![
                ref_("breaking_list_item").label("breaking_list_item"),
                ref_("list_item").label("list_item"),
            ]
            .many1(),
        )
        .rule(
            "breaking_list_item",
            all![list_start(r".*<br>"), ref_("text_line").many()],
        )
        .rule(
            "list_item",
            all![list_start(REST_OF_LINE), ref_("text_line").many()],
        )
        .build()
}

fn list_start(contents: &'static str) -> Dynamic {
    dynamic(
        all![
            re(INDENTATION).label("indentation"),
            re(BULLET).label("start"),
            re(contents).label("contents"),
            str("\n"),
        ]
        .label("start_line"),
    )
}

fn extract<'i>(root: NodeRef<'_, 'i>) -> Vec<Item<'i>> {
    root.labeled()
        .into_iter()
        .filter_map(|node| match node.label() {
            Some("separator") => Some(Item::Separator(
                node.text().split_inclusive('\n').next().unwrap_or_default(),
            )),
            Some("list_items") => Some(Item::ListItems(
                node.labeled().into_iter().map(list_item).collect(),
            )),
            Some("text") => Some(Item::Text(
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

/// Parse plain text ending in a line break
pub fn parse(text: &str) -> Result<Vec<Item<'_>>, FormatError> {
    let grammar = GRAMMAR
        .as_ref()
        .map_err(|e| FormatError::Engine(e.clone()))?;
    let items = parse_with(grammar, text, extract).map_err(|e| {
        log_debug!("Paragraph did not parse: {}", e);
        FormatError::from_parse(e, text)
    })?;
    log_debug!("Parsed plain text with {} items", items.len());
    Ok(items)
}

/// Render parsed items
pub fn compose(items: &[Item<'_>], config: &FormatConfig) -> String {
    let ctx = ComposeContext::new(config).with_sticky(opens_bullet);
    items
        .iter()
        .map(|item| match item {
            Item::Separator(line) => line.to_string(),
            Item::Text(lines) => {
                let indentation = lines.first().map_or("", |line| line.prefix);
                let text = join_contents(lines.iter().map(|line| line.contents));
                contiguous(indentation, "", &text, &ctx)
            }
            Item::ListItems(list) => list
                .iter()
                .map(|entry| compose_list_item(entry, &ctx))
                .collect(),
        })
        .collect()
}

/// Parse and compose plain text ending in a line break
pub fn format(text: &str, config: &FormatConfig) -> Result<String, FormatError> {
    let items = parse(text)?;
    Ok(compose(&items, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_rewrap() {
        let config = FormatConfig::new(16, 4);
        let text = "one two three\nfour five six seven\n";
        assert_eq!(
            format(text, &config).unwrap(),
            "one two three\nfour five six\nseven\n"
        );
    }

    #[test]
    fn test_blank_lines_collapse() {
        let text = "first\n\n  \n\nsecond\n";
        assert_eq!(
            format(text, &FormatConfig::default()).unwrap(),
            "first\n\nsecond\n"
        );
    }

    #[test]
    fn test_indentation_kept() {
        let text = "\tindented words\n\there\n";
        assert_eq!(
            format(text, &FormatConfig::default()).unwrap(),
            "\tindented words here\n"
        );
    }

    #[test]
    fn test_bullets() {
        let config = FormatConfig::new(20, 4);
        let text = "- apples and pears and plums\n- figs\n";
        assert_eq!(
            format(text, &config).unwrap(),
            "- apples and pears\n\tand plums\n- figs\n"
        );
    }

    #[test]
    fn test_bullet_continuation_joined() {
        let items = parse("* first\n  more\ntext\n").unwrap();
        let Item::ListItems(list) = &items[0] else {
            panic!("expected a list: {:?}", items);
        };
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].contents, vec!["first", "more", "text"]);
    }

    #[test]
    fn test_breaking_item() {
        let config = FormatConfig::new(20, 4);
        let text = "- heading<br>\n  body text that wraps around\n";
        assert_eq!(
            format(text, &config).unwrap(),
            "- heading<br>\n\tbody text that\n\twraps around\n"
        );
    }

    #[test]
    fn test_dash_word_is_text() {
        let items = parse("-5 degrees\n").unwrap();
        assert!(matches!(items[0], Item::Text(_)));
    }
}
