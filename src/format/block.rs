//! Documentation block comments
//!
//! ```text
//! /**
//!  * @brief Summary wrapped under its header.
//!  *
//!  * @param  x     Descriptions aligned across the run.
//!  * @param  other
//!  *
//!  * @code{.cpp}
//!  *	verbatim();
//!  * @endcode
//!  */
//! ```
//!
//! Every line between the start and end markers carries a ` *` prefix.
//! Continuation lines of a construct may never look like the start of
//! another construct; the grammar enforces that with a negative lookahead
//! over every tag marker, and the wrapper keeps such words off line starts.

use super::align::{
    compute_alignment, join_contents, tidy_run, ParameterEntry, RunEntry, TagLine,
};
use super::compose::{bullet, breaking, contiguous, parameter_header, ComposeContext};
use super::config::{FormatConfig, UnnamedParams};
use super::construct::{ConstructKind, Strategy};
use super::error::FormatError;
use super::layout::dedent;
use super::primitives::*;
use crate::peg::parser_dsl::*;
use crate::peg::{parse_with, Grammar, NodeRef, ParseError};
use std::sync::LazyLock;

static GRAMMAR: LazyLock<Result<Grammar, ParseError>> = LazyLock::new(grammar);

/// A line of a fenced code sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLine<'a> {
    /// Text after the prefix and one blank
    Text(&'a str),
    /// Prefix only
    Blank,
}

/// A bullet list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem<'a> {
    /// Item ends its first line with `<br>` and keeps that line as written
    pub breaking: bool,
    /// First line as written, without its line break
    pub head: &'a str,
    /// Comment prefix before the item
    pub prefix: &'a str,
    /// Blanks between prefix and bullet
    pub indentation: &'a str,
    /// Bullet and its space
    pub start: &'a str,
    /// Text of the first line, then of each continuation line
    pub contents: Vec<&'a str>,
}

/// A paragraph of a block comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paragraph<'a> {
    /// Brief, returns, untagged details
    Contiguous {
        /// Construct kind
        kind: ConstructKind,
        /// Header line, then continuation lines
        lines: Vec<TagLine<'a>>,
    },
    /// A run of parameter entries
    Parameters(Vec<RunEntry<'a>>),
    /// Note, warning, throws
    Breaking {
        /// Construct kind
        kind: ConstructKind,
        /// Header line, then continuation lines
        lines: Vec<TagLine<'a>>,
    },
    /// `@code` ... `@endcode`
    Code {
        /// The `@code` line; `parameters` holds the language hint
        header: TagLine<'a>,
        /// Lines between the fences
        body: Vec<CodeLine<'a>>,
        /// The `@endcode` line as written
        end: &'a str,
    },
    /// See, related, related-also
    Reference {
        /// Construct kind
        kind: ConstructKind,
        /// The single line
        line: TagLine<'a>,
    },
    /// Bullet list
    ListItems(Vec<ListItem<'a>>),
    /// Table or reference link
    Verbatim {
        /// Construct kind
        kind: ConstructKind,
        /// Text as written
        text: &'a str,
    },
}

impl Paragraph<'_> {
    /// Construct kind of this paragraph
    pub fn kind(&self) -> ConstructKind {
        match self {
            Paragraph::Contiguous { kind, .. }
            | Paragraph::Breaking { kind, .. }
            | Paragraph::Reference { kind, .. }
            | Paragraph::Verbatim { kind, .. } => *kind,
            Paragraph::Parameters(_) => ConstructKind::Param,
            Paragraph::Code { .. } => ConstructKind::Code,
            Paragraph::ListItems(_) => ConstructKind::ListItems,
        }
    }
}

/// Top-level element of a block comment body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<'a> {
    /// A paragraph
    Paragraph(Paragraph<'a>),
    /// First line of a run of blank comment lines
    Separator(&'a str),
}

/// A parsed block comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockComment<'a> {
    /// Opening line as written
    pub start: &'a str,
    /// Body in input order
    pub items: Vec<Item<'a>>,
    /// Closing line as written
    pub end: &'a str,
}

// ============================================================================
// Grammar
// ============================================================================

/// Tag marker that is not the beginning of a longer word
fn command(marker: &'static str) -> Dynamic {
    dynamic(str(marker).then(re(r"\w").not_ahead()))
}

fn header_line(command: Dynamic, parameters: Option<Dynamic>) -> Dynamic {
    let mut parts = vec![
        dynamic(ref_("prefix").label("prefix")),
        command,
        dynamic(re(INDENTATION)),
    ];
    if let Some(parameters) = parameters {
        parts.push(dynamic(parameters.label("parameters")));
        parts.push(dynamic(re(INDENTATION)));
    }
    parts.push(dynamic(re(REST_OF_LINE).label("contents")));
    parts.push(dynamic(str("\n")));
    dynamic(Sequence(parts).label("line"))
}

/// Header line followed by any number of continuation lines
fn tagged(command: Dynamic, parameters: Option<Dynamic>) -> Dynamic {
    dynamic(header_line(command, parameters).then(ref_("command_line").many()))
}

fn list_start(contents: &'static str) -> Dynamic {
    dynamic(
        all![
            ref_("prefix_fixed").label("prefix"),
            re(INDENTATION).label("indentation"),
            re(BULLET).label("start"),
            re(contents).label("contents"),
            str("\n"),
        ]
        .label("start_line"),
    )
}

/// Build the block comment grammar
pub fn grammar() -> Result<Grammar, ParseError> {
    GrammarBuilder::new()
        .rule(
            "block_comment",
            all![
                ref_("start").label("start"),
                oneof![
                    ref_("separator").label("separator"),
                    ref_("brief").label("brief"),
                    ref_("parameters").label("parameters"),
                    ref_("returns").label("returns"),
                    ref_("code").label("code"),
                    ref_("note").label("note"),
                    ref_("warning").label("warning"),
                    ref_("throws").label("throws"),
                    ref_("see").label("see"),
                    ref_("related_also").label("related_also"),
                    ref_("related").label("related"),
                    ref_("table").label("table"),
                    ref_("list_items").label("list_items"),
                    ref_("reference_link").label("reference_link"),
                    ref_("details").label("details"),
                ]
                .many(),
                ref_("end").label("end"),
            ],
        )
        .rule(
            "start",
            seq([re(r"[\t ]*/\*\*?"), re(INDENTATION), re(r"\n")]),
        )
        .rule("end", all![re(r"[\t ]*\*\*?/"), re(INDENTATION), line_end()])
        .rule(
            "prefix",
            all![re(r"[\t ]*\*"), oneof![re(BLANKS), at_line_end()]],
        )
        .rule(
            "prefix_fixed",
            all![re(r"[\t ]*\*"), oneof![re(r"[\t ]"), at_line_end()]],
        )
        .rule("separator_line", ref_("prefix").then(str("\n")))
        .rule("separator", ref_("separator_line").many1())
        .rule(
            "command_line",
            all![
                ref_("prefix").label("prefix"),
                re(TAG_START).not_ahead(),
                re(NON_EMPTY_REST).label("contents"),
                str("\n"),
            ]
            .label("line"),
        )
        .rule("brief", tagged(command("@brief"), None))
        .rule(
            "parameters",
            all![
                ref_("parameter").many1(),
                all![
                    ref_("separator").label("separator"),
                    ref_("parameter").many1(),
                ]
                .many(),
            ],
        )
        .rule(
            "parameter",
            choice([
                ref_("tparam").label("tparam"),
                ref_("param").label("param"),
            ]),
        )
        .rule(
            "param",
            tagged(command("@param"), Some(dynamic(re(EXPRESSION)))),
        )
        .rule(
            "tparam",
            tagged(command("@tparam"), Some(dynamic(re(EXPRESSION)))),
        )
        .rule(
            "returns",
            tagged(
                dynamic(oneof![command("@returns"), command("@return")]),
                None,
            ),
        )
        .rule(
            "code",
            all![
                all![
                    ref_("prefix").label("prefix"),
                    command("@code"),
                    re(INDENTATION),
                    re(r"\{.+?\}").optional().label("parameters"),
                    re(INDENTATION),
                    str("\n"),
                ]
                .label("line"),
                oneof![
                    ref_("code_line"),
                    ref_("separator_line").label("blank"),
                ]
                .many(),
                all![
                    ref_("prefix").label("prefix"),
                    str("@endcode"),
                    re(INDENTATION),
                    line_end(),
                ]
                .label("end"),
            ],
        )
        .rule(
            "code_line",
            all![
                ref_("prefix_fixed").label("prefix"),
                re(r"[\t ]*@endcode").not_ahead(),
                re(NON_EMPTY_REST).label("contents"),
                str("\n"),
            ]
            .label("code_line"),
        )
        .rule("note", tagged(command("@note"), None))
        .rule("warning", tagged(command("@warning"), None))
        .rule(
            "throws",
            tagged(command("@throws"), Some(dynamic(re(EXPRESSION)))),
        )
        .rule("see", header_line(command("@see"), None))
        .rule("related_also", header_line(command("@relatedalso"), None))
        .rule("related", header_line(command("@related"), None))
        .rule(
            "table",
            all![
                ref_("prefix").label("prefix"),
                str("|"),
                re(REST_OF_LINE),
                str("\n"),
            ]
            .label("line")
            .many1(),
        )
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
            all![list_start(r".*<br>"), ref_("command_line").many()],
        )
        .rule(
            "list_item",
            all![list_start(REST_OF_LINE), ref_("command_line").many()],
        )
        .rule(
            "reference_link",
            all![
                ref_("prefix").label("prefix"),
                re(r"\[.+\]: .*"),
                str("\n"),
            ]
            .label("line"),
        )
        .rule("details", ref_("command_line").many1())
        .build()
}

// ============================================================================
// Tree extraction
// ============================================================================

fn first_line(text: &str) -> &str {
    text.split_inclusive('\n').next().unwrap_or(text)
}

fn tag_line<'i>(line: NodeRef<'_, 'i>) -> TagLine<'i> {
    TagLine {
        prefix: line.attr_text("prefix").unwrap_or_default(),
        parameters: line.attr_text("parameters").unwrap_or_default(),
        contents: line.attr_text("contents").unwrap_or_default(),
    }
}

fn lines_of<'i>(node: NodeRef<'_, 'i>) -> Vec<TagLine<'i>> {
    node.labeled()
        .into_iter()
        .filter(|child| child.label() == Some("line"))
        .map(tag_line)
        .collect()
}

fn run_entries<'i>(node: NodeRef<'_, 'i>) -> Vec<RunEntry<'i>> {
    node.labeled()
        .into_iter()
        .filter_map(|child| match child.label() {
            Some("separator") => Some(RunEntry::Separator(first_line(child.text()))),
            Some(label) => ConstructKind::from_label(label)
                .filter(|kind| kind.is_parameter())
                .map(|kind| {
                    RunEntry::Parameter(ParameterEntry {
                        kind,
                        lines: lines_of(child),
                    })
                }),
            None => None,
        })
        .collect()
}

fn code<'i>(node: NodeRef<'_, 'i>) -> Paragraph<'i> {
    let mut header = TagLine::default();
    let mut body = Vec::new();
    let mut end = "";
    for part in node.labeled() {
        match part.label() {
            Some("line") => header = tag_line(part),
            Some("code_line") => {
                body.push(CodeLine::Text(part.attr_text("contents").unwrap_or_default()))
            }
            Some("blank") => body.push(CodeLine::Blank),
            Some("end") => end = part.text(),
            _ => {}
        }
    }
    Paragraph::Code { header, body, end }
}

pub(super) fn list_item<'i>(node: NodeRef<'_, 'i>) -> ListItem<'i> {
    let mut item = ListItem {
        breaking: node.label() == Some("breaking_list_item"),
        head: "",
        prefix: "",
        indentation: "",
        start: "",
        contents: Vec::new(),
    };
    for line in node.labeled() {
        if line.label() == Some("start_line") {
            item.head = line.text().trim_end_matches('\n');
            item.prefix = line.attr_text("prefix").unwrap_or_default();
            item.indentation = line.attr_text("indentation").unwrap_or_default();
            item.start = line.attr_text("start").unwrap_or_default();
        }
        item.contents
            .push(line.attr_text("contents").unwrap_or_default());
    }
    item
}

fn paragraph<'i>(kind: ConstructKind, node: NodeRef<'_, 'i>) -> Paragraph<'i> {
    match kind.strategy() {
        Strategy::Fenced => code(node),
        Strategy::Bullets => {
            Paragraph::ListItems(node.labeled().into_iter().map(list_item).collect())
        }
        Strategy::Verbatim => Paragraph::Verbatim {
            kind,
            text: node.text(),
        },
        Strategy::Breaking => Paragraph::Breaking {
            kind,
            lines: lines_of(node),
        },
        Strategy::Reference => Paragraph::Reference {
            kind,
            line: lines_of(node).first().copied().unwrap_or_default(),
        },
        Strategy::Contiguous => Paragraph::Contiguous {
            kind,
            lines: lines_of(node),
        },
    }
}

fn extract<'i>(root: NodeRef<'_, 'i>) -> BlockComment<'i> {
    let mut comment = BlockComment {
        start: "",
        items: Vec::new(),
        end: "",
    };
    for node in root.labeled() {
        match node.label() {
            Some("start") => comment.start = node.text(),
            Some("end") => comment.end = node.text(),
            Some("separator") => comment
                .items
                .push(Item::Separator(first_line(node.text()))),
            Some("parameters") => comment
                .items
                .push(Item::Paragraph(Paragraph::Parameters(run_entries(node)))),
            Some(label) => {
                if let Some(kind) = ConstructKind::from_label(label) {
                    comment.items.push(Item::Paragraph(paragraph(kind, node)));
                }
            }
            None => {}
        }
    }
    comment
}

/// Parse a block comment whose last line ends with a line break
pub fn parse(text: &str) -> Result<BlockComment<'_>, FormatError> {
    let grammar = GRAMMAR
        .as_ref()
        .map_err(|e| FormatError::Engine(e.clone()))?;
    let comment = parse_with(grammar, text, extract).map_err(|e| {
        log_debug!("Block comment did not parse: {}", e);
        FormatError::from_parse(e, text)
    })?;
    log_debug!("Parsed block comment with {} items", comment.items.len());
    Ok(comment)
}

// ============================================================================
// Composition
// ============================================================================

/// Apply the placeholder policy to every parameter run
///
/// Separators left next to each other collapse into the first one.
pub fn normalize<'a>(items: Vec<Item<'a>>, policy: UnnamedParams) -> Vec<Item<'a>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Item::Paragraph(Paragraph::Parameters(entries)) => {
                let run = tidy_run(entries, policy);
                out.extend(run.leading.map(Item::Separator));
                if !run.entries.is_empty() {
                    out.push(Item::Paragraph(Paragraph::Parameters(run.entries)));
                }
                out.extend(run.trailing.map(Item::Separator));
            }
            other => out.push(other),
        }
    }
    out.dedup_by(|current, previous| {
        matches!((current, previous), (Item::Separator(_), Item::Separator(_)))
    });
    out
}

pub(super) fn compose_list_item(item: &ListItem<'_>, ctx: &ComposeContext<'_>) -> String {
    let lead = format!("{}{}", item.prefix, item.indentation);
    if item.breaking {
        let body = join_contents(item.contents.iter().skip(1).copied());
        breaking(item.head, &format!("{}\t", lead), &body, ctx)
    } else {
        let body = join_contents(item.contents.iter().copied());
        bullet(&lead, item.start, &body, ctx)
    }
}

fn compose_code(
    header: &TagLine<'_>,
    body: &[CodeLine<'_>],
    end: &str,
) -> String {
    let mut out = format!("{}@code{}\n", header.prefix, header.parameters);
    let lines: Vec<&str> = body
        .iter()
        .map(|line| match line {
            CodeLine::Text(text) => *text,
            CodeLine::Blank => "",
        })
        .collect();
    for line in dedent(&lines) {
        let rendered = format!("{}\t{}", header.prefix, line);
        out.push_str(rendered.trim_end());
        out.push('\n');
    }
    out.push_str(end);
    out
}

/// Render one paragraph
pub fn compose_paragraph(paragraph: &Paragraph<'_>, ctx: &ComposeContext<'_>) -> String {
    match paragraph {
        Paragraph::Contiguous { kind, lines } => {
            let prefix = lines.first().map_or("", |line| line.prefix);
            let header = match kind.marker() {
                "" => String::new(),
                marker => format!("{} ", marker),
            };
            let text = join_contents(lines.iter().map(|line| line.contents));
            contiguous(prefix, &header, &text, ctx)
        }
        Paragraph::Parameters(entries) => {
            let alignment = compute_alignment(entries.iter().filter_map(|entry| match entry {
                RunEntry::Parameter(parameter) => Some(parameter),
                RunEntry::Separator(_) => None,
            }));
            let ctx = ctx.with_alignment(alignment);
            entries
                .iter()
                .map(|entry| match entry {
                    RunEntry::Parameter(parameter) => {
                        let header =
                            parameter_header(parameter.kind.marker(), parameter.name(), alignment);
                        contiguous(parameter.prefix(), &header, &parameter.text(), &ctx)
                    }
                    RunEntry::Separator(line) => line.to_string(),
                })
                .collect()
        }
        Paragraph::Breaking { kind, lines } => {
            let first = lines.first().copied().unwrap_or_default();
            let mut head = format!("{}{}", first.prefix, kind.marker());
            if !first.parameters.is_empty() {
                head.push(' ');
                head.push_str(first.parameters);
            }
            // A body line may not open another construct, so such words
            // stay behind the marker
            let text = join_contents(lines.iter().map(|line| line.contents));
            let (lead, body) = ctx.split_sticky_lead(&text);
            for word in lead {
                head.push(' ');
                head.push_str(word);
            }
            breaking(&head, &format!("{}\t", first.prefix), &body, ctx)
        }
        Paragraph::Code { header, body, end } => compose_code(header, body, end),
        Paragraph::Reference { kind, line } => {
            let mut out = format!("{}{}", line.prefix, kind.marker());
            let contents = line.contents.trim();
            if !contents.is_empty() {
                out.push(' ');
                out.push_str(contents);
            }
            out.push('\n');
            out
        }
        Paragraph::ListItems(items) => items
            .iter()
            .map(|item| compose_list_item(item, ctx))
            .collect(),
        Paragraph::Verbatim { text, .. } => text.to_string(),
    }
}

/// Render a whole comment
pub fn compose(comment: &BlockComment<'_>, config: &FormatConfig) -> String {
    let ctx = ComposeContext::new(config).with_sticky(opens_block_construct);
    let mut out = String::from(comment.start);
    for item in &comment.items {
        match item {
            Item::Separator(line) => out.push_str(line),
            Item::Paragraph(paragraph) => out.push_str(&compose_paragraph(paragraph, &ctx)),
        }
    }
    out.push_str(comment.end);
    out
}

/// Parse, normalize and compose a block comment ending in a line break
pub fn format(text: &str, config: &FormatConfig) -> Result<String, FormatError> {
    let mut comment = parse(text)?;
    comment.items = normalize(comment.items, config.unnamed_params);
    Ok(compose(&comment, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(comment: &BlockComment<'_>) -> Vec<Option<ConstructKind>> {
        comment
            .items
            .iter()
            .map(|item| match item {
                Item::Paragraph(paragraph) => Some(paragraph.kind()),
                Item::Separator(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_grammar_builds() {
        let grammar = grammar().unwrap();
        assert!(grammar.rule("command_line").is_some());
        assert_eq!(grammar.rule_name(grammar.root), Some("block_comment"));
    }

    #[test]
    fn test_parse_constructs_in_order() {
        let text = "/**\n * @brief Summary.\n *\n * @param x first\n * @returns nothing\n *\n * Details here.\n */\n";
        let comment = parse(text).unwrap();
        assert_eq!(comment.start, "/**\n");
        assert_eq!(comment.end, " */\n");
        assert_eq!(
            kinds(&comment),
            vec![
                Some(ConstructKind::Brief),
                None,
                Some(ConstructKind::Param),
                Some(ConstructKind::Returns),
                None,
                Some(ConstructKind::Details),
            ]
        );
    }

    #[test]
    fn test_untagged_line_continues_previous_construct() {
        let comment = parse("/**\n * @returns nothing\n * at all\n */\n").unwrap();
        let Item::Paragraph(Paragraph::Contiguous { lines, .. }) = &comment.items[0] else {
            panic!("expected returns");
        };
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].contents, "at all");
    }

    #[test]
    fn test_parse_header_fields() {
        let comment = parse("/**\n * @param  value  the value\n */\n").unwrap();
        let Item::Paragraph(Paragraph::Parameters(entries)) = &comment.items[0] else {
            panic!("expected parameters: {:?}", comment.items);
        };
        let RunEntry::Parameter(entry) = &entries[0] else {
            panic!("expected a parameter");
        };
        assert_eq!(entry.prefix(), " * ");
        assert_eq!(entry.name(), "value");
        assert_eq!(entry.text(), "the value");
    }

    #[test]
    fn test_parameter_run_spans_separators() {
        let text = "/**\n * @param a x\n *\n * @tparam T y\n * @returns z\n */\n";
        let comment = parse(text).unwrap();
        assert_eq!(comment.items.len(), 2);
        let Item::Paragraph(Paragraph::Parameters(entries)) = &comment.items[0] else {
            panic!("expected parameters");
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1], RunEntry::Separator(" *\n"));
    }

    #[test]
    fn test_trailing_separator_is_not_part_of_run() {
        let text = "/**\n * @param a x\n *\n * Details.\n */\n";
        let comment = parse(text).unwrap();
        assert_eq!(
            kinds(&comment),
            vec![Some(ConstructKind::Param), None, Some(ConstructKind::Details)]
        );
    }

    #[test]
    fn test_return_and_returns() {
        for marker in ["@return", "@returns"] {
            let text = format!("/**\n * {} value\n */\n", marker);
            let comment = parse(&text).unwrap();
            assert_eq!(kinds(&comment), vec![Some(ConstructKind::Returns)]);
        }
    }

    #[test]
    fn test_marker_must_end_at_word_boundary() {
        let comment = parse("/**\n * @briefly said\n */\n").unwrap();
        assert_eq!(kinds(&comment), vec![Some(ConstructKind::Details)]);
    }

    #[test]
    fn test_related_also_before_related() {
        let comment = parse("/**\n * @relatedalso Foo\n * @related Bar\n */\n").unwrap();
        assert_eq!(
            kinds(&comment),
            vec![
                Some(ConstructKind::RelatedAlso),
                Some(ConstructKind::Related)
            ]
        );
    }

    #[test]
    fn test_code_block_lines() {
        let text = "/**\n * @code{.py}\n *     a\n *\n *         b\n * @endcode\n */\n";
        let comment = parse(text).unwrap();
        let Item::Paragraph(Paragraph::Code { header, body, end }) = &comment.items[0] else {
            panic!("expected code");
        };
        assert_eq!(header.parameters, "{.py}");
        assert_eq!(
            body,
            &vec![
                CodeLine::Text("    a"),
                CodeLine::Blank,
                CodeLine::Text("        b")
            ]
        );
        assert_eq!(*end, " * @endcode\n");
    }

    #[test]
    fn test_list_items() {
        let text = "/**\n * - first\n *   more\n * - second<br>\n *   body\n */\n";
        let comment = parse(text).unwrap();
        let Item::Paragraph(Paragraph::ListItems(items)) = &comment.items[0] else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
        assert!(!items[0].breaking);
        assert_eq!(items[0].contents, vec!["first", "more"]);
        assert!(items[1].breaking);
        assert_eq!(items[1].head, " * - second<br>");
    }

    #[test]
    fn test_table_and_reference_link_are_verbatim() {
        let text = "/**\n * | a | b |\n * |---|---|\n *\n * [doc]: https://example.com\n */\n";
        let comment = parse(text).unwrap();
        assert_eq!(
            kinds(&comment),
            vec![
                Some(ConstructKind::Table),
                None,
                Some(ConstructKind::ReferenceLink)
            ]
        );
        assert_eq!(format(text, &FormatConfig::default()).unwrap(), text);
    }

    #[test]
    fn test_empty_body() {
        let comment = parse("/**\n */\n").unwrap();
        assert!(comment.items.is_empty());
    }

    #[test]
    fn test_unterminated_code_fails() {
        let err = parse("/**\n * @code\n * x\n */\n").unwrap_err();
        assert!(matches!(err, FormatError::Unmatched { .. }));
    }

    #[test]
    fn test_normalize_merges_separators() {
        let text = "/**\n * @brief b\n *\n * @param <unnamed> gone\n *\n * Details.\n */\n";
        let comment = parse(text).unwrap();
        let items = normalize(comment.items, UnnamedParams::Drop);
        assert_eq!(items.len(), 3);
        assert_eq!(items[1], Item::Separator(" *\n"));
    }

    #[test]
    fn test_compose_breaking_note() {
        let config = FormatConfig::new(30, 4);
        let text = "/**\n * @note Keep the lock held while calling this.\n */\n";
        assert_eq!(
            format(text, &config).unwrap(),
            "/**\n * @note\n * \tKeep the lock held while\n * \tcalling this.\n */\n"
        );
    }

    #[test]
    fn test_breaking_body_never_opens_a_construct() {
        let config = FormatConfig::new(40, 4);
        let cases = [
            (
                "/**\n * @throws Error - when the file cannot be opened for reading by the process\n */\n",
                "/**\n * @throws Error -\n * \twhen the file cannot be opened for\n * \treading by the process\n */\n",
            ),
            (
                "/**\n * @note * ptr must stay valid until the callback returns\n */\n",
                "/**\n * @note *\n * \tptr must stay valid until the\n * \tcallback returns\n */\n",
            ),
            (
                "/**\n * @warning @brief is not allowed here\n */\n",
                "/**\n * @warning @brief\n * \tis not allowed here\n */\n",
            ),
        ];
        for (text, expected) in cases {
            let once = format(text, &config).unwrap();
            assert_eq!(once, expected);
            assert_eq!(format(&once, &config).unwrap(), once);
        }
    }

    #[test]
    fn test_breaking_body_of_sticky_words_only() {
        let text = "/**\n * @note - |\n */\n";
        assert_eq!(format(text, &FormatConfig::default()).unwrap(), text);
    }

    #[test]
    fn test_compose_reference_collapses_gap() {
        let text = "/**\n * @see     other_function  \n */\n";
        assert_eq!(
            format(text, &FormatConfig::default()).unwrap(),
            "/**\n * @see other_function\n */\n"
        );
    }
}
