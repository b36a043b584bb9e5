//! Composition strategies shared by all formatters
//!
//! Each function renders one paragraph as complete lines, every line ending
//! in `\n`. Widths budget for everything written before the text: the line
//! prefix, the header, and any indentation.

use super::config::FormatConfig;
use super::layout::{indentation_between, visual_width, Wrapper};
use unicode_width::UnicodeWidthStr;

/// Column positions shared by a run of parameter entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alignment {
    /// Header width up to where parameter names start
    pub parameter_column: usize,
    /// Header width up to where descriptions start
    pub content_column: usize,
}

/// Everything a paragraph needs besides its own text
#[derive(Debug, Clone, Copy)]
pub struct ComposeContext<'c> {
    /// Formatting settings
    pub config: &'c FormatConfig,
    /// Alignment of the parameter run the paragraph belongs to
    pub alignment: Alignment,
    /// Words that must not start a wrapped line
    pub sticky: Option<fn(&str) -> bool>,
}

impl<'c> ComposeContext<'c> {
    /// Context with no alignment and no sticky words
    pub fn new(config: &'c FormatConfig) -> Self {
        Self {
            config,
            alignment: Alignment::default(),
            sticky: None,
        }
    }

    /// Use `alignment` for parameter headers
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Keep words accepted by `predicate` off line starts
    pub fn with_sticky(mut self, predicate: fn(&str) -> bool) -> Self {
        self.sticky = Some(predicate);
        self
    }

    /// Leading words of `text` that may not start a line, and the rest
    ///
    /// The wrapper glues later sticky words to the word before them; the
    /// first word has nothing to glue to, so a caller that would start a
    /// line with it has to place these words elsewhere.
    pub fn split_sticky_lead<'t>(&self, text: &'t str) -> (Vec<&'t str>, String) {
        let mut words = text.split_whitespace().peekable();
        let mut lead = Vec::new();
        while let Some(word) =
            words.next_if(|word| self.sticky.is_some_and(|sticky| sticky(word)))
        {
            lead.push(word);
        }
        (lead, words.collect::<Vec<_>>().join(" "))
    }

    fn wrapper(&self, width: usize) -> Wrapper {
        let wrapper = Wrapper::new(width);
        match self.sticky {
            Some(sticky) => wrapper.sticky(sticky),
            None => wrapper,
        }
    }
}

/// Header `marker name` padded to the alignment columns
///
/// Trailing padding is kept; it is trimmed when nothing follows.
pub fn parameter_header(marker: &str, name: &str, alignment: Alignment) -> String {
    let mut header = format!("{} ", marker);
    pad_to(&mut header, alignment.parameter_column);
    header.push_str(name);
    header.push(' ');
    pad_to(&mut header, alignment.content_column);
    header
}

fn pad_to(text: &mut String, column: usize) {
    let width = UnicodeWidthStr::width(text.as_str());
    if width < column {
        text.push_str(&" ".repeat(column - width));
    }
}

/// Header on the first line, text wrapped and aligned under the header's end
///
/// An empty text leaves just the header, without trailing blanks.
pub fn contiguous(prefix: &str, header: &str, text: &str, ctx: &ComposeContext<'_>) -> String {
    let tab_size = ctx.config.tab_size;
    let prefix_len = visual_width(prefix, tab_size);
    let indentation_len = prefix_len + UnicodeWidthStr::width(header);
    let lines = ctx
        .wrapper(ctx.config.width.saturating_sub(indentation_len))
        .wrap(text);

    let Some((first, rest)) = lines.split_first() else {
        return format!("{}{}\n", prefix, header).trim_end().to_string() + "\n";
    };

    let continuation = indentation_between(prefix_len, indentation_len, tab_size);
    let mut out = format!("{}{}{}\n", prefix, header, first);
    for line in rest {
        out.push_str(prefix);
        out.push_str(&continuation);
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Head line as given, text wrapped below it behind `body_prefix`
pub fn breaking(head: &str, body_prefix: &str, text: &str, ctx: &ComposeContext<'_>) -> String {
    let indentation_len = visual_width(body_prefix, ctx.config.tab_size);
    let lines = ctx
        .wrapper(ctx.config.width.saturating_sub(indentation_len))
        .wrap(text);

    let mut out = format!("{}\n", head.trim_end());
    for line in lines {
        out.push_str(body_prefix);
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Bullet item: the bullet starts the first line, later lines are one tab
/// deeper than the bullet
///
/// The tab is budgeted as a full tab stop wherever it lands.
pub fn bullet(lead: &str, start: &str, text: &str, ctx: &ComposeContext<'_>) -> String {
    let lead_len = visual_width(lead, ctx.config.tab_size);
    let lines = ctx
        .wrapper(ctx.config.width.saturating_sub(lead_len))
        .initial_indent(UnicodeWidthStr::width(start))
        .subsequent_indent(ctx.config.tab_size)
        .wrap(text);

    let Some((first, rest)) = lines.split_first() else {
        return format!("{}{}\n", lead, start);
    };

    let mut out = format!("{}{}{}\n", lead, start, first);
    for line in rest {
        out.push_str(lead);
        out.push('\t');
        out.push_str(line);
        out.push('\n');
    }
    out
}
