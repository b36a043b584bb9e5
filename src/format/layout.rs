//! Width arithmetic and word wrapping
//!
//! Widths are display columns: characters are measured with
//! `unicode-width` and tabs advance to the next tab stop.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Column reached after writing `text` starting at column `start`
pub fn advance(start: usize, text: &str, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    text.chars().fold(start, |column, ch| match ch {
        '\t' => column + tab_size - column % tab_size,
        _ => column + ch.width().unwrap_or(0),
    })
}

/// Display width of `text` written from column zero
#[inline]
pub fn visual_width(text: &str, tab_size: usize) -> usize {
    advance(0, text, tab_size)
}

/// Whitespace that moves from column `from` to column `to`
///
/// Uses tab stops when the target lies past the next stop, then pads with
/// spaces; otherwise spaces only.
pub fn indentation_between(from: usize, to: usize, tab_size: usize) -> String {
    let tab_size = tab_size.max(1);
    let tabs = (to / tab_size).saturating_sub(from / tab_size);
    if tabs > 0 {
        let mut indentation = "\t".repeat(tabs);
        indentation.push_str(&" ".repeat(to % tab_size));
        indentation
    } else {
        " ".repeat(to.saturating_sub(from))
    }
}

/// Remove the whitespace prefix common to all non-blank lines
///
/// Whitespace-only lines become empty and do not take part in the
/// computation. Indentation is compared as text, so a tab and four spaces
/// have nothing in common.
pub fn dedent<'s>(lines: &[&'s str]) -> Vec<&'s str> {
    let mut margin: Option<&str> = None;
    for line in lines.iter().filter(|line| !line.trim().is_empty()) {
        let indent = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }

    let margin_len = margin.map_or(0, str::len);
    lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                &line[margin_len..]
            }
        })
        .collect()
}

fn common_prefix<'s>(a: &'s str, b: &str) -> &'s str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

/// Greedy word wrapper
///
/// Text is split on whitespace and refilled into lines of at most `width`
/// columns, indents included. Words longer than a line are never broken.
/// Words accepted by the `sticky` predicate are kept on the line of the
/// word before them.
#[derive(Debug, Clone, Copy)]
pub struct Wrapper {
    width: usize,
    initial_indent: usize,
    subsequent_indent: usize,
    sticky: Option<fn(&str) -> bool>,
}

impl Wrapper {
    /// Wrap to `width` columns with no indents
    pub fn new(width: usize) -> Self {
        Self {
            width,
            initial_indent: 0,
            subsequent_indent: 0,
            sticky: None,
        }
    }

    /// Columns taken by something written before the first line
    pub fn initial_indent(mut self, columns: usize) -> Self {
        self.initial_indent = columns;
        self
    }

    /// Columns taken by something written before every later line
    pub fn subsequent_indent(mut self, columns: usize) -> Self {
        self.subsequent_indent = columns;
        self
    }

    /// Words that must not begin a line
    pub fn sticky(mut self, predicate: fn(&str) -> bool) -> Self {
        self.sticky = Some(predicate);
        self
    }

    /// Wrap `text` into lines (indents not included)
    pub fn wrap(&self, text: &str) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0;

        for unit in self.units(text) {
            let indent = if lines.is_empty() {
                self.initial_indent
            } else {
                self.subsequent_indent
            };
            let budget = self.width.saturating_sub(indent);
            let unit_width = UnicodeWidthStr::width(unit.as_str());

            if current.is_empty() {
                current = unit;
                current_width = unit_width;
            } else if current_width + 1 + unit_width <= budget {
                current.push(' ');
                current.push_str(&unit);
                current_width += 1 + unit_width;
            } else {
                lines.push(std::mem::replace(&mut current, unit));
                current_width = unit_width;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Words of `text`, sticky words glued to their predecessor
    fn units(&self, text: &str) -> Vec<String> {
        let mut units: Vec<String> = Vec::new();
        for word in text.split_whitespace() {
            match units.last_mut() {
                Some(last) if self.sticky.is_some_and(|sticky| sticky(word)) => {
                    last.push(' ');
                    last.push_str(word);
                }
                _ => units.push(word.to_string()),
            }
        }
        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_width_expands_tabs() {
        assert_eq!(visual_width(" *\t", 4), 4);
        assert_eq!(visual_width("\t\t", 4), 8);
        assert_eq!(visual_width("ab\tc", 8), 9);
        assert_eq!(advance(3, "\t", 4), 4);
    }

    #[test]
    fn test_visual_width_wide_chars() {
        assert_eq!(visual_width("日本", 4), 4);
        assert_eq!(visual_width("é", 4), 1);
    }

    #[test]
    fn test_indentation_between() {
        assert_eq!(indentation_between(4, 13, 4), "\t\t ");
        assert_eq!(indentation_between(4, 6, 4), "  ");
        assert_eq!(indentation_between(3, 4, 4), "\t");
        assert_eq!(indentation_between(5, 5, 4), "");
    }

    #[test]
    fn test_dedent_keeps_relative_indentation() {
        let lines = ["    if x:", "        y", "", "    z"];
        assert_eq!(dedent(&lines), vec!["if x:", "    y", "", "z"]);
    }

    #[test]
    fn test_dedent_mixed_whitespace() {
        let lines = ["\tfoo", "    bar"];
        assert_eq!(dedent(&lines), vec!["\tfoo", "    bar"]);

        let lines = ["\t  foo", "\t bar", "  \t "];
        assert_eq!(dedent(&lines), vec![" foo", "bar", ""]);
    }

    #[test]
    fn test_wrap_greedy() {
        let lines = Wrapper::new(10).wrap("aaa bbb ccc ddd");
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn test_wrap_normalizes_whitespace() {
        let lines = Wrapper::new(80).wrap("  one\n two\t three  ");
        assert_eq!(lines, vec!["one two three"]);
        assert!(Wrapper::new(80).wrap(" \n ").is_empty());
    }

    #[test]
    fn test_wrap_long_word_overflows() {
        let lines = Wrapper::new(4).wrap("abcdefgh ij");
        assert_eq!(lines, vec!["abcdefgh", "ij"]);
    }

    #[test]
    fn test_wrap_indents_reduce_budget() {
        let lines = Wrapper::new(10)
            .initial_indent(2)
            .subsequent_indent(4)
            .wrap("aaaa bbb cc dd ee");
        assert_eq!(lines, vec!["aaaa bbb", "cc dd", "ee"]);
    }

    #[test]
    fn test_wrap_sticky_words() {
        let lines = Wrapper::new(8)
            .sticky(|word| word.starts_with('@'))
            .wrap("use the @param tag");
        assert_eq!(lines, vec!["use", "the @param", "tag"]);
    }
}
