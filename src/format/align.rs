//! Alignment of parameter runs
//!
//! A run is a maximal sequence of `@param`/`@tparam` paragraphs, possibly
//! interleaved with blank separator lines. All names in a run start at one
//! column and all descriptions at another.

use super::compose::Alignment;
use super::config::{UnnamedParams, UNNAMED_PLACEHOLDER};
use super::construct::ConstructKind;
use unicode_width::UnicodeWidthStr;

/// One physical line of a tagged construct
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagLine<'a> {
    /// Comment prefix, blanks after the marker included
    pub prefix: &'a str,
    /// Tag argument (parameter name, exception type, code language)
    pub parameters: &'a str,
    /// Text after the argument
    pub contents: &'a str,
}

/// A single `@param` or `@tparam` paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterEntry<'a> {
    /// [`ConstructKind::Param`] or [`ConstructKind::TParam`]
    pub kind: ConstructKind,
    /// Header line first, then continuation lines
    pub lines: Vec<TagLine<'a>>,
}

impl<'a> ParameterEntry<'a> {
    /// Parameter name from the header line
    pub fn name(&self) -> &'a str {
        self.lines.first().map_or("", |line| line.parameters)
    }

    /// Prefix of the header line
    pub fn prefix(&self) -> &'a str {
        self.lines.first().map_or("", |line| line.prefix)
    }

    /// Description words of all lines, joined by single spaces
    pub fn text(&self) -> String {
        join_contents(self.lines.iter().map(|line| line.contents))
    }

    /// Whether the name is the placeholder for a nameless parameter
    pub fn is_unnamed(&self) -> bool {
        self.name() == UNNAMED_PLACEHOLDER
    }
}

/// Element of a parameter run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEntry<'a> {
    /// A parameter paragraph
    Parameter(ParameterEntry<'a>),
    /// A blank comment line (first line of the original blank run)
    Separator(&'a str),
}

/// A run after placeholder removal, with separators that no longer sit
/// between two parameters moved out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TidyRun<'a> {
    /// Separator that now precedes the run
    pub leading: Option<&'a str>,
    /// Remaining entries, starting and ending with a parameter
    pub entries: Vec<RunEntry<'a>>,
    /// Separator that now follows the run
    pub trailing: Option<&'a str>,
}

/// Join line contents into one whitespace-normalized string
pub fn join_contents<'a>(contents: impl IntoIterator<Item = &'a str>) -> String {
    contents
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Columns for a run: names after the longest marker plus one space,
/// descriptions after the longest name plus one space
///
/// A run without entries aligns at column zero.
pub fn compute_alignment<'e, 'a: 'e>(
    entries: impl IntoIterator<Item = &'e ParameterEntry<'a>>,
) -> Alignment {
    let (marker_width, name_width) = entries
        .into_iter()
        .map(|entry| {
            (
                UnicodeWidthStr::width(entry.kind.marker()) + 1,
                UnicodeWidthStr::width(entry.name()) + 1,
            )
        })
        .fold(None, |acc: Option<(usize, usize)>, (m, n)| {
            Some(acc.map_or((m, n), |(am, an)| (am.max(m), an.max(n))))
        })
        .unwrap_or((0, 0));

    Alignment {
        parameter_column: marker_width,
        content_column: marker_width + name_width,
    }
}

/// Apply the placeholder policy and tidy separators
///
/// Dropping a parameter can leave separators next to each other or at the
/// edges of the run; adjacent ones collapse into the first and edge ones
/// move out of the run.
pub fn tidy_run<'a>(entries: Vec<RunEntry<'a>>, policy: UnnamedParams) -> TidyRun<'a> {
    let mut kept: Vec<RunEntry<'a>> = entries
        .into_iter()
        .filter(|entry| match entry {
            RunEntry::Parameter(parameter) if parameter.is_unnamed() => {
                if policy == UnnamedParams::Drop {
                    log_debug!("Dropping unnamed {} entry", parameter.kind);
                    false
                } else {
                    true
                }
            }
            _ => true,
        })
        .collect();

    kept.dedup_by(|current, previous| {
        matches!(
            (current, previous),
            (RunEntry::Separator(_), RunEntry::Separator(_))
        )
    });

    let leading = match kept.first() {
        Some(RunEntry::Separator(line)) => Some(*line),
        _ => None,
    };
    if leading.is_some() {
        kept.remove(0);
    }
    let trailing = match kept.last() {
        Some(RunEntry::Separator(line)) => Some(*line),
        _ => None,
    };
    if trailing.is_some() {
        kept.pop();
    }

    TidyRun {
        leading,
        entries: kept,
        trailing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &'static str) -> ParameterEntry<'static> {
        ParameterEntry {
            kind: ConstructKind::Param,
            lines: vec![TagLine {
                prefix: " * ",
                parameters: name,
                contents: " text",
            }],
        }
    }

    #[test]
    fn test_alignment_uses_longest_marker_and_name() {
        let x = param("x");
        let long = param("longname");
        let alignment = compute_alignment([&x, &long]);
        assert_eq!(alignment.parameter_column, 7);
        assert_eq!(alignment.content_column, 16);
    }

    #[test]
    fn test_alignment_mixed_markers() {
        let t = ParameterEntry {
            kind: ConstructKind::TParam,
            ..param("T")
        };
        let x = param("x");
        let alignment = compute_alignment([&t, &x]);
        assert_eq!(alignment.parameter_column, 8);
        assert_eq!(alignment.content_column, 10);
    }

    #[test]
    fn test_alignment_empty_run() {
        let alignment = compute_alignment(std::iter::empty());
        assert_eq!(alignment, Alignment::default());
    }

    #[test]
    fn test_join_contents() {
        assert_eq!(join_contents([" a  b", "", "\tc "]), "a b c");
    }

    #[test]
    fn test_tidy_run_drops_placeholder() {
        let entries = vec![
            RunEntry::Parameter(param("a")),
            RunEntry::Separator(" *\n"),
            RunEntry::Parameter(param(UNNAMED_PLACEHOLDER)),
            RunEntry::Separator(" *\n"),
            RunEntry::Parameter(param("b")),
        ];
        let run = tidy_run(entries, UnnamedParams::Drop);
        assert_eq!(run.leading, None);
        assert_eq!(run.trailing, None);
        assert_eq!(
            run.entries,
            vec![
                RunEntry::Parameter(param("a")),
                RunEntry::Separator(" *\n"),
                RunEntry::Parameter(param("b")),
            ]
        );
    }

    #[test]
    fn test_tidy_run_moves_edge_separators_out() {
        let entries = vec![
            RunEntry::Parameter(param(UNNAMED_PLACEHOLDER)),
            RunEntry::Separator(" *\n"),
            RunEntry::Parameter(param("a")),
            RunEntry::Separator(" * \n"),
            RunEntry::Parameter(param(UNNAMED_PLACEHOLDER)),
        ];
        let run = tidy_run(entries, UnnamedParams::Drop);
        assert_eq!(run.leading, Some(" *\n"));
        assert_eq!(run.entries, vec![RunEntry::Parameter(param("a"))]);
        assert_eq!(run.trailing, Some(" * \n"));
    }

    #[test]
    fn test_tidy_run_keep_policy() {
        let entries = vec![RunEntry::Parameter(param(UNNAMED_PLACEHOLDER))];
        let run = tidy_run(entries.clone(), UnnamedParams::Keep);
        assert_eq!(run.entries, entries);
    }

    #[test]
    fn test_tidy_run_all_unnamed() {
        let entries = vec![
            RunEntry::Parameter(param(UNNAMED_PLACEHOLDER)),
            RunEntry::Separator(" *\n"),
            RunEntry::Parameter(param(UNNAMED_PLACEHOLDER)),
        ];
        let run = tidy_run(entries, UnnamedParams::Drop);
        assert!(run.entries.is_empty());
        assert_eq!(run.leading, Some(" *\n"));
        assert_eq!(run.trailing, None);
    }
}
