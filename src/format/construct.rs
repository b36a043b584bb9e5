//! Construct kinds and their static properties

use std::fmt;

/// How a construct is turned back into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Header followed by wrapped text aligned under the header's end
    Contiguous,
    /// Header on its own line, body one indentation level deeper
    Breaking,
    /// Code sample re-based to one indentation level, never wrapped
    Fenced,
    /// Bullet items, each contiguous or breaking
    Bullets,
    /// Single reference line with normalized spacing
    Reference,
    /// Emitted exactly as written
    Verbatim,
}

/// Kind of a paragraph in a parsed document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructKind {
    /// `@brief` summary
    Brief,
    /// `@param` entry
    Param,
    /// `@tparam` entry
    TParam,
    /// `@returns` / `@return`
    Returns,
    /// `@code` ... `@endcode`
    Code,
    /// `@note`
    Note,
    /// `@warning`
    Warning,
    /// `@throws`
    Throws,
    /// `@see`
    See,
    /// `@related`
    Related,
    /// `@relatedalso`
    RelatedAlso,
    /// Rows starting with `|`
    Table,
    /// Bullet list
    ListItems,
    /// `[label]: target`
    ReferenceLink,
    /// Untagged prose inside a block comment
    Details,
    /// Untagged prose outside comments, or a line-comment paragraph
    Text,
}

/// Grammar label, canonical marker and strategy of every construct
const CONSTRUCTS: &[(ConstructKind, &str, &str, Strategy)] = &[
    (ConstructKind::Brief, "brief", "@brief", Strategy::Contiguous),
    (ConstructKind::Param, "param", "@param", Strategy::Contiguous),
    (ConstructKind::TParam, "tparam", "@tparam", Strategy::Contiguous),
    (ConstructKind::Returns, "returns", "@returns", Strategy::Contiguous),
    (ConstructKind::Code, "code", "@code", Strategy::Fenced),
    (ConstructKind::Note, "note", "@note", Strategy::Breaking),
    (ConstructKind::Warning, "warning", "@warning", Strategy::Breaking),
    (ConstructKind::Throws, "throws", "@throws", Strategy::Breaking),
    (ConstructKind::See, "see", "@see", Strategy::Reference),
    (ConstructKind::Related, "related", "@related", Strategy::Reference),
    (ConstructKind::RelatedAlso, "related_also", "@relatedalso", Strategy::Reference),
    (ConstructKind::Table, "table", "", Strategy::Verbatim),
    (ConstructKind::ListItems, "list_items", "", Strategy::Bullets),
    (ConstructKind::ReferenceLink, "reference_link", "", Strategy::Verbatim),
    (ConstructKind::Details, "details", "", Strategy::Contiguous),
    (ConstructKind::Text, "text", "", Strategy::Contiguous),
];

impl ConstructKind {
    /// Look a kind up by its grammar label
    pub fn from_label(label: &str) -> Option<Self> {
        CONSTRUCTS
            .iter()
            .find(|(_, l, _, _)| *l == label)
            .map(|&(kind, ..)| kind)
    }

    fn entry(self) -> &'static (ConstructKind, &'static str, &'static str, Strategy) {
        // Every variant has a row
        CONSTRUCTS
            .iter()
            .find(|(kind, ..)| *kind == self)
            .unwrap_or(&CONSTRUCTS[CONSTRUCTS.len() - 1])
    }

    /// Label used for this construct in the grammars
    pub fn label(self) -> &'static str {
        self.entry().1
    }

    /// Canonical tag marker (empty for untagged constructs)
    pub fn marker(self) -> &'static str {
        self.entry().2
    }

    /// How this construct is composed
    pub fn strategy(self) -> Strategy {
        self.entry().3
    }

    /// Whether this construct takes part in parameter alignment
    pub fn is_parameter(self) -> bool {
        matches!(self, ConstructKind::Param | ConstructKind::TParam)
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
