//! Read-only view over a parse tree
//!
//! [`NodeRef`] pairs a node with its arena and input so callers can ask for
//! matched text and labelled fields without touching pool indices. Text
//! slices borrow from the input, not the arena, so they outlive the tree.

use super::arena::AstArena;
use super::ast::AstNode;
use std::fmt;
use std::ops::Range;

/// A node together with the arena and input it belongs to
#[derive(Clone, Copy)]
pub struct NodeRef<'t, 'i> {
    node: AstNode,
    arena: &'t AstArena,
    input: &'i str,
}

impl<'t, 'i> NodeRef<'t, 'i> {
    /// Wrap a node
    #[inline]
    pub fn new(node: AstNode, arena: &'t AstArena, input: &'i str) -> Self {
        Self { node, arena, input }
    }

    /// The underlying node
    #[inline]
    pub fn node(&self) -> AstNode {
        self.node
    }

    /// Byte range this node consumed
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.node.span()
    }

    /// Input text this node consumed
    #[inline]
    pub fn text(&self) -> &'i str {
        &self.input[self.span()]
    }

    /// Label of a capture node
    pub fn label(&self) -> Option<&'t str> {
        self.arena
            .get_hash_items(&self.node)
            .first()
            .map(|&(key, _)| key)
    }

    /// Captured value of a capture node
    pub fn value(&self) -> Option<NodeRef<'t, 'i>> {
        self.arena
            .get_hash_items(&self.node)
            .first()
            .map(|&(_, value)| self.wrap(value))
    }

    /// Children of a sequence or repetition
    pub fn items(&self) -> Vec<NodeRef<'t, 'i>> {
        self.arena
            .get_array(&self.node)
            .iter()
            .map(|&child| self.wrap(child))
            .collect()
    }

    /// First field called `name`
    ///
    /// A capture node is searched through its value. The search walks
    /// sequences and repetitions depth-first but does not enter captures
    /// with another label.
    pub fn attr(&self, name: &str) -> Option<NodeRef<'t, 'i>> {
        self.body().find_field(name)
    }

    /// Text of the first field called `name`
    pub fn attr_text(&self, name: &str) -> Option<&'i str> {
        self.attr(name).map(|field| field.text())
    }

    /// All captures directly below this node, in input order
    ///
    /// Same traversal as [`attr`](Self::attr), collecting every capture it
    /// stops at.
    pub fn labeled(&self) -> Vec<NodeRef<'t, 'i>> {
        let mut found = Vec::new();
        self.body().collect_labeled(&mut found);
        found
    }

    fn body(&self) -> NodeRef<'t, 'i> {
        self.value().unwrap_or(*self)
    }

    fn wrap(&self, node: AstNode) -> NodeRef<'t, 'i> {
        NodeRef::new(node, self.arena, self.input)
    }

    fn find_field(&self, name: &str) -> Option<NodeRef<'t, 'i>> {
        match self.node {
            AstNode::Hash { .. } => match self.label() {
                Some(label) if label == name => self.value(),
                _ => None,
            },
            AstNode::Array { .. } => self.items().iter().find_map(|c| c.find_field(name)),
            _ => None,
        }
    }

    fn collect_labeled(&self, found: &mut Vec<NodeRef<'t, 'i>>) {
        match self.node {
            AstNode::Hash { .. } => found.push(*self),
            AstNode::Array { .. } => {
                for child in self.items() {
                    child.collect_labeled(found);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Debug for NodeRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => write!(f, "{}@{:?}: {:?}", label, self.span(), self.text()),
            None => write!(f, "@{:?}: {:?}", self.span(), self.text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peg::parser_dsl::*;
    use crate::peg::PegParser;

    #[test]
    fn test_fields_and_labels() {
        let grammar = GrammarBuilder::new()
            .rule("doc", ref_("line").label("line").many())
            .rule(
                "line",
                all![
                    re(r"[\t ]*//").label("prefix"),
                    re(r"[\t ]*"),
                    re(".*").label("contents"),
                    str("\n"),
                ],
            )
            .build()
            .unwrap();
        let input = "// one\n  // two\n";
        let mut arena = AstArena::new();
        let root = PegParser::new(&grammar, input, &mut arena).parse().unwrap();
        let doc = NodeRef::new(root, &arena, input);

        let lines = doc.labeled();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].label(), Some("line"));
        assert_eq!(lines[1].attr_text("prefix"), Some("  //"));
        assert_eq!(lines[1].attr_text("contents"), Some("two"));
        assert_eq!(lines[1].text(), "  // two\n");
        assert!(lines[0].attr("missing").is_none());
    }

    #[test]
    fn test_attr_does_not_enter_other_captures() {
        let grammar = GrammarBuilder::new()
            .rule(
                "pair",
                re("[a-z]+")
                    .label("name")
                    .label("outer")
                    .then(re("[0-9]+").label("number")),
            )
            .build()
            .unwrap();
        let input = "abc123";
        let mut arena = AstArena::new();
        let root = PegParser::new(&grammar, input, &mut arena).parse().unwrap();
        let pair = NodeRef::new(root, &arena, input);

        assert!(pair.attr("name").is_none());
        assert_eq!(pair.attr_text("number"), Some("123"));
        let outer = pair.attr("outer").unwrap();
        assert_eq!(outer.attr_text("name"), None);
        assert_eq!(outer.text(), "abc");
    }

    #[test]
    fn test_empty_optional_field_has_empty_text() {
        let grammar = GrammarBuilder::new()
            .rule(
                "code",
                str("@code").then(re(r"\{.+?\}").optional().label("parameters")),
            )
            .build()
            .unwrap();
        let input = "@code";
        let mut arena = AstArena::new();
        let root = PegParser::new(&grammar, input, &mut arena).parse().unwrap();
        let code = NodeRef::new(root, &arena, input);
        assert_eq!(code.attr_text("parameters"), Some(""));
    }
}
