//! Parser DSL - grammar definition in Rust
//!
//! A small combinator vocabulary that builds into a flat [`Grammar`].
//! Rules can refer to each other before they are defined; references are
//! resolved when the builder is finished.
//!
//! # Example
//!
//! ```rust
//! use commentfmt::peg::parser_dsl::*;
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("line", all![ref_("prefix"), re(".*").label("contents"), str("\n")])
//!     .rule("prefix", re(r"[\t ]*//+ ?"))
//!     .build()
//!     .unwrap();
//! ```

use super::ast::ParseError;
use super::grammar::{Atom, Grammar};
use std::collections::{BTreeMap, HashMap};

/// Parslet trait - implemented by all parser combinators
pub trait Parslet: Send + Sync {
    /// Build this parslet into the grammar, returning its atom index
    fn build(self, builder: &mut GrammarBuilder) -> usize;
}

/// Grammar builder for constructing grammars
pub struct GrammarBuilder {
    /// All atoms in the grammar
    atoms: Vec<Atom>,

    /// Named rules and their atom indices
    rules: HashMap<String, usize>,

    /// Entity atoms waiting for their rule to be defined
    pending_entities: HashMap<usize, String>,

    /// First rule defined becomes the root
    first_rule: Option<String>,
}

impl GrammarBuilder {
    /// Create a new grammar builder
    pub fn new() -> Self {
        Self {
            atoms: Vec::new(),
            rules: HashMap::new(),
            pending_entities: HashMap::new(),
            first_rule: None,
        }
    }

    /// Add a rule to the grammar
    pub fn rule(mut self, name: &str, parslet: impl Parslet) -> Self {
        let atom_idx = parslet.build(&mut self);
        self.rules.insert(name.to_string(), atom_idx);
        if self.first_rule.is_none() {
            self.first_rule = Some(name.to_string());
        }
        self
    }

    /// Add an atom directly
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        idx
    }

    /// Register a forward reference
    pub fn add_forward_ref(&mut self, atom_idx: usize, rule_name: String) {
        self.pending_entities.insert(atom_idx, rule_name);
    }

    /// Build the final grammar
    ///
    /// Fails when a reference names a rule that was never defined, or when
    /// no rule was defined at all.
    pub fn build(self) -> Result<Grammar, ParseError> {
        let mut atoms = self.atoms;
        for (idx, rule_name) in &self.pending_entities {
            let target = self
                .rules
                .get(rule_name)
                .copied()
                .ok_or_else(|| ParseError::InvalidGrammar {
                    reason: format!("reference to undefined rule {:?}", rule_name),
                })?;
            if let Some(Atom::Entity { atom }) = atoms.get_mut(*idx) {
                *atom = target;
            }
        }

        let root = self
            .first_rule
            .as_ref()
            .and_then(|name| self.rules.get(name).copied())
            .ok_or_else(|| ParseError::InvalidGrammar {
                reason: "grammar defines no rules".to_string(),
            })?;

        let rules: BTreeMap<String, usize> = self.rules.into_iter().collect();
        let grammar = Grammar { atoms, root, rules };
        grammar.validate()?;
        Ok(grammar)
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Parser Combinators - Fundamental Building Blocks
// ============================================================================

/// Match a literal string
#[derive(Clone, Copy)]
pub struct Str<'a>(pub &'a str);

impl<'a> Parslet for Str<'a> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        builder.add_atom(Atom::Str {
            pattern: self.0.to_string(),
        })
    }
}

/// Match a regular expression
#[derive(Clone, Copy)]
pub struct Re<'a>(pub &'a str);

impl<'a> Parslet for Re<'a> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        builder.add_atom(Atom::Re {
            pattern: self.0.to_string(),
        })
    }
}

/// Match any single character, newline included
#[derive(Clone, Copy, Default)]
pub struct Any;

impl Parslet for Any {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        builder.add_atom(Atom::Re {
            pattern: "(?s).".to_string(),
        })
    }
}

/// Match only at the end of input
#[derive(Clone, Copy, Default)]
pub struct Eof;

impl Parslet for Eof {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        Any.not_ahead().build(builder)
    }
}

/// A forward reference to a named rule
#[derive(Clone, Copy)]
pub struct Ref<'a>(pub &'a str);

impl<'a> Parslet for Ref<'a> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let atom_idx = builder.add_atom(Atom::Entity { atom: 0 }); // Placeholder
        builder.add_forward_ref(atom_idx, self.0.to_string());
        atom_idx
    }
}

/// Sequence of two parslets
#[derive(Clone, Copy)]
pub struct Sequence2<A, B> {
    first: A,
    second: B,
}

impl<A: Parslet, B: Parslet> Parslet for Sequence2<A, B> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let first_idx = self.first.build(builder);
        let second_idx = self.second.build(builder);
        builder.add_atom(Atom::Sequence {
            atoms: vec![first_idx, second_idx],
        })
    }
}

/// Alternative of two parslets (tries A, then B)
#[derive(Clone, Copy)]
pub struct Alternative2<A, B> {
    first: A,
    second: B,
}

impl<A: Parslet, B: Parslet> Parslet for Alternative2<A, B> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let first_idx = self.first.build(builder);
        let second_idx = self.second.build(builder);
        builder.add_atom(Atom::Alternative {
            atoms: vec![first_idx, second_idx],
        })
    }
}

/// Repetition (matches the inner parslet min to max times)
#[derive(Clone, Copy)]
pub struct Repeat<P> {
    inner: P,
    min: usize,
    max: Option<usize>,
}

impl<P: Parslet> Parslet for Repeat<P> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let inner_idx = self.inner.build(builder);
        builder.add_atom(Atom::Repetition {
            atom: inner_idx,
            min: self.min,
            max: self.max,
        })
    }
}

/// Labelled capture
#[derive(Clone, Copy)]
pub struct Named<'a, P> {
    inner: P,
    name: &'a str,
}

impl<'a, P: Parslet> Parslet for Named<'a, P> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let inner_idx = self.inner.build(builder);
        builder.add_atom(Atom::Named {
            name: self.name.to_string(),
            atom: inner_idx,
        })
    }
}

/// Lookahead (doesn't consume input)
#[derive(Clone, Copy)]
pub struct Lookahead<P> {
    inner: P,
    positive: bool,
}

impl<P: Parslet> Parslet for Lookahead<P> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let inner_idx = self.inner.build(builder);
        builder.add_atom(Atom::Lookahead {
            atom: inner_idx,
            positive: self.positive,
        })
    }
}

/// Matches the inner parslet and keeps only the consumed text
#[derive(Clone, Copy)]
pub struct Ignore<P> {
    inner: P,
}

impl<P: Parslet> Parslet for Ignore<P> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let inner_idx = self.inner.build(builder);
        builder.add_atom(Atom::Ignore { atom: inner_idx })
    }
}

/// A type-erased parslet (for heterogeneous sequences/choices)
pub struct Dynamic(Box<dyn DynParslet>);

/// Trait for type-erased parslets
pub trait DynParslet: Send + Sync {
    /// Build this parslet into a grammar
    fn build_boxed(self: Box<Self>, builder: &mut GrammarBuilder) -> usize;
}

impl<P: Parslet + 'static> DynParslet for P {
    fn build_boxed(self: Box<Self>, builder: &mut GrammarBuilder) -> usize {
        (*self).build(builder)
    }
}

impl Parslet for Dynamic {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        self.0.build_boxed(builder)
    }
}

/// Convert any parslet to a dynamic one
pub fn dynamic<P: Parslet + 'static>(p: P) -> Dynamic {
    Dynamic(Box::new(p))
}

/// A sequence of multiple parslets
pub struct Sequence<P>(pub Vec<P>);

impl<P: Parslet> Parslet for Sequence<P> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let indices: Vec<usize> = self.0.into_iter().map(|p| p.build(builder)).collect();
        builder.add_atom(Atom::Sequence { atoms: indices })
    }
}

/// A choice of multiple parslets
pub struct Choice<P>(pub Vec<P>);

impl<P: Parslet> Parslet for Choice<P> {
    fn build(self, builder: &mut GrammarBuilder) -> usize {
        let indices: Vec<usize> = self.0.into_iter().map(|p| p.build(builder)).collect();
        builder.add_atom(Atom::Alternative { atoms: indices })
    }
}

// ============================================================================
// Extension trait for Parslet
// ============================================================================

/// Extension trait for Parslet with builder methods
pub trait ParsletExt: Parslet + Sized {
    /// Label the result
    fn label(self, name: &str) -> Named<'_, Self> {
        Named { inner: self, name }
    }

    /// Repeat this parser
    fn repeat(self, min: usize, max: Option<usize>) -> Repeat<Self> {
        Repeat {
            inner: self,
            min,
            max,
        }
    }

    /// Match zero or more times
    fn many(self) -> Repeat<Self> {
        self.repeat(0, None)
    }

    /// Match one or more times
    fn many1(self) -> Repeat<Self> {
        self.repeat(1, None)
    }

    /// Match optional (zero or one time)
    fn optional(self) -> Repeat<Self> {
        self.repeat(0, Some(1))
    }

    /// Positive lookahead (must match, doesn't consume)
    fn lookahead(self) -> Lookahead<Self> {
        Lookahead {
            inner: self,
            positive: true,
        }
    }

    /// Negative lookahead (must NOT match, doesn't consume)
    fn not_ahead(self) -> Lookahead<Self> {
        Lookahead {
            inner: self,
            positive: false,
        }
    }

    /// Sequence: A then B
    fn then<B: Parslet>(self, other: B) -> Sequence2<Self, B> {
        Sequence2 {
            first: self,
            second: other,
        }
    }

    /// Alternative: A or B
    fn or<B: Parslet>(self, other: B) -> Alternative2<Self, B> {
        Alternative2 {
            first: self,
            second: other,
        }
    }

    /// Keep only the text this parser consumed
    fn ignore(self) -> Ignore<Self> {
        Ignore { inner: self }
    }
}

impl<T: Parslet + Sized> ParsletExt for T {}

// ============================================================================
// Helper Functions
// ============================================================================

/// Match a literal string
pub fn str(s: &str) -> Str<'_> {
    Str(s)
}

/// Match a regular expression
pub fn re(pattern: &str) -> Re<'_> {
    Re(pattern)
}

/// Match any single character
pub fn any() -> Any {
    Any
}

/// Match the end of input
pub fn eof() -> Eof {
    Eof
}

/// Forward reference to a rule
pub fn ref_(name: &str) -> Ref<'_> {
    Ref(name)
}

/// Create a sequence from multiple parslets
pub fn seq<I, P>(items: I) -> Sequence<P>
where
    I: IntoIterator<Item = P>,
{
    Sequence(items.into_iter().collect())
}

/// Create a choice from multiple parslets
pub fn choice<I, P>(items: I) -> Choice<P>
where
    I: IntoIterator<Item = P>,
{
    Choice(items.into_iter().collect())
}

// ============================================================================
// Macros for Arbitrary-Length Sequences and Alternatives
// ============================================================================

/// Create a sequence of parslets of any length and mixed types
///
/// ```
/// use commentfmt::peg::parser_dsl::*;
///
/// let header = all![ref_("prefix"), str("@param"), re(r"[\t ]*"), re(r"\S+")];
/// ```
#[macro_export]
macro_rules! all {
    ($($p:expr),+ $(,)?) => {
        $crate::peg::parser_dsl::Sequence(vec![
            $($crate::peg::parser_dsl::dynamic($p)),+
        ])
    };
}

/// Create an ordered choice of parslets of any length and mixed types
///
/// ```
/// use commentfmt::peg::parser_dsl::*;
///
/// let bullet = oneof![str("+"), str("-"), str("*")];
/// ```
#[macro_export]
macro_rules! oneof {
    ($($p:expr),+ $(,)?) => {
        $crate::peg::parser_dsl::Choice(vec![
            $($crate::peg::parser_dsl::dynamic($p)),+
        ])
    };
}

// Re-export macros at module level
pub use crate::{all, oneof};
