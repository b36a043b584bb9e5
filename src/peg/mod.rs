//! Grammar-driven matching engine
//!
//! Every formatter in this crate describes its input as a PEG grammar and
//! composes output from the labelled parse tree. This module holds the
//! engine they share.
//!
//! # Module Organization
//!
//! ## Core Types
//! - [`Grammar`] - flat table of atoms plus rule names
//! - [`PegParser`] - packrat interpreter for a grammar
//! - [`AstArena`] / [`AstNode`] - parse tree storage
//! - [`NodeRef`] - text and field access over a parse tree
//!
//! ## Parser DSL
//! - [`parser_dsl`] - combinators for building grammars in Rust
//!
//! ## Source Location
//! - [`source_location`] - line/column tracking

// ============================================================================
// Module Declarations
// ============================================================================

pub mod arena;
pub mod ast;
pub mod grammar;
pub mod parser;
pub mod parser_dsl;
pub mod regex_cache;
pub mod source_location;
pub mod tree;

// ============================================================================
// Core Types
// ============================================================================

pub use arena::AstArena;
pub use ast::{AstNode, ParseError, ParseResult};
pub use grammar::{Atom, Grammar};
pub use parser::{PegParser, ParserConfig, DEFAULT_MAX_INPUT_SIZE, DEFAULT_MAX_RECURSION_DEPTH};
pub use source_location::SourcePosition;
pub use tree::NodeRef;

/// Parse `input` completely and hand the tree to `build`
///
/// The arena lives only for the duration of the call; `build` extracts
/// whatever it needs as slices of `input`.
pub fn parse_with<'i, T>(
    grammar: &Grammar,
    input: &'i str,
    build: impl for<'t> FnOnce(NodeRef<'t, 'i>) -> T,
) -> Result<T, ParseError> {
    let mut arena = AstArena::for_input(input.len());
    let root = PegParser::new(grammar, input, &mut arena).parse()?;
    Ok(build(NodeRef::new(root, &arena, input)))
}
