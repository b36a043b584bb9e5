//! Prelude module for convenient imports
//!
//! ```ignore
//! use commentfmt::prelude::*;
//! ```
//!
//! # Re-exported Items
//!
//! ## Formatting
//! - [`format_block_comment`], [`format_line_comment`], [`format_paragraph`]
//! - [`FormatConfig`] - width, tab size and placeholder policy
//! - [`TextKind`] - which grammar to use
//! - [`FormatError`] - why a text was left alone
//!
//! ## Editor Integration
//! - [`format_at`] / [`TextEdit`] - format the text around a cursor
//! - [`Preferences`], [`RulerStore`], [`RulerOverride`]
//!
//! ## Grammar Engine
//! - [`Grammar`], [`GrammarBuilder`], [`PegParser`], [`NodeRef`], [`parse_with`]

// ============================================================================
// Formatting
// ============================================================================

pub use crate::format::{
    format_block_comment, format_line_comment, format_paragraph, ConstructKind, FormatConfig,
    FormatError, TextKind, UnnamedParams,
};

// ============================================================================
// Editor Integration
// ============================================================================

pub use crate::host::{with_rulers, Preferences, RulerOverride, RulerStore};
pub use crate::scope::{detect_kind, format_at, scope_at, TextEdit};

// ============================================================================
// Grammar Engine
// ============================================================================

pub use crate::peg::parser_dsl::{GrammarBuilder, Parslet, ParsletExt};
pub use crate::peg::{parse_with, AstArena, AstNode, Grammar, NodeRef, ParseError, PegParser};
