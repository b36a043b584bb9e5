//! PEG parser engine
//!
//! Interprets a [`Grammar`] over an input string with packrat memoization.
//! While parsing, the engine remembers the furthest position any literal or
//! regex failed at, together with what was expected there and the innermost
//! labelled construct being tried. That is what [`ParseError::Unmatched`]
//! reports when the whole input cannot be matched.

use super::{
    arena::AstArena,
    ast::{AstNode, ParseError, ParseResult},
    grammar::{Atom, Grammar},
    regex_cache,
};
use hashbrown::HashMap;

/// Default maximum input size (100 MB)
pub const DEFAULT_MAX_INPUT_SIZE: usize = 100 * 1024 * 1024;

/// Default maximum rule nesting depth
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 1000;

/// Maximum number of distinct expectations kept for one failure position
const MAX_EXPECTATIONS: usize = 8;

/// Parser limits
///
/// # Example
///
/// ```rust
/// use commentfmt::peg::ParserConfig;
///
/// let config = ParserConfig::new()
///     .with_max_input_size(1024 * 1024)
///     .with_max_recursion_depth(64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum allowed input size in bytes (0 = no limit)
    pub max_input_size: usize,

    /// Maximum allowed rule nesting depth (0 = no limit)
    pub max_recursion_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum input size
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// Set the maximum recursion depth
    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }
}

/// Furthest failure seen so far
#[derive(Debug, Default)]
struct Furthest {
    position: usize,
    expected: Vec<String>,
}

/// The parser engine
pub struct PegParser<'a> {
    /// The grammar being interpreted
    grammar: &'a Grammar,

    /// Input string (UTF-8)
    input: &'a str,

    /// Input as bytes (for fast comparison)
    input_bytes: &'a [u8],

    /// Node arena
    arena: &'a mut AstArena,

    /// Packrat memo: (atom, position) -> result, `None` for a failure
    memo: HashMap<(usize, usize), Option<ParseResult>>,

    /// Rule atom -> rule name
    rule_names: HashMap<usize, &'a str>,

    /// Labels and rule names currently being matched, innermost last
    context: Vec<&'a str>,

    /// Nesting depth of lookaheads; failures inside them are not reported
    silent: usize,

    /// Current rule nesting depth
    current_depth: usize,

    /// Diagnostics for the furthest failure
    furthest: Furthest,

    /// Limits
    config: ParserConfig,
}

impl<'a> PegParser<'a> {
    /// Create a new parser with default limits
    #[inline]
    pub fn new(grammar: &'a Grammar, input: &'a str, arena: &'a mut AstArena) -> Self {
        Self::with_config(grammar, input, arena, ParserConfig::default())
    }

    /// Create a new parser with custom limits
    pub fn with_config(
        grammar: &'a Grammar,
        input: &'a str,
        arena: &'a mut AstArena,
        config: ParserConfig,
    ) -> Self {
        let rule_names = grammar
            .rules
            .iter()
            .map(|(name, &atom)| (atom, name.as_str()))
            .collect();
        Self {
            grammar,
            input,
            input_bytes: input.as_bytes(),
            arena,
            memo: HashMap::new(),
            rule_names,
            context: Vec::new(),
            silent: 0,
            current_depth: 0,
            furthest: Furthest::default(),
            config,
        }
    }

    /// Parse the whole input
    ///
    /// # Errors
    /// - [`ParseError::InputTooLarge`] if the input exceeds the size limit
    /// - [`ParseError::RecursionLimitExceeded`] if rules nest too deeply
    /// - [`ParseError::Unmatched`] if the grammar cannot match all of the input
    pub fn parse(&mut self) -> Result<AstNode, ParseError> {
        let result = self.parse_partial()?;
        if result.end_pos == self.input.len() {
            log_debug!("Parse successful: consumed all {} bytes", result.end_pos);
            return Ok(result.value);
        }

        log_debug!(
            "Parse stopped at {} of {} bytes",
            result.end_pos,
            self.input.len()
        );
        Err(self.unmatched(result.end_pos))
    }

    /// Parse a prefix of the input
    ///
    /// Returns the root node and the offset right after what it consumed.
    pub fn parse_partial(&mut self) -> Result<ParseResult, ParseError> {
        self.check_input_size()?;

        log_debug!(
            "Starting parse: input_len={}, root_atom={}",
            self.input.len(),
            self.grammar.root
        );

        let root = self.grammar.root;
        let root_name = self.rule_names.get(&root).copied();
        if let Some(name) = root_name {
            self.context.push(name);
        }
        let result = self.try_atom(root, 0);
        if root_name.is_some() {
            self.context.pop();
        }

        match result {
            Ok(result) => Ok(result),
            Err(ParseError::Failed { .. }) => Err(self.unmatched(0)),
            Err(e) => Err(e),
        }
    }

    /// Number of memoized (atom, position) results
    pub fn memo_size(&self) -> usize {
        self.memo.len()
    }

    fn unmatched(&self, stopped_at: usize) -> ParseError {
        if self.furthest.expected.is_empty() || self.furthest.position < stopped_at {
            return ParseError::Unmatched {
                position: stopped_at,
                expected: "end of input".to_string(),
            };
        }
        ParseError::Unmatched {
            position: self.furthest.position,
            expected: self.furthest.expected.join(" or "),
        }
    }

    fn check_input_size(&self) -> Result<(), ParseError> {
        if self.config.max_input_size > 0 && self.input.len() > self.config.max_input_size {
            return Err(ParseError::InputTooLarge {
                input_size: self.input.len(),
                max_size: self.config.max_input_size,
            });
        }
        Ok(())
    }

    /// Enter a rule reference, checking depth limits
    #[inline]
    fn enter_recursive(&mut self) -> Result<(), ParseError> {
        self.current_depth += 1;
        if self.config.max_recursion_depth > 0
            && self.current_depth > self.config.max_recursion_depth
        {
            return Err(ParseError::RecursionLimitExceeded {
                depth: self.current_depth,
                max_depth: self.config.max_recursion_depth,
            });
        }
        Ok(())
    }

    /// Exit a rule reference
    #[inline]
    fn exit_recursive(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }

    /// Record a failed expectation at `pos`
    fn expect(&mut self, pos: usize, what: impl FnOnce() -> String) {
        if self.silent > 0 || pos < self.furthest.position {
            return;
        }
        if pos > self.furthest.position {
            self.furthest.position = pos;
            self.furthest.expected.clear();
        }
        if self.furthest.expected.len() >= MAX_EXPECTATIONS {
            return;
        }
        let mut description = what();
        if let Some(context) = self.context.last() {
            description = format!("{} in {}", description, context);
        }
        if !self.furthest.expected.contains(&description) {
            self.furthest.expected.push(description);
        }
    }

    fn try_atom(&mut self, atom_id: usize, pos: usize) -> Result<ParseResult, ParseError> {
        if let Some(cached) = self.memo.get(&(atom_id, pos)) {
            return (*cached).ok_or(ParseError::Failed { position: pos });
        }

        match self.parse_atom_uncached(atom_id, pos) {
            Ok(result) => {
                self.memo.insert((atom_id, pos), Some(result));
                Ok(result)
            }
            Err(ParseError::Failed { position }) => {
                self.memo.insert((atom_id, pos), None);
                Err(ParseError::Failed { position })
            }
            Err(e) => Err(e),
        }
    }

    /// Parse an atom without checking the memo
    fn parse_atom_uncached(
        &mut self,
        atom_id: usize,
        pos: usize,
    ) -> Result<ParseResult, ParseError> {
        let grammar = self.grammar;
        match grammar.get_atom(atom_id) {
            Some(atom) => match atom {
                Atom::Str { pattern } => self.parse_str(pattern, pos),
                Atom::Re { pattern } => self.parse_re(pattern, pos),
                Atom::Sequence { atoms } => self.parse_sequence(atoms, pos),
                Atom::Alternative { atoms } => self.parse_alternative(atoms, pos),
                Atom::Repetition { atom, min, max } => {
                    self.parse_repetition(*atom, *min, *max, pos)
                }
                Atom::Named { name, atom } => self.parse_named(name, *atom, pos),
                Atom::Entity { atom } => self.parse_entity(*atom, pos),
                Atom::Lookahead { atom, positive } => self.parse_lookahead(*atom, *positive, pos),
                Atom::Ignore { atom } => {
                    let result = self.try_atom(*atom, pos)?;
                    Ok(ParseResult {
                        value: self.arena.input_ref(pos..result.end_pos),
                        end_pos: result.end_pos,
                    })
                }
            },
            None => Err(ParseError::Internal {
                message: format!("Invalid atom ID {}", atom_id),
            }),
        }
    }

    /// Parse a literal string
    #[inline]
    fn parse_str(&mut self, pattern: &str, pos: usize) -> Result<ParseResult, ParseError> {
        let end = pos + pattern.len();
        if end <= self.input_bytes.len() && &self.input_bytes[pos..end] == pattern.as_bytes() {
            return Ok(ParseResult {
                value: self.arena.input_ref(pos..end),
                end_pos: end,
            });
        }
        self.expect(pos, || format!("{:?}", pattern));
        Err(ParseError::Failed { position: pos })
    }

    /// Parse a regular expression anchored at `pos`
    #[inline]
    fn parse_re(&mut self, pattern: &str, pos: usize) -> Result<ParseResult, ParseError> {
        let regex =
            regex_cache::get_or_compile(pattern).map_err(|e| ParseError::InvalidGrammar {
                reason: format!("invalid regex {:?}: {}", pattern, e),
            })?;

        if let Some(m) = regex.find(&self.input[pos..]) {
            let end = pos + m.end();
            return Ok(ParseResult {
                value: self.arena.input_ref(pos..end),
                end_pos: end,
            });
        }
        self.expect(pos, || format!("/{}/", pattern));
        Err(ParseError::Failed { position: pos })
    }

    /// Parse a sequence of atoms
    fn parse_sequence(&mut self, atoms: &[usize], pos: usize) -> Result<ParseResult, ParseError> {
        let mut current_pos = pos;
        let mut items = Vec::with_capacity(atoms.len());

        for &atom_id in atoms {
            let result = self.try_atom(atom_id, current_pos)?;
            items.push(result.value);
            current_pos = result.end_pos;
        }

        Ok(ParseResult {
            value: self.arena.store_array(&items, pos..current_pos),
            end_pos: current_pos,
        })
    }

    /// Parse alternatives (ordered choice)
    fn parse_alternative(
        &mut self,
        atoms: &[usize],
        pos: usize,
    ) -> Result<ParseResult, ParseError> {
        for &atom_id in atoms {
            match self.try_atom(atom_id, pos) {
                Ok(result) => return Ok(result),
                Err(ParseError::Failed { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ParseError::Failed { position: pos })
    }

    /// Parse repetition (greedy, with min/max)
    fn parse_repetition(
        &mut self,
        atom_id: usize,
        min: usize,
        max: Option<usize>,
        pos: usize,
    ) -> Result<ParseResult, ParseError> {
        let mut current_pos = pos;
        let mut items: Vec<AstNode> = Vec::with_capacity(min.clamp(4, 64));

        while max.map_or(true, |max| items.len() < max) {
            match self.try_atom(atom_id, current_pos) {
                Ok(result) => {
                    items.push(result.value);
                    // A zero-width match would repeat forever
                    if result.end_pos == current_pos {
                        break;
                    }
                    current_pos = result.end_pos;
                }
                Err(ParseError::Failed { .. }) => break,
                Err(e) => return Err(e),
            }
        }

        if items.len() < min {
            return Err(ParseError::Failed { position: pos });
        }

        Ok(ParseResult {
            value: self.arena.store_array(&items, pos..current_pos),
            end_pos: current_pos,
        })
    }

    /// Parse a labelled capture
    fn parse_named(
        &mut self,
        name: &'a str,
        atom_id: usize,
        pos: usize,
    ) -> Result<ParseResult, ParseError> {
        self.context.push(name);
        let result = self.try_atom(atom_id, pos);
        self.context.pop();
        let result = result?;

        Ok(ParseResult {
            value: self.arena.store_hash(name, result.value, pos..result.end_pos),
            end_pos: result.end_pos,
        })
    }

    /// Parse a rule reference
    fn parse_entity(&mut self, atom_id: usize, pos: usize) -> Result<ParseResult, ParseError> {
        self.enter_recursive()?;
        let name = self.rule_names.get(&atom_id).copied();
        if let Some(name) = name {
            self.context.push(name);
        }
        let result = self.try_atom(atom_id, pos);
        if name.is_some() {
            self.context.pop();
        }
        self.exit_recursive();
        result
    }

    /// Parse lookahead (doesn't consume input)
    fn parse_lookahead(
        &mut self,
        atom_id: usize,
        positive: bool,
        pos: usize,
    ) -> Result<ParseResult, ParseError> {
        self.silent += 1;
        let matched = match self.try_atom(atom_id, pos) {
            Ok(_) => true,
            Err(ParseError::Failed { .. }) => false,
            Err(e) => {
                self.silent -= 1;
                return Err(e);
            }
        };
        self.silent -= 1;

        if matched == positive {
            return Ok(ParseResult {
                value: self.arena.nil(pos),
                end_pos: pos,
            });
        }

        let grammar = self.grammar;
        self.expect(pos, || {
            let inner = grammar
                .get_atom(atom_id)
                .map(Atom::describe)
                .unwrap_or_default();
            if positive {
                inner
            } else {
                format!("anything but {}", inner)
            }
        });
        Err(ParseError::Failed { position: pos })
    }
}
