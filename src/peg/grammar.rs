//! Grammar types
//!
//! A grammar is a flat table of atoms that reference each other by index,
//! plus the names of the rules it was built from. Grammars are plain data:
//! they serialize to JSON and can be validated before use.

use super::ast::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Atom types that make up a grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Atom {
    /// Match a literal string
    Str {
        /// The string pattern to match
        pattern: String,
    },

    /// Match a regular expression anchored at the current position
    Re {
        /// The regex pattern to match
        pattern: String,
    },

    /// Match multiple atoms in sequence
    Sequence {
        /// Indices into atoms array
        atoms: Vec<usize>,
    },

    /// Try alternatives in order, first success wins
    Alternative {
        /// Indices into atoms array
        atoms: Vec<usize>,
    },

    /// Repeat an atom (greedy, with min/max)
    Repetition {
        /// Index into atoms array
        atom: usize,
        /// Minimum number of repetitions
        min: usize,
        /// Maximum number of repetitions (None = unlimited)
        max: Option<usize>,
    },

    /// Label the result
    Named {
        /// The label to give the result
        name: String,
        /// Index into atoms array
        atom: usize,
    },

    /// Reference to a rule (resolved by index)
    Entity {
        /// Index into atoms array
        atom: usize,
    },

    /// Lookahead (doesn't consume input)
    Lookahead {
        /// Index into atoms array
        atom: usize,
        /// Whether this is a positive lookahead
        positive: bool,
    },

    /// Match the inner atom but keep only its text
    Ignore {
        /// Index into atoms array
        atom: usize,
    },
}

impl Atom {
    /// Indices of the atoms this atom refers to
    pub fn children(&self) -> Vec<usize> {
        match self {
            Atom::Str { .. } | Atom::Re { .. } => Vec::new(),
            Atom::Sequence { atoms } | Atom::Alternative { atoms } => atoms.clone(),
            Atom::Repetition { atom, .. }
            | Atom::Named { atom, .. }
            | Atom::Entity { atom }
            | Atom::Lookahead { atom, .. }
            | Atom::Ignore { atom } => vec![*atom],
        }
    }

    /// Short human-readable description used in diagnostics
    pub fn describe(&self) -> String {
        match self {
            Atom::Str { pattern } => format!("{:?}", pattern),
            Atom::Re { pattern } => format!("/{}/", pattern),
            Atom::Sequence { .. } => "sequence".to_string(),
            Atom::Alternative { .. } => "alternative".to_string(),
            Atom::Repetition { .. } => "repetition".to_string(),
            Atom::Named { name, .. } => name.clone(),
            Atom::Entity { .. } => "rule".to_string(),
            Atom::Lookahead { positive: true, .. } => "lookahead".to_string(),
            Atom::Lookahead {
                positive: false, ..
            } => "negative lookahead".to_string(),
            Atom::Ignore { .. } => "ignored".to_string(),
        }
    }
}

/// A complete grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    /// All atoms in the grammar (referenced by index)
    pub atoms: Vec<Atom>,

    /// Index of the root atom
    pub root: usize,

    /// Rule names and the atoms they were built into
    #[serde(default)]
    pub rules: BTreeMap<String, usize>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    /// Create a new empty grammar
    #[inline]
    pub fn new() -> Self {
        Self {
            atoms: Vec::new(),
            root: 0,
            rules: BTreeMap::new(),
        }
    }

    /// Add an atom and return its index
    #[inline]
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        idx
    }

    /// Get an atom by index
    #[inline]
    pub fn get_atom(&self, idx: usize) -> Option<&Atom> {
        self.atoms.get(idx)
    }

    /// Get the root atom
    #[inline]
    pub fn root_atom(&self) -> Option<&Atom> {
        self.atoms.get(self.root)
    }

    /// Get total atom count
    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Atom index of a named rule
    #[inline]
    pub fn rule(&self, name: &str) -> Option<usize> {
        self.rules.get(name).copied()
    }

    /// Name of the rule built into `atom`, if any
    pub fn rule_name(&self, atom: usize) -> Option<&str> {
        self.rules
            .iter()
            .find(|(_, &idx)| idx == atom)
            .map(|(name, _)| name.as_str())
    }

    /// Check that every index points at an existing atom
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.atoms.get(self.root).is_none() {
            return Err(ParseError::InvalidGrammar {
                reason: format!("root atom {} does not exist", self.root),
            });
        }
        for (idx, atom) in self.atoms.iter().enumerate() {
            if let Some(missing) = atom.children().into_iter().find(|&c| c >= self.atoms.len()) {
                return Err(ParseError::InvalidGrammar {
                    reason: format!("atom {} refers to missing atom {}", idx, missing),
                });
            }
            if let Atom::Repetition {
                min, max: Some(max), ..
            } = atom
            {
                if max < min {
                    return Err(ParseError::InvalidGrammar {
                        reason: format!("atom {} repeats at most {} < {} times", idx, max, min),
                    });
                }
            }
        }
        for (name, &idx) in &self.rules {
            if idx >= self.atoms.len() {
                return Err(ParseError::InvalidGrammar {
                    reason: format!("rule {} refers to missing atom {}", name, idx),
                });
            }
        }
        Ok(())
    }

    /// Serialize to JSON
    #[inline]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON
    #[inline]
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_creation() {
        let mut grammar = Grammar::new();
        let idx = grammar.add_atom(Atom::Str {
            pattern: "@brief".to_string(),
        });
        assert_eq!(idx, 0);
        assert_eq!(grammar.atom_count(), 1);
        assert!(grammar.root_atom().is_some());
        assert!(grammar.validate().is_ok());
    }

    #[test]
    fn test_grammar_json_roundtrip() {
        let mut grammar = Grammar::new();
        let star = grammar.add_atom(Atom::Re {
            pattern: r"[\t ]*\*".to_string(),
        });
        let named = grammar.add_atom(Atom::Named {
            name: "prefix".to_string(),
            atom: star,
        });
        grammar.root = named;
        grammar.rules.insert("prefix".to_string(), named);

        let json = grammar.to_json().unwrap();
        let parsed = Grammar::from_json(&json).unwrap();
        assert_eq!(parsed, grammar);
        assert_eq!(parsed.rule("prefix"), Some(named));
        assert_eq!(parsed.rule_name(named), Some("prefix"));
    }

    #[test]
    fn test_grammar_json_without_rules() {
        let json = r#"{"atoms":[{"Str":{"pattern":"//"}}],"root":0}"#;
        let grammar = Grammar::from_json(json).unwrap();
        assert!(grammar.rules.is_empty());
    }

    #[test]
    fn test_validate_rejects_dangling_index() {
        let mut grammar = Grammar::new();
        grammar.add_atom(Atom::Sequence { atoms: vec![0, 7] });
        let err = grammar.validate().unwrap_err();
        assert!(matches!(err, ParseError::InvalidGrammar { .. }));
    }

    #[test]
    fn test_validate_rejects_missing_root() {
        let grammar = Grammar::new();
        assert!(grammar.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_repetition() {
        let mut grammar = Grammar::new();
        let s = grammar.add_atom(Atom::Str {
            pattern: "x".to_string(),
        });
        grammar.root = grammar.add_atom(Atom::Repetition {
            atom: s,
            min: 3,
            max: Some(1),
        });
        assert!(grammar.validate().is_err());
    }

    #[test]
    fn test_describe() {
        let atom = Atom::Str {
            pattern: "@endcode".to_string(),
        };
        assert_eq!(atom.describe(), "\"@endcode\"");
        let atom = Atom::Re {
            pattern: r"\S+".to_string(),
        };
        assert_eq!(atom.describe(), r"/\S+/");
    }
}
