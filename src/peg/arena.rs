//! Arena allocator for parse tree nodes
//!
//! Children of sequences, repetitions and labelled captures are stored in
//! flat pools so a whole parse tree is freed in one step. Capture labels
//! are interned: a grammar only ever uses a handful of distinct labels.

use super::ast::AstNode;
use hashbrown::HashMap;
use std::hash::{Hash, Hasher};
use std::ops::Range;

/// Interned label entry
#[derive(Debug, Clone, Copy)]
struct KeyPoolEntry {
    /// Offset into the key data
    offset: u32,
    /// Length of the key in bytes
    length: u32,
}

/// Hash pool entry - label/value pair
#[derive(Debug, Clone, Copy)]
struct HashPoolEntry {
    /// Key pool index
    key_pool_index: u32,
    /// Value node
    value: AstNode,
}

/// The arena allocator
#[derive(Debug)]
pub struct AstArena {
    /// Label bytes, back to back
    key_data: String,
    /// Label (offset, length) pairs
    key_pool: Vec<KeyPoolEntry>,
    /// Label hash -> key pool index
    key_hash: HashMap<u64, u32>,
    /// Array pool - children stored contiguously per array
    array_pool: Vec<AstNode>,
    /// Hash pool - label/value pairs
    hash_pool: Vec<HashPoolEntry>,
}

impl Default for AstArena {
    fn default() -> Self {
        Self::new()
    }
}

impl AstArena {
    /// Create a new arena with default capacity
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new arena with specified initial capacity
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            key_data: String::with_capacity(256),
            key_pool: Vec::with_capacity(32),
            key_hash: HashMap::with_capacity(32),
            array_pool: Vec::with_capacity(capacity * 2),
            hash_pool: Vec::with_capacity(capacity),
        }
    }

    /// Create a new arena sized for a given input length
    ///
    /// Comment grammars produce a few nodes per line, so one node per
    /// eight bytes is a comfortable estimate.
    #[inline]
    pub fn for_input(input_len: usize) -> Self {
        Self::with_capacity((input_len / 8).clamp(64, 100_000))
    }

    /// Number of nodes held in the array pool
    #[inline]
    pub fn len(&self) -> usize {
        self.array_pool.len()
    }

    /// Check if the arena holds no parse data
    ///
    /// Interned labels survive a reset and are not counted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.array_pool.is_empty() && self.hash_pool.is_empty()
    }

    /// Create a reference to a slice of the original input
    #[inline]
    pub fn input_ref(&self, span: Range<usize>) -> AstNode {
        AstNode::InputRef {
            offset: span.start as u32,
            length: (span.end - span.start) as u32,
        }
    }

    /// Create a zero-width marker
    #[inline]
    pub fn nil(&self, offset: usize) -> AstNode {
        AstNode::Nil {
            offset: offset as u32,
        }
    }

    /// Store children that together consumed `span`
    pub fn store_array(&mut self, items: &[AstNode], span: Range<usize>) -> AstNode {
        let pool_index = self.array_pool.len() as u32;
        self.array_pool.extend_from_slice(items);
        AstNode::Array {
            offset: span.start as u32,
            length: (span.end - span.start) as u32,
            pool_index,
            count: items.len() as u32,
        }
    }

    /// Store a single labelled value
    pub fn store_hash(&mut self, key: &str, value: AstNode, span: Range<usize>) -> AstNode {
        let key_pool_index = self.intern_key(key);
        let pool_index = self.hash_pool.len() as u32;
        self.hash_pool.push(HashPoolEntry {
            key_pool_index,
            value,
        });
        AstNode::Hash {
            offset: span.start as u32,
            length: (span.end - span.start) as u32,
            pool_index,
            count: 1,
        }
    }

    /// Children of an array node (empty for any other node)
    #[inline]
    pub fn get_array(&self, node: &AstNode) -> &[AstNode] {
        match *node {
            AstNode::Array {
                pool_index, count, ..
            } => {
                let start = pool_index as usize;
                &self.array_pool[start..start + count as usize]
            }
            _ => &[],
        }
    }

    /// Label/value pairs of a hash node (empty for any other node)
    pub fn get_hash_items(&self, node: &AstNode) -> Vec<(&str, AstNode)> {
        match *node {
            AstNode::Hash {
                pool_index, count, ..
            } => {
                let start = pool_index as usize;
                self.hash_pool[start..start + count as usize]
                    .iter()
                    .map(|entry| (self.get_key(entry.key_pool_index as usize), entry.value))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Get an interned label by index
    #[inline]
    pub fn get_key(&self, pool_index: usize) -> &str {
        let entry = self.key_pool[pool_index];
        &self.key_data[entry.offset as usize..(entry.offset + entry.length) as usize]
    }

    fn intern_key(&mut self, key: &str) -> u32 {
        let hash = Self::hash_key(key);
        if let Some(&index) = self.key_hash.get(&hash) {
            if self.get_key(index as usize) == key {
                return index;
            }
        }

        let offset = self.key_data.len() as u32;
        self.key_data.push_str(key);
        self.key_pool.push(KeyPoolEntry {
            offset,
            length: key.len() as u32,
        });
        let index = (self.key_pool.len() - 1) as u32;
        // On a hash collision the first key keeps the slot
        self.key_hash.entry(hash).or_insert(index);
        index
    }

    #[inline]
    fn hash_key(key: &str) -> u64 {
        let mut hasher = ahash::AHasher::default();
        key.hash(&mut hasher);
        hasher.finish()
    }
}
