//! Multiset of strings over a contiguous byte alphabet.
//!
//! Each node counts the strings passing through it (`prefix`) and the strings
//! ending at it (`end`), which makes prefix counting a single descent. Unlike
//! [`BinaryTrie`](crate::BinaryTrie), subtrees cut off by
//! [`StringTrie::remove_with_prefix`] are recycled through the arena free list.
//!
//! ```rust
//! use bintrie::string_trie::LowercaseTrie;
//!
//! let mut trie: LowercaseTrie = LowercaseTrie::new();
//! trie.insert("abc")?;
//! trie.insert("abd")?;
//! assert_eq!(trie.count_with_prefix("ab"), 2);
//!
//! trie.remove_with_prefix("abc");
//! assert_eq!(trie.total_count(), 1);
//! # Ok::<(), bintrie::Error>(())
//! ```

use smallvec::SmallVec;

use crate::arena::{NodeArena, NodeId};
use crate::error::{Error, Result};
use crate::value::Multiplicity;

/// Trie over lowercase ASCII letters.
pub type LowercaseTrie<C = u64> = StringTrie<26, b'a', C>;

/// Trie over ASCII decimal digits.
pub type DigitTrie<C = u64> = StringTrie<10, b'0', C>;

/// Root-to-node path; most words fit inline.
type Path = SmallVec<[NodeId; 32]>;

#[derive(Clone, Copy, Debug)]
struct Node<const SIZE: usize, C> {
    children: [Option<NodeId>; SIZE],
    prefix: C,
    end: C,
}

impl<const SIZE: usize, C: Multiplicity> Node<SIZE, C> {
    const EMPTY: Self = Self {
        children: [None; SIZE],
        prefix: C::ZERO,
        end: C::ZERO,
    };
}

/// Multiset of strings whose bytes lie in `[BASE, BASE + SIZE)`.
#[derive(Clone, Debug)]
pub struct StringTrie<const SIZE: usize, const BASE: u8, C = u64> {
    nodes: NodeArena<Node<SIZE, C>>,
}

impl<const SIZE: usize, const BASE: u8, C: Multiplicity> StringTrie<SIZE, BASE, C> {
    /// Creates an empty trie.
    pub fn new() -> Self {
        Self {
            nodes: NodeArena::with_root(Node::EMPTY, 0),
        }
    }

    #[inline]
    fn slot(symbol: u8) -> Option<usize> {
        let idx = symbol.checked_sub(BASE)? as usize;
        (idx < SIZE).then_some(idx)
    }

    /// Inserts one copy of `word`.
    pub fn insert(&mut self, word: impl AsRef<[u8]>) -> Result<()> {
        self.insert_many(word, C::ONE)
    }

    /// Inserts `count` copies of `word`.
    ///
    /// Every byte is validated before anything is modified.
    pub fn insert_many(&mut self, word: impl AsRef<[u8]>, count: C) -> Result<()> {
        let word = word.as_ref();
        if count.is_negative() {
            return Err(Error::InvalidArgument {
                reason: "multiplicity must not be negative",
            });
        }
        let slots = word
            .iter()
            .map(|&symbol| Self::slot(symbol).ok_or(Error::InvalidSymbol { symbol }))
            .collect::<Result<SmallVec<[usize; 32]>>>()?;
        if count == C::ZERO {
            return Ok(());
        }
        let total = self
            .total_count()
            .checked_add(count)
            .ok_or(Error::CountOverflow)?;
        self.nodes.ensure_room(slots.len())?;

        let mut node = NodeId::ROOT;
        self.nodes[node].prefix = total;
        for slot in slots {
            node = match self.nodes[node].children[slot] {
                Some(child) => child,
                None => {
                    let child = self.nodes.alloc(Node::EMPTY)?;
                    self.nodes[node].children[slot] = Some(child);
                    child
                }
            };
            self.nodes[node].prefix += count;
        }
        self.nodes[node].end += count;
        Ok(())
    }

    /// Removes one copy of `word` if present. Returns how many were removed.
    pub fn remove(&mut self, word: impl AsRef<[u8]>) -> Result<C> {
        self.remove_many(word, C::ONE)
    }

    /// Removes up to `count` copies of `word`. Returns how many were removed.
    pub fn remove_many(&mut self, word: impl AsRef<[u8]>, count: C) -> Result<C> {
        if count.is_negative() {
            return Err(Error::InvalidArgument {
                reason: "multiplicity must not be negative",
            });
        }
        if count == C::ZERO {
            return Ok(C::ZERO);
        }
        let mut path = Path::new();
        let Some(node) = self.find_node(word.as_ref(), Some(&mut path)) else {
            return Ok(C::ZERO);
        };
        let removable = count.min(self.nodes[node].end);
        if removable > C::ZERO {
            self.nodes[node].end -= removable;
            self.subtract_along(&path, removable);
        }
        Ok(removable)
    }

    /// Removes every stored string starting with `prefix`. Returns the removed
    /// multiplicity.
    ///
    /// The detached subtree's nodes go back to the free list. An empty prefix
    /// clears the trie.
    pub fn remove_with_prefix(&mut self, prefix: impl AsRef<[u8]>) -> C {
        let prefix = prefix.as_ref();
        let mut path = Path::new();
        let Some(node) = self.find_node(prefix, Some(&mut path)) else {
            return C::ZERO;
        };
        let removed = self.nodes[node].prefix;
        if removed <= C::ZERO {
            return C::ZERO;
        }
        if let (Some(&last), [.., parent, _]) = (prefix.last(), path.as_slice()) {
            let parent = *parent;
            self.subtract_along(&path[..path.len() - 1], removed);
            if let Some(slot) = Self::slot(last) {
                self.nodes[parent].children[slot] = None;
            }
        }
        self.clear_subtree(node);
        removed
    }

    /// Removes every stored string that is a prefix of `word`, the empty
    /// string included. Returns the removed multiplicity.
    pub fn remove_prefixes_of(&mut self, word: impl AsRef<[u8]>) -> C {
        let mut removed = C::ZERO;
        let mut path = Path::new();
        let mut node = NodeId::ROOT;
        path.push(node);
        removed += self.take_end(node, &path);
        for &symbol in word.as_ref() {
            let Some(child) = Self::slot(symbol).and_then(|slot| self.nodes[node].children[slot])
            else {
                break;
            };
            node = child;
            path.push(node);
            removed += self.take_end(node, &path);
        }
        removed
    }

    /// Total multiplicity. O(1).
    #[inline]
    pub fn total_count(&self) -> C {
        self.nodes[NodeId::ROOT].prefix
    }

    /// Whether the trie holds no strings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_count() <= C::ZERO
    }

    /// Multiplicity of `word`.
    pub fn count(&self, word: impl AsRef<[u8]>) -> C {
        self.find_node(word.as_ref(), None)
            .map_or(C::ZERO, |node| self.nodes[node].end)
    }

    /// Total multiplicity of strings that start with `prefix`.
    pub fn count_with_prefix(&self, prefix: impl AsRef<[u8]>) -> C {
        self.find_node(prefix.as_ref(), None)
            .map_or(C::ZERO, |node| self.nodes[node].prefix)
    }

    /// Total multiplicity of stored strings that are prefixes of `word`.
    pub fn count_prefixes_of(&self, word: impl AsRef<[u8]>) -> C {
        let mut node = NodeId::ROOT;
        let mut total = self.nodes[node].end;
        for &symbol in word.as_ref() {
            let Some(child) = Self::slot(symbol).and_then(|slot| self.nodes[node].children[slot])
            else {
                break;
            };
            node = child;
            total += self.nodes[node].end;
        }
        total
    }

    /// Whether `word` is stored.
    pub fn contains(&self, word: impl AsRef<[u8]>) -> bool {
        self.count(word) > C::ZERO
    }

    /// Whether any stored string starts with `prefix`.
    pub fn contains_with_prefix(&self, prefix: impl AsRef<[u8]>) -> bool {
        self.count_with_prefix(prefix) > C::ZERO
    }

    /// Whether any stored string is a prefix of `word`.
    pub fn contains_prefix_of(&self, word: impl AsRef<[u8]>) -> bool {
        self.count_prefixes_of(word) > C::ZERO
    }

    /// Length of the longest prefix of `word` present as a path in the trie.
    ///
    /// Paths emptied by [`Self::remove`] still count until they are detached.
    pub fn lcp_with(&self, word: impl AsRef<[u8]>) -> usize {
        let word = word.as_ref();
        let mut node = NodeId::ROOT;
        for (depth, &symbol) in word.iter().enumerate() {
            match Self::slot(symbol).and_then(|slot| self.nodes[node].children[slot]) {
                Some(child) => node = child,
                None => return depth,
            }
        }
        word.len()
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.nodes.free_len()
    }

    fn find_node(&self, word: &[u8], mut path: Option<&mut Path>) -> Option<NodeId> {
        let mut node = NodeId::ROOT;
        if let Some(path) = path.as_deref_mut() {
            path.clear();
            path.push(node);
        }
        for &symbol in word {
            node = self.nodes[node].children[Self::slot(symbol)?]?;
            if let Some(path) = path.as_deref_mut() {
                path.push(node);
            }
        }
        Some(node)
    }

    /// Zeroes the end count of the last node on `path` and fixes the prefix
    /// counts above it.
    fn take_end(&mut self, node: NodeId, path: &[NodeId]) -> C {
        let end = self.nodes[node].end;
        if end <= C::ZERO {
            return C::ZERO;
        }
        self.nodes[node].end = C::ZERO;
        self.subtract_along(path, end);
        end
    }

    fn subtract_along(&mut self, path: &[NodeId], amount: C) {
        for &id in path {
            let node = &mut self.nodes[id];
            node.prefix = if node.prefix > amount {
                node.prefix - amount
            } else {
                C::ZERO
            };
        }
    }

    /// Resets every node below and including `start`, releasing all but the root.
    fn clear_subtree(&mut self, start: NodeId) {
        let mut stack: Path = SmallVec::new();
        stack.push(start);
        let mut released = 0usize;
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id];
            stack.extend(node.children.iter_mut().filter_map(Option::take));
            node.prefix = C::ZERO;
            node.end = C::ZERO;
            if id != NodeId::ROOT {
                self.nodes.release(id);
                released += 1;
            }
        }
        log::trace!("string trie released {} nodes", released);
    }
}

impl<const SIZE: usize, const BASE: u8, C: Multiplicity> Default for StringTrie<SIZE, BASE, C> {
    fn default() -> Self {
        Self::new()
    }
}
