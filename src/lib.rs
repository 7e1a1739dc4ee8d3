//! # bintrie
//!
//! A bit-trie multiset over fixed-width unsigned integers.
//!
//! Every operation is a single descent over the configured bit width: insert and
//! erase with multiplicity, rank and k-th smallest, nearest stored value on either
//! side, and maximal/minimal XOR against a query value. An O(1) lazy XOR can be
//! applied to every stored element at once; it only changes how stored bit
//! paths are read back, never the nodes themselves.
//!
//! ## Example
//!
//! ```rust
//! use bintrie::BinaryTrie;
//!
//! let mut trie: BinaryTrie<u32> = BinaryTrie::new();
//! trie.insert(1)?;
//! trie.insert_many(4, 2)?;
//! trie.insert(7)?;
//!
//! assert_eq!(trie.kth(2), Some(4));
//! assert_eq!(trie.count_less(5)?, 3);
//! assert_eq!(trie.lower_bound(5)?, Some(7));
//!
//! trie.xor_all(3)?; // {1, 4, 4, 7} -> {2, 7, 7, 4}
//! assert!(trie.contains(2)?);
//! assert_eq!(trie.max_xor(0)?, Some(7));
//! # Ok::<(), bintrie::Error>(())
//! ```
//!
//! The crate also ships a few small companion containers that do not share
//! anything with the bit-trie: [`string_trie`], [`interval_set`], [`lis`] and
//! [`rle`].

#![warn(missing_docs)]

mod arena;
mod error;
pub mod interval_set;
pub mod lis;
pub mod rle;
pub mod string_trie;
mod value;

use std::fmt;
use std::marker::PhantomData;

use arena::{NodeArena, NodeId};

pub use error::{Error, Result};
pub use value::{Multiplicity, TrieValue};

// =============================================================================
// Configuration
// =============================================================================

/// Construction parameters for [`BinaryTrie`].
#[derive(Debug, Clone, Default)]
pub struct TrieConfig {
    /// Number of low bits tracked per value. `None` uses the full width of the
    /// value type.
    pub bits: Option<u32>,
    /// Number of nodes to reserve up front.
    pub initial_capacity: usize,
}

// =============================================================================
// Bit utilities
// =============================================================================

#[inline]
fn bit_of(raw: u128, bit: u32) -> usize {
    ((raw >> bit) & 1) as usize
}

#[inline]
fn low_mask(bits: u32) -> u128 {
    if bits >= u128::BITS {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}

// =============================================================================
// Node
// =============================================================================

#[derive(Clone, Copy, Debug)]
struct Node<C> {
    /// Children indexed by *stored* bit.
    children: [Option<NodeId>; 2],
    /// Multiplicity of every value whose stored path passes through this node.
    subtree: C,
    /// Multiplicity of the value whose stored path ends here (depth B only).
    terminal: C,
}

impl<C: Multiplicity> Node<C> {
    const EMPTY: Self = Self {
        children: [None, None],
        subtree: C::ZERO,
        terminal: C::ZERO,
    };
}

/// Direction of a boundary search.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Bound {
    /// Smallest stored value `>=` the target.
    AtLeast,
    /// Largest stored value `<=` the target.
    AtMost,
}

impl Bound {
    /// Actual bit that leaves the target's prefix on the wanted side.
    #[inline]
    fn escape_bit(self) -> usize {
        match self {
            Bound::AtLeast => 1,
            Bound::AtMost => 0,
        }
    }

    /// Order in which actual bits are tried once the path is no longer tight.
    #[inline]
    fn preference(self) -> [usize; 2] {
        match self {
            Bound::AtLeast => [0, 1],
            Bound::AtMost => [1, 0],
        }
    }
}

// =============================================================================
// BinaryTrie
// =============================================================================

/// Multiset of `B`-bit unsigned integers stored as a binary trie.
///
/// - Nodes live in one arena and are never freed; emptied subtrees keep their
///   nodes with zero counts.
/// - Every node's `subtree` count equals its `terminal` count plus its
///   children's `subtree` counts.
/// - A lazy XOR mask reinterprets every stored path: the value stored along a
///   path is `actual ^ xor_mask`.
///
/// `C` is the multiplicity counter. Signed counters are accepted; negative
/// requests fail with [`Error::InvalidArgument`].
pub struct BinaryTrie<V, C = u64> {
    nodes: NodeArena<Node<C>>,
    bits: u32,
    bit_mask: u128,
    xor_mask: u128,
    _marker: PhantomData<V>,
}

impl<V: TrieValue, C: Multiplicity> BinaryTrie<V, C> {
    /// Creates an empty trie tracking every bit of `V`.
    pub fn new() -> Self {
        Self::build(V::BITS, 0)
    }

    /// Creates an empty trie tracking the low `bits` bits of `V`.
    ///
    /// Fails with [`Error::InvalidBitWidth`] unless `1 <= bits <= V::BITS`.
    pub fn with_bits(bits: u32) -> Result<Self> {
        Self::with_config(TrieConfig {
            bits: Some(bits),
            ..TrieConfig::default()
        })
    }

    /// Creates an empty trie from a [`TrieConfig`].
    pub fn with_config(config: TrieConfig) -> Result<Self> {
        let bits = config.bits.unwrap_or(V::BITS);
        if bits == 0 || bits > V::BITS {
            return Err(Error::InvalidBitWidth {
                bits,
                max: V::BITS,
            });
        }
        Ok(Self::build(bits, config.initial_capacity))
    }

    fn build(bits: u32, initial_capacity: usize) -> Self {
        log::debug!(
            "creating binary trie: bits={}, initial_capacity={}",
            bits,
            initial_capacity
        );
        Self {
            nodes: NodeArena::with_root(Node::EMPTY, initial_capacity),
            bits,
            bit_mask: low_mask(bits),
            xor_mask: 0,
            _marker: PhantomData,
        }
    }

    /// Configured bit width.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// All `bits()` low bits set.
    #[inline]
    pub fn bit_mask(&self) -> V {
        V::from_u128(self.bit_mask)
    }

    /// Mask currently XORed into every stored value.
    #[inline]
    pub fn xor_mask(&self) -> V {
        V::from_u128(self.xor_mask)
    }

    /// Total multiplicity. O(1).
    #[inline]
    pub fn total_count(&self) -> C {
        self.nodes[NodeId::ROOT].subtree
    }

    /// Whether the multiset holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_count() <= C::ZERO
    }

    /// Number of nodes ever created, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Bytes reserved by the node arena.
    pub fn memory_usage(&self) -> usize {
        self.nodes.capacity_bytes()
    }

    /// Releases spare arena capacity. Nodes themselves are kept.
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Inserts one copy of `value`.
    pub fn insert(&mut self, value: V) -> Result<()> {
        self.insert_many(value, C::ONE)
    }

    /// Inserts `count` copies of `value`. A zero count is a no-op.
    ///
    /// On error the trie is left unchanged.
    pub fn insert_many(&mut self, value: V, count: C) -> Result<()> {
        let raw = self.check_value(value)?;
        check_count(count)?;
        if count == C::ZERO {
            return Ok(());
        }
        let total = self
            .total_count()
            .checked_add(count)
            .ok_or(Error::CountOverflow)?;
        self.nodes.ensure_room(self.bits as usize)?;

        let stored = self.to_stored(raw);
        let mut node = NodeId::ROOT;
        self.nodes[node].subtree = total;
        for bit in (0..self.bits).rev() {
            let dir = bit_of(stored, bit);
            node = match self.nodes[node].children[dir] {
                Some(child) => child,
                None => {
                    let child = self.nodes.alloc(Node::EMPTY)?;
                    self.nodes[node].children[dir] = Some(child);
                    child
                }
            };
            // Cannot overflow: every count on the path is bounded by the root's.
            self.nodes[node].subtree += count;
        }
        self.nodes[node].terminal += count;
        Ok(())
    }

    /// Removes one copy of `value` if present. Returns how many were removed.
    pub fn erase(&mut self, value: V) -> Result<C> {
        self.erase_many(value, C::ONE)
    }

    /// Removes up to `count` copies of `value`. Returns how many were removed.
    ///
    /// Removing more copies than are stored removes all of them; a missing
    /// value is a no-op.
    pub fn erase_many(&mut self, value: V, count: C) -> Result<C> {
        let raw = self.check_value(value)?;
        check_count(count)?;
        if count == C::ZERO {
            return Ok(C::ZERO);
        }
        let stored = self.to_stored(raw);
        let Some(leaf) = self.find_terminal(stored) else {
            return Ok(C::ZERO);
        };
        let removable = count.min(self.nodes[leaf].terminal);
        if removable == C::ZERO {
            return Ok(C::ZERO);
        }
        if removable < count {
            log::trace!(
                "erase of {:?} clamped: requested {:?}, removed {:?}",
                value,
                count,
                removable
            );
        }

        self.nodes[leaf].terminal -= removable;
        let mut node = NodeId::ROOT;
        self.nodes[node].subtree -= removable;
        for bit in (0..self.bits).rev() {
            let Some(child) = self.nodes[node].children[bit_of(stored, bit)] else {
                break;
            };
            node = child;
            self.nodes[node].subtree -= removable;
        }
        Ok(removable)
    }

    /// XORs every stored value with `mask`. O(1); no node is touched.
    pub fn xor_all(&mut self, mask: V) -> Result<()> {
        let raw = self.check_value(mask)?;
        self.xor_mask ^= raw;
        log::trace!("lazy xor mask is now {:#x}", self.xor_mask);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Multiplicity of `value`.
    pub fn count(&self, value: V) -> Result<C> {
        let raw = self.check_value(value)?;
        Ok(self
            .find_terminal(self.to_stored(raw))
            .map_or(C::ZERO, |leaf| self.nodes[leaf].terminal))
    }

    /// Whether at least one copy of `value` is stored.
    pub fn contains(&self, value: V) -> Result<bool> {
        Ok(self.count(value)? > C::ZERO)
    }

    /// Number of stored values strictly less than `value`.
    pub fn count_less(&self, value: V) -> Result<C> {
        let raw = self.check_value(value)?;
        let mut less = C::ZERO;
        let mut node = Some(NodeId::ROOT);
        for bit in (0..self.bits).rev() {
            let Some(id) = node else {
                break;
            };
            let zero = self.child_for_actual_bit(id, bit, 0);
            if bit_of(raw, bit) == 1 {
                // Everything under the actual-0 branch is smaller whatever follows.
                less += self.subtree(zero);
                node = self.child_for_actual_bit(id, bit, 1);
            } else {
                node = zero;
            }
        }
        Ok(less)
    }

    /// Number of stored values strictly greater than `value`.
    pub fn count_greater(&self, value: V) -> Result<C> {
        let less = self.count_less(value)?;
        let equal = self.count(value)?;
        Ok(self.total_count() - less - equal)
    }

    /// The `k`-th smallest stored value, 0-indexed, duplicates counted.
    ///
    /// `None` when `k` is negative or not below [`Self::total_count`].
    pub fn kth(&self, k: C) -> Option<V> {
        if k.is_negative() || k >= self.total_count() {
            return None;
        }
        let mut node = NodeId::ROOT;
        let mut remaining = k;
        let mut actual = 0u128;
        for bit in (0..self.bits).rev() {
            let zero = self.child_for_actual_bit(node, bit, 0);
            let zero_count = self.subtree(zero);
            if remaining < zero_count {
                node = zero?;
                continue;
            }
            remaining -= zero_count;
            let one = self.child_for_actual_bit(node, bit, 1)?;
            if self.nodes[one].subtree <= C::ZERO {
                return None;
            }
            node = one;
            actual |= 1u128 << bit;
        }
        Some(V::from_u128(actual))
    }

    /// Smallest stored value `>= value`.
    pub fn lower_bound(&self, value: V) -> Result<Option<V>> {
        self.bound(value, Bound::AtLeast)
    }

    /// Largest stored value `<= value`.
    pub fn prev(&self, value: V) -> Result<Option<V>> {
        self.bound(value, Bound::AtMost)
    }

    /// Maximum of `x ^ value` over stored `x`. `None` when empty.
    pub fn max_xor(&self, value: V) -> Result<Option<V>> {
        self.extreme_xor(value, true)
    }

    /// Minimum of `x ^ value` over stored `x`. `None` when empty.
    pub fn min_xor(&self, value: V) -> Result<Option<V>> {
        self.extreme_xor(value, false)
    }

    /// Iterates `(value, multiplicity)` over distinct stored values in
    /// ascending order.
    pub fn iter(&self) -> Iter<'_, V, C> {
        Iter {
            trie: self,
            stack: vec![(NodeId::ROOT, self.bits, 0)],
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn check_value(&self, value: V) -> Result<u128> {
        let raw = value.to_u128();
        if raw & !self.bit_mask != 0 {
            return Err(Error::OutOfRange {
                value: raw,
                bits: self.bits,
            });
        }
        Ok(raw)
    }

    #[inline]
    fn to_stored(&self, actual: u128) -> u128 {
        (actual ^ self.xor_mask) & self.bit_mask
    }

    #[inline]
    fn to_actual(&self, stored: u128) -> u128 {
        (stored ^ self.xor_mask) & self.bit_mask
    }

    #[inline]
    fn subtree(&self, node: Option<NodeId>) -> C {
        node.map_or(C::ZERO, |id| self.nodes[id].subtree)
    }

    /// Child of `node` holding values whose *actual* bit at `bit` is `actual_bit`.
    #[inline]
    fn child_for_actual_bit(&self, node: NodeId, bit: u32, actual_bit: usize) -> Option<NodeId> {
        self.nodes[node].children[actual_bit ^ bit_of(self.xor_mask, bit)]
    }

    fn find_terminal(&self, stored: u128) -> Option<NodeId> {
        let mut node = NodeId::ROOT;
        for bit in (0..self.bits).rev() {
            node = self.nodes[node].children[bit_of(stored, bit)]?;
        }
        Some(node)
    }

    fn bound(&self, value: V, bound: Bound) -> Result<Option<V>> {
        let raw = self.check_value(value)?;
        Ok(self
            .find_bound(NodeId::ROOT, self.bits, raw, 0, true, bound)
            .map(V::from_u128))
    }

    /// Boundary descent below `node`, which sits `depth` levels above the leaves.
    ///
    /// `prefix` holds the actual bits chosen so far; `tight` is true while they
    /// equal `target`'s.
    fn find_bound(
        &self,
        node: NodeId,
        depth: u32,
        target: u128,
        prefix: u128,
        tight: bool,
        bound: Bound,
    ) -> Option<u128> {
        let current = &self.nodes[node];
        if current.subtree <= C::ZERO {
            return None;
        }
        if depth == 0 {
            return (current.terminal > C::ZERO).then_some(prefix);
        }
        let bit = depth - 1;
        let descend = |actual_bit: usize, tight: bool| {
            self.child_for_actual_bit(node, bit, actual_bit).and_then(|child| {
                let prefix = prefix | ((actual_bit as u128) << bit);
                self.find_bound(child, bit, target, prefix, tight, bound)
            })
        };

        if tight {
            let target_bit = bit_of(target, bit);
            if let Some(found) = descend(target_bit, true) {
                return Some(found);
            }
            let escape = bound.escape_bit();
            if target_bit == escape {
                return None;
            }
            return descend(escape, false);
        }
        bound
            .preference()
            .into_iter()
            .find_map(|actual_bit| descend(actual_bit, false))
    }

    fn extreme_xor(&self, value: V, maximize: bool) -> Result<Option<V>> {
        let raw = self.check_value(value)?;
        if self.is_empty() {
            return Ok(None);
        }
        let key = self.to_stored(raw);
        let mut node = NodeId::ROOT;
        let mut stored = 0u128;
        for bit in (0..self.bits).rev() {
            let preferred = bit_of(key, bit) ^ usize::from(maximize);
            let pick = [preferred, preferred ^ 1].into_iter().find_map(|dir| {
                self.nodes[node].children[dir]
                    .filter(|&child| self.nodes[child].subtree > C::ZERO)
                    .map(|child| (dir, child))
            });
            let Some((dir, child)) = pick else {
                return Ok(None);
            };
            stored |= (dir as u128) << bit;
            node = child;
        }
        Ok(Some(V::from_u128(self.to_actual(stored) ^ raw)))
    }
}

fn check_count<C: Multiplicity>(count: C) -> Result<()> {
    if count.is_negative() {
        return Err(Error::InvalidArgument {
            reason: "multiplicity must not be negative",
        });
    }
    Ok(())
}

impl<V: TrieValue, C: Multiplicity> Default for BinaryTrie<V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: TrieValue, C: Multiplicity> fmt::Debug for BinaryTrie<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V: TrieValue, C: Multiplicity> IntoIterator for &'a BinaryTrie<V, C> {
    type Item = (V, C);
    type IntoIter = Iter<'a, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over `(value, multiplicity)` pairs of a [`BinaryTrie`].
pub struct Iter<'a, V, C> {
    trie: &'a BinaryTrie<V, C>,
    /// Pending subtrees as (node, depth above the leaves, actual prefix).
    stack: Vec<(NodeId, u32, u128)>,
}

impl<'a, V: TrieValue, C: Multiplicity> Iterator for Iter<'a, V, C> {
    type Item = (V, C);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, depth, prefix)) = self.stack.pop() {
            let node = &self.trie.nodes[id];
            if node.subtree <= C::ZERO {
                continue;
            }
            if depth == 0 {
                if node.terminal > C::ZERO {
                    return Some((V::from_u128(prefix), node.terminal));
                }
                continue;
            }
            let bit = depth - 1;
            // Push the actual-1 branch first so the actual-0 branch pops first.
            for actual_bit in [1usize, 0] {
                if let Some(child) = self.trie.child_for_actual_bit(id, bit, actual_bit) {
                    self.stack
                        .push((child, bit, prefix | ((actual_bit as u128) << bit)));
                }
            }
        }
        None
    }
}


#[cfg(test)]
mod proptests;
