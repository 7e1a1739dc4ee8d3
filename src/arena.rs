//! Flat node storage addressed by 32-bit indices.
//!
//! Nodes link to each other by [`NodeId`] rather than by pointer, so a trie is
//! a single `Vec` that moves, drops and grows as one allocation. Index 0 is
//! always the root and is never handed out by [`NodeArena::alloc`].

use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// Index of a node inside its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node arena with an optional free list.
///
/// Tries that never reclaim nodes simply never call [`NodeArena::release`].
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<T> {
    nodes: Vec<T>,
    free: Vec<NodeId>,
}

impl<T> NodeArena<T> {
    /// Creates an arena holding only `root`, with room for `capacity` nodes.
    pub(crate) fn with_root(root: T, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(root);
        Self {
            nodes,
            free: Vec::new(),
        }
    }

    /// Number of slots ever allocated, including released ones.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Fails unless `additional` more nodes can be allocated.
    ///
    /// Callers check before mutating so that a failed update leaves counts
    /// untouched.
    pub(crate) fn ensure_room(&self, additional: usize) -> Result<()> {
        let reusable = self.free.len().min(additional);
        let fresh = self.nodes.len() + (additional - reusable);
        if fresh > u32::MAX as usize {
            return Err(Error::CapacityExhausted);
        }
        Ok(())
    }

    /// Stores `node` and returns its index, reusing a released slot if any.
    pub(crate) fn alloc(&mut self, node: T) -> Result<NodeId> {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = node;
            return Ok(id);
        }
        let id = u32::try_from(self.nodes.len()).map_err(|_| Error::CapacityExhausted)?;
        self.nodes.push(node);
        Ok(NodeId(id))
    }

    /// Marks `id` as reusable. The slot's contents stay in place until reused.
    pub(crate) fn release(&mut self, id: NodeId) {
        debug_assert_ne!(id, NodeId::ROOT, "root is never released");
        self.free.push(id);
    }

    /// Number of released slots waiting for reuse.
    #[inline]
    pub(crate) fn free_len(&self) -> usize {
        self.free.len()
    }

    pub(crate) fn capacity_bytes(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<T>()
            + self.free.capacity() * std::mem::size_of::<NodeId>()
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
        self.free.shrink_to_fit();
    }
}

impl<T> Index<NodeId> for NodeArena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: NodeId) -> &T {
        &self.nodes[id.index()]
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.index()]
    }
}
