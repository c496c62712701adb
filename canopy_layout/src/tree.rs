// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree structure and mutation: links, dirty tracking, queries, statistics.

use core::cell::Cell;

use crate::arena::Arena;
use crate::types::{LayoutError, NodeId, Rect, Style, NULL_HANDLE};

/// The layout engine: an arena-backed forest of styled nodes.
///
/// Capacity is fixed at construction and never grows. Mutations mark the
/// touched node and all of its ancestors dirty; [`LayoutTree::compute`]
/// re-solves exactly the dirty regions (reusing cached results elsewhere)
/// and leaves the whole forest clean.
///
/// Fallible operations return a typed [`LayoutError`]. Total queries given a
/// stale handle return a neutral value (zero rect, `None`) and record
/// [`LayoutError::InvalidNode`] on the instance's last-error slot, readable
/// via [`LayoutTree::last_error`]. The slot makes the type `!Sync`, matching
/// the single-threaded contract.
pub struct LayoutTree {
    pub(crate) arena: Arena,
    /// Head of the root sibling chain.
    pub(crate) first_root: u32,
    pub(crate) cache_hits: u32,
    pub(crate) cache_misses: u32,
    last_error: Cell<Option<LayoutError>>,
}

impl core::fmt::Debug for LayoutTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutTree")
            .field("capacity", &self.arena.capacity())
            .field("nodes_alive", &self.arena.live())
            .field("free_list", &self.arena.free_len())
            .field("dirty", &self.dirty_count())
            .field("cache_hits", &self.cache_hits)
            .field("cache_misses", &self.cache_misses)
            .finish_non_exhaustive()
    }
}

impl LayoutTree {
    /// Create an engine that can hold up to `max_nodes` nodes.
    pub fn new(max_nodes: u32) -> Self {
        Self {
            arena: Arena::with_capacity(max_nodes),
            first_root: NULL_HANDLE,
            cache_hits: 0,
            cache_misses: 0,
            last_error: Cell::new(None),
        }
    }

    /// The fixed node capacity chosen at construction.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Number of live nodes in the forest.
    pub fn node_count(&self) -> usize {
        self.arena.live()
    }

    /// Number of live nodes currently marked dirty.
    pub fn dirty_count(&self) -> usize {
        self.arena.iter_live().filter(|(_, n)| n.dirty).count()
    }

    /// The error recorded by the most recent failing call, if any.
    pub fn last_error(&self) -> Option<LayoutError> {
        self.last_error.get()
    }

    pub(crate) fn record(&self, err: LayoutError) {
        self.last_error.set(Some(err));
    }

    /// Whether the handle refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.arena.validate(id)
    }

    /// Add a node under `parent`, or as a new root when `parent` is `None`.
    ///
    /// The child is appended at the end of the sibling chain; sibling order
    /// is insertion order. The new node and all its ancestors become dirty.
    pub fn add(&mut self, parent: Option<NodeId>, style: &Style) -> Result<NodeId, LayoutError> {
        if let Some(p) = parent
            && !self.arena.validate(p)
        {
            self.record(LayoutError::InvalidNode);
            return Err(LayoutError::InvalidNode);
        }
        let child = match self.arena.alloc(*style) {
            Ok(c) => c,
            Err(e) => {
                self.record(e);
                return Err(e);
            }
        };
        self.append(child, parent);
        if let Some(p) = parent {
            self.mark_dirty_upward(p);
        }
        Ok(child)
    }

    /// Remove a node and its whole subtree, recycling the slots.
    ///
    /// The former parent (if any) becomes dirty. A stale handle is a no-op
    /// that records [`LayoutError::InvalidNode`].
    pub fn remove(&mut self, id: NodeId) {
        if !self.arena.validate(id) {
            self.record(LayoutError::InvalidNode);
            return;
        }
        let parent = self.arena.node(id).parent;
        self.detach(id);
        self.free_subtree(id);
        if parent != NULL_HANDLE {
            self.mark_dirty_upward(NodeId::from_index(parent));
        }
    }

    /// Replace a node's style and mark it (and its ancestors) dirty.
    pub fn set_style(&mut self, id: NodeId, style: &Style) {
        match self.arena.get_mut(id) {
            Some(n) => {
                n.style = *style;
                self.mark_dirty_upward(id);
            }
            None => self.record(LayoutError::InvalidNode),
        }
    }

    /// Move a node (with its subtree) under a new parent.
    ///
    /// Fails with [`LayoutError::CycleDetected`] when the proposed parent
    /// lies inside the moved node's subtree (including the node itself); the
    /// tree is left unchanged in that case. The old parent, the new parent,
    /// and the node itself become dirty.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), LayoutError> {
        if !self.arena.validate(id) {
            self.record(LayoutError::InvalidNode);
            return Err(LayoutError::InvalidNode);
        }
        if let Some(np) = new_parent {
            if !self.arena.validate(np) {
                self.record(LayoutError::InvalidNode);
                return Err(LayoutError::InvalidNode);
            }
            // The proposed parent is in id's subtree iff walking its parent
            // chain passes through id.
            let mut cur = np.to_raw();
            while cur != NULL_HANDLE {
                if cur == id.to_raw() {
                    self.record(LayoutError::CycleDetected);
                    return Err(LayoutError::CycleDetected);
                }
                cur = self.arena.at(cur).parent;
            }
        }
        let old_parent = self.arena.node(id).parent;
        self.detach(id);
        self.append(id, new_parent);
        if old_parent != NULL_HANDLE {
            self.mark_dirty_upward(NodeId::from_index(old_parent));
        }
        self.arena.node_mut(id).dirty = true;
        if let Some(np) = new_parent {
            self.mark_dirty_upward(np);
        }
        Ok(())
    }

    /// The parent of a node, or `None` for roots and stale handles.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        match self.arena.get(id) {
            Some(n) => NodeId::from_raw(n.parent),
            None => {
                self.record(LayoutError::InvalidNode);
                None
            }
        }
    }

    /// The first child of a node, or `None` for leaves and stale handles.
    pub fn first_child_of(&self, id: NodeId) -> Option<NodeId> {
        match self.arena.get(id) {
            Some(n) => NodeId::from_raw(n.first_child),
            None => {
                self.record(LayoutError::InvalidNode);
                None
            }
        }
    }

    /// The next sibling of a node, or `None` for last children and stale handles.
    pub fn next_sibling_of(&self, id: NodeId) -> Option<NodeId> {
        match self.arena.get(id) {
            Some(n) => NodeId::from_raw(n.next_sibling),
            None => {
                self.record(LayoutError::InvalidNode);
                None
            }
        }
    }

    /// The style of a live node.
    pub fn style(&self, id: NodeId) -> Option<&Style> {
        match self.arena.get(id) {
            Some(n) => Some(&n.style),
            None => {
                self.record(LayoutError::InvalidNode);
                None
            }
        }
    }

    /// The rectangle computed by the last layout pass.
    ///
    /// Stale handles yield [`Rect::ZERO`] and record the error.
    pub fn rect(&self, id: NodeId) -> Rect {
        match self.arena.get(id) {
            Some(n) => n.rect,
            None => {
                self.record(LayoutError::InvalidNode);
                Rect::ZERO
            }
        }
    }

    /// Cache hit rate of the most recent [`LayoutTree::compute`] pass,
    /// `0.0` when nothing has been counted.
    pub fn cache_hit_rate(&self) -> f32 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            #[allow(
                clippy::cast_precision_loss,
                reason = "counters are far below f32 integer range"
            )]
            {
                self.cache_hits as f32 / total as f32
            }
        }
    }

    /// Zero the cache statistics.
    pub fn reset_stats(&mut self) {
        self.cache_hits = 0;
        self.cache_misses = 0;
    }

    // --- internals ---

    /// Append `id` at the end of `parent`'s sibling chain (or the root chain).
    ///
    /// O(k) in the existing child count; the chain keeps no tail pointer.
    fn append(&mut self, id: NodeId, parent: Option<NodeId>) {
        let raw = id.to_raw();
        let head = match parent {
            Some(p) => {
                self.arena.node_mut(id).parent = p.to_raw();
                self.arena.node(p).first_child
            }
            None => {
                self.arena.node_mut(id).parent = NULL_HANDLE;
                self.first_root
            }
        };
        if head == NULL_HANDLE {
            match parent {
                Some(p) => self.arena.node_mut(p).first_child = raw,
                None => self.first_root = raw,
            }
            return;
        }
        let mut cur = head;
        loop {
            let next = self.arena.at(cur).next_sibling;
            if next == NULL_HANDLE {
                break;
            }
            cur = next;
        }
        self.arena.at_mut(cur).next_sibling = raw;
    }

    /// Unlink `id` from its sibling chain, leaving its subtree intact.
    fn detach(&mut self, id: NodeId) {
        let raw = id.to_raw();
        let parent_raw = self.arena.node(id).parent;
        let head = if parent_raw == NULL_HANDLE {
            self.first_root
        } else {
            self.arena.at(parent_raw).first_child
        };
        if head == raw {
            let next = self.arena.node(id).next_sibling;
            if parent_raw == NULL_HANDLE {
                self.first_root = next;
            } else {
                self.arena.at_mut(parent_raw).first_child = next;
            }
        } else {
            let mut cur = head;
            while cur != NULL_HANDLE {
                let next = self.arena.at(cur).next_sibling;
                if next == raw {
                    let after = self.arena.node(id).next_sibling;
                    self.arena.at_mut(cur).next_sibling = after;
                    break;
                }
                cur = next;
            }
        }
        let n = self.arena.node_mut(id);
        n.parent = NULL_HANDLE;
        n.next_sibling = NULL_HANDLE;
    }

    /// Mark `id` and every ancestor dirty.
    ///
    /// Stops early at an already-dirty node: its ancestors are dirty by
    /// the propagation invariant.
    fn mark_dirty_upward(&mut self, id: NodeId) {
        let mut cur = id.to_raw();
        while cur != NULL_HANDLE {
            let n = self.arena.at_mut(cur);
            if n.dirty {
                break;
            }
            n.dirty = true;
            cur = n.parent;
        }
    }

    /// Free `id` and its descendants in post-order.
    fn free_subtree(&mut self, id: NodeId) {
        let mut child = self.arena.node(id).first_child;
        while child != NULL_HANDLE {
            let next = self.arena.at(child).next_sibling;
            self.free_subtree(NodeId::from_index(child));
            child = next;
        }
        self.arena.free(id);
    }
}
