// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-capacity slot arena backing the node tree.

use alloc::vec::Vec;

use crate::types::{LayoutError, NodeId, Rect, Style, NULL_HANDLE};

/// One layout node, stored inline in an arena slot.
///
/// Tree links are raw slot indices with [`NULL_HANDLE`] meaning "none"; the
/// child list is a singly linked sibling chain starting at `first_child`.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) parent: u32,
    pub(crate) first_child: u32,
    pub(crate) next_sibling: u32,
    pub(crate) style: Style,
    pub(crate) rect: Rect,
    /// Hash of the (style, outer constraint) inputs behind `rect`.
    pub(crate) fingerprint: u32,
    pub(crate) dirty: bool,
}

impl Node {
    fn new(style: Style) -> Self {
        Self {
            parent: NULL_HANDLE,
            first_child: NULL_HANDLE,
            next_sibling: NULL_HANDLE,
            style,
            rect: Rect::ZERO,
            fingerprint: 0,
            dirty: true,
        }
    }
}

/// Slot storage with free-list recycling.
///
/// Capacity is fixed at construction: the slot vector grows only up to that
/// bound and never reallocates afterwards. Exactly the unoccupied slots sit
/// on the free list.
pub(crate) struct Arena {
    slots: Vec<Option<Node>>,
    free: Vec<u32>,
    capacity: usize,
    live: usize,
}

impl Arena {
    pub(crate) fn with_capacity(max_nodes: u32) -> Self {
        let capacity = max_nodes as usize;
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            capacity,
            live: 0,
        }
    }

    /// Allocate a blank node, recycling a freed slot when one is available.
    pub(crate) fn alloc(&mut self, style: Style) -> Result<NodeId, LayoutError> {
        let idx = if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = Some(Node::new(style));
            idx
        } else if self.slots.len() < self.capacity {
            self.slots.push(Some(Node::new(style)));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "slot count is bounded by a u32 capacity"
            )]
            {
                (self.slots.len() - 1) as u32
            }
        } else {
            return Err(LayoutError::CapacityExceeded);
        };
        self.live += 1;
        Ok(NodeId::from_index(idx))
    }

    /// Return a slot to the free list. The handle must be live.
    pub(crate) fn free(&mut self, id: NodeId) {
        debug_assert!(self.validate(id), "freeing a stale handle");
        self.slots[id.index()] = None;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "slot count is bounded by a u32 capacity"
        )]
        self.free.push(id.index() as u32);
        self.live -= 1;
    }

    /// Whether the handle refers to an occupied slot.
    pub(crate) fn validate(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|slot| slot.is_some())
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(|slot| slot.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .and_then(|slot| slot.as_mut())
    }

    /// Access a live node; panics if the handle is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.slots[id.index()].as_ref().expect("dangling NodeId")
    }

    /// Access a live node mutably; panics if the handle is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.index()].as_mut().expect("dangling NodeId")
    }

    /// Access by raw link value; panics on [`NULL_HANDLE`] or stale slots.
    pub(crate) fn at(&self, raw: u32) -> &Node {
        self.node(NodeId::from_index(raw))
    }

    pub(crate) fn at_mut(&mut self, raw: u32) -> &mut Node {
        self.node_mut(NodeId::from_index(raw))
    }

    pub(crate) fn live(&self) -> usize {
        self.live
    }

    pub(crate) fn free_len(&self) -> usize {
        self.free.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate occupied slots in index order.
    pub(crate) fn iter_live(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "slot count is bounded by a u32 capacity"
            )]
            slot.as_ref().map(|n| (NodeId::from_index(i as u32), n))
        })
    }
}
