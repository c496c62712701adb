// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Layout: an arena-backed flexbox layout engine.
//!
//! Canopy Layout turns a tree of styled nodes plus a viewport constraint into
//! a computed rectangle per node, in viewport coordinates. It is the retained
//! core under an immediate-mode layer (see `canopy_gui`), but it is usable on
//! its own wherever a small deterministic flexbox subset is enough.
//!
//! - Fixed-capacity arena with free-list recycling; handles are stable 32-bit
//!   indices and capacity never grows after construction.
//! - Single-line flexbox: grow/shrink with min/max clamping, justify and
//!   align placement, padding and gap. No wrapping, no absolute positioning,
//!   no intrinsic text sizing.
//! - Dirty bits propagate upward on every mutation; [`LayoutTree::compute`]
//!   re-solves only dirty regions, reusing per-node fingerprinted results
//!   elsewhere, and leaves the forest clean.
//! - Deterministic output: the same tree and viewport produce bit-identical
//!   rectangles across runs.
//!
//! ## Not a renderer
//!
//! This crate computes geometry only. Drawing, text measurement, and input
//! handling belong to higher layers; [`Style`] and [`Rect`] are ABI-fixed
//! plain data so those layers can consume results without conversion.
//!
//! ## API overview
//!
//! - [`LayoutTree`]: the engine. [`LayoutTree::add`], [`LayoutTree::remove`],
//!   [`LayoutTree::set_style`], [`LayoutTree::reparent`] mutate the forest;
//!   [`LayoutTree::compute`] solves it; [`LayoutTree::rect`] and the
//!   traversal reads query it.
//! - [`Style`], [`Rect`], [`Direction`], [`Justify`], [`Align`]: the style
//!   model, with [`Style::AUTO`] and [`Style::NONE`] sentinels.
//! - [`NodeId`]: opaque handle; raw value [`NULL_HANDLE`] means "no node".
//! - [`LayoutError`], [`error_string`], [`LayoutTree::last_error`]: the error
//!   taxonomy with stable codes.
//! - [`version`], [`style_size`], [`rect_size`]: ABI probes for embedders.
//!
//! A single engine is not thread-safe; the pure helpers above are.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arena;
mod flex;
mod tree;
mod types;

pub use tree::LayoutTree;
pub use types::{
    error_string, rect_size, style_size, version, Align, Direction, Justify, LayoutError, NodeId,
    Rect, Style, NULL_HANDLE, VERSION,
};
