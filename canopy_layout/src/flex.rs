// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The flexbox solver: a two-pass, single-line layout over the node tree.
//!
//! Per node the solver resolves an outer size from the parent-provided
//! constraint, shrinks it to the padded content box, measures the children's
//! base main sizes, distributes free space (grow) or deficit (shrink) with
//! min/max clamping, then places children along the main axis per `justify`
//! and across it per `align`. Recursion carries absolute viewport
//! coordinates downward.
//!
//! Results are cached per node under a fingerprint of the style and the
//! outer constraint. A clean node whose fingerprint matches is reused
//! without re-solving: when its origin moved, the stored subtree is shifted
//! by the delta in a single cheap walk.
//!
//! All arithmetic is `f32`, accumulated left to right in sibling order, so
//! rounding is deterministic and biased toward earlier children. Malformed
//! styles are normalized rather than rejected: NaN reads as zero, sizes are
//! floored at zero, and an inverted min/max pair collapses to the minimum.

use smallvec::SmallVec;

use crate::tree::LayoutTree;
use crate::types::{Align, Direction, Justify, NodeId, Rect, Style, NULL_HANDLE};

/// Parent-direction tag used for fingerprints of root nodes.
const ROOT_CONTEXT: u8 = 0xFF;

const FNV_OFFSET: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

fn mix(h: u32, word: u32) -> u32 {
    (h ^ word).wrapping_mul(FNV_PRIME)
}

/// Hash the inputs that determine a node's layout: its style and the outer
/// constraint handed down by the parent.
fn fingerprint(style: &Style, outer_w: f32, outer_h: f32, parent_dir: u8) -> u32 {
    let mut h = FNV_OFFSET;
    h = mix(
        h,
        u32::from(style.direction as u8)
            | (u32::from(style.justify as u8) << 8)
            | (u32::from(style.align as u8) << 16)
            | (u32::from(parent_dir) << 24),
    );
    for v in [
        style.flex_grow,
        style.flex_shrink,
        style.width,
        style.height,
        style.min_width,
        style.min_height,
        style.max_width,
        style.max_height,
        style.gap,
        style.pad_top,
        style.pad_right,
        style.pad_bottom,
        style.pad_left,
        outer_w,
        outer_h,
    ] {
        h = mix(h, v.to_bits());
    }
    h
}

fn sanitize(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

fn is_auto(v: f32) -> bool {
    v == Style::AUTO
}

/// Clamp a size into a normalized `[min, max]` band, flooring at zero.
///
/// An inverted pair (max < min) collapses to the minimum, so the comparison
/// order never oscillates.
fn clamp_size(v: f32, min: f32, max: f32) -> f32 {
    let lo = sanitize(min).max(0.0);
    let hi = sanitize(max);
    let hi = if hi < lo { lo } else { hi };
    sanitize(v).clamp(lo, hi)
}

/// Resolve one outer axis: AUTO takes the parent-provided extent, explicit
/// sizes stand on their own. Clamps apply last in both cases.
fn resolve_outer(size: f32, avail: f32, min: f32, max: f32) -> f32 {
    if is_auto(size) {
        clamp_size(avail, min, max)
    } else {
        clamp_size(size, min, max)
    }
}

/// Per-child solver state for one main-axis line.
struct Item {
    id: NodeId,
    /// Main size before grow/shrink; also the shrink weight basis.
    base: f32,
    /// Evolving main size; final after distribution.
    size: f32,
    grow: f32,
    shrink: f32,
    min: f32,
    max: f32,
    frozen: bool,
}

/// Hand out positive free space to growers, proportional to `flex_grow`.
///
/// A child whose clamp binds is frozen at the clamp and its unused share
/// returns to the pool; the loop runs at most once per child, so it always
/// terminates.
fn grow_items(items: &mut [Item], free: f32) {
    let mut remaining = free;
    for _ in 0..items.len() {
        let total_grow: f32 = items.iter().filter(|i| !i.frozen).map(|i| i.grow).sum();
        if total_grow <= 0.0 || remaining <= 0.0 {
            return;
        }
        let unit = remaining / total_grow;
        let mut returned = 0.0;
        let mut any_frozen = false;
        for it in items.iter_mut() {
            if it.frozen || it.grow <= 0.0 {
                continue;
            }
            let target = it.size + unit * it.grow;
            let clamped = clamp_size(target, it.min, it.max);
            if clamped < target {
                returned += target - clamped;
                it.frozen = true;
                any_frozen = true;
            }
            it.size = clamped;
        }
        remaining = returned;
        if !any_frozen {
            return;
        }
    }
}

/// Absorb a deficit among shrinkers, weighted by `flex_shrink * base` so
/// larger children give up proportionally more. Children pinned by their
/// minimum are frozen and the shortfall redistributes.
fn shrink_items(items: &mut [Item], deficit: f32) {
    let mut remaining = deficit;
    for _ in 0..items.len() {
        let total_scaled: f32 = items
            .iter()
            .filter(|i| !i.frozen)
            .map(|i| i.shrink * i.base)
            .sum();
        if total_scaled <= 0.0 || remaining <= 0.0 {
            return;
        }
        let mut returned = 0.0;
        let mut any_frozen = false;
        for it in items.iter_mut() {
            let weight = it.shrink * it.base;
            if it.frozen || weight <= 0.0 {
                continue;
            }
            let target = it.size - remaining * weight / total_scaled;
            let clamped = clamp_size(target, it.min, it.max);
            if clamped > target {
                returned += clamped - target;
                it.frozen = true;
                any_frozen = true;
            }
            it.size = clamped;
        }
        remaining = returned;
        if !any_frozen {
            return;
        }
    }
}

/// Leading offset and between-children spacing for a line.
///
/// Negative or zero free space always degrades to start packing with the
/// plain gap, so children never overlap each other.
fn main_offsets(justify: Justify, free: f32, gap: f32, n: usize) -> (f32, f32) {
    if n == 0 || free <= 0.0 {
        return (0.0, gap);
    }
    #[allow(
        clippy::cast_precision_loss,
        reason = "child counts are far below f32 integer range"
    )]
    let nf = n as f32;
    match justify {
        Justify::Start => (0.0, gap),
        Justify::Center => (free * 0.5, gap),
        Justify::End => (free, gap),
        Justify::SpaceBetween => {
            if n > 1 {
                (0.0, gap + free / (nf - 1.0))
            } else {
                (0.0, gap)
            }
        }
        Justify::SpaceAround => {
            let unit = free / nf;
            (unit * 0.5, gap + unit)
        }
        Justify::SpaceEvenly => {
            let unit = free / (nf + 1.0);
            (unit, gap + unit)
        }
    }
}

/// Cross-axis size and offset for one child.
fn cross_place(align: Align, size: f32, min: f32, max: f32, cross_extent: f32) -> (f32, f32) {
    let resolved = if is_auto(size) {
        if align == Align::Stretch {
            cross_extent
        } else {
            0.0
        }
    } else {
        clamp_size(size, min, max)
    };
    let offset = match align {
        Align::Start | Align::Stretch => 0.0,
        Align::Center => (cross_extent - resolved) * 0.5,
        Align::End => cross_extent - resolved,
    };
    (resolved, offset)
}

impl LayoutTree {
    /// Solve layout for the whole forest against a viewport constraint.
    ///
    /// Every root is laid out at the viewport origin with the viewport as
    /// its available size. Clean subtrees with unchanged inputs are reused
    /// from the cache; afterwards the dirty set is empty. The cache
    /// statistics describe this pass only.
    pub fn compute(&mut self, avail_w: f32, avail_h: f32) {
        self.cache_hits = 0;
        self.cache_misses = 0;
        let avail_w = sanitize(avail_w).max(0.0);
        let avail_h = sanitize(avail_h).max(0.0);
        let mut root = self.first_root;
        while root != NULL_HANDLE {
            let id = NodeId::from_index(root);
            let next = self.arena.at(root).next_sibling;
            let s = self.arena.node(id).style;
            let w = resolve_outer(s.width, avail_w, s.min_width, s.max_width);
            let h = resolve_outer(s.height, avail_h, s.min_height, s.max_height);
            self.place(id, 0.0, 0.0, w, h, ROOT_CONTEXT);
            root = next;
        }
    }

    /// Position one node at an absolute origin with a resolved outer size,
    /// reusing the cached result when the inputs are unchanged.
    fn place(&mut self, id: NodeId, x: f32, y: f32, w: f32, h: f32, parent_dir: u8) {
        let (dirty, stored_fp, old_rect, fp) = {
            let n = self.arena.node(id);
            (
                n.dirty,
                n.fingerprint,
                n.rect,
                fingerprint(&n.style, w, h, parent_dir),
            )
        };
        if !dirty && stored_fp == fp {
            self.cache_hits += 1;
            let dx = x - old_rect.x;
            let dy = y - old_rect.y;
            if dx != 0.0 || dy != 0.0 {
                self.offset_subtree(id, dx, dy);
            }
            return;
        }
        self.cache_misses += 1;
        self.arena.node_mut(id).fingerprint = fp;
        self.layout_node(id, x, y, w, h);
    }

    /// Full solve of one node: record its rect, lay out its children.
    fn layout_node(&mut self, id: NodeId, x: f32, y: f32, w: f32, h: f32) {
        let style = {
            let n = self.arena.node_mut(id);
            n.rect = Rect {
                x,
                y,
                width: w,
                height: h,
            };
            n.dirty = false;
            n.style
        };

        let mut children: SmallVec<[NodeId; 8]> = SmallVec::new();
        let mut c = self.arena.node(id).first_child;
        while c != NULL_HANDLE {
            children.push(NodeId::from_index(c));
            c = self.arena.at(c).next_sibling;
        }
        if children.is_empty() {
            return;
        }

        let pad_t = sanitize(style.pad_top).max(0.0);
        let pad_r = sanitize(style.pad_right).max(0.0);
        let pad_b = sanitize(style.pad_bottom).max(0.0);
        let pad_l = sanitize(style.pad_left).max(0.0);
        let inner_w = (w - pad_l - pad_r).max(0.0);
        let inner_h = (h - pad_t - pad_b).max(0.0);
        let inner_x = x + pad_l;
        let inner_y = y + pad_t;

        let dir = style.direction;
        let (main_extent, cross_extent) = match dir {
            Direction::Row => (inner_w, inner_h),
            Direction::Column => (inner_h, inner_w),
        };
        let gap = sanitize(style.gap).max(0.0);

        let mut items: SmallVec<[Item; 8]> = SmallVec::with_capacity(children.len());
        for &cid in &children {
            let cs = &self.arena.node(cid).style;
            let (main_size, min_main, max_main) = match dir {
                Direction::Row => (cs.width, cs.min_width, cs.max_width),
                Direction::Column => (cs.height, cs.min_height, cs.max_height),
            };
            let base = if is_auto(main_size) {
                0.0
            } else {
                clamp_size(main_size, min_main, max_main)
            };
            items.push(Item {
                id: cid,
                base,
                size: base,
                grow: sanitize(cs.flex_grow).max(0.0),
                shrink: sanitize(cs.flex_shrink).max(0.0),
                min: min_main,
                max: max_main,
                frozen: false,
            });
        }

        let total_base: f32 = items.iter().map(|i| i.size).sum();
        #[allow(
            clippy::cast_precision_loss,
            reason = "child counts are far below f32 integer range"
        )]
        let spacing = gap * (items.len() - 1) as f32;
        let free = main_extent - total_base - spacing;
        if free > 0.0 {
            grow_items(&mut items, free);
        } else if free < 0.0 {
            shrink_items(&mut items, -free);
        }

        let used: f32 = items.iter().map(|i| i.size).sum::<f32>() + spacing;
        let (leading, between) = main_offsets(style.justify, main_extent - used, gap, items.len());

        let mut cursor = leading;
        for (k, item) in items.iter().enumerate() {
            if k > 0 {
                cursor += between;
            }
            let cs = self.arena.node(item.id).style;
            let (cross_size, min_cross, max_cross) = match dir {
                Direction::Row => (cs.height, cs.min_height, cs.max_height),
                Direction::Column => (cs.width, cs.min_width, cs.max_width),
            };
            let (resolved_cross, cross_offset) =
                cross_place(style.align, cross_size, min_cross, max_cross, cross_extent);
            let (cx, cy, cw, ch) = match dir {
                Direction::Row => (
                    inner_x + cursor,
                    inner_y + cross_offset,
                    item.size,
                    resolved_cross,
                ),
                Direction::Column => (
                    inner_x + cross_offset,
                    inner_y + cursor,
                    resolved_cross,
                    item.size,
                ),
            };
            self.place(item.id, cx, cy, cw, ch, dir as u8);
            cursor += item.size;
        }
    }

    /// Shift a cached subtree's rects by a fixed delta without re-solving.
    fn offset_subtree(&mut self, id: NodeId, dx: f32, dy: f32) {
        {
            let n = self.arena.node_mut(id);
            n.rect.x += dx;
            n.rect.y += dy;
        }
        let mut child = self.arena.node(id).first_child;
        while child != NULL_HANDLE {
            let next = self.arena.at(child).next_sibling;
            self.offset_subtree(NodeId::from_index(child), dx, dy);
            child = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn sized(w: f32, h: f32) -> Style {
        Style {
            width: w,
            height: h,
            ..Style::default()
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn single_node_takes_its_own_size() {
        let mut tree = LayoutTree::new(4);
        let root = tree.add(None, &sized(200.0, 100.0)).unwrap();
        tree.compute(800.0, 600.0);
        assert_eq!(
            tree.rect(root),
            Rect {
                x: 0.0,
                y: 0.0,
                width: 200.0,
                height: 100.0
            }
        );
    }

    #[test]
    fn auto_root_fills_the_viewport() {
        let mut tree = LayoutTree::new(4);
        let root = tree.add(None, &Style::default()).unwrap();
        tree.compute(800.0, 600.0);
        let r = tree.rect(root);
        assert_eq!((r.width, r.height), (800.0, 600.0));
    }

    #[test]
    fn column_stacks_children() {
        let mut tree = LayoutTree::new(8);
        let root = tree.add(None, &sized(200.0, 300.0)).unwrap();
        let a = tree.add(Some(root), &sized(200.0, 100.0)).unwrap();
        let b = tree.add(Some(root), &sized(200.0, 100.0)).unwrap();
        tree.compute(800.0, 600.0);

        assert_eq!(
            tree.rect(a),
            Rect {
                x: 0.0,
                y: 0.0,
                width: 200.0,
                height: 100.0
            }
        );
        assert_eq!(
            tree.rect(b),
            Rect {
                x: 0.0,
                y: 100.0,
                width: 200.0,
                height: 100.0
            }
        );
    }

    #[test]
    fn row_places_side_by_side() {
        let mut tree = LayoutTree::new(8);
        let style = Style {
            direction: Direction::Row,
            ..sized(400.0, 100.0)
        };
        let root = tree.add(None, &style).unwrap();
        let a = tree.add(Some(root), &sized(100.0, 100.0)).unwrap();
        let b = tree.add(Some(root), &sized(100.0, 100.0)).unwrap();
        tree.compute(800.0, 600.0);

        assert_eq!((tree.rect(a).x, tree.rect(a).y), (0.0, 0.0));
        assert_eq!((tree.rect(b).x, tree.rect(b).y), (100.0, 0.0));
    }

    #[test]
    fn gap_separates_children() {
        let mut tree = LayoutTree::new(8);
        let style = Style {
            gap: 10.0,
            ..sized(200.0, 300.0)
        };
        let root = tree.add(None, &style).unwrap();
        let a = tree.add(Some(root), &sized(200.0, 50.0)).unwrap();
        let b = tree.add(Some(root), &sized(200.0, 50.0)).unwrap();
        let c = tree.add(Some(root), &sized(200.0, 50.0)).unwrap();
        tree.compute(800.0, 600.0);

        assert_eq!(tree.rect(a).y, 0.0);
        assert_eq!(tree.rect(b).y, 60.0);
        assert_eq!(tree.rect(c).y, 120.0);
    }

    #[test]
    fn padding_offsets_content() {
        let mut tree = LayoutTree::new(4);
        let style = Style {
            pad_top: 10.0,
            pad_left: 20.0,
            ..sized(200.0, 200.0)
        };
        let root = tree.add(None, &style).unwrap();
        let child = tree.add(Some(root), &sized(50.0, 50.0)).unwrap();
        tree.compute(800.0, 600.0);

        assert_eq!(
            tree.rect(child),
            Rect {
                x: 20.0,
                y: 10.0,
                width: 50.0,
                height: 50.0
            }
        );
    }

    #[test]
    fn justify_center_centers_on_main_axis() {
        let mut tree = LayoutTree::new(4);
        let style = Style {
            justify: Justify::Center,
            ..sized(200.0, 200.0)
        };
        let root = tree.add(None, &style).unwrap();
        let child = tree.add(Some(root), &sized(200.0, 50.0)).unwrap();
        tree.compute(800.0, 600.0);
        assert_eq!(tree.rect(child).y, 75.0);
    }

    #[test]
    fn justify_end_packs_at_the_end() {
        let mut tree = LayoutTree::new(4);
        let style = Style {
            justify: Justify::End,
            ..sized(200.0, 200.0)
        };
        let root = tree.add(None, &style).unwrap();
        let child = tree.add(Some(root), &sized(200.0, 50.0)).unwrap();
        tree.compute(800.0, 600.0);
        assert_eq!(tree.rect(child).y, 150.0);
    }

    #[test]
    fn space_between_pins_first_and_last() {
        let mut tree = LayoutTree::new(8);
        let style = Style {
            justify: Justify::SpaceBetween,
            ..sized(100.0, 200.0)
        };
        let root = tree.add(None, &style).unwrap();
        let a = tree.add(Some(root), &sized(100.0, 50.0)).unwrap();
        let b = tree.add(Some(root), &sized(100.0, 50.0)).unwrap();
        tree.compute(800.0, 600.0);

        assert_eq!(tree.rect(a).y, 0.0);
        assert_eq!(tree.rect(b).y, 150.0);
    }

    #[test]
    fn space_around_gives_half_units_at_the_ends() {
        let mut tree = LayoutTree::new(8);
        let style = Style {
            justify: Justify::SpaceAround,
            ..sized(100.0, 200.0)
        };
        let root = tree.add(None, &style).unwrap();
        let a = tree.add(Some(root), &sized(100.0, 50.0)).unwrap();
        let b = tree.add(Some(root), &sized(100.0, 50.0)).unwrap();
        tree.compute(800.0, 600.0);

        // free = 100, unit = 50: half at each end, full between.
        assert!(close(tree.rect(a).y, 25.0));
        assert!(close(tree.rect(b).y, 125.0));
    }

    #[test]
    fn space_evenly_distributes_all_slots() {
        let mut tree = LayoutTree::new(8);
        let style = Style {
            justify: Justify::SpaceEvenly,
            ..sized(100.0, 200.0)
        };
        let root = tree.add(None, &style).unwrap();
        let a = tree.add(Some(root), &sized(100.0, 50.0)).unwrap();
        let b = tree.add(Some(root), &sized(100.0, 50.0)).unwrap();
        tree.compute(800.0, 600.0);

        // free = 100 over three slots.
        assert!(close(tree.rect(a).y, 100.0 / 3.0));
        assert!(close(tree.rect(b).y, 100.0 / 3.0 + 50.0 + 100.0 / 3.0));
    }

    #[test]
    fn align_center_centers_on_cross_axis() {
        let mut tree = LayoutTree::new(4);
        let style = Style {
            align: Align::Center,
            ..sized(200.0, 200.0)
        };
        let root = tree.add(None, &style).unwrap();
        let child = tree.add(Some(root), &sized(100.0, 50.0)).unwrap();
        tree.compute(800.0, 600.0);
        assert_eq!(tree.rect(child).x, 50.0);
    }

    #[test]
    fn align_end_packs_at_cross_end() {
        let mut tree = LayoutTree::new(4);
        let style = Style {
            align: Align::End,
            ..sized(200.0, 200.0)
        };
        let root = tree.add(None, &style).unwrap();
        let child = tree.add(Some(root), &sized(100.0, 50.0)).unwrap();
        tree.compute(800.0, 600.0);
        assert_eq!(tree.rect(child).x, 100.0);
    }

    #[test]
    fn stretch_fills_inner_cross_extent_exactly() {
        let mut tree = LayoutTree::new(4);
        let style = Style {
            pad_left: 10.0,
            pad_right: 30.0,
            ..sized(200.0, 200.0)
        };
        let root = tree.add(None, &style).unwrap();
        let child = tree
            .add(Some(root), &sized(Style::AUTO, 50.0))
            .unwrap();
        tree.compute(800.0, 600.0);
        assert_eq!(tree.rect(child).width, 160.0);
        assert_eq!(tree.rect(child).x, 10.0);
    }

    #[test]
    fn grow_splits_free_space_proportionally() {
        let mut tree = LayoutTree::new(8);
        let style = Style {
            direction: Direction::Row,
            ..sized(300.0, 100.0)
        };
        let root = tree.add(None, &style).unwrap();
        let grower = |g: f32| Style {
            flex_grow: g,
            height: 100.0,
            ..Style::default()
        };
        let a = tree.add(Some(root), &grower(1.0)).unwrap();
        let b = tree.add(Some(root), &grower(2.0)).unwrap();
        tree.compute(800.0, 600.0);

        assert_eq!(tree.rect(a).width, 100.0);
        assert_eq!(tree.rect(b).width, 200.0);
        assert_eq!(tree.rect(b).x, 100.0);
    }

    #[test]
    fn grow_redistributes_past_a_max_clamp() {
        let mut tree = LayoutTree::new(8);
        let style = Style {
            direction: Direction::Row,
            ..sized(300.0, 100.0)
        };
        let root = tree.add(None, &style).unwrap();
        let capped = Style {
            flex_grow: 1.0,
            max_width: 50.0,
            height: 100.0,
            ..Style::default()
        };
        let open = Style {
            flex_grow: 1.0,
            height: 100.0,
            ..Style::default()
        };
        let a = tree.add(Some(root), &capped).unwrap();
        let b = tree.add(Some(root), &open).unwrap();
        tree.compute(800.0, 600.0);

        assert_eq!(tree.rect(a).width, 50.0);
        assert_eq!(tree.rect(b).width, 250.0);
    }

    #[test]
    fn shrink_absorbs_deficit_by_scaled_weight() {
        let mut tree = LayoutTree::new(8);
        let style = Style {
            direction: Direction::Row,
            ..sized(100.0, 50.0)
        };
        let root = tree.add(None, &style).unwrap();
        let a = tree.add(Some(root), &sized(80.0, 50.0)).unwrap();
        let b = tree.add(Some(root), &sized(40.0, 50.0)).unwrap();
        tree.compute(800.0, 600.0);

        // Deficit 20 split 80:40 -> 13.33 and 6.67.
        assert!(close(tree.rect(a).width, 66.6667));
        assert!(close(tree.rect(b).width, 33.3333));
        assert!(close(tree.rect(b).x, 66.6667));
    }

    #[test]
    fn shrink_redistributes_past_a_min_clamp() {
        let mut tree = LayoutTree::new(8);
        let style = Style {
            direction: Direction::Row,
            ..sized(100.0, 50.0)
        };
        let root = tree.add(None, &style).unwrap();
        let pinned = Style {
            min_width: 75.0,
            ..sized(80.0, 50.0)
        };
        let a = tree.add(Some(root), &pinned).unwrap();
        let b = tree.add(Some(root), &sized(40.0, 50.0)).unwrap();
        tree.compute(800.0, 600.0);

        assert!(close(tree.rect(a).width, 75.0));
        assert!(close(tree.rect(b).width, 25.0));
    }

    #[test]
    fn negative_free_space_degrades_to_start_packing() {
        let mut tree = LayoutTree::new(8);
        let style = Style {
            justify: Justify::Center,
            ..sized(100.0, 50.0)
        };
        let root = tree.add(None, &style).unwrap();
        let no_shrink = Style {
            flex_shrink: 0.0,
            ..sized(100.0, 40.0)
        };
        let a = tree.add(Some(root), &no_shrink).unwrap();
        let b = tree.add(Some(root), &no_shrink).unwrap();
        tree.compute(800.0, 600.0);

        // Children overflow the container but keep leading 0 / gap between.
        assert_eq!(tree.rect(a).y, 0.0);
        assert_eq!(tree.rect(b).y, 40.0);
    }

    #[test]
    fn children_never_overlap_on_the_main_axis() {
        let mut tree = LayoutTree::new(16);
        let style = Style {
            justify: Justify::SpaceAround,
            gap: 4.0,
            ..sized(120.0, 500.0)
        };
        let root = tree.add(None, &style).unwrap();
        let mut children = Vec::new();
        for h in [30.0, 55.0, 10.0, 80.0] {
            children.push(tree.add(Some(root), &sized(100.0, h)).unwrap());
        }
        tree.compute(800.0, 600.0);

        for pair in children.windows(2) {
            let prev = tree.rect(pair[0]);
            let next = tree.rect(pair[1]);
            assert!(next.y >= prev.y + prev.height);
        }
    }

    #[test]
    fn inverted_min_max_collapses_to_min() {
        let mut tree = LayoutTree::new(4);
        let root = tree.add(None, &sized(300.0, 300.0)).unwrap();
        let odd = Style {
            min_width: 100.0,
            max_width: 50.0,
            ..sized(80.0, 20.0)
        };
        let child = tree.add(Some(root), &odd).unwrap();
        tree.compute(800.0, 600.0);
        assert_eq!(tree.rect(child).width, 100.0);
    }

    #[test]
    fn nan_inputs_read_as_zero() {
        let mut tree = LayoutTree::new(4);
        let style = Style {
            gap: f32::NAN,
            ..sized(200.0, 200.0)
        };
        let root = tree.add(None, &style).unwrap();
        let weird = sized(f32::NAN, 50.0);
        let child = tree.add(Some(root), &weird).unwrap();
        tree.compute(800.0, 600.0);

        let r = tree.rect(child);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 50.0);
        assert!(r.x == 0.0 && r.y == 0.0);
    }

    #[test]
    fn zero_viewport_yields_zero_rects() {
        let mut tree = LayoutTree::new(8);
        let root = tree.add(None, &Style::default()).unwrap();
        let a = tree.add(Some(root), &Style::default()).unwrap();
        let b = tree.add(Some(a), &Style::default()).unwrap();
        tree.compute(0.0, 0.0);

        for id in [root, a, b] {
            assert_eq!(tree.rect(id), Rect::ZERO);
        }
        assert_eq!(tree.dirty_count(), 0);
    }

    #[test]
    fn second_compute_is_fully_cached() {
        let mut tree = LayoutTree::new(128);
        let root = tree.add(None, &sized(500.0, 500.0)).unwrap();
        let mut ids = Vec::new();
        for _ in 0..100 {
            ids.push(tree.add(Some(root), &sized(5.0, 5.0)).unwrap());
        }
        tree.compute(800.0, 600.0);
        let first: Vec<Rect> = ids.iter().map(|&id| tree.rect(id)).collect();

        tree.compute(800.0, 600.0);
        assert_eq!(tree.cache_hit_rate(), 1.0);
        assert_eq!(tree.dirty_count(), 0);
        let second: Vec<Rect> = ids.iter().map(|&id| tree.rect(id)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn reset_stats_zeros_nonzero_counters() {
        let mut tree = LayoutTree::new(8);
        let root = tree.add(None, &sized(100.0, 100.0)).unwrap();
        tree.add(Some(root), &sized(10.0, 10.0)).unwrap();

        tree.compute(800.0, 600.0);
        assert!(tree.cache_misses > 0);
        tree.reset_stats();
        assert_eq!((tree.cache_hits, tree.cache_misses), (0, 0));
        assert_eq!(tree.cache_hit_rate(), 0.0);

        tree.compute(800.0, 600.0);
        tree.compute(800.0, 600.0);
        assert!(tree.cache_hits > 0);
        tree.reset_stats();
        assert_eq!((tree.cache_hits, tree.cache_misses), (0, 0));
        assert_eq!(tree.cache_hit_rate(), 0.0);
    }

    #[test]
    fn redundant_set_style_does_not_move_rects() {
        let mut tree = LayoutTree::new(8);
        let root = tree.add(None, &sized(200.0, 300.0)).unwrap();
        let child = tree.add(Some(root), &sized(200.0, 100.0)).unwrap();
        tree.compute(800.0, 600.0);
        let before = tree.rect(child);

        let same = *tree.style(child).unwrap();
        tree.set_style(child, &same);
        assert!(tree.dirty_count() > 0);
        tree.compute(800.0, 600.0);
        assert_eq!(tree.rect(child), before);
        assert_eq!(tree.dirty_count(), 0);
    }

    #[test]
    fn clean_sibling_subtree_is_translated_not_resolved() {
        let mut tree = LayoutTree::new(8);
        let root = tree.add(None, &sized(200.0, 300.0)).unwrap();
        let a = tree.add(Some(root), &sized(200.0, 50.0)).unwrap();
        let b = tree.add(Some(root), &sized(200.0, 100.0)).unwrap();
        let leaf = tree.add(Some(b), &sized(50.0, 20.0)).unwrap();
        tree.compute(800.0, 600.0);
        assert_eq!(tree.rect(leaf).y, 50.0);

        tree.set_style(a, &sized(200.0, 80.0));
        tree.compute(800.0, 600.0);

        // b's subtree moved down by 30 without being re-solved.
        assert_eq!(tree.rect(b).y, 80.0);
        assert_eq!(tree.rect(leaf).y, 80.0);
        assert_eq!(tree.cache_hits, 1);
        assert_eq!(tree.cache_misses, 2);
    }

    #[test]
    fn rects_are_deterministic_across_instances() {
        let build = || {
            let mut tree = LayoutTree::new(32);
            let style = Style {
                direction: Direction::Row,
                justify: Justify::SpaceEvenly,
                gap: 3.0,
                pad_top: 7.0,
                ..sized(313.0, 217.0)
            };
            let root = tree.add(None, &style).unwrap();
            let mut ids = alloc::vec![root];
            for i in 0..5 {
                let child = Style {
                    flex_grow: i as f32,
                    ..sized(20.0 + i as f32, 30.0)
                };
                ids.push(tree.add(Some(root), &child).unwrap());
            }
            tree.compute(640.0, 480.0);
            ids.into_iter()
                .map(|id| {
                    let r = tree.rect(id);
                    [
                        r.x.to_bits(),
                        r.y.to_bits(),
                        r.width.to_bits(),
                        r.height.to_bits(),
                    ]
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn sizes_are_never_negative() {
        let mut tree = LayoutTree::new(8);
        let style = Style {
            pad_left: 500.0,
            pad_right: 500.0,
            ..sized(100.0, 100.0)
        };
        let root = tree.add(None, &style).unwrap();
        let child = tree.add(Some(root), &sized(-20.0, -20.0)).unwrap();
        tree.compute(800.0, 600.0);

        for id in [root, child] {
            let r = tree.rect(id);
            assert!(r.width >= 0.0 && r.height >= 0.0);
        }
    }
}
