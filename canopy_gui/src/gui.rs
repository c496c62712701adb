// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The immediate-mode context: reconciliation, frame lifecycle, queries.

use canopy_layout::{LayoutError, LayoutTree, NodeId, Rect, Style};
use hashbrown::HashMap;
use kurbo::Point;
use smallvec::SmallVec;

use crate::id::{combine, WidgetId};
use crate::input::Mouse;

/// Construction parameters for a [`Gui`].
#[derive(Clone, Copy, Debug)]
pub struct GuiConfig {
    /// Maximum number of widgets, including the root container.
    pub max_widgets: u32,
    /// Initial viewport width.
    pub viewport_width: f32,
    /// Initial viewport height.
    pub viewport_height: f32,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            max_widgets: 4096,
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }
}

bitflags::bitflags! {
    /// Interaction state of a widget, as one combined query result.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Interaction: u8 {
        /// The pointer is over the widget.
        const HOVERED = 0b0000_0001;
        /// The button is held and the pointer is over the widget.
        const PRESSED = 0b0000_0010;
        /// The button was released this frame and the widget was hovered at press.
        const CLICKED = 0b0000_0100;
    }
}

/// One reconciled widget: its layout node and the frame that last declared it.
#[derive(Clone, Copy, Debug)]
struct Entry {
    node: NodeId,
    seen: u64,
}

/// An immediate-mode GUI context over a [`LayoutTree`].
///
/// Each frame the caller re-declares the widget tree between
/// [`Gui::begin_frame`] and [`Gui::end_frame`]; the context maps declared
/// identities onto persistent layout nodes, creating, restyling and
/// reparenting as needed, and prunes whatever was not declared. Layout is
/// computed once at `end_frame`, so rect and interaction queries reflect the
/// most recently completed frame.
///
/// Feed input with [`Gui::set_mouse`] after `begin_frame`; the button state
/// at the frame boundary is what edge detection compares against.
pub struct Gui {
    layout: LayoutTree,
    widgets: HashMap<u32, Entry>,
    /// Cumulative scope folds; the top is the current scope.
    scopes: SmallVec<[WidgetId; 8]>,
    parents: SmallVec<[NodeId; 16]>,
    frame: u64,
    viewport: (f32, f32),
    mouse: Mouse,
    /// Effective ids of the widgets hovered when the press began. Clicks
    /// are attributed to these targets, so a layout shift between press and
    /// release neither loses nor misdirects the click.
    press_targets: SmallVec<[u32; 8]>,
    root: NodeId,
}

impl core::fmt::Debug for Gui {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Gui")
            .field("widgets", &self.widgets.len())
            .field("frame", &self.frame)
            .field("viewport", &self.viewport)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl Gui {
    /// Create a context with its root container sized to the viewport.
    pub fn new(config: &GuiConfig) -> Self {
        let mut layout = LayoutTree::new(config.max_widgets.max(1));
        let root_style = Style {
            width: config.viewport_width,
            height: config.viewport_height,
            ..Style::default()
        };
        let root = layout
            .add(None, &root_style)
            .expect("fresh arena has room for the root");
        Self {
            layout,
            widgets: HashMap::new(),
            scopes: SmallVec::new(),
            parents: SmallVec::new(),
            frame: 0,
            viewport: (config.viewport_width, config.viewport_height),
            mouse: Mouse::default(),
            press_targets: SmallVec::new(),
            root,
        }
    }

    /// Start a frame: bump the counter, snapshot the mouse button state,
    /// reset the scope and parent stacks, size the root to the viewport.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.mouse.frame_boundary();
        self.scopes.clear();
        self.parents.clear();
        self.sync_root_style();
        self.parents.push(self.root);
    }

    /// Finish a frame: prune undeclared widgets, then compute layout.
    pub fn end_frame(&mut self) {
        let frame = self.frame;
        let dead: SmallVec<[(u32, NodeId); 8]> = self
            .widgets
            .iter()
            .filter(|(_, e)| e.seen != frame)
            .map(|(&key, e)| (key, e.node))
            .collect();
        for (key, node) in dead {
            self.widgets.remove(&key);
            if self.layout.is_alive(node) {
                self.layout.remove(node);
            }
        }
        // A pruned container takes its subtree with it; drop entries whose
        // nodes died with an ancestor.
        let layout = &self.layout;
        self.widgets.retain(|_, e| layout.is_alive(e.node));

        let (w, h) = self.viewport;
        self.layout.compute(w, h);
    }

    /// Update the viewport; takes effect from the next computed frame.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
        self.sync_root_style();
    }

    /// Feed the current mouse state. Call after [`Gui::begin_frame`].
    ///
    /// On a rising edge this resolves which widgets are hovered, against
    /// the rects of the most recently computed frame, and latches them as
    /// the press targets for click recognition.
    pub fn set_mouse(&mut self, position: Point, down: bool) {
        if self.mouse.update(position, down) {
            self.press_targets.clear();
            for (&eff, entry) in &self.widgets {
                if contains(self.layout.rect(entry.node), position) {
                    self.press_targets.push(eff);
                }
            }
        }
    }

    /// Push an identity scope; subsequent declarations and queries combine
    /// with it.
    pub fn push_id(&mut self, id: WidgetId) {
        let top = self.current_scope();
        self.scopes.push(combine(top, id));
    }

    /// Pop the innermost identity scope.
    pub fn pop_id(&mut self) {
        self.scopes.pop();
    }

    /// The fold of all pushed scopes, [`WidgetId::ROOT`] when none.
    pub fn current_scope(&self) -> WidgetId {
        self.scopes.last().copied().unwrap_or(WidgetId::ROOT)
    }

    /// Declare a leaf widget under the current container.
    pub fn widget(&mut self, id: WidgetId, style: &Style) {
        let _ = self.declare(id, style);
    }

    /// Declare a container widget and make it the current parent until the
    /// matching [`Gui::end`].
    pub fn begin(&mut self, id: WidgetId, style: &Style) {
        let fallback = self.current_parent();
        let node = self.declare(id, style).unwrap_or(fallback);
        self.parents.push(node);
    }

    /// Close the current container.
    pub fn end(&mut self) {
        if self.parents.len() > 1 {
            self.parents.pop();
        }
    }

    /// The layout node backing a widget, if it exists this frame.
    pub fn node(&self, id: WidgetId) -> Option<NodeId> {
        let eff = self.effective(id);
        self.widgets.get(&eff).map(|e| e.node)
    }

    /// The computed rectangle of a widget; zero for unknown identities.
    pub fn get_rect(&self, id: WidgetId) -> Rect {
        match self.node(id) {
            Some(node) => self.layout.rect(node),
            None => Rect::ZERO,
        }
    }

    /// Whether the point lies inside the widget's computed rectangle.
    pub fn hit_test(&self, id: WidgetId, point: Point) -> bool {
        contains(self.get_rect(id), point)
    }

    /// Whether the pointer is currently over the widget.
    pub fn hovered(&self, id: WidgetId) -> bool {
        self.hit_test(id, self.mouse.position)
    }

    /// Whether the button is held with the pointer over the widget.
    pub fn pressed(&self, id: WidgetId) -> bool {
        self.mouse.down && self.hovered(id)
    }

    /// Whether the button was released this frame and the widget was
    /// hovered when the press began.
    ///
    /// The press target is latched by identity, not by coordinate: a widget
    /// that moves between press and release still receives its click, and a
    /// widget that slides under the old press position does not steal it.
    pub fn clicked(&self, id: WidgetId) -> bool {
        self.mouse.released() && self.press_targets.contains(&self.effective(id))
    }

    /// All interaction state of a widget in one lookup.
    pub fn interaction(&self, id: WidgetId) -> Interaction {
        let mut state = Interaction::empty();
        if self.hovered(id) {
            state |= Interaction::HOVERED;
            if self.mouse.down {
                state |= Interaction::PRESSED;
            }
        }
        if self.clicked(id) {
            state |= Interaction::CLICKED;
        }
        state
    }

    /// The current mouse snapshot.
    pub fn mouse(&self) -> &Mouse {
        &self.mouse
    }

    /// The frame counter; incremented by each [`Gui::begin_frame`].
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The error recorded by the most recent failing operation, if any.
    pub fn last_error(&self) -> Option<LayoutError> {
        self.layout.last_error()
    }

    /// The underlying layout engine.
    pub fn layout(&self) -> &LayoutTree {
        &self.layout
    }

    /// Mutable access to the underlying layout engine, for callers that mix
    /// retained nodes into the widget tree.
    pub fn layout_mut(&mut self) -> &mut LayoutTree {
        &mut self.layout
    }

    // --- internals ---

    fn effective(&self, id: WidgetId) -> u32 {
        combine(self.current_scope(), id).to_raw()
    }

    fn current_parent(&self) -> NodeId {
        self.parents.last().copied().unwrap_or(self.root)
    }

    /// Reconcile one declared widget onto a persistent node.
    fn declare(&mut self, id: WidgetId, style: &Style) -> Option<NodeId> {
        let eff = self.effective(id);
        let parent = self.current_parent();
        let known = self
            .widgets
            .get(&eff)
            .map(|e| e.node)
            .filter(|&n| self.layout.is_alive(n));
        let node = match known {
            Some(n) => {
                if self.layout.style(n) != Some(style) {
                    self.layout.set_style(n, style);
                }
                if self.layout.parent_of(n) != Some(parent) {
                    let _ = self.layout.reparent(n, Some(parent));
                }
                Some(n)
            }
            None => self.layout.add(Some(parent), style).ok(),
        };
        if let Some(n) = node {
            self.widgets.insert(
                eff,
                Entry {
                    node: n,
                    seen: self.frame,
                },
            );
        }
        node
    }

    /// Keep the root container's size in step with the viewport.
    fn sync_root_style(&mut self) {
        let (w, h) = self.viewport;
        let current = *self
            .layout
            .style(self.root)
            .expect("root node outlives the context");
        if current.width != w || current.height != h {
            let style = Style {
                width: w,
                height: h,
                ..current
            };
            self.layout.set_style(self.root, &style);
        }
    }
}

/// Half-open containment of a point in a computed rectangle.
fn contains(rect: Rect, pt: Point) -> bool {
    let x0 = f64::from(rect.x);
    let y0 = f64::from(rect.y);
    pt.x >= x0
        && pt.x < x0 + f64::from(rect.width)
        && pt.y >= y0
        && pt.y < y0 + f64::from(rect.height)
}
