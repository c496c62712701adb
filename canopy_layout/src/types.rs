// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the layout engine: handles, rectangles, styles, errors.
//!
//! `Style` and `Rect` are ABI-stable plain data: `#[repr(C)]`, fixed field
//! order, fixed sizes (56 and 16 bytes). They can be copied across process
//! boundaries or serialized byte-for-byte by embedders that need to.

/// Raw handle value meaning "no node". All-ones by contract.
pub const NULL_HANDLE: u32 = 0xFFFF_FFFF;

/// Packed API version, `major << 16 | minor`.
pub const VERSION: u32 = (1 << 16) | 0;

/// Identifier for a node in the layout tree.
///
/// Handles are opaque 32-bit indices into the engine's arena. They stay valid
/// until the node is removed; a removed node's slot may be recycled, after
/// which the old handle fails validation. The raw value [`NULL_HANDLE`] is
/// reserved and never identifies a node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn from_index(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// The raw 32-bit value of this handle.
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    /// Reconstruct a handle from a raw value; [`NULL_HANDLE`] maps to `None`.
    ///
    /// The result still needs to pass the engine's validation before use.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        if raw == NULL_HANDLE {
            None
        } else {
            Some(Self(raw))
        }
    }
}

/// A computed rectangle in viewport coordinates.
///
/// Exactly 16 bytes: four `f32` in the order `x, y, width, height`. Width and
/// height are never negative after a layout pass.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent, `>= 0`.
    pub width: f32,
    /// Vertical extent, `>= 0`.
    pub height: f32,
}

impl Rect {
    /// The all-zero rectangle.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Whether the point lies inside this rectangle.
    ///
    /// Containment is half-open: the left/top edges are inside, the
    /// right/bottom edges are not, so adjacent rectangles never both claim
    /// a shared edge.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// How children are laid out along the main axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// Children are placed left to right; the main axis is horizontal.
    Row = 0,
    /// Children are placed top to bottom; the main axis is vertical.
    #[default]
    Column = 1,
}

/// Main-axis distribution of children (justify-content in CSS terms).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Justify {
    /// Pack children at the start of the main axis.
    #[default]
    Start = 0,
    /// Center children on the main axis.
    Center = 1,
    /// Pack children at the end of the main axis.
    End = 2,
    /// First child at the start, last at the end, equal spacing between.
    SpaceBetween = 3,
    /// Equal spacing between children, half a unit at each end.
    SpaceAround = 4,
    /// Equal spacing between children and at both ends.
    SpaceEvenly = 5,
}

/// Cross-axis placement of children (align-items in CSS terms).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Align {
    /// Place at the start of the cross axis.
    Start = 0,
    /// Center on the cross axis.
    Center = 1,
    /// Place at the end of the cross axis.
    End = 2,
    /// Fill the container's inner cross extent.
    #[default]
    Stretch = 3,
}

/// Style record for one node.
///
/// Exactly 56 bytes, `#[repr(C)]`, field order fixed: three `u8`
/// discriminants plus a reserved byte, then thirteen `f32` fields. Dimensions
/// use [`Style::AUTO`] for "content-sized" (which this engine resolves to
/// zero unless the child grows) and [`Style::NONE`] for "unconstrained"
/// maxima.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct Style {
    /// Main-axis orientation for this node's children.
    pub direction: Direction,
    /// Main-axis distribution for this node's children.
    pub justify: Justify,
    /// Cross-axis placement for this node's children.
    pub align: Align,
    /// Padding byte keeping the `f32` block aligned.
    pub _reserved: u8,
    /// Share of positive free space this node takes, `>= 0`.
    pub flex_grow: f32,
    /// Share of the deficit this node absorbs, `>= 0`.
    pub flex_shrink: f32,
    /// Preferred width, or [`Style::AUTO`].
    pub width: f32,
    /// Preferred height, or [`Style::AUTO`].
    pub height: f32,
    /// Minimum width, `>= 0`.
    pub min_width: f32,
    /// Minimum height, `>= 0`.
    pub min_height: f32,
    /// Maximum width, or [`Style::NONE`].
    pub max_width: f32,
    /// Maximum height, or [`Style::NONE`].
    pub max_height: f32,
    /// Space inserted between adjacent children, `>= 0`.
    pub gap: f32,
    /// Top padding.
    pub pad_top: f32,
    /// Right padding.
    pub pad_right: f32,
    /// Bottom padding.
    pub pad_bottom: f32,
    /// Left padding.
    pub pad_left: f32,
}

impl Style {
    /// Sentinel dimension: size from context instead of the style.
    pub const AUTO: f32 = -1.0;

    /// Sentinel maximum: no upper constraint.
    pub const NONE: f32 = 1e30;
}

impl Default for Style {
    fn default() -> Self {
        Self {
            direction: Direction::Column,
            justify: Justify::Start,
            align: Align::Stretch,
            _reserved: 0,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            width: Self::AUTO,
            height: Self::AUTO,
            min_width: 0.0,
            min_height: 0.0,
            max_width: Self::NONE,
            max_height: Self::NONE,
            gap: 0.0,
            pad_top: 0.0,
            pad_right: 0.0,
            pad_bottom: 0.0,
            pad_left: 0.0,
        }
    }
}

/// Errors reported by fallible layout operations.
///
/// Each variant carries a stable numeric code; code `0` is reserved for
/// "no error" and has no variant. Total query functions never return these
/// directly: they yield neutral values and record the error on the engine's
/// last-error slot instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LayoutError {
    /// Allocation failed at construction time.
    OutOfMemory = 1,
    /// The arena is full; `add` cannot allocate another node.
    CapacityExceeded = 2,
    /// A handle was out of range or referred to a freed slot.
    InvalidNode = 3,
    /// A reparent would have made a node its own ancestor.
    CycleDetected = 4,
}

impl LayoutError {
    /// The stable numeric code for this error.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// A short, static, ASCII description.
    pub const fn message(self) -> &'static str {
        match self {
            Self::OutOfMemory => "out of memory",
            Self::CapacityExceeded => "node capacity exceeded",
            Self::InvalidNode => "invalid node handle",
            Self::CycleDetected => "reparent would create a cycle",
        }
    }
}

impl core::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl core::error::Error for LayoutError {}

/// Map a raw error code to a human-readable ASCII string.
///
/// Code `0` reads "ok"; codes outside the taxonomy read "unknown error".
pub const fn error_string(code: u32) -> &'static str {
    match code {
        0 => "ok",
        1 => LayoutError::OutOfMemory.message(),
        2 => LayoutError::CapacityExceeded.message(),
        3 => LayoutError::InvalidNode.message(),
        4 => LayoutError::CycleDetected.message(),
        _ => "unknown error",
    }
}

/// The packed API version, `major << 16 | minor`.
pub const fn version() -> u32 {
    VERSION
}

/// Size of [`Style`] in bytes, for embedders checking ABI expectations.
pub const fn style_size() -> usize {
    core::mem::size_of::<Style>()
}

/// Size of [`Rect`] in bytes, for embedders checking ABI expectations.
pub const fn rect_size() -> usize {
    core::mem::size_of::<Rect>()
}
