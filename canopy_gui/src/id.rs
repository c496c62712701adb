// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable widget identities: string hashing, indexed ids, scope combination.
//!
//! Identities are pure data. [`id`], [`id_index`] and [`combine`] have no
//! shared state, so they are safe to call from any thread and return the
//! same value in every process that runs this code.

/// A 32-bit widget identity.
///
/// Produced by hashing a label ([`id`]), deriving a loop variant
/// ([`id_index`]), or mixing two identities ([`combine`]). Collisions
/// between distinct labels are possible in principle but astronomically
/// unlikely at UI scale; the reconciler does not attempt to detect them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct WidgetId(u32);

impl WidgetId {
    /// The empty scope: combining under it leaves structure deterministic
    /// from the root.
    pub const ROOT: Self = Self(0);

    /// The raw 32-bit value.
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    /// Wrap a raw value produced by [`WidgetId::to_raw`].
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

const FNV_OFFSET: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Hash a label into a widget identity (FNV-1a over its UTF-8 bytes).
pub fn id(label: &str) -> WidgetId {
    let mut h = FNV_OFFSET;
    for &b in label.as_bytes() {
        h = (h ^ u32::from(b)).wrapping_mul(FNV_PRIME);
    }
    WidgetId(h)
}

/// Identity for the `index`-th instance of a label, for widgets in loops.
pub fn id_index(label: &str, index: u32) -> WidgetId {
    combine(id(label), WidgetId(index))
}

/// Mix two identities into one.
///
/// The mix is deterministic and order-sensitive: `combine(a, b)` differs
/// from `combine(b, a)`, from `a`, and from `b` for all practical inputs.
pub fn combine(a: WidgetId, b: WidgetId) -> WidgetId {
    WidgetId((a.0.rotate_left(13) ^ b.0).wrapping_mul(0x9E37_79B1))
}
