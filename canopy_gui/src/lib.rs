// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy GUI: an immediate-mode widget layer over `canopy_layout`.
//!
//! Each frame, application code re-declares its widget tree; this crate
//! reconciles the declarations onto persistent layout nodes so the retained
//! engine can cache aggressively underneath the immediate-mode surface.
//!
//! - Widgets are addressed by stable 32-bit identities: hash a label with
//!   [`id`], derive loop variants with [`id_index`], and nest repeated
//!   structure under scopes ([`Gui::push_id`] / [`Gui::pop_id`]).
//! - [`Gui::begin_frame`] / [`Gui::end_frame`] bracket a frame. Widgets
//!   declared with [`Gui::widget`] or [`Gui::begin`]/[`Gui::end`] are
//!   created, restyled, or reparented to match; anything not declared is
//!   pruned at frame end, and layout is computed once.
//! - Interaction comes from a single captured mouse record
//!   ([`Gui::set_mouse`]): [`Gui::hovered`], [`Gui::pressed`],
//!   [`Gui::clicked`], or all at once via [`Gui::interaction`].
//! - Rendering stays outside: walk the computed tree and drive a
//!   [`Renderer`] backend of your choosing.
//!
//! # Example
//!
//! ```
//! use canopy_gui::{id, Gui, GuiConfig};
//! use canopy_layout::Style;
//!
//! let mut gui = Gui::new(&GuiConfig::default());
//! gui.begin_frame();
//! gui.begin(id("toolbar"), &Style { height: 32.0, ..Style::default() });
//! gui.widget(id("open"), &Style { width: 80.0, height: 32.0, ..Style::default() });
//! gui.widget(id("save"), &Style { width: 80.0, height: 32.0, ..Style::default() });
//! gui.end();
//! gui.end_frame();
//!
//! assert_eq!(gui.get_rect(id("open")).height, 32.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. The default `std` feature only
//! forwards to dependencies; disable it and enable `libm` for no_std
//! targets.

#![no_std]

extern crate alloc;

mod gui;
mod id;
mod input;
mod render;

pub use gui::{Gui, GuiConfig, Interaction};
pub use id::{combine, id, id_index, WidgetId};
pub use input::Mouse;
pub use render::{Color, Renderer};
