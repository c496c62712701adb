// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer plugin interface.
//!
//! The core never draws: it computes rectangles and answers queries. A
//! companion layer walks the computed tree and feeds a [`Renderer`]
//! implementation, which adapts whatever backend the application uses
//! (GPU, software, terminal). The trait is object-safe so backends can be
//! swapped behind `&mut dyn Renderer`.

use canopy_layout::Rect;

/// An RGBA color, 8 bits per channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 255 is opaque.
    pub a: u8,
}

impl Color {
    /// An opaque color from red/green/blue.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color from red/green/blue/alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Drawing backend invoked by a paint walk over the computed tree.
///
/// Calls arrive in paint order between `begin_frame` and `end_frame`;
/// `clip_begin`/`clip_end` nest.
pub trait Renderer {
    /// Start a frame.
    fn begin_frame(&mut self);
    /// Finish a frame and present.
    fn end_frame(&mut self);
    /// Fill the whole target with a color.
    fn clear(&mut self, color: Color);
    /// Fill an axis-aligned rectangle.
    fn draw_rect(&mut self, rect: Rect, fill: Color);
    /// Fill a rectangle with rounded corners.
    fn draw_rounded_rect(&mut self, rect: Rect, radius: f32, fill: Color);
    /// Draw a text run with its baseline origin and size in pixels.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
    /// Draw a backend-registered image into a rectangle.
    fn draw_image(&mut self, image: u32, rect: Rect);
    /// Push a clip rectangle.
    fn clip_begin(&mut self, rect: Rect);
    /// Pop the innermost clip rectangle.
    fn clip_end(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Recording {
        calls: Vec<String>,
    }

    impl Renderer for Recording {
        fn begin_frame(&mut self) {
            self.calls.push("begin".into());
        }
        fn end_frame(&mut self) {
            self.calls.push("end".into());
        }
        fn clear(&mut self, _color: Color) {
            self.calls.push("clear".into());
        }
        fn draw_rect(&mut self, _rect: Rect, _fill: Color) {
            self.calls.push("rect".into());
        }
        fn draw_rounded_rect(&mut self, _rect: Rect, _radius: f32, _fill: Color) {
            self.calls.push("rounded".into());
        }
        fn draw_text(&mut self, _text: &str, _x: f32, _y: f32, _size: f32, _color: Color) {
            self.calls.push("text".into());
        }
        fn draw_image(&mut self, _image: u32, _rect: Rect) {
            self.calls.push("image".into());
        }
        fn clip_begin(&mut self, _rect: Rect) {
            self.calls.push("clip+".into());
        }
        fn clip_end(&mut self) {
            self.calls.push("clip-".into());
        }
    }

    #[test]
    fn trait_is_object_safe_and_ordered() {
        let mut backend = Recording::default();
        let r: &mut dyn Renderer = &mut backend;
        r.begin_frame();
        r.clear(Color::rgb(0, 0, 0));
        r.clip_begin(Rect::ZERO);
        r.draw_rect(Rect::ZERO, Color::rgba(1, 2, 3, 4));
        r.clip_end();
        r.end_frame();
        assert_eq!(
            backend.calls,
            ["begin", "clear", "clip+", "rect", "clip-", "end"]
        );
    }

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(10, 20, 30), Color::rgba(10, 20, 30, 255));
    }
}
