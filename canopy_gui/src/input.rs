// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw mouse-state capture.

use kurbo::Point;

/// The mouse snapshot a context works from.
///
/// `prev_down` is the button state as of the previous frame, captured at
/// `begin_frame`; comparing it with `down` detects edges. `press_position`
/// latches where the button last went down. Click recognition is
/// target-based: on the rising edge the context records which widgets were
/// hovered at that instant, so a click follows the pressed widget rather
/// than a coordinate.
#[derive(Clone, Copy, Debug)]
pub struct Mouse {
    /// Current pointer position in viewport coordinates.
    pub position: Point,
    /// Whether the button is currently held.
    pub down: bool,
    /// Button state at the previous frame boundary.
    pub prev_down: bool,
    /// Pointer position at the most recent press.
    pub press_position: Point,
}

impl Default for Mouse {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            down: false,
            prev_down: false,
            press_position: Point::ZERO,
        }
    }
}

impl Mouse {
    /// Apply an input update. Returns whether this was a rising edge, so
    /// the caller can latch what is under the press; the press position is
    /// latched here.
    pub(crate) fn update(&mut self, position: Point, down: bool) -> bool {
        let pressed = down && !self.down;
        if pressed {
            self.press_position = position;
        }
        self.position = position;
        self.down = down;
        pressed
    }

    /// Snapshot the button state at a frame boundary.
    pub(crate) fn frame_boundary(&mut self) {
        self.prev_down = self.down;
    }

    /// Whether the button was released since the last frame boundary.
    pub(crate) fn released(&self) -> bool {
        self.prev_down && !self.down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_position_latches_on_rising_edge() {
        let mut mouse = Mouse::default();
        mouse.update(Point::new(10.0, 20.0), false);
        mouse.update(Point::new(30.0, 40.0), true);
        mouse.update(Point::new(99.0, 99.0), true);
        assert_eq!(mouse.press_position, Point::new(30.0, 40.0));
    }

    #[test]
    fn update_reports_only_the_rising_edge() {
        let mut mouse = Mouse::default();
        assert!(!mouse.update(Point::new(0.0, 0.0), false));
        assert!(mouse.update(Point::new(0.0, 0.0), true));
        assert!(!mouse.update(Point::new(0.0, 0.0), true));
        assert!(!mouse.update(Point::new(0.0, 0.0), false));
        assert!(mouse.update(Point::new(0.0, 0.0), true));
    }

    #[test]
    fn release_is_an_edge_against_the_frame_boundary() {
        let mut mouse = Mouse::default();
        mouse.update(Point::new(0.0, 0.0), true);
        mouse.frame_boundary();
        assert!(!mouse.released());
        mouse.update(Point::new(0.0, 0.0), false);
        assert!(mouse.released());
        mouse.frame_boundary();
        assert!(!mouse.released());
    }

    #[test]
    fn press_and_release_within_one_frame_is_not_a_release_edge() {
        let mut mouse = Mouse::default();
        mouse.frame_boundary();
        mouse.update(Point::new(0.0, 0.0), true);
        mouse.update(Point::new(0.0, 0.0), false);
        assert!(!mouse.released());
    }
}
