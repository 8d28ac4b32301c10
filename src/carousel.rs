//! Scroll math for the card viewport: arrow steps, drag-to-scroll and the
//! three pagination dots. Offsets are in viewport units; the host decides
//! what a unit is.

use crate::types::ScrollDirection;

pub const DOT_COUNT: usize = 3;
pub const DEFAULT_STEP: f64 = 350.0;

/// Drag moves the track faster than the pointer.
pub const DRAG_MULTIPLIER: f64 = 2.0;

/// Maps a scroll ratio in [0, 1] to a dot index.
pub fn dot_for_ratio(ratio: f64) -> usize {
    let ratio = ratio.clamp(0.0, 1.0);
    if ratio > 0.60 {
        2
    } else if ratio > 0.25 {
        1
    } else {
        0
    }
}

/// Dot for a scroll position, or `None` when the track does not overflow.
pub fn dot_for_offset(offset: f64, max_offset: f64) -> Option<usize> {
    if max_offset <= 0.0 {
        return None;
    }
    Some(dot_for_ratio(offset / max_offset))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    start_x: f64,
    start_offset: f64,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    step: f64,
    drag: Option<Drag>,
    frame_pending: bool,
    active_dot: usize,
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

impl Carousel {
    pub fn new(step: f64) -> Self {
        Self {
            step,
            drag: None,
            frame_pending: false,
            active_dot: 0,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Signed offset change for an arrow press.
    pub fn button_delta(&self, direction: ScrollDirection) -> f64 {
        direction.sign() * self.step
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn active_dot(&self) -> usize {
        self.active_dot
    }

    pub fn pointer_down(&mut self, x: f64, offset: f64) {
        self.drag = Some(Drag {
            start_x: x,
            start_offset: offset,
        });
    }

    /// New scroll offset for a pointer move, if a drag is in progress.
    pub fn pointer_move(&mut self, x: f64) -> Option<f64> {
        let drag = self.drag?;
        let walk = (x - drag.start_x) * DRAG_MULTIPLIER;
        Some(drag.start_offset - walk)
    }

    /// Ends the drag. Returns whether one was in progress.
    pub fn pointer_release(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Records a scroll event. Returns true when a frame must be requested;
    /// further scrolls before that frame runs are coalesced into it.
    pub fn on_scroll(&mut self) -> bool {
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Runs the pending dot update. Returns the dot to mark active, or `None`
    /// when nothing was pending or the track does not overflow.
    pub fn on_animation_frame(&mut self, offset: f64, max_offset: f64) -> Option<usize> {
        if !std::mem::take(&mut self.frame_pending) {
            return None;
        }
        let dot = dot_for_offset(offset, max_offset)?;
        self.active_dot = dot;
        Some(dot)
    }

    /// Drops any drag and pending frame, as after a mode switch.
    pub fn reset(&mut self) {
        self.drag = None;
        self.frame_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_bands() {
        assert_eq!(dot_for_ratio(0.0), 0);
        assert_eq!(dot_for_ratio(0.25), 0);
        assert_eq!(dot_for_ratio(0.30), 1);
        assert_eq!(dot_for_ratio(0.60), 1);
        assert_eq!(dot_for_ratio(0.70), 2);
        assert_eq!(dot_for_ratio(1.5), 2);
        assert_eq!(dot_for_ratio(-0.2), 0);
    }

    #[test]
    fn no_overflow_means_no_update() {
        assert_eq!(dot_for_offset(0.0, 0.0), None);
        assert_eq!(dot_for_offset(10.0, -5.0), None);
        assert_eq!(dot_for_offset(70.0, 100.0), Some(2));
    }

    #[test]
    fn arrows_step_both_ways() {
        let c = Carousel::default();
        assert_eq!(c.button_delta(ScrollDirection::Right), 350.0);
        assert_eq!(c.button_delta(ScrollDirection::Left), -350.0);
    }

    #[test]
    fn drag_applies_multiplier_against_start_offset() {
        let mut c = Carousel::default();
        assert_eq!(c.pointer_move(50.0), None);

        c.pointer_down(100.0, 400.0);
        assert!(c.is_dragging());
        assert_eq!(c.pointer_move(70.0), Some(460.0));
        assert_eq!(c.pointer_move(150.0), Some(300.0));

        assert!(c.pointer_release());
        assert!(!c.pointer_release());
        assert_eq!(c.pointer_move(0.0), None);
    }

    #[test]
    fn scroll_events_coalesce_into_one_frame() {
        let mut c = Carousel::default();
        assert!(c.on_scroll());
        assert!(!c.on_scroll());
        assert!(!c.on_scroll());
        assert_eq!(c.on_animation_frame(30.0, 100.0), Some(1));
        assert_eq!(c.active_dot(), 1);
        assert_eq!(c.on_animation_frame(90.0, 100.0), None);
        assert!(c.on_scroll());
    }

    #[test]
    fn frame_without_overflow_keeps_prior_dot() {
        let mut c = Carousel::default();
        c.on_scroll();
        assert_eq!(c.on_animation_frame(80.0, 100.0), Some(2));
        c.on_scroll();
        assert_eq!(c.on_animation_frame(0.0, 0.0), None);
        assert_eq!(c.active_dot(), 2);
        assert!(!c.frame_pending());
    }
}
