//! The seam between the widget and whatever displays it. The widget only
//! ever talks to its mount points through [`Host`].

use crate::carousel::DOT_COUNT;
use crate::markup::{self, PageState};
use crate::types::{Cursor, DisplayMode, ScrollBehavior};
use crate::view::CardView;

/// Stable identifiers of the elements a host page provides.
pub mod mount {
    use crate::types::DisplayMode;

    pub const TRACK: &str = "icaw-card-track";
    pub const VIEWPORT: &str = "icaw-carousel-viewport";
    pub const DOTS: &str = "icaw-pagination-dots";
    pub const TAB_TRENDING: &str = "icaw-tab-trending";
    pub const TAB_MOVERS: &str = "icaw-tab-movers";
    pub const ARROW_LEFT: &str = "icaw-arrow-left";
    pub const ARROW_RIGHT: &str = "icaw-arrow-right";
    pub const DOT_COUNT: usize = crate::carousel::DOT_COUNT;

    pub fn tab_id(mode: DisplayMode) -> &'static str {
        match mode {
            DisplayMode::Trending => TAB_TRENDING,
            DisplayMode::Movers => TAB_MOVERS,
        }
    }
}

pub trait Host {
    /// Replaces everything in the track with these cards.
    fn render_cards(&mut self, cards: &[CardView]);
    /// Replaces the track with a single message.
    fn show_unavailable(&mut self, message: &str);
    fn set_tab_active(&mut self, mode: DisplayMode, active: bool);

    fn scroll_offset(&self) -> f64;
    /// Largest reachable offset; zero or less when the track fits.
    fn max_scroll_offset(&self) -> f64;
    fn scroll_to(&mut self, offset: f64);
    fn scroll_by(&mut self, delta: f64, behavior: ScrollBehavior);

    fn set_cursor(&mut self, cursor: Cursor);
    fn set_scroll_snap(&mut self, enabled: bool);
    fn set_active_dot(&mut self, index: usize);
}

/// Host that keeps the mounted state in memory and can print it as a page.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    pub track: String,
    pub card_count: usize,
    pub active_tabs: [bool; 2],
    pub offset: f64,
    pub viewport_width: f64,
    pub card_pitch: f64,
    pub cursor: Cursor,
    pub snap: bool,
    pub active_dot: Option<usize>,
    pub smooth_scrolls: usize,
}

impl MemoryHost {
    pub fn new(viewport_width: f64, card_pitch: f64) -> Self {
        Self {
            track: String::new(),
            card_count: 0,
            active_tabs: [true, false],
            offset: 0.0,
            viewport_width,
            card_pitch,
            cursor: Cursor::Grab,
            snap: true,
            active_dot: Some(0),
            smooth_scrolls: 0,
        }
    }

    fn tab_index(mode: DisplayMode) -> usize {
        match mode {
            DisplayMode::Trending => 0,
            DisplayMode::Movers => 1,
        }
    }

    pub fn tab_active(&self, mode: DisplayMode) -> bool {
        self.active_tabs[Self::tab_index(mode)]
    }

    pub fn content_width(&self) -> f64 {
        self.card_count as f64 * self.card_pitch
    }

    pub fn to_page(&self) -> String {
        let mode = if self.tab_active(DisplayMode::Movers) {
            DisplayMode::Movers
        } else {
            DisplayMode::Trending
        };
        markup::render_page(&PageState {
            track: &self.track,
            mode,
            active_dot: self.active_dot.unwrap_or(0).min(DOT_COUNT - 1),
            cursor: self.cursor,
            snap: self.snap,
        })
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(1000.0, 316.0)
    }
}

impl Host for MemoryHost {
    fn render_cards(&mut self, cards: &[CardView]) {
        self.track = markup::render_track(cards);
        self.card_count = cards.len();
        self.offset = self.offset.clamp(0.0, self.max_scroll_offset().max(0.0));
    }

    fn show_unavailable(&mut self, message: &str) {
        self.track = markup::render_placeholder(message);
        self.card_count = 0;
        self.offset = 0.0;
    }

    fn set_tab_active(&mut self, mode: DisplayMode, active: bool) {
        self.active_tabs[Self::tab_index(mode)] = active;
    }

    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn max_scroll_offset(&self) -> f64 {
        self.content_width() - self.viewport_width
    }

    fn scroll_to(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, self.max_scroll_offset().max(0.0));
    }

    fn scroll_by(&mut self, delta: f64, behavior: ScrollBehavior) {
        if behavior == ScrollBehavior::Smooth {
            self.smooth_scrolls += 1;
        }
        self.scroll_to(self.offset + delta);
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_scroll_snap(&mut self, enabled: bool) {
        self.snap = enabled;
    }

    fn set_active_dot(&mut self, index: usize) {
        self.active_dot = Some(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolling_is_clamped_to_track() {
        let mut host = MemoryHost::new(1000.0, 300.0);
        host.card_count = 10;
        host.scroll_by(5000.0, ScrollBehavior::Smooth);
        assert_eq!(host.offset, 2000.0);
        host.scroll_to(-10.0);
        assert_eq!(host.offset, 0.0);
        assert_eq!(host.smooth_scrolls, 1);
    }

    #[test]
    fn placeholder_empties_track() {
        let mut host = MemoryHost::default();
        host.show_unavailable("offline");
        assert_eq!(host.card_count, 0);
        assert!(host.track.contains("offline"));
        assert!(host.max_scroll_offset() <= 0.0);
    }
}
