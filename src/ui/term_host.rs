use ratatui::layout::Rect;

use crate::host::Host;
use crate::theme::Theme;
use crate::types::{Cursor, DisplayMode, ScrollBehavior};
use crate::view::CardView;

/// Scroll units per terminal column. A 350-unit arrow step moves exactly one
/// card pitch.
pub const CELL_UNITS: f64 = 14.0;
pub const CARD_WIDTH: u16 = 24;
pub const CARD_GAP: u16 = 1;
pub const CARD_PITCH: u16 = CARD_WIDTH + CARD_GAP;

/// Screen regions recorded by the last draw, used for mouse hit testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitAreas {
    pub viewport: Rect,
    pub arrow_left: Rect,
    pub arrow_right: Rect,
    pub tabs: [Rect; 2],
}

pub fn contains(r: Rect, col: u16, row: u16) -> bool {
    col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}

pub fn column_to_units(col: u16) -> f64 {
    col as f64 * CELL_UNITS
}

/// Terminal rendition of the widget's mount points.
pub struct TermHost {
    pub theme: Theme,
    pub cards: Vec<CardView>,
    pub placeholder: Option<String>,
    pub hit: HitAreas,
    tabs: [bool; 2],
    offset: f64,
    target: Option<f64>,
    viewport_cols: u16,
    cursor: Cursor,
    snap: bool,
    active_dot: usize,
    scrolled: bool,
}

impl TermHost {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            cards: Vec::new(),
            placeholder: None,
            hit: HitAreas::default(),
            tabs: [true, false],
            offset: 0.0,
            target: None,
            viewport_cols: 80,
            cursor: Cursor::Grab,
            snap: true,
            active_dot: 0,
            scrolled: false,
        }
    }

    pub fn tab_active(&self, mode: DisplayMode) -> bool {
        match mode {
            DisplayMode::Trending => self.tabs[0],
            DisplayMode::Movers => self.tabs[1],
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn active_dot(&self) -> usize {
        self.active_dot
    }

    /// Current scroll position in whole columns.
    pub fn offset_cols(&self) -> u16 {
        (self.offset / CELL_UNITS).round().max(0.0) as u16
    }

    pub fn content_cols(&self) -> u16 {
        let n = self.cards.len() as u16;
        if n == 0 {
            0
        } else {
            n * CARD_PITCH - CARD_GAP
        }
    }

    pub fn set_viewport_cols(&mut self, cols: u16) {
        if cols != self.viewport_cols {
            self.viewport_cols = cols;
            self.set_offset(self.offset);
        }
    }

    fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_scroll_offset().max(0.0))
    }

    fn set_offset(&mut self, offset: f64) {
        let offset = self.clamp(offset);
        if offset != self.offset {
            self.offset = offset;
            self.scrolled = true;
        }
    }

    /// Nearest card boundary, or the end of the track.
    fn snap_point(&self) -> f64 {
        let pitch = CARD_PITCH as f64 * CELL_UNITS;
        self.clamp((self.offset / pitch).round() * pitch)
    }

    /// Advances smooth scrolling and snapping by one frame.
    pub fn tick(&mut self) {
        if self.target.is_none() && self.snap {
            let snap = self.snap_point();
            if (snap - self.offset).abs() >= 0.5 {
                self.target = Some(snap);
            }
        }
        let Some(target) = self.target else {
            return;
        };
        let distance = target - self.offset;
        if distance.abs() <= CELL_UNITS {
            self.set_offset(target);
            self.target = None;
        } else {
            self.set_offset(self.offset + distance / 3.0);
        }
    }

    /// Whether the offset changed since the last call.
    pub fn take_scrolled(&mut self) -> bool {
        std::mem::take(&mut self.scrolled)
    }
}

impl Host for TermHost {
    fn render_cards(&mut self, cards: &[CardView]) {
        self.cards = cards.to_vec();
        self.placeholder = None;
        self.set_offset(self.offset);
    }

    fn show_unavailable(&mut self, message: &str) {
        self.cards.clear();
        self.placeholder = Some(message.to_string());
        self.target = None;
        self.set_offset(0.0);
    }

    fn set_tab_active(&mut self, mode: DisplayMode, active: bool) {
        match mode {
            DisplayMode::Trending => self.tabs[0] = active,
            DisplayMode::Movers => self.tabs[1] = active,
        }
    }

    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn max_scroll_offset(&self) -> f64 {
        (self.content_cols() as f64 - self.viewport_cols as f64) * CELL_UNITS
    }

    fn scroll_to(&mut self, offset: f64) {
        self.target = None;
        self.set_offset(offset);
    }

    fn scroll_by(&mut self, delta: f64, behavior: ScrollBehavior) {
        match behavior {
            ScrollBehavior::Instant => self.scroll_to(self.offset + delta),
            ScrollBehavior::Smooth => {
                let from = self.target.unwrap_or(self.offset);
                self.target = Some(self.clamp(from + delta));
            }
        }
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_scroll_snap(&mut self, enabled: bool) {
        self.snap = enabled;
    }

    fn set_active_dot(&mut self, index: usize) {
        self.active_dot = index;
    }
}
