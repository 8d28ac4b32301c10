//! Terminal palettes. Trend colours follow the sparkline stroke colours.

use ratatui::style::Color;

use crate::view::Trend;

#[derive(Debug, Clone)]
pub struct Theme {
    pub fg: Color,
    pub bg: Color,
    pub dim: Color,
    pub border: Color,
    /// Background of the active tab.
    pub tab_bg: Color,
    pub up: Color,
    pub down: Color,
    pub accent: Color,
    pub title: Color,
}

impl Theme {
    pub fn trend(&self, trend: Trend) -> Color {
        match trend {
            Trend::Up => self.up,
            Trend::Down => self.down,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        dark()
    }
}

pub const THEME_NAMES: &[&str] = &["dark", "light", "no-color"];

/// Unknown names fall back to the dark palette.
pub fn by_name(name: &str) -> Theme {
    match name {
        "light" => light(),
        "no-color" => no_color(),
        _ => dark(),
    }
}

fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

pub fn dark() -> Theme {
    Theme {
        fg: Color::Indexed(253),
        bg: Color::Reset,
        dim: Color::Indexed(243),
        border: Color::Indexed(240),
        tab_bg: Color::Indexed(237),
        up: hex(0x34C759),
        down: hex(0xFF3B30),
        accent: Color::Indexed(81),
        title: Color::Indexed(255),
    }
}

pub fn light() -> Theme {
    Theme {
        fg: Color::Indexed(234),
        bg: Color::Indexed(231),
        dim: Color::Indexed(246),
        border: Color::Indexed(251),
        tab_bg: Color::Indexed(253),
        up: hex(0x1E8E3E),
        down: hex(0xC5221F),
        accent: Color::Indexed(25),
        title: Color::Indexed(232),
    }
}

pub fn no_color() -> Theme {
    Theme {
        fg: Color::Reset,
        bg: Color::Reset,
        dim: Color::Reset,
        border: Color::Reset,
        tab_bg: Color::Reset,
        up: Color::Reset,
        down: Color::Reset,
        accent: Color::Reset,
        title: Color::Reset,
    }
}
