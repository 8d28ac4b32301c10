//! Sparkline geometry and its inline SVG rendering.
//!
//! Points live in a fixed 300×100 box with y growing downwards, so the
//! highest price sits at the top edge and the lowest at the bottom.

use std::fmt::Write;

pub const WIDTH: f64 = 300.0;
pub const HEIGHT: f64 = 100.0;

/// Range used when every sample is equal.
const FLAT_RANGE: f64 = 0.0001;

pub const UP_COLOR: &str = "#34C759";
pub const DOWN_COLOR: &str = "#FF3B30";

/// Maps a price series onto the sparkline box. Empty input gives no points.
///
/// A flat series normalises to zero, so it lies along the bottom edge
/// (`y = HEIGHT`); `FLAT_RANGE` only keeps the division finite.
pub fn points(prices: &[f64]) -> Vec<(f64, f64)> {
    if prices.is_empty() {
        return Vec::new();
    }
    let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = match max - min {
        r if r == 0.0 => FLAT_RANGE,
        r => r,
    };
    let step_x = if prices.len() > 1 {
        WIDTH / (prices.len() - 1) as f64
    } else {
        0.0
    };

    prices
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64 * step_x, HEIGHT - (p - min) / range * HEIGHT))
        .collect()
}

/// `M x y L x y ...` path data for the stroke.
pub fn line_path(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        if i == 0 {
            let _ = write!(d, "M {} {}", fmt_coord(*x), fmt_coord(*y));
        } else {
            let _ = write!(d, " L {} {}", fmt_coord(*x), fmt_coord(*y));
        }
    }
    d
}

/// The stroke path closed down to the bottom edge.
pub fn fill_path(line: &str) -> String {
    format!("{} L {} {} L 0 {} Z", line, WIDTH, HEIGHT, HEIGHT)
}

fn fmt_coord(v: f64) -> String {
    let s = format!("{:.2}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn color(is_negative: bool) -> &'static str {
    if is_negative {
        DOWN_COLOR
    } else {
        UP_COLOR
    }
}

pub fn gradient_id(is_negative: bool) -> &'static str {
    if is_negative {
        "grad-down"
    } else {
        "grad-up"
    }
}

/// Inline SVG for a price series, or an empty string when there is nothing
/// to draw.
pub fn render_svg(prices: &[f64], is_negative: bool) -> String {
    let pts = points(prices);
    if pts.is_empty() {
        return String::new();
    }
    let line = line_path(&pts);
    let fill = fill_path(&line);
    let color = color(is_negative);
    let grad = gradient_id(is_negative);

    format!(
        concat!(
            r#"<svg class="icaw-sparkline" viewBox="0 0 {w} {h}" preserveAspectRatio="none">"#,
            r#"<defs><linearGradient id="{grad}" x1="0%" y1="0%" x2="0%" y2="100%">"#,
            r#"<stop offset="0%" style="stop-color:{color};stop-opacity:0.25" />"#,
            r#"<stop offset="100%" style="stop-color:{color};stop-opacity:0" />"#,
            r#"</linearGradient></defs>"#,
            r#"<path d="{fill}" fill="url(#{grad})" stroke="none" />"#,
            r#"<path d="{line}" fill="none" stroke="{color}" stroke-width="2" vector-effect="non-scaling-stroke" stroke-linecap="round" stroke-linejoin="round" />"#,
            r#"</svg>"#
        ),
        w = WIDTH,
        h = HEIGHT,
        grad = grad,
        color = color,
        fill = fill,
        line = line,
    )
}
