//! HTML for the card track and for a standalone widget page.

use std::fmt::Write;

use crate::host::mount;
use crate::sparkline;
use crate::types::{Cursor, DisplayMode};
use crate::view::CardView;

pub const UNAVAILABLE_MESSAGE: &str = "Data unavailable. Try connecting to the internet.";

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_card(card: &CardView) -> String {
    let svg = sparkline::render_svg(&card.prices, card.change.trend.is_negative());
    format!(
        concat!(
            r#"<div class="icaw-card">"#,
            r#"<div class="icaw-card-top">"#,
            r#"<img src="{icon}" alt="{name}" class="icaw-coin-icon">"#,
            r#"<div class="icaw-coin-names">"#,
            r#"<span class="icaw-coin-name">{name}</span>"#,
            r#"<span class="icaw-coin-symbol">{symbol}</span>"#,
            r#"</div></div>"#,
            r#"<div class="icaw-card-graph-container">{svg}</div>"#,
            r#"<div class="icaw-card-bottom"><div class="icaw-price-info">"#,
            r#"<span class="icaw-price">${price} <span class="icaw-currency">USD</span></span>"#,
            r#"<span class="icaw-change {class}">{change}</span>"#,
            r#"</div>"#,
            r#"<a href="{link}" target="_blank" rel="nofollow noopener noreferrer" class="icaw-buy-btn">Buy</a>"#,
            r#"</div></div>"#
        ),
        icon = escape(&card.icon),
        name = escape(&card.name),
        symbol = escape(&card.symbol),
        svg = svg,
        price = escape(&card.price),
        class = card.change.trend.css_class(),
        change = escape(&card.change.text),
        link = escape(&card.buy_link),
    )
}

/// Inner markup for the card track, one card per view in order.
pub fn render_track(cards: &[CardView]) -> String {
    cards.iter().map(render_card).collect()
}

pub fn render_placeholder(message: &str) -> String {
    format!(
        r#"<div class="icaw-loading-placeholder">{}</div>"#,
        escape(message)
    )
}

/// Snapshot of the mounted widget, enough to rebuild the whole page.
pub struct PageState<'a> {
    pub track: &'a str,
    pub mode: DisplayMode,
    pub active_dot: usize,
    pub cursor: Cursor,
    pub snap: bool,
}

/// Standalone widget document containing every mount point.
pub fn render_page(state: &PageState<'_>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>coinreel</title>\n<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"icaw-widget\">\n<div class=\"icaw-tabs\">");

    for mode in DisplayMode::ALL {
        let active = if mode == state.mode { " icaw-active" } else { "" };
        let _ = write!(
            html,
            r#"<button id="{}" class="icaw-tab{}">{}</button>"#,
            mount::tab_id(mode),
            active,
            mode.label()
        );
    }
    html.push_str("</div>\n");

    let _ = write!(
        html,
        concat!(
            r#"<button id="{left}" class="icaw-arrow">&#8249;</button>"#,
            r#"<div id="{viewport}" class="icaw-viewport" style="cursor:{cursor};scroll-snap-type:{snap}">"#,
            r#"<div id="{track}" class="icaw-track">{cards}</div></div>"#,
            r#"<button id="{right}" class="icaw-arrow">&#8250;</button>"#,
            "\n"
        ),
        left = mount::ARROW_LEFT,
        viewport = mount::VIEWPORT,
        cursor = state.cursor.css(),
        snap = if state.snap { "x mandatory" } else { "none" },
        track = mount::TRACK,
        cards = state.track,
        right = mount::ARROW_RIGHT,
    );

    let _ = write!(html, r#"<div id="{}" class="icaw-dots">"#, mount::DOTS);
    for i in 0..mount::DOT_COUNT {
        let active = if i == state.active_dot { " icaw-active" } else { "" };
        let _ = write!(html, r#"<span class="icaw-dot{}"></span>"#, active);
    }
    html.push_str("</div>\n</div>\n</body>\n</html>\n");
    html
}

const STYLE: &str = r#".icaw-widget{font-family:system-ui,sans-serif;position:relative}
.icaw-viewport{display:flex;overflow-x:auto;scroll-snap-type:x mandatory;cursor:grab}
.icaw-track{display:flex;gap:16px}
.icaw-card{flex:0 0 300px;scroll-snap-align:start;border-radius:12px;padding:12px}
.icaw-sparkline{width:100%;height:60px}
.icaw-up{color:#34C759}
.icaw-down{color:#FF3B30}
.icaw-dot{display:inline-block;width:8px;height:8px;border-radius:50%;background:#ccc}
.icaw-dot.icaw-active{background:#333}
.icaw-tab.icaw-active{font-weight:bold}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{build_card, tests::coin};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }

    #[test]
    fn card_has_all_parts() {
        let card = build_card(&coin("bitcoin", 1e12, Some(2.0)), "https://x.test/buy");
        let html = render_card(&card);
        assert!(html.contains(r#"<img src="https://example.com/bitcoin.png" alt="bitcoin""#));
        assert!(html.contains(r#"<span class="icaw-coin-symbol">bit</span>"#));
        assert!(html.contains("<svg"));
        assert!(html.contains(r#"<span class="icaw-price">$1.50 <span class="icaw-currency">USD</span></span>"#));
        assert!(html.contains(r#"<span class="icaw-change icaw-up">+2.00% 24H</span>"#));
        assert!(html.contains(r#"href="https://x.test/buy?coin_symbol=BIT""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains("noopener") && html.contains("noreferrer"));
    }

    #[test]
    fn card_without_series_has_no_svg() {
        let mut c = coin("fresh", 1.0, Some(-3.0));
        c.sparkline_in_7d.price.clear();
        let html = render_card(&build_card(&c, "b"));
        assert!(!html.contains("<svg"));
        assert!(html.contains(r#"<div class="icaw-card-graph-container"></div>"#));
        assert!(html.contains("icaw-down"));
    }

    #[test]
    fn hostile_names_are_escaped() {
        let mut c = coin("x", 1.0, None);
        c.name = "<script>alert(1)</script>".into();
        let html = render_card(&build_card(&c, "b"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn page_has_every_mount_point() {
        let page = render_page(&PageState {
            track: &render_placeholder(UNAVAILABLE_MESSAGE),
            mode: DisplayMode::Movers,
            active_dot: 1,
            cursor: Cursor::Grabbing,
            snap: false,
        });
        for id in [
            mount::TRACK,
            mount::VIEWPORT,
            mount::DOTS,
            mount::ARROW_LEFT,
            mount::ARROW_RIGHT,
            mount::TAB_TRENDING,
            mount::TAB_MOVERS,
        ] {
            assert!(page.contains(&format!(r#"id="{}""#, id)), "missing {}", id);
        }
        assert_eq!(page.matches(r#"<span class="icaw-dot"#).count(), 3);
        assert_eq!(page.matches(r#"<span class="icaw-dot icaw-active">"#).count(), 1);
        assert!(page.contains(r#"<button id="icaw-tab-movers" class="icaw-tab icaw-active">"#));
        assert!(page.contains(UNAVAILABLE_MESSAGE));
        assert!(page.contains("cursor:grabbing;scroll-snap-type:none"));
    }
}
