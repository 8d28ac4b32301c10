use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Sparkline, Widget},
    Frame,
};

use crate::carousel::DOT_COUNT;
use crate::types::{Cursor, DisplayMode};
use crate::ui::term_host::{TermHost, CARD_PITCH, CARD_WIDTH};
use crate::view::CardView;

/// What the bars show besides the host's own state.
pub struct Status {
    pub last_refresh: Option<DateTime<Local>>,
}

const CARD_HEIGHT: u16 = 10;

pub fn draw(f: &mut Frame, host: &mut TermHost, status: &Status) {
    let bg_block = Block::default().style(Style::default().bg(host.theme.bg));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),           // top bar
            Constraint::Length(CARD_HEIGHT), // carousel
            Constraint::Length(1),           // dots
            Constraint::Min(0),
            Constraint::Length(1), // bottom bar
        ])
        .split(f.area());

    draw_top_bar(f, host, status, chunks[0]);
    draw_carousel(f, host, chunks[1]);
    draw_dots(f, host, chunks[2]);
    draw_bottom_bar(f, host, chunks[4]);
}

// -- Top bar --

fn draw_top_bar(f: &mut Frame, host: &mut TermHost, status: &Status, area: Rect) {
    let t = host.theme.clone();
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(t.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut spans: Vec<Span> = vec![Span::styled(
        " coinreel ",
        Style::default().fg(t.title).add_modifier(Modifier::BOLD),
    )];
    let mut x = inner.x + spans[0].width() as u16;

    for (i, mode) in DisplayMode::ALL.iter().enumerate() {
        let label = format!(" {} ", mode.label());
        let width = label.chars().count() as u16;
        host.hit.tabs[i] = Rect::new(x, inner.y, width, 1);
        x += width + 1;

        let style = if host.tab_active(*mode) {
            Style::default()
                .fg(t.title)
                .bg(t.tab_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.dim)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    let refresh_info = match status.last_refresh {
        Some(at) => format!("updated {}", at.format("%H:%M:%S")),
        None => "loading...".to_string(),
    };
    let used: usize = spans.iter().map(|s| s.width()).sum();
    let pad = (inner.width as usize).saturating_sub(used + refresh_info.len() + 1);
    if pad > 0 {
        spans.push(Span::raw(" ".repeat(pad)));
    }
    spans.push(Span::styled(refresh_info, Style::default().fg(t.dim)));

    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// -- Carousel --

fn draw_carousel(f: &mut Frame, host: &mut TermHost, area: Rect) {
    let t = host.theme.clone();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    host.hit.arrow_left = cols[0];
    host.hit.viewport = cols[1];
    host.hit.arrow_right = cols[2];
    host.set_viewport_cols(cols[1].width);

    let arrow_y = area.y + area.height / 2;
    let arrow_style = Style::default().fg(t.accent).add_modifier(Modifier::BOLD);
    f.render_widget(
        Paragraph::new(" \u{2039} ").style(arrow_style),
        Rect::new(cols[0].x, arrow_y, cols[0].width, 1),
    );
    f.render_widget(
        Paragraph::new(" \u{203a} ").style(arrow_style),
        Rect::new(cols[2].x, arrow_y, cols[2].width, 1),
    );

    if host.cards.is_empty() {
        let msg = host
            .placeholder
            .clone()
            .unwrap_or_else(|| "Fetching market data...".to_string());
        let p = Paragraph::new(format!("  {}", msg)).style(Style::default().fg(t.dim));
        f.render_widget(p, cols[1]);
        return;
    }

    // Draw the whole track off-screen, then copy the visible window.
    let track = Rect::new(0, 0, host.content_cols(), area.height);
    let mut scratch = Buffer::empty(track);
    for (i, card) in host.cards.iter().enumerate() {
        let card_area = Rect::new(i as u16 * CARD_PITCH, 0, CARD_WIDTH, area.height);
        draw_card(&mut scratch, card, card_area, host);
    }

    let viewport = cols[1];
    let offset = host.offset_cols();
    let buf = f.buffer_mut();
    for dy in 0..viewport.height {
        for dx in 0..viewport.width {
            let Some(src) = scratch.cell((offset + dx, dy)) else {
                continue;
            };
            if let Some(dst) = buf.cell_mut((viewport.x + dx, viewport.y + dy)) {
                *dst = src.clone();
            }
        }
    }
}

fn draw_card(buf: &mut Buffer, card: &CardView, area: Rect, host: &TermHost) {
    let t = &host.theme;
    let trend_color = t.trend(card.change.trend);

    let block = Block::default()
        .title(format!(" {} ", card.name))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(t.border));
    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // symbol
            Constraint::Min(2),    // sparkline
            Constraint::Length(1), // price
            Constraint::Length(1), // change
        ])
        .split(inner);

    Paragraph::new(card.symbol.to_uppercase())
        .style(Style::default().fg(t.dim))
        .render(rows[0], buf);

    let spark_data = spark_levels(&card.prices, rows[1].width as usize, rows[1].height as usize);
    Sparkline::default()
        .data(&spark_data)
        .style(Style::default().fg(trend_color))
        .render(rows[1], buf);

    Paragraph::new(Line::from(vec![
        Span::styled(
            format!("${}", card.price),
            Style::default().fg(t.fg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" USD", Style::default().fg(t.dim)),
    ]))
    .render(rows[2], buf);

    Paragraph::new(card.change.text.clone())
        .style(Style::default().fg(trend_color))
        .render(rows[3], buf);
}

/// Scales a price series to sparkline bar heights for a `width` x `height`
/// cell area.
fn spark_levels(prices: &[f64], width: usize, height: usize) -> Vec<u64> {
    let sampled = downsample(prices, width);
    let resolution = height.max(1) as f64 * 8.0;
    let min_p = sampled.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_p = sampled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max_p - min_p;
    if range == 0.0 {
        vec![(resolution / 2.0) as u64; sampled.len()]
    } else {
        sampled
            .iter()
            .map(|p| ((p - min_p) / range * resolution) as u64)
            .collect()
    }
}

/// Shrinks a series to `buckets` points. Each bucket contributes whichever of
/// its extremes lies further from the point before it, so spikes survive.
fn downsample(data: &[f64], buckets: usize) -> Vec<f64> {
    if buckets == 0 || data.is_empty() {
        return Vec::new();
    }
    if data.len() <= buckets {
        return data.to_vec();
    }
    let width = data.len() as f64 / buckets as f64;
    let mut out: Vec<f64> = Vec::with_capacity(buckets);
    for i in 0..buckets {
        let lo = (i as f64 * width) as usize;
        let hi = (((i + 1) as f64 * width) as usize).min(data.len());
        let Some(bucket) = data.get(lo..hi).filter(|b| !b.is_empty()) else {
            if let Some(&last) = out.last() {
                out.push(last);
            }
            continue;
        };
        let low = bucket.iter().copied().fold(f64::INFINITY, f64::min);
        let high = bucket.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let point = match out.last() {
            Some(&prev) if f64::abs(low - prev) > f64::abs(high - prev) => low,
            Some(_) => high,
            None => bucket[bucket.len() - 1],
        };
        out.push(point);
    }
    out
}

// -- Dots --

fn draw_dots(f: &mut Frame, host: &TermHost, area: Rect) {
    let t = &host.theme;
    let mut spans = Vec::with_capacity(DOT_COUNT * 2);
    for i in 0..DOT_COUNT {
        if i == host.active_dot() {
            spans.push(Span::styled("\u{25cf}", Style::default().fg(t.accent)));
        } else {
            spans.push(Span::styled("\u{25cb}", Style::default().fg(t.dim)));
        }
        spans.push(Span::raw(" "));
    }
    let p = Paragraph::new(Line::from(spans)).alignment(ratatui::layout::Alignment::Center);
    f.render_widget(p, area);
}

// -- Bottom bar --

fn draw_bottom_bar(f: &mut Frame, host: &TermHost, area: Rect) {
    let t = &host.theme;
    let grip = match host.cursor() {
        Cursor::Grab => "\u{270b} drag",
        Cursor::Grabbing => "\u{270a} dragging",
    };
    let spans = vec![
        Span::styled(
            " t trending | m movers | Tab \u{21c6} | h/l scroll | r refresh | q quit ",
            Style::default().fg(t.dim),
        ),
        Span::styled(format!(" \u{2502} {}", grip), Style::default().fg(t.accent)),
    ];
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
