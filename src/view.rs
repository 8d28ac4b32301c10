//! Pure derivations from the cache: visible set, number formatting and the
//! per-card view models every host renders from.

use std::cmp::Ordering;

use crate::types::{CoinRecord, DisplayMode};

pub const VISIBLE_COUNT: usize = 10;

/// Sorts a copy of the cache by the mode's key, descending, and keeps the
/// first `limit` records. Equal keys keep their listing order.
pub fn compute_visible_set(cache: &[CoinRecord], mode: DisplayMode, limit: usize) -> Vec<CoinRecord> {
    let mut sorted = cache.to_vec();
    sorted.sort_by(|a, b| descending(mode.sort_key(a), mode.sort_key(b)));
    sorted.truncate(limit);
    sorted
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Dollar amount without the currency symbol. Sub-dollar prices keep 4 to 6
/// fraction digits so small caps never collapse to `0.00`.
pub fn format_price(amount: f64) -> String {
    if amount < 1.0 {
        let s = format!("{:.6}", amount);
        trim_fraction(&s, 4)
    } else {
        group_thousands(&format!("{:.2}", amount))
    }
}

fn trim_fraction(s: &str, min_digits: usize) -> String {
    match s.split_once('.') {
        Some((int, frac)) => {
            let trimmed = frac.trim_end_matches('0');
            let keep = trimmed.len().max(min_digits).min(frac.len());
            format!("{}.{}", group_thousands(int), &frac[..keep])
        }
        None => s.to_string(),
    }
}

/// en-US thousands grouping of the integer part; any fraction is kept as is.
fn group_thousands(s: &str) -> String {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int, frac) = match rest.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (rest, None),
    };
    let lead = match int.len() % 3 {
        0 => 3,
        n => n,
    };
    let mut out = String::with_capacity(s.len() + int.len() / 3);
    out.push_str(sign);
    out.push_str(&int[..lead.min(int.len())]);
    let mut i = lead;
    while i < int.len() {
        out.push(',');
        out.push_str(&int[i..i + 3]);
        i += 3;
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn css_class(self) -> &'static str {
        match self {
            Trend::Up => "icaw-up",
            Trend::Down => "icaw-down",
        }
    }

    pub fn is_negative(self) -> bool {
        self == Trend::Down
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeLabel {
    pub text: String,
    pub trend: Trend,
}

/// `+1.23% 24H` / `-4.56% 24H`. A missing change reads as `+0.00% 24H`.
pub fn format_change(change: Option<f64>) -> ChangeLabel {
    let pct = change.unwrap_or(0.0);
    if pct < 0.0 {
        ChangeLabel {
            text: format!("{:.2}% 24H", pct),
            trend: Trend::Down,
        }
    } else {
        ChangeLabel {
            text: format!("+{:.2}% 24H", pct),
            trend: Trend::Up,
        }
    }
}

pub fn affiliate_link(base: &str, symbol: &str) -> String {
    format!("{}?coin_symbol={}", base, symbol.to_uppercase())
}

/// Everything a host needs to draw one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub icon: String,
    pub price: String,
    pub change: ChangeLabel,
    pub prices: Vec<f64>,
    pub buy_link: String,
}

pub fn build_card(coin: &CoinRecord, affiliate_base: &str) -> CardView {
    CardView {
        id: coin.id.clone(),
        name: coin.name.clone(),
        symbol: coin.symbol.clone(),
        icon: coin.image.clone(),
        price: format_price(coin.current_price),
        change: format_change(coin.price_change_percentage_24h),
        prices: coin.prices_7d().to_vec(),
        buy_link: affiliate_link(affiliate_base, &coin.symbol),
    }
}

pub fn build_cards(coins: &[CoinRecord], affiliate_base: &str) -> Vec<CardView> {
    coins.iter().map(|c| build_card(c, affiliate_base)).collect()
}
