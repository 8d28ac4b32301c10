use serde::{Deserialize, Deserializer, Serialize};

fn f64_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Option::<f64>::deserialize(d).map(|v| v.unwrap_or(0.0))
}

fn sparkline_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Sparkline7d, D::Error> {
    Option::<Sparkline7d>::deserialize(d).map(|v| v.unwrap_or_default())
}

/// One coin from a `coins/markets` listing. A fetch replaces the whole set of
/// records; individual records are never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub current_price: f64,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub market_cap: f64,
    #[serde(default, deserialize_with = "sparkline_or_empty")]
    pub sparkline_in_7d: Sparkline7d,
}

impl CoinRecord {
    /// 24h change with a missing value read as zero.
    pub fn change_24h(&self) -> f64 {
        self.price_change_percentage_24h.unwrap_or(0.0)
    }

    pub fn prices_7d(&self) -> &[f64] {
        &self.sparkline_in_7d.price
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sparkline7d {
    #[serde(default)]
    pub price: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Trending,
    Movers,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 2] = [DisplayMode::Trending, DisplayMode::Movers];

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Trending => "Trending",
            DisplayMode::Movers => "Top Movers",
        }
    }

    /// Value the mode sorts on, descending.
    pub fn sort_key(self, coin: &CoinRecord) -> f64 {
        match self {
            DisplayMode::Trending => coin.market_cap,
            DisplayMode::Movers => coin.change_24h(),
        }
    }

    pub fn next(self) -> Self {
        match self {
            DisplayMode::Trending => DisplayMode::Movers,
            DisplayMode::Movers => DisplayMode::Trending,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "trending" => Some(DisplayMode::Trending),
            "movers" => Some(DisplayMode::Movers),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

impl ScrollDirection {
    pub fn sign(self) -> f64 {
        match self {
            ScrollDirection::Left => -1.0,
            ScrollDirection::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Grab,
    Grabbing,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }
}
