//! A scrollable carousel of crypto price cards with per-coin sparklines,
//! fed by the CoinGecko markets listing.

pub mod api;
pub mod carousel;
pub mod config;
pub mod host;
pub mod markup;
pub mod scheduler;
pub mod sparkline;
pub mod theme;
pub mod types;
pub mod ui;
pub mod view;
pub mod widget;
