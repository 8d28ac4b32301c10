pub mod coingecko;

pub use coingecko::{parse_markets, CoinGeckoClient, FetchError};
