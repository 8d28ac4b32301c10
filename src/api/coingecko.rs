use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::types::CoinRecord;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";
const PRO_BASE_URL: &str = "https://pro-api.coingecko.com/api/v3";

/// Prices are always quoted in US dollars; cards label them as such.
pub const VS_CURRENCY: &str = "usd";
/// Size of the listing kept in the cache.
pub const PER_PAGE: u32 = 30;

/// Why a refresh cycle produced no data. Every variant is handled the same
/// way by the widget; the distinction only matters for the log line.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to reach CoinGecko API: {0}")]
    Network(#[from] reqwest::Error),
    #[error("CoinGecko API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to parse market data: {source} | response: {snippet}")]
    Decode {
        source: serde_json::Error,
        snippet: String,
    },
}

pub struct CoinGeckoClient {
    client: Client,
    api_key: String,
}

impl CoinGeckoClient {
    pub fn new(api_key: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("coinreel/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
        })
    }

    fn base_url(&self) -> &str {
        if self.api_key.is_empty() {
            BASE_URL
        } else {
            PRO_BASE_URL
        }
    }

    fn apply_key(&self, url: &str) -> String {
        if self.api_key.is_empty() {
            url.to_string()
        } else {
            let sep = if url.contains('?') { "&" } else { "?" };
            format!("{}{}x_cg_pro_api_key={}", url, sep, self.api_key)
        }
    }

    /// Listing URL for the top [`PER_PAGE`] coins by market cap, with the 7d
    /// sparkline and 24h change included.
    pub fn markets_url(&self) -> String {
        let url = format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=true&price_change_percentage=24h",
            self.base_url(),
            VS_CURRENCY,
            PER_PAGE
        );
        self.apply_key(&url)
    }

    #[instrument(skip(self))]
    pub async fn fetch_markets(&self) -> Result<Vec<CoinRecord>, FetchError> {
        let url = self.markets_url();

        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let text = resp.text().await?;
        let coins = parse_markets(&text)?;
        debug!(count = coins.len(), "fetched market listing");
        Ok(coins)
    }
}

/// Parses a `coins/markets` response body. A body that does not decode as a
/// whole is rejected; nothing is salvaged from it.
pub fn parse_markets(text: &str) -> Result<Vec<CoinRecord>, FetchError> {
    serde_json::from_str(text).map_err(|source| FetchError::Decode {
        source,
        snippet: text.chars().take(300).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markets_url_requests_sparkline_and_24h_change() {
        let client = CoinGeckoClient::new("").unwrap();
        let url = client.markets_url();
        assert_eq!(
            url,
            "https://api.coingecko.com/api/v3/coins/markets?vs_currency=usd&order=market_cap_desc&per_page=30&page=1&sparkline=true&price_change_percentage=24h"
        );
    }

    #[test]
    fn pro_key_switches_host_and_appends_key() {
        let client = CoinGeckoClient::new("abc123").unwrap();
        let url = client.markets_url();
        assert!(url.starts_with(PRO_BASE_URL));
        assert!(url.ends_with("&x_cg_pro_api_key=abc123"));
        assert!(url.contains("vs_currency=usd&"));
        assert!(url.contains("per_page=30&"));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = parse_markets(r#"{"status":{"error_code":429}}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
        assert!(err.to_string().contains("error_code"));
    }

    #[test]
    fn parses_listing() {
        let body = r#"[
            {"id":"bitcoin","symbol":"btc","name":"Bitcoin","image":"b.png","current_price":64000.0,"market_cap":1.2e12,"price_change_percentage_24h":1.5,"sparkline_in_7d":{"price":[1.0,2.0]}},
            {"id":"ethereum","symbol":"eth","name":"Ethereum","image":"e.png","current_price":3100.0,"market_cap":3.7e11,"price_change_percentage_24h":null,"sparkline_in_7d":{"price":[]}}
        ]"#;
        let coins = parse_markets(body).unwrap();
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[1].price_change_percentage_24h, None);
    }
}
