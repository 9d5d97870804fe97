//! Static-file quote provider.
//!
//! Real provider HTTP clients (Tradier, Finnhub, ...) live outside this
//! workspace; this fixture serves a canned chain snapshot so the monitor
//! can run without credentials or network access.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use optrack_core::{OptionChainData, ProviderError, QuoteProvider};

#[derive(Debug, Deserialize)]
struct FixtureDoc {
    price: Decimal,
    chain: OptionChainData,
}

pub struct FixtureQuoteProvider {
    doc: FixtureDoc,
}

impl FixtureQuoteProvider {
    /// Load a fixture document from a JSON file.
    ///
    /// # Errors
    /// Fails if the file cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let doc: FixtureDoc = serde_json::from_str(&raw)?;
        Ok(Self { doc })
    }
}

#[async_trait]
impl QuoteProvider for FixtureQuoteProvider {
    async fn fetch_delayed_price(&self, _symbol: &str) -> Result<Decimal, ProviderError> {
        Ok(self.doc.price)
    }

    async fn fetch_option_chain(
        &self,
        _symbol: &str,
        _expiration: Option<NaiveDate>,
    ) -> Result<OptionChainData, ProviderError> {
        Ok(self.doc.chain.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_round_trips_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        fs::write(
            &path,
            r#"{
                "price": "100",
                "chain": {
                    "expirations": ["2026-12-18"],
                    "call_strikes": ["100"],
                    "put_strikes": [],
                    "call_contracts": [
                        {"kind": "call", "strike": "100", "bid": "1.00", "ask": "1.20", "last": null}
                    ],
                    "put_contracts": []
                }
            }"#,
        )
        .unwrap();

        let provider = FixtureQuoteProvider::open(&path).unwrap();
        assert_eq!(
            provider.fetch_delayed_price("AAPL").await.unwrap(),
            Decimal::from(100)
        );
        let chain = provider.fetch_option_chain("AAPL", None).await.unwrap();
        assert_eq!(chain.call_contracts.len(), 1);
        assert!(chain.call_contracts[0].mid().is_some());
    }
}
