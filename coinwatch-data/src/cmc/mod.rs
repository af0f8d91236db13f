//! CoinMarketCap wire types and their translation into domain records.
//!
//! All stringly-typed access to the provider's JSON is confined to this module. Responses are
//! decoded into the structs below and converted once into [`AssetRecord`]s; nothing outside
//! this module looks at raw `quote` maps.

use crate::{
    currency::{ByCurrency, Currency},
    model::{AssetRecord, QuoteSnapshot},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

pub mod client;

pub use client::CmcClient;

/// Response of `/v1/cryptocurrency/listings/latest`.
pub type ListingsResponse = CmcResponse<Vec<CmcAsset>>;

/// Response of `/v1/cryptocurrency/quotes/latest`, keyed by requested symbol.
pub type QuotesResponse = CmcResponse<HashMap<String, CmcAsset>>;

/// Envelope shared by every CoinMarketCap response.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct CmcResponse<T> {
    pub status: CmcStatus,
    pub data: Option<T>,
}

impl<T> CmcResponse<T> {
    /// Whether the embedded status reports success.
    pub fn is_ok(&self) -> bool {
        self.status.error_code == 0
    }
}

impl<T: Default> CmcResponse<T> {
    /// Successful response carrying no data and costing nothing.
    pub fn empty() -> Self {
        Self {
            status: CmcStatus::default(),
            data: Some(T::default()),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Deserialize)]
pub struct CmcStatus {
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub credit_count: u32,
}

/// Error bodies only need the status to be classified.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CmcErrorBody {
    pub status: CmcStatus,
}

/// One asset entry, as returned by both endpoints.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct CmcAsset {
    pub id: u64,
    pub name: String,
    pub symbol: String,
    pub slug: String,
    #[serde(default)]
    pub cmc_rank: Option<u32>,
    #[serde(default)]
    pub quote: HashMap<String, CmcQuote>,
}

/// Subset of the per-currency `quote` object fields that are displayed.
#[derive(Debug, Clone, Eq, PartialEq, Default, Deserialize)]
pub struct CmcQuote {
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub percent_change_1h: Option<Decimal>,
    #[serde(default)]
    pub percent_change_24h: Option<Decimal>,
    #[serde(default)]
    pub percent_change_7d: Option<Decimal>,
    #[serde(default)]
    pub market_cap: Option<Decimal>,
}

impl CmcQuote {
    /// A quote without a price cannot be displayed; the remaining figures default to zero.
    pub fn snapshot(&self) -> Option<QuoteSnapshot> {
        Some(QuoteSnapshot {
            price: self.price?,
            percent_change_1h: self.percent_change_1h.unwrap_or_default(),
            percent_change_24h: self.percent_change_24h.unwrap_or_default(),
            percent_change_7d: self.percent_change_7d.unwrap_or_default(),
            market_cap: self.market_cap.unwrap_or_default(),
        })
    }
}

impl CmcAsset {
    pub fn snapshot(&self, currency: Currency) -> Option<QuoteSnapshot> {
        self.quote.get(currency.code())?.snapshot()
    }
}

impl AssetRecord {
    /// Assemble a unified record from the same asset fetched once per currency.
    ///
    /// Identity (id, slug, rank, name, symbol) comes from the BTC entry. Each currency slot is
    /// taken from the entry fetched with that `convert`. Returns `None` if any currency slot is
    /// missing a priced quote.
    pub fn from_cmc(assets: ByCurrency<&CmcAsset>) -> Option<Self> {
        let base = assets.btc;
        Some(Self {
            id: base.id,
            slug: base.slug.clone(),
            rank: base.cmc_rank,
            name: base.name.clone(),
            symbol: base.symbol.clone(),
            quotes: ByCurrency {
                btc: assets.btc.snapshot(Currency::Btc)?,
                usd: assets.usd.snapshot(Currency::Usd)?,
                aud: assets.aud.snapshot(Currency::Aud)?,
            },
        })
    }
}
