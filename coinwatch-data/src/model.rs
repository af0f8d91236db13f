//! Domain records the rest of the workspace operates on.
//!
//! These are produced exclusively by the [`cmc`](crate::cmc) translation layer and the
//! [`FetchOrchestrator`](crate::fetch::FetchOrchestrator) merge step. Every [`AssetRecord`]
//! carries a snapshot for every [`Currency`], so a partial record cannot be represented.

use crate::currency::{ByCurrency, Currency};
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// Point-in-time figures for one asset converted into one currency.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct QuoteSnapshot {
    pub price: Decimal,
    pub percent_change_1h: Decimal,
    pub percent_change_24h: Decimal,
    pub percent_change_7d: Decimal,
    pub market_cap: Decimal,
}

/// Unified record for one asset, quoted in every [`Currency`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AssetRecord {
    pub id: u64,
    pub slug: String,
    pub rank: Option<u32>,
    pub name: String,
    pub symbol: String,
    pub quotes: ByCurrency<QuoteSnapshot>,
}

impl AssetRecord {
    pub fn quote(&self, currency: Currency) -> &QuoteSnapshot {
        self.quotes.get(currency)
    }

    /// USD snapshot, the single source of percent changes and market capitalisation.
    pub fn usd(&self) -> &QuoteSnapshot {
        &self.quotes.usd
    }
}

/// Ordered `slug -> AssetRecord` mapping.
///
/// Insertion order is display order: top listings in rank order followed by explicitly
/// requested assets that were not already listed.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct DataSet(IndexMap<String, AssetRecord>);

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record keyed by slug. Re-inserting a slug keeps its original position.
    pub fn insert(&mut self, record: AssetRecord) {
        self.0.insert(record.slug.clone(), record);
    }

    pub fn get(&self, slug: &str) -> Option<&AssetRecord> {
        self.0.get(slug)
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.0.values().any(|record| record.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetRecord> {
        self.0.values()
    }
}

impl FromIterator<AssetRecord> for DataSet {
    fn from_iter<I: IntoIterator<Item = AssetRecord>>(iter: I) -> Self {
        let mut data = Self::new();
        for record in iter {
            data.insert(record);
        }
        data
    }
}
