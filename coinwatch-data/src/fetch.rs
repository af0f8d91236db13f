//! One poll-merge cycle against the market data provider.
//!
//! A cycle issues six calls in a fixed order (listings then quotes, each in
//! [`Currency::ALL`] order), classifies any failure into a [`CycleFailure`] carrying its
//! reschedule policy, and on success swaps the freshly merged [`DataSet`] in as current data.

use crate::{
    client::MarketDataClient,
    cmc::{CmcAsset, CmcStatus, ListingsResponse, QuotesResponse},
    currency::{ByCurrency, Currency},
    error::DataError,
    model::{AssetRecord, DataSet},
    schedule::{Clock, ScheduleState, SystemClock},
};
use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexSet;
use std::{collections::HashMap, sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fetch cycle configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Number of top assets requested from the listings endpoint.
    pub listings_limit: usize,
    /// Maximum batches issued per cycle when calls fail at connection level.
    pub max_attempts: u32,
    /// Delay between a successful cycle and the next one. Also the standard failure backoff.
    pub refresh_interval: TimeDelta,
    /// Backoff applied after the provider reports an internal server error.
    pub server_error_backoff: TimeDelta,
    /// Pause before re-issuing a batch after a connection failure.
    pub retry_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            listings_limit: 20,
            max_attempts: 5,
            refresh_interval: TimeDelta::minutes(30),
            server_error_backoff: TimeDelta::minutes(1),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl FetchConfig {
    pub fn with_listings_limit(mut self, limit: usize) -> Self {
        self.listings_limit = limit;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_refresh_interval(mut self, interval: TimeDelta) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_server_error_backoff(mut self, backoff: TimeDelta) -> Self {
        self.server_error_backoff = backoff;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

/// Reason a fetch cycle was abandoned.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum CycleFailure {
    #[error("rate limited by provider: {message}")]
    RateLimited { message: String },

    #[error("provider internal server error: {message}")]
    ServerError { message: String },

    #[error("request rejected (code: {code:?}): {message}")]
    Rejected { code: Option<i64>, message: String },

    #[error("connection failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    #[error("provider reported error_code {error_code}: {message}")]
    Semantic { error_code: i64, message: String },

    #[error("undecodable provider response: {0}")]
    Decode(String),
}

impl CycleFailure {
    /// Delay until the next cycle may run.
    pub fn backoff(&self, config: &FetchConfig) -> TimeDelta {
        match self {
            CycleFailure::ServerError { .. } => config.server_error_backoff,
            _ => config.refresh_interval,
        }
    }
}

impl From<DataError> for CycleFailure {
    fn from(error: DataError) -> Self {
        if error.is_rate_limited() {
            return CycleFailure::RateLimited {
                message: error.to_string(),
            };
        }
        if error.is_server_error() {
            return CycleFailure::ServerError {
                message: error.to_string(),
            };
        }

        match error {
            DataError::Decode(message) => CycleFailure::Decode(message),
            DataError::Transport { .. } => CycleFailure::Rejected {
                code: error.code(),
                message: error.to_string(),
            },
            DataError::Configuration(message) => CycleFailure::Rejected {
                code: None,
                message,
            },
        }
    }
}

/// All six responses of one transport-successful batch.
#[derive(Debug)]
struct Batch {
    listings: ByCurrency<ListingsResponse>,
    quotes: ByCurrency<QuotesResponse>,
}

impl Batch {
    /// First embedded status reporting an error, in call order.
    fn rejection(&self) -> Option<&CmcStatus> {
        self.listings
            .iter()
            .map(|(_, response)| &response.status)
            .chain(self.quotes.iter().map(|(_, response)| &response.status))
            .find(|status| status.error_code != 0)
    }
}

/// Drives fetch cycles and owns the current data, the previous data and the schedule.
#[derive(Debug)]
pub struct FetchOrchestrator<C> {
    client: C,
    config: FetchConfig,
    requested: IndexSet<String>,
    clock: Arc<dyn Clock>,
    current: DataSet,
    previous: DataSet,
    schedule: ScheduleState,
}

impl<C> FetchOrchestrator<C>
where
    C: MarketDataClient,
{
    pub fn new(client: C, requested: IndexSet<String>, config: FetchConfig) -> Self {
        Self::with_clock(client, requested, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        client: C,
        requested: IndexSet<String>,
        config: FetchConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let schedule = ScheduleState::new(clock.now());
        Self {
            client,
            config,
            requested,
            clock,
            current: DataSet::new(),
            previous: DataSet::new(),
            schedule,
        }
    }

    pub fn current(&self) -> &DataSet {
        &self.current
    }

    pub fn previous(&self) -> &DataSet {
        &self.previous
    }

    pub fn schedule(&self) -> &ScheduleState {
        &self.schedule
    }

    /// Symbols explicitly requested by the operator, in file order.
    pub fn requested(&self) -> &IndexSet<String> {
        &self.requested
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn is_due(&self) -> bool {
        self.schedule.is_due(self.clock.now())
    }

    /// Run one fetch cycle and reschedule according to its outcome.
    ///
    /// On failure the current and previous data are left untouched.
    pub async fn run_cycle(&mut self) -> Result<(), CycleFailure> {
        let outcome = match self.fetch_with_retry().await {
            Ok(batch) => self.merge(batch),
            Err(failure) => Err(failure),
        };

        let now = self.clock.now();
        match outcome {
            Ok(data) => {
                let next_fetch = now + self.config.refresh_interval;
                self.previous = std::mem::replace(&mut self.current, data);
                self.schedule.last_fetch = Some(now);
                self.schedule.next_fetch = Some(next_fetch);
                info!(
                    assets = self.current.len(),
                    credits_used = self.schedule.credits_used,
                    %next_fetch,
                    "fetch cycle succeeded"
                );
                Ok(())
            }
            Err(failure) => {
                let next_fetch = now + failure.backoff(&self.config);
                self.schedule.next_fetch = Some(next_fetch);
                warn!(%failure, %next_fetch, "fetch cycle failed, rescheduled");
                Err(failure)
            }
        }
    }

    async fn fetch_with_retry(&mut self) -> Result<Batch, CycleFailure> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.fetch_batch().await {
                Ok(batch) => return Ok(batch),
                Err(error) if error.is_retryable() && attempt < max_attempts => {
                    warn!(attempt, max_attempts, %error, "connection failure, re-issuing batch");
                    tokio::time::sleep(self.config.retry_delay).await;
                    attempt += 1;
                }
                Err(error) if error.is_retryable() => {
                    return Err(CycleFailure::RetriesExhausted {
                        attempts: attempt,
                        message: error.to_string(),
                    });
                }
                Err(error) => return Err(CycleFailure::from(error)),
            }
        }
    }

    async fn fetch_batch(&mut self) -> Result<Batch, DataError> {
        let listings = ByCurrency {
            btc: self.fetch_listings(Currency::Btc).await?,
            usd: self.fetch_listings(Currency::Usd).await?,
            aud: self.fetch_listings(Currency::Aud).await?,
        };
        let quotes = ByCurrency {
            btc: self.fetch_quotes(Currency::Btc).await?,
            usd: self.fetch_quotes(Currency::Usd).await?,
            aud: self.fetch_quotes(Currency::Aud).await?,
        };
        Ok(Batch { listings, quotes })
    }

    async fn fetch_listings(&mut self, currency: Currency) -> Result<ListingsResponse, DataError> {
        let response = self
            .client
            .fetch_listings(currency, self.config.listings_limit)
            .await?;
        self.charge("listings", currency, &response.status);
        Ok(response)
    }

    async fn fetch_quotes(&mut self, currency: Currency) -> Result<QuotesResponse, DataError> {
        if self.requested.is_empty() {
            return Ok(QuotesResponse::empty());
        }

        let response = self.client.fetch_quotes(&self.requested, currency).await?;
        self.charge("quotes", currency, &response.status);
        Ok(response)
    }

    // Every transport-successful response costs credits, whatever its embedded status.
    fn charge(&mut self, endpoint: &'static str, currency: Currency, status: &CmcStatus) {
        self.schedule.charge(status.credit_count);
        debug!(
            endpoint,
            %currency,
            credits = status.credit_count,
            error_code = status.error_code,
            "provider call completed"
        );
    }

    fn merge(&self, batch: Batch) -> Result<DataSet, CycleFailure> {
        if let Some(status) = batch.rejection() {
            return Err(CycleFailure::Semantic {
                error_code: status.error_code,
                message: status.error_message.clone().unwrap_or_default(),
            });
        }

        let Batch { listings, quotes } = batch;
        let listings = ByCurrency {
            btc: listings.btc.data.unwrap_or_default(),
            usd: listings.usd.data.unwrap_or_default(),
            aud: listings.aud.data.unwrap_or_default(),
        };
        let quotes = ByCurrency {
            btc: quotes.btc.data.unwrap_or_default(),
            usd: quotes.usd.data.unwrap_or_default(),
            aud: quotes.aud.data.unwrap_or_default(),
        };

        let mut data = DataSet::new();

        // Listings are aligned by position; the same position must hold the same asset.
        for (position, btc) in listings.btc.iter().enumerate() {
            let assets = ByCurrency {
                btc: Some(btc),
                usd: listings.usd.get(position).filter(|asset| asset.id == btc.id),
                aud: listings.aud.get(position).filter(|asset| asset.id == btc.id),
            };
            insert_merged(&mut data, assets, &btc.symbol);
        }

        for symbol in &self.requested {
            if data.contains_symbol(symbol) {
                debug!(%symbol, "requested symbol already listed");
                continue;
            }

            let assets = ByCurrency {
                btc: lookup(&quotes.btc, symbol),
                usd: lookup(&quotes.usd, symbol),
                aud: lookup(&quotes.aud, symbol),
            };
            if assets.btc.is_some_and(|asset| data.get(&asset.slug).is_some()) {
                debug!(%symbol, "requested asset already listed under another symbol");
                continue;
            }
            insert_merged(&mut data, assets, symbol);
        }

        Ok(data)
    }
}

fn insert_merged(data: &mut DataSet, assets: ByCurrency<Option<&CmcAsset>>, symbol: &str) {
    let ByCurrency { btc, usd, aud } = assets;
    let (Some(btc), Some(usd), Some(aud)) = (btc, usd, aud) else {
        warn!(%symbol, "asset missing from at least one currency response, dropped");
        return;
    };

    match AssetRecord::from_cmc(ByCurrency { btc, usd, aud }) {
        Some(record) => data.insert(record),
        None => warn!(%symbol, "asset has an unpriced quote, dropped"),
    }
}

/// Quotes are keyed by symbol as the provider normalised it.
fn lookup<'a>(quotes: &'a HashMap<String, CmcAsset>, symbol: &str) -> Option<&'a CmcAsset> {
    quotes.get(symbol).or_else(|| {
        quotes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(symbol))
            .map(|(_, asset)| asset)
    })
}
