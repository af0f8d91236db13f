//! # coinwatch-data
//! Polls the CoinMarketCap Pro API on a schedule and merges independently fetched per-currency
//! responses into unified per-asset records.
//!
//! ## Overview
//! * [`CredentialRotator`] hands out API keys round-robin.
//! * [`MarketDataClient`] abstracts the listings and quotes endpoints; [`CmcClient`] is the
//!   reqwest implementation.
//! * [`FetchOrchestrator`] runs one six-call fetch cycle, classifies failures into a
//!   reschedule decision and rotates current data into previous data on success.
//! * [`ScheduleState`] tracks start time, last/next fetch times and credits consumed.

/// All [`Error`](std::error::Error)s generated in coinwatch-data.
pub mod error;

/// Display currencies and per-currency containers.
pub mod currency;

/// Round-robin API key rotation.
pub mod credential;

/// Domain records: [`AssetRecord`], [`QuoteSnapshot`] and the ordered [`DataSet`].
pub mod model;

/// CoinMarketCap wire types and the HTTP [`CmcClient`].
pub mod cmc;

/// [`MarketDataClient`] seam between the orchestrator and the provider.
pub mod client;

/// Fetch scheduling state and injectable clocks.
pub mod schedule;

/// Fetch cycle orchestration, retry policy and merging.
pub mod fetch;

/// Loading the symbol and credential input lists.
pub mod input;

pub use client::MarketDataClient;
pub use cmc::CmcClient;
pub use credential::CredentialRotator;
pub use currency::{ByCurrency, Currency};
pub use error::DataError;
pub use fetch::{CycleFailure, FetchConfig, FetchOrchestrator};
pub use model::{AssetRecord, DataSet, QuoteSnapshot};
pub use schedule::{Clock, FixedClock, ScheduleState, SystemClock};
