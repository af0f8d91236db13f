use crate::{
    cmc::{ListingsResponse, QuotesResponse},
    currency::Currency,
    error::DataError,
};
use async_trait::async_trait;
use indexmap::IndexSet;

/// Market data provider used by the [`FetchOrchestrator`](crate::fetch::FetchOrchestrator).
///
/// Implementations return `Ok` for every transport-successful response, including those whose
/// embedded status reports an error. Checking
/// [`CmcResponse::is_ok`](crate::cmc::CmcResponse::is_ok) is the caller's job. `Err` is reserved
/// for transport failures and undecodable bodies.
#[async_trait]
pub trait MarketDataClient: Send {
    /// Top `limit` assets ranked by market capitalisation, converted into `convert`.
    async fn fetch_listings(
        &mut self,
        convert: Currency,
        limit: usize,
    ) -> Result<ListingsResponse, DataError>;

    /// Explicitly named assets, converted into `convert`.
    async fn fetch_quotes(
        &mut self,
        symbols: &IndexSet<String>,
        convert: Currency,
    ) -> Result<QuotesResponse, DataError>;
}
