use super::{CmcErrorBody, CmcResponse, ListingsResponse, QuotesResponse};
use crate::{
    client::MarketDataClient, credential::CredentialRotator, currency::Currency, error::DataError,
};
use async_trait::async_trait;
use indexmap::IndexSet;
use itertools::Itertools;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Default CoinMarketCap Pro API base url.
pub const BASE_URL: &str = "https://pro-api.coinmarketcap.com";

const LISTINGS_PATH: &str = "/v1/cryptocurrency/listings/latest";
const QUOTES_PATH: &str = "/v1/cryptocurrency/quotes/latest";
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Per request timeout. A hanging call would otherwise stall the whole tick loop.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the CoinMarketCap Pro API.
///
/// Each request is signed with the next key from the [`CredentialRotator`].
#[derive(Debug)]
pub struct CmcClient {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialRotator,
    timeout: Duration,
}

impl CmcClient {
    pub fn new(credentials: CredentialRotator) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            credentials,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Point the client at a different host, eg/ the sandbox API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T>(
        &mut self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<CmcResponse<T>, DataError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let api_key = self.credentials.next().to_string();

        debug!(%url, ?query, "sending CoinMarketCap request");

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .header(ACCEPT, "application/json")
            .query(query)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let error_body = serde_json::from_slice::<CmcErrorBody>(&body).ok();
            let error_code = error_body.as_ref().map(|body| body.status.error_code);
            let message = error_body
                .and_then(|body| body.status.error_message)
                .unwrap_or_else(|| format!("HTTP {status}"));

            warn!(
                %url,
                http_status = status.as_u16(),
                ?error_code,
                %message,
                "CoinMarketCap request rejected"
            );

            return Err(DataError::Transport {
                http_status: Some(status.as_u16()),
                error_code,
                message,
            });
        }

        decode(path, &body)
    }
}

/// Decode a 2xx body into the response envelope of any payload type.
fn decode<T>(path: &str, body: &[u8]) -> Result<CmcResponse<T>, DataError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice::<CmcResponse<T>>(body)
        .map_err(|error| DataError::Decode(format!("{path}: {error}")))
}

#[async_trait]
impl MarketDataClient for CmcClient {
    async fn fetch_listings(
        &mut self,
        convert: Currency,
        limit: usize,
    ) -> Result<ListingsResponse, DataError> {
        let query = [
            ("start", "1".to_string()),
            ("limit", limit.to_string()),
            ("convert", convert.code().to_string()),
        ];
        self.get(LISTINGS_PATH, &query).await
    }

    async fn fetch_quotes(
        &mut self,
        symbols: &IndexSet<String>,
        convert: Currency,
    ) -> Result<QuotesResponse, DataError> {
        let query = [
            ("symbol", symbols.iter().join(",")),
            ("convert", convert.code().to_string()),
        ];
        self.get(QUOTES_PATH, &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let credentials = CredentialRotator::new(vec!["key".to_string()]).unwrap();
        let client =
            CmcClient::new(credentials).with_base_url("https://sandbox-api.coinmarketcap.com/");
        assert_eq!(
            client.url(LISTINGS_PATH),
            "https://sandbox-api.coinmarketcap.com/v1/cryptocurrency/listings/latest"
        );
    }

    #[test]
    fn test_decode_without_data_field() {
        let body = br#"{"status":{"error_code":1008,"error_message":"Limit","credit_count":0}}"#;

        let listings: ListingsResponse = decode(LISTINGS_PATH, body).unwrap();
        assert!(!listings.is_ok());
        assert_eq!(listings.data, None);

        let quotes: QuotesResponse = decode(QUOTES_PATH, body).unwrap();
        assert_eq!(quotes.status.error_code, 1008);
        assert_eq!(quotes.data, None);
    }

    #[test]
    fn test_decode_failure_names_endpoint() {
        let actual: Result<ListingsResponse, _> = decode(LISTINGS_PATH, b"<html>");
        assert!(matches!(
            actual,
            Err(DataError::Decode(message)) if message.starts_with(LISTINGS_PATH)
        ));
    }

    #[test]
    fn test_error_body_status_parsed() {
        let body = br#"{"status":{"error_code":429,"error_message":"Too many","credit_count":0}}"#;
        let parsed = serde_json::from_slice::<CmcErrorBody>(body).unwrap();
        assert_eq!(parsed.status.error_code, 429);
        assert_eq!(parsed.status.error_message.as_deref(), Some("Too many"));
    }
}
