use crate::table::{RenderMode, Screen, TableRenderer};
use coinwatch_data::{FetchOrchestrator, MarketDataClient};
use std::time::Duration;
use tracing::{debug, error};

/// Interval between scheduler decisions.
pub const TICK_RATE: Duration = Duration::from_secs(5);

/// Decides once per tick whether a fetch cycle is due, then renders.
#[derive(Debug)]
pub struct Scheduler<C> {
    orchestrator: FetchOrchestrator<C>,
    renderer: TableRenderer,
}

impl<C> Scheduler<C>
where
    C: MarketDataClient,
{
    pub fn new(orchestrator: FetchOrchestrator<C>, renderer: TableRenderer) -> Self {
        Self {
            orchestrator,
            renderer,
        }
    }

    pub fn orchestrator(&self) -> &FetchOrchestrator<C> {
        &self.orchestrator
    }

    pub fn renderer(&self) -> &TableRenderer {
        &self.renderer
    }

    /// Run one tick: fetch if due, otherwise repeat the cached rows.
    pub async fn tick(&mut self) -> Screen {
        let mode = if self.orchestrator.is_due() {
            match self.orchestrator.run_cycle().await {
                Ok(()) => RenderMode::Fresh,
                Err(failure) => {
                    error!(%failure, "showing error screen");
                    RenderMode::Error
                }
            }
        } else {
            debug!("no fetch due, repeating cached rows");
            RenderMode::Repeat
        };

        self.renderer.render(
            mode,
            self.orchestrator.current(),
            self.orchestrator.previous(),
            self.orchestrator.schedule(),
            self.orchestrator.now(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Body, ERROR_MESSAGE};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use coinwatch_data::{
        Currency, DataError, FetchConfig, FixedClock,
        cmc::{CmcAsset, CmcQuote, CmcResponse, CmcStatus, ListingsResponse, QuotesResponse},
    };
    use indexmap::IndexSet;
    use rust_decimal::Decimal;
    use std::{collections::HashMap, sync::Arc};

    /// Lists a single asset. After `fail_from` calls, every call fails with `failure`.
    #[derive(Debug, Default)]
    struct FakeClient {
        failure: Option<DataError>,
        fail_from: usize,
        calls: usize,
    }

    impl FakeClient {
        fn failing(failure: DataError, fail_from: usize) -> Self {
            Self {
                failure: Some(failure),
                fail_from,
                calls: 0,
            }
        }

        fn next_call(&mut self) -> Result<(), DataError> {
            self.calls += 1;
            match &self.failure {
                Some(failure) if self.calls > self.fail_from => Err(failure.clone()),
                _ => Ok(()),
            }
        }
    }

    fn transport(status: u16, message: &str) -> DataError {
        DataError::Transport {
            http_status: Some(status),
            error_code: Some(i64::from(status)),
            message: message.to_string(),
        }
    }

    fn bitcoin(currency: Currency) -> CmcAsset {
        CmcAsset {
            id: 1,
            name: "Bitcoin".to_string(),
            symbol: "BTC".to_string(),
            slug: "bitcoin".to_string(),
            cmc_rank: Some(1),
            quote: HashMap::from([(
                currency.code().to_string(),
                CmcQuote {
                    price: Some(Decimal::ONE_HUNDRED),
                    ..CmcQuote::default()
                },
            )]),
        }
    }

    #[async_trait]
    impl MarketDataClient for FakeClient {
        async fn fetch_listings(
            &mut self,
            convert: Currency,
            _: usize,
        ) -> Result<ListingsResponse, DataError> {
            self.next_call()?;
            Ok(CmcResponse {
                status: CmcStatus {
                    credit_count: 1,
                    ..CmcStatus::default()
                },
                data: Some(vec![bitcoin(convert)]),
            })
        }

        async fn fetch_quotes(
            &mut self,
            _: &IndexSet<String>,
            _: Currency,
        ) -> Result<QuotesResponse, DataError> {
            self.next_call()?;
            Ok(QuotesResponse::empty())
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    fn scheduler(client: FakeClient) -> (Scheduler<FakeClient>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(start()));
        let orchestrator = FetchOrchestrator::with_clock(
            client,
            IndexSet::new(),
            FetchConfig::default().with_retry_delay(Duration::ZERO),
            clock.clone(),
        );
        let scheduler = Scheduler::new(orchestrator, TableRenderer::new(IndexSet::new()));
        (scheduler, clock)
    }

    #[tokio::test]
    async fn test_first_tick_fetches_then_repeats() {
        let (mut scheduler, clock) = scheduler(FakeClient::default());

        let fresh = scheduler.tick().await;
        assert!(matches!(&fresh.body, Body::Table { rows, .. } if rows.len() == 1));
        assert_eq!(scheduler.orchestrator().client().calls, 3);

        clock.advance(TimeDelta::seconds(5));
        let repeat = scheduler.tick().await;
        assert_eq!(repeat.body, fresh.body);
        assert_ne!(repeat.status, fresh.status);
        assert_eq!(scheduler.orchestrator().client().calls, 3);

        clock.advance(TimeDelta::minutes(30));
        scheduler.tick().await;
        assert_eq!(scheduler.orchestrator().client().calls, 6);
        assert_eq!(scheduler.orchestrator().previous().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_first_cycle_retries_next_tick() {
        let client = FakeClient::failing(transport(429, "rate limited"), 0);
        let (mut scheduler, clock) = scheduler(client);

        let screen = scheduler.tick().await;
        assert_eq!(screen.body, Body::Message(ERROR_MESSAGE.to_string()));
        assert_eq!(scheduler.orchestrator().client().calls, 1);
        assert_eq!(scheduler.orchestrator().schedule().last_fetch, None);

        // No data yet, so the 30 minute backoff does not hold back the next tick
        clock.advance(TimeDelta::seconds(5));
        let screen = scheduler.tick().await;
        assert_eq!(screen.body, Body::Message(ERROR_MESSAGE.to_string()));
        assert_eq!(scheduler.orchestrator().client().calls, 2);
        assert!(scheduler.renderer().cache().is_empty());
    }

    #[tokio::test]
    async fn test_failed_cycle_after_success_backs_off() {
        let client = FakeClient::failing(transport(500, "internal"), 3);
        let (mut scheduler, clock) = scheduler(client);

        let fresh = scheduler.tick().await;
        assert_eq!(scheduler.orchestrator().client().calls, 3);

        clock.advance(TimeDelta::minutes(30));
        let screen = scheduler.tick().await;
        assert_eq!(screen.body, Body::Message(ERROR_MESSAGE.to_string()));
        assert_eq!(scheduler.orchestrator().client().calls, 4);

        // Within the server error backoff the cached rows are repeated
        clock.advance(TimeDelta::seconds(30));
        let repeat = scheduler.tick().await;
        assert_eq!(repeat.body, fresh.body);
        assert_eq!(scheduler.orchestrator().client().calls, 4);

        clock.advance(TimeDelta::seconds(30));
        scheduler.tick().await;
        assert_eq!(scheduler.orchestrator().client().calls, 5);
        assert_eq!(scheduler.renderer().cache().len(), 1);
    }
}
