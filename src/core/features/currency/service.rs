use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;

use super::clock::{Clock, SystemClock};
use super::fetcher::{HttpRateFetcher, RateFetcher};
use super::types::{fallback_rates, ExchangeRateSnapshot, RateTable};

pub const DEFAULT_CACHE_DURATION_MS: i64 = 3_600_000;

/// Owns the single cached USD rate snapshot.
///
/// `get_rates` always resolves to a usable table: fresh cache, then a new
/// fetch, then the stale cache, then the built-in fallback rates.
pub struct ExchangeRateProvider {
    fetcher: Arc<dyn RateFetcher>,
    clock: Arc<dyn Clock>,
    cache_duration: Duration,
    cache: RwLock<Option<ExchangeRateSnapshot>>,
}

impl ExchangeRateProvider {
    pub fn new(fetcher: Arc<dyn RateFetcher>) -> Self {
        Self::with_clock(
            fetcher,
            Arc::new(SystemClock),
            Duration::milliseconds(DEFAULT_CACHE_DURATION_MS),
        )
    }

    pub fn with_clock(
        fetcher: Arc<dyn RateFetcher>,
        clock: Arc<dyn Clock>,
        cache_duration: Duration,
    ) -> Self {
        Self {
            fetcher,
            clock,
            cache_duration,
            cache: RwLock::new(None),
        }
    }

    /// Provider backed by the HTTP fetcher configured in `settings`.
    pub fn from_settings(settings: &AppSettings) -> AppResult<Self> {
        let fetcher = HttpRateFetcher::from_settings(&settings.currency)?;
        Ok(Self::with_clock(
            Arc::new(fetcher),
            Arc::new(SystemClock),
            settings.cache_duration(),
        ))
    }

    pub async fn get_rates(&self) -> RateTable {
        let now = self.clock.now();

        if let Some(rates) = self.fresh_rates(now) {
            debug!("Using cached rates");
            return rates;
        }

        match self.fetcher.fetch_usd_rates().await {
            Ok(rates) => {
                let snapshot = ExchangeRateSnapshot::new(rates, now);
                let fresh = snapshot.rates.clone();
                info!(currencies = fresh.len(), fetched_at = %now, "Exchange rates refreshed");
                self.replace_snapshot(snapshot);
                fresh
            }
            Err(e) => {
                if let Some(stale) = self.snapshot() {
                    warn!(
                        error = %e,
                        fetched_at = %stale.fetched_at,
                        "Rate fetch failed; using stale cache"
                    );
                    stale.rates
                } else {
                    warn!(error = %e, "Rate fetch failed and no cache exists; using fallback");
                    fallback_rates()
                }
            }
        }
    }

    /// Clone of the cached snapshot, fresh or not.
    pub fn snapshot(&self) -> Option<ExchangeRateSnapshot> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh_rates(self.clock.now()).is_some()
    }

    pub fn invalidate(&self) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn fresh_rates(&self, now: DateTime<Utc>) -> Option<RateTable> {
        let guard = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|snapshot| snapshot.is_fresh(now, self.cache_duration))
            .map(|snapshot| snapshot.rates.clone())
    }

    // Last writer wins; a slow fetch may overwrite a newer one.
    fn replace_snapshot(&self, snapshot: ExchangeRateSnapshot) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }
}
