use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::debug;

use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::CurrencySettings;

use super::types::{RateTable, RatesApiResponse, BASE_CURRENCY};

/// Collaborator that fetches USD-based exchange rates.
#[async_trait]
pub trait RateFetcher: Send + Sync {
    async fn fetch_usd_rates(&self) -> AppResult<RateTable>;
}

/// Fetches rates from a JSON endpoint shaped like `{ "rates": { ... } }`.
pub struct HttpRateFetcher {
    http: Client,
    api_url: String,
}

impl HttpRateFetcher {
    pub fn new(api_url: impl Into<String>, user_agent: &str, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_url: api_url.into(),
        })
    }

    pub fn from_settings(settings: &CurrencySettings) -> AppResult<Self> {
        Self::new(settings.api_url.clone(), &settings.user_agent, settings.request_timeout())
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl RateFetcher for HttpRateFetcher {
    async fn fetch_usd_rates(&self) -> AppResult<RateTable> {
        debug!(url = %self.api_url, "fetching exchange rates");
        let resp = self.http.get(&self.api_url).send().await?;

        if !resp.status().is_success() {
            return Err(AppError::Network(format!(
                "Failed to fetch rates: {}",
                resp.status()
            )));
        }

        let body = resp.text().await?;
        parse_rates_payload(&body)
    }
}

/// Parse a rates payload, guaranteeing a non-empty table containing USD = 1.
pub fn parse_rates_payload(body: &str) -> AppResult<RateTable> {
    let json: RatesApiResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Validation(format!("Invalid response: {}", e)))?;

    let mut rates = json.rates;
    if rates.is_empty() {
        return Err(AppError::Validation("Response contained no rates".into()));
    }
    rates.insert(BASE_CURRENCY.to_string(), Decimal::ONE);
    Ok(rates)
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    /// Serves a fixed table, or fails on demand, counting every call.
    pub struct FakeRateFetcher {
        rates: RateTable,
        failing: AtomicBool,
        calls: AtomicUsize,
    }

    impl FakeRateFetcher {
        pub fn serving(rates: RateTable) -> Self {
            Self {
                rates,
                failing: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            let fake = Self::serving(RateTable::new());
            fake.set_failing(true);
            fake
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    /// Answer a single HTTP request on a local port with `status` and `body`.
    /// Returns the URL to fetch.
    pub async fn serve_once(status: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\
                 connection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/latest/USD", addr)
    }

    #[async_trait]
    impl RateFetcher for FakeRateFetcher {
        async fn fetch_usd_rates(&self) -> AppResult<RateTable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::Network("connection refused".into()));
            }
            Ok(self.rates.clone())
        }
    }
}
