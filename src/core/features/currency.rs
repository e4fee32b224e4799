//! Currency converter feature
//!
//! Converts between currencies through the USD pivot using rates from
//! [`ExchangeRateProvider`]. Results are rounded to cents.

pub mod clock;
pub mod fetcher;
pub mod service;
pub mod types;

use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, error};

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{Conversion, ConverterFields, OutputField, LOADING};
use super::parsing::parse_float;

pub use self::service::ExchangeRateProvider;
use self::types::RateTable;

const CURRENCY_PRECISION: u32 = 2;

pub struct CurrencyConverter {
    provider: Arc<ExchangeRateProvider>,
}

impl CurrencyConverter {
    pub fn new(provider: Arc<ExchangeRateProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<ExchangeRateProvider> {
        &self.provider
    }

    pub async fn convert(&self, input: &str, from: &str, to: &str) -> Conversion {
        self.run(input, from, to, || {}).await
    }

    /// Convert and write into `out`, showing the loading placeholder while rates are fetched.
    pub async fn convert_into<O: OutputField>(
        &self,
        input: &str,
        from: &str,
        to: &str,
        out: &mut O,
    ) -> Conversion {
        let result = self.run(input, from, to, || out.set(LOADING)).await;
        out.set(&result.to_display());
        result
    }

    /// Exchange codes and values symmetrically, then convert again.
    pub async fn swap(&self, fields: ConverterFields<String>) -> ConverterFields<String> {
        let mut swapped = ConverterFields {
            from_value: fields.to_value,
            to_value: fields.from_value,
            from_unit: fields.to_unit,
            to_unit: fields.from_unit,
        };
        swapped.to_value = self
            .convert(&swapped.from_value, &swapped.from_unit, &swapped.to_unit)
            .await
            .to_display();
        swapped
    }

    async fn run<F>(&self, input: &str, from: &str, to: &str, on_loading: F) -> Conversion
    where
        F: FnOnce(),
    {
        let value = match parse_float(input) {
            Some(v) if v >= 0.0 => v,
            _ => return Conversion::Empty,
        };

        let from = normalize_code(from);
        let to = normalize_code(to);

        if from == to {
            return Conversion::Value(value);
        }

        on_loading();
        let rates = self.provider.get_rates().await;

        let from_rate = usable_rate(&rates, &from);
        let to_rate = usable_rate(&rates, &to);
        let (Some(from_rate), Some(to_rate)) = (from_rate, to_rate) else {
            debug!(%from, %to, "currency not in rate table");
            return Conversion::NotAvailable;
        };

        match triangulate(value, from_rate, to_rate) {
            Ok(result) => {
                debug!(value, %from, %to, result, "currency converted");
                Conversion::Value(result)
            }
            Err(e) => {
                error!(error = %e, value, %from, %to, "Conversion error");
                Conversion::Error
            }
        }
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

// A zero rate is treated as absent.
fn usable_rate(rates: &RateTable, code: &str) -> Option<Decimal> {
    rates.get(code).copied().filter(|rate| *rate > Decimal::ZERO)
}

/// `value` in `from` to `to`, given both rates as "units per 1 USD".
fn triangulate(value: f64, from_rate: Decimal, to_rate: Decimal) -> AppResult<f64> {
    let amount = Decimal::try_from(value)
        .map_err(|e| AppError::Calculation(format!("Amount not representable: {}", e)))?;

    let cross_rate = to_rate
        .checked_div(from_rate)
        .ok_or_else(|| AppError::Calculation("Division by zero".into()))?;

    let result = amount
        .checked_mul(cross_rate)
        .ok_or_else(|| AppError::Calculation("Multiplication overflow".into()))?
        .round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointAwayFromZero);

    result
        .to_f64()
        .ok_or_else(|| AppError::Calculation(format!("Result not representable: {}", result)))
}
