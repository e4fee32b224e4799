use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Currency code to "units of currency per 1 USD".
pub type RateTable = HashMap<String, Decimal>;

pub const BASE_CURRENCY: &str = "USD";

/// Rates captured at a point in time. Always USD-based.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateSnapshot {
    pub rates: RateTable,
    pub fetched_at: DateTime<Utc>,
}

impl ExchangeRateSnapshot {
    pub fn new(mut rates: RateTable, fetched_at: DateTime<Utc>) -> Self {
        rates.insert(BASE_CURRENCY.to_string(), Decimal::ONE);
        Self { rates, fetched_at }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, cache_duration: Duration) -> bool {
        now.signed_duration_since(self.fetched_at) < cache_duration
    }
}

/// Network payload: `{ "rates": { "EUR": 0.92, ... } }`. Other fields are ignored.
#[derive(Debug, Deserialize)]
pub struct RatesApiResponse {
    #[serde(deserialize_with = "deserialize_rates")]
    pub rates: RateTable,
}

/// Approximate rates used only when no fetch has ever succeeded.
///
/// These are not authoritative and are not refreshed.
pub fn fallback_rates() -> RateTable {
    HashMap::from([
        ("USD".to_string(), Decimal::ONE),
        ("EUR".to_string(), Decimal::new(92, 2)),
        ("GBP".to_string(), Decimal::new(79, 2)),
        ("CHF".to_string(), Decimal::new(88, 2)),
    ])
}

// ---- Serde helpers ----

/// Rates may arrive as JSON numbers or strings. Entries that are not a
/// positive number are dropped; only a malformed `rates` object fails.
fn deserialize_rates<'de, D>(deserializer: D) -> Result<RateTable, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, Value>::deserialize(deserializer)?;
    let mut rates = RateTable::with_capacity(raw.len());

    for (code, value) in raw {
        let Some(dec) = rate_value(&value) else {
            debug!(%code, %value, "skipping unusable rate");
            continue;
        };

        if dec > Decimal::ZERO {
            rates.insert(code.to_uppercase(), dec);
        }
    }

    Ok(rates)
}

fn rate_value(value: &Value) -> Option<Decimal> {
    match value {
        // Go through the JSON text so 0.92 stays exactly 0.92
        Value::Number(num) => {
            let text = num.to_string();
            Decimal::from_str_exact(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => Decimal::from_str_exact(s.trim()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fallback_covers_major_currencies() {
        let rates = fallback_rates();
        assert_eq!(rates["USD"], Decimal::ONE);
        for code in ["EUR", "GBP", "CHF"] {
            assert!(rates[code] > Decimal::ZERO);
        }
    }

    #[test]
    fn test_snapshot_forces_usd_base() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let snapshot = ExchangeRateSnapshot::new(RateTable::new(), at);
        assert_eq!(snapshot.rates["USD"], Decimal::ONE);
    }

    #[test]
    fn test_snapshot_freshness_boundary() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let snapshot = ExchangeRateSnapshot::new(fallback_rates(), at);
        let hour = Duration::milliseconds(3_600_000);

        assert!(snapshot.is_fresh(at + Duration::minutes(59), hour));
        assert!(!snapshot.is_fresh(at + hour, hour));
    }

    #[test]
    fn test_payload_accepts_numbers_and_strings() {
        let payload: RatesApiResponse = serde_json::from_str(
            r#"{ "base": "USD", "rates": { "eur": 0.92, "GBP": "0.79" } }"#,
        )
        .unwrap();

        assert_eq!(payload.rates["EUR"], Decimal::new(92, 2));
        assert_eq!(payload.rates["GBP"], Decimal::new(79, 2));
    }

    #[test]
    fn test_payload_drops_non_positive_rates() {
        let payload: RatesApiResponse =
            serde_json::from_str(r#"{ "rates": { "EUR": 0.92, "XXX": 0, "YYY": -1 } }"#).unwrap();

        assert_eq!(payload.rates.len(), 1);
        assert!(payload.rates.contains_key("EUR"));
    }

    #[test]
    fn test_payload_rejects_wrong_shape() {
        assert!(serde_json::from_str::<RatesApiResponse>(r#"{ "result": "error" }"#).is_err());
        assert!(serde_json::from_str::<RatesApiResponse>(r#"{ "rates": [0.92] }"#).is_err());
        assert!(serde_json::from_str::<RatesApiResponse>(r#"{ "rates": null }"#).is_err());
    }

    #[test]
    fn test_payload_skips_unusable_rates() {
        let payload: RatesApiResponse = serde_json::from_str(
            r#"{ "rates": {
                "EUR": 0.9, "JPY": 150.25,
                "XXX": null, "YYY": true, "ZZZ": "abc", "ZWL": 1e30, "OBJ": {}
            } }"#,
        )
        .unwrap();

        assert_eq!(payload.rates.len(), 2);
        assert_eq!(payload.rates["EUR"], Decimal::new(9, 1));
        assert_eq!(payload.rates["JPY"], Decimal::new(15025, 2));
    }
}
