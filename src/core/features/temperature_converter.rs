use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shared::error::AppError;
use crate::shared::types::{Conversion, UnitDTO};
use super::parsing::{parse_float, round_to};
use super::UnitConverter;

const ERR_UNKNOWN_TEMPERATURE_SCALE: &str = "Unknown temperature scale";

const TEMPERATURE_PRECISION: i32 = 10;

const KELVIN_OFFSET: f64 = 273.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureScale {
    pub const ALL: [TemperatureScale; 3] = [
        TemperatureScale::Celsius,
        TemperatureScale::Fahrenheit,
        TemperatureScale::Kelvin,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "celsius",
            TemperatureScale::Fahrenheit => "fahrenheit",
            TemperatureScale::Kelvin => "kelvin",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "Celsius",
            TemperatureScale::Fahrenheit => "Fahrenheit",
            TemperatureScale::Kelvin => "Kelvin",
        }
    }

    pub fn to_kelvin(self, value: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => value + KELVIN_OFFSET,
            TemperatureScale::Fahrenheit => (value - 32.0) * 5.0 / 9.0 + KELVIN_OFFSET,
            TemperatureScale::Kelvin => value,
        }
    }

    pub fn from_kelvin(self, kelvin: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => kelvin - KELVIN_OFFSET,
            TemperatureScale::Fahrenheit => (kelvin - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0,
            TemperatureScale::Kelvin => kelvin,
        }
    }
}

impl FromStr for TemperatureScale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "celsius" | "c" => Ok(TemperatureScale::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureScale::Fahrenheit),
            "kelvin" | "k" => Ok(TemperatureScale::Kelvin),
            _ => Err(AppError::Validation(format!("{}: {}", ERR_UNKNOWN_TEMPERATURE_SCALE, s))),
        }
    }
}

impl fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Affine temperature conversion through Kelvin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemperatureConverter;

impl TemperatureConverter {
    pub fn convert_value(
        &self,
        value: f64,
        from: TemperatureScale,
        to: TemperatureScale,
    ) -> Conversion {
        if value.is_nan() {
            return Conversion::Empty;
        }

        if from == to {
            return Conversion::Value(value);
        }

        let kelvin = from.to_kelvin(value);
        if kelvin < 0.0 {
            debug!(value, from = %from, kelvin, "below absolute zero");
            return Conversion::Invalid;
        }

        let result = round_to(to.from_kelvin(kelvin), TEMPERATURE_PRECISION);
        debug!(value, from = %from, to = %to, kelvin, result, "temperature converted");
        Conversion::Value(result)
    }
}

impl UnitConverter for TemperatureConverter {
    type Unit = TemperatureScale;

    // Zero is a meaningful temperature, unlike a zero length.
    const SWAP_DEFAULT: &'static str = "0";

    fn convert(&self, input: &str, from: TemperatureScale, to: TemperatureScale) -> Conversion {
        match parse_float(input) {
            Some(value) => self.convert_value(value, from, to),
            None => Conversion::Empty,
        }
    }

    fn units(&self) -> Vec<UnitDTO> {
        TemperatureScale::ALL
            .iter()
            .map(|scale| UnitDTO {
                id: scale.id().to_string(),
                label: scale.name().to_string(),
                category: "temperature".to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::ConverterFields;
    use proptest::prelude::*;

    use TemperatureScale::{Celsius, Fahrenheit, Kelvin};

    fn assert_close(actual: Conversion, expected: f64) {
        let value = actual.value().unwrap_or_else(|| panic!("expected a value, got {:?}", actual));
        assert!((value - expected).abs() < 1e-9, "expected {}, got {}", expected, value);
    }

    #[test]
    fn test_boiling_point() {
        assert_close(TemperatureConverter.convert("100", Celsius, Fahrenheit), 212.0);
        assert_eq!(TemperatureConverter.convert("100", Celsius, Fahrenheit).to_display(), "212");
    }

    #[test]
    fn test_absolute_zero_in_celsius() {
        assert_close(TemperatureConverter.convert("0", Kelvin, Celsius), -273.15);
    }

    #[test]
    fn test_fahrenheit_to_kelvin() {
        assert_close(TemperatureConverter.convert("32", Fahrenheit, Kelvin), 273.15);
        assert_close(TemperatureConverter.convert("-40", Fahrenheit, Celsius), -40.0);
    }

    #[test]
    fn test_below_absolute_zero_is_invalid() {
        assert_eq!(TemperatureConverter.convert("-300", Celsius, Kelvin), Conversion::Invalid);
        assert_eq!(TemperatureConverter.convert("-1", Kelvin, Celsius), Conversion::Invalid);
        assert_eq!(TemperatureConverter.convert("-500", Fahrenheit, Celsius), Conversion::Invalid);
    }

    #[test]
    fn test_same_scale_skips_domain_check() {
        let same = TemperatureConverter.convert("-300", Celsius, Celsius);
        assert_eq!(same, Conversion::Value(-300.0));
    }

    #[test]
    fn test_unparseable_is_empty() {
        assert_eq!(TemperatureConverter.convert("", Celsius, Kelvin), Conversion::Empty);
        assert_eq!(TemperatureConverter.convert("warm", Celsius, Kelvin), Conversion::Empty);
    }

    #[test]
    fn test_parse_scale() {
        assert_eq!("Celsius".parse::<TemperatureScale>().unwrap(), Celsius);
        assert_eq!("k".parse::<TemperatureScale>().unwrap(), Kelvin);
        assert!("rankine".parse::<TemperatureScale>().is_err());
    }

    #[test]
    fn test_swap_empty_to_value_defaults_to_zero() {
        let fields = ConverterFields::new("25", Celsius, Kelvin);
        let swapped = TemperatureConverter.swap(fields);

        assert_eq!(swapped.from_value, "0");
        assert_eq!(swapped.from_unit, Kelvin);
        assert_eq!(swapped.to_unit, Celsius);
        assert_eq!(swapped.to_value, "-273.15");
    }

    #[test]
    fn test_swap_invalid_output_clears_result() {
        let mut fields = ConverterFields::new("-300", Celsius, Kelvin);
        fields.to_value = "Invalid".to_string();
        let swapped = TemperatureConverter.swap(fields);

        assert_eq!(swapped.from_value, "Invalid");
        assert_eq!(swapped.to_value, "");
    }

    fn any_scale() -> impl Strategy<Value = TemperatureScale> {
        prop::sample::select(TemperatureScale::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_celsius_fahrenheit_round_trip(c in -273.0f64..10_000.0) {
            let f = TemperatureConverter.convert_value(c, Celsius, Fahrenheit).value().unwrap();
            let back = TemperatureConverter.convert_value(f, Fahrenheit, Celsius).value().unwrap();
            prop_assert!((back - c).abs() < 1e-9, "{} -> {} -> {}", c, f, back);
        }

        #[test]
        fn prop_identity(v in -1e6f64..1e6, s in any_scale()) {
            prop_assert_eq!(TemperatureConverter.convert_value(v, s, s), Conversion::Value(v));
        }
    }
}
