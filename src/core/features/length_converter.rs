use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shared::error::AppError;
use crate::shared::types::{Conversion, UnitDTO};
use super::parsing::{parse_float, round_to};
use super::UnitConverter;

const ERR_UNKNOWN_LENGTH_UNIT: &str = "Unknown length unit";

/// Decimal places kept after a length conversion.
const LENGTH_PRECISION: i32 = 10;

// ============================================================================
// Unit Registry
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Mm,
    Cm,
    M,
    Km,
    Inch,
    Foot,
    Yard,
    Mile,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 8] = [
        LengthUnit::Mm,
        LengthUnit::Cm,
        LengthUnit::M,
        LengthUnit::Km,
        LengthUnit::Inch,
        LengthUnit::Foot,
        LengthUnit::Yard,
        LengthUnit::Mile,
    ];

    /// How many meters one of this unit is.
    pub fn factor(self) -> f64 {
        match self {
            LengthUnit::Mm => 0.001,
            LengthUnit::Cm => 0.01,
            LengthUnit::M => 1.0,
            LengthUnit::Km => 1000.0,
            LengthUnit::Inch => 0.0254,
            LengthUnit::Foot => 0.3048,
            LengthUnit::Yard => 0.9144,
            LengthUnit::Mile => 1609.34,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::M => "m",
            LengthUnit::Km => "km",
            LengthUnit::Inch => "inch",
            LengthUnit::Foot => "foot",
            LengthUnit::Yard => "yard",
            LengthUnit::Mile => "mile",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LengthUnit::Mm => "Millimeters",
            LengthUnit::Cm => "Centimeters",
            LengthUnit::M => "Meters",
            LengthUnit::Km => "Kilometers",
            LengthUnit::Inch => "Inches",
            LengthUnit::Foot => "Feet",
            LengthUnit::Yard => "Yards",
            LengthUnit::Mile => "Miles",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mm" => Ok(LengthUnit::Mm),
            "cm" => Ok(LengthUnit::Cm),
            "m" => Ok(LengthUnit::M),
            "km" => Ok(LengthUnit::Km),
            "inch" | "in" => Ok(LengthUnit::Inch),
            "foot" | "ft" => Ok(LengthUnit::Foot),
            "yard" | "yd" => Ok(LengthUnit::Yard),
            "mile" | "mi" => Ok(LengthUnit::Mile),
            other => Err(AppError::Validation(format!("{}: {}", ERR_UNKNOWN_LENGTH_UNIT, other))),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Converter
// ============================================================================

/// Linear length conversion with meters as the pivot unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthConverter;

impl LengthConverter {
    pub fn convert_value(&self, value: f64, from: LengthUnit, to: LengthUnit) -> Conversion {
        if value.is_nan() || value < 0.0 {
            return Conversion::Empty;
        }

        if from == to {
            return Conversion::Value(value);
        }

        let meters = value * from.factor();
        let result = round_to(meters / to.factor(), LENGTH_PRECISION);

        debug!(value, %from, %to, meters, result, "length converted");
        Conversion::Value(result)
    }
}

impl UnitConverter for LengthConverter {
    type Unit = LengthUnit;

    const SWAP_DEFAULT: &'static str = "1";

    fn convert(&self, input: &str, from_unit: LengthUnit, to_unit: LengthUnit) -> Conversion {
        match parse_float(input) {
            Some(value) => self.convert_value(value, from_unit, to_unit),
            None => Conversion::Empty,
        }
    }

    fn units(&self) -> Vec<UnitDTO> {
        LengthUnit::ALL
            .iter()
            .map(|unit| UnitDTO {
                id: unit.symbol().to_string(),
                label: unit.name().to_string(),
                category: "length".to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::ConverterFields;
    use proptest::prelude::*;

    fn convert(input: &str, from: &str, to: &str) -> Conversion {
        LengthConverter.convert(input, from.parse().unwrap(), to.parse().unwrap())
    }

    #[test]
    fn test_mile_to_km() {
        assert_eq!(convert("1", "mile", "km"), Conversion::Value(1.60934));
    }

    #[test]
    fn test_km_to_m() {
        assert_eq!(convert("2.5", "km", "m"), Conversion::Value(2500.0));
    }

    #[test]
    fn test_foot_to_inch_suppresses_float_noise() {
        assert_eq!(convert("1", "foot", "inch"), Conversion::Value(12.0));
        assert_eq!(convert("3", "foot", "yard"), Conversion::Value(1.0));
    }

    #[test]
    fn test_zero_is_a_value() {
        assert_eq!(convert("0", "m", "cm"), Conversion::Value(0.0));
    }

    #[test]
    fn test_negative_is_empty() {
        assert_eq!(convert("-1", "m", "cm"), Conversion::Empty);
    }

    #[test]
    fn test_unparseable_is_empty() {
        assert_eq!(convert("", "m", "cm"), Conversion::Empty);
        assert_eq!(convert("abc", "m", "cm"), Conversion::Empty);
    }

    #[test]
    fn test_unknown_unit_is_rejected_at_parse() {
        let err = "parsec".parse::<LengthUnit>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_aliases() {
        assert_eq!("in".parse::<LengthUnit>().unwrap(), LengthUnit::Inch);
        assert_eq!("mi".parse::<LengthUnit>().unwrap(), LengthUnit::Mile);
    }

    #[test]
    fn test_swap_empty_to_value_defaults_to_one() {
        let fields = ConverterFields {
            from_value: "5".to_string(),
            to_value: String::new(),
            from_unit: LengthUnit::Km,
            to_unit: LengthUnit::M,
        };

        let swapped = LengthConverter.swap(fields);
        assert_eq!(swapped.from_value, "1");
        assert_eq!(swapped.from_unit, LengthUnit::M);
        assert_eq!(swapped.to_unit, LengthUnit::Km);
        assert_eq!(swapped.to_value, "0.001");
    }

    #[test]
    fn test_swap_moves_values() {
        let fields = ConverterFields {
            from_value: "1".to_string(),
            to_value: "1000".to_string(),
            from_unit: LengthUnit::Km,
            to_unit: LengthUnit::M,
        };

        let swapped = LengthConverter.swap(fields);
        assert_eq!(swapped.from_value, "1000");
        assert_eq!(swapped.to_value, "1");
    }

    #[test]
    fn test_units_cover_registry() {
        let units = LengthConverter.units();
        assert_eq!(units.len(), 8);
        assert!(units.iter().all(|u| u.category == "length"));
    }

    fn any_unit() -> impl Strategy<Value = LengthUnit> {
        prop::sample::select(LengthUnit::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_round_trip(v in 0.001f64..1_000_000.0, a in any_unit(), b in any_unit()) {
            let there = LengthConverter.convert_value(v, a, b).value().unwrap();
            let back = LengthConverter.convert_value(there, b, a).value().unwrap();
            // The intermediate is rounded to 10 places; that error is scaled back by b/a.
            let tolerance = 1e-10 * (1.0 + b.factor() / a.factor()) + 1e-14 * v;
            prop_assert!((back - v).abs() <= tolerance, "{} -> {} -> {}", v, there, back);
        }

        #[test]
        fn prop_round_trip_within_1e9_toward_smaller_units(
            v in 0.001f64..1_000_000.0,
            a in any_unit(),
            b in any_unit(),
        ) {
            prop_assume!(b.factor() <= a.factor());
            let there = LengthConverter.convert_value(v, a, b).value().unwrap();
            let back = LengthConverter.convert_value(there, b, a).value().unwrap();
            prop_assert!((back - v).abs() <= 1e-9 + 1e-14 * v, "{} -> {} -> {}", v, there, back);
        }

        #[test]
        fn prop_identity(v in 0.0f64..1e12, u in any_unit()) {
            prop_assert_eq!(LengthConverter.convert_value(v, u, u), Conversion::Value(v));
        }
    }
}
