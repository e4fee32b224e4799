use serde::{Deserialize, Serialize};

/// Placeholder shown in the output field while exchange rates are being fetched.
pub const LOADING: &str = "Loading...";

pub const DISPLAY_INVALID: &str = "Invalid";
pub const DISPLAY_NOT_AVAILABLE: &str = "N/A";
pub const DISPLAY_ERROR: &str = "Error";

/// Outcome of a single conversion.
///
/// Every failure mode is a variant rather than an error: conversions never
/// propagate failures to the caller. Literal display strings are produced
/// only by [`Conversion::to_display`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Conversion {
    /// A displayable numeric result.
    Value(f64),
    /// Input did not parse, or was outside the accepted domain.
    Empty,
    /// Temperature below absolute zero.
    Invalid,
    /// Currency code missing from the rate table.
    NotAvailable,
    /// Unexpected failure in the currency pipeline.
    Error,
}

impl Conversion {
    pub fn value(&self) -> Option<f64> {
        match self {
            Conversion::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn to_display(&self) -> String {
        match self {
            Conversion::Value(v) => format_value(*v),
            Conversion::Empty => String::new(),
            Conversion::Invalid => DISPLAY_INVALID.to_string(),
            Conversion::NotAvailable => DISPLAY_NOT_AVAILABLE.to_string(),
            Conversion::Error => DISPLAY_ERROR.to_string(),
        }
    }
}

/// Shortest decimal rendering of a number, e.g. `212`, `1.60934`, `-273.15`.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // Avoid rendering negative zero as "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

/// Anything that can receive a display string from a converter.
pub trait OutputField {
    fn set(&mut self, text: &str);
}

impl OutputField for String {
    fn set(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

/// The four inputs of one converter panel: two values and two unit selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterFields<U> {
    pub from_value: String,
    pub to_value: String,
    pub from_unit: U,
    pub to_unit: U,
}

impl<U> ConverterFields<U> {
    pub fn new(from_value: impl Into<String>, from_unit: U, to_unit: U) -> Self {
        Self {
            from_value: from_value.into(),
            to_value: String::new(),
            from_unit,
            to_unit,
        }
    }

    /// Exchange both unit selections and both values.
    ///
    /// An empty value moved into the "from" slot is replaced by `empty_default`.
    pub fn swapped(self, empty_default: &str) -> Self {
        let from_value = if self.to_value.is_empty() {
            empty_default.to_string()
        } else {
            self.to_value
        };

        Self {
            from_value,
            to_value: self.from_value,
            from_unit: self.to_unit,
            to_unit: self.from_unit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub value: String,
    pub from_unit: String,
    pub to_unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub result: Conversion,
    pub formatted_result: String,
    pub from_unit: String,
    pub to_unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDTO {
    pub id: String,
    pub label: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUnitsResponse {
    pub units: Vec<UnitDTO>,
}
