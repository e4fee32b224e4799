//! Converter features
//!
//! Each converter exposes a `convert` over its closed unit set and a `swap`
//! that exchanges the "from"/"to" fields before converting again.
//! Length and temperature are synchronous; currency may await a rate fetch
//! and lives behind its own async API in [`currency`].

use crate::shared::types::{Conversion, ConverterFields, UnitDTO};

pub mod parsing;
pub mod length_converter;
pub mod temperature_converter;
pub mod currency;

pub use length_converter::{LengthConverter, LengthUnit};
pub use temperature_converter::{TemperatureConverter, TemperatureScale};
pub use currency::{CurrencyConverter, ExchangeRateProvider};

/// Synchronous converter over a fixed unit enumeration.
pub trait UnitConverter: Send + Sync {
    type Unit: Copy + Eq;

    /// Value placed in the "from" field when swap would move an empty value there.
    const SWAP_DEFAULT: &'static str;

    /// Convert the raw text of the input field.
    fn convert(&self, input: &str, from: Self::Unit, to: Self::Unit) -> Conversion;

    /// All selectable units, for populating the presentation layer.
    fn units(&self) -> Vec<UnitDTO>;

    /// Exchange units and values, then convert using the new state.
    fn swap(&self, fields: ConverterFields<Self::Unit>) -> ConverterFields<Self::Unit> {
        let mut swapped = fields.swapped(Self::SWAP_DEFAULT);
        swapped.to_value = self
            .convert(&swapped.from_value, swapped.from_unit, swapped.to_unit)
            .to_display();
        swapped
    }
}
