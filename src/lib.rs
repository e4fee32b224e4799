//! Converter widgets
//!
//! Length, temperature and currency converters with swap support. Currency
//! conversion pivots through USD using exchange rates that are cached for an
//! hour and fall back to stale or built-in rates when a refresh fails.

pub mod api;
pub mod config;
pub mod core;
pub mod shared;

pub use crate::core::features::{
    CurrencyConverter, ExchangeRateProvider, LengthConverter, LengthUnit, TemperatureConverter,
    TemperatureScale, UnitConverter,
};
pub use crate::core::navigation::{Category, Navigator};
pub use crate::shared::error::{AppError, AppResult};
pub use crate::shared::types::{Conversion, ConverterFields};

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
