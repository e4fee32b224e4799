//! Converter widget commands
//!
//! Widgets hold the four fields of a converter panel and re-run conversion on
//! every input event, the way the panels react to typing, unit changes and
//! the swap button. This is the only layer that turns [`Conversion`] results
//! into display strings.

use std::str::FromStr;

use tracing::debug;

use crate::config::PanelConfig;
use crate::core::features::currency::types::fallback_rates;
use crate::core::features::{
    CurrencyConverter, LengthConverter, LengthUnit, TemperatureConverter, TemperatureScale,
    UnitConverter,
};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{
    Conversion, ConvertRequest, ConvertResponse, ConverterFields, GetUnitsResponse, UnitDTO,
};

// ============================================================================
// Synchronous widgets (length, temperature)
// ============================================================================

pub struct SyncWidget<C: UnitConverter> {
    converter: C,
    fields: ConverterFields<C::Unit>,
}

pub type LengthWidget = SyncWidget<LengthConverter>;
pub type TemperatureWidget = SyncWidget<TemperatureConverter>;

impl<C> SyncWidget<C>
where
    C: UnitConverter,
    C::Unit: FromStr<Err = AppError>,
{
    /// Build the widget from panel defaults and run the initial conversion.
    pub fn initialize(converter: C, panel: &PanelConfig) -> AppResult<Self> {
        let fields = ConverterFields::new(
            panel.default_value.clone(),
            panel.default_from_unit.parse()?,
            panel.default_to_unit.parse()?,
        );
        let mut widget = Self { converter, fields };
        widget.refresh();
        Ok(widget)
    }
}

impl<C: UnitConverter> SyncWidget<C> {
    pub fn new(converter: C, fields: ConverterFields<C::Unit>) -> Self {
        Self { converter, fields }
    }

    pub fn fields(&self) -> &ConverterFields<C::Unit> {
        &self.fields
    }

    pub fn output(&self) -> &str {
        &self.fields.to_value
    }

    pub fn set_from_value(&mut self, value: impl Into<String>) -> Conversion {
        self.fields.from_value = value.into();
        self.refresh()
    }

    pub fn set_from_unit(&mut self, unit: C::Unit) -> Conversion {
        self.fields.from_unit = unit;
        self.refresh()
    }

    pub fn set_to_unit(&mut self, unit: C::Unit) -> Conversion {
        self.fields.to_unit = unit;
        self.refresh()
    }

    pub fn swap(&mut self) {
        self.fields = self.converter.swap(self.fields.clone());
    }

    fn refresh(&mut self) -> Conversion {
        let result = self
            .converter
            .convert(&self.fields.from_value, self.fields.from_unit, self.fields.to_unit);
        self.fields.to_value = result.to_display();
        result
    }
}

// ============================================================================
// Currency widget
// ============================================================================

pub struct CurrencyWidget {
    converter: CurrencyConverter,
    fields: ConverterFields<String>,
}

impl CurrencyWidget {
    pub async fn initialize(converter: CurrencyConverter, panel: &PanelConfig) -> Self {
        let fields = ConverterFields::new(
            panel.default_value.clone(),
            panel.default_from_unit.clone(),
            panel.default_to_unit.clone(),
        );
        let mut widget = Self { converter, fields };
        widget.refresh().await;
        widget
    }

    pub fn fields(&self) -> &ConverterFields<String> {
        &self.fields
    }

    pub fn output(&self) -> &str {
        &self.fields.to_value
    }

    pub async fn set_from_value(&mut self, value: impl Into<String>) -> Conversion {
        self.fields.from_value = value.into();
        self.refresh().await
    }

    pub async fn set_from_unit(&mut self, code: impl Into<String>) -> Conversion {
        self.fields.from_unit = code.into();
        self.refresh().await
    }

    pub async fn set_to_unit(&mut self, code: impl Into<String>) -> Conversion {
        self.fields.to_unit = code.into();
        self.refresh().await
    }

    pub async fn swap(&mut self) {
        self.fields = self.converter.swap(self.fields.clone()).await;
    }

    async fn refresh(&mut self) -> Conversion {
        let ConverterFields { from_value, to_value, from_unit, to_unit } = &mut self.fields;
        self.converter
            .convert_into(from_value.as_str(), from_unit.as_str(), to_unit.as_str(), to_value)
            .await
    }
}

// ============================================================================
// Request/response commands
// ============================================================================

fn respond(result: Conversion, request: &ConvertRequest) -> ConvertResponse {
    ConvertResponse {
        result,
        formatted_result: result.to_display(),
        from_unit: request.from_unit.clone(),
        to_unit: request.to_unit.clone(),
    }
}

pub fn convert_length_command(request: ConvertRequest) -> AppResult<ConvertResponse> {
    let from: LengthUnit = request.from_unit.parse()?;
    let to: LengthUnit = request.to_unit.parse()?;
    let result = LengthConverter.convert(&request.value, from, to);
    debug!(?request, ?result, "convert_length_command");
    Ok(respond(result, &request))
}

pub fn convert_temperature_command(request: ConvertRequest) -> AppResult<ConvertResponse> {
    let from: TemperatureScale = request.from_unit.parse()?;
    let to: TemperatureScale = request.to_unit.parse()?;
    let result = TemperatureConverter.convert(&request.value, from, to);
    debug!(?request, ?result, "convert_temperature_command");
    Ok(respond(result, &request))
}

pub async fn convert_currency_command(
    converter: &CurrencyConverter,
    request: ConvertRequest,
) -> ConvertResponse {
    let result = converter
        .convert(&request.value, &request.from_unit, &request.to_unit)
        .await;
    debug!(?request, ?result, "convert_currency_command");
    respond(result, &request)
}

pub fn get_length_units_command() -> GetUnitsResponse {
    GetUnitsResponse { units: LengthConverter.units() }
}

pub fn get_temperature_units_command() -> GetUnitsResponse {
    GetUnitsResponse { units: TemperatureConverter.units() }
}

/// Currency codes known to the current snapshot, or the fallback table before any fetch.
pub fn get_currency_units_command(converter: &CurrencyConverter) -> GetUnitsResponse {
    let rates = converter
        .provider()
        .snapshot()
        .map(|snapshot| snapshot.rates)
        .unwrap_or_else(fallback_rates);

    let mut units: Vec<UnitDTO> = rates
        .into_keys()
        .map(|code| UnitDTO {
            label: code.clone(),
            id: code,
            category: "currency".to_string(),
        })
        .collect();
    units.sort_by(|a, b| a.id.cmp(&b.id));

    GetUnitsResponse { units }
}
