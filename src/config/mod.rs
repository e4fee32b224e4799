//! Panel configuration registry
//!
//! Centralized defaults for each converter panel: title, unit selections and
//! the starting input used for the initial conversion.

use serde::{Deserialize, Serialize};

use crate::core::navigation::Category;
use crate::shared::settings::UserPreferences;

/// Configuration for one converter panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelConfig {
    pub title: String,
    pub default_from_unit: String,
    pub default_to_unit: String,
    pub default_value: String,
}

impl PanelConfig {
    pub fn new(title: impl Into<String>, from: &str, to: &str, value: &str) -> Self {
        Self {
            title: title.into(),
            default_from_unit: from.to_string(),
            default_to_unit: to.to_string(),
            default_value: value.to_string(),
        }
    }
}

/// Panel registry mapping categories to configurations
pub fn get_panel_config(category: Category) -> PanelConfig {
    match category {
        Category::Length => PanelConfig::new("Length Converter", "m", "km", "1"),
        Category::Temperature => {
            PanelConfig::new("Temperature Converter", "celsius", "fahrenheit", "0")
        }
        Category::Currency => PanelConfig::new("Currency Converter", "USD", "EUR", "1"),
    }
}

/// Registry entry with unit selections taken from user preferences
pub fn get_panel_config_for(category: Category, preferences: &UserPreferences) -> PanelConfig {
    let mut config = get_panel_config(category);
    let (from, to) = match category {
        Category::Length => (&preferences.length_from, &preferences.length_to),
        Category::Temperature => (&preferences.temperature_from, &preferences.temperature_to),
        Category::Currency => (&preferences.currency_from, &preferences.currency_to),
    };
    config.default_from_unit = from.clone();
    config.default_to_unit = to.clone();
    config
}

pub fn get_all_configs() -> Vec<(Category, PanelConfig)> {
    Category::ALL
        .iter()
        .map(|category| (*category, get_panel_config(*category)))
        .collect()
}
