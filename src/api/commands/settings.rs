//! Settings command module
//!
//! Handles application settings persistence.

use std::path::Path;

use tracing::warn;

use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;

/// Get current application settings, from `path` when given
pub async fn get_settings(path: Option<&Path>) -> AppResult<AppSettings> {
    match path {
        Some(path) => AppSettings::load_from(path).await,
        None => AppSettings::load().await,
    }
}

/// Like [`get_settings`], but an unreadable or unwritable settings file
/// yields the defaults instead of an error.
pub async fn get_settings_or_default(path: Option<&Path>) -> AppSettings {
    get_settings(path).await.unwrap_or_else(|e| {
        warn!(error = %e, "Could not load settings; using defaults");
        AppSettings::default()
    })
}

/// Save application settings, to `path` when given
pub async fn save_settings(settings: &AppSettings, path: Option<&Path>) -> AppResult<()> {
    match path {
        Some(path) => settings.save_to(path).await,
        None => settings.save().await,
    }
}
