//! Panel navigation
//!
//! Tracks which converter panel is visible. Selecting a panel hides every
//! other one; there is no data dependency on the converters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shared::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Length,
    Temperature,
    Currency,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Length, Category::Temperature, Category::Currency];

    pub fn id(self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Temperature => "temperature",
            Category::Currency => "currency",
        }
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "length" => Ok(Category::Length),
            "temperature" => Ok(Category::Temperature),
            "currency" => Ok(Category::Currency),
            _ => Err(AppError::Validation(format!("Unknown category: {}", s))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    active: Option<Category>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Category::Length)
    }
}

impl Navigator {
    pub fn new(initial: Category) -> Self {
        Self { active: Some(initial) }
    }

    pub fn active(&self) -> Option<Category> {
        self.active
    }

    pub fn is_visible(&self, category: Category) -> bool {
        self.active == Some(category)
    }

    /// Handle a click on a navigation link carrying `category`.
    ///
    /// A link without a category is ignored. An unknown category hides every
    /// panel, since no panel matches it.
    pub fn handle_nav(&mut self, category: Option<&str>) -> Option<Category> {
        let Some(raw) = category else {
            return self.active;
        };

        self.active = raw.parse::<Category>().ok();
        debug!(requested = raw, active = ?self.active, "navigation");
        self.active
    }
}
