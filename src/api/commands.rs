//! Command modules for the converter widgets
//!
//! - `converters`: widget state and request/response conversion commands
//! - `settings`: settings persistence

pub mod converters;
pub mod settings;
