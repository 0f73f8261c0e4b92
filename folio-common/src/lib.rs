//! Common types and utilities shared across Folio crates.
//!
//! This crate holds the shared error type, the colour theme selector and the
//! observability helpers used by every binary and integration test. It stays
//! small so that all crates can depend on it without dragging in the TUI or
//! the actor runtime.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`FolioError`] and [`Result`]: Shared error handling
//! - [`Theme`]: Dark/light palette selector shared by config and UI
//!
//! # Examples
//!
//! ```rust
//! use folio_common::Theme;
//!
//! let theme = Theme::default();
//! assert_eq!(theme, Theme::Dark);
//! assert_eq!(theme.toggled(), Theme::Light);
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Colour palette used by the terminal front end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(FolioError::Config(format!("unknown theme: {other}"))),
        }
    }
}

/// Error types used across the Folio workspace.
#[derive(thiserror::Error, Debug)]
pub enum FolioError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Portfolio content could not be loaded or parsed.
    #[error("Content error: {0}")]
    Content(String),

    /// The hero terminal could not be constructed.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Underlying I/O failure (terminal, files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient alias for results that use [`FolioError`].
pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_theme_case_insensitively() {
        assert_eq!(" Light ".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
    }

    #[test]
    fn rejects_unknown_theme() {
        let err = "solarized".parse::<Theme>().unwrap_err();
        assert!(matches!(err, FolioError::Config(msg) if msg.contains("solarized")));
    }
}
