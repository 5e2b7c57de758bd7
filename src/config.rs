// =============================================================================
// CONFIGURATION MODULE
// =============================================================================
// Configuration is read from environment variables (a `.env` file is loaded
// by the binary through dotenvy first).
//
// Two structs live here:
// - Config: settings for the mock REST server binary
// - CatalogSettings: settings for the dashboard's catalog view
//
// LEARNING NOTE:
// Both loaders take a lookup function so tests can feed values without
// touching the process environment (which is shared by parallel tests).
// =============================================================================

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Default quiet interval before a search term is committed.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Default number of rows per catalog page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// -----------------------------------------------------------------------------
// SERVER CONFIG
// -----------------------------------------------------------------------------
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 8080)
    pub port: u16,

    /// Seed the in-memory backend with demo products (default: true)
    pub seed_demo_data: bool,
}

impl Config {
    /// Creates a Config by reading environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a Config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("Failed to parse PORT as a number")?,

            seed_demo_data: parse_flag(lookup("SEED_DEMO_DATA").as_deref(), true)
                .context("Failed to parse SEED_DEMO_DATA as a boolean")?,
        })
    }
}

// -----------------------------------------------------------------------------
// CATALOG SETTINGS
// -----------------------------------------------------------------------------
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    /// Base URL of the product REST API
    /// Format: http://host:port (no trailing /api)
    pub api_base_url: String,

    /// Rows per page, fixed for the session
    pub page_size: usize,

    /// Quiet interval before a typed search term reaches the pipeline
    pub search_debounce: Duration,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }
}

impl CatalogSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let page_size = match lookup("PAGE_SIZE") {
            Some(raw) => raw
                .parse::<usize>()
                .context("Failed to parse PAGE_SIZE as a number")?,
            None => defaults.page_size,
        };
        if page_size == 0 {
            anyhow::bail!("PAGE_SIZE must be at least 1");
        }

        let search_debounce = match lookup("SEARCH_DEBOUNCE_MS") {
            Some(raw) => Duration::from_millis(
                raw.parse()
                    .context("Failed to parse SEARCH_DEBOUNCE_MS as a number")?,
            ),
            None => defaults.search_debounce,
        };

        Ok(Self {
            api_base_url: lookup("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            page_size,
            search_debounce,
        })
    }
}

fn parse_flag(raw: Option<&str>, default: bool) -> Result<bool> {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("unrecognised flag value: {other}"),
        },
    }
}
