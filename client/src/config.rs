// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

/// Used when `TASKSYNC_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/tasks";
/// Used when `TASKSYNC_REQUEST_TIMEOUT_SECS` is not set.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Used when `TASKSYNC_SEARCH_DEBOUNCE_MS` is not set.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Settings for talking to the backend and pacing search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// URL of the `tasks` resource; task `n` lives at `{api_url}/n`.
    pub api_url: Url,
    pub request_timeout: Duration,
    pub search_debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl ClientConfig {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the settings through `lookup`; unset or empty keys keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(raw) = get("TASKSYNC_API_URL") {
            config.api_url = Url::parse(&raw)
                .with_context(|| format!("Invalid TASKSYNC_API_URL: {raw}"))?;
        }
        if let Some(raw) = get("TASKSYNC_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("Invalid TASKSYNC_REQUEST_TIMEOUT_SECS: {raw}"))?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = get("TASKSYNC_SEARCH_DEBOUNCE_MS") {
            let millis: u64 = raw
                .parse()
                .with_context(|| format!("Invalid TASKSYNC_SEARCH_DEBOUNCE_MS: {raw}"))?;
            config.search_debounce = Duration::from_millis(millis);
        }

        Ok(config)
    }
}
