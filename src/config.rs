//! Copyright © 2025-2026 The Rallyx Authors. All Rights Reserved.
//!
//! This file is part of Rallyx.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//! http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Rallyx Configuration Module
//!
//! Immutable configuration value loaded once at process start and passed into
//! the components by construction. Core fetch/project logic never reads the
//! environment itself; it receives already-resolved values from here.
//!
//! Required variables (no defaults, they are credentials or deployment
//! specific): `API_BASE_URL`, `API_ERROR_CODE`, `API_EVENT_ID`, `USER_AGENT`.
//! Everything else has a sensible default and a builder method for tests.

use std::env;

use crate::errors::{Result, RxError};

/// Resolved application configuration.
#[derive(Clone, Debug)]
pub struct RxConfig {
    /// Base URL of the remote results API.
    pub base_url: String,
    /// Error-code credential attached to every outbound request.
    pub error_code: String,
    /// Event id credential attached to every outbound request.
    pub event_id: String,
    /// User agent header for outbound requests.
    pub user_agent: String,
    /// Per-call timeout for outbound requests, in seconds.
    pub request_timeout_secs: u64,
    /// Directory the delimited-text sink writes into.
    pub output_dir: String,
    /// Field delimiter for the delimited-text sink.
    pub csv_delimiter: u8,
    /// Whether the delimited-text sink is registered.
    pub csv_enabled: bool,
    /// Workbook path for the spreadsheet sink.
    pub excel_path: String,
    /// Whether the spreadsheet sink is registered.
    pub excel_enabled: bool,
    /// Bind address for the trigger listener.
    pub listen_host: String,
    /// Bind port for the trigger listener.
    pub listen_port: u16,
    /// Log level filter for the process.
    pub log_level: String,
}

impl Default for RxConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            error_code: String::new(),
            event_id: String::new(),
            user_agent: String::new(),
            request_timeout_secs: 30,
            output_dir: "./output".to_string(),
            csv_delimiter: b',',
            csv_enabled: true,
            excel_path: "./output/rally_data.xlsx".to_string(),
            excel_enabled: false,
            listen_host: "localhost".to_string(),
            listen_port: 8000,
            log_level: "info".to_string(),
        }
    }
}

impl RxConfig {
    /// Loads configuration from environment variables.
    ///
    /// Fails with a single validation error naming every missing required
    /// variable, so a misconfigured deployment is diagnosed in one pass.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("API_BASE_URL").ok();
        let error_code = env::var("API_ERROR_CODE").ok();
        let event_id = env::var("API_EVENT_ID").ok();
        let user_agent = env::var("USER_AGENT").ok();

        let missing: Vec<&str> = [
            ("API_BASE_URL", &base_url),
            ("API_ERROR_CODE", &error_code),
            ("API_EVENT_ID", &event_id),
            ("USER_AGENT", &user_agent),
        ]
        .iter()
        .filter(|(_, v)| v.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(RxError::validation(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let defaults = RxConfig::default();
        Ok(Self {
            base_url: base_url.unwrap_or_default(),
            error_code: error_code.unwrap_or_default(),
            event_id: event_id.unwrap_or_default(),
            user_agent: user_agent.unwrap_or_default(),
            request_timeout_secs: env_parsed("REQUEST_TIMEOUT_SECONDS", defaults.request_timeout_secs)?,
            output_dir: env::var("CSV_OUTPUT_DIR").unwrap_or(defaults.output_dir),
            csv_delimiter: env::var("CSV_DELIMITER")
                .ok()
                .and_then(|s| s.into_bytes().first().copied())
                .unwrap_or(defaults.csv_delimiter),
            csv_enabled: env_parsed("CSV_EXPORT_ENABLED", defaults.csv_enabled)?,
            excel_path: env::var("EXCEL_FILENAME").unwrap_or(defaults.excel_path),
            excel_enabled: env_parsed("EXCEL_EXPORT_ENABLED", defaults.excel_enabled)?,
            listen_host: env::var("HTTP_SERVER_HOST").unwrap_or(defaults.listen_host),
            listen_port: env_parsed("HTTP_SERVER_PORT", defaults.listen_port)?,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Builder-style override for the base URL.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Builder-style override for the request timeout.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Builder-style override for the output directory.
    pub fn output_dir(mut self, dir: &str) -> Self {
        self.output_dir = dir.to_string();
        self
    }

    /// Builder-style override for the CSV delimiter.
    pub fn csv_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    /// Builder-style override for the workbook path.
    pub fn excel_path(mut self, path: &str) -> Self {
        self.excel_path = path.to_string();
        self
    }
}

/// Parses an optional environment variable, falling back to a default.
fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| RxError::validation(format!("invalid value for {}: {}", name, raw))),
        Err(_) => Ok(default),
    }
}
