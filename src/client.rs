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

//! # Rallyx Remote Client Module
//!
//! HTTP client for the remote results API. One outbound call per fetch, no
//! caching, no retries — the API is the sole source of truth and retry
//! policy, if any, belongs to the caller.
//!
//! The fetch seam is the [`RxFetch`] trait so the orchestrator can be
//! exercised against stub payloads without a network.

use std::time::Duration;

use serde_json::Value;

use crate::config::RxConfig;
use crate::errors::{Result, RxError};
use crate::model::{RxDatasetKind, RxRallyClass};

/// Capability of fetching one dataset's raw payload for a rally class.
pub trait RxFetch: Send + Sync {
    /// Fetches the deserialized JSON body for the given dataset kind.
    fn fetch(&self, kind: &RxDatasetKind, class: RxRallyClass) -> Result<Value>;
}

/// Blocking HTTP client against the results API.
///
/// Credentials (event id, error code) and the user agent are fixed at
/// construction from configuration; every call attaches them.
#[derive(Debug)]
pub struct RxApiClient {
    base_url: String,
    error_code: String,
    event_id: String,
    http: reqwest::blocking::Client,
}

impl RxApiClient {
    /// Builds a client from resolved configuration.
    pub fn new(config: &RxConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RxError::validation(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            error_code: config.error_code.clone(),
            event_id: config.event_id.clone(),
            http,
        })
    }

    /// Query parameters for one dataset fetch.
    fn query(&self, kind: &RxDatasetKind, class: RxRallyClass) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("oszt", class.code().to_string()),
            ("error", self.error_code.clone()),
            ("ev", self.event_id.clone()),
            ("a", kind.endpoint_code().to_string()),
            ("ert", "ALL".to_string()),
            ("noform", "1".to_string()),
        ];
        if let Some(stage) = kind.stage() {
            params.push(("s", stage.to_string()));
        }
        params
    }
}

impl RxFetch for RxApiClient {
    fn fetch(&self, kind: &RxDatasetKind, class: RxRallyClass) -> Result<Value> {
        let params = self.query(kind, class);
        log::debug!(
            "fetching dataset '{}' (a={}) for class {}",
            kind.dataset_name(),
            kind.endpoint_code(),
            class.code()
        );

        let response = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .map_err(|e| RxError::RemoteUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RxError::RemoteRejected {
                status: status.as_u16(),
            });
        }

        let payload: Value = response
            .json()
            .map_err(|e| RxError::RemoteMalformed(e.to_string()))?;

        log::debug!("dataset '{}' payload received", kind.dataset_name());
        Ok(payload)
    }
}
