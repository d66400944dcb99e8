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

//! # Rallyx Error Module
//!
//! This module defines the error types used throughout Rallyx for consistent
//! error handling and reporting.
//!
//! ## Error Categories
//!
//! - **RemoteUnavailable**: network or timeout failures while calling the
//!   results API
//! - **RemoteRejected**: non-success HTTP status from the results API
//! - **RemoteMalformed**: response body that cannot be parsed as JSON
//! - **Projection**: a payload missing the structure a dataset schema
//!   requires (an upstream API contract change, not bad data in one row)
//! - **Sink**: a single sink failing to persist a published dataset
//! - **Validation**: invalid parameters or configuration
//! - **Io / Serde**: filesystem and serialization wrappers
//!
//! Remote and projection errors are recorded per dataset by the orchestrator
//! and never abort a run; sink errors are caught per sink by the export hub.
//! Errors serialize so they can travel inside a run outcome.

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Rallyx.
pub type Result<T> = std::result::Result<T, RxError>;

/// Canonical error enumeration for Rallyx.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum RxError {
    /// The remote results API could not be reached or timed out.
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote results API answered with a non-success HTTP status.
    #[error("remote rejected request with status {status}")]
    RemoteRejected { status: u16 },

    /// The remote response body was not parseable as the expected structure.
    #[error("remote payload malformed: {0}")]
    RemoteMalformed(String),

    /// A payload lacked a field the dataset schema structurally requires.
    #[error("projection failed for dataset '{dataset}': {message}")]
    Projection { dataset: String, message: String },

    /// A sink failed while persisting a published dataset.
    #[error("sink '{sink}' write failed: {message}")]
    Sink { sink: String, message: String },

    /// Validation errors triggered by invalid parameters or configuration.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<io::Error> for RxError {
    fn from(err: io::Error) -> Self {
        RxError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RxError {
    fn from(err: serde_json::Error) -> Self {
        RxError::Serde(err.to_string())
    }
}

impl RxError {
    /// Helper to construct projection errors.
    pub fn projection(dataset: impl Into<String>, message: impl Into<String>) -> Self {
        RxError::Projection {
            dataset: dataset.into(),
            message: message.into(),
        }
    }

    /// Helper to construct sink errors.
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        RxError::Sink {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        RxError::Validation {
            message: message.into(),
        }
    }

    /// Short tag naming the error category, used in run outcome reports.
    pub fn kind(&self) -> &'static str {
        match self {
            RxError::RemoteUnavailable(_) => "remote_unavailable",
            RxError::RemoteRejected { .. } => "remote_rejected",
            RxError::RemoteMalformed(_) => "remote_malformed",
            RxError::Projection { .. } => "projection",
            RxError::Sink { .. } => "sink_write",
            RxError::Validation { .. } => "validation",
            RxError::Io(_) => "io",
            RxError::Serde(_) => "serde",
        }
    }
}
