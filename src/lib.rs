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

//! # Rallyx Core Library
//!
//! Rallyx fetches structured rally-event data (entry lists, start lists,
//! route sheets, stage results, live stage status) from a remote results API
//! on demand and writes each fetched dataset to tabular output files.
//!
//! ## Module Overview
//!
//! - **model**: rally classes, dataset kinds, and trigger requests
//! - **record**: the uniform row representation every dataset projects into
//! - **client**: the remote results API client (one HTTP call per fetch)
//! - **project**: pure payload-to-record projection per dataset kind
//! - **plan**: the two-phase (static, then stage-derived) fetch plan
//! - **orchestrator**: sequential fetch -> project -> publish per trigger
//! - **export**: sink registry with per-sink failure isolation, plus the
//!   delimited-text and workbook sinks
//! - **server**: the HTTP trigger boundary
//! - **config**: environment-derived immutable configuration
//!
//! ## Control Flow
//!
//! Inbound trigger (rally class) -> orchestrator resolves the dataset plan
//! -> per dataset: client fetch -> projector normalize -> export hub fan-out
//! to sinks. One dataset's failure is recorded in the run outcome and never
//! aborts the run.
//!
//! ## Error Handling
//!
//! All operations return `Result<T, RxError>`; see [`errors`] for the
//! taxonomy and where each category is caught.

pub mod client;
pub mod config;
pub mod errors;
pub mod export;
pub mod model;
pub mod orchestrator;
pub mod plan;
pub mod project;
pub mod record;
pub mod server;

pub use client::{RxApiClient, RxFetch};
pub use config::RxConfig;
pub use errors::{Result, RxError};
pub use export::{RxCsvSink, RxExcelSink, RxExportHub, RxSink};
pub use model::{RxDatasetKind, RxRallyClass, RxTriggerRequest};
pub use orchestrator::{RxDatasetOutcome, RxDatasetReport, RxOrchestrator, RxRunOutcome};
pub use project::project;
pub use record::{RxRecord, RxRecordBatch};
pub use server::RxTriggerServer;
