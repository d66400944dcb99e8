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

//! # Rallyx Export Module
//!
//! Sink registry and fan-out for published datasets.
//!
//! ## Module Components
//!
//! - **csv**: one delimited-text file per dataset
//! - **excel**: one workbook, one worksheet tab per dataset
//!
//! A sink is any implementation of the [`RxSink`] capability: a name for
//! failure attribution and a single `write` operation. The hub delivers each
//! published dataset to every registered sink in registration order,
//! isolating failures per sink — sink N failing never keeps sink N+1 from
//! receiving the same dataset. Sinks are assumed idempotent on overwrite:
//! re-publishing a dataset replaces that dataset's prior output.

use crate::errors::{Result, RxError};
use crate::record::RxRecordBatch;

pub mod csv;
pub mod excel;

pub use self::csv::RxCsvSink;
pub use self::excel::RxExcelSink;

/// Capability every sink writer must fulfill.
pub trait RxSink: Send + Sync {
    /// Sink identity used when tagging write failures.
    fn name(&self) -> &str;

    /// Persists one published dataset, replacing any prior output for it.
    fn write(&self, dataset: &str, rows: &RxRecordBatch) -> Result<()>;
}

/// Ordered collection of sinks with per-sink failure isolation.
#[derive(Default)]
pub struct RxExportHub {
    sinks: Vec<Box<dyn RxSink>>,
}

impl RxExportHub {
    /// Constructs an empty hub.
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Registers a sink. Delivery happens in registration order.
    pub fn register(&mut self, sink: Box<dyn RxSink>) {
        log::info!("registered sink '{}'", sink.name());
        self.sinks.push(sink);
    }

    /// Number of registered sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sinks are registered.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Delivers a dataset to every registered sink synchronously, returning
    /// once all sinks have been attempted.
    ///
    /// Each failure is wrapped as a sink error tagged with the sink's name
    /// and logged; it never prevents the remaining sinks from being
    /// attempted. The collected errors are returned for observability only —
    /// publish itself never fails.
    pub fn publish(&self, dataset: &str, rows: &RxRecordBatch) -> Vec<RxError> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            match sink.write(dataset, rows) {
                Ok(()) => {
                    log::debug!("sink '{}' wrote dataset '{}'", sink.name(), dataset);
                }
                Err(err) => {
                    let tagged = RxError::sink(sink.name(), err.to_string());
                    log::error!("{}", tagged);
                    failures.push(tagged);
                }
            }
        }
        failures
    }
}
