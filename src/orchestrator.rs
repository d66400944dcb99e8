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

//! # Rallyx Dataset Orchestrator Module
//!
//! Drives one trigger through the full fetch -> project -> publish cycle,
//! one dataset at a time, strictly sequentially. Strict sequencing is a
//! deliberate trade-off: CurrentStage must complete before the stage-scoped
//! datasets can even be named, and it makes partial-failure attribution
//! unambiguous.
//!
//! One dataset failing never aborts the run. The failure is recorded as that
//! dataset's outcome and the orchestrator moves on; partial success is a
//! valid terminal state. If the CurrentStage fetch itself fails, the derived
//! phase degenerates to empty while the static datasets keep their outcomes.
//!
//! A run holds no state shared with other runs, so concurrent `run()`
//! invocations are independent by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::RxFetch;
use crate::errors::RxError;
use crate::export::RxExportHub;
use crate::model::{RxDatasetKind, RxTriggerRequest};
use crate::plan;
use crate::project::project;

/// Outcome of one attempted dataset within a run.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RxDatasetOutcome {
    /// Fetch, projection, and publish all completed.
    Success { rows: usize },
    /// Fetch or projection failed; the error names the failing phase.
    Failed { error_kind: String, error: RxError },
}

impl RxDatasetOutcome {
    fn failed(error: RxError) -> Self {
        RxDatasetOutcome::Failed {
            error_kind: error.kind().to_string(),
            error,
        }
    }

    /// Whether this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, RxDatasetOutcome::Success { .. })
    }
}

/// Per-dataset report inside a run outcome.
#[derive(Debug, Serialize, Deserialize)]
pub struct RxDatasetReport {
    /// Dataset kind that was attempted.
    pub kind: RxDatasetKind,
    /// Stable dataset name (also the sink output name).
    pub dataset: String,
    /// Success or failure of the attempt.
    pub outcome: RxDatasetOutcome,
}

/// Aggregated result of one run: every attempted dataset in attempt order,
/// each with its individual outcome. No dataset's failure is silently
/// swallowed.
#[derive(Debug, Serialize, Deserialize)]
pub struct RxRunOutcome {
    /// Per-dataset reports in attempt order.
    pub datasets: Vec<RxDatasetReport>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

impl RxRunOutcome {
    /// Looks up the report for a dataset by its stable name.
    pub fn report(&self, dataset: &str) -> Option<&RxDatasetReport> {
        self.datasets.iter().find(|r| r.dataset == dataset)
    }

    /// Number of datasets that completed successfully.
    pub fn succeeded(&self) -> usize {
        self.datasets.iter().filter(|r| r.outcome.is_success()).count()
    }
}

/// Orchestrates fetch, projection, and sink fan-out for one trigger.
pub struct RxOrchestrator {
    client: Box<dyn RxFetch>,
    hub: RxExportHub,
}

impl RxOrchestrator {
    /// Builds an orchestrator over a fetch implementation and an export hub.
    pub fn new(client: Box<dyn RxFetch>, hub: RxExportHub) -> Self {
        Self { client, hub }
    }

    /// Executes one run: the static phase first (CurrentStage last), then
    /// the stage-scoped datasets derived from the CurrentStage payload.
    pub fn run(&self, trigger: &RxTriggerRequest) -> RxRunOutcome {
        log::info!(
            "starting run for rally class {}{}",
            trigger.rally_class.code(),
            trigger
                .stage
                .map(|s| format!(", stage filter {}", s))
                .unwrap_or_default()
        );

        let mut reports = Vec::new();
        let mut current_stage_payload: Option<Value> = None;

        for kind in plan::static_phase() {
            let payload = self.attempt(&kind, trigger, &mut reports);
            if kind == RxDatasetKind::CurrentStage {
                current_stage_payload = payload;
            }
        }

        let derived = match &current_stage_payload {
            Some(payload) => plan::filter_stage(plan::derived_phase(payload), trigger.stage),
            // CurrentStage failed: stage-scoped datasets cannot be resolved.
            None => Vec::new(),
        };

        for kind in derived {
            self.attempt(&kind, trigger, &mut reports);
        }

        let outcome = RxRunOutcome {
            datasets: reports,
            finished_at: Utc::now(),
        };
        log::info!(
            "run finished: {}/{} datasets succeeded",
            outcome.succeeded(),
            outcome.datasets.len()
        );
        outcome
    }

    /// Fetches and projects one dataset, publishing on success. Returns the
    /// raw payload so the caller can derive the stage plan from it.
    fn attempt(
        &self,
        kind: &RxDatasetKind,
        trigger: &RxTriggerRequest,
        reports: &mut Vec<RxDatasetReport>,
    ) -> Option<Value> {
        let dataset = kind.dataset_name();

        let result = self
            .client
            .fetch(kind, trigger.rally_class)
            .and_then(|payload| project(kind, &payload).map(|rows| (payload, rows)));

        let (payload, outcome) = match result {
            Ok((payload, rows)) => {
                self.hub.publish(&dataset, &rows);
                log::info!("dataset '{}' succeeded with {} rows", dataset, rows.len());
                (Some(payload), RxDatasetOutcome::Success { rows: rows.len() })
            }
            Err(error) => {
                log::warn!("dataset '{}' failed: {}", dataset, error);
                (None, RxDatasetOutcome::failed(error))
            }
        };

        reports.push(RxDatasetReport {
            kind: *kind,
            dataset,
            outcome,
        });
        payload
    }
}
