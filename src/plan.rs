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

//! # Rallyx Fetch Plan Module
//!
//! Explicit two-phase plan for one run: the static dataset kinds known up
//! front, and the stage-scoped kinds that can only be derived after the
//! CurrentStage payload has been fetched. Keeping the derivation here, as a
//! pure function of the payload, keeps the orchestrator's sequencing
//! inspectable and testable without a network.

use serde_json::Value;

use crate::model::RxDatasetKind;

/// Static dataset kinds attempted for every run, in order. CurrentStage is
/// last so its payload is in hand exactly when the derived phase begins.
pub fn static_phase() -> Vec<RxDatasetKind> {
    vec![
        RxDatasetKind::EntryList,
        RxDatasetKind::StartList,
        RxDatasetKind::RouteSheet,
        RxDatasetKind::CurrentStage,
    ]
}

/// Derives the stage-scoped dataset kinds from a CurrentStage payload:
/// StageResult(n) for each completed stage n, then EnhancedCurrentStage for
/// the stage currently being run.
///
/// The payload reports the current stage under `stage` and the completed
/// stages under `completed`; when the `completed` list is absent, every
/// stage below the current one counts as completed. A payload that reports
/// no current stage (rally not started, or CurrentStage fetch failed
/// upstream) derives the empty list.
pub fn derived_phase(current_stage_payload: &Value) -> Vec<RxDatasetKind> {
    let Some(current) = current_stage_payload
        .get("stage")
        .and_then(Value::as_u64)
        .map(|n| n as u32)
    else {
        log::warn!("current stage payload reports no stage number, skipping stage-scoped datasets");
        return Vec::new();
    };

    let mut completed: Vec<u32> = match current_stage_payload
        .get("completed")
        .and_then(Value::as_array)
    {
        Some(list) => list
            .iter()
            .filter_map(Value::as_u64)
            .map(|n| n as u32)
            .filter(|n| *n <= current)
            .collect(),
        None => (1..current).collect(),
    };
    completed.sort_unstable();
    completed.dedup();

    let mut kinds: Vec<RxDatasetKind> = completed
        .into_iter()
        .map(RxDatasetKind::StageResult)
        .collect();
    kinds.push(RxDatasetKind::EnhancedCurrentStage(current));
    kinds
}

/// Applies an optional trigger stage filter to the derived phase.
pub fn filter_stage(kinds: Vec<RxDatasetKind>, stage: Option<u32>) -> Vec<RxDatasetKind> {
    match stage {
        Some(wanted) => kinds
            .into_iter()
            .filter(|kind| kind.stage() == Some(wanted))
            .collect(),
        None => kinds,
    }
}
