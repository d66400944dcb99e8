//! Copyright © 2025-2026 The Rallyx Authors. All Rights Reserved.
//!
//! This file is part of Rallyx.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Rallyx Orchestrator Tests
//!
//! Tests run sequencing, partial failure handling, and outcome reporting
//! against a scripted fetch implementation — no network involved.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test orchestrator
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use rallyx::{
    RxDatasetKind, RxDatasetOutcome, RxError, RxExportHub, RxFetch, RxOrchestrator, RxRallyClass,
    RxRecordBatch, RxSink, RxTriggerRequest,
};
use serde_json::{json, Value};

/// Scripted fetch: answers from canned payloads, optionally failing chosen
/// datasets, and logs the attempt order.
struct StubFetch {
    fail: HashSet<String>,
    current_stage: Value,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubFetch {
    fn new(current_stage: Value) -> Self {
        Self {
            fail: HashSet::new(),
            current_stage,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing(mut self, dataset: &str) -> Self {
        self.fail.insert(dataset.to_string());
        self
    }

    fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

impl RxFetch for StubFetch {
    fn fetch(&self, kind: &RxDatasetKind, _class: RxRallyClass) -> rallyx::Result<Value> {
        let name = kind.dataset_name();
        self.calls.lock().unwrap().push(name.clone());

        if self.fail.contains(&name) {
            return Err(RxError::RemoteRejected { status: 503 });
        }
        if *kind == RxDatasetKind::CurrentStage {
            return Ok(self.current_stage.clone());
        }
        if matches!(kind, RxDatasetKind::EnhancedCurrentStage(_)) {
            return Ok(json!({
                "data": [{"RSz": 1, "Vezető": "A"}, {"RSz": 2, "Vezető": "B"}],
                "gps": [
                    {"RSz": 1, "koo_lat": 47.8, "koo_lon": 19.9},
                    {"RSz": 2, "koo_lat": 47.9, "koo_lon": 20.0}
                ]
            }));
        }
        if *kind == RxDatasetKind::RouteSheet {
            return Ok(json!({"data": [{"s": 1}, {"s": 2}, {"s": 3}]}));
        }
        Ok(json!({"data": [{"RSz": 1, "Vezető": "A"}, {"RSz": 2, "Vezető": "B"}]}))
    }
}

/// Sink that records every delivery it receives.
struct RecordingSink {
    writes: Arc<Mutex<Vec<(String, usize)>>>,
}

impl RxSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn write(&self, dataset: &str, rows: &RxRecordBatch) -> rallyx::Result<()> {
        self.writes.lock().unwrap().push((dataset.to_string(), rows.len()));
        Ok(())
    }
}

fn current_stage_payload() -> Value {
    json!({
        "stage": 3,
        "completed": [1, 2],
        "data": [{"RSz": 1, "Vezető": "A"}]
    })
}

fn trigger() -> RxTriggerRequest {
    RxTriggerRequest::new(RxRallyClass::OrbIntlErc)
}

/// Tests that every static dataset is attempted before any stage-scoped
/// dataset, and the derived phase follows the reference scenario.
#[test]
fn static_datasets_attempted_before_stage_scoped() {
    let fetch = StubFetch::new(current_stage_payload());
    let calls = fetch.calls();
    let orchestrator = RxOrchestrator::new(Box::new(fetch), RxExportHub::new());

    let outcome = orchestrator.run(&trigger());

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            "entry_list",
            "start_list",
            "route_sheet",
            "current_stage",
            "stage_results_1",
            "stage_results_2",
            "enhanced_current_3",
        ]
    );
    assert_eq!(outcome.datasets.len(), 7);
    assert_eq!(outcome.succeeded(), 7);
}

/// Tests the degradation edge case: when CurrentStage itself fails, the
/// static datasets are still attempted and no stage-scoped dataset is.
#[test]
fn current_stage_failure_degrades_derived_phase() {
    let fetch = StubFetch::new(current_stage_payload()).failing("current_stage");
    let calls = fetch.calls();
    let orchestrator = RxOrchestrator::new(Box::new(fetch), RxExportHub::new());

    let outcome = orchestrator.run(&trigger());

    assert_eq!(
        *calls.lock().unwrap(),
        vec!["entry_list", "start_list", "route_sheet", "current_stage"]
    );
    assert_eq!(outcome.datasets.len(), 4);
    assert_eq!(outcome.succeeded(), 3);
    assert!(!outcome.report("current_stage").unwrap().outcome.is_success());
}

/// Tests partial failure: one dataset failing is recorded with its error
/// kind while the successful datasets still reach the sinks.
#[test]
fn partial_failure_reports_and_still_publishes() {
    let fetch = StubFetch::new(current_stage_payload()).failing("route_sheet");
    let writes = Arc::new(Mutex::new(Vec::new()));
    let mut hub = RxExportHub::new();
    hub.register(Box::new(RecordingSink {
        writes: writes.clone(),
    }));
    let orchestrator = RxOrchestrator::new(Box::new(fetch), hub);

    let outcome = orchestrator.run(&trigger());

    let entry = outcome.report("entry_list").unwrap();
    assert!(matches!(entry.outcome, RxDatasetOutcome::Success { rows: 2 }));

    let route = outcome.report("route_sheet").unwrap();
    match &route.outcome {
        RxDatasetOutcome::Failed { error_kind, .. } => {
            assert_eq!(error_kind, "remote_rejected");
        }
        other => panic!("expected failure, got {:?}", other),
    }

    let writes = writes.lock().unwrap();
    assert!(writes.contains(&("entry_list".to_string(), 2)));
    assert!(!writes.iter().any(|(name, _)| name == "route_sheet"));
}

/// Tests the trigger stage filter: only the requested stage survives the
/// derived phase.
#[test]
fn stage_filter_limits_derived_datasets() {
    let fetch = StubFetch::new(current_stage_payload());
    let calls = fetch.calls();
    let orchestrator = RxOrchestrator::new(Box::new(fetch), RxExportHub::new());

    orchestrator.run(&trigger().with_stage(2));

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            "entry_list",
            "start_list",
            "route_sheet",
            "current_stage",
            "stage_results_2",
        ]
    );
}

/// Tests idempotence: two runs over unchanged remote state report identical
/// per-dataset outcomes.
#[test]
fn rerun_over_unchanged_state_is_idempotent() {
    let orchestrator = RxOrchestrator::new(
        Box::new(StubFetch::new(current_stage_payload())),
        RxExportHub::new(),
    );

    let first = orchestrator.run(&trigger());
    let second = orchestrator.run(&trigger());

    assert_eq!(
        serde_json::to_value(&first.datasets).unwrap(),
        serde_json::to_value(&second.datasets).unwrap()
    );
}
