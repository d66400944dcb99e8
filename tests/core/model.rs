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

//! # Rallyx Model Tests
//!
//! Tests for rally class and dataset kind mappings and the record type.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test model
//! ```

use rallyx::{RxDatasetKind, RxRallyClass, RxRecord, RxTriggerRequest};
use serde_json::json;

/// Tests that every valid trigger code maps to its rally class and back.
#[test]
fn rally_class_codes_round_trip() {
    for code in 1..=3u8 {
        let class = RxRallyClass::from_code(code).unwrap();
        assert_eq!(class.code(), code);
    }
}

/// Tests that unknown trigger codes are rejected at the boundary.
#[test]
fn rally_class_rejects_unknown_codes() {
    assert!(RxRallyClass::from_code(0).is_err());
    assert!(RxRallyClass::from_code(4).is_err());
}

/// Tests the dataset kind to endpoint code mapping.
#[test]
fn dataset_kinds_map_to_endpoint_codes() {
    assert_eq!(RxDatasetKind::EntryList.endpoint_code(), 8);
    assert_eq!(RxDatasetKind::StartList.endpoint_code(), 9);
    assert_eq!(RxDatasetKind::RouteSheet.endpoint_code(), 10);
    assert_eq!(RxDatasetKind::StageResult(4).endpoint_code(), 3);
    assert_eq!(RxDatasetKind::CurrentStage.endpoint_code(), 4);
    assert_eq!(RxDatasetKind::EnhancedCurrentStage(4).endpoint_code(), 104);
}

/// Tests stage qualifiers: only stage-scoped kinds carry one.
#[test]
fn stage_qualifiers() {
    assert_eq!(RxDatasetKind::StageResult(7).stage(), Some(7));
    assert_eq!(RxDatasetKind::EnhancedCurrentStage(2).stage(), Some(2));
    assert_eq!(RxDatasetKind::EntryList.stage(), None);
    assert_eq!(RxDatasetKind::CurrentStage.stage(), None);
}

/// Tests the stable dataset names used for sink output.
#[test]
fn dataset_names_are_stable() {
    assert_eq!(RxDatasetKind::EntryList.dataset_name(), "entry_list");
    assert_eq!(RxDatasetKind::StartList.dataset_name(), "start_list");
    assert_eq!(RxDatasetKind::RouteSheet.dataset_name(), "route_sheet");
    assert_eq!(RxDatasetKind::StageResult(3).dataset_name(), "stage_results_3");
    assert_eq!(RxDatasetKind::CurrentStage.dataset_name(), "current_stage");
    assert_eq!(
        RxDatasetKind::EnhancedCurrentStage(3).dataset_name(),
        "enhanced_current_3"
    );
}

/// Tests that records keep their columns in insertion order.
#[test]
fn record_preserves_column_order() {
    let mut record = RxRecord::new();
    record.insert("z_last", json!(1));
    record.insert("a_first", json!(2));
    record.insert("m_middle", json!(3));
    assert_eq!(record.column_names(), vec!["z_last", "a_first", "m_middle"]);
}

/// Tests cell rendering: null and absent columns become empty strings,
/// strings render unquoted, numbers via their JSON form.
#[test]
fn record_cell_text_rendering() {
    let mut record = RxRecord::new();
    record.insert("driver", json!("Nagy"));
    record.insert("race_number", json!(12));
    record.insert("alert", json!(null));
    assert_eq!(record.cell_text("driver"), "Nagy");
    assert_eq!(record.cell_text("race_number"), "12");
    assert_eq!(record.cell_text("alert"), "");
    assert_eq!(record.cell_text("missing"), "");
}

/// Tests trigger construction with and without a stage filter.
#[test]
fn trigger_request_builder() {
    let trigger = RxTriggerRequest::new(RxRallyClass::Historic);
    assert_eq!(trigger.stage, None);
    let trigger = trigger.with_stage(5);
    assert_eq!(trigger.stage, Some(5));
    assert_eq!(trigger.rally_class, RxRallyClass::Historic);
}
