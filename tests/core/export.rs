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

//! # Rallyx Export Tests
//!
//! Tests sink fan-out isolation in the export hub and the concrete file
//! sinks against temporary directories.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test export
//! ```

use std::fs;
use std::sync::{Arc, Mutex};

use rallyx::{RxConfig, RxCsvSink, RxError, RxExcelSink, RxExportHub, RxRecord, RxRecordBatch, RxSink};
use serde_json::json;

struct FailingSink;

impl RxSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    fn write(&self, _dataset: &str, _rows: &RxRecordBatch) -> rallyx::Result<()> {
        Err(RxError::Io("disk full".to_string()))
    }
}

struct RecordingSink {
    writes: Arc<Mutex<Vec<String>>>,
}

impl RxSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn write(&self, dataset: &str, _rows: &RxRecordBatch) -> rallyx::Result<()> {
        self.writes.lock().unwrap().push(dataset.to_string());
        Ok(())
    }
}

fn sample_batch() -> RxRecordBatch {
    let mut first = RxRecord::new();
    first.insert("race_number", json!(2));
    first.insert("driver", json!("Nagy Péter"));
    first.insert("alert", json!(null));
    let mut second = RxRecord::new();
    second.insert("race_number", json!(5));
    second.insert("driver", json!("Tóth; Gábor"));
    second.insert("alert", json!("SLOW"));
    vec![first, second]
}

/// Tests fan-out isolation: a failing sink never keeps the next registered
/// sink from receiving the same dataset, and the failure is tagged with the
/// failing sink's identity.
#[test]
fn later_sinks_receive_dataset_after_earlier_failure() {
    let writes = Arc::new(Mutex::new(Vec::new()));
    let mut hub = RxExportHub::new();
    hub.register(Box::new(FailingSink));
    hub.register(Box::new(RecordingSink {
        writes: writes.clone(),
    }));

    let failures = hub.publish("entry_list", &sample_batch());

    assert_eq!(*writes.lock().unwrap(), vec!["entry_list".to_string()]);
    assert_eq!(failures.len(), 1);
    match &failures[0] {
        RxError::Sink { sink, .. } => assert_eq!(sink, "failing"),
        other => panic!("expected sink error, got {:?}", other),
    }
}

/// Tests that publishing with no registered sinks is a no-op.
#[test]
fn publish_with_no_sinks_is_noop() {
    let hub = RxExportHub::new();
    assert!(hub.is_empty());
    assert!(hub.publish("entry_list", &sample_batch()).is_empty());
}

/// Tests the delimited-text sink: one file per dataset, header row from the
/// schema-ordered columns, configured delimiter, nulls as empty cells.
#[test]
fn csv_sink_writes_one_file_per_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let config = RxConfig::default()
        .output_dir(dir.path().to_str().unwrap())
        .csv_delimiter(b';');
    let sink = RxCsvSink::new(&config);

    sink.write("entry_list", &sample_batch()).unwrap();

    let content = fs::read_to_string(dir.path().join("entry_list.csv")).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("race_number;driver;alert"));
    assert_eq!(lines.next(), Some("2;Nagy Péter;"));
    // The field containing the delimiter gets quoted.
    assert_eq!(lines.next(), Some("5;\"Tóth; Gábor\";SLOW"));
}

/// Tests that re-writing a dataset replaces the prior file content.
#[test]
fn csv_sink_overwrites_on_republish() {
    let dir = tempfile::tempdir().unwrap();
    let config = RxConfig::default().output_dir(dir.path().to_str().unwrap());
    let sink = RxCsvSink::new(&config);

    sink.write("route_sheet", &sample_batch()).unwrap();
    let mut single = RxRecord::new();
    single.insert("race_number", json!(9));
    sink.write("route_sheet", &vec![single]).unwrap();

    let content = fs::read_to_string(dir.path().join("route_sheet.csv")).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("9"));
}

/// Tests the workbook sink: writing two datasets produces one workbook file
/// and re-publishing keeps it readable.
#[test]
fn excel_sink_maintains_single_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rally_data.xlsx");
    let config = RxConfig::default().excel_path(path.to_str().unwrap());
    let sink = RxExcelSink::new(&config);

    sink.write("entry_list", &sample_batch()).unwrap();
    sink.write("stage_results_1", &sample_batch()).unwrap();
    assert!(path.exists());

    // Replacing a dataset rewrites the workbook in place.
    sink.write("entry_list", &sample_batch()).unwrap();
    assert!(path.exists());
}
