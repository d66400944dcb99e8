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

//! # Rallyx Row Projector Module
//!
//! Pure projection of raw API payloads into uniform, schema-ordered record
//! batches. Each dataset kind has a fixed column schema mapping our column
//! names onto the remote API's raw field keys (the API speaks Hungarian:
//! `Vezető` is the driver, `Nevezo` the entrant, and so on).
//!
//! ## Failure semantics
//!
//! Projection fails only when the payload's structure contradicts the API
//! contract: the top-level `data` list is missing, the schema's required key
//! is absent on every element, or (for the GPS-enhanced kind) the secondary
//! `gps` section is missing. A field missing from one row is ordinary
//! optional data and projects to JSON null — the column is still present, so
//! every record of a dataset carries the identical column set.
//!
//! Remote item ordering is preserved; it is load-bearing for start-order
//! lists downstream.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::errors::{Result, RxError};
use crate::model::RxDatasetKind;
use crate::record::{RxRecord, RxRecordBatch};

/// Column schema entry: our column name and the raw payload key it reads.
type ColumnSpec = (&'static str, &'static str);

/// Shared competitor columns (entry list, start list, stage results).
const COMPETITOR_COLUMNS: &[ColumnSpec] = &[
    ("race_number", "RSz"),
    ("driver", "Vezető"),
    ("navigator", "Navigátor"),
    ("nation_driver", "Nemzet1"),
    ("nation_navigator", "Nemzet2"),
    ("car_make", "AutoMarka"),
    ("car_model", "Autó"),
    ("entrant", "Nevezo"),
    ("class", "Oszt."),
];

const ROUTE_COLUMNS: &[ColumnSpec] = &[
    ("stage", "s"),
    ("stage_name", "stage_name"),
    ("stage_type", "stage_type"),
    ("distance", "distance"),
];

const TIMING_COLUMNS: &[ColumnSpec] = &[
    ("start_time", "dtRajtIdo"),
    ("elapsed_time", "EddigiIdo"),
];

const PROGRESS_COLUMNS: &[ColumnSpec] = &[
    ("estimated_time", "BecsTeljIdo"),
    ("distance_from_start", "relNyomvTavKezd"),
    ("alert", "Alert"),
];

const GPS_COLUMNS: &[ColumnSpec] = &[
    ("gps_lat", "koo_lat"),
    ("gps_lon", "koo_lon"),
    ("gps_speed", "koo_seb"),
    ("gps_heading", "koo_heading"),
    ("gps_timestamp", "koo_timestamp"),
];

/// Fixed schema for one dataset kind: the raw key that must exist somewhere
/// in the payload rows, plus the ordered column specs.
fn schema(kind: &RxDatasetKind) -> (&'static str, Vec<ColumnSpec>) {
    match kind {
        RxDatasetKind::EntryList => ("RSz", COMPETITOR_COLUMNS.to_vec()),
        RxDatasetKind::StartList => {
            let mut columns = COMPETITOR_COLUMNS.to_vec();
            columns.push(("start_time", "dtRajtIdo"));
            ("RSz", columns)
        }
        RxDatasetKind::RouteSheet => ("s", ROUTE_COLUMNS.to_vec()),
        RxDatasetKind::StageResult(_) => {
            let mut columns = COMPETITOR_COLUMNS.to_vec();
            columns.extend_from_slice(TIMING_COLUMNS);
            ("RSz", columns)
        }
        RxDatasetKind::CurrentStage | RxDatasetKind::EnhancedCurrentStage(_) => {
            let mut columns = COMPETITOR_COLUMNS.to_vec();
            columns.extend_from_slice(TIMING_COLUMNS);
            columns.extend_from_slice(PROGRESS_COLUMNS);
            ("RSz", columns)
        }
    }
}

/// Projects a raw payload into the dataset's uniform record batch.
///
/// Deterministic and side-effect free: the same payload always yields the
/// same record sequence.
pub fn project(kind: &RxDatasetKind, payload: &Value) -> Result<RxRecordBatch> {
    let name = kind.dataset_name();
    let rows = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| RxError::projection(&name, "payload has no top-level 'data' array"))?;

    let (required_key, columns) = schema(kind);
    check_required_key(&name, required_key, rows)?;
    let empty = Map::new();

    match kind {
        RxDatasetKind::EnhancedCurrentStage(_) => {
            let fixes = gps_index(&name, payload)?;
            let mut batch = Vec::new();
            for row in rows {
                let fields = row.as_object().unwrap_or(&empty);
                let Some(fix) = fields
                    .get("RSz")
                    .and_then(race_key)
                    .and_then(|key| fixes.get(&key))
                else {
                    // No GPS fix for this competitor: drop the row, not the run.
                    continue;
                };
                let mut record = project_row(fields, &columns);
                for (column, key) in GPS_COLUMNS {
                    record.insert(*column, scalar(fix.get(*key)));
                }
                batch.push(record);
            }
            Ok(batch)
        }
        _ => Ok(rows
            .iter()
            .map(|row| project_row(row.as_object().unwrap_or(&empty), &columns))
            .collect()),
    }
}

/// Fails when the schema's required key is absent on every element: that is
/// an API contract change, not bad data in one row.
fn check_required_key(dataset: &str, required_key: &str, rows: &[Value]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let present = rows
        .iter()
        .any(|row| row.get(required_key).map_or(false, |v| !v.is_null()));
    if present {
        Ok(())
    } else {
        Err(RxError::projection(
            dataset,
            format!("required key '{}' missing on every element", required_key),
        ))
    }
}

/// Projects one raw row through the column specs, nulling absent fields.
fn project_row(fields: &Map<String, Value>, columns: &[ColumnSpec]) -> RxRecord {
    let mut record = RxRecord::new();
    for (column, key) in columns {
        record.insert(*column, scalar(fields.get(*key)));
    }
    record
}

/// Indexes the secondary GPS section by race number. A competitor counts as
/// having a fix only when both coordinates are present.
fn gps_index<'a>(dataset: &str, payload: &'a Value) -> Result<HashMap<String, &'a Map<String, Value>>> {
    let section = payload
        .get("gps")
        .and_then(Value::as_array)
        .ok_or_else(|| RxError::projection(dataset, "payload has no 'gps' section"))?;

    let mut index = HashMap::new();
    for entry in section {
        let Value::Object(fields) = entry else {
            continue;
        };
        let has_fix = fields.get("koo_lat").map_or(false, |v| !v.is_null())
            && fields.get("koo_lon").map_or(false, |v| !v.is_null());
        if !has_fix {
            continue;
        }
        if let Some(key) = fields.get("RSz").and_then(race_key) {
            index.insert(key, fields);
        }
    }
    Ok(index)
}

/// Normalizes a race number value (JSON number or string) into a lookup key.
fn race_key(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

/// Flattens a raw value into a cell scalar. Non-object rows project as all
/// nulls; nested values are stringified rather than carried through.
fn scalar(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::Null,
        Some(v @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => v.clone(),
        Some(composite) => Value::String(composite.to_string()),
    }
}
