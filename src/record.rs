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

//! # Rallyx Record Module
//!
//! This module provides the core data structure for representing projected
//! rows. RxRecord is the uniform unit of data every dataset is normalized
//! into before it reaches the sinks.
//!
//! ## Design Principles
//!
//! - **Ordered columns**: the column map preserves insertion order (serde_json
//!   with `preserve_order`), so every record of a dataset carries its columns
//!   in schema order and CSV/worksheet headers come out stable
//! - **Uniform shape**: all records of one dataset share an identical column
//!   set; optional source fields project to JSON null rather than being
//!   omitted
//! - **Scalar values**: cells hold strings, numbers, or null — nested
//!   structure is flattened away by the projector

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One projected row: an ordered mapping from column name to scalar value.
///
/// Records are produced exclusively by the row projector and are immutable
/// once a dataset is assembled. The column set is fixed per dataset kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RxRecord {
    /// Ordered column -> value map.
    #[serde(flatten)]
    pub columns: Map<String, Value>,
}

impl RxRecord {
    /// Constructs an empty record.
    pub fn new() -> Self {
        RxRecord {
            columns: Map::new(),
        }
    }

    /// Inserts a column, keeping insertion order.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.columns.insert(column.into(), value);
    }

    /// Returns the value of a column, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Renders a cell for tabular output: null becomes the empty string,
    /// strings render without quotes, other scalars via their JSON form.
    pub fn cell_text(&self, column: &str) -> String {
        match self.columns.get(column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl Default for RxRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience alias for one dataset's worth of records.
pub type RxRecordBatch = Vec<RxRecord>;
