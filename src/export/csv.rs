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

//! # Delimited-Text Sink
//!
//! Writes each published dataset to `<output_dir>/<dataset>.csv` with a
//! configurable delimiter. The header row comes from the first record's
//! schema-ordered columns; every record of a dataset carries the same column
//! set, so the first record is authoritative.

use std::fs;
use std::path::PathBuf;

use crate::config::RxConfig;
use crate::errors::{Result, RxError};
use crate::export::RxSink;
use crate::record::RxRecordBatch;

/// One-file-per-dataset delimited text writer.
#[derive(Debug)]
pub struct RxCsvSink {
    output_dir: PathBuf,
    delimiter: u8,
}

impl RxCsvSink {
    /// Builds the sink from resolved configuration.
    pub fn new(config: &RxConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output_dir),
            delimiter: config.csv_delimiter,
        }
    }

    fn file_path(&self, dataset: &str) -> PathBuf {
        self.output_dir.join(format!("{}.csv", dataset))
    }
}

impl RxSink for RxCsvSink {
    fn name(&self) -> &str {
        "csv"
    }

    fn write(&self, dataset: &str, rows: &RxRecordBatch) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.file_path(dataset);

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&path)
            .map_err(|e| RxError::Io(e.to_string()))?;

        if let Some(first) = rows.first() {
            let headers = first.column_names();
            writer
                .write_record(&headers)
                .map_err(|e| RxError::Io(e.to_string()))?;

            for record in rows {
                let cells: Vec<String> = headers
                    .iter()
                    .map(|column| record.cell_text(column))
                    .collect();
                writer
                    .write_record(&cells)
                    .map_err(|e| RxError::Io(e.to_string()))?;
            }
        }

        writer.flush()?;
        log::info!("wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}
