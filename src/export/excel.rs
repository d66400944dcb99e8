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

//! # Spreadsheet Workbook Sink
//!
//! Maintains a single workbook with one worksheet tab per dataset: header
//! row, one row per record, auto-fitted columns. Re-publishing a dataset
//! replaces its sheet.
//!
//! The xlsx writer produces whole files, so the sink keeps the latest rows
//! of every dataset and rewrites the workbook on each publish. The map lives
//! behind a mutex; concurrent runs publishing into the same workbook
//! serialize here, last writer wins.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use rust_xlsxwriter::{Format, Workbook};

use crate::config::RxConfig;
use crate::errors::{Result, RxError};
use crate::export::RxSink;
use crate::record::RxRecordBatch;

/// Excel's worksheet name limit.
const MAX_SHEET_NAME: usize = 31;

/// One-worksheet-per-dataset workbook writer.
pub struct RxExcelSink {
    path: PathBuf,
    datasets: Mutex<BTreeMap<String, RxRecordBatch>>,
}

impl RxExcelSink {
    /// Builds the sink from resolved configuration.
    pub fn new(config: &RxConfig) -> Self {
        Self {
            path: PathBuf::from(&config.excel_path),
            datasets: Mutex::new(BTreeMap::new()),
        }
    }

    /// Rewrites the whole workbook from the retained datasets.
    fn save(&self, datasets: &BTreeMap<String, RxRecordBatch>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        for (dataset, rows) in datasets {
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(clean_sheet_name(dataset))
                .map_err(|e| RxError::sink("excel", e.to_string()))?;

            let Some(first) = rows.first() else {
                continue;
            };
            let headers = first.column_names();

            for (col, header) in headers.iter().enumerate() {
                worksheet
                    .write_string_with_format(0, col as u16, *header, &header_format)
                    .map_err(|e| RxError::sink("excel", e.to_string()))?;
            }

            for (row_idx, record) in rows.iter().enumerate() {
                for (col, header) in headers.iter().enumerate() {
                    worksheet
                        .write_string((row_idx + 1) as u32, col as u16, record.cell_text(header))
                        .map_err(|e| RxError::sink("excel", e.to_string()))?;
                }
            }

            worksheet.autofit();
        }

        workbook
            .save(&self.path)
            .map_err(|e| RxError::sink("excel", e.to_string()))?;
        Ok(())
    }
}

impl RxSink for RxExcelSink {
    fn name(&self) -> &str {
        "excel"
    }

    fn write(&self, dataset: &str, rows: &RxRecordBatch) -> Result<()> {
        let mut datasets = self
            .datasets
            .lock()
            .map_err(|_| RxError::sink("excel", "workbook state poisoned"))?;
        datasets.insert(dataset.to_string(), rows.clone());
        self.save(&datasets)?;
        log::info!(
            "wrote {} rows to sheet '{}' in {}",
            rows.len(),
            clean_sheet_name(dataset),
            self.path.display()
        );
        Ok(())
    }
}

/// Cleans a dataset name to comply with Excel's sheet naming rules: at most
/// 31 characters, no `\ / ? * [ ]`, never empty.
fn clean_sheet_name(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | '?' | '*' | '[' | ']' => '_',
            other => other,
        })
        .collect();

    if cleaned.is_empty() {
        cleaned = "Sheet".to_string();
    }
    if cleaned.chars().count() > MAX_SHEET_NAME {
        cleaned = cleaned.chars().take(MAX_SHEET_NAME).collect();
    }
    cleaned
}
