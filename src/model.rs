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

//! # Rallyx Model Module
//!
//! Domain enumerations shared by the client, projector, and orchestrator:
//! which competition class a trigger targets, and which dataset a single
//! fetch-and-project cycle produces.
//!
//! Dataset kinds map one-to-one onto the remote results API's `a` endpoint
//! codes; rally classes map onto its `oszt` class codes.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, RxError};

/// Competition category selector driving which remote event data a run
/// targets. Supplied per trigger, immutable for the duration of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RxRallyClass {
    /// Class 1 for national and international events (ORB + Int/ERC).
    OrbIntlErc,
    /// Rallye2 class.
    Rallye2,
    /// Historic class.
    Historic,
}

impl RxRallyClass {
    /// Maps an inbound trigger code (1..=3) to a rally class.
    ///
    /// An unknown code is the only run-fatal condition in the system: it is
    /// rejected here, at the boundary, before any fetch begins.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(RxRallyClass::OrbIntlErc),
            2 => Ok(RxRallyClass::Rallye2),
            3 => Ok(RxRallyClass::Historic),
            other => Err(RxError::validation(format!(
                "invalid rally class code {} (valid: 1, 2, 3)",
                other
            ))),
        }
    }

    /// Class code sent as the `oszt` query parameter.
    pub fn code(&self) -> u8 {
        match self {
            RxRallyClass::OrbIntlErc => 1,
            RxRallyClass::Rallye2 => 2,
            RxRallyClass::Historic => 3,
        }
    }
}

/// Identifies one fetchable dataset.
///
/// StageResult and EnhancedCurrentStage carry a stage number that is only
/// discovered dynamically, from the CurrentStage payload of the same run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RxDatasetKind {
    /// Entry list with detailed participant data.
    EntryList,
    /// Start list in starting order.
    StartList,
    /// Route sheet with the event's stages.
    RouteSheet,
    /// Detailed results of one completed stage.
    StageResult(u32),
    /// Cars currently on stage.
    CurrentStage,
    /// Current stage enriched with GPS positions.
    EnhancedCurrentStage(u32),
}

impl RxDatasetKind {
    /// Endpoint code sent as the `a` query parameter.
    pub fn endpoint_code(&self) -> u32 {
        match self {
            RxDatasetKind::EntryList => 8,
            RxDatasetKind::StartList => 9,
            RxDatasetKind::RouteSheet => 10,
            RxDatasetKind::StageResult(_) => 3,
            RxDatasetKind::CurrentStage => 4,
            RxDatasetKind::EnhancedCurrentStage(_) => 104,
        }
    }

    /// Stage qualifier for stage-scoped kinds.
    pub fn stage(&self) -> Option<u32> {
        match self {
            RxDatasetKind::StageResult(n) | RxDatasetKind::EnhancedCurrentStage(n) => Some(*n),
            _ => None,
        }
    }

    /// Stable dataset name used for sink output (file stems, worksheet tabs)
    /// and outcome reporting.
    pub fn dataset_name(&self) -> String {
        match self {
            RxDatasetKind::EntryList => "entry_list".to_string(),
            RxDatasetKind::StartList => "start_list".to_string(),
            RxDatasetKind::RouteSheet => "route_sheet".to_string(),
            RxDatasetKind::StageResult(n) => format!("stage_results_{}", n),
            RxDatasetKind::CurrentStage => "current_stage".to_string(),
            RxDatasetKind::EnhancedCurrentStage(n) => format!("enhanced_current_{}", n),
        }
    }
}

/// Externally-initiated request that starts one fetch-and-export run.
///
/// Created by the trigger boundary, consumed synchronously by the
/// orchestrator, discarded when the run completes or fails.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RxTriggerRequest {
    /// Competition class the run targets.
    pub rally_class: RxRallyClass,
    /// Optional filter restricting stage-scoped datasets to one stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<u32>,
}

impl RxTriggerRequest {
    /// Constructs an unfiltered trigger for the given class.
    pub fn new(rally_class: RxRallyClass) -> Self {
        RxTriggerRequest {
            rally_class,
            stage: None,
        }
    }

    /// Restricts the run's stage-scoped datasets to a single stage.
    pub fn with_stage(mut self, stage: u32) -> Self {
        self.stage = Some(stage);
        self
    }
}
