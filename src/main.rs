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

//! Process entry point: loads configuration once, wires the components
//! together by construction, and serves triggers until terminated.

use rallyx::{
    Result, RxApiClient, RxConfig, RxCsvSink, RxExcelSink, RxExportHub, RxOrchestrator,
    RxTriggerServer,
};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = RxConfig::from_env()?;

    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .init();
    log::info!("starting rallyx {}", env!("CARGO_PKG_VERSION"));

    let client = RxApiClient::new(&config)?;

    let mut hub = RxExportHub::new();
    if config.csv_enabled {
        hub.register(Box::new(RxCsvSink::new(&config)));
    }
    if config.excel_enabled {
        hub.register(Box::new(RxExcelSink::new(&config)));
    }
    if hub.is_empty() {
        log::warn!("no sinks enabled, fetched datasets will not be persisted");
    }

    let orchestrator = RxOrchestrator::new(Box::new(client), hub);
    let server = RxTriggerServer::new(orchestrator);
    server.serve(&config.listen_host, config.listen_port)
}
