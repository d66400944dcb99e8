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

//! # Rallyx Trigger Server Module
//!
//! Minimal HTTP boundary that turns inbound trigger requests into runs.
//!
//! - `POST /trigger` with body `{"rally_class": 1, "stage": 3}` (stage
//!   optional) starts one synchronous run and answers with the serialized
//!   run outcome
//! - `GET /` answers with service information
//!
//! Trigger handling is serialized to one in-flight run at a time: the file
//! and workbook sinks write to fixed paths, and overlapping runs targeting
//! the same paths would race last-writer-wins. A connection that arrives
//! mid-run simply waits its turn.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

use crate::errors::Result;
use crate::model::{RxRallyClass, RxTriggerRequest};
use crate::orchestrator::RxOrchestrator;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(300);

/// HTTP listener mapping trigger requests onto orchestrator runs.
pub struct RxTriggerServer {
    orchestrator: Arc<RxOrchestrator>,
    run_gate: Arc<Mutex<()>>,
}

impl RxTriggerServer {
    /// Wraps an orchestrator for serving.
    pub fn new(orchestrator: RxOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            run_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Accepts connections until the process is terminated.
    pub fn serve(&self, host: &str, port: u16) -> Result<()> {
        let listener = TcpListener::bind((host, port))?;
        log::info!("trigger listener started on {}:{}", host, port);

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    stream.set_read_timeout(Some(CONNECTION_TIMEOUT)).ok();
                    let orchestrator = self.orchestrator.clone();
                    let run_gate = self.run_gate.clone();
                    thread::spawn(move || {
                        handle_connection(stream, orchestrator, run_gate);
                    });
                }
                Err(err) => {
                    log::error!("error accepting connection: {}", err);
                }
            }
        }

        Ok(())
    }
}

fn handle_connection(
    stream: TcpStream,
    orchestrator: Arc<RxOrchestrator>,
    run_gate: Arc<Mutex<()>>,
) {
    let mut reader = BufReader::new(&stream);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = header.trim();
                if trimmed.is_empty() {
                    break;
                }
                if let Some(value) = trimmed
                    .to_ascii_lowercase()
                    .strip_prefix("content-length:")
                    .map(str::trim)
                {
                    content_length = value.parse().unwrap_or(0);
                }
            }
            Err(_) => return,
        }
    }

    match (method, path) {
        ("POST", "/trigger") => {
            let mut body = vec![0u8; content_length];
            if reader.read_exact(&mut body).is_err() {
                respond(&stream, 400, &json!({"error": "unreadable request body"}));
                return;
            }

            let trigger = match parse_trigger(&body) {
                Ok(trigger) => trigger,
                Err(message) => {
                    respond(&stream, 400, &json!({ "error": message }));
                    return;
                }
            };

            // One in-flight run at a time; later triggers wait here.
            let _guard = run_gate.lock().unwrap();
            let outcome = orchestrator.run(&trigger);
            match serde_json::to_value(&outcome) {
                Ok(body) => respond(&stream, 200, &body),
                Err(err) => {
                    respond(&stream, 500, &json!({"error": err.to_string()}));
                }
            }
        }
        ("GET", "/") => {
            respond(
                &stream,
                200,
                &json!({
                    "name": "Rallyx",
                    "version": env!("CARGO_PKG_VERSION"),
                    "endpoints": { "trigger": "/trigger" },
                }),
            );
        }
        _ => {
            respond(&stream, 404, &json!({"error": "not found"}));
        }
    }
}

/// Parses and validates a trigger body. An invalid rally class fails the
/// whole request before any fetch begins.
fn parse_trigger(body: &[u8]) -> std::result::Result<RxTriggerRequest, String> {
    let payload: Value =
        serde_json::from_slice(body).map_err(|e| format!("invalid JSON body: {}", e))?;

    let code = payload
        .get("rally_class")
        .and_then(Value::as_u64)
        .ok_or_else(|| "missing 'rally_class' field".to_string())?;
    let class = RxRallyClass::from_code(code as u8).map_err(|e| e.to_string())?;

    let mut trigger = RxTriggerRequest::new(class);
    if let Some(stage) = payload.get("stage").and_then(Value::as_u64) {
        trigger = trigger.with_stage(stage as u32);
    }
    Ok(trigger)
}

fn respond(mut stream: &TcpStream, status: u16, body: &Value) {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Internal Server Error",
    };
    let body = body.to_string();
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    if let Err(err) = stream.write_all(response.as_bytes()) {
        log::debug!("failed to write response: {}", err);
    }
}
