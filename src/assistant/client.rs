// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Assistant, AssistantRequest};
use crate::error::{EngineError, EngineResult};
use crate::utils::http_client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_ASSISTANT_URL: &str = "https://users.pulseheath.com/agent/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CHAT_PATH: &str = "api/agent/chat/";

/// Blocking HTTP client for the assistant service. One request per call, no retries.
pub struct HttpAssistant {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpAssistant {
    pub fn new(base_url: &str, timeout: Duration) -> EngineResult<Self> {
        let client = http_client(timeout)
            .map_err(|e| EngineError::AssistantUnavailable(format!("http client: {}", e)))?;
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { client, base_url })
    }

    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url, CHAT_PATH)
    }
}

impl Assistant for HttpAssistant {
    fn invoke(&self, request: &AssistantRequest) -> EngineResult<Value> {
        info!(model = %request.model_name, assistant = %request.assistant_name, "calling assistant");
        let resp = self
            .client
            .post(self.chat_url())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, &request.token)
            .json(request)
            .send()
            .map_err(|e| {
                error!("assistant request failed: {}", e);
                EngineError::AssistantUnavailable(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            error!(%status, "assistant returned an error: {}", body);
            return Err(EngineError::AssistantUnavailable(format!(
                "assistant returned {}",
                status
            )));
        }

        let body: Value = resp.json().map_err(|e| {
            error!("assistant response is not JSON: {}", e);
            EngineError::AssistantUnavailable(format!("response is not JSON: {}", e))
        })?;
        extract_content(body)
    }
}

/// Pulls `data.content` out of the service envelope.
pub fn extract_content(mut body: Value) -> EngineResult<Value> {
    match body.pointer_mut("/data/content").map(Value::take) {
        Some(Value::Null) | None => Err(EngineError::AssistantUnavailable(
            "response has no data.content".to_string(),
        )),
        Some(content) => Ok(content),
    }
}
