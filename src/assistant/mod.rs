// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod client;
pub mod normalize;

use crate::error::EngineResult;
use serde::Serialize;
use serde_json::Value;

pub use client::HttpAssistant;
pub use normalize::{NormalizedTurn, PayloadShape, normalize};

/// One chat call to the external assistant.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantRequest {
    pub assistant_name: String,
    pub model_name: String,
    pub users_input: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_template_id: Option<i64>,
    #[serde(skip)]
    pub token: String,
}

/// The assistant collaborator. Implementations return the raw `content` payload,
/// whatever its shape; callers run it through [`normalize`].
pub trait Assistant {
    fn invoke(&self, request: &AssistantRequest) -> EngineResult<Value>;
}

/// Maps a session's display model to the model name the assistant service expects.
pub fn model_name_for(session_model: &str) -> &'static str {
    match session_model {
        "ChatGPT" => "gpt-3.5-turbo",
        "DeepSeek" => "deepseek-chat",
        _ => "qwen-max",
    }
}
