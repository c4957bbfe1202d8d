// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{EngineError, EngineResult};
use serde::Serialize;

/// Who is making the call, as resolved by whatever authenticated the request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Identity {
    pub user_id: Option<String>,
    pub is_premium: bool,
    pub timezone: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Identity {
            user_id: Some(user_id.into()),
            is_premium: false,
            timezone: "UTC".to_string(),
        }
    }

    pub fn premium(mut self, is_premium: bool) -> Self {
        self.is_premium = is_premium;
        self
    }

    /// The caller's user id; a missing or blank id is an authorization failure.
    pub fn require_user(&self) -> EngineResult<&str> {
        match self.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(EngineError::Unauthorized),
        }
    }
}
