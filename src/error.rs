// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Failures surfaced by the reconciliation engine and the turn orchestrator.
///
/// Dangling asset references and bad assistant candidates are recovered where they
/// happen and never show up here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("unable to resolve user id")]
    Unauthorized,

    #[error("message limit reached ({count}/{limit}); upgrade for unlimited chat")]
    QuotaExceeded { count: i64, limit: i64 },

    #[error("assistant unavailable: {0}")]
    AssistantUnavailable(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        EngineError::NotFound(what.into())
    }
}
