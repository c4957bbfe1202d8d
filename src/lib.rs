// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod assistant;
pub mod categories;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod guard;
pub mod identity;
pub mod ledger;
pub mod messages;
pub mod models;
pub mod networth;
pub mod orchestrator;
pub mod quota;
pub mod records;
pub mod utils;

pub use error::{EngineError, EngineResult};
