// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod assets;
pub mod categories;
pub mod chat;
pub mod doctor;
pub mod ledgers;
pub mod settings;
pub mod transactions;
