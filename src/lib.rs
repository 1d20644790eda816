// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budget;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod fx;
pub mod icons;
pub mod log;
pub mod models;
pub mod notify;
pub mod schedule;
pub mod settlement;
pub mod utils;
