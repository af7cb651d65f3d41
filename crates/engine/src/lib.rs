// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Studio job execution engine

mod bus;
mod config;
mod engine;
mod error;
mod runner;
mod scheduler;
mod store;

pub use bus::{JobUpdate, UpdateBus, UpdateFilter, UpdateOrigin, UpdateReceiver};
pub use config::EngineConfig;
pub use engine::{Engine, EngineDeps};
pub use error::{ConfigLoadError, EngineError};
pub use runner::Runner;
pub use scheduler::{ClaimToken, Scheduler};
pub use store::JobStore;
