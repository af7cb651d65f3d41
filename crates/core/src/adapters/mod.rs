// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content adapters: the simulated work behind each stage

pub mod fake;
pub mod synthetic;
pub mod traits;

pub use fake::{AdapterCall, FakeContentAdapter};
pub use synthetic::SyntheticAdapter;
pub use traits::{ContentAdapter, UnitArtifact};
