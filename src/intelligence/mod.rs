// ABOUTME: Intelligence module re-exports from the body-echo-intelligence crate
// ABOUTME: Keeps crate::intelligence paths stable for services, binaries, and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! # Intelligence Module
//!
//! Progress ratios, level ladder, and coaching insight rules.

pub use body_echo_intelligence::*;

// Re-export submodules for path-based access (e.g., crate::intelligence::insights::RuleFn)
pub use body_echo_intelligence::{insights, level, progress};
