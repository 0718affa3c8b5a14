// ABOUTME: Core data models re-exported from body-echo-core
// ABOUTME: Identity, daily metric aggregate, activity, and insight event types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! # Data Models
//!
//! Re-exports the domain models from `body_echo_core::models` together with the goal
//! thresholds they are evaluated against.

pub use body_echo_core::config::GoalThresholds;
pub use body_echo_core::models::*;
