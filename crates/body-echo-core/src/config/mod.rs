// ABOUTME: Configuration types shared by the progress and insight engines
// ABOUTME: Goal thresholds with validated defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

/// Daily goal thresholds
pub mod goals;

pub use goals::GoalThresholds;
