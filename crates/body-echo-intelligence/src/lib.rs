// ABOUTME: Progress, level, and coaching insight engines for Body Echo
// ABOUTME: Pure, synchronous computations over core models with no storage access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

#![deny(unsafe_code)]

//! # Body Echo Intelligence
//!
//! - **progress**: unclamped goal ratios plus presentation clamping helpers
//! - **level**: points to level mapping on a fixed points-per-level ladder
//! - **insights**: ordered, independently evaluable coaching rules
//!
//! Nothing here performs I/O, so nothing here retries.

/// Goal progress ratios
pub mod progress;

/// Level and points progression
pub mod level;

/// Rule-based coaching insights
pub mod insights;

pub use insights::{DailyInsights, InsightDraft, InsightEngine, InsightRule};
pub use level::{LevelChange, LevelEngine, LevelStatus};
pub use progress::{DailyProgress, ProgressCalculator, ProgressFacet};
