// ABOUTME: Level engine mapping cumulative points to levels on a fixed ladder
// ABOUTME: Level is floor(points / 500) + 1; points-to-next is always in [1, 500]
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

use body_echo_core::constants::level::POINTS_PER_LEVEL;
use serde::{Deserialize, Serialize};

/// Stateless level calculator
pub struct LevelEngine;

impl LevelEngine {
    /// Level reached with `points`; 1 at zero points
    #[must_use]
    pub fn level_for_points(points: u64) -> u32 {
        u32::try_from(points / POINTS_PER_LEVEL + 1).unwrap_or(u32::MAX)
    }

    /// Points still needed to reach the next level
    ///
    /// At an exact boundary the next level's full requirement applies, so the result
    /// is never zero: 500 points is level 2 with 500 to go.
    #[must_use]
    pub const fn points_to_next_level(points: u64) -> u64 {
        POINTS_PER_LEVEL - points % POINTS_PER_LEVEL
    }

    /// Points earned since the current level was reached
    #[must_use]
    pub const fn points_into_level(points: u64) -> u64 {
        points % POINTS_PER_LEVEL
    }

    /// Snapshot for display
    #[must_use]
    pub fn status(points: u64) -> LevelStatus {
        LevelStatus {
            level: Self::level_for_points(points),
            points,
            points_into_level: Self::points_into_level(points),
            points_to_next_level: Self::points_to_next_level(points),
        }
    }

    /// Level transition caused by moving from `before` to `after` points, if any
    #[must_use]
    pub fn level_change(before: u64, after: u64) -> Option<LevelChange> {
        let from = Self::level_for_points(before);
        let to = Self::level_for_points(after);
        (from != to).then_some(LevelChange { from, to })
    }
}

/// Level snapshot for a points total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelStatus {
    /// Current level
    pub level: u32,
    /// Cumulative points
    pub points: u64,
    /// Points earned within the current level
    pub points_into_level: u64,
    /// Points needed for the next level
    pub points_to_next_level: u64,
}

/// A level transition, reported to callers for celebratory UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChange {
    /// Level before the award
    pub from: u32,
    /// Level after the award
    pub to: u32,
}

impl LevelChange {
    /// Number of levels gained
    #[must_use]
    pub const fn levels_gained(&self) -> u32 {
        self.to.saturating_sub(self.from)
    }
}
