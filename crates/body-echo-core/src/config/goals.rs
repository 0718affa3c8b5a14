// ABOUTME: Daily goal thresholds used as progress denominators and rule inputs
// ABOUTME: Immutable per evaluation; validated so every goal is strictly positive
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

use crate::constants::goals::{
    DEFAULT_CALORIE_GOAL, DEFAULT_SLEEP_QUALITY_GOAL, DEFAULT_STEPS_GOAL,
    DEFAULT_WATER_GOAL_LITERS,
};
use crate::constants::metrics::MAX_SLEEP_QUALITY_PERCENT;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Daily goals a user's metrics are measured against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalThresholds {
    /// Daily step goal
    pub steps_goal: u32,
    /// Daily water intake goal in liters
    pub water_goal_liters: f64,
    /// Daily calorie goal (kcal)
    pub calorie_goal: u32,
    /// Sleep quality goal (percent, 1-100)
    pub sleep_quality_goal: u8,
}

impl Default for GoalThresholds {
    fn default() -> Self {
        Self {
            steps_goal: DEFAULT_STEPS_GOAL,
            water_goal_liters: DEFAULT_WATER_GOAL_LITERS,
            calorie_goal: DEFAULT_CALORIE_GOAL,
            sleep_quality_goal: DEFAULT_SLEEP_QUALITY_GOAL,
        }
    }
}

impl GoalThresholds {
    /// Check that every goal can serve as a progress denominator
    ///
    /// # Errors
    ///
    /// Returns `InvalidGoal` if any goal is zero, negative, non-finite, or if the
    /// sleep quality goal exceeds 100 percent
    pub fn validate(&self) -> AppResult<()> {
        if self.steps_goal == 0 {
            return Err(AppError::invalid_goal(0.0).with_resource_id("steps_goal"));
        }
        if !self.water_goal_liters.is_finite() || self.water_goal_liters <= 0.0 {
            return Err(
                AppError::invalid_goal(self.water_goal_liters).with_resource_id("water_goal_liters")
            );
        }
        if self.calorie_goal == 0 {
            return Err(AppError::invalid_goal(0.0).with_resource_id("calorie_goal"));
        }
        if self.sleep_quality_goal == 0 || self.sleep_quality_goal > MAX_SLEEP_QUALITY_PERCENT {
            return Err(AppError::invalid_goal(f64::from(self.sleep_quality_goal))
                .with_resource_id("sleep_quality_goal"));
        }
        Ok(())
    }
}
