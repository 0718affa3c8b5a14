// ABOUTME: Goal progress ratios for steps, water, calories, and sleep quality
// ABOUTME: Ratios stay unclamped so rules can see exceeded goals; clamping is for display
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Progress calculation
//!
//! `compute_progress(8500, 10000)` is `0.85` and `compute_progress(12000, 10000)` is
//! `1.2`. Consumers that draw a bounded ring or bar call [`ProgressCalculator::clamp_ratio`]
//! themselves.

use body_echo_core::config::GoalThresholds;
use body_echo_core::errors::{AppError, AppResult};
use body_echo_core::models::MetricValues;
use serde::{Deserialize, Serialize};

/// The four independently tracked progress facets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressFacet {
    /// Step count against the step goal
    Steps,
    /// Water intake against the water goal
    Water,
    /// Calorie estimate against the calorie goal
    Calories,
    /// Sleep quality against the sleep quality goal
    SleepQuality,
}

impl ProgressFacet {
    /// Every facet, in display order
    pub const ALL: [Self; 4] = [Self::Steps, Self::Water, Self::Calories, Self::SleepQuality];
}

/// Stateless progress calculator
pub struct ProgressCalculator;

impl ProgressCalculator {
    /// Ratio of `current` to `goal`, unclamped
    ///
    /// # Errors
    ///
    /// Returns `InvalidGoal` if `goal` is not a positive finite number
    pub fn compute_progress(current: f64, goal: f64) -> AppResult<f64> {
        if !goal.is_finite() || goal <= 0.0 {
            return Err(AppError::invalid_goal(goal));
        }
        Ok(current / goal)
    }

    /// Clamp a ratio into `[0, 1]` for bounded visuals; NaN maps to 0
    #[must_use]
    pub fn clamp_ratio(ratio: f64) -> f64 {
        if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        }
    }

    /// Clamped ratio as a whole percentage (0-100)
    #[must_use]
    pub fn as_percent(ratio: f64) -> u8 {
        (Self::clamp_ratio(ratio) * 100.0).round() as u8
    }

    /// Compute all four facets for a day
    ///
    /// # Errors
    ///
    /// Returns `InvalidGoal` if any goal is not strictly positive
    pub fn daily_progress(
        values: &MetricValues,
        goals: &GoalThresholds,
    ) -> AppResult<DailyProgress> {
        Ok(DailyProgress {
            steps: Self::compute_progress(f64::from(values.steps), f64::from(goals.steps_goal))?,
            water: Self::compute_progress(values.water_liters, goals.water_goal_liters)?,
            calories: Self::compute_progress(
                f64::from(values.calories),
                f64::from(goals.calorie_goal),
            )?,
            sleep_quality: Self::compute_progress(
                f64::from(values.sleep_quality),
                f64::from(goals.sleep_quality_goal),
            )?,
        })
    }
}

/// Unclamped progress ratios for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    /// Steps ratio
    pub steps: f64,
    /// Water ratio
    pub water: f64,
    /// Calories ratio
    pub calories: f64,
    /// Sleep quality ratio
    pub sleep_quality: f64,
}

impl DailyProgress {
    /// Raw ratio for a facet
    #[must_use]
    pub const fn ratio(&self, facet: ProgressFacet) -> f64 {
        match facet {
            ProgressFacet::Steps => self.steps,
            ProgressFacet::Water => self.water,
            ProgressFacet::Calories => self.calories,
            ProgressFacet::SleepQuality => self.sleep_quality,
        }
    }

    /// Clamped display percentage for a facet
    #[must_use]
    pub fn percent(&self, facet: ProgressFacet) -> u8 {
        ProgressCalculator::as_percent(self.ratio(facet))
    }

    /// Whether a facet is strictly past its goal
    #[must_use]
    pub fn exceeded(&self, facet: ProgressFacet) -> bool {
        self.ratio(facet) > 1.0
    }

    /// Facets paired with their raw ratios, in display order
    pub fn facets(&self) -> impl Iterator<Item = (ProgressFacet, f64)> + '_ {
        ProgressFacet::ALL
            .into_iter()
            .map(move |facet| (facet, self.ratio(facet)))
    }
}
