// ABOUTME: Logged activity models with per-type calorie estimation
// ABOUTME: ActivityType, NewActivity input, and persisted Activity records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

use super::PseudonymousId;
use crate::constants::activity_energy::{
    CYCLING_KCAL_PER_MINUTE, RUNNING_KCAL_PER_MINUTE, WALKING_KCAL_PER_MINUTE,
};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Store-assigned key of a logged activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(pub Uuid);

impl ActivityId {
    /// Create a new random `ActivityId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActivityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActivityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Kinds of activity a user can log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    /// Walking
    Walking,
    /// Running
    Running,
    /// Cycling
    Cycling,
}

impl ActivityType {
    /// Stable storage / wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    /// Human readable label
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Walking => "Walk",
            Self::Running => "Run",
            Self::Cycling => "Ride",
        }
    }

    /// Estimated energy expenditure per minute (kcal)
    #[must_use]
    pub const fn calories_per_minute(&self) -> f64 {
        match self {
            Self::Walking => WALKING_KCAL_PER_MINUTE,
            Self::Running => RUNNING_KCAL_PER_MINUTE,
            Self::Cycling => CYCLING_KCAL_PER_MINUTE,
        }
    }

    /// Estimated calories for `duration_minutes`, rounded down
    #[must_use]
    pub fn estimate_calories(&self, duration_minutes: u32) -> u32 {
        (self.calories_per_minute() * f64::from(duration_minutes)).floor() as u32
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walking" | "walk" => Ok(Self::Walking),
            "running" | "run" => Ok(Self::Running),
            "cycling" | "ride" => Ok(Self::Cycling),
            other => Err(AppError::invalid_input(format!(
                "unknown activity type '{other}'"
            ))),
        }
    }
}

/// Activity as entered by the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
    /// Kind of activity
    pub activity_type: ActivityType,
    /// Duration in minutes
    pub duration_minutes: u32,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Calories if the user knows them; estimated otherwise
    #[serde(default)]
    pub calories_burned: Option<u32>,
}

impl NewActivity {
    /// Check duration and distance
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if duration is zero or distance is negative or non-finite
    pub fn validate(&self) -> AppResult<()> {
        if self.duration_minutes == 0 {
            return Err(AppError::invalid_input(
                "activity duration must be at least one minute",
            ));
        }
        if !self.distance_km.is_finite() || self.distance_km < 0.0 {
            return Err(AppError::invalid_input(format!(
                "activity distance must be a non-negative number of kilometers, got {}",
                self.distance_km
            )));
        }
        Ok(())
    }

    /// Calories to record: the supplied value, or the per-type estimate
    #[must_use]
    pub fn resolved_calories(&self) -> u32 {
        self.calories_burned.unwrap_or_else(|| {
            self.activity_type
                .estimate_calories(self.duration_minutes)
        })
    }
}

/// A persisted activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Store-assigned key
    pub id: ActivityId,
    /// Owner's pseudonymous key
    pub owner_key: PseudonymousId,
    /// Kind of activity
    pub activity_type: ActivityType,
    /// Duration in minutes
    pub duration_minutes: u32,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Calories burned (supplied or estimated)
    pub calories_burned: u32,
    /// Local calendar day the activity belongs to
    pub date: NaiveDate,
    /// Logging time
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Build a record from user input
    #[must_use]
    pub fn from_new(
        owner_key: PseudonymousId,
        input: &NewActivity,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            owner_key,
            activity_type: input.activity_type,
            duration_minutes: input.duration_minutes,
            distance_km: input.distance_km,
            calories_burned: input.resolved_calories(),
            date,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calorie_estimates_per_type() {
        assert_eq!(ActivityType::Walking.estimate_calories(30), 120);
        assert_eq!(ActivityType::Running.estimate_calories(30), 300);
        assert_eq!(ActivityType::Cycling.estimate_calories(45), 360);
    }

    #[test]
    fn test_supplied_calories_win() {
        let input = NewActivity {
            activity_type: ActivityType::Running,
            duration_minutes: 30,
            distance_km: 5.0,
            calories_burned: Some(280),
        };
        assert_eq!(input.resolved_calories(), 280);
    }

    #[test]
    fn test_parse_activity_type() {
        assert_eq!("Running".parse::<ActivityType>().unwrap(), ActivityType::Running);
        assert_eq!("ride".parse::<ActivityType>().unwrap(), ActivityType::Cycling);
        assert!("swimming".parse::<ActivityType>().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let input = NewActivity {
            activity_type: ActivityType::Walking,
            duration_minutes: 0,
            distance_km: 1.0,
            calories_burned: None,
        };
        assert!(input.validate().is_err());
    }
}
