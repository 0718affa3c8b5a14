// ABOUTME: Per-user per-day metric aggregate and its field-level merge policy
// ABOUTME: Two-stage UnsavedDailyMetric / DailyMetric types plus the partial MetricUpdate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

use super::PseudonymousId;
use crate::constants::metrics::MAX_SLEEP_QUALITY_PERCENT;
use crate::errors::{AppError, AppResult};
use bitflags::bitflags;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Store-assigned key of a persisted daily metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricId(pub Uuid);

impl MetricId {
    /// Create a new random `MetricId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MetricId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MetricId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

bitflags! {
    /// Which metric fields a partial update carries
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MetricFields: u8 {
        /// Step count
        const STEPS = 0b0001;
        /// Water intake
        const WATER = 0b0010;
        /// Calorie estimate
        const CALORIES = 0b0100;
        /// Sleep quality
        const SLEEP_QUALITY = 0b1000;
    }
}

/// The four tracked values of a day
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricValues {
    /// Step count
    pub steps: u32,
    /// Water intake in liters
    pub water_liters: f64,
    /// Calorie estimate (kcal)
    pub calories: u32,
    /// Sleep quality percent (0-100)
    pub sleep_quality: u8,
}

/// Partial metric write; absent fields keep their stored value
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricUpdate {
    /// New step count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    /// New water intake in liters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_liters: Option<f64>,
    /// New calorie estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    /// New sleep quality percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<u8>,
}

impl MetricUpdate {
    /// Empty update
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the step count
    #[must_use]
    pub fn steps(mut self, steps: u32) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Set the water intake
    #[must_use]
    pub fn water_liters(mut self, liters: f64) -> Self {
        self.water_liters = Some(liters);
        self
    }

    /// Set the calorie estimate
    #[must_use]
    pub fn calories(mut self, calories: u32) -> Self {
        self.calories = Some(calories);
        self
    }

    /// Set the sleep quality percent
    #[must_use]
    pub fn sleep_quality(mut self, percent: u8) -> Self {
        self.sleep_quality = Some(percent);
        self
    }

    /// Fields present in this update
    #[must_use]
    pub fn fields(&self) -> MetricFields {
        let mut fields = MetricFields::empty();
        fields.set(MetricFields::STEPS, self.steps.is_some());
        fields.set(MetricFields::WATER, self.water_liters.is_some());
        fields.set(MetricFields::CALORIES, self.calories.is_some());
        fields.set(MetricFields::SLEEP_QUALITY, self.sleep_quality.is_some());
        fields
    }

    /// True when no field is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the update carries no fields, water is negative or
    /// non-finite, or sleep quality exceeds 100
    pub fn validate(&self) -> AppResult<()> {
        if self.is_empty() {
            return Err(AppError::invalid_input(
                "metric update must contain at least one field",
            ));
        }
        if let Some(water) = self.water_liters {
            if !water.is_finite() || water < 0.0 {
                return Err(AppError::invalid_input(format!(
                    "water intake must be a non-negative number of liters, got {water}"
                )));
            }
        }
        if let Some(sleep) = self.sleep_quality {
            if sleep > MAX_SLEEP_QUALITY_PERCENT {
                return Err(AppError::invalid_input(format!(
                    "sleep quality must be between 0 and {MAX_SLEEP_QUALITY_PERCENT}, got {sleep}"
                )));
            }
        }
        Ok(())
    }

    /// Overwrite the present fields of `values`
    pub fn apply_to(&self, values: &mut MetricValues) {
        if let Some(steps) = self.steps {
            values.steps = steps;
        }
        if let Some(water) = self.water_liters {
            values.water_liters = water;
        }
        if let Some(calories) = self.calories {
            values.calories = calories;
        }
        if let Some(sleep) = self.sleep_quality {
            values.sleep_quality = sleep;
        }
    }
}

/// A day's aggregate that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsavedDailyMetric {
    /// Owner's pseudonymous key
    pub owner_key: PseudonymousId,
    /// Local calendar day
    pub date: NaiveDate,
    /// Tracked values
    pub values: MetricValues,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl UnsavedDailyMetric {
    /// All-zero aggregate for `date`
    #[must_use]
    pub fn new(owner_key: PseudonymousId, date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            owner_key,
            date,
            values: MetricValues::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Aggregate for `date` seeded from a partial update; missing fields are zero
    #[must_use]
    pub fn from_update(
        owner_key: PseudonymousId,
        date: NaiveDate,
        update: &MetricUpdate,
        now: DateTime<Utc>,
    ) -> Self {
        let mut metric = Self::new(owner_key, date, now);
        update.apply_to(&mut metric.values);
        metric
    }

    /// Attach the store-assigned key
    #[must_use]
    pub fn into_saved(self, id: MetricId) -> DailyMetric {
        DailyMetric {
            id,
            owner_key: self.owner_key,
            date: self.date,
            values: self.values,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A persisted day's aggregate; at most one exists per (owner, date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetric {
    /// Store-assigned key
    pub id: MetricId,
    /// Owner's pseudonymous key
    pub owner_key: PseudonymousId,
    /// Local calendar day
    pub date: NaiveDate,
    /// Tracked values
    pub values: MetricValues,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl DailyMetric {
    /// Field-level merge of `update` into this aggregate
    ///
    /// `day` is the calendar day the caller resolved; merging into another day's
    /// aggregate is refused so writes never leak across a midnight boundary.
    ///
    /// # Errors
    ///
    /// Returns `MergeConflict` if `day` differs from this aggregate's date
    pub fn merge(
        &mut self,
        update: &MetricUpdate,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if day != self.date {
            return Err(AppError::merge_conflict(format!(
                "update for {day} cannot be merged into the aggregate for {}",
                self.date
            ))
            .with_resource_id(self.id.to_string()));
        }
        update.apply_to(&mut self.values);
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use chrono::TimeZone;

    fn owner() -> PseudonymousId {
        PseudonymousId::parse("a".repeat(64)).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    #[test]
    fn test_update_fields_reflect_present_values() {
        let update = MetricUpdate::new().steps(100).sleep_quality(60);
        assert_eq!(
            update.fields(),
            MetricFields::STEPS | MetricFields::SLEEP_QUALITY
        );
        assert!(MetricUpdate::new().is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            MetricUpdate::new().validate().unwrap_err().code,
            ErrorCode::InvalidInput
        );
        assert!(MetricUpdate::new().water_liters(-0.5).validate().is_err());
        assert!(MetricUpdate::new()
            .water_liters(f64::INFINITY)
            .validate()
            .is_err());
        assert!(MetricUpdate::new().sleep_quality(101).validate().is_err());
        assert!(MetricUpdate::new().sleep_quality(100).validate().is_ok());
    }

    #[test]
    fn test_from_update_defaults_missing_fields_to_zero() {
        let now = Utc.with_ymd_and_hms(2025, 11, 10, 8, 0, 0).unwrap();
        let metric =
            UnsavedDailyMetric::from_update(owner(), day(10), &MetricUpdate::new().steps(42), now);
        assert_eq!(metric.values.steps, 42);
        assert_eq!(metric.values.calories, 0);
        assert_eq!(metric.values.sleep_quality, 0);
        assert_eq!(metric.created_at, metric.updated_at);
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let created = Utc.with_ymd_and_hms(2025, 11, 10, 8, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 11, 10, 9, 0, 0).unwrap();
        let mut metric =
            UnsavedDailyMetric::from_update(owner(), day(10), &MetricUpdate::new().steps(100), created)
                .into_saved(MetricId::new());

        metric
            .merge(&MetricUpdate::new().water_liters(1.5), day(10), later)
            .unwrap();

        assert_eq!(metric.values.steps, 100);
        assert!((metric.values.water_liters - 1.5).abs() < f64::EPSILON);
        assert_eq!(metric.created_at, created);
        assert_eq!(metric.updated_at, later);
    }

    #[test]
    fn test_merge_refuses_other_day() {
        let now = Utc::now();
        let mut metric = UnsavedDailyMetric::new(owner(), day(10), now).into_saved(MetricId::new());
        let err = metric
            .merge(&MetricUpdate::new().steps(1), day(11), now)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MergeConflict);
        assert_eq!(metric.values.steps, 0);
    }
}
