// ABOUTME: Activity logging with per-type calorie estimates and duration-based point awards
// ABOUTME: Awards points through progression, then stores the activity on today's local date
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::calendar::{Clock, LocalCalendar};
use crate::database_plugins::{factory::Database, DatabaseProvider};
use crate::errors::{AppError, AppResult};
use crate::models::{Activity, NewActivity, PseudonymousId};
use crate::services::progression::{PointsAward, ProgressionService};

/// A stored activity together with the points it earned
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedActivity {
    /// Stored activity
    pub activity: Activity,
    /// Resulting award
    pub award: PointsAward,
}

/// Activity logging
///
/// Logged activities do not write into the daily aggregate: calories on the
/// aggregate stay whatever the user entered for the day.
#[derive(Clone)]
pub struct ActivityService {
    database: Arc<Database>,
    progression: ProgressionService,
    clock: Arc<dyn Clock>,
    calendar: LocalCalendar,
    points_per_active_minute: u32,
}

impl ActivityService {
    /// Create an activity service
    #[must_use]
    pub fn new(
        database: Arc<Database>,
        progression: ProgressionService,
        clock: Arc<dyn Clock>,
        calendar: LocalCalendar,
        points_per_active_minute: u32,
    ) -> Self {
        Self {
            database,
            progression,
            clock,
            calendar,
            points_per_active_minute,
        }
    }

    /// Points an activity of `duration_minutes` earns
    #[must_use]
    pub fn points_for(&self, duration_minutes: u32) -> i64 {
        i64::from(duration_minutes) * i64::from(self.points_per_active_minute)
    }

    /// Validate, reward, and store an activity
    ///
    /// Calories are estimated from the activity type when not supplied. The award
    /// runs first and doubles as the existence check for the owner, so an unknown
    /// owner stores nothing. The two writes are not one transaction: if storing
    /// the activity fails after the award, the points stay granted and the store
    /// error is returned.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a zero duration or invalid distance,
    /// `ResourceNotFound` if the owner has no profile, or the store's error
    pub async fn log_activity(
        &self,
        owner: &PseudonymousId,
        input: &NewActivity,
    ) -> AppResult<LoggedActivity> {
        input.validate()?;
        let points = self.points_for(input.duration_minutes);
        if points <= 0 {
            return Err(AppError::config(
                "points per active minute must be positive to log activities",
            ));
        }

        let award = self.progression.award(owner, points).await?;

        let day = self.calendar.today(self.clock.as_ref());
        let activity = Activity::from_new(owner.clone(), input, day.date, day.now);
        self.database.create_activity(&activity).await?;
        info!(
            user.key = %owner.short(),
            activity.kind = %activity.activity_type,
            activity.minutes = activity.duration_minutes,
            activity.kcal = activity.calories_burned,
            "Activity logged"
        );

        Ok(LoggedActivity { activity, award })
    }

    /// Most recent activities first
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged
    pub async fn recent_activities(
        &self,
        owner: &PseudonymousId,
        limit: u32,
    ) -> AppResult<Vec<Activity>> {
        self.database.list_activities(owner, limit).await
    }

    /// Activities logged on local days `from..=to`, most recent first
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `from` is after `to`, or the store's error
    pub async fn activities_between(
        &self,
        owner: &PseudonymousId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Activity>> {
        if from > to {
            return Err(AppError::invalid_input(format!(
                "activity window start {from} is after its end {to}"
            )));
        }
        self.database.list_activities_in_range(owner, from, to).await
    }
}
