// ABOUTME: Daily metric aggregate service: one record per user per local calendar day
// ABOUTME: Partial-field upserts, history windows, and progress plus insight summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Daily metric aggregates
//!
//! An upsert resolves "today" through the injected clock and calendar and hands the
//! store an [`UnsavedDailyMetric`] seeded from the update (unspecified fields at
//! zero) together with the update itself. The store inserts the seed when the day
//! has no aggregate and otherwise merges only the present fields, in one atomic
//! step. Two writers touching a brand-new day therefore both land: whichever
//! arrives second merges into the row the first created.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::calendar::{CalendarDay, Clock, LocalCalendar};
use crate::config::GoalThresholds;
use crate::database_plugins::{factory::Database, DatabaseProvider, MetricUpsert};
use crate::errors::{AppError, AppResult};
use crate::intelligence::{DailyInsights, DailyProgress, InsightEngine, ProgressCalculator};
use crate::logging::AppLogger;
use crate::models::{
    DailyMetric, InsightEvent, MetricUpdate, MetricValues, PseudonymousId, UnsavedDailyMetric,
};

/// A day's values with derived progress and coaching insights
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    /// Local calendar day
    pub date: NaiveDate,
    /// Stored values, or zeros when nothing was logged yet
    pub values: MetricValues,
    /// Unclamped goal ratios
    pub progress: DailyProgress,
    /// Insights in rule order
    pub insights: Vec<InsightEvent>,
    /// Evaluation time
    pub generated_at: DateTime<Utc>,
}

/// Per-day metric aggregate operations
#[derive(Clone)]
pub struct DailyMetricService {
    database: Arc<Database>,
    clock: Arc<dyn Clock>,
    calendar: LocalCalendar,
    goals: GoalThresholds,
    insights: Arc<InsightEngine>,
}

impl DailyMetricService {
    /// Create a daily metric service
    #[must_use]
    pub fn new(
        database: Arc<Database>,
        clock: Arc<dyn Clock>,
        calendar: LocalCalendar,
        goals: GoalThresholds,
        insights: Arc<InsightEngine>,
    ) -> Self {
        Self {
            database,
            clock,
            calendar,
            goals,
            insights,
        }
    }

    /// Goals this service evaluates against
    #[must_use]
    pub const fn goals(&self) -> &GoalThresholds {
        &self.goals
    }

    /// Today in the configured calendar
    #[must_use]
    pub fn today(&self) -> CalendarDay {
        self.calendar.today(self.clock.as_ref())
    }

    /// Merge `update` into today's aggregate, creating it if absent
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty or out-of-range update, or the store's
    /// error unchanged
    pub async fn upsert_today(
        &self,
        owner: &PseudonymousId,
        update: &MetricUpdate,
    ) -> AppResult<DailyMetric> {
        self.upsert_for_day(owner, update, self.today()).await
    }

    /// Merge `update` into the aggregate for an explicit calendar day
    ///
    /// `day.now` stamps `created_at`/`updated_at`; `day.date` selects the aggregate.
    ///
    /// # Errors
    ///
    /// Same as [`Self::upsert_today`]
    pub async fn upsert_for_day(
        &self,
        owner: &PseudonymousId,
        update: &MetricUpdate,
        day: CalendarDay,
    ) -> AppResult<DailyMetric> {
        update.validate()?;

        debug!(date = %day.date, fields = ?update.fields(), "Upserting daily metric");
        let seed = UnsavedDailyMetric::from_update(owner.clone(), day.date, update, day.now);
        let MetricUpsert { metric, created } =
            self.database.upsert_daily_metric(seed, update).await?;

        AppLogger::log_metric_upsert(owner, metric.date, created);
        Ok(metric)
    }

    /// Today's aggregate, if anything was logged
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged
    pub async fn today_metric(&self, owner: &PseudonymousId) -> AppResult<Option<DailyMetric>> {
        self.database
            .get_daily_metric(owner, self.today().date)
            .await
    }

    /// Today's aggregate, creating an all-zero one if absent
    ///
    /// An existing aggregate is returned untouched, including one a concurrent
    /// writer created a moment earlier.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged
    pub async fn ensure_today(&self, owner: &PseudonymousId) -> AppResult<DailyMetric> {
        let day = self.today();
        let seed = UnsavedDailyMetric::new(owner.clone(), day.date, day.now);
        let MetricUpsert { metric, created } = self
            .database
            .upsert_daily_metric(seed, &MetricUpdate::new())
            .await?;
        if created {
            AppLogger::log_metric_upsert(owner, metric.date, true);
        }
        Ok(metric)
    }

    /// Aggregates with `from <= date <= to`, oldest first
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `from` is after `to`
    pub async fn history(
        &self,
        owner: &PseudonymousId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DailyMetric>> {
        if from > to {
            return Err(AppError::invalid_input(format!(
                "history window start {from} is after its end {to}"
            )));
        }
        self.database.list_daily_metrics(owner, from, to).await
    }

    /// Progress and insights for today
    ///
    /// Reads only; a day with nothing logged is evaluated as all zeros.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGoal` if the configured goals are invalid, or the store's
    /// error unchanged
    pub async fn today_summary(&self, owner: &PseudonymousId) -> AppResult<DailySummary> {
        let day = self.today();
        let values = self
            .database
            .get_daily_metric(owner, day.date)
            .await?
            .map(|metric| metric.values)
            .unwrap_or_default();
        self.summarize(day.date, &values, day.now)
    }

    /// Progress and insights for arbitrary values
    ///
    /// # Errors
    ///
    /// Returns `InvalidGoal` if the configured goals are invalid
    pub fn summarize(
        &self,
        date: NaiveDate,
        values: &MetricValues,
        generated_at: DateTime<Utc>,
    ) -> AppResult<DailySummary> {
        Ok(DailySummary {
            date,
            values: *values,
            progress: ProgressCalculator::daily_progress(values, &self.goals)?,
            insights: self.insights.generate_insights(values, &self.goals, generated_at),
            generated_at,
        })
    }

    /// Insights for every stored day in a window, oldest first
    ///
    /// # Errors
    ///
    /// Same as [`Self::history`]
    pub async fn history_insights(
        &self,
        owner: &PseudonymousId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DailyInsights>> {
        let metrics = self.history(owner, from, to).await?;
        Ok(self
            .insights
            .evaluate_history(&metrics, &self.goals, self.clock.now()))
    }
}
