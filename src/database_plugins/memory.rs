// ABOUTME: Process-local storage backend built on sharded concurrent maps
// ABOUTME: Uses DashMap entry locking for atomic create-or-merge upserts and increments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! In-memory database backend
//!
//! Nothing survives the process. Used for tests, demos, and `DATABASE_URL=memory`.
//! Each primitive holds a `DashMap` entry guard for the whole read-modify-write,
//! including the create-or-merge of a daily aggregate, so writers to the same key
//! are serialized while unrelated keys proceed in parallel.

use super::{DatabaseProvider, MetricUpsert};
use crate::errors::{AppError, AppResult};
use crate::models::{
    Activity, DailyMetric, MetricId, MetricUpdate, PseudonymousId, UnsavedDailyMetric,
    UserIdentity,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

type DayKey = (PseudonymousId, NaiveDate);

/// In-memory storage backend
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    users: Arc<DashMap<PseudonymousId, UserIdentity>>,
    metrics: Arc<DashMap<DayKey, DailyMetric>>,
    activities: Arc<DashMap<PseudonymousId, Vec<Activity>>>,
}

impl MemoryDatabase {
    /// Empty store
    #[must_use]
    pub fn new_empty() -> Self {
        Self::default()
    }

    fn user_not_found(id: &PseudonymousId) -> AppError {
        AppError::not_found("user identity").with_owner_key(id.short())
    }
}

#[async_trait]
impl DatabaseProvider for MemoryDatabase {
    async fn new(_database_url: &str) -> AppResult<Self> {
        Ok(Self::new_empty())
    }

    async fn migrate(&self) -> AppResult<()> {
        Ok(())
    }

    async fn create_user(&self, user: &UserIdentity) -> AppResult<()> {
        match self.users.entry(user.pseudonymous_id.clone()) {
            Entry::Occupied(_) => Err(AppError::already_exists("user identity")
                .with_owner_key(user.pseudonymous_id.short())),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }

    async fn get_user(&self, id: &PseudonymousId) -> AppResult<Option<UserIdentity>> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn increment_points(
        &self,
        id: &PseudonymousId,
        delta: u64,
        updated_at: DateTime<Utc>,
    ) -> AppResult<UserIdentity> {
        let mut entry = self
            .users
            .get_mut(id)
            .ok_or_else(|| Self::user_not_found(id))?;
        let user = entry.value_mut();
        user.points = user.points.saturating_add(delta);
        user.updated_at = updated_at;
        Ok(user.clone())
    }

    async fn update_level(
        &self,
        id: &PseudonymousId,
        level: u32,
        updated_at: DateTime<Utc>,
    ) -> AppResult<UserIdentity> {
        let mut entry = self
            .users
            .get_mut(id)
            .ok_or_else(|| Self::user_not_found(id))?;
        let user = entry.value_mut();
        user.level = user.level.max(level);
        user.updated_at = updated_at;
        Ok(user.clone())
    }

    async fn get_daily_metric(
        &self,
        owner: &PseudonymousId,
        date: NaiveDate,
    ) -> AppResult<Option<DailyMetric>> {
        Ok(self
            .metrics
            .get(&(owner.clone(), date))
            .map(|entry| entry.value().clone()))
    }

    async fn upsert_daily_metric(
        &self,
        metric: UnsavedDailyMetric,
        update: &MetricUpdate,
    ) -> AppResult<MetricUpsert> {
        match self.metrics.entry((metric.owner_key.clone(), metric.date)) {
            Entry::Occupied(mut existing) => {
                let stored = existing.get_mut();
                if !update.is_empty() {
                    stored.merge(update, metric.date, metric.updated_at)?;
                }
                Ok(MetricUpsert {
                    metric: stored.clone(),
                    created: false,
                })
            }
            Entry::Vacant(slot) => {
                let saved = metric.into_saved(MetricId::new());
                debug!(metric_id = %saved.id, date = %saved.date, "Created daily metric");
                slot.insert(saved.clone());
                Ok(MetricUpsert {
                    metric: saved,
                    created: true,
                })
            }
        }
    }

    async fn list_daily_metrics(
        &self,
        owner: &PseudonymousId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DailyMetric>> {
        let mut metrics: Vec<DailyMetric> = self
            .metrics
            .iter()
            .filter(|entry| {
                let (key_owner, date) = entry.key();
                key_owner == owner && (from..=to).contains(date)
            })
            .map(|entry| entry.value().clone())
            .collect();
        metrics.sort_by_key(|metric| metric.date);
        Ok(metrics)
    }

    async fn create_activity(&self, activity: &Activity) -> AppResult<()> {
        self.activities
            .entry(activity.owner_key.clone())
            .or_default()
            .push(activity.clone());
        Ok(())
    }

    async fn list_activities(
        &self,
        owner: &PseudonymousId,
        limit: u32,
    ) -> AppResult<Vec<Activity>> {
        let Some(entry) = self.activities.get(owner) else {
            return Ok(Vec::new());
        };
        let mut activities = entry.value().clone();
        drop(entry);

        activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        activities.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(activities)
    }

    async fn list_activities_in_range(
        &self,
        owner: &PseudonymousId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Activity>> {
        let Some(entry) = self.activities.get(owner) else {
            return Ok(Vec::new());
        };
        let mut activities: Vec<Activity> = entry
            .value()
            .iter()
            .filter(|activity| (from..=to).contains(&activity.date))
            .cloned()
            .collect();
        drop(entry);

        activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(activities)
    }
}
