// ABOUTME: Storage abstraction for identities, daily metric aggregates, and activities
// ABOUTME: Plugin architecture with in-memory and SQLite backends behind one async trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! # Database Plugins
//!
//! Every backend provides two atomic primitives the services rely on:
//!
//! - **upsert** of a daily aggregate creates the single row for (owner, date) or
//!   merges only the fields present in a [`MetricUpdate`] into it, in one step, so
//!   concurrent partial updates never lose each other, even on a day with no
//!   aggregate yet;
//! - **increment** adds to a user's points without a read-modify-write.

use crate::errors::AppResult;
use crate::models::{
    Activity, DailyMetric, MetricUpdate, PseudonymousId, UnsavedDailyMetric, UserIdentity,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

pub mod factory;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Outcome of [`DatabaseProvider::upsert_daily_metric`]
#[derive(Debug, Clone, PartialEq)]
pub struct MetricUpsert {
    /// The aggregate as stored after the write
    pub metric: DailyMetric,
    /// Whether this call inserted the aggregate
    pub created: bool,
}

/// Core storage abstraction
///
/// All backends implement this trait so services stay storage-agnostic.
#[async_trait]
pub trait DatabaseProvider: Send + Sync + Clone {
    /// Open a connection for `database_url`
    async fn new(database_url: &str) -> AppResult<Self>
    where
        Self: Sized;

    /// Create tables and indexes if they do not exist
    async fn migrate(&self) -> AppResult<()>;

    // ================================
    // Identities
    // ================================

    /// Persist a newly registered identity
    ///
    /// Fails with `ResourceAlreadyExists` if the pseudonymous id is taken.
    async fn create_user(&self, user: &UserIdentity) -> AppResult<()>;

    /// Look up an identity by pseudonymous id
    async fn get_user(&self, id: &PseudonymousId) -> AppResult<Option<UserIdentity>>;

    /// Atomically add `delta` points and return the updated identity
    ///
    /// Fails with `ResourceNotFound` if the identity does not exist.
    async fn increment_points(
        &self,
        id: &PseudonymousId,
        delta: u64,
        updated_at: DateTime<Utc>,
    ) -> AppResult<UserIdentity>;

    /// Raise the stored level to `level` and return the updated identity
    ///
    /// A lower `level` than the stored one leaves it unchanged, so a slow award
    /// cannot undo the level written by a later one.
    async fn update_level(
        &self,
        id: &PseudonymousId,
        level: u32,
        updated_at: DateTime<Utc>,
    ) -> AppResult<UserIdentity>;

    // ================================
    // Daily metric aggregates
    // ================================

    /// Read the aggregate for (owner, date)
    async fn get_daily_metric(
        &self,
        owner: &PseudonymousId,
        date: NaiveDate,
    ) -> AppResult<Option<DailyMetric>>;

    /// Create the aggregate for (`metric.owner_key`, `metric.date`) or merge
    /// `update` into the existing one, atomically
    ///
    /// When no aggregate exists `metric` is inserted as given and assigned a key.
    /// Otherwise only the fields present in `update` are written and `updated_at`
    /// becomes `metric.updated_at`; an empty `update` leaves the row untouched.
    async fn upsert_daily_metric(
        &self,
        metric: UnsavedDailyMetric,
        update: &MetricUpdate,
    ) -> AppResult<MetricUpsert>;

    /// Aggregates with `from <= date <= to`, ordered by date ascending
    async fn list_daily_metrics(
        &self,
        owner: &PseudonymousId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DailyMetric>>;

    // ================================
    // Activities
    // ================================

    /// Persist a logged activity
    async fn create_activity(&self, activity: &Activity) -> AppResult<()>;

    /// Most recent activities first, at most `limit`
    async fn list_activities(&self, owner: &PseudonymousId, limit: u32)
        -> AppResult<Vec<Activity>>;

    /// Activities with `from <= date <= to`, most recent first
    async fn list_activities_in_range(
        &self,
        owner: &PseudonymousId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Activity>>;
}
