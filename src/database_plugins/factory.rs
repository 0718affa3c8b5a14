// ABOUTME: Database factory selecting a storage backend from the configured URL
// ABOUTME: Enum wrapper that delegates every DatabaseProvider call to the chosen backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Database factory for creating database providers
//!
//! `memory` selects the process-local map store; `sqlite:` URLs (including
//! `sqlite::memory:`) select the `SQLite` backend.

use super::memory::MemoryDatabase;
#[cfg(feature = "sqlite")]
use super::sqlite::SqliteDatabase;
use super::{DatabaseProvider, MetricUpsert};
use crate::config::environment::DatabaseUrl;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Activity, DailyMetric, MetricUpdate, PseudonymousId, UnsavedDailyMetric, UserIdentity,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// Process-local maps
    Memory,
    /// `SQLite` file or in-memory database
    SQLite,
}

/// Database instance wrapper that delegates to the appropriate implementation
#[derive(Debug, Clone)]
pub enum Database {
    /// In-memory backend
    Memory(MemoryDatabase),
    /// `SQLite` backend
    #[cfg(feature = "sqlite")]
    SQLite(SqliteDatabase),
}

impl Database {
    /// Get a descriptive string for the current database backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Memory(_) => "In-memory (no persistence)",
            #[cfg(feature = "sqlite")]
            Self::SQLite(_) => "SQLite",
        }
    }

    /// Get the database type enum
    #[must_use]
    pub const fn database_type(&self) -> DatabaseType {
        match self {
            Self::Memory(_) => DatabaseType::Memory,
            #[cfg(feature = "sqlite")]
            Self::SQLite(_) => DatabaseType::SQLite,
        }
    }

    /// Open the backend for a parsed URL and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the file's directory cannot be created, or if the
    /// connection or migration fails
    pub async fn from_url(url: &DatabaseUrl) -> AppResult<Self> {
        if let DatabaseUrl::SQLite { path } = url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::config(format!(
                        "Cannot create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        let database = <Self as DatabaseProvider>::new(&url.to_connection_string()).await?;
        database.migrate().await?;
        Ok(database)
    }
}

/// Detect database type from a connection string
///
/// # Errors
///
/// Returns `ConfigInvalid` if the URL selects neither backend, or selects `SQLite`
/// while the `sqlite` feature is disabled
pub fn detect_database_type(database_url: &str) -> AppResult<DatabaseType> {
    if database_url == crate::constants::defaults::MEMORY_DATABASE_URL {
        Ok(DatabaseType::Memory)
    } else if database_url.starts_with("sqlite:") {
        if cfg!(feature = "sqlite") {
            Ok(DatabaseType::SQLite)
        } else {
            Err(AppError::config(
                "SQLite URL given but the 'sqlite' feature is disabled",
            ))
        }
    } else {
        Err(AppError::config(format!(
            "Unsupported database URL format: {database_url}. \
             Supported formats: memory, sqlite:path/to/db.sqlite, sqlite::memory:"
        )))
    }
}

#[async_trait]
impl DatabaseProvider for Database {
    async fn new(database_url: &str) -> AppResult<Self> {
        debug!("Detecting database type from URL");
        let db_type = detect_database_type(database_url)?;
        info!("Detected database type: {:?}", db_type);

        match db_type {
            DatabaseType::Memory => Ok(Self::Memory(MemoryDatabase::new(database_url).await?)),
            #[cfg(feature = "sqlite")]
            DatabaseType::SQLite => Ok(Self::SQLite(SqliteDatabase::new(database_url).await?)),
            #[cfg(not(feature = "sqlite"))]
            DatabaseType::SQLite => Err(AppError::config("SQLite support not enabled")),
        }
    }

    async fn migrate(&self) -> AppResult<()> {
        match self {
            Self::Memory(db) => db.migrate().await,
            #[cfg(feature = "sqlite")]
            Self::SQLite(db) => db.migrate().await,
        }
    }

    async fn create_user(&self, user: &UserIdentity) -> AppResult<()> {
        match self {
            Self::Memory(db) => db.create_user(user).await,
            #[cfg(feature = "sqlite")]
            Self::SQLite(db) => db.create_user(user).await,
        }
    }

    async fn get_user(&self, id: &PseudonymousId) -> AppResult<Option<UserIdentity>> {
        match self {
            Self::Memory(db) => db.get_user(id).await,
            #[cfg(feature = "sqlite")]
            Self::SQLite(db) => db.get_user(id).await,
        }
    }

    async fn increment_points(
        &self,
        id: &PseudonymousId,
        delta: u64,
        updated_at: DateTime<Utc>,
    ) -> AppResult<UserIdentity> {
        match self {
            Self::Memory(db) => db.increment_points(id, delta, updated_at).await,
            #[cfg(feature = "sqlite")]
            Self::SQLite(db) => db.increment_points(id, delta, updated_at).await,
        }
    }

    async fn update_level(
        &self,
        id: &PseudonymousId,
        level: u32,
        updated_at: DateTime<Utc>,
    ) -> AppResult<UserIdentity> {
        match self {
            Self::Memory(db) => db.update_level(id, level, updated_at).await,
            #[cfg(feature = "sqlite")]
            Self::SQLite(db) => db.update_level(id, level, updated_at).await,
        }
    }

    async fn get_daily_metric(
        &self,
        owner: &PseudonymousId,
        date: NaiveDate,
    ) -> AppResult<Option<DailyMetric>> {
        match self {
            Self::Memory(db) => db.get_daily_metric(owner, date).await,
            #[cfg(feature = "sqlite")]
            Self::SQLite(db) => db.get_daily_metric(owner, date).await,
        }
    }

    async fn upsert_daily_metric(
        &self,
        metric: UnsavedDailyMetric,
        update: &MetricUpdate,
    ) -> AppResult<MetricUpsert> {
        match self {
            Self::Memory(db) => db.upsert_daily_metric(metric, update).await,
            #[cfg(feature = "sqlite")]
            Self::SQLite(db) => db.upsert_daily_metric(metric, update).await,
        }
    }

    async fn list_daily_metrics(
        &self,
        owner: &PseudonymousId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DailyMetric>> {
        match self {
            Self::Memory(db) => db.list_daily_metrics(owner, from, to).await,
            #[cfg(feature = "sqlite")]
            Self::SQLite(db) => db.list_daily_metrics(owner, from, to).await,
        }
    }

    async fn create_activity(&self, activity: &Activity) -> AppResult<()> {
        match self {
            Self::Memory(db) => db.create_activity(activity).await,
            #[cfg(feature = "sqlite")]
            Self::SQLite(db) => db.create_activity(activity).await,
        }
    }

    async fn list_activities(
        &self,
        owner: &PseudonymousId,
        limit: u32,
    ) -> AppResult<Vec<Activity>> {
        match self {
            Self::Memory(db) => db.list_activities(owner, limit).await,
            #[cfg(feature = "sqlite")]
            Self::SQLite(db) => db.list_activities(owner, limit).await,
        }
    }

    async fn list_activities_in_range(
        &self,
        owner: &PseudonymousId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Activity>> {
        match self {
            Self::Memory(db) => db.list_activities_in_range(owner, from, to).await,
            #[cfg(feature = "sqlite")]
            Self::SQLite(db) => db.list_activities_in_range(owner, from, to).await,
        }
    }
}
