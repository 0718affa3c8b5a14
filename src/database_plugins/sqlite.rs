// ABOUTME: SQLite storage backend built on an sqlx connection pool
// ABOUTME: ON CONFLICT create-or-merge upserts on (owner, date) and in-place point increments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! `SQLite` database backend
//!
//! Dates are stored as `YYYY-MM-DD` text so lexical order equals calendar order;
//! timestamps are RFC 3339 text. Every write primitive is a single statement, so
//! atomicity comes from `SQLite` itself rather than from application locking.

use super::{DatabaseProvider, MetricUpsert};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{
    Activity, ActivityId, DailyMetric, MetricId, MetricUpdate, MetricValues, PseudonymousId,
    UnsavedDailyMetric, UserIdentity,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info};

const USER_COLUMNS: &str =
    "pseudonymous_id, display_name, masked_email, level, points, avatar_tag, created_at, updated_at";
const METRIC_COLUMNS: &str =
    "id, owner_key, metric_date, steps, water_liters, calories, sleep_quality, created_at, updated_at";
const ACTIVITY_COLUMNS: &str =
    "id, owner_key, activity_type, duration_minutes, distance_km, calories_burned, activity_date, created_at";

/// `SQLite` storage backend
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                pseudonymous_id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                masked_email TEXT NOT NULL,
                level INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1),
                points INTEGER NOT NULL DEFAULT 0 CHECK (points >= 0),
                avatar_tag TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create users table: {e}")))?;
        Ok(())
    }

    async fn migrate_daily_metrics(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS daily_metrics (
                id TEXT PRIMARY KEY,
                owner_key TEXT NOT NULL,
                metric_date TEXT NOT NULL,
                steps INTEGER NOT NULL DEFAULT 0 CHECK (steps >= 0),
                water_liters REAL NOT NULL DEFAULT 0 CHECK (water_liters >= 0),
                calories INTEGER NOT NULL DEFAULT 0 CHECK (calories >= 0),
                sleep_quality INTEGER NOT NULL DEFAULT 0 CHECK (sleep_quality BETWEEN 0 AND 100),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (owner_key, metric_date)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create daily_metrics table: {e}")))?;
        Ok(())
    }

    async fn migrate_activities(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS activities (
                id TEXT PRIMARY KEY,
                owner_key TEXT NOT NULL,
                activity_type TEXT NOT NULL CHECK (activity_type IN ('walking', 'running', 'cycling')),
                duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
                distance_km REAL NOT NULL DEFAULT 0,
                calories_burned INTEGER NOT NULL DEFAULT 0,
                activity_date TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create activities table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_activities_owner_created ON activities(owner_key, created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create activities index: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_activities_owner_date ON activities(owner_key, activity_date)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create activities index: {e}")))?;
        Ok(())
    }

    fn row_to_user(row: &SqliteRow) -> AppResult<UserIdentity> {
        let id: String = row.try_get("pseudonymous_id")?;
        Ok(UserIdentity {
            pseudonymous_id: PseudonymousId::parse(id)?,
            display_name: row.try_get("display_name")?,
            masked_email: row.try_get("masked_email")?,
            level: to_unsigned(row.try_get::<i64, _>("level")?, "level")?,
            points: to_unsigned(row.try_get::<i64, _>("points")?, "points")?,
            avatar_tag: row.try_get("avatar_tag")?,
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
            updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at")?)?,
        })
    }

    fn row_to_metric(row: &SqliteRow) -> AppResult<DailyMetric> {
        let id: String = row.try_get("id")?;
        let owner: String = row.try_get("owner_key")?;
        Ok(DailyMetric {
            id: MetricId::from_str(&id).map_err(|e| invalid_key(&id, &e))?,
            owner_key: PseudonymousId::parse(owner)?,
            date: parse_date(&row.try_get::<String, _>("metric_date")?)?,
            values: MetricValues {
                steps: to_unsigned(row.try_get::<i64, _>("steps")?, "steps")?,
                water_liters: row.try_get("water_liters")?,
                calories: to_unsigned(row.try_get::<i64, _>("calories")?, "calories")?,
                sleep_quality: to_unsigned(row.try_get::<i64, _>("sleep_quality")?, "sleep_quality")?,
            },
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
            updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at")?)?,
        })
    }

    fn row_to_activity(row: &SqliteRow) -> AppResult<Activity> {
        let id: String = row.try_get("id")?;
        let owner: String = row.try_get("owner_key")?;
        let activity_type: String = row.try_get("activity_type")?;
        Ok(Activity {
            id: ActivityId::from_str(&id).map_err(|e| invalid_key(&id, &e))?,
            owner_key: PseudonymousId::parse(owner)?,
            activity_type: activity_type.parse()?,
            duration_minutes: to_unsigned(
                row.try_get::<i64, _>("duration_minutes")?,
                "duration_minutes",
            )?,
            distance_km: row.try_get("distance_km")?,
            calories_burned: to_unsigned(
                row.try_get::<i64, _>("calories_burned")?,
                "calories_burned",
            )?,
            date: parse_date(&row.try_get::<String, _>("activity_date")?)?,
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
        })
    }

    async fn fetch_user_required<'q>(
        &self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
        id: &PseudonymousId,
    ) -> AppResult<UserIdentity> {
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update user: {e}")))?
            .ok_or_else(|| AppError::not_found("user identity").with_owner_key(id.short()))?;
        Self::row_to_user(&row)
    }
}

#[async_trait]
impl DatabaseProvider for SqliteDatabase {
    async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid SQLite URL '{database_url}': {e}")))?
            .create_if_missing(true);

        // An in-memory database lives exactly as long as its single connection
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to SQLite: {e}")))?;
        info!("SQLite pool opened");

        Ok(Self { pool })
    }

    async fn migrate(&self) -> AppResult<()> {
        let started = Instant::now();
        self.migrate_users().await?;
        self.migrate_daily_metrics().await?;
        self.migrate_activities().await?;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_database_operation("migrate", "*", true, elapsed_ms);
        Ok(())
    }

    async fn create_user(&self, user: &UserIdentity) -> AppResult<()> {
        let result = sqlx::query(
            r"
            INSERT INTO users (pseudonymous_id, display_name, masked_email, level, points, avatar_tag, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(user.pseudonymous_id.as_str())
        .bind(&user.display_name)
        .bind(&user.masked_email)
        .bind(i64::from(user.level))
        .bind(to_signed(user.points)?)
        .bind(&user.avatar_tag)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(AppError::already_exists("user identity")
                .with_owner_key(user.pseudonymous_id.short())),
            Err(e) => Err(AppError::database(format!("Failed to create user: {e}"))),
        }
    }

    async fn get_user(&self, id: &PseudonymousId) -> AppResult<Option<UserIdentity>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE pseudonymous_id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load user: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn increment_points(
        &self,
        id: &PseudonymousId,
        delta: u64,
        updated_at: DateTime<Utc>,
    ) -> AppResult<UserIdentity> {
        let sql = format!(
            "UPDATE users SET points = points + $1, updated_at = $2 \
             WHERE pseudonymous_id = $3 RETURNING {USER_COLUMNS}"
        );
        let query = sqlx::query(&sql)
            .bind(to_signed(delta)?)
            .bind(updated_at.to_rfc3339())
            .bind(id.as_str());
        self.fetch_user_required(query, id).await
    }

    async fn update_level(
        &self,
        id: &PseudonymousId,
        level: u32,
        updated_at: DateTime<Utc>,
    ) -> AppResult<UserIdentity> {
        let sql = format!(
            "UPDATE users SET level = MAX(level, $1), updated_at = $2 \
             WHERE pseudonymous_id = $3 RETURNING {USER_COLUMNS}"
        );
        let query = sqlx::query(&sql)
            .bind(i64::from(level))
            .bind(updated_at.to_rfc3339())
            .bind(id.as_str());
        self.fetch_user_required(query, id).await
    }

    async fn get_daily_metric(
        &self,
        owner: &PseudonymousId,
        date: NaiveDate,
    ) -> AppResult<Option<DailyMetric>> {
        let row = sqlx::query(&format!(
            "SELECT {METRIC_COLUMNS} FROM daily_metrics WHERE owner_key = $1 AND metric_date = $2"
        ))
        .bind(owner.as_str())
        .bind(date.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load daily metric: {e}")))?;

        row.as_ref().map(Self::row_to_metric).transpose()
    }

    async fn upsert_daily_metric(
        &self,
        metric: UnsavedDailyMetric,
        update: &MetricUpdate,
    ) -> AppResult<MetricUpsert> {
        let candidate = metric.into_saved(MetricId::new());
        // Bare column names in DO UPDATE refer to the stored row
        let row = sqlx::query(&format!(
            r"
            INSERT INTO daily_metrics (id, owner_key, metric_date, steps, water_liters, calories, sleep_quality, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (owner_key, metric_date) DO UPDATE SET
                steps = COALESCE($10, steps),
                water_liters = COALESCE($11, water_liters),
                calories = COALESCE($12, calories),
                sleep_quality = COALESCE($13, sleep_quality),
                updated_at = CASE WHEN $14 THEN updated_at ELSE excluded.updated_at END
            RETURNING {METRIC_COLUMNS}
            "
        ))
        .bind(candidate.id.to_string())
        .bind(candidate.owner_key.as_str())
        .bind(candidate.date.to_string())
        .bind(i64::from(candidate.values.steps))
        .bind(candidate.values.water_liters)
        .bind(i64::from(candidate.values.calories))
        .bind(i64::from(candidate.values.sleep_quality))
        .bind(candidate.created_at.to_rfc3339())
        .bind(candidate.updated_at.to_rfc3339())
        .bind(update.steps.map(i64::from))
        .bind(update.water_liters)
        .bind(update.calories.map(i64::from))
        .bind(update.sleep_quality.map(i64::from))
        .bind(update.is_empty())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert daily metric: {e}")))?;

        let stored = Self::row_to_metric(&row)?;
        let created = stored.id == candidate.id;
        if created {
            debug!(metric_id = %stored.id, date = %stored.date, "Created daily metric");
        }
        Ok(MetricUpsert {
            metric: stored,
            created,
        })
    }

    async fn list_daily_metrics(
        &self,
        owner: &PseudonymousId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DailyMetric>> {
        let rows = sqlx::query(&format!(
            "SELECT {METRIC_COLUMNS} FROM daily_metrics \
             WHERE owner_key = $1 AND metric_date BETWEEN $2 AND $3 \
             ORDER BY metric_date ASC"
        ))
        .bind(owner.as_str())
        .bind(from.to_string())
        .bind(to.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list daily metrics: {e}")))?;

        rows.iter().map(Self::row_to_metric).collect()
    }

    async fn create_activity(&self, activity: &Activity) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO activities (id, owner_key, activity_type, duration_minutes, distance_km, calories_burned, activity_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(activity.id.to_string())
        .bind(activity.owner_key.as_str())
        .bind(activity.activity_type.as_str())
        .bind(i64::from(activity.duration_minutes))
        .bind(activity.distance_km)
        .bind(i64::from(activity.calories_burned))
        .bind(activity.date.to_string())
        .bind(activity.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create activity: {e}")))?;
        Ok(())
    }

    async fn list_activities(
        &self,
        owner: &PseudonymousId,
        limit: u32,
    ) -> AppResult<Vec<Activity>> {
        let rows = sqlx::query(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE owner_key = $1 \
             ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(owner.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list activities: {e}")))?;

        rows.iter().map(Self::row_to_activity).collect()
    }

    async fn list_activities_in_range(
        &self,
        owner: &PseudonymousId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Activity>> {
        let rows = sqlx::query(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities \
             WHERE owner_key = $1 AND activity_date BETWEEN $2 AND $3 \
             ORDER BY created_at DESC"
        ))
        .bind(owner.as_str())
        .bind(from.to_string())
        .bind(to.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list activities in range: {e}")))?;

        rows.iter().map(Self::row_to_activity).collect()
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn invalid_key(value: &str, error: &uuid::Error) -> AppError {
    AppError::serialization(format!("Invalid stored key '{value}': {error}"))
}

fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::serialization(format!("Invalid stored timestamp '{value}': {e}")))
}

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::serialization(format!("Invalid stored date '{value}': {e}")))
}

fn to_unsigned<T: TryFrom<i64>>(value: i64, column: &str) -> AppResult<T> {
    T::try_from(value).map_err(|_| {
        AppError::serialization(format!("Column {column} holds out-of-range value {value}"))
    })
}

fn to_signed(value: u64) -> AppResult<i64> {
    i64::try_from(value)
        .map_err(|_| AppError::invalid_input(format!("Value {value} exceeds storage range")))
}
