// ABOUTME: Composition root holding shared handles and building domain services
// ABOUTME: Owns the database, clock, calendar, auth provider, and insight engine lifecycles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Dependency injection container
//!
//! Nothing in the crate reaches for a global: every service receives its
//! collaborators from [`AppResources`], built once at startup (or once per test).

use std::sync::Arc;

use tracing::info;

use crate::anonymization::IdentityAnonymizer;
use crate::auth::{AuthProvider, InMemoryAuthProvider};
use crate::calendar::{Clock, LocalCalendar, SystemClock};
use crate::config::environment::AppConfig;
use crate::database_plugins::factory::Database;
use crate::errors::{AppError, AppResult};
use crate::intelligence::InsightEngine;
use crate::services::{AccountService, ActivityService, DailyMetricService, ProgressionService};

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct AppResources {
    /// Validated configuration
    pub config: Arc<AppConfig>,
    /// Storage backend
    pub database: Arc<Database>,
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// User's local calendar
    pub calendar: LocalCalendar,
    /// Identity hasher and email masker
    pub anonymizer: IdentityAnonymizer,
    /// Authentication collaborator
    pub auth: Arc<dyn AuthProvider>,
    /// Insight rules
    pub insights: Arc<InsightEngine>,
}

impl AppResources {
    /// Open storage for `config` and wire production defaults
    ///
    /// Uses the system clock, the built-in insight rules, and the in-memory auth
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or storage cannot be opened
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let database = Database::from_url(&config.database).await?;
        info!(backend = database.backend_info(), "Storage ready");
        Self::builder()
            .with_config(config)
            .with_database(database)
            .build()
    }

    /// Create a new builder
    #[must_use]
    pub fn builder() -> AppResourcesBuilder {
        AppResourcesBuilder::default()
    }

    /// Daily metric aggregate service
    #[must_use]
    pub fn daily_metrics(&self) -> DailyMetricService {
        DailyMetricService::new(
            Arc::clone(&self.database),
            Arc::clone(&self.clock),
            self.calendar,
            self.config.goals,
            Arc::clone(&self.insights),
        )
    }

    /// Points and level service
    #[must_use]
    pub fn progression(&self) -> ProgressionService {
        ProgressionService::new(Arc::clone(&self.database), Arc::clone(&self.clock))
    }

    /// Account service
    #[must_use]
    pub fn accounts(&self) -> AccountService {
        AccountService::new(
            Arc::clone(&self.database),
            Arc::clone(&self.auth),
            self.anonymizer,
            self.daily_metrics(),
            Arc::clone(&self.clock),
        )
    }

    /// Activity logging service
    #[must_use]
    pub fn activities(&self) -> ActivityService {
        ActivityService::new(
            Arc::clone(&self.database),
            self.progression(),
            Arc::clone(&self.clock),
            self.calendar,
            self.config.points_per_active_minute,
        )
    }
}

/// Builder for [`AppResources`]
#[derive(Default)]
pub struct AppResourcesBuilder {
    config: Option<AppConfig>,
    database: Option<Database>,
    clock: Option<Arc<dyn Clock>>,
    auth: Option<Arc<dyn AuthProvider>>,
    insights: Option<InsightEngine>,
}

impl AppResourcesBuilder {
    /// Set the configuration (defaults to [`AppConfig::default`])
    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the storage backend (required)
    #[must_use]
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// Set the time source (defaults to the system clock)
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the auth provider (defaults to an empty in-memory provider)
    #[must_use]
    pub fn with_auth_provider(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the insight engine (defaults to the built-in rules)
    #[must_use]
    pub fn with_insight_engine(mut self, insights: InsightEngine) -> Self {
        self.insights = Some(insights);
        self
    }

    /// Build the resources
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if no database was given, the goals are invalid, or
    /// the calendar offset is out of range
    pub fn build(self) -> AppResult<AppResources> {
        let config = self.config.unwrap_or_default();
        let database = self
            .database
            .ok_or_else(|| AppError::config("a database is required"))?;
        config.goals.validate()?;
        let calendar = LocalCalendar::from_offset_minutes(config.utc_offset_minutes)?;

        Ok(AppResources {
            config: Arc::new(config),
            database: Arc::new(database),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            calendar,
            anonymizer: IdentityAnonymizer::new(),
            auth: self
                .auth
                .unwrap_or_else(|| Arc::new(InMemoryAuthProvider::new())),
            insights: Arc::new(self.insights.unwrap_or_default()),
        })
    }
}
