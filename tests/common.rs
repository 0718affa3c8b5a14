// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging, fixed-clock resources, and registered-user helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `body_echo`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use body_echo::{
    auth::ExternalAuthId,
    calendar::FixedClock,
    config::environment::{AppConfig, DatabaseUrl},
    database_plugins::{factory::Database, DatabaseProvider},
    models::{PseudonymousId, UserIdentity},
    resources::AppResources,
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Parse an RFC 3339 instant
pub fn instant(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap()
}

/// Backends every storage-facing test runs against
pub fn test_database_urls() -> Vec<DatabaseUrl> {
    vec![DatabaseUrl::Memory, DatabaseUrl::SQLiteMemory]
}

/// Open and migrate a test database
pub async fn create_test_database(url: &DatabaseUrl) -> Result<Database> {
    init_test_logging();
    Ok(Database::from_url(url).await?)
}

/// Resources over a fresh in-memory store, with a clock the test controls
pub async fn create_test_resources(start: &str) -> Result<(AppResources, Arc<FixedClock>)> {
    create_test_resources_with(&DatabaseUrl::Memory, AppConfig::for_testing(), start).await
}

/// Resources over a chosen backend and configuration
pub async fn create_test_resources_with(
    url: &DatabaseUrl,
    mut config: AppConfig,
    start: &str,
) -> Result<(AppResources, Arc<FixedClock>)> {
    config.database = url.clone();
    let database = create_test_database(url).await?;
    let clock = Arc::new(FixedClock::new(instant(start)));
    let resources = AppResources::builder()
        .with_config(config)
        .with_database(database)
        .with_clock(clock.clone())
        .build()?;
    Ok((resources, clock))
}

/// Register a profile for `auth_id` and return its pseudonymous key
pub async fn register_user(resources: &AppResources, auth_id: &str) -> Result<PseudonymousId> {
    let identity = resources
        .accounts()
        .register(
            &ExternalAuthId::new(auth_id),
            "Test User",
            &format!("{auth_id}@example.com"),
        )
        .await?;
    Ok(identity.pseudonymous_id)
}

/// Insert an identity directly through the store
pub async fn insert_identity(database: &Database, seed: &str) -> Result<UserIdentity> {
    let id = body_echo::anonymization::IdentityAnonymizer::new().derive_pseudonymous_id(seed)?;
    let identity = UserIdentity::new(id, "Seeded", "se***@example.com", Utc::now());
    database.create_user(&identity).await?;
    Ok(identity)
}
