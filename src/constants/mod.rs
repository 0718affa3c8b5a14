// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Re-exports core domain constants and adds environment defaults for the service layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Constants module
//!
//! Domain constants (goals, level ladder, insight thresholds) live in
//! `body_echo_core::constants`; this module re-exports them and adds the
//! environment variable names and defaults used by configuration and binaries.

use std::env;

pub use body_echo_core::constants::{
    activity_energy, goals, identity, insight_thresholds, level, metrics,
};

/// Service identification
pub mod service_names {
    /// Service name used in log output
    pub const BODY_ECHO: &str = "body-echo";
    /// Binary name
    pub const CLI: &str = "body-echo";
}

/// Environment variable names
pub mod env_vars {
    /// Database location
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Offset of the user's local calendar from UTC, in minutes
    pub const UTC_OFFSET_MINUTES: &str = "BODY_ECHO_UTC_OFFSET_MINUTES";
    /// Daily step goal
    pub const STEPS_GOAL: &str = "BODY_ECHO_STEPS_GOAL";
    /// Daily water goal in liters
    pub const WATER_GOAL_LITERS: &str = "BODY_ECHO_WATER_GOAL_LITERS";
    /// Daily calorie goal
    pub const CALORIE_GOAL: &str = "BODY_ECHO_CALORIE_GOAL";
    /// Sleep quality goal percent
    pub const SLEEP_QUALITY_GOAL: &str = "BODY_ECHO_SLEEP_QUALITY_GOAL";
    /// Points granted per active minute of a logged activity
    pub const POINTS_PER_ACTIVE_MINUTE: &str = "BODY_ECHO_POINTS_PER_ACTIVE_MINUTE";
    /// Log level
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Defaults applied when an environment variable is unset
pub mod defaults {
    /// Default `SQLite` database location
    pub const DATABASE_URL: &str = "sqlite:./data/body_echo.db";
    /// Database URL value selecting the in-memory store
    pub const MEMORY_DATABASE_URL: &str = "memory";
    /// Default local calendar offset (UTC)
    pub const UTC_OFFSET_MINUTES: i32 = 0;
    /// Largest accepted calendar offset magnitude, in minutes
    pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;
    /// Default number of recent activities returned
    pub const RECENT_ACTIVITIES_LIMIT: u32 = 20;
    /// Default history window for reports, in days
    pub const HISTORY_WINDOW_DAYS: u32 = 7;
}

/// Environment-based configuration helpers
pub mod env_config {
    use super::{defaults, env, env_vars};

    /// Get database URL from environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var(env_vars::DATABASE_URL).unwrap_or_else(|_| defaults::DATABASE_URL.to_owned())
    }

    /// Get log level from environment or default
    #[must_use]
    pub fn log_level() -> String {
        env::var(env_vars::LOG_LEVEL).unwrap_or_else(|_| "info".to_owned())
    }

    /// Get deployment environment from environment or default
    #[must_use]
    pub fn environment() -> String {
        env::var(env_vars::ENVIRONMENT).unwrap_or_else(|_| "development".to_owned())
    }
}
