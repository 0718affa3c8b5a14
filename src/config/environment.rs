// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses storage location, calendar offset, daily goals, and progression rates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Environment-based configuration

use anyhow::{Context, Result};
use body_echo_core::config::GoalThresholds;
use body_echo_core::constants::level::DEFAULT_POINTS_PER_ACTIVE_MINUTE;
use crate::constants::{defaults, env_config, env_vars};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational output
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a testing environment
    #[must_use]
    pub const fn is_testing(self) -> bool {
        matches!(self, Self::Testing)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
            Self::Testing => f.write_str("testing"),
        }
    }
}

/// Type-safe storage location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// File path
        path: PathBuf,
    },
    /// In-process `SQLite` database (`sqlite::memory:`)
    SQLiteMemory,
    /// Process-local map store with no persistence
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    ///
    /// Accepted forms: `memory`, `sqlite::memory:`, `sqlite:<path>`, `sqlite://<path>`,
    /// or a bare file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or names no path
    pub fn parse_url(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            anyhow::bail!("database URL is empty");
        }
        if trimmed.eq_ignore_ascii_case(defaults::MEMORY_DATABASE_URL) {
            return Ok(Self::Memory);
        }

        let path_str = trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("sqlite:"))
            .unwrap_or(trimmed);
        match path_str {
            "" => anyhow::bail!("database URL '{trimmed}' names no file"),
            ":memory:" => Ok(Self::SQLiteMemory),
            path => Ok(Self::SQLite {
                path: PathBuf::from(path),
            }),
        }
    }

    /// Convert to a connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::SQLiteMemory => "sqlite::memory:".to_owned(),
            Self::Memory => defaults::MEMORY_DATABASE_URL.to_owned(),
        }
    }

    /// Check if data lives only as long as the process
    #[must_use]
    pub const fn is_ephemeral(&self) -> bool {
        matches!(self, Self::SQLiteMemory | Self::Memory)
    }

    /// Check if this selects the `SQLite` backend
    #[must_use]
    pub const fn is_sqlite(&self) -> bool {
        matches!(self, Self::SQLite { .. } | Self::SQLiteMemory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/body_echo.db"),
        }
    }
}

impl FromStr for DatabaseUrl {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_url(s)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_connection_string())
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Storage location
    pub database: DatabaseUrl,
    /// Offset of the user's local calendar from UTC, in minutes
    pub utc_offset_minutes: i32,
    /// Daily goals
    pub goals: GoalThresholds,
    /// Points granted per active minute of a logged activity
    pub points_per_active_minute: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            log_level: LogLevel::default(),
            database: DatabaseUrl::default(),
            utc_offset_minutes: defaults::UTC_OFFSET_MINUTES,
            goals: GoalThresholds::default(),
            points_per_active_minute: DEFAULT_POINTS_PER_ACTIVE_MINUTE,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed, or if the
    /// resulting configuration fails validation
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let fallback_goals = GoalThresholds::default();

        let config = Self {
            environment: Environment::from_str_or_default(&env_config::environment()),
            log_level: LogLevel::from_str_or_default(&env_config::log_level()),
            database: DatabaseUrl::parse_url(&env_config::database_url())
                .context("Invalid DATABASE_URL value")?,
            utc_offset_minutes: env_var_or(
                env_vars::UTC_OFFSET_MINUTES,
                &defaults::UTC_OFFSET_MINUTES.to_string(),
            )
            .parse()
            .context("Invalid BODY_ECHO_UTC_OFFSET_MINUTES value")?,
            goals: GoalThresholds {
                steps_goal: env_var_or(
                    env_vars::STEPS_GOAL,
                    &fallback_goals.steps_goal.to_string(),
                )
                .parse()
                .context("Invalid BODY_ECHO_STEPS_GOAL value")?,
                water_goal_liters: env_var_or(
                    env_vars::WATER_GOAL_LITERS,
                    &fallback_goals.water_goal_liters.to_string(),
                )
                .parse()
                .context("Invalid BODY_ECHO_WATER_GOAL_LITERS value")?,
                calorie_goal: env_var_or(
                    env_vars::CALORIE_GOAL,
                    &fallback_goals.calorie_goal.to_string(),
                )
                .parse()
                .context("Invalid BODY_ECHO_CALORIE_GOAL value")?,
                sleep_quality_goal: env_var_or(
                    env_vars::SLEEP_QUALITY_GOAL,
                    &fallback_goals.sleep_quality_goal.to_string(),
                )
                .parse()
                .context("Invalid BODY_ECHO_SLEEP_QUALITY_GOAL value")?,
            },
            points_per_active_minute: env_var_or(
                env_vars::POINTS_PER_ACTIVE_MINUTE,
                &DEFAULT_POINTS_PER_ACTIVE_MINUTE.to_string(),
            )
            .parse()
            .context("Invalid BODY_ECHO_POINTS_PER_ACTIVE_MINUTE value")?,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Configuration for tests: in-memory store, UTC calendar, default goals
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            environment: Environment::Testing,
            database: DatabaseUrl::Memory,
            ..Self::default()
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the calendar offset exceeds fourteen hours, the points
    /// rate is zero, or any goal is not strictly positive
    pub fn validate(&self) -> Result<()> {
        if self.utc_offset_minutes.abs() > defaults::MAX_UTC_OFFSET_MINUTES {
            anyhow::bail!(
                "BODY_ECHO_UTC_OFFSET_MINUTES must be within +/-{} minutes, got {}",
                defaults::MAX_UTC_OFFSET_MINUTES,
                self.utc_offset_minutes
            );
        }
        if self.points_per_active_minute == 0 {
            anyhow::bail!("BODY_ECHO_POINTS_PER_ACTIVE_MINUTE must be at least 1");
        }
        self.goals
            .validate()
            .context("Invalid daily goal configuration")?;
        Ok(())
    }

    /// Configuration summary for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Body Echo Configuration:\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - UTC Offset: {} min\n\
             - Goals: {} steps, {} L water, {} kcal, {}% sleep\n\
             - Points per active minute: {}",
            self.environment,
            self.log_level,
            self.database,
            self.utc_offset_minutes,
            self.goals.steps_goal,
            self.goals.water_goal_liters,
            self.goals.calorie_goal,
            self.goals.sleep_quality_goal,
            self.points_per_active_minute,
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_database_urls() {
        assert_eq!(DatabaseUrl::parse_url("memory").ok(), Some(DatabaseUrl::Memory));
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").ok(),
            Some(DatabaseUrl::SQLiteMemory)
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/test.db").ok(),
            Some(DatabaseUrl::SQLite {
                path: PathBuf::from("./data/test.db")
            })
        );
        assert_eq!(
            DatabaseUrl::parse_url("/tmp/body.db").ok(),
            Some(DatabaseUrl::SQLite {
                path: PathBuf::from("/tmp/body.db")
            })
        );
        assert!(DatabaseUrl::parse_url("  ").is_err());
        assert!(DatabaseUrl::parse_url("sqlite:").is_err());
    }

    #[test]
    fn test_connection_string_round_trips_through_parse() {
        let url = DatabaseUrl::SQLite {
            path: PathBuf::from("./data/x.db"),
        };
        assert_eq!(url.to_connection_string(), "sqlite:./data/x.db");
        assert!(url.is_sqlite());
        assert!(!url.is_ephemeral());
        assert!(DatabaseUrl::Memory.is_ephemeral());
        assert!(!DatabaseUrl::Memory.is_sqlite());
    }

    #[test]
    fn test_validate_rejects_out_of_range_offset() {
        let config = AppConfig {
            utc_offset_minutes: 15 * 60,
            ..AppConfig::for_testing()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            utc_offset_minutes: -14 * 60,
            ..AppConfig::for_testing()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_goal() {
        let mut config = AppConfig::for_testing();
        config.goals.steps_goal = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_fallback() {
        assert_eq!(LogLevel::from_str_or_default("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("loud"), LogLevel::Info);
        assert_eq!(Environment::from_str_or_default("prod"), Environment::Production);
    }
}
