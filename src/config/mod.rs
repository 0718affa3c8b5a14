// ABOUTME: Configuration management module for runtime settings
// ABOUTME: Environment-driven configuration for storage, calendar, goals, and progression
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Configuration module
//!
//! - **Environment**: application configuration loaded from environment variables
//! - **Goals**: daily goal thresholds (re-exported from `body_echo_core::config`)

/// Environment and application configuration
pub mod environment;

pub use body_echo_core::config::GoalThresholds;
pub use environment::{AppConfig, DatabaseUrl, Environment, LogLevel};
