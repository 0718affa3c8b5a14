// ABOUTME: Main library entry point for the Body Echo health tracking core
// ABOUTME: Wires anonymization, daily metrics, progression, and insights over pluggable storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

#![deny(unsafe_code)]

//! # Body Echo
//!
//! Core of a personal health-tracking app: users log daily activity and wellness
//! metrics, earn points and levels, and receive rule-based coaching insights.
//!
//! ## Architecture
//!
//! - **Anonymization**: external auth ids become pseudonymous SHA-256 keys; emails
//!   are masked before they are stored
//! - **Daily metrics**: one aggregate per user per local calendar day, updated with
//!   field-level merges
//! - **Progression**: additive point awards with level recomputation
//! - **Intelligence**: progress ratios, level ladder, and ordered insight rules
//!   (from the `body-echo-intelligence` crate)
//! - **Database plugins**: in-memory and `SQLite` stores behind `DatabaseProvider`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use body_echo::config::environment::AppConfig;
//! use body_echo::resources::AppResources;
//! use body_echo::models::MetricUpdate;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = AppConfig::from_env()?;
//! let resources = AppResources::from_config(config).await?;
//! let owner = resources.anonymizer.derive_pseudonymous_id("auth-uid-123")?;
//! let metric = resources
//!     .daily_metrics()
//!     .upsert_today(&owner, &MetricUpdate::new().steps(8_500))
//!     .await?;
//! println!("{} steps on {}", metric.values.steps, metric.date);
//! # Ok(())
//! # }
//! ```

/// Pseudonymous identifiers and email masking
pub mod anonymization;

/// Authentication collaborator contract and an in-memory implementation
pub mod auth;

/// Clock and local calendar day resolution
pub mod calendar;

/// Environment-based configuration
pub mod config;

/// Application constants
pub mod constants;

/// Storage abstraction with in-memory and `SQLite` backends
pub mod database_plugins;

/// Unified error types
pub mod errors;

/// Progress, level, and insight engines
pub mod intelligence;

/// Structured logging setup
pub mod logging;

/// Core data models
pub mod models;

/// Composition root bundling shared services
pub mod resources;

/// Domain services (daily metrics, progression, accounts, activities)
pub mod services;
