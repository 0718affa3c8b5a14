// ABOUTME: Domain service layer orchestrating storage, calendar, and intelligence engines
// ABOUTME: Daily metric upserts, point awards, account flows, and activity logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Domain service layer
//!
//! Services own no global state. Each one is built by the composition root
//! ([`crate::resources::AppResources`]) from shared handles to the database, clock,
//! and calendar, so tests can substitute any of them.

/// Account registration, sign-in, and session queries
pub mod accounts;

/// Activity logging with calorie estimates and point awards
pub mod activities;

/// Per-day metric aggregates: upsert, history, and daily summaries
pub mod daily_metrics;

/// Point awards and level transitions
pub mod progression;

pub use accounts::AccountService;
pub use activities::{ActivityService, LoggedActivity};
pub use daily_metrics::{DailyMetricService, DailySummary};
pub use progression::{PointsAward, ProgressionService};
