// ABOUTME: Core data models and types for Body Echo
// ABOUTME: Re-exports identity, daily metric aggregate, activity, and insight event types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! # Data Models
//!
//! ## Design Principles
//!
//! - **Pseudonymous**: records are keyed by `PseudonymousId`, never by the external
//!   authentication identity
//! - **Two-stage persistence**: `UnsavedDailyMetric` has no key, `DailyMetric` always
//!   has one, so create-vs-merge is decided by type rather than by a null check
//! - **Serializable**: all persisted models support JSON serialization

mod activity;
mod daily_metric;
mod identity;
mod insight;

// Identity domain
pub use identity::{PseudonymousId, UserIdentity};

// Daily metric domain
pub use daily_metric::{
    DailyMetric, MetricFields, MetricId, MetricUpdate, MetricValues, UnsavedDailyMetric,
};

// Activity domain
pub use activity::{Activity, ActivityId, ActivityType, NewActivity};

// Insight domain
pub use insight::{InsightEvent, InsightKind};
