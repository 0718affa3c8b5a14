// ABOUTME: Coaching insight event model produced by the insight engine
// ABOUTME: Ephemeral view values; recomputed on demand and never persisted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Something the user should pay attention to
    Warning,
    /// A habit change worth trying
    Suggestion,
    /// A goal reached or exceeded
    Achievement,
}

impl InsightKind {
    /// Stable wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Suggestion => "suggestion",
            Self::Achievement => "achievement",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coaching insight derived from a day's metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightEvent {
    /// Severity
    pub kind: InsightKind,
    /// Short headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Optional call-to-action reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable: Option<String>,
    /// Evaluation time
    pub generated_at: DateTime<Utc>,
}
