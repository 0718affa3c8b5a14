// ABOUTME: Rule-based coaching insight engine evaluating a day's metrics
// ABOUTME: Ordered, independent rules; every matching rule fires in registration order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Insight generation
//!
//! Rules are tagged variants evaluated in registration order. A match never
//! suppresses later rules, and the output keeps registration order, so appending a
//! rule can never reorder the insights produced by existing ones.
//!
//! Built-in rules, in order:
//!
//! 1. sleep quality below 70 percent → suggestion
//! 2. fewer than 5000 steps → warning
//! 3. steps strictly above the step goal → achievement

use body_echo_core::config::GoalThresholds;
use body_echo_core::constants::insight_thresholds::{
    LOW_ACTIVITY_STEPS_BELOW, SLEEP_QUALITY_SUGGESTION_BELOW,
};
use body_echo_core::models::{DailyMetric, InsightEvent, InsightKind, MetricValues};
use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

const DETAILS_ACTION: &str = "Tap for details";

/// Insight content before it is stamped with an evaluation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightDraft {
    /// Severity
    pub kind: InsightKind,
    /// Short headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Optional call-to-action reference
    pub actionable: Option<String>,
}

impl InsightDraft {
    /// Draft without an action reference
    #[must_use]
    pub fn new(kind: InsightKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            actionable: None,
        }
    }

    /// Attach an action reference
    #[must_use]
    pub fn with_action(mut self, actionable: impl Into<String>) -> Self {
        self.actionable = Some(actionable.into());
        self
    }

    /// Stamp with the evaluation time
    #[must_use]
    pub fn into_event(self, generated_at: DateTime<Utc>) -> InsightEvent {
        InsightEvent {
            kind: self.kind,
            title: self.title,
            message: self.message,
            actionable: self.actionable,
            generated_at,
        }
    }
}

/// Predicate plus producer for a caller-defined rule
pub type RuleFn = Arc<dyn Fn(&MetricValues, &GoalThresholds) -> Option<InsightDraft> + Send + Sync>;

/// A single coaching rule
#[derive(Clone)]
pub enum InsightRule {
    /// Suggest better sleep habits when sleep quality is below `below` percent
    SleepQualitySuggestion {
        /// Exclusive upper bound that triggers the rule
        below: u8,
    },
    /// Warn about low activity when the step count is below `below_steps`
    LowActivityWarning {
        /// Exclusive upper bound that triggers the rule
        below_steps: u32,
    },
    /// Celebrate a step count strictly above the step goal
    StepGoalExceeded,
    /// Caller-defined rule
    Custom {
        /// Rule name for logs and debugging
        name: String,
        /// Evaluation function
        evaluate: RuleFn,
    },
}

impl InsightRule {
    /// Built-in sleep rule with the standard threshold
    #[must_use]
    pub const fn sleep_quality_suggestion() -> Self {
        Self::SleepQualitySuggestion {
            below: SLEEP_QUALITY_SUGGESTION_BELOW,
        }
    }

    /// Built-in activity rule with the standard threshold
    #[must_use]
    pub const fn low_activity_warning() -> Self {
        Self::LowActivityWarning {
            below_steps: LOW_ACTIVITY_STEPS_BELOW,
        }
    }

    /// Wrap a closure as a rule
    pub fn custom<F>(name: impl Into<String>, evaluate: F) -> Self
    where
        F: Fn(&MetricValues, &GoalThresholds) -> Option<InsightDraft> + Send + Sync + 'static,
    {
        Self::Custom {
            name: name.into(),
            evaluate: Arc::new(evaluate),
        }
    }

    /// Rule name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::SleepQualitySuggestion { .. } => "sleep_quality_suggestion",
            Self::LowActivityWarning { .. } => "low_activity_warning",
            Self::StepGoalExceeded => "step_goal_exceeded",
            Self::Custom { name, .. } => name,
        }
    }

    /// Evaluate this rule in isolation
    #[must_use]
    pub fn evaluate(&self, values: &MetricValues, goals: &GoalThresholds) -> Option<InsightDraft> {
        match self {
            Self::SleepQualitySuggestion { below } => (values.sleep_quality < *below).then(|| {
                InsightDraft::new(
                    InsightKind::Suggestion,
                    "Improve Your Sleep Routine",
                    format!(
                        "Your sleep quality was {}% last night. Going to bed and waking up at \
                         the same times every day can raise it.",
                        values.sleep_quality
                    ),
                )
                .with_action(DETAILS_ACTION)
            }),
            Self::LowActivityWarning { below_steps } => (values.steps < *below_steps).then(|| {
                InsightDraft::new(
                    InsightKind::Warning,
                    "Low Activity Today",
                    format!(
                        "You have {} steps so far today, under {below_steps}. A short walk \
                         outside adds movement and daylight.",
                        values.steps
                    ),
                )
                .with_action(DETAILS_ACTION)
            }),
            Self::StepGoalExceeded => (values.steps > goals.steps_goal).then(|| {
                InsightDraft::new(
                    InsightKind::Achievement,
                    "Great Work!",
                    format!(
                        "You passed your {} step goal today. Keep it going!",
                        goals.steps_goal
                    ),
                )
            }),
            Self::Custom { evaluate, .. } => evaluate(values, goals),
        }
    }
}

impl fmt::Debug for InsightRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SleepQualitySuggestion { below } => f
                .debug_struct("SleepQualitySuggestion")
                .field("below", below)
                .finish(),
            Self::LowActivityWarning { below_steps } => f
                .debug_struct("LowActivityWarning")
                .field("below_steps", below_steps)
                .finish(),
            Self::StepGoalExceeded => f.write_str("StepGoalExceeded"),
            Self::Custom { name, .. } => f.debug_struct("Custom").field("name", name).finish(),
        }
    }
}

/// Insights produced for one day of a history window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyInsights {
    /// Calendar day
    pub date: NaiveDate,
    /// Insights in rule order
    pub insights: Vec<InsightEvent>,
}

/// Ordered rule evaluator
#[derive(Debug, Clone)]
pub struct InsightEngine {
    rules: Vec<InsightRule>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Engine with the built-in rules in their fixed order
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(vec![
            InsightRule::sleep_quality_suggestion(),
            InsightRule::low_activity_warning(),
            InsightRule::StepGoalExceeded,
        ])
    }

    /// Engine with exactly `rules`, in the given order
    #[must_use]
    pub const fn with_rules(rules: Vec<InsightRule>) -> Self {
        Self { rules }
    }

    /// Append a rule after all existing ones
    pub fn register(&mut self, rule: InsightRule) {
        self.rules.push(rule);
    }

    /// Builder form of [`Self::register`]
    #[must_use]
    pub fn with_rule(mut self, rule: InsightRule) -> Self {
        self.register(rule);
        self
    }

    /// Registered rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[InsightRule] {
        &self.rules
    }

    /// Evaluate every rule against a day's values
    ///
    /// Returns an empty vector when nothing matches.
    #[must_use]
    pub fn generate_insights(
        &self,
        values: &MetricValues,
        goals: &GoalThresholds,
        generated_at: DateTime<Utc>,
    ) -> Vec<InsightEvent> {
        let insights: Vec<InsightEvent> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(values, goals))
            .map(|draft| draft.into_event(generated_at))
            .collect();

        debug!(
            rules = self.rules.len(),
            fired = insights.len(),
            "Evaluated insight rules"
        );
        insights
    }

    /// Evaluate every rule against a stored aggregate
    #[must_use]
    pub fn generate_for_metric(
        &self,
        metric: &DailyMetric,
        goals: &GoalThresholds,
        generated_at: DateTime<Utc>,
    ) -> Vec<InsightEvent> {
        self.generate_insights(&metric.values, goals, generated_at)
    }

    /// Evaluate each aggregate of a history window independently
    ///
    /// Days are evaluated in parallel; the result keeps the input order.
    #[must_use]
    pub fn evaluate_history(
        &self,
        metrics: &[DailyMetric],
        goals: &GoalThresholds,
        generated_at: DateTime<Utc>,
    ) -> Vec<DailyInsights> {
        metrics
            .par_iter()
            .map(|metric| DailyInsights {
                date: metric.date,
                insights: self.generate_for_metric(metric, goals, generated_at),
            })
            .collect()
    }
}
