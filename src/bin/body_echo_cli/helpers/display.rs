// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors
// ABOUTME: Output formatting helpers for the body-echo CLI
// ABOUTME: Plain-text rendering of profiles, daily summaries, and activities, plus JSON output

use body_echo::{
    errors::{AppError, AppResult},
    intelligence::{DailyInsights, LevelStatus, ProgressFacet},
    models::{Activity, DailyMetric, InsightEvent, UserIdentity},
    services::{DailySummary, LoggedActivity, PointsAward},
};
use serde::Serialize;

/// Pretty-print any serializable value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::serialization(format!("Failed to render JSON output: {e}")))?;
    println!("{rendered}");
    Ok(())
}

const fn facet_label(facet: ProgressFacet) -> &'static str {
    match facet {
        ProgressFacet::Steps => "Steps",
        ProgressFacet::Water => "Water",
        ProgressFacet::Calories => "Calories",
        ProgressFacet::SleepQuality => "Sleep",
    }
}

/// Display a profile with its level progress
pub fn display_identity(identity: &UserIdentity, status: &LevelStatus) {
    println!("\n{} ({})", identity.display_name, identity.masked_email);
    println!("{}", "=".repeat(50));
    println!("   Key: {}", identity.pseudonymous_id.short());
    println!("   Level: {}", status.level);
    println!("   Points: {}", status.points);
    println!(
        "   Next level in: {} points ({} into this level)",
        status.points_to_next_level, status.points_into_level
    );
    println!(
        "   Member since: {}",
        identity.created_at.format("%Y-%m-%d %H:%M UTC")
    );
}

/// Display a stored aggregate after an upsert
pub fn display_metric(metric: &DailyMetric) {
    println!("\nDaily metrics for {}", metric.date);
    println!("{}", "=".repeat(50));
    println!("   Steps: {}", metric.values.steps);
    println!("   Water: {:.2} L", metric.values.water_liters);
    println!("   Calories: {} kcal", metric.values.calories);
    println!("   Sleep quality: {}%", metric.values.sleep_quality);
    println!(
        "   Updated: {}",
        metric.updated_at.format("%Y-%m-%d %H:%M UTC")
    );
}

fn display_insights(insights: &[InsightEvent]) {
    if insights.is_empty() {
        println!("   (no insights)");
        return;
    }
    for insight in insights {
        println!("   [{}] {}: {}", insight.kind, insight.title, insight.message);
        if let Some(action) = &insight.actionable {
            println!("      -> {action}");
        }
    }
}

/// Display today's values with progress bars and insights
pub fn display_summary(summary: &DailySummary) {
    println!("\nToday ({})", summary.date);
    println!("{}", "=".repeat(50));
    for (facet, ratio) in summary.progress.facets() {
        let percent = summary.progress.percent(facet);
        let filled = usize::from(percent / 5);
        println!(
            "   {:<9} [{:<20}] {:>3}%{}",
            facet_label(facet),
            "#".repeat(filled),
            percent,
            if ratio > 1.0 { " (goal exceeded)" } else { "" }
        );
    }
    println!("\nInsights:");
    display_insights(&summary.insights);
}

/// Display a history window, optionally with per-day insights
pub fn display_history(metrics: &[DailyMetric], insights: Option<&[DailyInsights]>) {
    if metrics.is_empty() {
        println!("No metrics logged in this window");
        return;
    }
    println!(
        "\n{:<12} {:>8} {:>8} {:>8} {:>6}",
        "Date", "Steps", "Water", "kcal", "Sleep"
    );
    println!("{}", "-".repeat(46));
    for metric in metrics {
        println!(
            "{:<12} {:>8} {:>8.2} {:>8} {:>5}%",
            metric.date.to_string(),
            metric.values.steps,
            metric.values.water_liters,
            metric.values.calories,
            metric.values.sleep_quality
        );
        if let Some(day) = insights.and_then(|all| all.iter().find(|d| d.date == metric.date)) {
            display_insights(&day.insights);
        }
    }
}

/// Display a points award and any level change
pub fn display_award(award: &PointsAward) {
    println!(
        "   Points: {} (level {})",
        award.identity.points, award.identity.level
    );
    if let Some(change) = award.level_change {
        println!(
            "\nLevel up! {} -> {} (+{})",
            change.from,
            change.to,
            change.levels_gained()
        );
    }
}

/// Display a freshly logged activity
pub fn display_logged_activity(logged: &LoggedActivity) {
    let activity = &logged.activity;
    println!(
        "\n{} logged for {}",
        activity.activity_type.display_name(),
        activity.date
    );
    println!("{}", "=".repeat(50));
    println!("   Duration: {} min", activity.duration_minutes);
    println!("   Distance: {:.2} km", activity.distance_km);
    println!("   Calories: {} kcal", activity.calories_burned);
    display_award(&logged.award);
}

/// Display recent activities
pub fn display_activities(activities: &[Activity]) {
    if activities.is_empty() {
        println!("No activities logged yet");
        return;
    }
    println!(
        "\n{:<12} {:<6} {:>6} {:>8} {:>6}",
        "Date", "Type", "Min", "km", "kcal"
    );
    println!("{}", "-".repeat(42));
    for activity in activities {
        println!(
            "{:<12} {:<6} {:>6} {:>8.2} {:>6}",
            activity.date.to_string(),
            activity.activity_type.display_name(),
            activity.duration_minutes,
            activity.distance_km,
            activity.calories_burned
        );
    }
}
