// ABOUTME: Daily metric commands for the body-echo CLI
// ABOUTME: Handles partial upserts, today's summary, and history windows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

use body_echo::{
    errors::{AppError, AppResult},
    models::{MetricUpdate, PseudonymousId},
    resources::AppResources,
};
use chrono::Days;
use serde_json::json;

use crate::helpers::display::{display_history, display_metric, display_summary, print_json};

/// Collect the flags that were given into a partial update
pub fn build_update(
    steps: Option<u32>,
    water: Option<f64>,
    calories: Option<u32>,
    sleep: Option<u8>,
) -> MetricUpdate {
    MetricUpdate {
        steps,
        water_liters: water,
        calories,
        sleep_quality: sleep,
    }
}

/// Fail with `ResourceNotFound` unless `owner` registered a profile
///
/// Keeps metric commands from writing aggregates for unknown auth ids, and
/// from reporting an all-zero day for them.
async fn require_profile(resources: &AppResources, owner: &PseudonymousId) -> AppResult<()> {
    resources.accounts().identity(owner).await.map(drop)
}

/// Merge values into today's aggregate
pub async fn log(
    resources: &AppResources,
    owner: &PseudonymousId,
    update: &MetricUpdate,
    json: bool,
) -> AppResult<()> {
    require_profile(resources, owner).await?;
    let metric = resources.daily_metrics().upsert_today(owner, update).await?;
    if json {
        return print_json(&metric);
    }
    display_metric(&metric);
    Ok(())
}

/// Show today's values, progress, and insights
pub async fn today(resources: &AppResources, owner: &PseudonymousId, json: bool) -> AppResult<()> {
    require_profile(resources, owner).await?;
    let summary = resources.daily_metrics().today_summary(owner).await?;
    if json {
        return print_json(&summary);
    }
    display_summary(&summary);
    Ok(())
}

/// Show the last `days` days, oldest first
pub async fn history(
    resources: &AppResources,
    owner: &PseudonymousId,
    days: u32,
    with_insights: bool,
    json: bool,
) -> AppResult<()> {
    if days == 0 {
        return Err(AppError::invalid_input("history window must be at least one day"));
    }
    require_profile(resources, owner).await?;
    let service = resources.daily_metrics();
    let to = service.today().date;
    let from = to
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .ok_or_else(|| AppError::invalid_input(format!("history window of {days} days is too long")))?;

    let metrics = service.history(owner, from, to).await?;
    let insights = if with_insights {
        Some(service.history_insights(owner, from, to).await?)
    } else {
        None
    };

    if json {
        return print_json(&json!({
            "from": from,
            "to": to,
            "metrics": metrics,
            "insights": insights,
        }));
    }
    println!("\nHistory {from} .. {to}");
    display_history(&metrics, insights.as_deref());
    Ok(())
}
