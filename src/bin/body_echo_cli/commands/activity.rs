// ABOUTME: Activity commands for the body-echo CLI
// ABOUTME: Logs activities with point awards and lists recent ones
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

use body_echo::{
    errors::AppResult,
    models::{ActivityType, NewActivity, PseudonymousId},
    resources::AppResources,
};

use crate::helpers::display::{display_activities, display_logged_activity, print_json};

/// Assemble activity input from command-line flags
pub const fn build_activity(
    activity_type: ActivityType,
    minutes: u32,
    distance: f64,
    calories: Option<u32>,
) -> NewActivity {
    NewActivity {
        activity_type,
        duration_minutes: minutes,
        distance_km: distance,
        calories_burned: calories,
    }
}

/// Log an activity for today and award its points
pub async fn log(
    resources: &AppResources,
    owner: &PseudonymousId,
    input: &NewActivity,
    json: bool,
) -> AppResult<()> {
    let logged = resources.activities().log_activity(owner, input).await?;
    if json {
        return print_json(&logged);
    }
    display_logged_activity(&logged);
    Ok(())
}

/// List recent activities, newest first
pub async fn list(
    resources: &AppResources,
    owner: &PseudonymousId,
    limit: u32,
    json: bool,
) -> AppResult<()> {
    let activities = resources
        .activities()
        .recent_activities(owner, limit)
        .await?;
    if json {
        return print_json(&activities);
    }
    display_activities(&activities);
    Ok(())
}
