// ABOUTME: Profile commands for the body-echo CLI
// ABOUTME: Registers pseudonymous profiles and shows level progress
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

use body_echo::{
    auth::ExternalAuthId,
    errors::AppResult,
    intelligence::LevelEngine,
    models::PseudonymousId,
    resources::AppResources,
};
use serde_json::json;
use tracing::info;

use crate::helpers::display::{display_identity, print_json};

/// Register a profile for an authenticated identity
pub async fn register(
    resources: &AppResources,
    external: &ExternalAuthId,
    name: &str,
    email: &str,
    json: bool,
) -> AppResult<()> {
    let identity = resources.accounts().register(external, name, email).await?;
    info!(user.key = %identity.pseudonymous_id.short(), "Profile registered");

    let status = LevelEngine::status(identity.points);
    if json {
        return print_json(&json!({ "identity": identity, "level": status }));
    }
    println!("\nProfile created");
    display_identity(&identity, &status);
    Ok(())
}

/// Show a profile and its level progress
pub async fn show(resources: &AppResources, owner: &PseudonymousId, json: bool) -> AppResult<()> {
    let identity = resources.accounts().identity(owner).await?;
    let status = resources.progression().status(owner).await?;
    if json {
        return print_json(&json!({ "identity": identity, "level": status }));
    }
    display_identity(&identity, &status);
    Ok(())
}
