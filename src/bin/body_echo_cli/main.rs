// ABOUTME: Body Echo CLI - command-line front end over the health tracking core
// ABOUTME: Registers profiles, logs daily metrics and activities, and prints progress and insights
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors
//!
//! Usage:
//! ```bash
//! # Register a profile for an authenticated identity
//! body-echo user register --auth-id uid-123 --name "Ayse" --email ayse@example.com
//!
//! # Log part of today's metrics (other fields keep their values)
//! body-echo metrics log --auth-id uid-123 --steps 8500 --water 1.5
//!
//! # Today's progress and coaching insights
//! body-echo metrics today --auth-id uid-123
//!
//! # Last two weeks, oldest first
//! body-echo metrics history --auth-id uid-123 --days 14
//!
//! # Log a 30 minute run and earn points
//! body-echo activity log --auth-id uid-123 --type running --minutes 30 --distance 5.2
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use body_echo::{
    auth::ExternalAuthId,
    config::environment::{AppConfig, DatabaseUrl},
    constants::defaults,
    logging::LoggingConfig,
    models::{ActivityType, PseudonymousId},
    resources::AppResources,
};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "body-echo",
    about = "Body Echo health tracking CLI",
    long_about = "Log daily wellness metrics and activities, earn points and levels, and read coaching insights."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override (`memory`, `sqlite::memory:`, or `sqlite:<path>`)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Profile commands
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Daily metric commands
    Metrics {
        #[command(subcommand)]
        action: MetricsCommand,
    },

    /// Activity commands
    Activity {
        #[command(subcommand)]
        action: ActivityCommand,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum UserCommand {
    /// Register the profile of an authenticated identity
    Register {
        /// External auth identifier (hashed before use, never stored)
        #[arg(long)]
        auth_id: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Email (stored masked)
        #[arg(long)]
        email: String,
    },

    /// Show profile and level progress
    Show {
        /// External auth identifier
        #[arg(long)]
        auth_id: String,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum MetricsCommand {
    /// Merge values into today's aggregate
    Log {
        /// External auth identifier
        #[arg(long)]
        auth_id: String,

        /// Step count
        #[arg(long)]
        steps: Option<u32>,

        /// Water intake in liters
        #[arg(long)]
        water: Option<f64>,

        /// Calorie estimate (kcal)
        #[arg(long)]
        calories: Option<u32>,

        /// Sleep quality percent (0-100)
        #[arg(long)]
        sleep: Option<u8>,
    },

    /// Today's values, progress, and insights
    Today {
        /// External auth identifier
        #[arg(long)]
        auth_id: String,
    },

    /// Stored aggregates for the most recent days, oldest first
    History {
        /// External auth identifier
        #[arg(long)]
        auth_id: String,

        /// Window length in days, including today
        #[arg(long, default_value_t = defaults::HISTORY_WINDOW_DAYS)]
        days: u32,

        /// Also evaluate insights for each stored day
        #[arg(long)]
        insights: bool,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum ActivityCommand {
    /// Log an activity for today and earn points
    Log {
        /// External auth identifier
        #[arg(long)]
        auth_id: String,

        /// Activity type (walking, running, cycling)
        #[arg(long = "type")]
        activity_type: ActivityType,

        /// Duration in minutes
        #[arg(long)]
        minutes: u32,

        /// Distance in kilometers
        #[arg(long, default_value_t = 0.0)]
        distance: f64,

        /// Calories burned (estimated from the type when omitted)
        #[arg(long)]
        calories: Option<u32>,
    },

    /// List recent activities, newest first
    List {
        /// External auth identifier
        #[arg(long)]
        auth_id: String,

        /// Maximum number of activities
        #[arg(long, default_value_t = defaults::RECENT_ACTIVITIES_LIMIT)]
        limit: u32,
    },
}

fn owner_of(resources: &AppResources, auth_id: String) -> Result<PseudonymousId> {
    Ok(resources
        .anonymizer
        .pseudonymize(&ExternalAuthId::new(auth_id))?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    LoggingConfig::for_cli(log_level).init()?;

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.database_url.as_deref() {
        config.database = DatabaseUrl::parse_url(url)?;
    }
    config.validate()?;
    debug!("{}", config.summary());

    if config.database.is_ephemeral() {
        info!("Using ephemeral storage; nothing will persist after this command");
    }
    let resources = AppResources::from_config(config).await?;
    let json = cli.json;

    match cli.command {
        Command::User { action } => match action {
            UserCommand::Register {
                auth_id,
                name,
                email,
            } => {
                let external = ExternalAuthId::new(auth_id);
                commands::user::register(&resources, &external, &name, &email, json).await?;
            }
            UserCommand::Show { auth_id } => {
                let owner = owner_of(&resources, auth_id)?;
                commands::user::show(&resources, &owner, json).await?;
            }
        },
        Command::Metrics { action } => match action {
            MetricsCommand::Log {
                auth_id,
                steps,
                water,
                calories,
                sleep,
            } => {
                let owner = owner_of(&resources, auth_id)?;
                let update = commands::metrics::build_update(steps, water, calories, sleep);
                commands::metrics::log(&resources, &owner, &update, json).await?;
            }
            MetricsCommand::Today { auth_id } => {
                let owner = owner_of(&resources, auth_id)?;
                commands::metrics::today(&resources, &owner, json).await?;
            }
            MetricsCommand::History {
                auth_id,
                days,
                insights,
            } => {
                let owner = owner_of(&resources, auth_id)?;
                commands::metrics::history(&resources, &owner, days, insights, json).await?;
            }
        },
        Command::Activity { action } => match action {
            ActivityCommand::Log {
                auth_id,
                activity_type,
                minutes,
                distance,
                calories,
            } => {
                let owner = owner_of(&resources, auth_id)?;
                let input = commands::activity::build_activity(
                    activity_type,
                    minutes,
                    distance,
                    calories,
                );
                commands::activity::log(&resources, &owner, &input, json).await?;
            }
            ActivityCommand::List { auth_id, limit } => {
                let owner = owner_of(&resources, auth_id)?;
                commands::activity::list(&resources, &owner, limit, json).await?;
            }
        },
    }

    Ok(())
}
