// ABOUTME: Integration tests for activity logging, calorie estimates, and activity point awards
// ABOUTME: Runs against both storage backends with a fixed clock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use body_echo::{
    config::environment::AppConfig,
    errors::ErrorCode,
    models::{ActivityType, MetricUpdate, NewActivity},
};
use chrono::{Duration, NaiveDate};

fn run(minutes: u32) -> NewActivity {
    NewActivity {
        activity_type: ActivityType::Running,
        duration_minutes: minutes,
        distance_km: 5.0,
        calories_burned: None,
    }
}

#[tokio::test]
async fn test_logged_run_estimates_calories_and_awards_points() {
    for url in common::test_database_urls() {
        let (resources, _clock) = common::create_test_resources_with(
            &url,
            AppConfig::for_testing(),
            "2025-03-01T07:30:00Z",
        )
        .await
        .unwrap();
        let user = common::register_user(&resources, "runner").await.unwrap();

        let logged = resources
            .activities()
            .log_activity(&user, &run(30))
            .await
            .unwrap();

        assert_eq!(logged.activity.calories_burned, 300, "{url}");
        assert_eq!(
            logged.activity.date,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert_eq!(logged.award.identity.points, 30, "{url}");
        assert!(logged.award.level_change.is_none());

        let recent = resources
            .activities()
            .recent_activities(&user, 10)
            .await
            .unwrap();
        assert_eq!(recent, vec![logged.activity], "{url}");
    }
}

#[tokio::test]
async fn test_supplied_calories_win_over_estimate() {
    let (resources, _clock) = common::create_test_resources("2025-03-01T07:30:00Z")
        .await
        .unwrap();
    let user = common::register_user(&resources, "cyclist").await.unwrap();

    let logged = resources
        .activities()
        .log_activity(
            &user,
            &NewActivity {
                activity_type: ActivityType::Cycling,
                duration_minutes: 45,
                distance_km: 18.5,
                calories_burned: Some(512),
            },
        )
        .await
        .unwrap();
    assert_eq!(logged.activity.calories_burned, 512);
}

#[tokio::test]
async fn test_activities_do_not_touch_daily_aggregate() {
    let (resources, _clock) = common::create_test_resources("2025-03-01T07:30:00Z")
        .await
        .unwrap();
    let user = common::register_user(&resources, "walker").await.unwrap();
    resources
        .daily_metrics()
        .upsert_today(&user, &MetricUpdate::new().calories(1_200))
        .await
        .unwrap();

    resources
        .activities()
        .log_activity(&user, &run(60))
        .await
        .unwrap();

    let today = resources
        .daily_metrics()
        .today_metric(&user)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(today.values.calories, 1_200);
}

#[tokio::test]
async fn test_points_rate_is_configurable_and_levels_up() {
    let config = AppConfig {
        points_per_active_minute: 10,
        ..AppConfig::for_testing()
    };
    let (resources, _clock) = common::create_test_resources_with(
        &config.database.clone(),
        config,
        "2025-03-01T07:30:00Z",
    )
    .await
    .unwrap();
    let user = common::register_user(&resources, "sprinter").await.unwrap();

    let logged = resources
        .activities()
        .log_activity(&user, &run(55))
        .await
        .unwrap();
    assert_eq!(logged.award.identity.points, 550);
    let change = logged.award.level_change.unwrap();
    assert_eq!((change.from, change.to), (1, 2));
}

#[tokio::test]
async fn test_invalid_activity_rejected() {
    let (resources, _clock) = common::create_test_resources("2025-03-01T07:30:00Z")
        .await
        .unwrap();
    let user = common::register_user(&resources, "lazy").await.unwrap();

    let err = resources
        .activities()
        .log_activity(&user, &run(0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let mut backwards = run(10);
    backwards.distance_km = -1.0;
    let err = resources
        .activities()
        .log_activity(&user, &backwards)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    assert!(resources
        .activities()
        .recent_activities(&user, 10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unregistered_owner_cannot_log() {
    let (resources, _clock) = common::create_test_resources("2025-03-01T07:30:00Z")
        .await
        .unwrap();
    let stranger = resources
        .anonymizer
        .derive_pseudonymous_id("never-registered")
        .unwrap();

    let err = resources
        .activities()
        .log_activity(&stranger, &run(20))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    // Nothing is stored for an owner the award rejected
    assert!(resources
        .activities()
        .recent_activities(&stranger, 10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_activities_between_is_inclusive_and_newest_first() {
    for url in common::test_database_urls() {
        let (resources, clock) = common::create_test_resources_with(
            &url,
            AppConfig::for_testing(),
            "2025-03-01T07:30:00Z",
        )
        .await
        .unwrap();
        let user = common::register_user(&resources, "weekly").await.unwrap();

        // One activity per day from March 1st to March 5th
        for minutes in [10, 20, 30, 40, 50] {
            resources
                .activities()
                .log_activity(&user, &run(minutes))
                .await
                .unwrap();
            clock.advance(Duration::days(1));
        }

        let window = resources
            .activities()
            .activities_between(
                &user,
                NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            )
            .await
            .unwrap();
        let durations: Vec<_> = window.iter().map(|a| a.duration_minutes).collect();
        assert_eq!(durations, vec![40, 30, 20], "{url}");

        let err = resources
            .activities()
            .activities_between(
                &user,
                NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput, "{url}");
    }
}

#[tokio::test]
async fn test_recent_activities_newest_first_and_limited() {
    for url in common::test_database_urls() {
        let (resources, clock) = common::create_test_resources_with(
            &url,
            AppConfig::for_testing(),
            "2025-03-01T07:30:00Z",
        )
        .await
        .unwrap();
        let user = common::register_user(&resources, "regular").await.unwrap();

        for minutes in [10, 20, 30, 40] {
            resources
                .activities()
                .log_activity(&user, &run(minutes))
                .await
                .unwrap();
            clock.advance(Duration::hours(3));
        }

        let recent = resources
            .activities()
            .recent_activities(&user, 3)
            .await
            .unwrap();
        let durations: Vec<_> = recent.iter().map(|a| a.duration_minutes).collect();
        assert_eq!(durations, vec![40, 30, 20], "{url}");
    }
}
