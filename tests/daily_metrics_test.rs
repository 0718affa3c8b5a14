// ABOUTME: Integration tests for daily metric aggregate upserts against every storage backend
// ABOUTME: Covers idempotence, field-level merge, day boundaries, history windows, and races
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use body_echo::{
    anonymization::IdentityAnonymizer,
    calendar::Clock,
    config::environment::AppConfig,
    database_plugins::DatabaseProvider,
    errors::ErrorCode,
    models::{InsightKind, MetricUpdate, PseudonymousId, UnsavedDailyMetric},
};
use chrono::{Duration, NaiveDate};

fn owner(seed: &str) -> PseudonymousId {
    IdentityAnonymizer::new().derive_pseudonymous_id(seed).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_upsert_is_idempotent() {
    for url in common::test_database_urls() {
        let (resources, _clock) = common::create_test_resources_with(
            &url,
            AppConfig::for_testing(),
            "2025-03-01T09:00:00Z",
        )
        .await
        .unwrap();
        let service = resources.daily_metrics();
        let user = owner("idempotent");
        let update = MetricUpdate::new().steps(100);

        let first = service.upsert_today(&user, &update).await.unwrap();
        let second = service.upsert_today(&user, &update).await.unwrap();

        assert_eq!(first.id, second.id, "{url}");
        assert_eq!(second.values.steps, 100, "{url}");
        let stored = service
            .history(&user, date(2025, 3, 1), date(2025, 3, 1))
            .await
            .unwrap();
        assert_eq!(stored.len(), 1, "{url}");
    }
}

#[tokio::test]
async fn test_partial_updates_merge_fields() {
    for url in common::test_database_urls() {
        let (resources, clock) = common::create_test_resources_with(
            &url,
            AppConfig::for_testing(),
            "2025-03-01T09:00:00Z",
        )
        .await
        .unwrap();
        let service = resources.daily_metrics();
        let user = owner("merger");

        let created = service
            .upsert_today(&user, &MetricUpdate::new().steps(100))
            .await
            .unwrap();
        assert_eq!(created.values.water_liters, 0.0);
        assert_eq!(created.values.calories, 0);
        assert_eq!(created.values.sleep_quality, 0);
        assert_eq!(created.created_at, created.updated_at);

        clock.advance(Duration::minutes(30));
        let merged = service
            .upsert_today(&user, &MetricUpdate::new().water_liters(1.5))
            .await
            .unwrap();

        assert_eq!(merged.id, created.id, "{url}");
        assert_eq!(merged.values.steps, 100, "{url}");
        assert_eq!(merged.values.water_liters, 1.5, "{url}");
        assert_eq!(merged.created_at, created.created_at, "{url}");
        assert_eq!(merged.updated_at, clock.now(), "{url}");
    }
}

#[tokio::test]
async fn test_writes_do_not_cross_midnight() {
    for url in common::test_database_urls() {
        let (resources, clock) = common::create_test_resources_with(
            &url,
            AppConfig::for_testing(),
            "2025-03-01T23:59:00Z",
        )
        .await
        .unwrap();
        let service = resources.daily_metrics();
        let user = owner("night-owl");

        let late = service
            .upsert_today(&user, &MetricUpdate::new().steps(9_000))
            .await
            .unwrap();
        clock.advance(Duration::minutes(2));
        let early = service
            .upsert_today(&user, &MetricUpdate::new().water_liters(0.3))
            .await
            .unwrap();

        assert_ne!(late.id, early.id, "{url}");
        assert_eq!(late.date, date(2025, 3, 1));
        assert_eq!(early.date, date(2025, 3, 2));
        assert_eq!(early.values.steps, 0, "{url}");

        let days = service
            .history(&user, date(2025, 3, 1), date(2025, 3, 2))
            .await
            .unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].values.steps, 9_000);
        assert_eq!(days[0].values.water_liters, 0.0);
    }
}

#[tokio::test]
async fn test_local_offset_decides_the_day() {
    let config = AppConfig {
        utc_offset_minutes: 180,
        ..AppConfig::for_testing()
    };
    // 20:59Z is 23:59 at UTC+3
    let (resources, clock) = common::create_test_resources_with(
        &config.database.clone(),
        config,
        "2025-03-01T20:59:00Z",
    )
    .await
    .unwrap();
    let service = resources.daily_metrics();
    let user = owner("istanbul");

    let before = service
        .upsert_today(&user, &MetricUpdate::new().steps(1))
        .await
        .unwrap();
    clock.advance(Duration::minutes(2));
    let after = service
        .upsert_today(&user, &MetricUpdate::new().steps(2))
        .await
        .unwrap();

    assert_eq!(before.date, date(2025, 3, 1));
    assert_eq!(after.date, date(2025, 3, 2));
}

#[tokio::test]
async fn test_invalid_updates_rejected_without_writing() {
    let (resources, _clock) = common::create_test_resources("2025-03-01T09:00:00Z")
        .await
        .unwrap();
    let service = resources.daily_metrics();
    let user = owner("invalid");

    for update in [
        MetricUpdate::new(),
        MetricUpdate::new().water_liters(-0.5),
        MetricUpdate::new().water_liters(f64::NAN),
        MetricUpdate::new().sleep_quality(101),
    ] {
        let err = service.upsert_today(&user, &update).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
    assert!(service.today_metric(&user).await.unwrap().is_none());
}

#[tokio::test]
async fn test_history_is_inclusive_and_ordered() {
    for url in common::test_database_urls() {
        let (resources, clock) = common::create_test_resources_with(
            &url,
            AppConfig::for_testing(),
            "2025-03-01T12:00:00Z",
        )
        .await
        .unwrap();
        let service = resources.daily_metrics();
        let user = owner("historian");
        let other = owner("someone-else");

        for day in 0..5u32 {
            service
                .upsert_today(&user, &MetricUpdate::new().steps(1_000 * (day + 1)))
                .await
                .unwrap();
            service
                .upsert_today(&other, &MetricUpdate::new().steps(1))
                .await
                .unwrap();
            clock.advance(Duration::days(1));
        }

        let window = service
            .history(&user, date(2025, 3, 2), date(2025, 3, 4))
            .await
            .unwrap();
        let dates: Vec<_> = window.iter().map(|m| m.date).collect();
        assert_eq!(
            dates,
            vec![date(2025, 3, 2), date(2025, 3, 3), date(2025, 3, 4)],
            "{url}"
        );
        assert!(window.iter().all(|m| m.owner_key == user));
        assert_eq!(window[0].values.steps, 2_000);

        let err = service
            .history(&user, date(2025, 3, 4), date(2025, 3, 2))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}

#[tokio::test]
async fn test_store_upsert_creates_once_then_merges() {
    for url in common::test_database_urls() {
        let database = common::create_test_database(&url).await.unwrap();
        let user = owner("racer");
        let created_at = common::instant("2025-03-01T09:00:00Z");
        let later = common::instant("2025-03-01T11:00:00Z");
        let day = date(2025, 3, 1);

        let steps = MetricUpdate::new().steps(3_000);
        let first = database
            .upsert_daily_metric(
                UnsavedDailyMetric::from_update(user.clone(), day, &steps, created_at),
                &steps,
            )
            .await
            .unwrap();
        assert!(first.created, "{url}");

        let water = MetricUpdate::new().water_liters(1.25);
        let second = database
            .upsert_daily_metric(
                UnsavedDailyMetric::from_update(user.clone(), day, &water, later),
                &water,
            )
            .await
            .unwrap();
        assert!(!second.created, "{url}");
        assert_eq!(second.metric.id, first.metric.id, "{url}");
        assert_eq!(second.metric.values.steps, 3_000, "{url}");
        assert_eq!(second.metric.values.water_liters, 1.25, "{url}");
        assert_eq!(second.metric.created_at, created_at, "{url}");
        assert_eq!(second.metric.updated_at, later, "{url}");

        // An empty update leaves the stored row as it was
        let untouched = database
            .upsert_daily_metric(
                UnsavedDailyMetric::new(user.clone(), day, common::instant("2025-03-01T20:00:00Z")),
                &MetricUpdate::new(),
            )
            .await
            .unwrap();
        assert!(!untouched.created, "{url}");
        assert_eq!(untouched.metric, second.metric, "{url}");
    }
}

#[tokio::test]
async fn test_ensure_today_keeps_existing_values() {
    for url in common::test_database_urls() {
        let (resources, _clock) = common::create_test_resources_with(
            &url,
            AppConfig::for_testing(),
            "2025-03-01T09:00:00Z",
        )
        .await
        .unwrap();
        let service = resources.daily_metrics();
        let user = owner("early-logger");
        let logged = service
            .upsert_today(&user, &MetricUpdate::new().steps(2_500))
            .await
            .unwrap();

        let ensured = service.ensure_today(&user).await.unwrap();
        assert_eq!(ensured, logged, "{url}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_on_new_day_are_not_lost() {
    for url in common::test_database_urls() {
        let (resources, _clock) = common::create_test_resources_with(
            &url,
            AppConfig::for_testing(),
            "2025-03-01T09:00:00Z",
        )
        .await
        .unwrap();

        for round in 0..25 {
            let user = owner(&format!("fresh-day-{round}"));
            let steps = {
                let service = resources.daily_metrics();
                let user = user.clone();
                tokio::spawn(async move {
                    service
                        .upsert_today(&user, &MetricUpdate::new().steps(100))
                        .await
                })
            };
            let water = {
                let service = resources.daily_metrics();
                let user = user.clone();
                tokio::spawn(async move {
                    service
                        .upsert_today(&user, &MetricUpdate::new().water_liters(1.5))
                        .await
                })
            };
            steps.await.unwrap().unwrap();
            water.await.unwrap().unwrap();

            let stored = resources
                .daily_metrics()
                .today_metric(&user)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(stored.values.steps, 100, "{url} round {round}");
            assert_eq!(stored.values.water_liters, 1.5, "{url} round {round}");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_field_updates_are_not_lost() {
    for url in common::test_database_urls() {
        let (resources, _clock) = common::create_test_resources_with(
            &url,
            AppConfig::for_testing(),
            "2025-03-01T09:00:00Z",
        )
        .await
        .unwrap();
        let user = owner("concurrent");
        resources.daily_metrics().ensure_today(&user).await.unwrap();

        let updates = [
            MetricUpdate::new().steps(7_777),
            MetricUpdate::new().water_liters(2.25),
            MetricUpdate::new().calories(1_900),
            MetricUpdate::new().sleep_quality(88),
        ];
        let handles: Vec<_> = updates
            .into_iter()
            .map(|update| {
                let service = resources.daily_metrics();
                let user = user.clone();
                tokio::spawn(async move { service.upsert_today(&user, &update).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = resources
            .daily_metrics()
            .today_metric(&user)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.values.steps, 7_777, "{url}");
        assert_eq!(stored.values.water_liters, 2.25, "{url}");
        assert_eq!(stored.values.calories, 1_900, "{url}");
        assert_eq!(stored.values.sleep_quality, 88, "{url}");
    }
}

#[tokio::test]
async fn test_today_summary_for_empty_day() {
    let (resources, _clock) = common::create_test_resources("2025-03-01T09:00:00Z")
        .await
        .unwrap();
    let summary = resources
        .daily_metrics()
        .today_summary(&owner("nothing-yet"))
        .await
        .unwrap();

    assert_eq!(summary.date, date(2025, 3, 1));
    assert_eq!(summary.progress.steps, 0.0);
    let kinds: Vec<_> = summary.insights.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![InsightKind::Suggestion, InsightKind::Warning]);
}

#[tokio::test]
async fn test_today_summary_reports_unclamped_progress() {
    let (resources, _clock) = common::create_test_resources("2025-03-01T09:00:00Z")
        .await
        .unwrap();
    let service = resources.daily_metrics();
    let user = owner("overachiever");
    service
        .upsert_today(
            &user,
            &MetricUpdate::new().steps(12_000).sleep_quality(90),
        )
        .await
        .unwrap();

    let summary = service.today_summary(&user).await.unwrap();
    assert_eq!(summary.progress.steps, 1.2);
    assert_eq!(summary.insights.len(), 1);
    assert_eq!(summary.insights[0].kind, InsightKind::Achievement);
}

#[tokio::test]
async fn test_history_insights_per_day() {
    let (resources, clock) = common::create_test_resources("2025-03-01T09:00:00Z")
        .await
        .unwrap();
    let service = resources.daily_metrics();
    let user = owner("weekly");

    service
        .upsert_today(&user, &MetricUpdate::new().steps(4_000).sleep_quality(60))
        .await
        .unwrap();
    clock.advance(Duration::days(1));
    service
        .upsert_today(&user, &MetricUpdate::new().steps(11_000).sleep_quality(90))
        .await
        .unwrap();

    let history = service
        .history_insights(&user, date(2025, 3, 1), date(2025, 3, 2))
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].insights.len(), 2);
    assert_eq!(history[1].insights.len(), 1);
    assert_eq!(history[1].insights[0].kind, InsightKind::Achievement);
}
