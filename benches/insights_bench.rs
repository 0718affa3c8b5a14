// ABOUTME: Criterion benchmarks for progress, insight, and daily upsert paths
// ABOUTME: Measures rule evaluation over history windows and in-memory aggregate merges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Body Echo contributors

//! Criterion benchmarks for the intelligence engines and the daily upsert path.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

use std::sync::Arc;

use body_echo::anonymization::IdentityAnonymizer;
use body_echo::calendar::SystemClock;
use body_echo::config::environment::{AppConfig, DatabaseUrl};
use body_echo::database_plugins::factory::Database;
use body_echo::intelligence::{InsightEngine, ProgressCalculator};
use body_echo::models::{DailyMetric, GoalThresholds, MetricId, MetricUpdate, MetricValues};
use body_echo::resources::AppResources;
use chrono::{Days, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn generate_history(days: u32) -> Vec<DailyMetric> {
    let owner = IdentityAnonymizer::new()
        .derive_pseudonymous_id("bench-user")
        .unwrap_or_else(|e| panic!("bench owner: {e}"));
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let now = Utc::now();
    (0..days)
        .map(|index| DailyMetric {
            id: MetricId::new(),
            owner_key: owner.clone(),
            date: start
                .checked_add_days(Days::new(u64::from(index)))
                .unwrap_or(start),
            values: MetricValues {
                steps: (index * 977) % 15_000,
                water_liters: f64::from(index % 4) * 0.75,
                calories: 1_500 + (index * 37) % 1_500,
                sleep_quality: u8::try_from((index * 13) % 101).unwrap_or(100),
            },
            created_at: now,
            updated_at: now,
        })
        .collect()
}

fn bench_insights(c: &mut Criterion) {
    let engine = InsightEngine::new();
    let goals = GoalThresholds::default();
    let now = Utc::now();

    let mut group = c.benchmark_group("insights");
    let single = MetricValues {
        steps: 4_000,
        water_liters: 1.0,
        calories: 1_800,
        sleep_quality: 60,
    };
    group.bench_function("single_day", |b| {
        b.iter(|| engine.generate_insights(black_box(&single), &goals, now));
    });
    group.bench_function("daily_progress", |b| {
        b.iter(|| ProgressCalculator::daily_progress(black_box(&single), &goals));
    });

    for days in [7_u32, 30, 365] {
        let history = generate_history(days);
        group.throughput(Throughput::Elements(u64::from(days)));
        group.bench_with_input(BenchmarkId::new("history", days), &history, |b, history| {
            b.iter(|| engine.evaluate_history(black_box(history), &goals, now));
        });
    }
    group.finish();
}

fn bench_upsert(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| panic!("runtime: {e}"));
    let resources = runtime.block_on(async {
        let database = Database::from_url(&DatabaseUrl::Memory)
            .await
            .unwrap_or_else(|e| panic!("database: {e}"));
        AppResources::builder()
            .with_config(AppConfig::for_testing())
            .with_database(database)
            .with_clock(Arc::new(SystemClock))
            .build()
            .unwrap_or_else(|e| panic!("resources: {e}"))
    });
    let service = resources.daily_metrics();
    let owner = resources
        .anonymizer
        .derive_pseudonymous_id("bench-upsert")
        .unwrap_or_else(|e| panic!("owner: {e}"));

    c.bench_function("upsert_today/merge", |b| {
        b.to_async(&runtime).iter(|| async {
            service
                .upsert_today(&owner, &MetricUpdate::new().steps(black_box(1_234)))
                .await
        });
    });
}

criterion_group!(benches, bench_insights, bench_upsert);
criterion_main!(benches);
