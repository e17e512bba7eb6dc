use athletex_api::models::daily_log::sort_most_recent_first;
use athletex_api::models::{DailyLog, WeeklySummary};
use chrono::{Duration, NaiveDate, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// A year of daily logs for one athlete, in storage (unsorted) order.
fn year_of_logs() -> Vec<DailyLog> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let now = Utc::now();
    (0..365)
        .map(|i| DailyLog {
            id: format!("log-{}", i),
            athlete_id: "athlete".to_string(),
            // Interleave days so sorting has work to do
            date: start + Duration::days((i * 7919) % 365),
            knee_pain: (i % 11) as i32,
            leg_freshness: ((i + 3) % 11) as i32,
            sleep_hours: 6.0 + (i % 4) as f64 * 0.5,
            training_intensity: ((i + 5) % 11) as i32,
            acl_injury_score: (i % 100) as f64,
            stiffness_level: ((i + 7) % 11) as i32,
            calorie_intake: 1800.0 + (i % 9) as f64 * 100.0,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

fn benchmark_weekly_summary(c: &mut Criterion) {
    let logs = year_of_logs();
    let mut sorted = logs.clone();
    sort_most_recent_first(&mut sorted);

    let mut group = c.benchmark_group("weekly_summary");

    group.bench_function("presorted_history", |b| {
        b.iter(|| WeeklySummary::from_recent_logs(black_box(&sorted)))
    });

    group.bench_function("sort_then_summarize", |b| {
        b.iter(|| {
            let mut logs = black_box(logs.clone());
            sort_most_recent_first(&mut logs);
            WeeklySummary::from_recent_logs(&logs)
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_weekly_summary);
criterion_main!(benches);
