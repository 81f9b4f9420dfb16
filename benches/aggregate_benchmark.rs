use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use hours_board::format::progress_label;
use hours_board::models::{LeaderboardRow, PresenceStatus, TimeEntry};
use hours_board::services::aggregate::{daily_aggregate, daily_sessions};
use hours_board::services::leaderboard::sort_rows;
use std::hint::black_box;

fn busy_day() -> Vec<TimeEntry> {
    let day = Utc.with_ymd_and_hms(2024, 3, 5, 13, 0, 0).unwrap();

    // A heavy day: 200 short closed entries and one running timer
    let mut entries: Vec<TimeEntry> = (0..200)
        .map(|i| {
            let start = day + Duration::minutes(i * 3);
            TimeEntry {
                id: i as u64,
                start,
                stop: Some(start + Duration::seconds(150)),
                duration: 150,
                description: Some(format!("ticket #{}", i)),
                project_id: Some(7),
                tags: None,
                server_deleted_at: None,
            }
        })
        .collect();

    let running_start = day + Duration::hours(10);
    entries.push(TimeEntry {
        id: 1_000,
        start: running_start,
        stop: None,
        duration: -running_start.timestamp(),
        description: None,
        project_id: None,
        tags: None,
        server_deleted_at: None,
    });
    entries
}

fn benchmark_aggregate(c: &mut Criterion) {
    let entries = busy_day();
    let now = Utc.with_ymd_and_hms(2024, 3, 5, 23, 30, 0).unwrap();

    let mut group = c.benchmark_group("daily_aggregate");

    group.bench_function("totals", |b| {
        b.iter(|| daily_aggregate(black_box(&entries), now))
    });

    group.bench_function("sessions", |b| {
        b.iter(|| daily_sessions(black_box(&entries), chrono_tz::America::New_York, now))
    });

    group.finish();
}

fn benchmark_sort(c: &mut Criterion) {
    let rows: Vec<LeaderboardRow> = (0..500)
        .map(|i| {
            let hours = ((i * 37) % 120) as f64 / 10.0;
            LeaderboardRow {
                id: format!("user-{}", i),
                name: format!("User {}", i),
                avatar: None,
                team: "Team".to_string(),
                status: PresenceStatus::Away,
                hours_today: hours,
                formatted_hours: String::new(),
                progress: progress_label(hours),
            }
        })
        .collect();

    c.bench_function("sort_rows_500", |b| {
        b.iter(|| {
            let mut rows = rows.clone();
            sort_rows(black_box(&mut rows));
            rows
        })
    });
}

criterion_group!(benches, benchmark_aggregate, benchmark_sort);
criterion_main!(benches);
