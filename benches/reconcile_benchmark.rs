use clog_tracker::adapters::chat::parse_kill_count;
use clog_tracker::models::{ItemObservation, SourceEvent};
use clog_tracker::services::{ProgressStore, SourceReconciler};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn kill(activity: &str, kc: u32) -> [SourceEvent; 2] {
    [
        SourceEvent::TextNotification {
            activity: activity.to_string(),
            total_count: kc,
        },
        SourceEvent::ApproximateCompletion {
            activity: activity.to_string(),
        },
    ]
}

fn benchmark_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    group.bench_function("paired_kill_events", |b| {
        let reconciler = SourceReconciler::new(ProgressStore::new());
        let mut kc = 0;
        b.iter(|| {
            kc += 1;
            for event in kill("Zulrah", kc) {
                reconciler.submit(black_box(event));
            }
        })
    });

    // A large collection log page, as scraped
    let page = SourceEvent::FullStateObservation {
        activity: "Chambers of Xeric".to_string(),
        total_count: 1_000,
        items: (0..64)
            .map(|i| ItemObservation::new(format!("Item {}", i), i % 3 == 0))
            .collect(),
    };
    group.bench_function("full_state_page", |b| {
        let reconciler = SourceReconciler::new(ProgressStore::new());
        b.iter(|| reconciler.apply(black_box(page.clone())))
    });

    group.bench_function("snapshot_many_activities", |b| {
        let reconciler = SourceReconciler::new(ProgressStore::new());
        for i in 0..500 {
            for event in kill(&format!("Activity {}", i), 100 + i) {
                reconciler.submit(event);
            }
        }
        b.iter(|| black_box(reconciler.snapshot()))
    });

    group.finish();
}

fn benchmark_chat_parse(c: &mut Criterion) {
    c.bench_function("parse_kill_count", |b| {
        b.iter(|| parse_kill_count(black_box("Your completion count for Chambers of Xeric is: 1,050.")))
    });
}

criterion_group!(benches, benchmark_reconcile, benchmark_chat_parse);
criterion_main!(benches);
