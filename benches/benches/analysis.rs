//! Benchmarks for the analysis pipeline.
//!
//! Performance-critical paths:
//! - `extract_tasks`: normalising raw task records
//! - `project`: sort and fold over the task list
//! - `analyze`: full report, re-run after every edit

#![allow(missing_docs)]

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mjop_engine::domain::{CashInfo, Plan};
use mjop_engine::{EngineConfig, analyze, extract_tasks, project};
use serde_json::json;

/// Plan with `elements` elements of `tasks_per_element` tasks each, spread
/// over thirty years and bundled into a handful of offer groups.
fn generate_plan(elements: usize, tasks_per_element: usize) -> Plan {
    let elements: Vec<_> = (0..elements)
        .map(|e| {
            let tasks: Vec<_> = (0..tasks_per_element)
                .map(|t| {
                    let n = e * tasks_per_element + t;
                    let year = 2024 + (n * 7) % 30;
                    let month = (n * 5) % 12 + 1;
                    let mut task = json!({
                        "id": format!("t{n}"),
                        "urgency": n % 6 + 1,
                        "planned": {
                            "workDate": format!("{year}-{month:02}-01"),
                            "offerPrice": format!("{},{:02}", 100 + n * 13 % 5000, n % 100)
                        }
                    });
                    if n % 4 == 0 {
                        task["offerGroupId"] = json!(format!("g{}", n % 10));
                    }
                    task
                })
                .collect();
            json!({"id": format!("e{e}"), "inspectionReport": [{"tasks": tasks}]})
        })
        .collect();

    let groups: Vec<_> = (0..10)
        .map(|g| {
            json!({
                "offerGroupId": format!("g{g}"),
                "name": format!("Contractor {g}"),
                "assignPricesIndividually": g % 2 == 0,
                "cost": 10_000
            })
        })
        .collect();

    serde_json::from_value(json!({
        "cashInfo": {
            "currentCash": 50_000,
            "monthlyContribution": 1_250,
            "reserveDate": "2024-01-01",
            "totalWorth": 4_000_000
        },
        "globalElements": elements,
        "offerGroups": groups
    }))
    .unwrap_or_default()
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis/extract");

    for size in [10, 100, 1000] {
        let plan = generate_plan(size / 10, 10);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{size}_tasks")),
            &plan,
            |b, plan| b.iter(|| extract_tasks(black_box(&plan.global_elements))),
        );
    }

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis/project");
    let epoch = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let cash = CashInfo::new(50_000.0, 1_250.0, epoch, 4_000_000.0);

    for size in [10, 100, 1000] {
        let tasks = extract_tasks(&generate_plan(size / 10, 10).global_elements).tasks;
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{size}_tasks")),
            &tasks,
            |b, tasks| b.iter(|| project(black_box(&cash), black_box(tasks))),
        );
    }

    group.finish();
}

fn bench_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis/full");
    let config = EngineConfig::default();

    for size in [10, 100, 1000] {
        let plan = generate_plan(size / 10, 10);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{size}_tasks")),
            &plan,
            |b, plan| b.iter(|| analyze(black_box(plan), &config)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_extraction, bench_projection, bench_full_analysis);
criterion_main!(benches);
