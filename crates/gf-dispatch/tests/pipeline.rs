use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use gf_core::{Hru, SimInfo};
use gf_dispatch::{JobTiming, RunOptions, error_markers, gather, run_all};
use gf_hydro::StorageSolver;
use gf_runner::{
    ImperviousBundle, PerviousBundle, RunoffSolver, SolverError, SolverReport, SolverResult,
};
use gf_store::{MemStore, ObjectStore};
use serde_json::{Value, json};

fn hru(code: &str) -> Hru {
    code.parse().expect("test hru code")
}

fn options(hrus: &[&str]) -> RunOptions {
    RunOptions {
        workers: 2,
        upload_workers: 2,
        jitter_ms: 0,
        hrus: Some(hrus.iter().map(|code| hru(code)).collect()),
    }
}

/// One day of hourly input. The 23-hour extension of end_time still loses
/// the trailing partial day to whole-day truncation, so a next-day end_time
/// yields a 24-step window covering the start day only.
fn seed_input(store: &MemStore, model: &str, cell: &str) -> String {
    let path = format!("{model}/inputs/{cell}-tmax-precip-input.json");
    let mut prec = vec![2.0; 12];
    prec.extend(vec![0.0; 12]);
    store
        .put_json(
            &path,
            &json!({
                "start_time": "2001-01-01 00:00:00",
                "end_time": "2001-01-02 00:00:00",
                "prec": {"data": prec},
            }),
        )
        .expect("failed to seed input");
    path
}

#[test]
fn end_to_end_run_publishes_artifacts() {
    let store = MemStore::new();
    seed_input(&store, "WRF-NARR_HIS", "R17C42");
    seed_input(&store, "WRF-NARR_HIS", "R18C42");
    seed_input(&store, "CanESM2_RCP85", "R17C42");

    let jobs = gather(&store, &[], &[]).expect("gather failed");
    assert_eq!(jobs.len(), 3);

    let seen = Mutex::new(Vec::new());
    let summary = run_all(
        &store,
        &StorageSolver,
        &jobs,
        &options(&["hru000", "hru222", "hru250"]),
        Some(&|timing: &JobTiming| {
            seen.lock().unwrap().push(timing.input_path.clone());
        }),
    )
    .expect("run_all failed");

    assert_eq!(summary.timings.len(), 3);
    assert!(summary.failures.is_empty(), "{:?}", summary.failures);
    assert_eq!(summary.hru_count, 3);
    assert!(summary.wall_seconds > 0.0);

    let mut seen = seen.into_inner().unwrap();
    seen.sort_unstable();
    let mut expected: Vec<String> = jobs.iter().map(|job| job.input_path.clone()).collect();
    expected.sort_unstable();
    assert_eq!(seen, expected);

    for prefix in [
        "WRF-NARR_HIS/results/R17C42",
        "WRF-NARR_HIS/results/R18C42",
        "CanESM2_RCP85/results/R17C42",
    ] {
        for code in ["hru000", "hru222", "hru250"] {
            assert!(store.contains(&format!("{prefix}/{code}.csv")), "{prefix}/{code}.csv");
            assert!(store.contains(&format!("{prefix}/{code}.json")), "{prefix}/{code}.json");
            assert!(!store.contains(&format!("{prefix}/{code}.error")));
        }
    }

    let record: Value = serde_json::from_slice(
        &store
            .get_bytes("WRF-NARR_HIS/results/R17C42/hru222.json")
            .expect("record missing"),
    )
    .expect("record parses");
    assert_eq!(record["model"], "WRF-NARR_HIS");
    assert_eq!(record["gridcell"], "R17C42");
    assert_eq!(record["steps"], 24);
    assert_eq!(record["units"], 1);
}

#[test]
fn supplied_pet_series_and_daily_normals_are_accepted() {
    let store = MemStore::new();

    // R17C42's document carries its own PET series.
    store
        .put_json(
            "WRF-NARR_HIS/inputs/R17C42-precip-input.json",
            &json!({
                "start_time": "2001-01-01 00:00:00",
                "end_time": "2001-01-02 00:00:00",
                "prec": {"data": vec![1.0; 24]},
                "petinp": {"data": [2.5]},
            }),
        )
        .unwrap();
    // R18C42 falls back to the model's daily normals document.
    store
        .put_json(
            "WRF-NARR_HIS/inputs/R18C42-precip-input.json",
            &json!({
                "start_time": "2001-01-01 00:00:00",
                "end_time": "2001-01-02 00:00:00",
                "prec": {"data": vec![1.0; 24]},
            }),
        )
        .unwrap();
    store
        .put_json(
            "WRF-NARR_HIS/pet_mm_daily.json",
            &json!({
                "cells": ["R17C42", "R18C42"],
                "days": {"01-01": [2.0, 3.0]},
            }),
        )
        .unwrap();

    let jobs = gather(&store, &[], &[]).expect("gather failed");
    let summary = run_all(&store, &StorageSolver, &jobs, &options(&["hru222"]), None)
        .expect("run_all failed");

    assert!(summary.failures.is_empty(), "{:?}", summary.failures);
    assert_eq!(summary.timings.len(), 2);
    assert!(store.contains("WRF-NARR_HIS/results/R17C42/hru222.csv"));
    assert!(store.contains("WRF-NARR_HIS/results/R18C42/hru222.csv"));
}

#[test]
fn supplied_pet_jobs_never_read_the_normals_document() {
    let store = MemStore::new();
    // A supplied series wins source selection, so this job must succeed
    // even though the model's normals document is garbage.
    store
        .put_json(
            "WRF-NARR_HIS/inputs/R17C42-precip-input.json",
            &json!({
                "start_time": "2001-01-01 00:00:00",
                "end_time": "2001-01-02 00:00:00",
                "prec": {"data": vec![1.0; 24]},
                "petinp": {"data": [2.5]},
            }),
        )
        .unwrap();
    // Only this job reads the normals, and only it may fail.
    store
        .put_json(
            "WRF-NARR_HIS/inputs/R18C42-precip-input.json",
            &json!({
                "start_time": "2001-01-01 00:00:00",
                "end_time": "2001-01-02 00:00:00",
                "prec": {"data": vec![1.0; 24]},
            }),
        )
        .unwrap();
    store
        .put_json("WRF-NARR_HIS/pet_mm_daily.json", &json!({"oops": true}))
        .unwrap();

    let jobs = gather(&store, &[], &[]).expect("gather failed");
    let summary = run_all(&store, &StorageSolver, &jobs, &options(&["hru222"]), None)
        .expect("run_all failed");

    assert_eq!(summary.timings.len(), 1);
    assert_eq!(
        summary.timings[0].input_path,
        "WRF-NARR_HIS/inputs/R17C42-precip-input.json"
    );
    assert!(store.contains("WRF-NARR_HIS/results/R17C42/hru222.csv"));

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(
        summary.failures[0].input_path,
        "WRF-NARR_HIS/inputs/R18C42-precip-input.json"
    );
    assert!(summary.failures[0].error.contains("cells"), "{}", summary.failures[0].error);
}

#[test]
fn broken_input_fails_its_job_and_spares_the_rest() {
    let store = MemStore::new();
    seed_input(&store, "WRF-NARR_HIS", "R17C42");
    // 10 samples for a 24-step window: misaligned, must fail the job
    store
        .put_json(
            "WRF-NARR_HIS/inputs/R18C42-precip-input.json",
            &json!({
                "start_time": "2001-01-01 00:00:00",
                "end_time": "2001-01-02 00:00:00",
                "prec": {"data": vec![0.0; 10]},
            }),
        )
        .unwrap();

    let jobs = gather(&store, &[], &[]).expect("gather failed");
    let summary = run_all(&store, &StorageSolver, &jobs, &options(&["hru250"]), None)
        .expect("run_all failed");

    assert_eq!(summary.timings.len(), 1);
    assert_eq!(summary.failures.len(), 1);
    let failure = &summary.failures[0];
    assert_eq!(
        failure.input_path,
        "WRF-NARR_HIS/inputs/R18C42-precip-input.json"
    );
    assert!(failure.error.contains("prec"), "{}", failure.error);

    // the healthy job still published
    assert!(store.contains("WRF-NARR_HIS/results/R17C42/hru250.csv"));
    assert!(!store.contains("WRF-NARR_HIS/results/R18C42/hru250.csv"));
}

/// Fails every pervious run until flipped healthy; impervious runs always
/// succeed. Exercises the marker retraction path end to end.
struct FlakySolver {
    healthy: AtomicBool,
}

impl RunoffSolver for FlakySolver {
    fn run_pervious(
        &self,
        info: &SimInfo,
        bundle: &mut PerviousBundle,
    ) -> SolverResult<SolverReport> {
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(SolverError::Other("solver offline".to_string()));
        }
        bundle.surface_runoff = Some(vec![0.125; info.steps]);
        Ok(SolverReport::default())
    }

    fn run_impervious(
        &self,
        info: &SimInfo,
        bundle: &mut ImperviousBundle,
    ) -> SolverResult<SolverReport> {
        bundle.surface_runoff = Some(vec![0.25; info.steps]);
        Ok(SolverReport::default())
    }
}

#[test]
fn rerun_after_fix_retracts_failure_markers() {
    let store = MemStore::new();
    seed_input(&store, "WRF-NARR_HIS", "R17C42");
    let jobs = gather(&store, &[], &[]).expect("gather failed");
    let solver = FlakySolver {
        healthy: AtomicBool::new(false),
    };
    let opts = options(&["hru000", "hru250"]);

    let summary = run_all(&store, &solver, &jobs, &opts, None).expect("run_all failed");
    // a solver failure is an HRU outcome, not a job failure
    assert!(summary.failures.is_empty());
    assert!(store.contains("WRF-NARR_HIS/results/R17C42/hru000.error"));
    assert!(store.contains("WRF-NARR_HIS/results/R17C42/hru250.csv"));
    assert_eq!(
        error_markers(&store, &[], &[]).expect("listing failed"),
        vec!["WRF-NARR_HIS/results/R17C42/hru000.error"]
    );

    solver.healthy.store(true, Ordering::SeqCst);
    run_all(&store, &solver, &jobs, &opts, None).expect("rerun failed");

    assert!(!store.contains("WRF-NARR_HIS/results/R17C42/hru000.error"));
    assert!(store.contains("WRF-NARR_HIS/results/R17C42/hru000.csv"));
    assert!(store.contains("WRF-NARR_HIS/results/R17C42/hru000.json"));
    assert!(error_markers(&store, &[], &[]).expect("listing failed").is_empty());
}

#[test]
fn empty_batch_runs_cleanly() {
    let store = MemStore::new();
    let summary = run_all(&store, &StorageSolver, &[], &RunOptions::default(), None)
        .expect("run_all failed");
    assert_eq!(summary.jobs(), 0);
    assert_eq!(summary.wall_seconds_per_job(), 0.0);
}
