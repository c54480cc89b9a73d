//! Parallel job execution and the run summary.

use std::error::Error;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use gf_core::Hru;
use gf_forcing::{DailyNormals, EvapSource, InputDocument, assemble, builtin_monthly};
use gf_params::{ParamTables, builtin};
use gf_publish::publish;
use gf_runner::{RunoffSolver, run_batch};
use gf_store::{ObjectStore, StoreError};
use rand::Rng;
use rayon::prelude::*;
use tracing::info;

use crate::gather::JobSpec;
use crate::{DispatchError, DispatchResult};

/// Half the available cores, at least two.
pub fn default_workers() -> usize {
    let cores = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    cores.div_ceil(2).max(2)
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Concurrent jobs. Capped at the batch size when smaller.
    pub workers: usize,
    /// Upload threads within each job.
    pub upload_workers: usize,
    /// Upper bound for the random delay before a job's first store request.
    /// Zero disables the jitter.
    pub jitter_ms: u64,
    /// `None` runs every HRU in the reference tables.
    pub hrus: Option<Vec<Hru>>,
}

impl Default for RunOptions {
    fn default() -> Self {
        let workers = default_workers();
        Self {
            workers,
            upload_workers: workers,
            jitter_ms: 0,
            hrus: None,
        }
    }
}

/// Wall and stage timing for one completed job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobTiming {
    pub input_path: String,
    pub compute_seconds: f64,
    pub upload_seconds: f64,
}

/// Callback invoked from pool threads as each job completes.
pub type ProgressFn<'a> = &'a (dyn Fn(&JobTiming) + Sync);

/// A job that never produced results: bad input document, missing blob,
/// misaligned series. Solver failures are not job failures; they land in
/// the published per-HRU records instead.
#[derive(Debug, Clone, PartialEq)]
pub struct JobFailure {
    pub input_path: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub timings: Vec<JobTiming>,
    pub failures: Vec<JobFailure>,
    /// HRUs simulated per job, for per-HRU normalization.
    pub hru_count: usize,
    pub wall_seconds: f64,
}

impl RunSummary {
    pub fn jobs(&self) -> usize {
        self.timings.len() + self.failures.len()
    }

    /// Mean compute + upload seconds across completed jobs.
    pub fn avg_job_seconds(&self) -> f64 {
        mean(self.timings.iter().map(|t| t.compute_seconds + t.upload_seconds))
    }

    pub fn avg_compute_seconds(&self) -> f64 {
        mean(self.timings.iter().map(|t| t.compute_seconds))
    }

    pub fn avg_upload_seconds(&self) -> f64 {
        mean(self.timings.iter().map(|t| t.upload_seconds))
    }

    pub fn wall_seconds_per_job(&self) -> f64 {
        if self.jobs() == 0 {
            return 0.0;
        }
        self.wall_seconds / self.jobs() as f64
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

/// Run every job across a bounded pool and publish as each one finishes.
///
/// Job errors are collected into the summary, never propagated: one broken
/// input file must not take down a batch that is hours into its work. The
/// only `Err` this returns is a pool that would not start. When `progress`
/// is given it is called from pool threads with each finished job's timing.
pub fn run_all<S, V>(
    store: &S,
    solver: &V,
    jobs: &[JobSpec],
    options: &RunOptions,
    progress: Option<ProgressFn<'_>>,
) -> DispatchResult<RunSummary>
where
    S: ObjectStore + ?Sized,
    V: RunoffSolver + ?Sized,
{
    let tables = builtin();
    let hrus: Vec<Hru> = match &options.hrus {
        Some(list) => list.clone(),
        None => tables.all_hrus(),
    };

    let started = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers.min(jobs.len()).max(1))
        .build()?;
    let outcomes: Vec<Result<JobTiming, JobFailure>> = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                let result = run_one_job(store, solver, tables, job, &hrus, options).map_err(
                    |err| JobFailure {
                        input_path: job.input_path.clone(),
                        error: error_chain(&err),
                    },
                );
                if let Ok(timing) = &result
                    && let Some(notify) = progress
                {
                    notify(timing);
                }
                result
            })
            .collect()
    });

    let mut summary = RunSummary {
        hru_count: hrus.len(),
        ..RunSummary::default()
    };
    for outcome in outcomes {
        match outcome {
            Ok(timing) => summary.timings.push(timing),
            Err(failure) => summary.failures.push(failure),
        }
    }
    summary.wall_seconds = started.elapsed().as_secs_f64();
    Ok(summary)
}

fn run_one_job<S, V>(
    store: &S,
    solver: &V,
    tables: &ParamTables,
    job: &JobSpec,
    hrus: &[Hru],
    options: &RunOptions,
) -> DispatchResult<JobTiming>
where
    S: ObjectStore + ?Sized,
    V: RunoffSolver + ?Sized,
{
    if options.jitter_ms > 0 {
        let delay = rand::thread_rng().gen_range(0..=options.jitter_ms);
        std::thread::sleep(Duration::from_millis(delay));
    }

    let compute_started = Instant::now();
    let doc = InputDocument::from_value(store.get_json(&job.input_path)?)?;
    let window = doc.window(&job.model, &job.gridcell)?;
    // A document that supplies its own PET series never consults the
    // normals, so don't fetch them; a broken normals document must only
    // fail the jobs that would read it.
    let normals = match doc.petinp_mm() {
        Some(_) => None,
        None => fetch_daily_normals(store, &job.model)?,
    };
    let source = select_evap_source(&doc, normals.as_ref(), &job.gridcell);
    let forcing = assemble(doc.prec_mm(), source, &window)?;
    let results = run_batch(solver, &forcing, &window, hrus, tables)?;
    let compute_seconds = compute_started.elapsed().as_secs_f64();

    let published = publish(store, &window, &results, options.upload_workers)?;
    let failed = results.values().filter(|outcome| outcome.is_failure()).count();
    info!(
        input = %job.input_path,
        compute_seconds,
        upload_seconds = published.seconds,
        failed_hrus = failed,
        "job complete"
    );
    Ok(JobTiming {
        input_path: job.input_path.clone(),
        compute_seconds,
        upload_seconds: published.seconds,
    })
}

/// The model's per-cell daily PET normals if the reference document exists.
/// Its absence is the normal case for models that rely on the embedded
/// monthly climatology.
fn fetch_daily_normals<S>(store: &S, model: &str) -> DispatchResult<Option<DailyNormals>>
where
    S: ObjectStore + ?Sized,
{
    let path = format!("{model}/pet_mm_daily.json");
    match store.get_json(&path) {
        Ok(value) => Ok(Some(DailyNormals::from_value(value)?)),
        Err(StoreError::NotFound { .. }) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Selection order: a PET series supplied by the input document wins, then
/// the model's daily normals, then the embedded monthly normals. A daily
/// table that lacks this grid cell's column fails the job rather than
/// silently degrading to the climatology.
fn select_evap_source<'a>(
    doc: &'a InputDocument,
    normals: Option<&'a DailyNormals>,
    gridcell: &'a str,
) -> EvapSource<'a> {
    if let Some(daily_mm) = doc.petinp_mm() {
        return EvapSource::Supplied { daily_mm };
    }
    if let Some(table) = normals {
        return EvapSource::Daily { table, gridcell };
    }
    EvapSource::Monthly(builtin_monthly())
}

fn error_chain(err: &DispatchError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str("\ncaused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
