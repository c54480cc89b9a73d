use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gf_core::Hru;
use gf_dispatch::{
    JobSpec, JobTiming, RunOptions, RunSummary, default_workers, error_markers, gather, run_all,
};
use gf_hydro::StorageSolver;
use gf_store::FsStore;

#[derive(Parser)]
#[command(name = "gf-cli")]
#[command(about = "GridFlow CLI - Gridded HRU runoff simulation tool", long_about = None)]
struct Cli {
    /// Root directory of the result store
    #[arg(long, env = "GRIDFLOW_STORE", default_value = "climate_ts", global = true)]
    store: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List input files matching the model and grid-cell filters
    Find {
        /// Model name fragment to match (repeatable); empty matches all
        #[arg(short, long)]
        model: Vec<String>,
        /// Grid-cell name fragment to match (repeatable); empty matches all
        #[arg(short, long)]
        gridcell: Vec<String>,
    },
    /// Simulate every matching input file and upload the results
    Run {
        /// Model name fragment to match (repeatable); empty matches all
        #[arg(short, long)]
        model: Vec<String>,
        /// Grid-cell name fragment to match (repeatable); empty matches all
        #[arg(short, long)]
        gridcell: Vec<String>,
        /// HRU code to simulate (repeatable); empty runs all thirty
        #[arg(short = 'H', long)]
        hru: Vec<String>,
        /// Parallel job workers
        #[arg(short = 'n', long, default_value_t = default_workers())]
        workers: usize,
        /// Upper bound in milliseconds for each job's random start delay
        #[arg(long, default_value_t = 0)]
        jitter_ms: u64,
        /// List the matching jobs without running them
        #[arg(long)]
        dry_run: bool,
    },
    /// List failure markers left behind by earlier runs
    Errors {
        /// Model name fragment to match (repeatable); empty matches all
        #[arg(short, long)]
        model: Vec<String>,
        /// Grid-cell name fragment to match (repeatable); empty matches all
        #[arg(short, long)]
        gridcell: Vec<String>,
    },
}

type CliResult<T> = Result<T, CliError>;

/// Anything fatal to the process. Individual job and HRU failures are not
/// fatal while the run is going; they surface in the run summary and in the
/// published failure markers. A run that ends with failed jobs still exits
/// non-zero so schedulers notice.
#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Core(#[from] gf_core::CoreError),

    #[error(transparent)]
    Store(#[from] gf_store::StoreError),

    #[error(transparent)]
    Dispatch(#[from] gf_dispatch::DispatchError),

    #[error("{failed} of {jobs} jobs failed")]
    JobsFailed { failed: usize, jobs: usize },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let store = FsStore::open(cli.store)?;

    match cli.command {
        Commands::Find { model, gridcell } => cmd_find(&store, &model, &gridcell),
        Commands::Run {
            model,
            gridcell,
            hru,
            workers,
            jitter_ms,
            dry_run,
        } => cmd_run(&store, &model, &gridcell, &hru, workers, jitter_ms, dry_run),
        Commands::Errors { model, gridcell } => cmd_errors(&store, &model, &gridcell),
    }
}

fn cmd_find(store: &FsStore, models: &[String], gridcells: &[String]) -> CliResult<()> {
    let jobs = gather(store, models, gridcells)?;
    print_job_listing(&jobs);
    Ok(())
}

fn cmd_run(
    store: &FsStore,
    models: &[String],
    gridcells: &[String],
    hru_codes: &[String],
    workers: usize,
    jitter_ms: u64,
    dry_run: bool,
) -> CliResult<()> {
    let hrus = parse_hrus(hru_codes)?;
    let jobs = gather(store, models, gridcells)?;

    if dry_run {
        print_job_listing(&jobs);
        return Ok(());
    }

    let options = RunOptions {
        workers,
        upload_workers: workers,
        jitter_ms,
        hrus,
    };
    println!(
        "starting {} parallel workers to do {} jobs...",
        options.workers.min(jobs.len()).max(1),
        jobs.len()
    );

    let summary = run_all(
        store,
        &StorageSolver,
        &jobs,
        &options,
        Some(&|timing: &JobTiming| {
            println!(
                "{} completed in {:.3} seconds",
                timing.input_path,
                timing.compute_seconds + timing.upload_seconds
            );
        }),
    )?;

    for failure in &summary.failures {
        println!("{} failed: {}", failure.input_path, failure.error);
    }
    print_run_summary(&summary);

    if summary.failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::JobsFailed {
            failed: summary.failures.len(),
            jobs: summary.jobs(),
        })
    }
}

fn cmd_errors(store: &FsStore, models: &[String], gridcells: &[String]) -> CliResult<()> {
    let markers = error_markers(store, models, gridcells)?;
    if markers.is_empty() {
        println!("no error files found");
        return Ok(());
    }
    println!("found {} error files...", markers.len());
    for path in markers {
        println!("{}", path);
    }
    Ok(())
}

fn parse_hrus(codes: &[String]) -> CliResult<Option<Vec<Hru>>> {
    if codes.is_empty() {
        return Ok(None);
    }
    let mut hrus = Vec::with_capacity(codes.len());
    for code in codes {
        hrus.push(code.parse::<Hru>()?);
    }
    Ok(Some(hrus))
}

fn print_job_listing(jobs: &[JobSpec]) {
    if jobs.is_empty() {
        println!("no input files found");
        return;
    }
    println!("found {} files...", jobs.len());
    for job in jobs {
        println!("{}", job.input_path);
    }
}

fn print_run_summary(summary: &RunSummary) {
    let hrus = summary.hru_count.max(1) as f64;
    let avg_job = summary.avg_job_seconds();
    let wall_per_job = summary.wall_seconds_per_job();

    println!(
        "full job [N={}] took {:.1} seconds (wall)",
        summary.jobs(),
        summary.wall_seconds
    );
    println!("avg gridcell took {:.2} seconds (per worker)", avg_job);
    println!("each gridcell took {:.3} seconds (wall)", wall_per_job);
    println!("avg hru took {:.3} seconds (per worker)", avg_job / hrus);
    println!("each hru took {:.3} seconds (wall)", wall_per_job / hrus);
    println!(
        "avg gridcell compute time {:.3} seconds (wall)",
        summary.avg_compute_seconds()
    );
    println!(
        "avg gridcell upload time {:.3} seconds (wall)",
        summary.avg_upload_seconds()
    );
}
