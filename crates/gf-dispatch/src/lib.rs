//! gf-dispatch: input discovery and parallel job execution.
//!
//! A job is one grid cell's input file run end to end: download, window
//! derivation, forcing assembly, the HRU batch, publish. Jobs are fully
//! independent; one job's error is recorded in the run summary and never
//! cancels its siblings.

pub mod gather;
pub mod run;

pub use gather::{JobSpec, error_markers, gather};
pub use run::{
    JobFailure, JobTiming, ProgressFn, RunOptions, RunSummary, default_workers, run_all,
};

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Everything that can sink a single job. Variants stay transparent: the
/// underlying errors already name the path, series, or HRU at fault.
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] gf_store::StoreError),

    #[error(transparent)]
    Forcing(#[from] gf_forcing::ForcingError),

    #[error(transparent)]
    Runner(#[from] gf_runner::RunnerError),

    #[error(transparent)]
    Publish(#[from] gf_publish::PublishError),

    #[error("could not start job pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
