//! gf-publish: persists per-HRU results to the object store.
//!
//! Each successful run uploads a columnar artifact plus a metadata record,
//! then retracts any failure marker left behind by an earlier run of the
//! same HRU. Failed runs upload a failure record alone.

pub mod publisher;
pub mod record;
pub mod table;

pub use publisher::{PublishSummary, PublishedPaths, publish, result_prefix};
pub use record::HruRecord;
pub use table::{TABLE_CONTENT_TYPE, render_table};

pub type PublishResult<T> = Result<T, PublishError>;

#[derive(thiserror::Error, Debug)]
pub enum PublishError {
    #[error(transparent)]
    Store(#[from] gf_store::StoreError),

    #[error("could not encode record for {path}: {source}")]
    Record {
        path: String,
        source: serde_json::Error,
    },

    #[error("could not start upload pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
