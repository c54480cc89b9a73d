//! Upload fan-out across a bounded worker pool.

use std::time::Instant;

use gf_core::{Hru, SimInfo};
use gf_runner::{BatchResults, HruOutcome};
use gf_store::ObjectStore;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::record::HruRecord;
use crate::table::{TABLE_CONTENT_TYPE, render_table};
use crate::{PublishError, PublishResult};

/// Store prefix that every artifact and record for this window lands under.
pub fn result_prefix(info: &SimInfo) -> String {
    format!("{}/results/{}", info.model, info.gridcell)
}

/// Store paths written for one HRU. `artifact` is `None` when the run failed
/// and only the failure record was uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedPaths {
    pub hru: Hru,
    pub artifact: Option<String>,
    pub record: String,
}

#[derive(Debug, Clone)]
pub struct PublishSummary {
    pub paths: Vec<PublishedPaths>,
    pub seconds: f64,
}

/// Upload every outcome in `results`, fanning out across `upload_workers`
/// threads. Uploads are I/O-bound and independent per HRU, so the pool is
/// sized by the caller rather than by core count.
pub fn publish<S>(
    store: &S,
    info: &SimInfo,
    results: &BatchResults,
    upload_workers: usize,
) -> PublishResult<PublishSummary>
where
    S: ObjectStore + ?Sized,
{
    let started = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(upload_workers.max(1))
        .build()?;
    let items: Vec<(&Hru, &HruOutcome)> = results.iter().collect();
    let paths = pool.install(|| {
        items
            .par_iter()
            .map(|&(hru, outcome)| publish_one(store, info, *hru, outcome))
            .collect::<PublishResult<Vec<PublishedPaths>>>()
    })?;
    Ok(PublishSummary {
        paths,
        seconds: started.elapsed().as_secs_f64(),
    })
}

/// Success order is artifact, then record, then marker retraction, so a
/// reader that sees the success record can rely on the artifact being
/// present. A marker from an earlier failed run must not outlive the fix;
/// retraction is best-effort beyond that.
fn publish_one<S>(
    store: &S,
    info: &SimInfo,
    hru: Hru,
    outcome: &HruOutcome,
) -> PublishResult<PublishedPaths>
where
    S: ObjectStore + ?Sized,
{
    let prefix = result_prefix(info);
    match outcome {
        HruOutcome::Success(success) => {
            let artifact = format!("{prefix}/{hru}.csv");
            let record_path = format!("{prefix}/{hru}.json");
            let marker = format!("{prefix}/{hru}.error");
            let table = render_table(info, hru, success);
            store.put_bytes(&artifact, table.into_bytes(), TABLE_CONTENT_TYPE)?;
            let record = HruRecord::success(info, hru, &success.messages);
            put_record(store, &record_path, &record)?;
            if let Err(err) = store.delete_if_exists(&marker) {
                warn!(path = %marker, %err, "could not retract stale failure marker");
            }
            debug!(%hru, path = %artifact, "published");
            Ok(PublishedPaths {
                hru,
                artifact: Some(artifact),
                record: record_path,
            })
        }
        HruOutcome::Failure { message, detail } => {
            let record_path = format!("{prefix}/{hru}.error");
            let record = HruRecord::failure(info, hru, message, detail);
            put_record(store, &record_path, &record)?;
            debug!(%hru, path = %record_path, "published failure record");
            Ok(PublishedPaths {
                hru,
                artifact: None,
                record: record_path,
            })
        }
    }
}

fn put_record<S>(store: &S, path: &str, record: &HruRecord) -> PublishResult<()>
where
    S: ObjectStore + ?Sized,
{
    let value = serde_json::to_value(record).map_err(|source| PublishError::Record {
        path: path.to_string(),
        source,
    })?;
    store.put_json(path, &value)?;
    Ok(())
}
