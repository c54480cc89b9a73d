//! Input discovery: which jobs exist for the requested filters.

use gf_store::{ObjectStore, StoreResult};
use tracing::warn;

/// One input file to simulate. The derived ordering follows `input_path`,
/// which keeps gathered batches deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct JobSpec {
    pub input_path: String,
    pub model: String,
    pub gridcell: String,
}

impl JobSpec {
    /// Parse `{model}/inputs/{gridcell}-...input.json`. The grid cell is the
    /// filename's leading `-`-separated token; files without one are not
    /// valid jobs.
    pub fn from_input_path(path: &str) -> Option<Self> {
        let (model, rest) = path.split_once("/inputs/")?;
        let (gridcell, _) = rest.split_once('-')?;
        if model.is_empty() || gridcell.is_empty() {
            return None;
        }
        Some(Self {
            input_path: path.to_string(),
            model: model.to_string(),
            gridcell: gridcell.to_string(),
        })
    }
}

/// Resolve the model and grid-cell filters against the store and list one
/// job per matching input file, sorted by path.
///
/// Model filters match known model names by substring; an empty filter list
/// keeps every model. Grid-cell filters become a glob alternation inside the
/// listing pattern. Filters that match nothing yield an empty batch, not an
/// error.
pub fn gather<S>(store: &S, models: &[String], gridcells: &[String]) -> StoreResult<Vec<JobSpec>>
where
    S: ObjectStore + ?Sized,
{
    let mut jobs = Vec::new();
    for model in resolve_models(store, models)? {
        let pattern = match cell_alternation(gridcells) {
            Some(cells) => format!("{model}/inputs/*{cells}*input.json"),
            None => format!("{model}/inputs/*input.json"),
        };
        for path in store.list(&pattern)? {
            match JobSpec::from_input_path(&path) {
                Some(job) => jobs.push(job),
                None => warn!(%path, "input file has no grid cell in its name; skipping"),
            }
        }
    }
    jobs.sort();
    jobs.dedup();
    Ok(jobs)
}

/// Failure markers under the resolved models, filtered by grid cell. Lets
/// operators check which HRUs failed in earlier runs.
pub fn error_markers<S>(
    store: &S,
    models: &[String],
    gridcells: &[String],
) -> StoreResult<Vec<String>>
where
    S: ObjectStore + ?Sized,
{
    let mut markers = Vec::new();
    for model in resolve_models(store, models)? {
        let pattern = match cell_alternation(gridcells) {
            Some(cells) => format!("{model}/results/*{cells}*/*.error"),
            None => format!("{model}/results/*/*.error"),
        };
        markers.extend(store.list(&pattern)?);
    }
    markers.sort();
    markers.dedup();
    Ok(markers)
}

fn resolve_models<S>(store: &S, filters: &[String]) -> StoreResult<Vec<String>>
where
    S: ObjectStore + ?Sized,
{
    let known = store.models()?;
    if filters.is_empty() {
        return Ok(known);
    }
    Ok(known
        .into_iter()
        .filter(|name| filters.iter().any(|f| name.contains(f.as_str())))
        .collect())
}

fn cell_alternation(gridcells: &[String]) -> Option<String> {
    if gridcells.is_empty() {
        return None;
    }
    let mut cells: Vec<&str> = gridcells.iter().map(String::as_str).collect();
    cells.sort_unstable();
    cells.dedup();
    Some(format!("{{{}}}", cells.join(",")))
}
