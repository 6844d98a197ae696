//! Fetch-result cache: opt-in reuse of the previous run's query response.
//!
//! Every successful fetch is written out per fact family; `--use-cache`
//! loads that file instead of querying. Reuse is explicit only, a stale
//! or missing cache never falls back to the network.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{ReportError, ReportResult};
use crate::models::FactFragment;
use crate::puppetdb::query::FactFamily;

/// Default cache location, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".accountfacts";

pub fn cache_path(dir: &Path, family: FactFamily) -> PathBuf {
    dir.join(format!("{}.json", family.fact_name()))
}

/// Persist a fetched fragment set for later reuse.
pub fn store(dir: &Path, family: FactFamily, fragments: &[FactFragment]) -> ReportResult<()> {
    fs::create_dir_all(dir)?;
    let path = cache_path(dir, family);
    fs::write(&path, serde_json::to_vec_pretty(fragments)?)?;
    debug!("cached {} fragments at {}", fragments.len(), path.display());
    Ok(())
}

/// Load the previous run's fragment set for `family`.
pub fn load(dir: &Path, family: FactFamily) -> ReportResult<Vec<FactFragment>> {
    let path = cache_path(dir, family);
    let raw = fs::read(&path).map_err(|e| {
        ReportError::Config(format!("no cached fetch at {}: {e}", path.display()))
    })?;
    let fragments: Vec<FactFragment> = serde_json::from_slice(&raw)?;
    if fragments.is_empty() {
        return Err(ReportError::EmptyResponse {
            url: path.display().to_string(),
        });
    }
    info!(
        "reusing {} cached fragments from {}",
        fragments.len(),
        path.display()
    );
    Ok(fragments)
}
