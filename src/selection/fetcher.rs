//! Resource Fetcher
//!
//! Variable sets are fetched one id at a time, in order. The server's batch
//! endpoint fails the whole request when any id is stale, so it is not used.
//! A missing id still aborts the whole fetch: no partial results are returned.

use super::orchestrator::VariableSetId;
use crate::error::Result;
use crate::octopus::model::VariableSet;
use crate::octopus::repository::{self, Repository};

/// Fetch variable sets for `ids`, preserving order and duplicates
pub async fn fetch_variable_sets<Repo>(repo: &Repo, ids: &[VariableSetId]) -> Result<Vec<VariableSet>>
where
    Repo: Repository + ?Sized,
{
    let mut sets = Vec::with_capacity(ids.len());

    for id in ids {
        let set: VariableSet = repository::get_by_id(repo, id).await.map_err(|e| {
            tracing::warn!("Failed to fetch variable set {}: {}", id, e);
            e
        })?;
        sets.push(set);
    }

    tracing::info!("Fetched {} variable sets", sets.len());
    Ok(sets)
}
