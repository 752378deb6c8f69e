//! Resource Selector
//!
//! Runs a name filter against one namespace (projects or library variable
//! sets). Matching nothing is an empty result, not an error.

use super::matcher::{classify, MatchStrategy, NameFilter};
use crate::error::Result;
use crate::octopus::model::NamedResource;
use crate::octopus::repository::{self, Repository};

/// Classify `filter` and select the matching resources of type `R`
pub async fn select<R, Repo>(repo: &Repo, filter: &NameFilter) -> Result<Vec<R>>
where
    R: NamedResource,
    Repo: Repository + ?Sized,
{
    let strategy = classify(filter)?;
    select_with(repo, &strategy).await
}

/// Select resources of type `R` with an already classified strategy
pub async fn select_with<R, Repo>(repo: &Repo, strategy: &MatchStrategy) -> Result<Vec<R>>
where
    R: NamedResource,
    Repo: Repository + ?Sized,
{
    tracing::debug!("Selecting {} resources with {:?}", R::KIND, strategy);

    let matched: Vec<R> = match strategy {
        MatchStrategy::All => repository::find_all(repo).await?,
        _ => {
            repository::find_many(repo, |item: &R| {
                strategy.matches(&item.name().to_lowercase())
            })
            .await?
        }
    };

    tracing::debug!("Matched {} {} resources", matched.len(), R::KIND);
    Ok(matched)
}
