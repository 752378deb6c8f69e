//! Selection Orchestrator
//!
//! Turns the project and library set filters of one invocation into the list
//! of variable set ids to fetch.
//!
//! - No filter at all: every project and every library set contributes.
//! - Otherwise only the namespaces that were given a filter contribute; the
//!   other one is not defaulted to "all".
//!
//! Ids are concatenated (projects first) without deduplication.

use super::matcher::{classify, NameFilter, LIBRARY_SET_NAME_PARAM, PROJECT_NAME_PARAM};
use super::selector::select_with;
use crate::error::Result;
use crate::octopus::model::{LibraryVariableSet, NamedResource, Project};
use crate::octopus::repository::{self, Repository};

/// Opaque variable set identifier
pub type VariableSetId = String;

/// Name filters for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub projects: Option<NameFilter>,
    pub library_sets: Option<NameFilter>,
}

impl Selection {
    /// Build from raw user input. Names are lowercased here, once
    pub fn new(project_names: Option<Vec<String>>, library_set_names: Option<Vec<String>>) -> Self {
        Self {
            projects: project_names.map(|names| NameFilter::new(PROJECT_NAME_PARAM, names)),
            library_sets: library_set_names
                .map(|names| NameFilter::new(LIBRARY_SET_NAME_PARAM, names)),
        }
    }

    /// True when neither namespace was given a filter
    pub fn is_unfiltered(&self) -> bool {
        self.projects.is_none() && self.library_sets.is_none()
    }
}

/// Resolve a selection into variable set ids, in fetch order
pub async fn resolve<Repo>(repo: &Repo, selection: &Selection) -> Result<Vec<VariableSetId>>
where
    Repo: Repository + ?Sized,
{
    if selection.is_unfiltered() {
        tracing::debug!("No name filters given, selecting every variable set");

        let projects: Vec<Project> = repository::find_all(repo).await?;
        let library_sets: Vec<LibraryVariableSet> = repository::find_all(repo).await?;

        let mut ids = variable_set_ids(&projects);
        ids.extend(variable_set_ids(&library_sets));
        return Ok(ids);
    }

    // Validate both filters before touching the server
    let project_strategy = selection.projects.as_ref().map(classify).transpose()?;
    let library_strategy = selection.library_sets.as_ref().map(classify).transpose()?;

    let mut ids = Vec::new();

    if let Some(strategy) = &project_strategy {
        let projects: Vec<Project> = select_with(repo, strategy).await?;
        ids.extend(variable_set_ids(&projects));
    }

    if let Some(strategy) = &library_strategy {
        let library_sets: Vec<LibraryVariableSet> = select_with(repo, strategy).await?;
        ids.extend(variable_set_ids(&library_sets));
    }

    tracing::info!("Resolved {} variable set ids", ids.len());
    Ok(ids)
}

fn variable_set_ids<R: NamedResource>(items: &[R]) -> Vec<VariableSetId> {
    items
        .iter()
        .map(|item| item.variable_set_id().to_string())
        .collect()
}
