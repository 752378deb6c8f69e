//! Get variable sets
//!
//! One invocation: resolve names to variable set ids, fetch each set, shape
//! the result. Any failure aborts before output is produced.

use crate::error::Result;
use crate::octopus::repository::Repository;
use crate::output::{shape, OutputMode, ResolvedOutput};
use crate::selection::{fetch_variable_sets, resolve, Selection};

/// Parameters of a variable set query
#[derive(Debug, Clone, Default)]
pub struct GetVariableSet {
    pub project_name: Option<Vec<String>>,
    pub library_set_name: Option<Vec<String>>,
    pub include_library_set_usage: bool,
    pub output_mode: OutputMode,
}

impl GetVariableSet {
    pub async fn run<Repo>(&self, repo: &Repo) -> Result<ResolvedOutput>
    where
        Repo: Repository + ?Sized,
    {
        let selection = Selection::new(self.project_name.clone(), self.library_set_name.clone());

        let ids = resolve(repo, &selection).await?;
        let sets = fetch_variable_sets(repo, &ids).await?;

        shape(repo, sets, self.output_mode, self.include_library_set_usage).await
    }
}
