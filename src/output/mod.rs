//! Output shaping
//!
//! Chooses between the server's own variable set shape and the friendly
//! converted shape, then serializes the result for the terminal.

pub mod converter;

use crate::error::Result;
use crate::octopus::model::VariableSet;
use crate::octopus::repository::Repository;
use clap::ValueEnum;
use serde::Serialize;

pub use converter::{convert, FriendlyVariable, FriendlyVariableSet, OwnerType};

/// Which shape the command emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Variable sets exactly as the server returned them
    #[default]
    Resource,
    /// Converted, human friendly variable sets
    Friendly,
}

impl OutputMode {
    /// `--friendly` wins, then `--resource-only`, then the configured default
    pub fn effective(friendly: bool, resource_only: bool, default_resource_only: bool) -> Self {
        if friendly {
            OutputMode::Friendly
        } else if resource_only || default_resource_only {
            OutputMode::Resource
        } else {
            OutputMode::Friendly
        }
    }
}

/// Serialization format for stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Emitted sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolvedOutput {
    Resources(Vec<VariableSet>),
    Friendly(Vec<FriendlyVariableSet>),
}

impl ResolvedOutput {
    pub fn len(&self) -> usize {
        match self {
            ResolvedOutput::Resources(items) => items.len(),
            ResolvedOutput::Friendly(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shape fetched variable sets for output
pub async fn shape<Repo>(
    repo: &Repo,
    resources: Vec<VariableSet>,
    mode: OutputMode,
    include_library_set_usage: bool,
) -> Result<ResolvedOutput>
where
    Repo: Repository + ?Sized,
{
    match mode {
        OutputMode::Resource => {
            if include_library_set_usage {
                tracing::warn!("Library set usage is only reported in friendly output; ignoring");
            }
            Ok(ResolvedOutput::Resources(resources))
        }
        OutputMode::Friendly => Ok(ResolvedOutput::Friendly(
            convert(repo, &resources, include_library_set_usage).await?,
        )),
    }
}

/// Serialize output in the requested format
pub fn render(output: &ResolvedOutput, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(output)?,
        OutputFormat::Yaml => serde_yaml::to_string(output)?,
    };
    Ok(text)
}
