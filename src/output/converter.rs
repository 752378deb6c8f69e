//! Friendly output conversion
//!
//! Maps raw variable sets into a shape meant for reading: the owner is named,
//! scope ids are replaced by display names and sensitive values are masked.

use crate::error::Result;
use crate::octopus::model::{LibraryVariableSet, Project, VariableSet};
use crate::octopus::repository::{self, Repository};
use serde::Serialize;
use std::collections::BTreeMap;

/// Placeholder printed instead of sensitive values
pub const SENSITIVE_MASK: &str = "********";

/// What kind of resource owns a variable set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OwnerType {
    Project,
    LibraryVariableSet,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FriendlyVariableSet {
    pub id: String,
    pub owner_type: OwnerType,
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_variable_set_name: Option<String>,
    /// Projects including this library set; only filled when usage was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    pub variables: Vec<FriendlyVariable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FriendlyVariable {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub is_sensitive: bool,
    pub scope: BTreeMap<String, Vec<String>>,
}

/// Convert variable sets, loading owners from the repository
pub async fn convert<Repo>(
    repo: &Repo,
    sets: &[VariableSet],
    include_usage: bool,
) -> Result<Vec<FriendlyVariableSet>>
where
    Repo: Repository + ?Sized,
{
    if sets.is_empty() {
        return Ok(Vec::new());
    }

    let projects: Vec<Project> = repository::find_all(repo).await?;
    let library_sets: Vec<LibraryVariableSet> = repository::find_all(repo).await?;

    Ok(convert_with(sets, &projects, &library_sets, include_usage))
}

/// Convert variable sets against already loaded owners
pub fn convert_with(
    sets: &[VariableSet],
    projects: &[Project],
    library_sets: &[LibraryVariableSet],
    include_usage: bool,
) -> Vec<FriendlyVariableSet> {
    sets.iter()
        .map(|set| convert_one(set, projects, library_sets, include_usage))
        .collect()
}

fn convert_one(
    set: &VariableSet,
    projects: &[Project],
    library_sets: &[LibraryVariableSet],
    include_usage: bool,
) -> FriendlyVariableSet {
    let project = projects.iter().find(|p| p.id == set.owner_id);
    let library_set = library_sets.iter().find(|l| l.id == set.owner_id);

    let owner_type = match (project, library_set) {
        (Some(_), _) => OwnerType::Project,
        (None, Some(_)) => OwnerType::LibraryVariableSet,
        (None, None) => OwnerType::Unknown,
    };

    let usage: Option<Vec<String>> = match library_set {
        Some(library_set) if include_usage => Some(
            projects
                .iter()
                .filter(|p| p.included_library_variable_set_ids.contains(&library_set.id))
                .map(|p| p.name.clone())
                .collect(),
        ),
        _ => None,
    };

    let variables: Vec<FriendlyVariable> = set
        .variables
        .iter()
        .map(|variable| FriendlyVariable {
            name: variable.name.clone(),
            value: if variable.is_sensitive {
                Some(SENSITIVE_MASK.to_string())
            } else {
                variable.value.clone()
            },
            is_sensitive: variable.is_sensitive,
            scope: variable
                .scope
                .iter()
                .map(|(dimension, ids)| {
                    let names: Vec<String> = ids
                        .iter()
                        .map(|id| set.scope_values.display_name(dimension, id))
                        .collect();
                    (dimension.clone(), names)
                })
                .collect(),
        })
        .collect();

    FriendlyVariableSet {
        id: set.id.clone(),
        owner_type,
        owner_id: set.owner_id.clone(),
        project_name: project.map(|p| p.name.clone()),
        library_variable_set_name: library_set.map(|l| l.name.clone()),
        usage,
        last_modified_on: set.last_modified_on.as_deref().map(format_timestamp),
        last_modified_by: set.last_modified_by.clone(),
        variables,
    }
}

/// Render an RFC 3339 timestamp as `YYYY-MM-DD HH:MM:SS +HH:MM`
fn format_timestamp(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S %:z").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn projects() -> Vec<Project> {
        serde_json::from_value(json!([
            {
                "Id": "Projects-1",
                "Name": "Website_Stardust",
                "VariableSetId": "vs-p1",
                "IncludedLibraryVariableSetIds": ["LibraryVariableSets-1"]
            },
            {
                "Id": "Projects-2",
                "Name": "Website_Diamond",
                "VariableSetId": "vs-p2",
                "IncludedLibraryVariableSetIds": ["LibraryVariableSets-1", "LibraryVariableSets-2"]
            }
        ]))
        .unwrap()
    }

    fn library_sets() -> Vec<LibraryVariableSet> {
        serde_json::from_value(json!([
            {"Id": "LibraryVariableSets-1", "Name": "Stands_SC", "VariableSetId": "vs-l1"},
            {"Id": "LibraryVariableSets-2", "Name": "Stands_DII", "VariableSetId": "vs-l2"}
        ]))
        .unwrap()
    }

    fn project_set() -> VariableSet {
        serde_json::from_value(json!({
            "Id": "vs-p1",
            "OwnerId": "Projects-1",
            "LastModifiedOn": "2017-03-01T10:30:00.000+00:00",
            "LastModifiedBy": "admin",
            "Variables": [
                {"Name": "ConnString", "Value": "Server=db", "Scope": {"Environment": ["Environments-1"]}},
                {"Name": "Password", "Value": null, "IsSensitive": true}
            ],
            "ScopeValues": {"Environments": [{"Id": "Environments-1", "Name": "Production"}]}
        }))
        .unwrap()
    }

    fn library_set_vars() -> VariableSet {
        serde_json::from_value(json!({"Id": "vs-l1", "OwnerId": "LibraryVariableSets-1"})).unwrap()
    }

    #[test]
    fn test_project_owned_set() {
        let out = convert_with(&[project_set()], &projects(), &library_sets(), false);
        let set = &out[0];
        assert_eq!(set.owner_type, OwnerType::Project);
        assert_eq!(set.project_name.as_deref(), Some("Website_Stardust"));
        assert_eq!(set.library_variable_set_name, None);
        assert_eq!(set.last_modified_on.as_deref(), Some("2017-03-01 10:30:00 +00:00"));
        assert_eq!(set.variables[0].scope["Environment"], vec!["Production"]);
        assert_eq!(set.variables[1].value.as_deref(), Some(SENSITIVE_MASK));
    }

    #[test]
    fn test_usage_only_when_requested() {
        let without = convert_with(&[library_set_vars()], &projects(), &library_sets(), false);
        assert_eq!(without[0].owner_type, OwnerType::LibraryVariableSet);
        assert_eq!(without[0].usage, None);

        let with = convert_with(&[library_set_vars()], &projects(), &library_sets(), true);
        assert_eq!(
            with[0].usage.as_deref(),
            Some(&["Website_Stardust".to_string(), "Website_Diamond".to_string()][..])
        );
    }

    #[test]
    fn test_usage_never_set_for_projects() {
        let out = convert_with(&[project_set()], &projects(), &library_sets(), true);
        assert_eq!(out[0].usage, None);
    }

    #[test]
    fn test_unknown_owner() {
        let set: VariableSet =
            serde_json::from_value(json!({"Id": "vs-x", "OwnerId": "Tenants-1"})).unwrap();
        let out = convert_with(&[set], &projects(), &library_sets(), true);
        assert_eq!(out[0].owner_type, OwnerType::Unknown);
        assert_eq!(out[0].usage, None);
    }

    #[test]
    fn test_unparseable_timestamp_kept() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
