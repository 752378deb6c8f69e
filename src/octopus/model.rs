//! Octopus resource shapes
//!
//! Only the fields the selection pipeline reads are typed. Projects and library
//! sets keep everything else in `extra`; variable sets hold on to the whole
//! document so raw output is byte-for-byte what the server returned.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Server-side resource collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    LibraryVariableSet,
    VariableSet,
}

impl ResourceKind {
    /// REST collection segment under `/api`
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::Project => "projects",
            ResourceKind::LibraryVariableSet => "libraryvariablesets",
            ResourceKind::VariableSet => "variables",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Project => "Project",
            ResourceKind::LibraryVariableSet => "LibraryVariableSet",
            ResourceKind::VariableSet => "VariableSet",
        };
        f.write_str(name)
    }
}

/// Anything the repository can list or get
pub trait Resource: DeserializeOwned {
    const KIND: ResourceKind;

    fn id(&self) -> &str;
}

/// A resource that has a name and owns a variable set.
///
/// Projects and library variable sets look the same to name resolution, so
/// the matcher only ever sees this trait.
pub trait NamedResource: Resource {
    fn name(&self) -> &str;
    fn variable_set_id(&self) -> &str;
}

/// Deployment project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub variable_set_id: String,
    #[serde(default)]
    pub included_library_variable_set_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for Project {
    const KIND: ResourceKind = ResourceKind::Project;

    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedResource for Project {
    fn name(&self) -> &str {
        &self.name
    }

    fn variable_set_id(&self) -> &str {
        &self.variable_set_id
    }
}

/// Shared library variable set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryVariableSet {
    pub id: String,
    pub name: String,
    pub variable_set_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource for LibraryVariableSet {
    const KIND: ResourceKind = ResourceKind::LibraryVariableSet;

    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedResource for LibraryVariableSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn variable_set_id(&self) -> &str {
        &self.variable_set_id
    }
}

/// A variable set as stored on the server.
///
/// The typed fields are a read-only view for conversion. Serializing writes
/// back the document exactly as the server sent it, nulls included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct VariableSet {
    pub id: String,
    pub owner_id: String,
    pub version: Option<i64>,
    pub variables: Vec<Variable>,
    pub scope_values: ScopeValues,
    pub last_modified_on: Option<String>,
    pub last_modified_by: Option<String>,
    raw: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VariableSetFields {
    id: String,
    owner_id: String,
    #[serde(default)]
    version: Option<i64>,
    #[serde(default)]
    variables: Option<Vec<Variable>>,
    #[serde(default)]
    scope_values: Option<ScopeValues>,
    #[serde(default)]
    last_modified_on: Option<String>,
    #[serde(default)]
    last_modified_by: Option<String>,
}

impl VariableSet {
    /// The document as received
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl TryFrom<Value> for VariableSet {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let fields = VariableSetFields::deserialize(&raw)?;

        Ok(Self {
            id: fields.id,
            owner_id: fields.owner_id,
            version: fields.version,
            variables: fields.variables.unwrap_or_default(),
            scope_values: fields.scope_values.unwrap_or_default(),
            last_modified_on: fields.last_modified_on,
            last_modified_by: fields.last_modified_by,
            raw,
        })
    }
}

impl From<VariableSet> for Value {
    fn from(set: VariableSet) -> Self {
        set.raw
    }
}

impl Resource for VariableSet {
    const KIND: ResourceKind = ResourceKind::VariableSet;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Single variable entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Variable {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    /// Scope dimension (e.g. "Environment") to ids
    #[serde(default)]
    pub scope: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub is_sensitive: bool,
    #[serde(default)]
    pub is_editable: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Id/name lookup tables for everything a variable can be scoped to
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScopeValues {
    #[serde(default)]
    pub environments: Vec<ReferenceItem>,
    #[serde(default)]
    pub machines: Vec<ReferenceItem>,
    #[serde(default)]
    pub actions: Vec<ReferenceItem>,
    #[serde(default)]
    pub roles: Vec<ReferenceItem>,
    #[serde(default)]
    pub channels: Vec<ReferenceItem>,
    #[serde(default)]
    pub tenant_tags: Vec<ReferenceItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScopeValues {
    /// Lookup table for a variable scope dimension (singular key, e.g. "Environment")
    fn table(&self, dimension: &str) -> Option<&[ReferenceItem]> {
        match dimension {
            "Environment" => Some(self.environments.as_slice()),
            "Machine" => Some(self.machines.as_slice()),
            "Action" => Some(self.actions.as_slice()),
            "Role" => Some(self.roles.as_slice()),
            "Channel" => Some(self.channels.as_slice()),
            "TenantTag" => Some(self.tenant_tags.as_slice()),
            _ => None,
        }
    }

    /// Resolve a scope id to its display name, falling back to the id
    pub fn display_name(&self, dimension: &str, id: &str) -> String {
        self.table(dimension)
            .and_then(|items| items.iter().find(|item| item.id == id))
            .map(|item| item.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReferenceItem {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_keeps_unknown_fields() {
        let value = json!({
            "Id": "Projects-1",
            "Name": "Website_Stardust",
            "VariableSetId": "variableset-Projects-1",
            "LifecycleId": "Lifecycles-1"
        });
        let project: Project = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(project.variable_set_id(), "variableset-Projects-1");
        assert!(project.included_library_variable_set_ids.is_empty());

        let back = serde_json::to_value(&project).unwrap();
        assert_eq!(back["LifecycleId"], "Lifecycles-1");
    }

    #[test]
    fn test_scope_display_name_falls_back_to_id() {
        let scopes: ScopeValues = serde_json::from_value(json!({
            "Environments": [{"Id": "Environments-1", "Name": "Production"}]
        }))
        .unwrap();

        assert_eq!(scopes.display_name("Environment", "Environments-1"), "Production");
        assert_eq!(scopes.display_name("Environment", "Environments-9"), "Environments-9");
        assert_eq!(scopes.display_name("Unknown", "x"), "x");
    }

    #[test]
    fn test_variable_set_serializes_as_received() {
        let value = json!({
            "Id": "variableset-Projects-1",
            "OwnerId": "Projects-1",
            "Version": null,
            "LastModifiedOn": null,
            "Variables": [
                {"Id": "v1", "Name": "Password", "Value": null, "IsSensitive": true, "Scope": {}},
                {"Id": "v2", "Name": "Region", "Value": "eu", "Scope": {"Environment": ["Environments-1"]}}
            ],
            "ScopeValues": {
                "Environments": [{"Id": "Environments-1", "Name": "Production", "Extra": 1}]
            },
            "Links": {"Self": "/api/variables/variableset-Projects-1"}
        });

        let set: VariableSet = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(set.version, None);
        assert_eq!(set.variables[0].value, None);
        assert!(set.variables[0].is_sensitive);
        assert_eq!(set.scope_values.environments[0].extra["Extra"], 1);
        assert_eq!(set.scope_values.display_name("Environment", "Environments-1"), "Production");

        assert_eq!(serde_json::to_value(&set).unwrap(), value);
    }

    #[test]
    fn test_variable_set_does_not_add_missing_keys() {
        let value = json!({"Id": "vs-1", "OwnerId": "LibraryVariableSets-1"});
        let set: VariableSet = serde_json::from_value(value.clone()).unwrap();
        assert!(set.variables.is_empty());
        assert_eq!(serde_json::to_value(&set).unwrap(), value);
    }

    #[test]
    fn test_variable_set_requires_owner() {
        let result: Result<VariableSet, _> = serde_json::from_value(json!({"Id": "vs-1"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_collections() {
        assert_eq!(ResourceKind::Project.collection(), "projects");
        assert_eq!(ResourceKind::VariableSet.to_string(), "VariableSet");
    }
}
