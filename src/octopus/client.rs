//! Octopus Client
//!
//! Main client for the Octopus REST API, combining the API key and the HTTP
//! transport. One client is built per invocation and never mutated.

use super::http::OctopusHttpClient;
use super::model::ResourceKind;
use super::repository::Repository;
use crate::error::{Error, Result};
use serde_json::Value;
use url::Url;

/// Main Octopus client
#[derive(Clone)]
pub struct OctopusClient {
    http: OctopusHttpClient,
    server_url: Url,
    api_key: String,
    space_id: Option<String>,
}

impl OctopusClient {
    /// Create a new Octopus client
    pub fn new(server_url: &str, api_key: &str, space_id: Option<&str>) -> Result<Self> {
        let server_url = Url::parse(server_url.trim())
            .map_err(|e| Error::config(format!("Invalid Octopus URL '{}': {}", server_url, e)))?;

        if !matches!(server_url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Octopus URL must use http or https, got '{}'",
                server_url.scheme()
            )));
        }

        if api_key.trim().is_empty() {
            return Err(Error::config("Octopus API key is empty"));
        }

        Ok(Self {
            http: OctopusHttpClient::new()?,
            server_url,
            api_key: api_key.trim().to_string(),
            space_id: space_id
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    pub fn space_id(&self) -> Option<&str> {
        self.space_id.as_deref()
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build an API URL, scoped to the configured space when there is one
    pub fn api_url(&self, path: &str) -> String {
        let base = self.server_url.as_str().trim_end_matches('/');
        match &self.space_id {
            Some(space) => format!("{}/api/{}/{}", base, urlencoding::encode(space), path),
            None => format!("{}/api/{}", base, path),
        }
    }

    /// URL listing every item of a collection
    pub fn all_url(&self, kind: ResourceKind) -> String {
        self.api_url(&format!("{}/all", kind.collection()))
    }

    /// URL of a single item
    pub fn item_url(&self, kind: ResourceKind, id: &str) -> String {
        self.api_url(&format!("{}/{}", kind.collection(), urlencoding::encode(id)))
    }

    /// Make a GET request to the Octopus API
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        self.http.get(url, &self.api_key).await
    }
}

impl Repository for OctopusClient {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>> {
        let response = self.get_json(&self.all_url(kind)).await?;

        let items = match response {
            Value::Array(items) => Some(items),
            // Paged endpoints wrap results in "Items"
            Value::Object(mut map) => match map.remove("Items") {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            },
            _ => None,
        };

        items.ok_or_else(|| {
            tracing::warn!("Listing {} returned neither an array nor an Items page", kind);
            Error::unexpected_response(kind.to_string())
        })
    }

    async fn get(&self, kind: ResourceKind, id: &str) -> Result<Value> {
        match self.get_json(&self.item_url(kind, id)).await {
            Err(Error::Api { status: 404 }) => Err(Error::not_found(kind.to_string(), id)),
            other => other,
        }
    }
}
