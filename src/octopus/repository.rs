//! Repository finders
//!
//! The server only offers "list everything" and "get one by id" for the
//! collections we need, so `find_many` filters client-side. There is no batch
//! get: fetching several ids is always a loop over [`get_by_id`].

use super::model::{Resource, ResourceKind};
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Raw access to server collections
#[allow(async_fn_in_trait)]
pub trait Repository {
    /// Every item of a collection, in server order
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>>;

    /// One item by id. Fails with [`Error::ResourceNotFound`] when the id is unknown
    async fn get(&self, kind: ResourceKind, id: &str) -> Result<Value>;
}

/// Fetch all resources of type `R`
pub async fn find_all<R, Repo>(repo: &Repo) -> Result<Vec<R>>
where
    R: Resource,
    Repo: Repository + ?Sized,
{
    repo.list(R::KIND)
        .await?
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(Error::from))
        .collect()
}

/// Fetch resources of type `R` accepted by `predicate`, keeping server order
pub async fn find_many<R, Repo, P>(repo: &Repo, mut predicate: P) -> Result<Vec<R>>
where
    R: Resource,
    Repo: Repository + ?Sized,
    P: FnMut(&R) -> bool,
{
    let all: Vec<R> = find_all(repo).await?;
    Ok(all.into_iter().filter(|item| predicate(item)).collect())
}

/// Fetch a single resource of type `R`
pub async fn get_by_id<R, Repo>(repo: &Repo, id: &str) -> Result<R>
where
    R: Resource,
    Repo: Repository + ?Sized,
{
    let value = repo.get(R::KIND, id).await?;
    Ok(serde_json::from_value(value)?)
}

/// Repository backed by in-process JSON documents.
///
/// Items are looked up by their `Id` field. Used by tests and by callers that
/// already hold an export of the server's collections.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    collections: HashMap<ResourceKind, Vec<Value>>,
    gets: AtomicUsize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to a collection
    pub fn insert(&mut self, kind: ResourceKind, item: Value) {
        self.collections.entry(kind).or_default().push(item);
    }

    pub fn with(mut self, kind: ResourceKind, item: Value) -> Self {
        self.insert(kind, item);
        self
    }

    /// Number of `get` calls served so far
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::Relaxed)
    }
}

impl Repository for MemoryRepository {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<Value>> {
        Ok(self.collections.get(&kind).cloned().unwrap_or_default())
    }

    async fn get(&self, kind: ResourceKind, id: &str) -> Result<Value> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.collections
            .get(&kind)
            .and_then(|items| {
                items
                    .iter()
                    .find(|item| item.get("Id").and_then(Value::as_str) == Some(id))
            })
            .cloned()
            .ok_or_else(|| Error::not_found(kind.to_string(), id))
    }
}
