//! Octopus API interaction module
//!
//! This module provides the connection to an Octopus Deploy server and the
//! repository finders the selection pipeline is written against.
//!
//! # Module Structure
//!
//! - [`client`] - Octopus client bound to one server, API key and space
//! - [`http`] - HTTP utilities for REST API calls
//! - [`model`] - Projects, library variable sets and variable sets
//! - [`repository`] - `find_all` / `find_many` / `get_by_id` finders
//!
//! # Example
//!
//! ```ignore
//! use octovars::octopus::{client::OctopusClient, model::Project, repository};
//!
//! async fn example() -> octovars::Result<()> {
//!     let client = OctopusClient::new("https://octopus.example.com", "API-XXXX", None)?;
//!     let projects: Vec<Project> = repository::find_all(&client).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod model;
pub mod repository;

pub use client::OctopusClient;
pub use model::{LibraryVariableSet, NamedResource, Project, Resource, ResourceKind, VariableSet};
pub use repository::{MemoryRepository, Repository};
