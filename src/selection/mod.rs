//! Variable set selection
//!
//! Resolves project and library set name filters into variable set ids and
//! fetches the variable sets behind them.
//!
//! # Architecture
//!
//! - [`matcher`] - Classifies name filters (all / single wildcard / exact list)
//! - [`selector`] - Applies a filter to one namespace
//! - [`orchestrator`] - Combines both namespaces into one id list
//! - [`fetcher`] - Fetches variable sets one id at a time
//!
//! # Example
//!
//! ```ignore
//! use octovars::selection::{fetch_variable_sets, resolve, Selection};
//!
//! async fn stands(client: &octovars::octopus::OctopusClient) -> octovars::Result<()> {
//!     let selection = Selection::new(None, Some(vec!["Stands_*".to_string()]));
//!     let ids = resolve(client, &selection).await?;
//!     let sets = fetch_variable_sets(client, &ids).await?;
//!     Ok(())
//! }
//! ```

pub mod fetcher;
pub mod matcher;
pub mod orchestrator;
pub mod selector;

pub use fetcher::fetch_variable_sets;
pub use matcher::{classify, MatchStrategy, NameFilter, WildcardPattern};
pub use orchestrator::{resolve, Selection, VariableSetId};
pub use selector::select;
