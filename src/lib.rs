//! octovars
//!
//! Query Octopus Deploy variable sets by project or library set name.
//! Names are matched case-insensitively, either exactly or with a single
//! wildcard pattern.

pub mod command;
pub mod config;
pub mod error;
pub mod octopus;
pub mod output;
pub mod selection;

pub use command::GetVariableSet;
pub use error::{Error, Result};

/// Version injected at compile time via OCTOVARS_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("OCTOVARS_VERSION") {
    Some(v) => v,
    None => "dev",
};
