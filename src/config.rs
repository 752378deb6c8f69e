//! Configuration Management
//!
//! Handles persistent configuration storage for octovars and works out the
//! effective connection settings (CLI > environment > config file).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variables holding the server URL, in lookup order
pub const URL_ENV_VARS: &[&str] = &["OctopusURL", "OCTOPUS_URL"];

/// Environment variables holding the API key, in lookup order
pub const API_KEY_ENV_VARS: &[&str] = &["OctopusAPIKey", "OCTOPUS_API_KEY"];

/// Environment variables holding the space id, in lookup order
pub const SPACE_ENV_VARS: &[&str] = &["OctopusSpace", "OCTOPUS_SPACE"];

/// Owner read/write only
#[cfg(unix)]
const CONFIG_FILE_MODE: u32 = 0o600;

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Octopus server URL
    #[serde(default)]
    pub server_url: Option<String>,
    /// API key used for every request
    #[serde(default)]
    pub api_key: Option<String>,
    /// Space to query; the server default space when unset
    #[serde(default)]
    pub space_id: Option<String>,
    /// Emit raw server resources unless friendly output is requested
    #[serde(default = "default_resource_only")]
    pub resource_only: bool,
}

fn default_resource_only() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: None,
            api_key: None,
            space_id: None,
            resource_only: default_resource_only(),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub server_url: Option<String>,
    pub api_key: Option<String>,
    pub space_id: Option<String>,
}

/// Settings needed to open a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub server_url: String,
    pub api_key: String,
    pub space_id: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("octovars").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file; defaults when missing or invalid
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to a specific file.
    ///
    /// The file holds the API key, so on Unix it is readable by the owner only.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::config(format!("Cannot create {:?}: {}", parent, e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        let write_err = |e: std::io::Error| Error::config(format!("Cannot write {:?}: {}", path, e));

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(CONFIG_FILE_MODE);
        }
        let mut file = options.open(path).map_err(write_err)?;

        // The open mode only applies to new files
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(CONFIG_FILE_MODE))
                .map_err(write_err)?;
        }

        file.write_all(content.as_bytes()).map_err(write_err)?;

        Ok(())
    }

    /// Resolve connection settings (CLI > environment > config)
    pub fn connection(&self, overrides: &ConnectionOverrides) -> Result<ConnectionSettings> {
        self.connection_with(overrides, |name| std::env::var(name).ok())
    }

    /// Same as [`Config::connection`] with an injectable environment lookup
    pub fn connection_with<F>(
        &self,
        overrides: &ConnectionOverrides,
        env: F,
    ) -> Result<ConnectionSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = pick(&overrides.server_url, URL_ENV_VARS, &env, &self.server_url)
            .ok_or_else(|| {
                Error::config("No Octopus server configured. Set OctopusURL or use --server")
            })?;

        let api_key = pick(&overrides.api_key, API_KEY_ENV_VARS, &env, &self.api_key)
            .ok_or_else(|| {
                Error::config("No Octopus API key configured. Set OctopusAPIKey or use --api-key")
            })?;

        let space_id = pick(&overrides.space_id, SPACE_ENV_VARS, &env, &self.space_id);

        Ok(ConnectionSettings {
            server_url,
            api_key,
            space_id,
        })
    }

    /// Remember connection settings for later invocations
    pub fn remember(&mut self, settings: &ConnectionSettings) {
        self.server_url = Some(settings.server_url.clone());
        self.api_key = Some(settings.api_key.clone());
        self.space_id = settings.space_id.clone();
    }
}

fn pick<F>(cli: &Option<String>, env_vars: &[&str], env: &F, file: &Option<String>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |v: &String| !v.trim().is_empty();

    cli.clone()
        .filter(non_empty)
        .or_else(|| env_vars.iter().find_map(|name| env(name).filter(non_empty)))
        .or_else(|| file.clone().filter(non_empty))
}
