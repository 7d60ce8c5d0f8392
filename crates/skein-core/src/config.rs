use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::field::{Direction, resolve_sort_path};
use crate::group::SortSpec;

/// Relative location of the project config file.
pub const PROJECT_CONFIG_PATH: &str = ".skein/config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub sort: SortConfig,
}

/// Default sort used when the caller passes no explicit field/direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    #[serde(default = "default_sort_field")]
    pub field: String,
    #[serde(default = "default_direction")]
    pub direction: String,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            field: default_sort_field(),
            direction: default_direction(),
        }
    }
}

impl SortConfig {
    /// Resolve the configured alias and direction into a [`SortSpec`].
    ///
    /// # Errors
    ///
    /// Returns an error if `direction` is not `ascending` or `descending`.
    pub fn spec(&self) -> Result<SortSpec> {
        let direction: Direction = self
            .direction
            .parse()
            .with_context(|| format!("Invalid sort.direction in {PROJECT_CONFIG_PATH}"))?;
        Ok(SortSpec::new(resolve_sort_path(&self.field), direction))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

#[must_use]
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_PATH)
}

/// Location of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("skein/config.toml"))
}

/// Load `.skein/config.toml` under `project_root`, or defaults if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_config_path(project_root);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the user config, or defaults if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(path) = user_config_path() else {
        return Ok(UserConfig::default());
    };
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load both config files and pair them with the output mode the caller
/// already resolved.
///
/// # Errors
///
/// Returns an error if either config file is unreadable or malformed.
pub fn resolve_config(
    project_root: &Path,
    resolved_output: impl Into<String>,
) -> Result<EffectiveConfig> {
    Ok(EffectiveConfig {
        project: load_project_config(project_root)?,
        user: load_user_config()?,
        resolved_output: resolved_output.into(),
    })
}

/// Canonical output mode name for a raw config/env value.
#[must_use]
pub fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        // canonical values
        "pretty" => Some("pretty"),
        "text" => Some("text"),
        "json" => Some("json"),
        // legacy compatibility
        "human" => Some("pretty"),
        "table" => Some("text"),
        _ => None,
    }
}

fn default_sort_field() -> String {
    "number".to_string()
}

fn default_direction() -> String {
    "descending".to_string()
}
