//! `orq.config.json` project configuration.
//!
//! Unknown top-level keys are carried through load/save untouched.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Config file looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "orq.config.json";
/// Used when `outputPath` is unset.
pub const DEFAULT_OUTPUT_PATH: &str = "src/api";

/// Errors reading or writing `orq.config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config in the directory.
    #[error("orq.config.json not found in {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but is not valid config JSON.
    #[error("Invalid JSON in orq.config.json: {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Read or write was refused.
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Any other I/O failure.
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing the config failed.
    #[error("Failed to serialize orq.config.json: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConfigError {
    fn from_io(path: PathBuf, err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path),
            ErrorKind::PermissionDenied => ConfigError::PermissionDenied(path),
            _ => ConfigError::Io { path, source: err },
        }
    }
}

/// Major version of the generated hooks' query library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum ReactQueryVersion {
    V3,
    V4,
    V5,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// `reactQuery` section. Stored and written back, not interpreted.
pub struct ReactQueryConfig {
    /// Library major version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<ReactQueryVersion>,
    /// Module the hooks import from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,
}

/// Which declaration kinds to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct GenerateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_hook: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutation_hook: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspense_hook: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infinite_query_hook: Option<bool>,
}

impl GenerateConfig {
    /// Names of the flags set to `true`, in declaration order.
    pub fn enabled_flags(self) -> Vec<String> {
        [
            ("queryHook", self.query_hook),
            ("mutationHook", self.mutation_hook),
            ("suspenseHook", self.suspense_hook),
            ("infiniteQueryHook", self.infinite_query_hook),
        ]
        .into_iter()
        .filter(|(_, enabled)| *enabled == Some(true))
        .map(|(name, _)| name.to_string())
        .collect()
    }
}

/// One entry under `specs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecConfig {
    /// URL or path (relative to the project directory).
    pub url: String,
    /// Shown in listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Contents of `orq.config.json`.
pub struct OrqConfig {
    /// JSON schema pointer for editors.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Root directory for generated files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// HTTP client the generated code targets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_client: Option<String>,
    /// Shorthand for `reactQuery.version`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub react_query_version: Option<ReactQueryVersion>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub react_query: Option<ReactQueryConfig>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate: Option<GenerateConfig>,
    /// Spec name (UPPER_SNAKE_CASE) to source.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub specs: IndexMap<String, SpecConfig>,
    /// Keys this version does not know.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl OrqConfig {
    /// `outputPath`, or [`DEFAULT_OUTPUT_PATH`].
    pub fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    /// Flags forwarded to generation, from the `generate` section.
    pub fn generation_flags(&self) -> Vec<String> {
        self.generate
            .map(GenerateConfig::enabled_flags)
            .unwrap_or_default()
    }
}

/// `{dir}/orq.config.json`
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Read and parse the config in `dir`.
pub async fn load_config(dir: &Path) -> Result<OrqConfig, ConfigError> {
    let path = config_path(dir);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|err| ConfigError::from_io(path.clone(), err))?;
    let config = serde_json::from_str(&content)
        .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
    debug!(path = %path.display(), "Loaded config.");
    Ok(config)
}

/// Write `config` as pretty JSON (2-space indent).
pub async fn save_config(config: &OrqConfig, dir: &Path) -> Result<(), ConfigError> {
    let path = config_path(dir);
    let mut content = serde_json::to_string_pretty(config)?;
    content.push('\n');
    tokio::fs::write(&path, content)
        .await
        .map_err(|err| ConfigError::from_io(path.clone(), err))?;
    debug!(path = %path.display(), "Saved config.");
    Ok(())
}

/// True only when the file exists and parses.
pub async fn config_exists(dir: &Path) -> bool {
    load_config(dir).await.is_ok()
}
