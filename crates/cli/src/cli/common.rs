//! Config and spec resolution shared across commands.

use std::path::{Path, PathBuf};

use orq_core::OpenApiDocument;

use crate::config::{load_config, ConfigError, OrqConfig, SpecConfig};
use crate::loader::load_document;

/// The process working directory, with a readable error.
pub fn current_dir() -> Result<PathBuf, String> {
    std::env::current_dir().map_err(|err| format!("Failed to read current directory: {err}"))
}

/// Load the project config, pointing at `orq init` when there is none.
pub async fn load_project_config(dir: &Path) -> Result<OrqConfig, String> {
    load_config(dir).await.map_err(|err| match err {
        ConfigError::NotFound(_) => format!("{err}. Run `orq init` first."),
        other => other.to_string(),
    })
}

/// Pick the spec named `name`, or the only configured spec when `name` is `None`.
pub fn resolve_spec<'c>(
    config: &'c OrqConfig,
    name: Option<&str>,
) -> Result<(&'c str, &'c SpecConfig), String> {
    match name {
        Some(name) => config
            .specs
            .get_key_value(name)
            .map(|(key, spec)| (key.as_str(), spec))
            .ok_or_else(|| {
                let known: Vec<_> = config.specs.keys().map(String::as_str).collect();
                format!(
                    "Spec {name} is not configured. Available: {}",
                    if known.is_empty() {
                        "(none)".to_string()
                    } else {
                        known.join(", ")
                    }
                )
            }),
        None => match config.specs.len() {
            0 => Err("No specs configured. Add one with `orq init --name NAME --url URL`.".to_string()),
            1 => config
                .specs
                .first()
                .map(|(key, spec)| (key.as_str(), spec))
                .ok_or_else(|| "No specs configured.".to_string()),
            _ => Err(format!(
                "Multiple specs configured ({}). Pass a spec name.",
                config.specs.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
            )),
        },
    }
}

/// Relative file sources resolve against the project directory.
pub fn spec_source(dir: &Path, spec: &SpecConfig) -> String {
    if spec.url.starts_with("http://") || spec.url.starts_with("https://") {
        spec.url.clone()
    } else {
        dir.join(&spec.url).to_string_lossy().into_owned()
    }
}

/// Resolve the spec and load its document.
pub async fn load_spec(
    dir: &Path,
    config: &OrqConfig,
    name: Option<&str>,
) -> Result<(String, OpenApiDocument), String> {
    let (spec_name, spec) = resolve_spec(config, name)?;
    let document = load_document(&spec_source(dir, spec))
        .await
        .map_err(|err| format!("[{spec_name}] {err}"))?;
    Ok((spec_name.to_string(), document))
}
