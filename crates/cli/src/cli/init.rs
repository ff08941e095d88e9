//! `orq init`: create the project config or register a spec in it.

use std::path::Path;

use clap::Args;
use console::style;
use orq_core::ts::utils::is_valid_spec_name;
use tracing::debug;

use crate::cli::common::current_dir;
use crate::cli::run_cli_async;
use crate::config::{config_path, load_config, save_config, ConfigError, OrqConfig, SpecConfig};

/// Arguments for `orq init`.
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Spec name to register.
    #[arg(long, short = 'n', requires = "url", help = "Spec name in UPPER_SNAKE_CASE (e.g. PETSTORE)")]
    pub name: Option<String>,
    /// Document location for `name`.
    #[arg(long, short = 'u', requires = "name", help = "OpenAPI document URL or file path")]
    pub url: Option<String>,
    /// Free-form spec description.
    #[arg(long, short = 'd', help = "Description of the spec")]
    pub description: Option<String>,
    /// Output directory, stored as `outputPath`.
    #[arg(long, short = 'o', help = "Directory generated files are written to")]
    pub output: Option<String>,
}

/// Run `orq init` in the current directory.
pub async fn run(args: InitArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: InitArgs) -> Result<(), String> {
    let dir = current_dir()?;
    let created = init_project(&dir, &args).await?;

    let path = config_path(&dir);
    if created {
        println!("{} Created {}", style("✓").green(), path.display());
    } else {
        println!("{} Updated {}", style("✓").green(), path.display());
    }
    if let Some(name) = &args.name {
        println!("  Added spec {}", style(name).cyan().bold());
    }
    Ok(())
}

/// Create or extend the config in `dir`. Returns `true` when the file is new.
pub async fn init_project(dir: &Path, args: &InitArgs) -> Result<bool, String> {
    let (mut config, created) = match load_config(dir).await {
        Ok(config) => (config, false),
        Err(ConfigError::NotFound(_)) => (OrqConfig::default(), true),
        Err(err) => return Err(err.to_string()),
    };

    if let Some(output) = &args.output {
        config.output_path = Some(output.clone());
    }

    if let (Some(name), Some(url)) = (&args.name, &args.url) {
        if !is_valid_spec_name(name) {
            return Err(format!(
                "Invalid spec name {name:?}. Use UPPER_SNAKE_CASE (e.g. PETSTORE, MY_API_V2)."
            ));
        }
        if config.specs.contains_key(name) {
            debug!(name = %name, "Replacing existing spec.");
        }
        config.specs.insert(
            name.clone(),
            SpecConfig {
                url: url.clone(),
                description: args.description.clone(),
            },
        );
    }

    save_config(&config, dir).await.map_err(|err| err.to_string())?;
    Ok(created)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(name: Option<&str>, url: Option<&str>, output: Option<&str>) -> InitArgs {
        InitArgs {
            name: name.map(String::from),
            url: url.map(String::from),
            description: None,
            output: output.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_init_creates_then_extends() {
        let dir = TempDir::new().unwrap();

        let created = init_project(dir.path(), &args(None, None, Some("web/api")))
            .await
            .unwrap();
        assert!(created);

        let created = init_project(
            dir.path(),
            &args(Some("PETSTORE"), Some("https://example.com/openapi.json"), None),
        )
        .await
        .unwrap();
        assert!(!created);

        let config = load_config(dir.path()).await.unwrap();
        assert_eq!(config.output_path(), "web/api");
        assert_eq!(config.specs["PETSTORE"].url, "https://example.com/openapi.json");
    }

    #[tokio::test]
    async fn test_init_rejects_bad_name() {
        let dir = TempDir::new().unwrap();
        let err = init_project(dir.path(), &args(Some("petstore"), Some("x.json"), None))
            .await
            .unwrap_err();
        assert!(err.contains("UPPER_SNAKE_CASE"));
        assert!(!config_path(dir.path()).exists());
    }
}
