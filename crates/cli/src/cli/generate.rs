//! `orq generate`: one TypeScript file per operation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use orq_core::{
    extract_operations, generate_operation_file, GenerateOptions, OpenApiDocument,
    SchemaRegistry,
};
use tracing::{debug, info, warn};

use crate::cli::common::{current_dir, load_project_config, load_spec};
use crate::cli::run_cli_async;
use crate::config::OrqConfig;
use crate::files::{generate_full_path, write_file_safe};

/// Arguments for `orq generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Configured spec name.
    #[arg(value_name = "SPEC", help = "Spec name. Defaults to the only configured spec")]
    pub spec: Option<String>,
    /// Operation ids to generate. Empty means all.
    #[arg(
        long = "operation",
        short = 'o',
        value_name = "OPERATION_ID",
        help = "Only generate these operations (repeatable)"
    )]
    pub operations: Vec<String>,
    /// Report paths only.
    #[arg(long, help = "Print the files that would be written without writing them")]
    pub dry_run: bool,
}

/// Run `orq generate`, writing under the configured output path.
pub async fn run(args: GenerateArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: GenerateArgs) -> Result<(), String> {
    let start = Instant::now();
    let dir = current_dir()?;
    let config = load_project_config(&dir).await?;
    let (spec_name, document) = load_spec(&dir, &config, args.spec.as_deref()).await?;

    let paths = generate_spec(&dir, &config, &spec_name, &document, &args.operations, args.dry_run).await?;

    for path in &paths {
        let shown = path.strip_prefix(&dir).unwrap_or(path.as_path());
        if args.dry_run {
            println!("  {} {}", style("would write").dim(), shown.display());
        } else {
            println!("  {} {}", style("✓").green(), shown.display());
        }
    }
    println!(
        "{} {} files for {} in {}ms",
        if args.dry_run { "Planned" } else { "Generated" },
        paths.len(),
        style(&spec_name).cyan().bold(),
        start.elapsed().as_millis()
    );
    Ok(())
}

/// Generate files for `document` under `{dir}/{outputPath}/{spec_name}/`.
///
/// An empty `only` selects every operation. Returns the paths written, or
/// that would be written when `dry_run` is set.
pub async fn generate_spec(
    dir: &Path,
    config: &OrqConfig,
    spec_name: &str,
    document: &OpenApiDocument,
    only: &[String],
    dry_run: bool,
) -> Result<Vec<PathBuf>, String> {
    let registry = SchemaRegistry::from_document(document);
    let options = GenerateOptions {
        flags: config.generation_flags(),
    };
    let output = dir.join(config.output_path());

    let mut operations = extract_operations(document);
    if !only.is_empty() {
        let unknown: Vec<_> = only
            .iter()
            .filter(|id| !operations.iter().any(|op| &op.operation_id == *id))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(format!("Unknown operation(s): {}", unknown.join(", ")));
        }
        operations.retain(|op| only.contains(&op.operation_id));
    }

    info!(
        spec = spec_name,
        operations = operations.len(),
        schemas = registry.len(),
        "Generating types."
    );

    let mut paths = Vec::with_capacity(operations.len());
    for op in &operations {
        let file = generate_operation_file(&registry, op, &options);
        if !file.unresolved.is_empty() {
            warn!(
                operation = %op.operation_id,
                names = ?file.unresolved,
                "Unresolved schema references emitted as bare names."
            );
        }

        let path = generate_full_path(&output, spec_name, op.method, &op.path);
        if dry_run {
            debug!(path = %path.display(), "Dry run, skipping write.");
        } else {
            write_file_safe(&path, &file.source)
                .await
                .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
        }
        paths.push(path);
    }

    Ok(paths)
}
