//! `orq list`: operations grouped by tag.

use clap::Args;
use console::style;
use orq_core::{extract_operations, group_by_tag, OperationDescriptor};

use crate::cli::common::{current_dir, load_project_config, load_spec};
use crate::cli::run_cli_async;

/// Arguments for `orq list`.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Configured spec name.
    #[arg(value_name = "SPEC", help = "Spec name. Defaults to the only configured spec")]
    pub spec: Option<String>,
    /// Tag filter.
    #[arg(long, short = 't', help = "Only show operations with this tag")]
    pub tag: Option<String>,
}

/// Run `orq list`.
pub async fn run(args: ListArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: ListArgs) -> Result<(), String> {
    let dir = current_dir()?;
    let config = load_project_config(&dir).await?;
    let (spec_name, document) = load_spec(&dir, &config, args.spec.as_deref()).await?;

    let operations = extract_operations(&document);
    let groups = grouped_listing(&operations, args.tag.as_deref())?;

    println!(
        "{} {} operations",
        style(&spec_name).cyan().bold(),
        operations.len()
    );
    for (tag, lines) in groups {
        println!();
        println!("{}", style(format!("[{tag}]")).yellow().bold());
        for line in lines {
            println!("  {line}");
        }
    }
    Ok(())
}

/// Display lines per tag, optionally restricted to one tag.
pub fn grouped_listing(
    operations: &[OperationDescriptor],
    tag: Option<&str>,
) -> Result<Vec<(String, Vec<String>)>, String> {
    let groups: Vec<(String, Vec<String>)> = group_by_tag(operations)
        .into_iter()
        .filter(|(name, _)| tag.is_none_or(|t| t == name.as_str()))
        .map(|(name, ops)| (name, ops.iter().map(|op| op.display()).collect()))
        .collect();

    match tag {
        Some(tag) if groups.is_empty() => Err(format!("No operations tagged {tag:?}.")),
        _ => Ok(groups),
    }
}
