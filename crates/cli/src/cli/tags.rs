//! `orq tags`: operation counts per tag.

use clap::Args;
use console::style;
use orq_core::{count_by_tag, TagCount};

use crate::cli::common::{current_dir, load_project_config, load_spec};
use crate::cli::run_cli_async;

/// Arguments for `orq tags`.
#[derive(Args, Debug, Clone)]
pub struct TagsArgs {
    /// Configured spec name.
    #[arg(value_name = "SPEC", help = "Spec name. Defaults to the only configured spec")]
    pub spec: Option<String>,
}

/// Run `orq tags`.
pub async fn run(args: TagsArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: TagsArgs) -> Result<(), String> {
    let dir = current_dir()?;
    let config = load_project_config(&dir).await?;
    let (spec_name, document) = load_spec(&dir, &config, args.spec.as_deref()).await?;

    let counts = count_by_tag(&document);
    println!("{} {} tags", style(&spec_name).cyan().bold(), counts.len());
    for tag in &counts {
        println!("  {}", format_tag(tag));
    }
    Ok(())
}

/// `pet (3) - Everything about your Pets`
pub fn format_tag(tag: &TagCount) -> String {
    match &tag.description {
        Some(description) => format!("{} ({}) - {description}", tag.name, tag.count),
        None => format!("{} ({})", tag.name, tag.count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tag() {
        let tag = TagCount {
            name: "pet".into(),
            count: 3,
            description: Some("Everything about your Pets".into()),
        };
        assert_eq!(format_tag(&tag), "pet (3) - Everything about your Pets");

        let tag = TagCount {
            name: "untagged".into(),
            count: 1,
            description: None,
        };
        assert_eq!(format_tag(&tag), "untagged (1)");
    }
}
