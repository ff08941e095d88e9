#![forbid(unsafe_code)]
#![deny(warnings, unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! The `orq` command line: project config, description loading and
//! per-operation file output on top of `orq-core`.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod cli;
pub mod config;
pub mod files;
pub mod loader;

#[derive(Parser)]
#[command(
    name = "orq",
    version,
    about = "\x1b[33morq\x1b[0m generates TypeScript types from OpenAPI specs"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or extend orq.config.json
    Init(cli::init::InitArgs),
    /// List operations grouped by tag
    List(cli::list::ListArgs),
    /// Show operation counts per tag
    Tags(cli::tags::TagsArgs),
    /// Generate one TypeScript file per operation
    Generate(cli::generate::GenerateArgs),
}

/// Parse `args`, run the command on a multi-threaded runtime and return the
/// process exit code.
pub fn run_cli(args: Vec<String>) -> i32 {
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_cli_async(args))
}

async fn run_cli_async(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Init(args)) => cli::init::run(args).await,
            Some(Commands::List(args)) => cli::list::run(args).await,
            Some(Commands::Tags(args)) => cli::tags::run(args).await,
            Some(Commands::Generate(args)) => cli::generate::run(args).await,
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn init_tracing() {
    // ORQ_LOG takes a plain level ("debug") scoped to the orq crates,
    // or a full filter spec like "orq_cli=debug,reqwest=warn"
    let filter = match std::env::var("ORQ_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("orq_cli={level},orq_core={level}")
        }
        Ok(spec) => spec,
        Err(_) => "orq_cli=info,orq_core=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
