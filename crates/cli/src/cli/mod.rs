//! Subcommand implementations. Each `run` returns the process exit code.

pub mod common;
pub mod generate;
pub mod init;
pub mod list;
pub mod tags;

/// Await `f`, printing its error to stderr. Returns 0 on success, 1 otherwise.
pub async fn run_cli_async<F, Fut>(f: F) -> i32
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), String>>,
{
    match f().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}
