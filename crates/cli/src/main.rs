//! `orq` binary entry point.

fn main() {
    std::process::exit(orq_cli::run_cli(std::env::args().collect()));
}
