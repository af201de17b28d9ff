//! Tiny Cache CLI - inspect and manage on-disk TTL cache entries

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tiny_cache::cli::{run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tiny_cache=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(out) => {
            if !out.is_empty() {
                println!("{}", out);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
