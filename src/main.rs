mod cli;
mod config;
mod fingerprint;
mod marker;
mod model;
mod network;
mod scheduler;
mod tasks;
mod transfer;
mod trigger;

use std::{io, process};

use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
