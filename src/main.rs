//! Yunque CLI — Rust-native make.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = yunque::cli::Cli::parse();
    if let Err(e) = yunque::cli::run(cli) {
        eprintln!("yunque: {}", e);
        std::process::exit(2);
    }
}
