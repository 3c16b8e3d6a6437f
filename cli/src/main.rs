use clap::Parser;
use tracing_subscriber::EnvFilter;

use qrlabel::cli::Cli;
use qrlabel::commands;

#[tokio::main]
async fn main() {
    init_tracing();
    load_dotenv();

    let cli = Cli::parse();
    if let Err(e) = commands::run(cli).await {
        tracing::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load .env from the working directory or its parents, if present.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::debug!("loaded .env from {path}");
            return;
        }
    }
}
