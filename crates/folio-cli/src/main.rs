//! folio - CLI tool for a local folio datastore.
//!
//! A thin wrapper over `folio-core` and `folio-file`: stores records,
//! pages through them the way the site's JSON API does, and exposes the
//! display formatters for quick checks.

mod cli;
mod commands;
mod output;
mod store;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let data = cli.data;
    match cli.command {
        Commands::Put(args) => commands::put::run(data, args).await,
        Commands::Get(args) => commands::get::run(data, args).await,
        Commands::Find(args) => commands::find::run(data, args).await,
        Commands::Delete(args) => commands::delete::run(data, args).await,
        Commands::List(args) => commands::list::run(data, args).await,
        Commands::Archive(args) => commands::archive::run(data, args).await,
        Commands::Config(args) => commands::config::run(data, args).await,
        Commands::Ago(args) => commands::ago::run(args),
        Commands::Size(args) => commands::size::run(args),
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so stdout stays machine-readable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
