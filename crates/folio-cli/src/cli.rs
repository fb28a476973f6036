//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{ago, archive, config, delete, find, get, list, put, size};

/// Explore and edit a local folio datastore.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version = env!("FOLIO_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Data directory (defaults to $FOLIO_DATA, then the platform data dir)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or update a record
    Put(put::PutArgs),

    /// Fetch a single record
    Get(get::GetArgs),

    /// Fetch the first record whose field equals a value
    Find(find::FindArgs),

    /// Delete a record
    Delete(delete::DeleteArgs),

    /// List one page of records
    List(list::ListArgs),

    /// Show tag ranks and the dated post archive
    Archive(archive::ArchiveArgs),

    /// Show the effective site configuration
    Config(config::ConfigArgs),

    /// Format a timestamp relative to now
    Ago(ago::AgoArgs),

    /// Format a byte count
    Size(size::SizeArgs),
}
