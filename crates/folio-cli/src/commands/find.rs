//! Find command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Args;

use folio_core::{ItemResponse, retrieve_one_by};

use super::parse_kind;
use crate::{output, store};

#[derive(Args, Debug)]
pub struct FindArgs {
    /// Record kind
    pub kind: String,

    /// Property to match
    pub field: String,

    /// Value, read as the property's type
    pub value: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(data: Option<PathBuf>, args: FindArgs) -> Result<()> {
    let kind = parse_kind(&args.kind)?;
    let store = store::open(data)?;

    let record = retrieve_one_by(&store, kind, &args.field, args.value.as_str())
        .await
        .context("Failed to query records")?;

    let Some(record) = record else {
        bail!("No {} with {} = '{}'", kind, args.field, args.value);
    };

    output::document(&ItemResponse::new(&record, Utc::now()), args.pretty)
}
