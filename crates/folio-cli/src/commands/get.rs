//! Get command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Args;

use folio_core::{Datastore, ItemResponse, retrieve_by_id, retrieve_by_urlsafe};

use super::{key_for, parse_kind};
use crate::{output, store};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// URL-safe record key, or a kind when an id follows
    pub target: String,

    /// Numeric id or key name
    pub id: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(data: Option<PathBuf>, args: GetArgs) -> Result<()> {
    let store = store::open(data)?;

    let record = match &args.id {
        Some(id) => {
            let kind = parse_kind(&args.target)?;
            if id.parse::<i64>().is_ok() {
                retrieve_by_id(&store, kind, id).await
            } else {
                store.get(&key_for(kind, id)).await
            }
        }
        None => retrieve_by_urlsafe(&store, &args.target).await,
    }
    .context("Failed to get record")?;

    let Some(record) = record else {
        bail!("Record not found");
    };

    output::document(&ItemResponse::new(&record, Utc::now()), args.pretty)
}
