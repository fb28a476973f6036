//! Delete command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use folio_core::Datastore;

use super::resolve_key;
use crate::{output, store};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// URL-safe record key, or a kind when an id follows
    pub target: String,

    /// Numeric id or key name
    pub id: Option<String>,
}

pub async fn run(data: Option<PathBuf>, args: DeleteArgs) -> Result<()> {
    let key = resolve_key(&args.target, args.id.as_deref())?;
    let store = store::open(data)?;

    store
        .delete(&key)
        .await
        .context("Failed to delete record")?;

    output::record_done("Deleted", &key);

    Ok(())
}
