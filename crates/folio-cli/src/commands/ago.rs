//! Ago command implementation.

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use folio_core::humanize::format_ago;

use super::parse_timestamp;

#[derive(Args, Debug)]
pub struct AgoArgs {
    /// Timestamp, `YYYY-MM-DD HH:MM:SS UTC` or RFC 3339
    pub when: String,

    /// Reference time instead of the current time
    #[arg(long)]
    pub now: Option<String>,
}

pub fn run(args: AgoArgs) -> Result<()> {
    let then = parse_timestamp(&args.when)?;
    let now = match &args.now {
        Some(raw) => parse_timestamp(raw)?,
        None => Utc::now(),
    };

    println!("{}", format_ago(then, now));
    Ok(())
}
