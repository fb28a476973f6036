//! Archive command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use folio_core::archive::month_name;
use folio_core::{Archive, Kind, QuerySpec};

use super::fetch_all;
use crate::{output, store};

#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// Include posts that are not public
    #[arg(long)]
    pub drafts: bool,

    /// Lead each year with its total
    #[arg(long)]
    pub year_totals: bool,

    /// Print the archive as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(data: Option<PathBuf>, args: ArchiveArgs) -> Result<()> {
    let store = store::open(data)?;
    let config = store::site_config(&store).await?;

    let mut spec = QuerySpec::new(Kind::Post).order("-created");
    if !args.drafts {
        spec = spec.filter("is_public", true);
    }
    let posts = fetch_all(&store, &config, &spec).await?;
    let archive = Archive::build(&posts);

    if args.json {
        return output::document(&archive, true);
    }

    if archive.tags.is_empty() && archive.years.is_empty() {
        eprintln!("{}", "No posts found.".dimmed());
        return Ok(());
    }

    if !archive.tags.is_empty() {
        println!("{}", "Tags".bold());
        for tag in &archive.tags {
            println!("  {} {}", tag.title, tag.level.dimmed());
        }
    }

    for year in &archive.years {
        println!("{} ({})", year.year.to_string().bold(), year.posts);
        for (month, posts) in year.buckets(args.year_totals) {
            let label = month_name(month).unwrap_or("Весь год");
            println!("  {:<10} {}", label, posts);
        }
    }

    Ok(())
}
