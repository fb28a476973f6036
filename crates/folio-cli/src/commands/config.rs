//! Config command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::{output, store};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the configuration as JSON only
    #[arg(long)]
    pub json: bool,
}

pub async fn run(data: Option<PathBuf>, args: ConfigArgs) -> Result<()> {
    let store = store::open(data)?;
    let config = store::site_config(&store).await?;

    if args.json {
        return output::document(&config, true);
    }

    output::field("Data", &store.root().display().to_string());
    output::field("Brand", &config.brand_name);
    output::field("Page size", &config.default_page_size.to_string());
    output::field("Feed limit", &config.feed_limit.to_string());
    if let Some(base_url) = &config.base_url {
        output::field("Base URL", base_url);
    }
    if !config.feedback_email.is_empty() {
        output::field("Feedback", &config.feedback_email);
    }
    if config.has_announcement() {
        output::field(
            &format!("Announcement ({:?})", config.announcement_type),
            &config.announcement_html,
        );
    }

    Ok(())
}
