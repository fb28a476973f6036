//! List command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use tracing::warn;
use url::Url;

use folio_core::query::FilterValue;
use folio_core::serialize::to_json_list;
use folio_core::{ListResponse, Period, QuerySpec, retrieve};

use super::{fetch_all, group_assignments, parse_kind};
use crate::{output, store};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Record kind
    pub kind: String,

    /// Order spec, e.g. `-created,title`
    #[arg(long, allow_hyphen_values = true)]
    pub order: Option<String>,

    /// Equality filter; repeating a field requires every value
    #[arg(long = "filter", short = 'f', value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Only records created in this year
    #[arg(long)]
    pub year: Option<i32>,

    /// Narrow --year to one month
    #[arg(long, requires = "year")]
    pub month: Option<u32>,

    /// Page size (defaults to the configured page size)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Continue after a cursor from an earlier page
    #[arg(long, allow_hyphen_values = true)]
    pub cursor: Option<String>,

    /// Request URL, used to build `more_url`
    #[arg(long)]
    pub url: Option<Url>,

    /// Follow cursors and print every record, one per line
    #[arg(long)]
    pub all: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl ListArgs {
    fn spec(&self) -> Result<QuerySpec> {
        let mut spec = QuerySpec::new(parse_kind(&self.kind)?);

        if let Some(order) = &self.order {
            spec = spec.order(order.as_str());
        }
        for (field, values) in group_assignments(&self.filters)? {
            let value = match <[String; 1]>::try_from(values) {
                Ok([single]) => FilterValue::from(single),
                Err(values) => FilterValue::all(values),
            };
            spec = spec.filter(field, value);
        }
        if let Some(year) = self.year {
            spec = spec.period(Period::month(year, self.month)?);
        }
        if let Some(limit) = self.limit {
            spec = spec.limit(limit);
        }
        Ok(spec.cursor(self.cursor.clone()))
    }
}

pub async fn run(data: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let spec = args.spec()?;
    let store = store::open(data)?;
    let config = store::site_config(&store).await?;

    if args.all {
        let records = fetch_all(&store, &config, &spec.cursor(None)).await?;
        for record in to_json_list(&records) {
            output::document(&record, args.pretty)?;
        }
        return Ok(());
    }

    let page = match retrieve(&store, &config, &spec).await {
        Err(e) if e.is_invalid_cursor() => {
            warn!(error = %e, "Discarding cursor");
            output::warn("Cursor does not belong to this query; starting from the first page");
            retrieve(&store, &config, &spec.clone().cursor(None)).await
        }
        other => other,
    }
    .context("Failed to list records")?;

    if page.records.is_empty() {
        eprintln!("{}", "No records found.".dimmed());
    }

    let response = ListResponse::from_page(&page, args.url.as_ref(), Utc::now());
    output::document(&response, args.pretty)
}
