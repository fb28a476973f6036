//! Terminal output: record confirmations on stderr, documents on stdout.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use folio_core::RecordKey;

/// Confirm a write against `key`, e.g. "Stored post:1".
pub fn record_done(action: &str, key: &RecordKey) {
    eprintln!("{} {} {}", "✓".green(), action, key.to_string().bold());
}

pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// One `label: value` line of the config summary.
pub fn field(label: &str, value: &str) {
    println!("{:>10}: {}", label.dimmed(), value);
}

/// Write a record, listing or response envelope to stdout.
pub fn document<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = match pretty {
        true => serde_json::to_string_pretty(value)?,
        false => serde_json::to_string(value)?,
    };
    println!("{text}");
    Ok(())
}
