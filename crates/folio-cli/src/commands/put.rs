//! Put command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use folio_core::model::FieldType;
use folio_core::{Datastore, Record, Value};

use super::{group_assignments, key_for, parse_kind};
use crate::{output, store};

/// Fields the store maintains itself.
const MANAGED: &[&str] = &["key", "id", "version", "modified"];

#[derive(Args, Debug)]
pub struct PutArgs {
    /// Record kind (post, file, folder, user, config)
    pub kind: String,

    /// Id or name of the record to create or update
    #[arg(long)]
    pub id: Option<String>,

    /// Property assignment; repeat for list properties, empty value unsets
    #[arg(long = "set", short = 's', value_name = "FIELD=VALUE")]
    pub sets: Vec<String>,
}

pub async fn run(data: Option<PathBuf>, args: PutArgs) -> Result<()> {
    let kind = parse_kind(&args.kind)?;
    let store = store::open(data)?;

    let mut record = match &args.id {
        Some(id) => {
            let key = key_for(kind, id);
            let existing = store.get(&key).await.context("Failed to read record")?;
            existing.unwrap_or_else(|| Record::new(kind).with_key(key))
        }
        None => Record::new(kind),
    };

    assign(&mut record, &args.sets)?;

    let key = store.put(record).await.context("Failed to store record")?;

    println!("{}", key.to_urlsafe());
    output::record_done("Stored", &key);

    Ok(())
}

/// Apply `field=value` assignments, typed by the kind's schema.
pub fn assign(record: &mut Record, sets: &[String]) -> Result<()> {
    let schema = record.schema();

    for (field, values) in group_assignments(sets)? {
        if MANAGED.contains(&field.as_str()) {
            bail!("'{}' is maintained by the datastore", field);
        }
        if schema.computed.iter().any(|c| c.name == field) {
            bail!("'{}' is computed and cannot be set", field);
        }
        let ty = schema
            .field_type(&field)
            .with_context(|| format!("{} has no property '{}'", record.kind(), field))?;

        if field == "created" {
            let created = ty
                .parse(&field, &values.join(""))?
                .as_datetime()
                .context("Not a timestamp")?;
            record.set_created(created);
            continue;
        }

        let value = match (ty, values.as_slice()) {
            (_, [single]) if single.is_empty() => Value::Null,
            (FieldType::List(_), _) => Value::List(
                values
                    .iter()
                    .filter(|v| !v.is_empty())
                    .map(|v| ty.parse(&field, v))
                    .collect::<folio_core::Result<_>>()?,
            ),
            (_, [single]) => ty.parse(&field, single)?,
            _ => bail!("'{}' takes a single value", field),
        };
        record.set(&field, value);
    }

    Ok(())
}
