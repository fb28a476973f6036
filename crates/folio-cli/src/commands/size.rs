//! Size command implementation.

use anyhow::Result;
use clap::Args;

use folio_core::humanize::HumanSize;

use crate::output;

#[derive(Args, Debug)]
pub struct SizeArgs {
    /// Byte count
    pub bytes: u64,

    /// Decimal places for scaled units
    #[arg(long, default_value_t = 2)]
    pub precision: usize,

    /// Also print the unit index and scaled value
    #[arg(long)]
    pub detail: bool,
}

pub fn run(args: SizeArgs) -> Result<()> {
    let size = HumanSize::from_bytes(args.bytes);

    println!("{}", size.format(args.precision));
    if args.detail {
        output::field("Unit", &format!("{} ({})", size.unit(), size.unit_name()));
        output::field("Value", &size.value().to_string());
    }
    Ok(())
}
