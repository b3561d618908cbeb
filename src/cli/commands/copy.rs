// ===========================================================================
// firesave copy - Duplicate a save
// ===========================================================================

use clap::Args;

use crate::cli::Result;
use crate::config::Config;
use crate::saves;

#[derive(Args)]
pub struct CopyArgs {
    /// Save to copy
    source: String,

    /// Name of the new save
    target: String,
}

pub fn run(args: CopyArgs, config: &Config) -> Result<()> {
    saves::copy(config, &args.source, &args.target)?;
    eprintln!("Copied {} -> {}", args.source, args.target);
    Ok(())
}
