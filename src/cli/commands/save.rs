// ===========================================================================
// firesave save - Export the emulators into a named save
// ===========================================================================

use clap::Args;

use crate::cli::Result;
use crate::config::Config;
use crate::process::Firebase;
use crate::saves;

#[derive(Args)]
pub struct SaveArgs {
    /// Name of the save (letters, digits, space, '_', '.', '-')
    name: String,

    /// Description shown by 'firesave list' (kept from the previous save if omitted)
    #[arg(short, long, value_name = "TEXT")]
    description: Option<String>,
}

pub fn run(args: SaveArgs, config: &Config) -> Result<()> {
    let firebase = Firebase::from_config(config);
    let meta = saves::create_or_update(
        config,
        &firebase,
        &args.name,
        args.description.as_deref(),
        false,
    )?;

    eprintln!("Saved '{}'", meta.name);
    Ok(())
}
