// ===========================================================================
// firesave delete - Remove a save
// ===========================================================================

use clap::Args;

use crate::cli::Result;
use crate::config::Config;
use crate::prompt;
use crate::saves;

#[derive(Args)]
pub struct DeleteArgs {
    /// Save to delete
    name: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

pub fn run(args: DeleteArgs, config: &Config) -> Result<()> {
    // Check before asking, so the prompt is never shown for a missing save
    let dir = saves::save_path(config, &args.name)?;
    if !dir.is_dir() {
        return Err(saves::Error::NotFound(args.name).into());
    }

    if !args.yes && !prompt::confirm(&prompt::delete_prompt(&args.name))? {
        eprintln!("Cancelled.");
        return Ok(());
    }

    saves::delete(config, &args.name)?;
    eprintln!("Deleted save: {}", args.name);
    Ok(())
}
