// ===========================================================================
// cli - Command Line Interface
// ===========================================================================

mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::Config;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] crate::config::Error),

    #[error(transparent)]
    Save(#[from] crate::saves::Error),

    #[error(transparent)]
    Process(#[from] crate::process::Error),

    #[error(transparent)]
    Meta(#[from] crate::meta::Error),

    #[error(transparent)]
    Prompt(#[from] crate::prompt::Error),
}

#[derive(Parser)]
#[command(
    name = "firesave",
    version,
    about = "Named save slots for the Firebase emulator",
    after_help = "Saves live under 'saveLocation' (default ./firesave) next to firesave.json."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the config file (default: ./firesave.json)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Start the emulators with a save loaded
    Launch(commands::LaunchArgs),

    /// Export the running emulators into a named save
    Save(commands::SaveArgs),

    /// List existing saves
    #[command(alias = "ls")]
    List,

    /// Duplicate a save under a new name
    Copy(commands::CopyArgs),

    /// Delete a save
    #[command(alias = "rm")]
    Delete(commands::DeleteArgs),
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match self.command {
            Command::Launch(args) => commands::launch::run(args, &config),
            Command::Save(args) => commands::save::run(args, &config),
            Command::List => commands::list::run(&config),
            Command::Copy(args) => commands::copy::run(args, &config),
            Command::Delete(args) => commands::delete::run(args, &config),
        }
    }
}
