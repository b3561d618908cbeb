// ===========================================================================
// firesave - Named Save Slots for the Firebase Emulator
// ===========================================================================

pub mod cli;
pub mod config;
pub mod logging;
pub mod meta;
pub mod process;
pub mod prompt;
pub mod saves;

pub use config::Config;
pub use meta::SaveMeta;
