// ===========================================================================
// cli/commands - Command Implementations
// ===========================================================================

pub mod copy;
pub mod delete;
pub mod launch;
pub mod list;
pub mod save;

// Re-export argument types
pub use copy::CopyArgs;
pub use delete::DeleteArgs;
pub use launch::LaunchArgs;
pub use save::SaveArgs;
