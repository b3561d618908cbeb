// ===========================================================================
// process - Firebase Emulator Invocation
// ===========================================================================

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use tracing::debug;

use crate::config::Config;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to spawn '{cmd}': {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{cmd}' failed with status: {status}")]
    Failed { cmd: String, status: ExitStatus },

    #[error("failed to wait for '{cmd}': {source}")]
    Wait {
        cmd: String,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can export emulator state into a directory
pub trait Emulator {
    /// Export into `dest`, returning once the export has finished
    fn export(&self, dest: &Path) -> Result<()>;
}

/// The firebase CLI, invoked through the shell so `firebaseCmd` may be
/// something like `npx firebase`
#[derive(Debug, Clone)]
pub struct Firebase {
    cmd: String,
}

impl Firebase {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.firebase_cmd.clone())
    }

    /// Build `<cmd> <args...>` with inherited stdio
    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            // "$@" keeps paths with spaces intact
            let mut c = Command::new("sh");
            c.arg("-c")
                .arg(format!("{} \"$@\"", self.cmd))
                .arg("firesave");
            c
        };

        command
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }

    /// Spawn `emulators:start`, optionally importing a save and exporting on exit
    pub fn start(&self, import: Option<&Path>, export_on_exit: Option<&Path>) -> Result<Child> {
        let mut args: Vec<&OsStr> = vec![OsStr::new("emulators:start")];
        if let Some(dir) = import {
            args.push(OsStr::new("--import"));
            args.push(dir.as_os_str());
        }
        if let Some(dir) = export_on_exit {
            args.push(OsStr::new("--export-on-exit"));
            args.push(dir.as_os_str());
        }

        debug!(cmd = %self.cmd, ?args, "starting emulators");
        self.command(args).spawn().map_err(|source| Error::Spawn {
            cmd: self.cmd.clone(),
            source,
        })
    }

    /// Turn a finished process status into a result
    pub fn check(&self, status: ExitStatus) -> Result<()> {
        if status.success() {
            Ok(())
        } else {
            Err(Error::Failed {
                cmd: self.cmd.clone(),
                status,
            })
        }
    }

    /// Block until `child` exits
    pub fn wait(&self, child: &mut Child) -> Result<ExitStatus> {
        child.wait().map_err(|source| self.wait_error(source))
    }

    /// Exit status of `child` if it has already exited
    pub fn poll(&self, child: &mut Child) -> Result<Option<ExitStatus>> {
        child.try_wait().map_err(|source| self.wait_error(source))
    }

    fn wait_error(&self, source: std::io::Error) -> Error {
        Error::Wait {
            cmd: self.cmd.clone(),
            source,
        }
    }
}

impl Emulator for Firebase {
    fn export(&self, dest: &Path) -> Result<()> {
        debug!(cmd = %self.cmd, dest = %dest.display(), "exporting emulator data");
        let status = self
            .command([OsStr::new("emulators:export"), dest.as_os_str()])
            .status()
            .map_err(|source| Error::Spawn {
                cmd: self.cmd.clone(),
                source,
            })?;
        self.check(status)
    }
}
