// ===========================================================================
// firesave launch - Start the emulators with a save loaded
// ===========================================================================

use std::path::Path;
use std::process::{Child, ExitStatus};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use clap::Args;
use tracing::debug;

use crate::cli::Result;
use crate::config::Config;
use crate::meta::{self, SaveMeta};
use crate::process::{self, Firebase};
use crate::saves;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// File firebase writes into every export directory
const EXPORT_MARKER: &str = "firebase-export-metadata.json";

/// Filesystems with coarse mtimes may round the marker's time down
const MTIME_SLACK: Duration = Duration::from_secs(2);

#[derive(Args)]
pub struct LaunchArgs {
    /// Save to import (default: 'defaultLoadedSave' from config)
    #[arg(short, long, value_name = "NAME")]
    save: Option<String>,
}

pub fn run(args: LaunchArgs, config: &Config) -> Result<()> {
    let firebase = Firebase::from_config(config);

    let name = args.save.as_deref().unwrap_or(&config.default_loaded_save);
    let import = saves::save_path(config, name)?;
    let import = if import.is_dir() {
        eprintln!("Loading save '{name}'");
        Some(import)
    } else {
        eprintln!("No save named '{name}', starting with empty emulator data");
        None
    };

    // autoSaveName only matters when something writes to the autosave slot
    let autosave_dir = if config.export_on_exit || config.auto_save_interval().is_some() {
        Some(saves::save_path(config, &config.auto_save_name)?)
    } else {
        None
    };
    let export_on_exit = autosave_dir.as_deref().filter(|_| config.export_on_exit);

    let started = SystemTime::now();
    let mut child = firebase.start(import.as_deref(), export_on_exit)?;

    let status = match config.auto_save_interval() {
        Some(interval) => wait_with_autosave(&mut child, interval, &firebase, config)?,
        None => firebase.wait(&mut child)?,
    };
    firebase.check(status)?;

    if let Some(dir) = export_on_exit {
        record_exit_export(dir, &config.auto_save_name, started)?;
    }

    Ok(())
}

/// Wait for the emulators, exporting into the autosave slot every `interval`
fn wait_with_autosave(
    child: &mut Child,
    interval: Duration,
    firebase: &Firebase,
    config: &Config,
) -> process::Result<ExitStatus> {
    // An interval too long to represent means autosave never fires
    let Some(mut next) = Instant::now().checked_add(interval) else {
        return firebase.wait(child);
    };

    loop {
        if let Some(status) = firebase.poll(child)? {
            return Ok(status);
        }

        if Instant::now() >= next {
            debug!(save = %config.auto_save_name, "autosaving");
            match saves::create_or_update(config, firebase, &config.auto_save_name, None, true) {
                Ok(_) => eprintln!("Autosaved '{}'", config.auto_save_name),
                // Keep the emulators running; the next tick retries
                Err(e) => eprintln!("autosave failed: {e}"),
            }
            next = match Instant::now().checked_add(interval) {
                Some(next) => next,
                None => return firebase.wait(child),
            };
        }

        thread::sleep(POLL_INTERVAL.min(interval));
    }
}

/// Give the export written by `--export-on-exit` a sidecar so it lists.
///
/// Only an export newer than `started` counts; an older autosave left in the
/// slot keeps its own timestamp.
fn record_exit_export(dir: &Path, name: &str, started: SystemTime) -> Result<()> {
    if !exported_since(dir, started) {
        debug!(dir = %dir.display(), "no export on exit found");
        return Ok(());
    }

    let description = meta::read(dir)?.and_then(|m| m.description);
    SaveMeta::new(name)
        .with_description(description)
        .autosave(true)
        .save(dir)?;

    eprintln!("Saved '{name}' on exit");
    Ok(())
}

fn exported_since(dir: &Path, started: SystemTime) -> bool {
    let modified = match std::fs::metadata(dir.join(EXPORT_MARKER)).and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "no export marker");
            return false;
        }
    };

    let threshold = started.checked_sub(MTIME_SLACK).unwrap_or(started);
    modified >= threshold
}
