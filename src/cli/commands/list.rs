// ===========================================================================
// firesave list - List saves with their metadata
// ===========================================================================

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::cli::Result;
use crate::config::Config;
use crate::meta::SaveMeta;
use crate::saves;

const DIVIDER_WIDTH: usize = 44;

pub fn run(config: &Config) -> Result<()> {
    let metas = saves::list(config)?;

    if metas.is_empty() {
        let home = dirs::home_dir();
        println!(
            "No save data found at path {}",
            shorten_path(&config.save_dir, &home)
        );
        return Ok(());
    }

    print!("{}", render(&metas));
    Ok(())
}

fn render(metas: &[SaveMeta]) -> String {
    let divider = "-".repeat(DIVIDER_WIDTH);
    let mut out = String::new();

    for meta in metas {
        let kind = if meta.is_autosave { "Auto" } else { "Manual" };

        out.push_str(&divider);
        out.push('\n');
        out.push_str(&format!("[{kind}] {}\n", meta.name));
        if let Some(description) = meta.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("   {description}\n"));
        }
        out.push_str(&format!("   {}\n", format_time(meta)));
    }
    out.push_str(&divider);
    out.push('\n');

    out
}

/// Save time in local time, `YYYY-MM-DD HH:MM:SS`
fn format_time(meta: &SaveMeta) -> String {
    meta.save_time
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn shorten_path(path: &Path, home: &Option<PathBuf>) -> String {
    match home {
        Some(h) => match path.strip_prefix(h) {
            Ok(rel) => format!("~/{}", rel.display()),
            Err(_) => path.display().to_string(),
        },
        None => path.display().to_string(),
    }
}
