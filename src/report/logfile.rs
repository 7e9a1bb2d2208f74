//! Log file sink
//!
//! Files are opened in append mode, so two reports stamped with the same
//! second end up in the same file instead of overwriting each other.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::{render_plain, Block};
use crate::common::paths::{LogLayout, RunStamp};
use crate::common::{Error, Result};

/// Append a report to the log file for `stamp`
///
/// Returns the path when this report added something to the file. A file left
/// empty (or only whitespace) is removed; an earlier report sharing the file
/// is left alone. Both cases return `None`.
pub fn write_log(
    layout: &LogLayout,
    stamp: &RunStamp,
    blocks: &[Vec<Block>],
) -> Result<Option<PathBuf>> {
    let dir = layout.day_dir(stamp);
    fs::create_dir_all(&dir).map_err(|e| Error::log_write(&dir, &e))?;

    let path = layout.log_file(stamp);
    let rendered = render_plain(blocks);
    {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::log_write(&path, &e))?;
        file.write_all(rendered.as_bytes())
            .map_err(|e| Error::log_write(&path, &e))?;
    }

    if !has_content(&path)? {
        fs::remove_file(&path).map_err(|e| Error::log_write(&path, &e))?;
        tracing::debug!(path = %path.display(), "nothing to log, removed empty file");
        return Ok(None);
    }
    if rendered.trim().is_empty() {
        tracing::debug!(path = %path.display(), "nothing to log, kept earlier report");
        return Ok(None);
    }

    tracing::debug!(path = %path.display(), "log written");
    Ok(Some(path))
}

/// Merge several log files into one and remove the originals
///
/// Sources are appended in file-name order into the log file for `stamp`.
/// Returns `None` when there was nothing to merge.
pub fn concatenate_logs(
    layout: &LogLayout,
    stamp: &RunStamp,
    sources: &[PathBuf],
) -> Result<Option<PathBuf>> {
    let mut sources: Vec<&PathBuf> = sources.iter().collect();
    sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    sources.dedup();
    if sources.is_empty() {
        return Ok(None);
    }

    let dir = layout.day_dir(stamp);
    fs::create_dir_all(&dir).map_err(|e| Error::log_write(&dir, &e))?;
    let target = layout.log_file(stamp);

    let mut combined = Vec::new();
    for source in &sources {
        let mut file = File::open(source).map_err(|e| Error::FileRead {
            path: source.display().to_string(),
            error: e.to_string(),
        })?;
        file.read_to_end(&mut combined)?;
    }

    // A source may share the target's name; it is already in `combined`.
    fs::write(&target, &combined).map_err(|e| Error::log_write(&target, &e))?;
    for source in sources.into_iter().filter(|s| **s != target) {
        fs::remove_file(source)?;
    }

    Ok(Some(target))
}

fn has_content(path: &Path) -> Result<bool> {
    let mut text = String::new();
    File::open(path)?.read_to_string(&mut text)?;
    Ok(!text.trim().is_empty())
}
