//! Output directory creation that can be undone.
//!
//! A failed batch must not leave anything behind, including directories that
//! were only created to hold its output.

use crate::error::{FormatError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directories created for an output path, deepest first.
#[derive(Debug, Default)]
pub struct CreatedDirs {
    dirs: Vec<PathBuf>,
}

impl CreatedDirs {
    /// Remove the created directories again.
    ///
    /// A directory that is no longer empty is left alone, along with every
    /// directory above it.
    pub fn remove(self) {
        for dir in &self.dirs {
            if fs::remove_dir(dir).is_err() {
                break;
            }
        }
    }
}

/// Create the parent directory of `target`, remembering which levels were new.
pub fn create_parent_dirs(target: &Path) -> Result<CreatedDirs> {
    let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(CreatedDirs::default());
    };

    let mut dirs = Vec::new();
    let mut current = Some(parent);
    while let Some(dir) = current
        && !dir.as_os_str().is_empty()
        && !dir.exists()
    {
        dirs.push(dir.to_path_buf());
        current = dir.parent();
    }

    if !dirs.is_empty() {
        fs::create_dir_all(parent).map_err(|e| {
            FormatError::Write(format!(
                "failed to create output directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    Ok(CreatedDirs { dirs })
}
