//! Staged atomic file writes.
//!
//! Every output file goes through the same two steps:
//! 1. [`stage`] writes the content to a hidden temporary file in the target's
//!    directory and syncs it to disk
//! 2. [`StagedFile::commit`] renames the temporary file over the target
//!
//! Splitting the steps lets a caller stage several files, and only start
//! renaming once all of them are safely on disk. A staged file that is never
//! committed removes its temporary file when dropped.
//!
//! Source and destination share a directory, so the rename never crosses
//! filesystems. On crash, a temporary file may remain (named
//! `.{filename}.{pid}.tmp`).

use crate::error::{FormatError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Content written to a temporary file and waiting to replace its target.
#[derive(Debug)]
pub struct StagedFile {
    temp_path: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Atomically move the staged content into place.
    pub fn commit(mut self) -> Result<PathBuf> {
        fs::rename(&self.temp_path, &self.target).map_err(|e| {
            FormatError::Write(format!(
                "failed to move staged output into '{}': {}",
                self.target.display(),
                e
            ))
        })?;
        self.committed = true;
        sync_parent_dir(&self.target);

        Ok(self.target.clone())
    }
}

/// Persist the directory entry created by a rename.
#[cfg(unix)]
fn sync_parent_dir(target: &Path) {
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_target: &Path) {}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

/// An existing file moved out of the way of a commit.
#[derive(Debug)]
pub struct SetAside {
    backup: PathBuf,
    target: PathBuf,
}

impl SetAside {
    /// Move the original file back to its path.
    pub fn restore(self) -> Result<()> {
        fs::rename(&self.backup, &self.target).map_err(|e| {
            FormatError::Write(format!(
                "failed to restore previous '{}': {}",
                self.target.display(),
                e
            ))
        })
    }

    /// Drop the saved copy once the replacement is in place.
    pub fn discard(self) {
        let _ = fs::remove_file(&self.backup);
    }
}

/// Move an existing regular file at `target` to a hidden backup name.
///
/// Returns `None` when there is no file to keep.
pub fn set_aside<P: AsRef<Path>>(target: P) -> Result<Option<SetAside>> {
    let target = target.as_ref();
    if !target.is_file() {
        return Ok(None);
    }

    let backup = sibling_path(target, "bak")?;
    fs::rename(target, &backup).map_err(|e| {
        FormatError::Write(format!(
            "failed to set aside existing '{}': {}",
            target.display(),
            e
        ))
    })?;

    Ok(Some(SetAside {
        backup,
        target: target.to_path_buf(),
    }))
}

/// Write `content` next to `target` without touching `target` itself.
///
/// Creates the parent directory if needed.
pub fn stage<P: AsRef<Path>>(target: P, content: &[u8]) -> Result<StagedFile> {
    let target = target.as_ref();

    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            FormatError::Write(format!(
                "failed to create output directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let staged = StagedFile {
        temp_path: sibling_path(target, "tmp")?,
        target: target.to_path_buf(),
        committed: false,
    };

    // On error `staged` is dropped here, which removes the partial temp file
    write_and_sync(&staged.temp_path, content)?;

    Ok(staged)
}

/// Atomically write bytes to a single file.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<PathBuf> {
    stage(path, content)?.commit()
}

/// Hidden path next to `target`: `.{filename}.{pid}.{suffix}`.
fn sibling_path(target: &Path, suffix: &str) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            FormatError::Write(format!("invalid output path '{}'", target.display()))
        })?;

    let name = format!(".{}.{}.{}", filename, std::process::id(), suffix);
    Ok(parent.join(name))
}

/// Write content to a file and sync to disk.
fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        FormatError::Write(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content)
        .map_err(|e| FormatError::Write(format!("failed to write temporary file: {}", e)))?;

    file.sync_all()
        .map_err(|e| FormatError::Write(format!("failed to sync temporary file to disk: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.json");

        let written = atomic_write(&file_path, b"[]\n").unwrap();

        assert_eq!(written, file_path);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "[]\n");
        assert_eq!(entries(temp_dir.path()), vec!["out.json"]);
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.jsonl");
        fs::write(&file_path, "old\n").unwrap();

        atomic_write(&file_path, b"new\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new\n");
    }

    #[test]
    fn test_stage_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("dirs").join("out.json");

        stage(&file_path, b"{}").unwrap().commit().unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "{}");
    }

    #[test]
    fn test_staged_file_is_invisible_until_commit() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.json");

        let staged = stage(&file_path, b"content").unwrap();
        assert!(!file_path.exists());

        staged.commit().unwrap();
        assert!(file_path.exists());
    }

    #[test]
    fn test_dropped_stage_leaves_nothing_behind() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.json");

        {
            let _staged = stage(&file_path, b"content").unwrap();
            assert_eq!(entries(temp_dir.path()).len(), 1);
        }

        assert!(entries(temp_dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_commit_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("out.jsonl");
        fs::create_dir(&blocker).unwrap();

        let err = stage(&blocker, b"x").unwrap().commit().unwrap_err();

        assert!(matches!(err, FormatError::Write(_)));
        assert_eq!(entries(temp_dir.path()), vec!["out.jsonl"]);
    }

    #[test]
    fn test_generate_temp_path() {
        let target = Path::new("/some/path/batch.json");
        let temp = sibling_path(target, "tmp").unwrap();
        let name = temp.file_name().unwrap().to_str().unwrap();

        assert_eq!(temp.parent().unwrap(), Path::new("/some/path"));
        assert!(name.starts_with(".batch.json."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_atomic_write_empty_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.jsonl");

        atomic_write(&file_path, b"").unwrap();

        assert!(fs::read(&file_path).unwrap().is_empty());
    }

    #[test]
    fn test_set_aside_and_restore() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.json");
        fs::write(&file_path, "previous").unwrap();

        let saved = set_aside(&file_path).unwrap().unwrap();
        assert!(!file_path.exists());

        saved.restore().unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "previous");
        assert_eq!(entries(temp_dir.path()), vec!["out.json"]);
    }

    #[test]
    fn test_set_aside_discard_after_replacement() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.json");
        fs::write(&file_path, "previous").unwrap();

        let saved = set_aside(&file_path).unwrap().unwrap();
        atomic_write(&file_path, b"new").unwrap();
        saved.discard();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new");
        assert_eq!(entries(temp_dir.path()), vec!["out.json"]);
    }

    #[test]
    fn test_set_aside_without_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        assert!(set_aside(temp_dir.path().join("missing.json")).unwrap().is_none());
        assert!(set_aside(temp_dir.path()).unwrap().is_none());
    }
}
