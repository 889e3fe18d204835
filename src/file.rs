// src/file.rs
//! Stage-then-promote writes.
//!
//! Every artifact is written to a hidden staging file next to its final
//! location, flushed and synced, and only then renamed over the final name.
//! A failure at any point before the rename drops the staging file and
//! leaves whatever was at the final path untouched.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::{Builder, TempPath};
use tracing::{debug, info};

use crate::config::consts::STAGING_PREFIX;

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("path exists but is not a directory: {}", dir.display()),
        ));
    }
    fs::create_dir_all(dir)
}

/// Write a staging file for `final_path` with `fill` and return it unpromoted.
/// The staging file is deleted when the returned path is dropped.
pub fn stage<F>(final_path: &Path, fill: F) -> io::Result<TempPath>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = match final_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    ensure_directory(dir)?;

    let name = final_path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let prefix = join!(STAGING_PREFIX, &name, "-");
    let file = Builder::new().prefix(&prefix).tempfile_in(dir)?;
    debug!("staging {} at {}", final_path.display(), file.path().display());

    let mut out = BufWriter::new(file);
    fill(&mut out)?;
    let file = out.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.as_file().sync_all()?;
    Ok(file.into_temp_path())
}

/// Replace `final_path` with the staged file.
pub fn promote(staged: TempPath, final_path: &Path) -> io::Result<()> {
    // Windows refuses to rename over an existing file.
    match fs::remove_file(final_path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }
    staged.persist(final_path).map_err(|e| e.error)?;
    info!("committed {}", final_path.display());
    Ok(())
}

/// [`stage`] then [`promote`].
pub fn commit_with<F>(final_path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let staged = stage(final_path, fill)?;
    promote(staged, final_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn commit_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old").unwrap();

        commit_with(&path, |w| w.write_all(b"new")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(entries(dir.path()), ["out.txt"]);
    }

    #[test]
    fn failed_fill_leaves_final_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old").unwrap();

        let err = commit_with(&path, |w| {
            w.write_all(b"partial")?;
            Err(io::Error::other("boom"))
        });
        assert!(err.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(entries(dir.path()), ["out.txt"]);
    }

    #[test]
    fn unpromoted_stage_is_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");
        let staged = stage(&path, |w| w.write_all(b"x")).unwrap();
        assert!(staged.file_name().unwrap().to_string_lossy().starts_with(".staging-out.txt-"));
        drop(staged);
        assert!(!path.exists());
        assert!(entries(&dir.path().join("nested")).is_empty());
    }
}
