// src/store.rs
//! Reading and committing pipeline artifacts.
use std::{fs, io, path::Path};

use crate::csv::{self, Delim};
use crate::error::TaskError;
use crate::file::commit_with;
use crate::table::Table;

/// Load a committed CSV artifact. A missing file is `MissingArtifact`, not an I/O error.
pub fn load_table(path: &Path) -> Result<Table, TaskError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Table::from_delimited(&text, Delim::Csv)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(TaskError::MissingArtifact { path: path.to_path_buf() })
        }
        Err(e) => Err(TaskError::io(path, e)),
    }
}

pub fn commit_table(path: &Path, table: &Table, delim: Delim, with_header: bool) -> Result<(), TaskError> {
    commit_with(path, |w| table.write_delimited(w, delim, with_header))
        .map_err(|e| TaskError::io(path, e))
}

/// One value per line.
pub fn commit_lines<S: AsRef<str>>(path: &Path, values: &[S]) -> Result<(), TaskError> {
    commit_with(path, |w| csv::write_lines(w, values)).map_err(|e| TaskError::io(path, e))
}
